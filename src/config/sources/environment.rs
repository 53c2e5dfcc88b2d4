//! Environment source: WIXFILES__<KEY> variables, `__` separating nested keys.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("WIXFILES")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
