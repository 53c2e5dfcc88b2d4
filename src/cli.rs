//! CLI domain: parse, route and output only.
//! No domain orchestration; the route hands off to the generator.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use route::RunContext;
