//! Identifier derivation for WiX `Id` attributes
//!
//! WiX identifiers may contain ASCII letters, digits, underscores and periods,
//! and are limited to 72 characters. File and directory names are mapped into
//! that alphabet, then qualified with their parent's identifier so siblings
//! in different directories stay distinct.

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum identifier length accepted by the WiX toolset
pub const MAX_IDENTIFIER_LEN: usize = 72;

/// Hex digits of the path digest kept by [`IdStrategy::Hashed`]
const DIGEST_HEX_LEN: usize = 16;

/// How identifiers longer than [`MAX_IDENTIFIER_LEN`] are shortened
///
/// `Hashed` is the default. Only `Truncate` produces the plain `_` + last 71
/// characters form; it is kept for output compatible with older installers,
/// where two long paths sharing a tail end up with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `_` followed by a digest of the full identifier and its tail
    #[default]
    Hashed,
    /// `_` followed by the last 71 characters
    Truncate,
}

/// Map a display name onto the identifier alphabet.
///
/// Letters, digits, `_` and `.` are kept; every other character becomes `_`.
pub fn derive_identifier(raw_name: &str) -> String {
    raw_name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Join a parent identifier and a derived child identifier.
///
/// The result is shortened to [`MAX_IDENTIFIER_LEN`] characters when needed.
pub fn qualify_identifier(parent_id: &str, derived_id: &str, strategy: IdStrategy) -> String {
    let qualified = format!("{}.{}", parent_id, derived_id);
    shorten_identifier(qualified, strategy)
}

/// Shorten an identifier that exceeds [`MAX_IDENTIFIER_LEN`]; shorter input is returned as is.
pub fn shorten_identifier(id: String, strategy: IdStrategy) -> String {
    let len = id.chars().count();
    if len <= MAX_IDENTIFIER_LEN {
        return id;
    }

    let short = match strategy {
        IdStrategy::Truncate => format!("_{}", tail(&id, MAX_IDENTIFIER_LEN - 1)),
        IdStrategy::Hashed => {
            let mut hasher = Hasher::new();
            hasher.update(id.as_bytes());
            let digest = hex::encode(hasher.finalize().as_bytes());
            // "_" + digest + "." + tail
            let keep = MAX_IDENTIFIER_LEN - DIGEST_HEX_LEN - 2;
            format!("_{}.{}", &digest[..DIGEST_HEX_LEN], tail(&id, keep))
        }
    };
    warn!(original = %id, shortened = %short, ?strategy, "Identifier shortened");
    short
}

fn tail(s: &str, count: usize) -> String {
    let skip = s.chars().count().saturating_sub(count);
    s.chars().skip(skip).collect()
}
