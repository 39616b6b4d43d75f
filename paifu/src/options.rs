use serde::{Deserialize, Serialize};

/// Knobs for a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Fail on unknown tags, keys and result strings instead of skipping
    /// them with a warning.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ParseOptions {
    #[must_use]
    pub const fn lenient() -> Self {
        Self { strict: false }
    }
}
