//! Presentation intent for status values.
//!
//! Every status enum in the data model maps to exactly one [`Intent`] through
//! [`StatusIntent`], so rendering code never keeps its own lookup table.

use serde::{Deserialize, Serialize};

/// Visual category a status is rendered with (badge color, icon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Success => "success",
            Intent::Warning => "warning",
            Intent::Danger => "danger",
            Intent::Info => "info",
            Intent::Neutral => "neutral",
        }
    }
}

/// Status enums owned by the data model implement this once.
pub trait StatusIntent {
    fn intent(&self) -> Intent;

    /// Stable machine label (matches the serde representation).
    fn label(&self) -> &'static str;
}
