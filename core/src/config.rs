//! Store configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tie-break for tasks inside the pinned group of the display list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinOrder {
    /// Pinned tasks keep their insertion order.
    #[default]
    Insertion,
    /// The most recently pinned task comes first.
    RecentlyPinned,
}

impl FromStr for PinOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(PinOrder::Insertion),
            "recently-pinned" | "recently_pinned" => Ok(PinOrder::RecentlyPinned),
            other => Err(format!("unknown pin order: {other}")),
        }
    }
}

impl fmt::Display for PinOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinOrder::Insertion => write!(f, "insertion"),
            PinOrder::RecentlyPinned => write!(f, "recently-pinned"),
        }
    }
}

/// Settings fixed at store construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub pin_order: PinOrder,
}
