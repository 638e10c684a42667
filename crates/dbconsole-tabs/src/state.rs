//! Tab State Machine
//!
//! ```text
//! Unloaded  (persisted, waiting for its page to accept a restore)
//!   ↓ restore
//! Background
//!   ↕ select / blur
//! Active
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Loaded from storage, page has not accepted it yet
    Unloaded,
    /// Open but not selected
    Background,
    /// Currently selected
    Active,
}

impl TabState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TabState) -> bool {
        match (self, target) {
            (TabState::Unloaded, TabState::Background) => true,
            (TabState::Background, TabState::Active) => true,
            (TabState::Active, TabState::Background) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            // Unloaded tabs must be restored before they can be selected
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Unloaded => "unloaded",
            TabState::Background => "background",
            TabState::Active => "active",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unloaded" => Ok(TabState::Unloaded),
            "background" => Ok(TabState::Background),
            "active" => Ok(TabState::Active),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}
