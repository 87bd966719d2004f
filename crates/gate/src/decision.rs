use serde::{Deserialize, Serialize};

/// The binary outcome a gate reader acts on.
///
/// Anything the engine cannot answer within budget resolves to `Deny`; a
/// physical gate cannot retry a decision, so it never sees an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    Allow,
    Deny,
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

impl core::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GateDecision::Allow => f.write_str("ALLOW"),
            GateDecision::Deny => f.write_str("DENY"),
        }
    }
}
