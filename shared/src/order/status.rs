//! Order fulfillment status
//!
//! 状态机：PENDING → PROCESSING → SHIPPED → DELIVERED，
//! CANCELLED 可从任意非终态进入。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order fulfillment status
///
/// Admin updates must follow the forward chain; `Cancelled` is reachable
/// from any non-terminal state. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position in the forward chain; `Cancelled` sits outside it
    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Shipped => 2,
            Self::Delivered => 3,
            Self::Cancelled => 4,
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether an admin may move an order from `self` to `next`
    ///
    /// Forward movement along the chain (skipping allowed), cancellation
    /// from any non-terminal state, and same-state no-ops are accepted.
    pub fn can_transition(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled => true,
            _ => next.rank() > self.rank(),
        }
    }

    /// Wire representation (matches the serde rename)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn forward_chain_is_allowed() {
        assert!(Pending.can_transition(Processing));
        assert!(Processing.can_transition(Shipped));
        assert!(Shipped.can_transition(Delivered));
        // skipping forward is not forbidden
        assert!(Pending.can_transition(Shipped));
        assert!(Pending.can_transition(Delivered));
    }

    #[test]
    fn backward_moves_are_rejected() {
        assert!(!Processing.can_transition(Pending));
        assert!(!Shipped.can_transition(Processing));
        assert!(!Delivered.can_transition(Shipped));
    }

    #[test]
    fn cancel_from_non_terminal_only() {
        assert!(Pending.can_transition(Cancelled));
        assert!(Processing.can_transition(Cancelled));
        assert!(Shipped.can_transition(Cancelled));
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Pending));
        assert!(!Cancelled.can_transition(Delivered));
    }

    #[test]
    fn same_state_is_a_noop() {
        assert!(Processing.can_transition(Processing));
        assert!(Cancelled.can_transition(Cancelled));
    }

    #[test]
    fn wire_format_is_screaming_snake() {
        assert_eq!(serde_json::to_string(&Pending).unwrap(), "\"PENDING\"");
        let parsed: super::OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(parsed, Shipped);
        // unknown values must be rejected, not defaulted
        assert!(serde_json::from_str::<super::OrderStatus>("\"RETURNED\"").is_err());
    }
}
