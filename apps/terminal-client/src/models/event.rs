//! Inbound order events and the diagnostic records they can produce.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{ClientOrderId, InstrumentId};
use super::order::{OrderSide, OrderStatus};

/// An asynchronously delivered venue notification for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    /// The venue accepted the order.
    Accepted,
    /// The venue rejected the order.
    Rejected {
        /// Venue-supplied reject reason.
        reason: String,
    },
    /// Part or all of the order executed.
    Executed {
        /// Executed quantity.
        quantity: u64,
        /// Execution price.
        price: Decimal,
    },
    /// The order was canceled at the venue.
    Canceled,
}

impl OrderEvent {
    /// Short event name for logs and anomaly records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected { .. } => "rejected",
            Self::Executed { .. } => "executed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An inbound event that would violate an order's invariants if applied.
///
/// Anomalies are recovered locally: the order is left unchanged, the anomaly
/// is logged and recorded for the `errors` listing, and nothing is surfaced
/// to the operator as a command failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolAnomaly {
    /// Event referenced an order already in a terminal status.
    #[error("{event} event for order in terminal status {status}")]
    TerminalStatus {
        /// Name of the offending event.
        event: &'static str,
        /// The order's terminal status.
        status: OrderStatus,
    },

    /// Event is not valid in the order's current status.
    #[error("{event} event not valid in status {status}")]
    UnexpectedEvent {
        /// Name of the offending event.
        event: &'static str,
        /// The order's current status.
        status: OrderStatus,
    },

    /// Fill would push the cumulative filled quantity past the order quantity.
    #[error("fill of {fill} exceeds remaining quantity {remaining}")]
    OverFill {
        /// Quantity reported by the executed event.
        fill: u64,
        /// Quantity still outstanding on the order.
        remaining: u64,
    },

    /// Executed event carried a zero fill quantity.
    #[error("fill quantity must be positive")]
    EmptyFill,
}

impl ProtocolAnomaly {
    /// Classify the anomaly for the diagnostic record.
    #[must_use]
    pub const fn kind(&self) -> AnomalyKind {
        match self {
            Self::TerminalStatus { .. } => AnomalyKind::TerminalEvent,
            Self::UnexpectedEvent { .. } => AnomalyKind::UnexpectedEvent,
            Self::OverFill { .. } | Self::EmptyFill => AnomalyKind::OverFill,
        }
    }
}

/// Category of a recorded protocol anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    /// Event referenced an identifier with no matching local order.
    Orphan,
    /// Event referenced an order already in a terminal status.
    TerminalEvent,
    /// Event was not valid in the order's current status.
    UnexpectedEvent,
    /// Fill quantity was zero or exceeded the outstanding quantity.
    OverFill,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orphan => write!(f, "ORPHAN"),
            Self::TerminalEvent => write!(f, "TERMINAL_EVENT"),
            Self::UnexpectedEvent => write!(f, "UNEXPECTED_EVENT"),
            Self::OverFill => write!(f, "OVER_FILL"),
        }
    }
}

/// Diagnostic record of an anomalous or orphan event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyRecord {
    /// When the event was processed locally.
    pub occurred_at: DateTime<Utc>,
    /// The identifier the event referenced.
    pub client_order_id: ClientOrderId,
    /// Anomaly category.
    pub kind: AnomalyKind,
    /// Human-readable detail.
    pub detail: String,
}

/// One execution applied to a local order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    /// Order the execution belongs to.
    pub client_order_id: ClientOrderId,
    /// Instrument traded.
    pub instrument: InstrumentId,
    /// Side of the filled order.
    pub side: OrderSide,
    /// Executed quantity.
    pub quantity: u64,
    /// Execution price.
    pub price: Decimal,
    /// When the execution was applied locally.
    pub executed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        assert_eq!(OrderEvent::Accepted.name(), "accepted");
        assert_eq!(
            OrderEvent::Rejected {
                reason: "late".to_string()
            }
            .name(),
            "rejected"
        );
        assert_eq!(
            OrderEvent::Executed {
                quantity: 1,
                price: Decimal::ONE
            }
            .name(),
            "executed"
        );
        assert_eq!(OrderEvent::Canceled.name(), "canceled");
    }

    #[test]
    fn anomaly_kinds() {
        let terminal = ProtocolAnomaly::TerminalStatus {
            event: "executed",
            status: OrderStatus::Filled,
        };
        assert_eq!(terminal.kind(), AnomalyKind::TerminalEvent);

        let overfill = ProtocolAnomaly::OverFill {
            fill: 10,
            remaining: 5,
        };
        assert_eq!(overfill.kind(), AnomalyKind::OverFill);
        assert_eq!(ProtocolAnomaly::EmptyFill.kind(), AnomalyKind::OverFill);
    }

    #[test]
    fn anomaly_display() {
        let overfill = ProtocolAnomaly::OverFill {
            fill: 60,
            remaining: 40,
        };
        assert_eq!(
            overfill.to_string(),
            "fill of 60 exceeds remaining quantity 40"
        );
    }

    #[test]
    fn anomaly_kind_display() {
        assert_eq!(AnomalyKind::Orphan.to_string(), "ORPHAN");
        assert_eq!(AnomalyKind::TerminalEvent.to_string(), "TERMINAL_EVENT");
        assert_eq!(AnomalyKind::OverFill.to_string(), "OVER_FILL");
    }
}
