//! Order state for session-local execution tracking.
//!
//! Status transitions follow the venue's order lifecycle:
//! PENDING accepts `Accepted`/`Rejected`; ACCEPTED and PARTIALLY_FILLED
//! accept `Executed`/`Canceled`; terminal statuses accept nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::{OrderEvent, ProtocolAnomaly};
use super::ids::{ClientOrderId, InstrumentId};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order status in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order sent, awaiting venue acknowledgment.
    Pending,
    /// Order accepted by the venue.
    Accepted,
    /// Order rejected by the venue.
    Rejected,
    /// Order partially executed.
    PartiallyFilled,
    /// Order completely executed.
    Filled,
    /// Order canceled at the venue.
    Canceled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Filled | Self::Canceled)
    }

    /// Returns true if the order is still open (shown by the `orders` command).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted | Self::PartiallyFilled)
    }

    /// Returns true if the order can receive fills.
    #[must_use]
    pub const fn can_fill(&self) -> bool {
        matches!(self, Self::Accepted | Self::PartiallyFilled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// One order this session has attempted to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Locally assigned identifier; primary key, assigned exactly once.
    pub client_order_id: ClientOrderId,
    /// Resolved venue instrument.
    pub instrument: InstrumentId,
    /// Order side.
    pub side: OrderSide,
    /// Requested quantity.
    pub quantity: u64,
    /// Limit price.
    pub price: Decimal,
    /// Current status.
    pub status: OrderStatus,
    /// Cumulative executed quantity.
    pub filled_quantity: u64,
    /// Running average execution price over all fills.
    pub avg_fill_price: Decimal,
    /// Venue reject reason, if the order was rejected.
    pub reject_reason: Option<String>,
    /// When the order was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the last event was applied.
    pub last_update_at: DateTime<Utc>,
}

impl Order {
    /// Create a new PENDING order.
    #[must_use]
    pub fn new(
        client_order_id: ClientOrderId,
        instrument: InstrumentId,
        side: OrderSide,
        quantity: u64,
        price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            client_order_id,
            instrument,
            side,
            quantity,
            price,
            status: OrderStatus::Pending,
            filled_quantity: 0,
            avg_fill_price: Decimal::ZERO,
            reject_reason: None,
            submitted_at: now,
            last_update_at: now,
        }
    }

    /// Quantity still outstanding.
    #[must_use]
    pub const fn remaining_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    /// Apply an inbound venue event to this order.
    ///
    /// On success the status (and, for executions, the fill accumulators)
    /// are updated and `last_update_at` is set to `now`. On error the order
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolAnomaly`] if the event is not valid for the
    /// order's current status, or if an execution would overfill it.
    pub fn apply_event(
        &mut self,
        event: &OrderEvent,
        now: DateTime<Utc>,
    ) -> Result<(), ProtocolAnomaly> {
        if self.status.is_terminal() {
            return Err(ProtocolAnomaly::TerminalStatus {
                event: event.name(),
                status: self.status,
            });
        }

        match event {
            OrderEvent::Accepted => {
                if self.status != OrderStatus::Pending {
                    return Err(self.unexpected(event));
                }
                self.status = OrderStatus::Accepted;
            }
            OrderEvent::Rejected { reason } => {
                if self.status != OrderStatus::Pending {
                    return Err(self.unexpected(event));
                }
                self.status = OrderStatus::Rejected;
                self.reject_reason = Some(reason.clone());
            }
            OrderEvent::Executed { quantity, price } => {
                if !self.status.can_fill() {
                    return Err(self.unexpected(event));
                }
                if *quantity == 0 {
                    return Err(ProtocolAnomaly::EmptyFill);
                }
                let remaining = self.remaining_quantity();
                if *quantity > remaining {
                    return Err(ProtocolAnomaly::OverFill {
                        fill: *quantity,
                        remaining,
                    });
                }
                self.apply_fill(*quantity, *price);
            }
            OrderEvent::Canceled => {
                if !self.status.can_fill() {
                    return Err(self.unexpected(event));
                }
                self.status = OrderStatus::Canceled;
            }
        }

        self.last_update_at = now;
        Ok(())
    }

    fn apply_fill(&mut self, quantity: u64, price: Decimal) {
        let filled_before = Decimal::from(self.filled_quantity);
        let notional = self.avg_fill_price * filled_before + price * Decimal::from(quantity);

        self.filled_quantity += quantity;
        self.avg_fill_price = notional / Decimal::from(self.filled_quantity);
        self.status = if self.filled_quantity == self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    const fn unexpected(&self, event: &OrderEvent) -> ProtocolAnomaly {
        ProtocolAnomaly::UnexpectedEvent {
            event: event.name(),
            status: self.status,
        }
    }
}
