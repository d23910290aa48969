//! Order-entry wire message types.
//!
//! Serde types for the messages exchanged with the venue over the session
//! channel. Every message is a JSON object tagged with a `type` field; this
//! module is the only place that knows the encoding.
//!
//! # Wire Format
//!
//! Outbound:
//! ```json
//! {"type":"login_request","username":"trader1","password":"..."}
//! {"type":"enter_order","client_order_id":"093015-000001","instrument":"FOO","side":"BUY","quantity":100,"price":"10.50"}
//! {"type":"cancel_order","client_order_id":"093015-000001"}
//! ```
//!
//! Inbound:
//! ```json
//! {"type":"login_accepted","session":"S1"}
//! {"type":"login_rejected","reason":"bad credentials"}
//! {"type":"order_accepted","client_order_id":"093015-000001"}
//! {"type":"order_rejected","client_order_id":"093015-000001","reason":"unknown instrument"}
//! {"type":"order_executed","client_order_id":"093015-000001","quantity":40,"price":"10.50"}
//! {"type":"order_canceled","client_order_id":"093015-000001","canceled_quantity":60}
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ClientOrderId, InstrumentId, OrderSide};

/// Message sent to the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Login handshake request; first message on the channel.
    LoginRequest {
        /// Login username.
        username: String,
        /// Login password.
        password: String,
    },

    /// Enter a new order.
    EnterOrder {
        /// Locally assigned order identifier.
        client_order_id: ClientOrderId,
        /// Venue instrument identifier.
        instrument: InstrumentId,
        /// Order side.
        side: OrderSide,
        /// Requested quantity.
        quantity: u64,
        /// Limit price.
        price: Decimal,
    },

    /// Cancel a previously entered order.
    CancelOrder {
        /// Identifier of the order to cancel.
        client_order_id: ClientOrderId,
    },
}

/// Message received from the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Login handshake succeeded.
    LoginAccepted {
        /// Venue-assigned session name.
        session: String,
    },

    /// Login handshake failed; the venue closes the channel afterwards.
    LoginRejected {
        /// Venue-supplied reason.
        reason: String,
    },

    /// Order acknowledged by the venue.
    OrderAccepted {
        /// Identifier of the acknowledged order.
        client_order_id: ClientOrderId,
    },

    /// Order rejected by the venue.
    OrderRejected {
        /// Identifier of the rejected order.
        client_order_id: ClientOrderId,
        /// Venue-supplied reason.
        reason: String,
    },

    /// Order executed, partially or in full.
    OrderExecuted {
        /// Identifier of the executed order.
        client_order_id: ClientOrderId,
        /// Executed quantity.
        quantity: u64,
        /// Execution price.
        price: Decimal,
    },

    /// Order canceled at the venue.
    OrderCanceled {
        /// Identifier of the canceled order.
        client_order_id: ClientOrderId,
        /// Quantity canceled (the remainder at cancel time).
        canceled_quantity: u64,
    },
}

impl InboundMessage {
    /// Short message name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LoginAccepted { .. } => "login_accepted",
            Self::LoginRejected { .. } => "login_rejected",
            Self::OrderAccepted { .. } => "order_accepted",
            Self::OrderRejected { .. } => "order_rejected",
            Self::OrderExecuted { .. } => "order_executed",
            Self::OrderCanceled { .. } => "order_canceled",
        }
    }
}
