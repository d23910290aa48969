//! Event correlation: inbound messages applied to the order table.
//!
//! Runs on the inbound delivery path. Each decoded message is mapped to an
//! order event and applied to the shared table; orphans and anomalies are
//! logged here and recorded by the table for the `errors` listing. This
//! path never blocks on interactive I/O, only on the table's critical
//! section.

use std::sync::Arc;

use tracing::{debug, warn};

use super::messages::InboundMessage;
use crate::models::{ClientOrderId, OrderEvent};
use crate::orders::{Applied, OrderTable};

/// Applies inbound session messages to the order table.
#[derive(Debug, Clone)]
pub struct EventCorrelator {
    table: Arc<OrderTable>,
}

impl EventCorrelator {
    /// Create a correlator over the shared order table.
    #[must_use]
    pub fn new(table: Arc<OrderTable>) -> Self {
        Self { table }
    }

    /// Process one inbound message.
    pub fn on_message(&self, message: InboundMessage) {
        let (client_order_id, event) = match message {
            InboundMessage::OrderAccepted { client_order_id } => {
                (client_order_id, OrderEvent::Accepted)
            }
            InboundMessage::OrderRejected {
                client_order_id,
                reason,
            } => (client_order_id, OrderEvent::Rejected { reason }),
            InboundMessage::OrderExecuted {
                client_order_id,
                quantity,
                price,
            } => (client_order_id, OrderEvent::Executed { quantity, price }),
            InboundMessage::OrderCanceled {
                client_order_id,
                canceled_quantity,
            } => {
                debug!(
                    order_id = %client_order_id,
                    canceled_quantity,
                    "Cancel confirmed by venue"
                );
                (client_order_id, OrderEvent::Canceled)
            }
            InboundMessage::LoginAccepted { .. } | InboundMessage::LoginRejected { .. } => {
                // Login completes before the delivery path starts.
                warn!(kind = message.name(), "Unexpected login message mid-session");
                return;
            }
        };

        self.apply(&client_order_id, &event);
    }

    fn apply(&self, client_order_id: &ClientOrderId, event: &OrderEvent) {
        match self.table.apply_event(client_order_id, event) {
            Applied::Updated(status) => {
                debug!(order_id = %client_order_id, event = %event, status = %status, "Order updated");
            }
            Applied::Orphan => {
                warn!(order_id = %client_order_id, event = %event, "Orphan event for unknown order");
            }
            Applied::IgnoredTerminal => {
                warn!(order_id = %client_order_id, event = %event, "Event for terminal order ignored");
            }
            Applied::Anomalous => {
                warn!(order_id = %client_order_id, event = %event, "Anomalous event ignored");
            }
        }
    }
}
