//! Order table: the authoritative local view of this session's orders.
//!
//! The table is the only state shared between the interactive loop (which
//! inserts new PENDING orders) and the inbound delivery path (which applies
//! venue events). All access goes through one mutex; critical sections are
//! short and the lock is never held across an await point.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;

use crate::models::{
    AnomalyKind, AnomalyRecord, ClientOrderId, Fill, Order, OrderEvent, OrderStatus,
};

/// Errors from order table mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderTableError {
    /// An order with the same client order identifier is already present.
    #[error("duplicate client order id {0}")]
    DuplicateKey(ClientOrderId),
}

/// Result of applying an inbound event to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Event applied; the order's resulting status.
    Updated(OrderStatus),
    /// No local order with that identifier; recorded as an orphan.
    Orphan,
    /// Order already terminal; event ignored and recorded.
    IgnoredTerminal,
    /// Event would violate an order invariant; ignored and recorded.
    Anomalous,
}

#[derive(Debug, Default)]
struct TableInner {
    orders: HashMap<ClientOrderId, Order>,
    // Insertion order, for deterministic listings.
    sequence: Vec<ClientOrderId>,
    fills: Vec<Fill>,
    anomalies: Vec<AnomalyRecord>,
}

/// Session-local order table keyed by client order identifier.
#[derive(Debug, Default)]
pub struct OrderTable {
    inner: Mutex<TableInner>,
}

impl OrderTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly submitted order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTableError::DuplicateKey`] if the identifier is
    /// already present.
    pub fn insert(&self, order: Order) -> Result<(), OrderTableError> {
        let mut inner = self.inner.lock();

        if inner.orders.contains_key(&order.client_order_id) {
            return Err(OrderTableError::DuplicateKey(order.client_order_id));
        }

        inner.sequence.push(order.client_order_id.clone());
        inner.orders.insert(order.client_order_id.clone(), order);
        Ok(())
    }

    /// Remove an order that was inserted but never reached the venue.
    ///
    /// This is the rollback path for a submission whose outbound enqueue
    /// failed; it keeps the table free of orders the venue never saw.
    pub fn remove(&self, id: &ClientOrderId) -> Option<Order> {
        let mut inner = self.inner.lock();
        let removed = inner.orders.remove(id);
        if removed.is_some() {
            inner.sequence.retain(|entry| entry != id);
        }
        removed
    }

    /// Apply an inbound venue event to the identified order.
    ///
    /// Orphan events, events on terminal orders, and events that would
    /// violate an order invariant leave the table unchanged apart from the
    /// anomaly log.
    pub fn apply_event(&self, id: &ClientOrderId, event: &OrderEvent) -> Applied {
        let now = Utc::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(order) = inner.orders.get_mut(id) else {
            inner.anomalies.push(AnomalyRecord {
                occurred_at: now,
                client_order_id: id.clone(),
                kind: AnomalyKind::Orphan,
                detail: format!("{event} event for unknown order"),
            });
            return Applied::Orphan;
        };

        match order.apply_event(event, now) {
            Ok(()) => {
                if let OrderEvent::Executed { quantity, price } = event {
                    inner.fills.push(Fill {
                        client_order_id: order.client_order_id.clone(),
                        instrument: order.instrument.clone(),
                        side: order.side,
                        quantity: *quantity,
                        price: *price,
                        executed_at: now,
                    });
                }
                Applied::Updated(order.status)
            }
            Err(anomaly) => {
                let kind = anomaly.kind();
                inner.anomalies.push(AnomalyRecord {
                    occurred_at: now,
                    client_order_id: id.clone(),
                    kind,
                    detail: anomaly.to_string(),
                });
                if kind == AnomalyKind::TerminalEvent {
                    Applied::IgnoredTerminal
                } else {
                    Applied::Anomalous
                }
            }
        }
    }

    /// Look up an order by identifier.
    #[must_use]
    pub fn get(&self, id: &ClientOrderId) -> Option<Order> {
        self.inner.lock().orders.get(id).cloned()
    }

    /// Open orders (PENDING, ACCEPTED, PARTIALLY_FILLED), oldest first.
    #[must_use]
    pub fn open_orders(&self) -> Vec<Order> {
        self.collect(|order| order.status.is_open())
    }

    /// Rejected orders, oldest first.
    #[must_use]
    pub fn rejected_orders(&self) -> Vec<Order> {
        self.collect(|order| order.status == OrderStatus::Rejected)
    }

    /// Fill history, in arrival order.
    #[must_use]
    pub fn fills(&self) -> Vec<Fill> {
        self.inner.lock().fills.clone()
    }

    /// Recorded anomalies, in arrival order.
    #[must_use]
    pub fn anomalies(&self) -> Vec<AnomalyRecord> {
        self.inner.lock().anomalies.clone()
    }

    /// Number of orders in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().orders.len()
    }

    /// Returns true if no orders have been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().orders.is_empty()
    }

    fn collect(&self, predicate: impl Fn(&Order) -> bool) -> Vec<Order> {
        let inner = self.inner.lock();
        inner
            .sequence
            .iter()
            .filter_map(|id| inner.orders.get(id))
            .filter(|order| predicate(order))
            .cloned()
            .collect()
    }
}
