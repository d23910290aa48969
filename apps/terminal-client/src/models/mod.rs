//! Domain types: identifiers, orders, and inbound events.

pub mod event;
pub mod ids;
pub mod order;

pub use event::{AnomalyKind, AnomalyRecord, Fill, OrderEvent, ProtocolAnomaly};
pub use ids::{ClientOrderId, InstrumentId};
pub use order::{Order, OrderSide, OrderStatus};
