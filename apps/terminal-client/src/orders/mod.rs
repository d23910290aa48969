//! The session-local order table.

mod table;

pub use table::{Applied, OrderTable, OrderTableError};
