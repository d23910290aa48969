// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::items_after_statements
    )
)]

//! Terminal Client - Venue Order Entry Library
//!
//! Interactive client for the Quotek venue's order-entry session. One
//! authenticated session is opened at startup; operator commands enter and
//! cancel orders while venue events (acknowledgements, rejects, fills,
//! cancellations) arrive asynchronously and are folded into the local order
//! table on an independent delivery path.
//!
//! # Structure
//!
//! - [`config`]: configuration file loading and validation
//! - [`models`]: order, event, and identifier types
//! - [`idgen`]: client order identifier generator
//! - [`instruments`]: instrument name resolution
//! - [`orders`]: the shared order table
//! - [`session`]: session coordinator, transport, and event correlation
//! - [`commands`]: the interactive command set
//! - [`client`]: the interactive loop

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod commands;
pub mod config;
pub mod idgen;
pub mod instruments;
pub mod models;
pub mod orders;
pub mod session;
