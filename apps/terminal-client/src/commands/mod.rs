//! The interactive command set.
//!
//! Commands are a closed set matched on the first whitespace-separated
//! token of a line. Each variant validates its own arguments and executes
//! against the client context; argument failures become `Usage: …` lines
//! and a dead session becomes `error: Connection closed`. No command ever
//! leaves the order table partially updated.

pub mod format;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::client::TerminalClient;
use crate::models::{ClientOrderId, Order, OrderSide};
use crate::session::OutboundMessage;

/// Recoverable command failures, rendered as a single diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Malformed arguments; shows the command's usage string.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// The session is closed; nothing was submitted.
    #[error("error: Connection closed")]
    ConnectionClosed,

    /// Anything else worth a diagnostic line.
    #[error("error: {0}")]
    Failed(String),
}

/// What the interactive loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Print this listing or confirmation and keep going.
    Output(String),
    /// Close the session and leave the loop.
    Exit,
}

/// The closed set of interactive commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `buy`/`sell`: enter an order on the given side.
    Enter(OrderSide),
    /// `cancel`: request cancellation of an open order.
    Cancel,
    /// `orders`: list open orders.
    Orders,
    /// `trades`: list executions.
    Trades,
    /// `errors`: list venue rejects and protocol anomalies.
    Errors,
    /// `help`: list commands.
    Help,
    /// `exit`: close the session and leave.
    Exit,
}

/// Every command, in help-listing order.
pub const COMMANDS: [Command; 8] = [
    Command::Enter(OrderSide::Buy),
    Command::Enter(OrderSide::Sell),
    Command::Cancel,
    Command::Orders,
    Command::Trades,
    Command::Errors,
    Command::Help,
    Command::Exit,
];

impl Command {
    /// Look up a command by its name token.
    #[must_use]
    pub fn find(name: &str) -> Option<Self> {
        COMMANDS.into_iter().find(|command| command.name() == name)
    }

    /// The name token that selects this command.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enter(OrderSide::Buy) => "buy",
            Self::Enter(OrderSide::Sell) => "sell",
            Self::Cancel => "cancel",
            Self::Orders => "orders",
            Self::Trades => "trades",
            Self::Errors => "errors",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Usage string shown on malformed arguments.
    #[must_use]
    pub const fn usage(self) -> &'static str {
        match self {
            Self::Enter(OrderSide::Buy) => "buy <instrument> <quantity> <price>",
            Self::Enter(OrderSide::Sell) => "sell <instrument> <quantity> <price>",
            Self::Cancel => "cancel <order-id>",
            Self::Orders => "orders",
            Self::Trades => "trades",
            Self::Errors => "errors",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// One-line description for the help listing.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Enter(OrderSide::Buy) => "Enter a buy order",
            Self::Enter(OrderSide::Sell) => "Enter a sell order",
            Self::Cancel => "Cancel an open order",
            Self::Orders => "List open orders",
            Self::Trades => "List executions",
            Self::Errors => "List rejects and protocol anomalies",
            Self::Help => "Show this help",
            Self::Exit => "Close the session and exit",
        }
    }

    /// Execute the command against the client context.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for malformed arguments or a closed
    /// session; both are recoverable and the loop continues.
    pub fn execute(
        self,
        client: &mut TerminalClient,
        args: &[&str],
    ) -> Result<CommandOutcome, CommandError> {
        match self {
            Self::Enter(side) => execute_enter(self, client, side, args),
            Self::Cancel => execute_cancel(self, client, args),
            Self::Orders => Ok(CommandOutcome::Output(format::format_orders(
                &client.orders().open_orders(),
            ))),
            Self::Trades => Ok(CommandOutcome::Output(format::format_trades(
                &client.orders().fills(),
            ))),
            Self::Errors => Ok(CommandOutcome::Output(format::format_errors(
                &client.orders().rejected_orders(),
                &client.orders().anomalies(),
            ))),
            Self::Help => Ok(CommandOutcome::Output(help_text())),
            Self::Exit => Ok(CommandOutcome::Exit),
        }
    }
}

fn execute_enter(
    command: Command,
    client: &mut TerminalClient,
    side: OrderSide,
    args: &[&str],
) -> Result<CommandOutcome, CommandError> {
    let usage = command.usage();
    let &[instrument, quantity, price] = args else {
        return Err(CommandError::Usage(usage));
    };

    let instrument = client
        .instruments()
        .resolve(instrument)
        .ok_or(CommandError::Usage(usage))?
        .clone();
    let quantity = parse_quantity(quantity).ok_or(CommandError::Usage(usage))?;
    let price = parse_price(price).ok_or(CommandError::Usage(usage))?;

    let client_order_id = client.next_order_id();
    let order = Order::new(
        client_order_id.clone(),
        instrument.clone(),
        side,
        quantity,
        price,
    );

    if let Err(error) = client.orders().insert(order) {
        return Err(CommandError::Failed(error.to_string()));
    }

    let request = OutboundMessage::EnterOrder {
        client_order_id: client_order_id.clone(),
        instrument,
        side,
        quantity,
        price,
    };
    if client.session().send(request).is_err() {
        // All-or-nothing: the venue never saw this order.
        client.orders().remove(&client_order_id);
        return Err(CommandError::ConnectionClosed);
    }

    Ok(CommandOutcome::Output(format!("Order ID: {client_order_id}")))
}

fn execute_cancel(
    command: Command,
    client: &mut TerminalClient,
    args: &[&str],
) -> Result<CommandOutcome, CommandError> {
    let usage = command.usage();
    let &[id] = args else {
        return Err(CommandError::Usage(usage));
    };

    let client_order_id = ClientOrderId::new(id);
    match client.orders().get(&client_order_id) {
        Some(order) if !order.status.is_terminal() => {}
        _ => return Err(CommandError::Usage(usage)),
    }

    client
        .session()
        .send(OutboundMessage::CancelOrder {
            client_order_id: client_order_id.clone(),
        })
        .map_err(|_| CommandError::ConnectionClosed)?;

    // Status changes only when the venue's canceled/rejected event arrives.
    Ok(CommandOutcome::Output(format!(
        "Cancel requested: {client_order_id}"
    )))
}

fn parse_quantity(value: &str) -> Option<u64> {
    value.parse().ok().filter(|quantity| *quantity > 0)
}

fn parse_price(value: &str) -> Option<Decimal> {
    value.parse().ok().filter(|price| *price > Decimal::ZERO)
}

fn help_text() -> String {
    let mut lines = vec!["Commands:".to_string()];
    for command in COMMANDS {
        lines.push(format!("  {:<38}  {}", command.usage(), command.description()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_matches_every_command_name() {
        for command in COMMANDS {
            assert_eq!(Command::find(command.name()), Some(command));
        }
        assert_eq!(Command::find("bye"), None);
        // Matching is exact; no case folding on command names.
        assert_eq!(Command::find("BUY"), None);
    }

    #[test]
    fn enter_commands_carry_their_side() {
        assert_eq!(Command::find("buy"), Some(Command::Enter(OrderSide::Buy)));
        assert_eq!(Command::find("sell"), Some(Command::Enter(OrderSide::Sell)));
    }

    #[test]
    fn parse_quantity_requires_positive_integer() {
        assert_eq!(parse_quantity("100"), Some(100));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("-5"), None);
        assert_eq!(parse_quantity("12.5"), None);
        assert_eq!(parse_quantity("lots"), None);
    }

    #[test]
    fn parse_price_requires_positive_decimal() {
        assert_eq!(parse_price("10.50"), Some(Decimal::new(1050, 2)));
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price("-1.25"), None);
        assert_eq!(parse_price("cheap"), None);
    }

    #[test]
    fn usage_strings_name_the_command() {
        assert_eq!(
            Command::Enter(OrderSide::Buy).usage(),
            "buy <instrument> <quantity> <price>"
        );
        assert_eq!(Command::Cancel.usage(), "cancel <order-id>");
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for command in COMMANDS {
            assert!(help.contains(command.usage()));
            assert!(help.contains(command.description()));
        }
    }

    #[test]
    fn command_errors_render_as_diagnostic_lines() {
        assert_eq!(
            CommandError::Usage("cancel <order-id>").to_string(),
            "Usage: cancel <order-id>"
        );
        assert_eq!(
            CommandError::ConnectionClosed.to_string(),
            "error: Connection closed"
        );
    }
}
