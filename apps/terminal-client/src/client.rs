//! The interactive loop.
//!
//! Reads one line at a time from the operator (the only place in the
//! process that blocks for input) and dispatches it to the command set.
//! Venue events arrive on the session's delivery path concurrently; the two
//! only meet at the order table. Every way out of the loop (exit command,
//! end of input, interrupt) closes the session before returning.

use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::commands::{Command, CommandOutcome};
use crate::config::VenueConfig;
use crate::idgen::OrderIdGenerator;
use crate::instruments::Instruments;
use crate::models::ClientOrderId;
use crate::orders::OrderTable;
use crate::session::{Session, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// The assembled client: instruments, identifier generator, order table,
/// and the one venue session.
#[derive(Debug)]
pub struct TerminalClient {
    instruments: Instruments,
    id_generator: OrderIdGenerator,
    orders: Arc<OrderTable>,
    session: Session,
}

impl TerminalClient {
    /// Open the venue session and assemble the client around it.
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] from the connection or login exchange.
    pub async fn open(
        venue: &VenueConfig,
        instruments: Instruments,
    ) -> Result<Self, SessionError> {
        let orders = Arc::new(OrderTable::new());
        let session = Session::open(venue, Arc::clone(&orders)).await?;
        Ok(Self::new(instruments, orders, session))
    }

    /// Assemble a client from already-built parts.
    #[must_use]
    pub fn new(instruments: Instruments, orders: Arc<OrderTable>, session: Session) -> Self {
        Self {
            instruments,
            id_generator: OrderIdGenerator::new(),
            orders,
            session,
        }
    }

    /// The instrument table.
    #[must_use]
    pub fn instruments(&self) -> &Instruments {
        &self.instruments
    }

    /// The shared order table.
    #[must_use]
    pub fn orders(&self) -> &OrderTable {
        &self.orders
    }

    /// The venue session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Allocate the next client order identifier.
    pub fn next_order_id(&mut self) -> ClientOrderId {
        self.id_generator.next_id()
    }

    /// Run the interactive loop until `exit`, end of input, or interrupt.
    ///
    /// The session is closed on every way out, including error returns.
    ///
    /// # Errors
    ///
    /// Returns an IO error if reading input or writing the prompt fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let result = self.run_loop().await;
        self.session.close();
        result
    }

    async fn run_loop(&mut self) -> std::io::Result<()> {
        println!("Type 'help' for help.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    info!("Interrupt received");
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line? {
                        // End of input.
                        None => return Ok(()),
                        Some(line) => {
                            if self.handle_line(&line) == LoopControl::Exit {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> LoopControl {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return LoopControl::Continue;
        };
        let args: Vec<&str> = tokens.collect();

        let Some(command) = Command::find(name) else {
            println!("error: Unknown command");
            return LoopControl::Continue;
        };

        match command.execute(self, &args) {
            Ok(CommandOutcome::Exit) => LoopControl::Exit,
            Ok(CommandOutcome::Output(output)) => {
                println!("{output}");
                LoopControl::Continue
            }
            Err(error) => {
                println!("{error}");
                LoopControl::Continue
            }
        }
    }
}
