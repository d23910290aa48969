//! Session coordination.
//!
//! Owns the single transport connection to the venue. `open` performs the
//! login exchange, then splits the channel into two background tasks: a
//! writer that serializes outbound sends from an internal queue, and a
//! reader that feeds the [`EventCorrelator`] independently of the
//! interactive loop. Once closed, explicitly or by transport failure, the
//! session is never reopened; the process must restart to reconnect.

pub mod correlator;
pub mod messages;
pub mod transport;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::VenueConfig;
use crate::orders::OrderTable;
pub use correlator::EventCorrelator;
pub use messages::{InboundMessage, OutboundMessage};
pub use transport::{LineTransport, TransportError};

use transport::{TransportReader, TransportWriter};

/// Lifecycle of the single venue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// TCP connection being established.
    Connecting,
    /// Connection up, login exchange in flight.
    Authenticating,
    /// Logged in; orders may be sent.
    Active,
    /// Session over; never reopened within this process.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Authenticating => write!(f, "AUTHENTICATING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Errors from session establishment and use.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The connection could not be established or died during login.
    #[error("connection failed: {0}")]
    ConnectionFailed(#[from] TransportError),

    /// The venue rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The venue broke the login protocol.
    #[error("protocol error during login: {0}")]
    Protocol(String),

    /// The session is not ACTIVE; nothing was sent.
    #[error("session closed")]
    ClosedChannel,
}

/// The single authenticated session to the venue.
///
/// `send` is fail-fast and fire-and-forget: it enqueues for the writer task
/// without waiting for any network round-trip, and fails immediately when
/// the session is not ACTIVE. `close` is idempotent and safe from any path.
#[derive(Debug)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    outbound_tx: mpsc::UnboundedSender<OutboundMessage>,
    shutdown: CancellationToken,
}

impl Session {
    /// Open the session: connect, perform the login exchange, and start the
    /// inbound delivery path over `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConnectionFailed`] if the connection cannot
    /// be established or dies mid-handshake,
    /// [`SessionError::AuthenticationFailed`] if the venue rejects the
    /// credentials, and [`SessionError::Protocol`] if the venue answers the
    /// login with anything other than a login response.
    pub async fn open(venue: &VenueConfig, table: Arc<OrderTable>) -> Result<Self, SessionError> {
        let endpoint = venue.endpoint();

        info!(endpoint = %endpoint, state = %SessionState::Connecting, "Connecting to venue");
        let mut channel = LineTransport::connect(&endpoint).await?;

        info!(username = %venue.username, state = %SessionState::Authenticating, "Logging in");
        channel
            .send(&OutboundMessage::LoginRequest {
                username: venue.username.clone(),
                password: venue.password.clone(),
            })
            .await?;

        match channel.receive().await {
            Ok(InboundMessage::LoginAccepted { session }) => {
                info!(session = %session, state = %SessionState::Active, "Login accepted");
            }
            Ok(InboundMessage::LoginRejected { reason }) => {
                return Err(SessionError::AuthenticationFailed(reason));
            }
            Ok(other) => {
                return Err(SessionError::Protocol(format!(
                    "unexpected {} before login completion",
                    other.name()
                )));
            }
            Err(error) => return Err(SessionError::ConnectionFailed(error)),
        }

        let (reader, writer) = channel.into_split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SessionState::Active));
        let shutdown = CancellationToken::new();
        let correlator = EventCorrelator::new(table);

        tokio::spawn(run_reader(
            reader,
            correlator,
            Arc::clone(&state),
            shutdown.clone(),
        ));
        tokio::spawn(run_writer(
            writer,
            outbound_rx,
            Arc::clone(&state),
            shutdown.clone(),
        ));

        Ok(Self {
            state,
            outbound_tx,
            shutdown,
        })
    }

    /// Enqueue one outbound request for the writer task.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ClosedChannel`] if the session is not ACTIVE.
    pub fn send(&self, message: OutboundMessage) -> Result<(), SessionError> {
        if *self.state.lock() != SessionState::Active {
            return Err(SessionError::ClosedChannel);
        }
        self.outbound_tx
            .send(message)
            .map_err(|_| SessionError::ClosedChannel)
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Close the session. Idempotent; terminates both background tasks.
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            if *state == SessionState::Closed {
                return;
            }
            *state = SessionState::Closed;
        }
        self.shutdown.cancel();
        info!(state = %SessionState::Closed, "Session closed");
    }

    /// Completes once the session has fully shut down.
    pub async fn closed(&self) {
        self.shutdown.cancelled().await;
    }
}

/// Mark the session CLOSED after a transport failure, once.
fn mark_closed(state: &Mutex<SessionState>, shutdown: &CancellationToken, error: &TransportError) {
    {
        let mut guard = state.lock();
        if *guard != SessionState::Closed {
            *guard = SessionState::Closed;
            warn!(error = %error, "Session transport failed; session closed");
        }
    }
    shutdown.cancel();
}

async fn run_reader(
    mut reader: TransportReader,
    correlator: EventCorrelator,
    state: Arc<Mutex<SessionState>>,
    shutdown: CancellationToken,
) {
    debug!("Inbound delivery path started");
    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            result = reader.receive() => match result {
                Ok(message) => correlator.on_message(message),
                Err(error) if error.is_fatal() => {
                    mark_closed(&state, &shutdown, &error);
                    break;
                }
                Err(error) => {
                    warn!(error = %error, "Dropping malformed inbound message");
                }
            }
        }
    }
    debug!("Inbound delivery path stopped");
}

async fn run_writer(
    mut writer: TransportWriter,
    mut outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    state: Arc<Mutex<SessionState>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                writer.close().await;
                break;
            }
            maybe = outbound_rx.recv() => match maybe {
                Some(message) => {
                    if let Err(error) = writer.send(&message).await {
                        mark_closed(&state, &shutdown, &error);
                        break;
                    }
                }
                // Session handle dropped; nothing more to send.
                None => break,
            }
        }
    }
    debug!("Outbound writer stopped");
}
