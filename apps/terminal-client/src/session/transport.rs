//! Session transport: an ordered message channel to the venue.
//!
//! The venue's order-entry channel is a TCP connection carrying one JSON
//! message per line. Framing, heartbeats, and sequencing below this layer
//! are the transport's problem; this module only guarantees ordered
//! delivery of whole messages and a clean split into independently owned
//! read and write halves once the login exchange completes.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use super::messages::{InboundMessage, OutboundMessage};
use thiserror::Error;

/// Errors from the session transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to establish the TCP connection.
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        /// The `host:port` endpoint.
        endpoint: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Read or write on an established connection failed.
    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),

    /// A received line was not a valid message.
    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    /// The venue closed the channel.
    #[error("connection closed by venue")]
    Closed,
}

impl TransportError {
    /// Returns true if the connection is unusable after this error.
    ///
    /// Codec errors are per-message: the channel remains ordered and
    /// usable, the offending message is dropped.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Codec(_))
    }
}

/// Connected order-entry channel, prior to the read/write split.
#[derive(Debug)]
pub struct LineTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl LineTransport {
    /// Open a TCP connection to the venue.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the connection cannot be
    /// established.
    pub async fn connect(endpoint: &str) -> Result<Self, TransportError> {
        let stream =
            TcpStream::connect(endpoint)
                .await
                .map_err(|source| TransportError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
        stream.set_nodelay(true)?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        send_message(&mut self.writer, message).await
    }

    /// Receive the next message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] on end of stream, an IO error on
    /// read failure, or a codec error for a malformed line.
    pub async fn receive(&mut self) -> Result<InboundMessage, TransportError> {
        receive_message(&mut self.reader).await
    }

    /// Split into independently owned read and write halves.
    #[must_use]
    pub fn into_split(self) -> (TransportReader, TransportWriter) {
        (
            TransportReader {
                reader: self.reader,
            },
            TransportWriter {
                writer: self.writer,
            },
        )
    }
}

/// Read half of the channel, owned by the inbound delivery task.
#[derive(Debug)]
pub struct TransportReader {
    reader: BufReader<OwnedReadHalf>,
}

impl TransportReader {
    /// Receive the next message.
    ///
    /// # Errors
    ///
    /// Same contract as [`LineTransport::receive`].
    pub async fn receive(&mut self) -> Result<InboundMessage, TransportError> {
        receive_message(&mut self.reader).await
    }
}

/// Write half of the channel, owned by the outbound writer task.
#[derive(Debug)]
pub struct TransportWriter {
    writer: OwnedWriteHalf,
}

impl TransportWriter {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        send_message(&mut self.writer, message).await
    }

    /// Shut down the write direction, signalling the venue we are done.
    pub async fn close(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}

async fn send_message(
    writer: &mut OwnedWriteHalf,
    message: &OutboundMessage,
) -> Result<(), TransportError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    Ok(())
}

async fn receive_message(
    reader: &mut BufReader<OwnedReadHalf>,
) -> Result<InboundMessage, TransportError> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        return Err(TransportError::Closed);
    }

    let message = serde_json::from_str(line.trim_end())?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientOrderId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn connected_pair() -> (LineTransport, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();

        let (transport, peer) =
            tokio::join!(LineTransport::connect(&endpoint), listener.accept());
        (transport.unwrap(), peer.unwrap().0)
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        // Port 1 on loopback is assumed unbound.
        let result = LineTransport::connect("127.0.0.1:1").await;
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[tokio::test]
    async fn sends_one_message_per_line() {
        let (mut transport, mut peer) = connected_pair().await;

        transport
            .send(&OutboundMessage::CancelOrder {
                client_order_id: ClientOrderId::new("093015-000001"),
            })
            .await
            .unwrap();

        let mut buffer = vec![0u8; 256];
        let read = peer.read(&mut buffer).await.unwrap();
        let line = String::from_utf8_lossy(&buffer[..read]);
        assert!(line.ends_with('\n'));
        assert!(line.contains(r#""type":"cancel_order""#));
    }

    #[tokio::test]
    async fn receives_messages_in_delivery_order() {
        let (mut transport, mut peer) = connected_pair().await;

        peer.write_all(
            b"{\"type\":\"order_accepted\",\"client_order_id\":\"a\"}\n\
              {\"type\":\"order_canceled\",\"client_order_id\":\"a\",\"canceled_quantity\":5}\n",
        )
        .await
        .unwrap();

        assert_eq!(transport.receive().await.unwrap().name(), "order_accepted");
        assert_eq!(transport.receive().await.unwrap().name(), "order_canceled");
    }

    #[tokio::test]
    async fn end_of_stream_is_closed() {
        let (mut transport, peer) = connected_pair().await;
        drop(peer);

        let result = transport.receive().await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn malformed_line_is_nonfatal_codec_error() {
        let (mut transport, mut peer) = connected_pair().await;

        peer.write_all(b"not json\n{\"type\":\"order_accepted\",\"client_order_id\":\"a\"}\n")
            .await
            .unwrap();

        let error = transport.receive().await.unwrap_err();
        assert!(matches!(error, TransportError::Codec(_)));
        assert!(!error.is_fatal());

        // The channel stays usable for the next message.
        assert_eq!(transport.receive().await.unwrap().name(), "order_accepted");
    }
}
