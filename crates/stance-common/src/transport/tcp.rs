use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::protocol::error::{Result, StanceError};
use crate::protocol::{Request, Response};
use crate::transport::codec::JsonCodec;
use crate::transport::MAX_MESSAGE_SIZE;

/// Default timeout for TCP operations (5 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Async TCP transport for talking to a posture service.
///
/// Every operation (connect, write, read) is bounded by the transport's
/// timeout, so a wedged service surfaces as an error instead of hanging the
/// console.
///
/// # Wire Protocol
///
/// Messages are sent with a 4-byte length prefix (big-endian u32) followed
/// by the JSON-encoded data:
///
/// ```text
/// [4-byte length] [JSON data]
/// ```
///
/// # Example
///
/// ```no_run
/// use stance_common::protocol::{PostureCall, Request};
/// use stance_common::transport::TcpTransport;
///
/// # #[tokio::main]
/// # async fn main() -> stance_common::protocol::Result<()> {
/// let transport = TcpTransport::new();
/// let mut stream = transport.connect("127.0.0.1:9559").await?;
///
/// let request = Request::new(PostureCall::GetPostureList);
/// let response = transport.send_request(&mut stream, &request).await?;
/// println!("{:?}", response.into_result()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpTransport {
    io_timeout: Duration,
}

impl TcpTransport {
    /// Creates a transport with the default 5 second timeout.
    pub fn new() -> Self {
        Self {
            io_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a transport with a caller-chosen timeout.
    pub fn with_timeout(io_timeout: Duration) -> Self {
        Self { io_timeout }
    }

    /// Connects to a posture service endpoint.
    ///
    /// # Arguments
    ///
    /// * `addr` - The address to connect to (e.g., "192.168.1.12:9559")
    ///
    /// # Errors
    ///
    /// Any failure to establish the connection, including a connect that
    /// outlives the timeout, is reported as
    /// [`StanceError::ServiceUnavailable`] so callers can exit immediately
    /// instead of issuing calls that can never succeed.
    pub async fn connect(&self, addr: &str) -> Result<TcpStream> {
        match timeout(self.io_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(StanceError::ServiceUnavailable {
                addr: addr.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(StanceError::ServiceUnavailable {
                addr: addr.to_string(),
                reason: format!("connect timed out after {}ms", self.io_timeout.as_millis()),
            }),
        }
    }

    /// Sends a request and waits for the matching response.
    ///
    /// Connections are keep-alive and lockstep: the next request goes out
    /// only after the previous response has been read.
    ///
    /// # Arguments
    ///
    /// * `stream` - The connected stream to use
    /// * `request` - The request to send
    pub async fn send_request(&self, stream: &mut TcpStream, request: &Request) -> Result<Response> {
        let encoded = JsonCodec::encode_request(request)?;
        self.send_message(stream, &encoded).await?;
        let response_data = self.receive_message(stream).await?;
        JsonCodec::decode_response(&response_data)
    }

    /// Sends a message with length prefix.
    ///
    /// Wire format: `[4-byte length as u32 big-endian] + [data]`
    pub async fn send_message(&self, stream: &mut TcpStream, data: &[u8]) -> Result<()> {
        let len = data.len() as u32;

        self.timed(stream.write_all(&len.to_be_bytes()), "writing length prefix")
            .await?;
        self.timed(stream.write_all(data), "writing data").await?;
        self.timed(stream.flush(), "flushing stream").await?;

        Ok(())
    }

    /// Receives a message with length prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Reading the length prefix fails
    /// - The announced length exceeds the 1 MiB limit
    /// - Reading the data fails
    pub async fn receive_message(&self, stream: &mut TcpStream) -> Result<Vec<u8>> {
        let mut len_buf = [0u8; 4];
        self.timed(stream.read_exact(&mut len_buf), "reading length prefix")
            .await?;

        let len = u32::from_be_bytes(len_buf) as usize;

        // Validate length before allocating
        if len > MAX_MESSAGE_SIZE {
            return Err(StanceError::MalformedResponse(format!(
                "message too large: {} bytes (max {} bytes)",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        self.timed(stream.read_exact(&mut buf), "reading data").await?;

        Ok(buf)
    }

    /// Runs one I/O operation under the transport timeout.
    async fn timed<T>(&self, op: impl Future<Output = std::io::Result<T>>, context: &str) -> Result<T> {
        match timeout(self.io_timeout, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.map_io_error(e, context)),
            Err(_) => Err(StanceError::Timeout(self.io_timeout.as_millis() as u64)),
        }
    }

    /// Map IO errors to protocol error variants
    ///
    /// - Timeouts/would block -> `Timeout`
    /// - Connection drops -> `Connection`
    /// - Other IO errors -> `Io`
    fn map_io_error(&self, err: std::io::Error, context: &str) -> StanceError {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                StanceError::Timeout(self.io_timeout.as_millis() as u64)
            }
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::UnexpectedEof => {
                StanceError::Connection(format!("{}: connection lost", context))
            }
            _ => StanceError::Io(err),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PostureCall;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_to_dead_port_reports_service_unavailable() {
        // Bind and immediately drop to find a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = TcpTransport::new().connect(&addr).await.unwrap_err();
        match err {
            StanceError::ServiceUnavailable { addr: reported, .. } => assert_eq!(reported, addr),
            other => panic!("expected ServiceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_response_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Drain the request, then announce an absurdly large reply
            let mut len_buf = [0u8; 4];
            stream.read_exact(&mut len_buf).await.unwrap();
            let mut buf = vec![0u8; u32::from_be_bytes(len_buf) as usize];
            stream.read_exact(&mut buf).await.unwrap();

            stream.write_all(&u32::MAX.to_be_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });

        let transport = TcpTransport::new();
        let mut stream = transport.connect(&addr).await.unwrap();
        let err = transport
            .send_request(&mut stream, &Request::new(PostureCall::GetPostureList))
            .await
            .unwrap_err();
        assert!(matches!(err, StanceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unanswered_request_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        // Accept and hold the connection open without ever replying
        let accept = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let transport = TcpTransport::with_timeout(Duration::from_millis(100));
        let mut stream = transport.connect(&addr).await.unwrap();
        let err = transport
            .send_request(&mut stream, &Request::new(PostureCall::GetPosture))
            .await
            .unwrap_err();
        assert!(matches!(err, StanceError::Timeout(100)));

        accept.abort();
    }
}
