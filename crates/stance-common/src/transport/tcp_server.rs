use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::protocol::error::{Result, StanceError};
use crate::protocol::{Request, Response};
use crate::transport::codec::JsonCodec;
use crate::transport::MAX_MESSAGE_SIZE;

/// Async TCP server speaking the posture service protocol.
///
/// Used by the simulator to stand in for a robot. Connections are processed
/// concurrently; each connection serves multiple requests (keep-alive) until
/// the peer closes it.
pub struct TcpServer {
    listener: TcpListener,
}

impl TcpServer {
    /// Creates a server bound to the specified address.
    ///
    /// # Arguments
    /// * `bind_addr` - The address to bind to (e.g., "127.0.0.1:9559")
    pub async fn bind(bind_addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
            StanceError::Connection(format!("failed to bind to {}: {}", bind_addr, e))
        })?;

        Ok(Self { listener })
    }

    /// Gets the actual bound address.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| StanceError::Connection(format!("failed to get local addr: {}", e)))
    }

    /// Runs the server with the given request handler.
    ///
    /// Accepts connections in a loop and spawns a task per connection. The
    /// handler is invoked once per decoded request; a handler error is
    /// converted into a fault response rather than dropping the connection.
    ///
    /// # Arguments
    /// * `handler` - Function to handle each request
    pub async fn serve<F, Fut>(&self, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Response>> + Send + 'static,
    {
        let handler = Arc::new(handler);

        loop {
            let (stream, peer_addr) = self.listener.accept().await.map_err(|e| {
                StanceError::Connection(format!("failed to accept connection: {}", e))
            })?;

            tracing::debug!(%peer_addr, "connection established");

            let handler = handler.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, handler).await {
                    tracing::warn!(%peer_addr, error = %e, "connection error");
                }
            });
        }
    }
}

/// Serve a single connection until the peer closes it.
async fn handle_connection<F, Fut>(mut stream: TcpStream, handler: Arc<F>) -> Result<()>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Response>> + Send + 'static,
{
    loop {
        // Read length prefix
        let mut len_buf = [0u8; 4];
        match stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // Connection closed by peer
                tracing::debug!("connection closed by peer");
                return Ok(());
            }
            Err(e) => {
                return Err(StanceError::Connection(format!(
                    "failed to read length: {}",
                    e
                )));
            }
        }

        let len = u32::from_be_bytes(len_buf) as usize;

        // Validate length before allocating
        if len > MAX_MESSAGE_SIZE {
            return Err(StanceError::Connection(format!(
                "refusing message of {} bytes (max {} bytes)",
                len, MAX_MESSAGE_SIZE
            )));
        }

        // Read request data
        let mut buf = vec![0u8; len];
        stream
            .read_exact(&mut buf)
            .await
            .map_err(|e| StanceError::Connection(format!("failed to read data: {}", e)))?;

        // Decode request; answer garbage with a fault instead of hanging up
        let request = match JsonCodec::decode_request(&buf) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode request");
                let _ = send_response(&mut stream, &Response::fault(0, e.to_string())).await;
                continue;
            }
        };

        let request_id = request.id;
        let response = match handler(request).await {
            Ok(resp) => resp,
            Err(e) => Response::fault(request_id, e.to_string()),
        };

        send_response(&mut stream, &response).await?;
    }
}

/// Send a response with length prefix
async fn send_response(stream: &mut TcpStream, response: &Response) -> Result<()> {
    let encoded = JsonCodec::encode_response(response)?;

    let len = encoded.len() as u32;
    stream
        .write_all(&len.to_be_bytes())
        .await
        .map_err(|e| StanceError::Connection(format!("failed to send response length: {}", e)))?;
    stream
        .write_all(&encoded)
        .await
        .map_err(|e| StanceError::Connection(format!("failed to send response data: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| StanceError::Connection(format!("failed to flush response: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PostureCall;
    use crate::transport::TcpTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_bind_to_ephemeral_port() {
        let server = TcpServer::bind("127.0.0.1:0").await.unwrap();
        assert!(server.local_addr().is_ok());
    }

    #[tokio::test]
    async fn test_round_trip_through_the_server() {
        let server = TcpServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            server
                .serve(|request| async move {
                    Ok(match request.call {
                        PostureCall::GetPostureList => {
                            Response::ok(request.id, json!(["Stand", "Sit"]))
                        }
                        _ => Response::fault(request.id, "unsupported"),
                    })
                })
                .await
        });

        let transport = TcpTransport::new();
        let mut stream = transport.connect(&addr).await.unwrap();

        let response = transport
            .send_request(&mut stream, &Request::new(PostureCall::GetPostureList))
            .await
            .unwrap();
        assert_eq!(response.into_result().unwrap(), json!(["Stand", "Sit"]));
    }

    #[tokio::test]
    async fn test_handler_error_becomes_a_fault_response() {
        let server = TcpServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            server
                .serve(|request| async move {
                    Ok(Response::fault(request.id, "unknown posture \"Moonwalk\""))
                })
                .await
        });

        let transport = TcpTransport::new();
        let mut stream = transport.connect(&addr).await.unwrap();

        let request = Request::new(PostureCall::GoToPosture {
            posture: "Moonwalk".to_string(),
            speed: crate::protocol::Speed::default(),
        });
        let err = transport
            .send_request(&mut stream, &request)
            .await
            .unwrap()
            .into_result()
            .unwrap_err();
        match err {
            StanceError::Fault(message) => assert!(message.contains("Moonwalk")),
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_survives_multiple_requests() {
        let server = TcpServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            server
                .serve(|request| async move { Ok(Response::ok(request.id, json!("Stand"))) })
                .await
        });

        let transport = TcpTransport::new();
        let mut stream = transport.connect(&addr).await.unwrap();

        for _ in 0..3 {
            let response = transport
                .send_request(&mut stream, &Request::new(PostureCall::GetPosture))
                .await
                .unwrap();
            assert_eq!(response.into_result().unwrap(), json!("Stand"));
        }
    }
}
