//! Stance Transport Layer
//!
//! This module provides the TCP transport used to talk to a posture service,
//! plus the server side used by the simulator.
//!
//! # Architecture
//!
//! - **Transport**: TCP with keep-alive connections, one request in flight
//!   at a time per connection
//! - **Codec**: JSON serialization for protocol messages
//! - **Wire Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//!
//! # Components
//!
//! - [`JsonCodec`]: Encode/decode protocol messages to JSON
//! - [`TcpTransport`]: Async TCP transport (used by clients)
//! - [`TcpServer`]: Async TCP server (used by the simulator)
//!
//! # Message Size Limits
//!
//! Both sides refuse messages larger than 1 MiB. Real posture traffic is a
//! few hundred bytes; the cap only guards allocation against garbage length
//! prefixes.
//!
//! # Example
//!
//! ```no_run
//! use stance_common::protocol::{PostureCall, Request};
//! use stance_common::transport::TcpTransport;
//!
//! # #[tokio::main]
//! # async fn main() -> stance_common::protocol::Result<()> {
//! let transport = TcpTransport::new();
//! let mut stream = transport.connect("127.0.0.1:9559").await?;
//!
//! let request = Request::new(PostureCall::GetPostureList);
//! let response = transport.send_request(&mut stream, &request).await?;
//! println!("{:?}", response.into_result()?);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod tcp;
pub mod tcp_server;

pub use codec::JsonCodec;
pub use tcp::TcpTransport;
pub use tcp_server::TcpServer;

/// Maximum wire message size (1 MiB).
pub(crate) const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
