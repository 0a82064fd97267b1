use serde::de::DeserializeOwned;
use tokio::net::TcpStream;

use stance_common::protocol::error::{Result, StanceError};
use stance_common::protocol::{PostureCall, Request, Speed};
use stance_common::transport::TcpTransport;

/// Proxy to a robot's posture service.
///
/// The proxy connects eagerly: if the service endpoint cannot be reached,
/// [`PostureProxy::connect`] fails with
/// [`ServiceUnavailable`](StanceError::ServiceUnavailable) and no proxy is
/// handed out. A constructed proxy therefore always has a live connection
/// behind it, which it reuses for every call.
///
/// Calls take `&mut self` because requests run in lockstep on the single
/// connection.
///
/// # Example
///
/// ```no_run
/// use stance_client::PostureProxy;
/// use stance_common::protocol::Speed;
///
/// # #[tokio::main]
/// # async fn main() -> stance_common::protocol::Result<()> {
/// let mut proxy = PostureProxy::connect("192.168.1.12:9559").await?;
///
/// for posture in proxy.posture_list().await? {
///     println!("{}", posture);
/// }
///
/// proxy.go_to_posture("Sit", Speed::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PostureProxy {
    addr: String,
    transport: TcpTransport,
    stream: TcpStream,
}

impl PostureProxy {
    /// Connects to a posture service with the default transport timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StanceError::ServiceUnavailable`] if the endpoint does not
    /// accept the connection.
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        Self::connect_with(addr, TcpTransport::new()).await
    }

    /// Connects using a caller-configured transport.
    pub async fn connect_with(addr: impl Into<String>, transport: TcpTransport) -> Result<Self> {
        let addr = addr.into();
        let stream = transport.connect(&addr).await?;

        Ok(Self {
            addr,
            transport,
            stream,
        })
    }

    /// The service endpoint this proxy is connected to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the names of every posture the service can reach, in the
    /// service's own order.
    pub async fn posture_list(&mut self) -> Result<Vec<String>> {
        self.call(PostureCall::GetPostureList).await
    }

    /// Returns the name of the posture the robot currently holds.
    pub async fn current_posture(&mut self) -> Result<String> {
        self.call(PostureCall::GetPosture).await
    }

    /// Commands a whole-body transition to `posture` at `speed`.
    ///
    /// Returns whether the service reports the posture as reached. A `false`
    /// is not a transport failure; it means the robot gave up (lost balance,
    /// actuator fault) and callers decide how loudly to report it.
    pub async fn go_to_posture(&mut self, posture: impl Into<String>, speed: Speed) -> Result<bool> {
        self.call(PostureCall::GoToPosture {
            posture: posture.into(),
            speed,
        })
        .await
    }

    /// Aborts any transition in progress.
    pub async fn stop_move(&mut self) -> Result<()> {
        let _: serde_json::Value = self.call(PostureCall::StopMove).await?;
        Ok(())
    }

    /// Sends one call over the held connection and decodes the answer.
    async fn call<T: DeserializeOwned>(&mut self, call: PostureCall) -> Result<T> {
        let request = Request::new(call);
        tracing::debug!(addr = %self.addr, call = ?request.call, "posture call");

        let response = self.transport.send_request(&mut self.stream, &request).await?;
        let value = response.into_result()?;

        serde_json::from_value(value)
            .map_err(|e| StanceError::MalformedResponse(format!("unexpected result payload: {}", e)))
    }
}
