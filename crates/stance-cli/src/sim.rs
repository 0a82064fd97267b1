//! Posture service simulator.
//!
//! Speaks the same wire protocol as a real robot so the console can be
//! exercised without hardware. Transitions are instantaneous: a `goto`
//! updates the current posture and reports it as reached.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::json;
use tokio::sync::Mutex;

use stance_common::protocol::{PostureCall, Request, Response};
use stance_common::transport::TcpServer;

/// The posture vocabulary of a standard NAO-class humanoid.
pub const DEFAULT_POSTURES: [&str; 8] = [
    "Stand",
    "StandInit",
    "StandZero",
    "Crouch",
    "Sit",
    "SitRelax",
    "LyingBelly",
    "LyingBack",
];

/// Mutable simulator state: the posture table and the posture currently held.
struct SimState {
    postures: Vec<String>,
    current: String,
}

impl SimState {
    fn handle(&mut self, request: Request) -> Response {
        match request.call {
            PostureCall::GetPostureList => Response::ok(request.id, json!(self.postures)),
            PostureCall::GetPosture => Response::ok(request.id, json!(self.current)),
            PostureCall::GoToPosture { posture, speed } => {
                // Posture names are matched exactly, like the real service
                if self.postures.iter().any(|known| *known == posture) {
                    tracing::info!(
                        from = %self.current,
                        to = %posture,
                        speed = speed.get(),
                        "posture transition"
                    );
                    self.current = posture;
                    Response::ok(request.id, json!(true))
                } else {
                    Response::fault(
                        request.id,
                        format!(
                            "unknown posture \"{}\" (known postures: {})",
                            posture,
                            self.postures.join(", ")
                        ),
                    )
                }
            }
            PostureCall::StopMove => {
                tracing::info!(current = %self.current, "stop requested");
                Response::ok(request.id, json!(null))
            }
        }
    }
}

/// Runs the simulator until the process is killed.
///
/// # Arguments
///
/// * `bind` - Address to listen on (e.g., "127.0.0.1:9559")
/// * `postures` - The posture table to serve, in listing order
/// * `initial` - Posture the robot starts in; defaults to the first table entry
pub async fn run_sim(bind: String, postures: Vec<String>, initial: Option<String>) -> Result<()> {
    if postures.is_empty() {
        bail!("posture table must not be empty");
    }

    let current = match initial {
        Some(name) => {
            if !postures.contains(&name) {
                bail!(
                    "initial posture '{}' is not in the posture table ({})",
                    name,
                    postures.join(", ")
                );
            }
            name
        }
        None => postures[0].clone(),
    };

    let server = TcpServer::bind(&bind).await?;
    let addr = server.local_addr()?;
    tracing::info!(%addr, postures = postures.len(), current = %current, "posture service simulator listening");

    let state = Arc::new(Mutex::new(SimState { postures, current }));

    server
        .serve(move |request| {
            let state = Arc::clone(&state);
            async move {
                let mut state = state.lock().await;
                Ok(state.handle(request))
            }
        })
        .await?;

    Ok(())
}
