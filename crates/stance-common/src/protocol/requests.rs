use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use super::speed::Speed;

pub type RequestId = u64;

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// One remote operation of the posture service.
///
/// Serialized with the method name as a tag and the parameters alongside it,
/// so a transition travels as:
///
/// ```text
/// {"method": "go_to_posture", "params": {"posture": "Sit", "speed": 0.5}}
/// ```
///
/// Calls without parameters carry the tag alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum PostureCall {
    /// Ask for the names of every posture the service can reach.
    GetPostureList,
    /// Ask for the posture the robot currently holds.
    GetPosture,
    /// Command a whole-body transition to the named posture.
    GoToPosture { posture: String, speed: Speed },
    /// Abort any transition in progress.
    StopMove,
}

/// A call envelope sent from a client to the posture service.
///
/// Connections are keep-alive and requests run in lockstep, so the id is
/// mostly useful in logs; it is generated from a process-local counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub id: RequestId,
    #[serde(flatten)]
    pub call: PostureCall,
}

impl Request {
    pub fn new(call: PostureCall) -> Self {
        Request {
            id: next_request_id(),
            call,
        }
    }
}

fn next_request_id() -> RequestId {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
