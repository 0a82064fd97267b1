//! Stance Common Types and Transport
//!
//! This crate provides the protocol definitions and TCP transport layer for
//! stance, a console for the posture subsystem of a humanoid robot.
//!
//! # Overview
//!
//! The robot exposes its posture service on a middleware endpoint (by
//! convention port 9559). Clients connect over TCP, ask for the posture
//! vocabulary or the current posture, and command whole-body transitions.
//! This crate contains the pieces shared by the client library, the command
//! line binary and the service simulator:
//!
//! - **Protocol Layer**: the posture call vocabulary, request/response
//!   envelopes and error handling
//! - **Transport Layer**: TCP communication with JSON serialization
//!
//! # Architecture
//!
//! The wire protocol is deliberately small:
//! - **Transport**: TCP with keep-alive connections
//! - **Serialization**: JSON
//! - **Message Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//! - **Max Message Size**: 1 MiB (posture traffic is tiny; the cap guards
//!   against garbage length prefixes)
//!
//! # Components
//!
//! - [`protocol`] - Posture calls, envelopes and errors
//! - [`transport`] - TCP transport, server and codec
//!
//! # Example
//!
//! ```
//! use stance_common::{PostureCall, Request, Response, Speed};
//! use serde_json::json;
//!
//! // Command a transition at the conventional half speed
//! let request = Request::new(PostureCall::GoToPosture {
//!     posture: "Sit".to_string(),
//!     speed: Speed::default(),
//! });
//!
//! // The service acknowledges with whether the posture was reached
//! let response = Response::ok(request.id, json!(true));
//! assert_eq!(response.into_result().unwrap(), json!(true));
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
