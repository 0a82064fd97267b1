//! Stance Client
//!
//! Client library for talking to a robot's posture service. The entry point
//! is [`PostureProxy`], which owns one keep-alive connection to the service
//! and exposes the posture vocabulary as typed methods.

pub mod proxy;

pub use proxy::PostureProxy;
