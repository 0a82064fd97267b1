pub mod error;
pub mod requests;
pub mod responses;
pub mod speed;

#[cfg(test)]
mod tests;

pub use error::{Result, StanceError};
pub use requests::{PostureCall, Request, RequestId};
pub use responses::Response;
pub use speed::Speed;
