use crate::protocol::error::Result;
use crate::protocol::{Request, Response};

/// JSON codec for protocol messages.
///
/// Encoding produces the bytes that travel after the length prefix; decoding
/// rejects anything that is not a well-formed envelope.
///
/// # Example
///
/// ```
/// use stance_common::protocol::{PostureCall, Request};
/// use stance_common::transport::JsonCodec;
///
/// let request = Request::new(PostureCall::GetPostureList);
/// let encoded = JsonCodec::encode_request(&request).unwrap();
/// let decoded = JsonCodec::decode_request(&encoded).unwrap();
/// assert_eq!(request, decoded);
/// ```
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a request to bytes.
    pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(request)?)
    }

    /// Decode a request from bytes.
    pub fn decode_request(data: &[u8]) -> Result<Request> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encode a response to bytes.
    pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(response)?)
    }

    /// Decode a response from bytes.
    pub fn decode_response(data: &[u8]) -> Result<Response> {
        Ok(serde_json::from_slice(data)?)
    }
}
