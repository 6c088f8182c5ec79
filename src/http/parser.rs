use crate::error::{Result, ServeError};
use crate::http::request::Request;

pub const REQUEST_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Parses the request line out of a complete request.
///
/// The first line is split on single spaces and must yield exactly three
/// tokens. The token count is checked before the method, so a two-token
/// `POST /` is malformed rather than unsupported.
pub fn parse_request(raw: &str) -> Result<Request> {
    let request_line = raw.split("\r\n").next().unwrap_or_default();

    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method, path, version] = parts.as_slice() else {
        return Err(ServeError::MalformedRequest(request_line.to_string()));
    };

    let request = Request {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
    };

    if !request.is_retrieval() {
        return Err(ServeError::UnsupportedMethod(request.method));
    }

    Ok(request)
}

/// Returns the offset of the CRLFCRLF that ends the header section.
pub fn find_request_end(buf: &[u8]) -> Option<usize> {
    buf.windows(REQUEST_TERMINATOR.len())
        .position(|w| w == REQUEST_TERMINATOR)
}
