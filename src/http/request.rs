/// The only method this server answers.
pub const RETRIEVAL_METHOD: &str = "GET";

/// Represents a parsed HTTP request line.
///
/// Only the first line of the request is looked at. Headers and any
/// request body are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method, as sent
    pub method: String,
    /// The request path (e.g., "/index.html"), untouched
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
}

impl Request {
    /// Returns true if this is a retrieval (GET) request.
    ///
    /// Comparison is case-sensitive, like the request line itself.
    pub fn is_retrieval(&self) -> bool {
        self.method == RETRIEVAL_METHOD
    }
}
