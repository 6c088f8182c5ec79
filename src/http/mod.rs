//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to answer one GET per connection.
//!
//! # Architecture
//!
//! - **`connection`**: Reads one request, runs it through the pipeline, writes the reply
//! - **`parser`**: Request line parsing and request terminator detection
//! - **`request`**: The parsed request line
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until CRLFCRLF
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut down write half
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! Any error along the way drops the connection without a response.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docserve::config::Config;
//! use docserve::http::connection::Connection;
//! use docserve::server::Pipeline;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:10000").await?;
//!     let pipeline = Arc::new(Pipeline::from_config(&Config::default()));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, pipeline.clone());
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
