//! docserve - minimal HTTP/1.1 document server
//!
//! Serves files, directory listings and allow-listed script output from a
//! document root, one connection at a time.

pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod server;
