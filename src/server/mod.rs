//! Listening socket and the request pipeline it drives.

pub mod listener;
pub mod pipeline;

pub use listener::Server;
pub use pipeline::Pipeline;
