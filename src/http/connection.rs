use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ServeError;
use crate::http::parser::{REQUEST_TERMINATOR, find_request_end};
use crate::http::writer::ResponseWriter;
use crate::server::pipeline::Pipeline;

const READ_CHUNK: usize = 1024;

/// Services exactly one request on one stream.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    /// Bytes of `buffer` already searched for the terminator
    scanned: usize,
    state: ConnectionState,
    pipeline: Arc<Pipeline>,
}

pub enum ConnectionState {
    Reading,
    Processing(String),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, pipeline: Arc<Pipeline>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            scanned: 0,
            state: ConnectionState::Reading,
            pipeline,
        }
    }

    /// Reads, answers and closes. Errors leave nothing written to the peer
    /// unless the failure happened mid-write.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let raw = self.read_request().await?;
                    tracing::debug!("Request received:\n{}", raw);
                    self.state = ConnectionState::Processing(raw);
                }

                ConnectionState::Processing(raw) => {
                    let response = self.pipeline.respond(raw).await?;
                    tracing::info!(status = response.status.as_u16(), "Responding");
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: the peer reads the body until EOF
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Accumulates input until the CRLFCRLF terminator shows up and returns
    /// everything read so far as text.
    pub async fn read_request(&mut self) -> anyhow::Result<String> {
        loop {
            if find_request_end(&self.buffer[self.scanned..]).is_some() {
                let bytes = self.buffer.split().to_vec();
                self.scanned = 0;
                let raw = String::from_utf8(bytes).map_err(ServeError::from)?;
                return Ok(raw);
            }
            // A terminator split across reads starts at most 3 bytes back
            self.scanned = self
                .buffer
                .len()
                .saturating_sub(REQUEST_TERMINATOR.len() - 1);

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                return Err(ServeError::ConnectionClosed.into());
            }
        }
    }
}
