use tracing::{debug, info};

use crate::config::Config;
use crate::content::{ContentResult, Resolver};
use crate::error::{Result, ServeError};
use crate::http::parser::parse_request;
use crate::http::response::Response;

/// Request text in, response out.
///
/// Unsupported methods and missing paths are answered with 405 and 404.
/// Every other error is returned to the caller, which drops the connection
/// without a response.
pub struct Pipeline {
    resolver: Resolver,
}

impl Pipeline {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Resolver::from_config(cfg))
    }

    pub async fn respond(&self, raw: &str) -> Result<Response> {
        match self.serve(raw).await {
            Ok(content) => Ok(Response::ok(content.body, &content.mime_type)),
            Err(e) if e.is_client_facing() => {
                info!(code = e.code(), "{}", e);
                match e {
                    ServeError::UnsupportedMethod(_) => Ok(Response::method_not_allowed()),
                    ServeError::NotFound(_) => Ok(Response::not_found()),
                    other => Err(other),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn serve(&self, raw: &str) -> Result<ContentResult> {
        let request = parse_request(raw)?;
        debug!(path = %request.path, version = %request.version, "Resolving");
        self.resolver.resolve(&request.path).await
    }
}
