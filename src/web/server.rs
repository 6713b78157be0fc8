//! Web server for contact-relay.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{Config, ServerConfig};
use crate::mail::Mailer;
use crate::Result;

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Server configuration.
    server_config: ServerConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let addr = config.server.addr()?;
        let app_state = AppState::from_config(config, mailer);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            server_config: config.server.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Assemble the full application router.
    pub fn router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.server_config)
            .merge(create_health_router());

        if self.server_config.serve_static {
            if let Some(static_router) = create_static_router(&self.server_config.static_path) {
                router = router.merge(static_router);
            }
        }

        router.layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MemoryMailer;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config
    }

    #[test]
    fn test_web_server_new() {
        let server = WebServer::new(&create_test_config(), Arc::new(MemoryMailer::new())).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_rejects_bad_host() {
        let mut config = create_test_config();
        config.server.host = "not an address".to_string();
        assert!(WebServer::new(&config, Arc::new(MemoryMailer::new())).is_err());
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let server = WebServer::new(&create_test_config(), Arc::new(MemoryMailer::new())).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        // The compression layer drops Content-Length, so the body may be chunked
        assert!(response.starts_with("HTTP/1.1 200"));
        let (_, body) = response.split_once("\r\n\r\n").unwrap();
        assert!(body == "OK" || body.contains("\r\nOK\r\n"), "unexpected body: {body:?}");
    }
}
