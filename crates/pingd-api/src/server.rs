//! API server with graceful shutdown.

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::routes::create_router;
use crate::state::ApiState;

/// Server bind options.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
}

impl ServerOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// The HTTP server.
pub struct ApiServer {
    options: ServerOptions,
    state: ApiState,
}

impl ApiServer {
    pub fn new(options: ServerOptions, state: ApiState) -> Self {
        Self { options, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.options.host, self.options.port)
    }

    /// Bind and serve until `shutdown` flips to `true`.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> io::Result<()> {
        let listener = TcpListener::bind(self.addr()).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    ///
    /// In-flight requests are allowed to finish once shutdown is signalled.
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let local: SocketAddr = listener.local_addr()?;
        info!("API server listening on {}", local);

        let app = create_router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow_and_update() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use pingd_core::{Automator, AutomatorOptions, SecretKey};
    use pingd_scheduler::CronScheduler;
    use pingd_store::MemoryStore;

    fn create_test_state() -> ApiState {
        let automator = Automator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CronScheduler::new().unwrap()),
            &SecretKey::generate(),
            AutomatorOptions::default(),
        );
        ApiState::new(Arc::new(automator))
    }

    #[test]
    fn test_server_options_default() {
        let options = ServerOptions::default();
        assert_eq!(options.host, "127.0.0.1");
        assert_eq!(options.port, 8080);
    }

    #[tokio::test]
    async fn test_server_addr() {
        let server = ApiServer::new(ServerOptions::new("0.0.0.0", 3000), create_test_state());
        assert_eq!(server.addr(), "0.0.0.0:3000");
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = ApiServer::new(ServerOptions::default(), create_test_state());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { server.serve(listener, rx).await });

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "up");

        tx.send(true).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let server = ApiServer::new(ServerOptions::new("127.0.0.1", port), create_test_state());
        let (_tx, rx) = watch::channel(false);

        assert!(server.run(rx).await.is_err());
    }
}
