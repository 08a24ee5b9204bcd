// HTTP server

use crate::service::MunroService;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::{handlers::router, Result, DEFAULT_PORT};

pub struct Server {
    service: Arc<MunroService>,
    max_connections: usize,
}

impl Server {
    pub fn new(service: Arc<MunroService>, max_connections: usize) -> Self {
        Self {
            service,
            max_connections,
        }
    }

    pub async fn run(&self, addr: Option<SocketAddr>) -> Result<()> {
        let addr = addr.unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)));
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve requests on an already bound listener until the task is dropped
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("munro-api listening on {}", listener.local_addr()?);
        info!("Max concurrent requests: {}", self.max_connections);

        let app = router(self.service.clone(), self.max_connections);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
