// HTTP front end

pub mod handlers;
pub mod server;

// Re-export commonly used types
pub use handlers::{limited_router, router, ApiError, AppState};
pub use server::Server;

pub use crate::config::DEFAULT_PORT;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
