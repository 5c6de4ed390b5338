pub mod config;
pub mod error;
pub mod google;
pub mod types;

pub use config::VoxConfig;
pub use error::{Result, ServiceError, VoxError};
pub use google::GoogleAuth;
pub use types::*;
