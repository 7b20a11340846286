//! # Portal Shared
//! 
//! Shared configuration, telemetry, errors, and small codecs for the portal application.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;
pub mod referral;

pub use config::AppConfig;
pub use error::AppError;
