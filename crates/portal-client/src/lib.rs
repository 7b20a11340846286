//! # Portal Client
//! 
//! HTTP client wrapper and client-side view models.

pub mod error;
pub mod events;
pub mod http;
pub mod viewmodel;

pub use error::ClientError;
pub use events::ClientEvent;
pub use http::{ApiClient, SessionFetch};
pub use viewmodel::{SessionViewModel, StatCardViewModel};
