//! ViewModels
//!
//! State holders for client screens. Async work reports back through
//! [`ClientEvent`](crate::events::ClientEvent).

pub mod session_vm;
pub mod stat_card_vm;

pub use session_vm::SessionViewModel;
pub use stat_card_vm::{StatCardViewModel, Trend, ValueFormat};
