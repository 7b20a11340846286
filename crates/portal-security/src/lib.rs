//! # Portal Security
//! 
//! Session codec, signed login state, nonces, and redirect sanitising.

pub mod session;
pub mod session_codec;
pub mod state;
pub mod nonce;
pub mod redirect;

pub use session::SessionRecord;
pub use session_codec::{DecodeError, SessionCodec};
pub use state::{LoginState, StateError, StateSigner};
