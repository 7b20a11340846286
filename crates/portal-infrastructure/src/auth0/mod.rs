//! Auth0 identity provider adapter

mod provider;

pub use provider::Auth0Provider;
