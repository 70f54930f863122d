pub mod services;
mod session;
mod token_store;

pub use session::Session;
pub use token_store::{MemoryTokenStore, TokenStore};

#[cfg(test)]
pub(crate) use session::test_user;
