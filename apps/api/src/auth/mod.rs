//! Sign-up, login and bearer-token sessions.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod session;

pub use extractor::CurrentUser;
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore};
