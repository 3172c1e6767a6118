//! Cookie-based session authentication: token verification, the session
//! cookie, and the access gate in front of every page.

pub mod cookie;
pub mod gate;
pub mod token;

pub use cookie::{SessionCookie, SessionToken};
pub use gate::access_gate;
pub use token::TokenVerifier;
