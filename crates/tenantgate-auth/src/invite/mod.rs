//! One-time invitation tokens and their lifecycle.

pub mod manager;
pub mod token;

pub use manager::{InviteManager, InviteVerdict, IssuedInvite};
pub use token::{InviteTokenHasher, RawInviteToken, generate_raw_token};
