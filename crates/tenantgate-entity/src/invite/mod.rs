//! Invitation entities.

pub mod model;
pub mod status;

pub use model::{Invite, InvitePurpose, NewInvite};
pub use status::InviteStatus;
