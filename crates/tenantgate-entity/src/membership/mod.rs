//! Organization membership entities.

pub mod model;
pub mod role;

pub use model::{Membership, OrgMember};
pub use role::OrgRole;
