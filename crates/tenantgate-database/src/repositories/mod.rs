//! Concrete repository implementations.
//!
//! Pool-backed methods serve plain reads. Associated functions taking a
//! `&mut PgConnection` run inside a caller-owned transaction.

pub mod invite;
pub mod membership;
pub mod organization;
pub mod project;
pub mod user;

pub use invite::InviteRepository;
pub use membership::MembershipRepository;
pub use organization::OrganizationRepository;
pub use project::ProjectRepository;
pub use user::UserRepository;
