//! Community module: the portal's CRUD resources (profiles, discussions,
//! comments, announcements, events, clubs, career posts, alumni directory)
//! and the engagement summary derived from them.

pub mod api;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use domain::error::CommunityError;
pub use domain::service::CommunityService;
pub use gateways::registrar::CommunityProfileRegistrar;
