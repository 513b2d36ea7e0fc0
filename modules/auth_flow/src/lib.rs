//! Signup and authentication module.
//!
//! Implements the two-phase OTP registration flow: a short numeric code is
//! generated and emailed to the candidate address, and the account is only
//! created once the user echoes the code back. The code never leaves the
//! server except inside the email itself, and verification plus account
//! creation happen as one operation in a single request.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod infra;

pub use config::AuthFlowConfig;
pub use contract::model::{Account, Role};
pub use contract::ProfileRegistrar;
pub use domain::service::AuthFlowService;
