//! Shared HTTP API building blocks: RFC 9457 problem responses,
//! x-request-id plumbing, and the endpoints every deployment carries.

pub mod problem;
pub mod request_id;
pub mod web;

pub use problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
pub use request_id::XRequestId;
