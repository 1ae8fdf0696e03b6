//! Backend test support utilities
//!
//! Helpers shared by the backend's unit and integration tests: unified
//! logging initialization, unique test data, and problem-details assertions.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

pub use problem_details::assert_problem_details;
pub use unique_helpers::{unique_str, unique_username};
