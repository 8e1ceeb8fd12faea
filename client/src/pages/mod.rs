//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`.

pub mod dashboard;
pub mod feedbacks;
pub mod login;
pub mod results;
pub mod users;
