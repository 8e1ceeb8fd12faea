//! Page state machines and shared session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here is plain Rust with no browser dependency, so the rules the
//! pages follow are unit tested natively. Pages hold these types in
//! `RwSignal`s and feed them network outcomes and clock ticks.

pub mod analysis;
pub mod auth;
pub mod export;
pub mod feedbacks;
pub mod notice;
pub mod records;
pub mod users;
