//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dashboard;
pub mod forecast;
pub mod health;
