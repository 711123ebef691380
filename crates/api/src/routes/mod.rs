//! Route handlers.

pub mod health;
pub mod metrics;
pub mod refresh;
pub mod revenue;
