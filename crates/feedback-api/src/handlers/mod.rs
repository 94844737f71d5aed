//! Request handlers

pub mod analytics;
pub mod feedback;
pub mod health;
