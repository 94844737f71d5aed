//! Terminal dashboard for the feedback analytics API
//!
//! [`AnalyticsClient`] talks to the API server; [`Dashboard`] loads the
//! aggregates concurrently into a shared [`DashboardView`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod view;

pub use client::AnalyticsClient;
pub use view::{Dashboard, DashboardSnapshot, DashboardView, LoadOptions};
