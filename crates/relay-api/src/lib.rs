//! HTTP boundary for relay jobs.
//!
//! [`HttpApi`] mounts the routes on an axum [`Router`](axum::Router) and delegates to an
//! [`ApiHandler`]. [`JobServiceAdapter`] is the ready-made handler over
//! [`relay_core::JobService`].
mod error;
pub use error::ApiError;

mod handler;
pub use handler::{ApiHandler, MetricsText};

mod adapter;
pub use adapter::JobServiceAdapter;

mod http;
pub use http::HttpApi;
