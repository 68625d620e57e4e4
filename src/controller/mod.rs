//! # Task controller.
//!
//! - [`ControllerBuilder`] - ordered construction sequence
//! - [`TaskController`] - single-use instance with `run`
//! - [`ErrorInterceptor`] - failure capture point
//! - [`Lifecycle`] - controller states

mod builder;
mod core;
mod interceptor;
mod lifecycle;

pub use builder::{ControllerBuilder, ORG_CONTEXT, PROJECT_CONTEXT};
pub use self::core::TaskController;
pub use interceptor::ErrorInterceptor;
pub use lifecycle::Lifecycle;
