//! Discrete-time PID controller for periodic control loops such as a
//! drive-by-wire actuator.
//!
//! The controller pulls feedback from a [`FeedbackSource`], pushes its
//! correction into an [`OutputSink`] and, when given a [`TimeSource`],
//! weights integration and the derivative by elapsed time.
#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod bounds;
pub mod config;
pub mod interface;
pub mod pid;
pub mod pwm;

pub use bounds::{Bounds, WrapDomain};
pub use config::{Config, Gains, Rounding, DEFAULT_MAX_CUMULATION};
pub use interface::{FeedbackSource, OutputSink, TimeSource};
pub use pid::Controller;
pub use pwm::PwmSink;
