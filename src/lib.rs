//! netpulse: live host network activity, counter history and top talkers.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod error;
pub mod config;
pub mod model;
pub mod collectors;
pub mod controller;
pub mod layout;
pub mod view;
pub mod app;
pub mod logging;
