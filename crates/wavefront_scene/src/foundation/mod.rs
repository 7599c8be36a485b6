//! Foundation module - Core utilities shared by the parsers
//!
//! Currently this is the logging bootstrap; parser diagnostics go through the
//! `log` facade and are only visible once a logger is installed.

pub mod logging;
