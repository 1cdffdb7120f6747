//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Exact integer math helpers
//! - Tick timing
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
