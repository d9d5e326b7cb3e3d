//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and the axis-aligned rectangle used for hitboxes
//! - Frame timing, delta-time clamping and frame-rate limiting
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
