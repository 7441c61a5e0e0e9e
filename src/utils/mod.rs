//! Utility modules for common functionality
//!
//! This module provides various utility functions and types used by the
//! command-line tool.

pub mod logger;
pub(crate) mod progress;
pub(crate) mod arg_utils;
pub(crate) mod output_utils;
