//! # Fleet Development Tools
//!
//! Command-line helpers for content and save work:
//! - Fleet validators (report or repair unknown content)
//! - Headless bounded battles
//! - Fleet score estimates

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod files;
pub mod simulate;
pub mod validate;
