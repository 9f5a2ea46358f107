//! Integration test crate for ClipTrim.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every cliptrim library crate to verify they work together.

#[cfg(test)]
mod playback;

#[cfg(test)]
mod export;

#[cfg(test)]
mod shortcuts;
