//! Integration tests for framed serialization.
//!
//! These run the public `Verpack` facade end to end: write in one
//! environment, read in another, and check what the reader reports.
//! Header layout, comparison and config parsing are covered by the unit
//! tests in crates/frame/src/.

#[path = "../common/mod.rs"]
mod common;

mod interop;
mod mismatch;
mod round_trip;
