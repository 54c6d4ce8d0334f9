//! Shared plumbing for the application's HTTP surface.
//!
//! Core authentication routes live in the `auth` module; this module holds
//! the response envelope and error mapping they share.

pub mod common;
