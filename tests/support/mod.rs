//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod scripted_fetch;
pub mod socket_guard;
