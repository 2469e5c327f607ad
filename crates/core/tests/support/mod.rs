//! Shared test helpers for `intake-core` integration tests.
//!
//! Scripted collaborators and a recording monitor so submission tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod email;
pub mod fixtures;
pub mod monitoring;
