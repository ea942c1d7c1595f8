//! Deterministic, pure logic for the contact intake flow.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod focus;
pub mod options;
pub mod types;
pub mod validator;
pub mod view;
