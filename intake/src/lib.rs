//! Contact intake flow for a single-page site.
//!
//! The crate models the one stateful piece of the page: the contact form.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (field rules, focus selection,
//!   the accessibility view model). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (submission sinks, the clock,
//!   configuration, HTML rendering). Injected so tests can replace them.
//!
//! [`controller`] ties the two together into the submission state machine.

pub mod controller;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
