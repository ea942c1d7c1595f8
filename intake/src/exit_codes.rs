//! Stable exit codes for intake CLI commands.

/// Command succeeded; the submission was valid (and delivered, for `submit`).
pub const OK: i32 = 0;
/// Validation failed, or the command itself failed (bad config, I/O error).
pub const INVALID: i32 = 1;
/// `intake submit` passed validation but the sink rejected the record.
pub const SINK_FAILED: i32 = 2;
