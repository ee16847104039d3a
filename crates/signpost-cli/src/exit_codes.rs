//! Exit codes of the `signpost` binary. CI scripts key off these.

pub const SUCCESS: i32 = 0;
pub const REPORT_REJECTED: i32 = 1; // --strict and a report was malformed or incomplete
pub const INTERNAL_ERROR: i32 = 2; // bad configuration, unreadable input, or failed output
