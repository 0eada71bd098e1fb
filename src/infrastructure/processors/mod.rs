//! Operation processors - Perform the real effect of replayed operations

mod scan_code;

pub use scan_code::{ScanCodeProcessor, ScanSubmission};
