//! Toast notification fragment.

use std::time::Duration;

use suresh_core::Notice;

/// A toast to show, rendered into the single `#toast` slot out-of-band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub duration_ms: u64,
}

impl ToastView {
    #[must_use]
    pub fn new(notice: &Notice, duration: Duration) -> Self {
        Self {
            message: notice.message().to_owned(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
