//! Notification sink for contained failures

use std::error::Error;

pub trait NotificationSink: Send + Sync {
    /// Report a failure that was handled locally
    fn log_exception(&self, error: &(dyn Error + 'static), message: &str);
}

/// Writes notifications to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn log_exception(&self, error: &(dyn Error + 'static), message: &str) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        tracing::error!(error = %error, causes = ?causes, "{}", message);
    }
}
