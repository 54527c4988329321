//! Diagnostic sink
//!
//! The database manager reports lifecycle milestones and failures through an
//! optional sink supplied by the host application. Three severities exist:
//! informational, warning and severe.

use tracing::{error, info, warn};

/// Receiver for database diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, msg: &str);
    fn warning(&self, msg: &str);
    fn severe(&self, msg: &str);
}

/// Sink that forwards every message to `tracing`
///
/// Severe messages are emitted at `ERROR` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, msg: &str) {
        info!(target: "wormhole::database", "{}", msg);
    }

    fn warning(&self, msg: &str) {
        warn!(target: "wormhole::database", "{}", msg);
    }

    fn severe(&self, msg: &str) {
        error!(target: "wormhole::database", "{}", msg);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSink, Severity};
    use super::*;

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: forwarding must be a silent no-op
        let sink = TracingSink;
        sink.info("info");
        sink.warning("warning");
        sink.severe("severe");
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::default();
        sink.info("opened");
        sink.severe("broken");
        sink.severe("still broken");

        assert_eq!(sink.count(Severity::Info), 1);
        assert_eq!(sink.count(Severity::Warning), 0);
        assert_eq!(sink.count(Severity::Severe), 2);
        assert_eq!(sink.messages()[0], (Severity::Info, "opened".to_string()));
    }
}
