//! Destinations for mismatch warnings
//!
//! A reader hands every non-empty [`MismatchReport`] to its sink. Sinks
//! never fail the read.

use crate::checker::MismatchReport;
use parking_lot::Mutex;
use tracing::warn;

/// Log target used by [`TracingSink`]
pub const MISMATCH_TARGET: &str = "verpack::mismatch";

/// Receives mismatch reports
pub trait WarningSink: Send + Sync {
    /// Called once per read with a non-empty report
    fn notify(&self, report: &MismatchReport);
}

/// Emits each report as a `warn!` event on [`MISMATCH_TARGET`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn notify(&self, report: &MismatchReport) {
        warn!(target: MISMATCH_TARGET, differences = report.len(), "{}", report);
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<MismatchReport>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every report received so far
    pub fn reports(&self) -> Vec<MismatchReport> {
        self.reports.lock().clone()
    }

    /// Drain the received reports
    pub fn take(&self) -> Vec<MismatchReport> {
        std::mem::take(&mut *self.reports.lock())
    }

    /// Number of reports received
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// True if nothing was received
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl WarningSink for CollectingSink {
    fn notify(&self, report: &MismatchReport) {
        self.reports.lock().push(report.clone());
    }
}

/// Drops every report
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl WarningSink for SilentSink {
    fn notify(&self, _report: &MismatchReport) {}
}
