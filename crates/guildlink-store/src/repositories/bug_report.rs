//! Bug reports kept for the process lifetime; only the id sequence persists

use dashmap::DashMap;
use tracing::info;

use guildlink_core::BugReport;

use super::sequence::SequenceStore;

pub struct BugReportStore {
    reports: DashMap<u64, BugReport>,
    sequence: SequenceStore,
}

impl BugReportStore {
    pub fn new(sequence: SequenceStore) -> Self {
        Self {
            reports: DashMap::new(),
            sequence,
        }
    }

    pub fn next_id(&self) -> u64 {
        self.sequence.next_id()
    }

    pub fn save(&self, report: BugReport) {
        info!(id = report.id, "Saved bug report");
        self.reports.insert(report.id, report);
    }

    pub fn find(&self, id: u64) -> Option<BugReport> {
        self.reports.get(&id).map(|r| r.value().clone())
    }

    /// All reports, oldest first
    pub fn all(&self) -> Vec<BugReport> {
        let mut reports: Vec<BugReport> = self.reports.iter().map(|r| r.value().clone()).collect();
        reports.sort_by_key(|r| r.id);
        reports
    }
}
