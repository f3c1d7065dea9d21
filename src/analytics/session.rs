use super::aggregator::{AnalysisSettings, WrappedAnalyzer};
use super::report::WrappedReport;
use crate::models::PlaylistEntry;
use std::cell::OnceCell;

/// Loaded entries together with their lazily computed report.
///
/// The report is derived once on first access. A different entry list needs a new session.
#[derive(Debug)]
pub struct Wrapped {
    entries: Vec<PlaylistEntry>,
    analyzer: WrappedAnalyzer,
    report: OnceCell<WrappedReport>,
}

impl Wrapped {
    pub fn new(entries: Vec<PlaylistEntry>, settings: AnalysisSettings) -> Self {
        Self {
            entries,
            analyzer: WrappedAnalyzer::new(settings),
            report: OnceCell::new(),
        }
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn settings(&self) -> &AnalysisSettings {
        self.analyzer.settings()
    }

    pub fn report(&self) -> &WrappedReport {
        self.report
            .get_or_init(|| self.analyzer.compute(&self.entries))
    }

    pub fn into_report(self) -> WrappedReport {
        match self.report.into_inner() {
            Some(report) => report,
            None => self.analyzer.compute(&self.entries),
        }
    }
}
