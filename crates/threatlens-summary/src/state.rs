use crate::DetectionSummary;

/// Lifecycle of one analysis request as a front-end sees it. The summarizer
/// functions stay stateless; a driving surface holds one of these per
/// selected file instead of ad hoc loading/result/error fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading,
    Completed(DetectionSummary),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    state: AnalysisState,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            state: AnalysisState::Idle,
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == AnalysisState::Loading
    }

    /// Enter `Loading`, discarding any previous result or error.
    pub fn begin(&mut self) {
        self.state = AnalysisState::Loading;
    }

    pub fn complete(&mut self, summary: DetectionSummary) {
        self.state = AnalysisState::Completed(summary);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = AnalysisState::Failed(message.into());
    }

    pub fn reset(&mut self) {
        self.state = AnalysisState::Idle;
    }

    pub fn summary(&self) -> Option<&DetectionSummary> {
        match &self.state {
            AnalysisState::Completed(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{summarize, DEFAULT_SERIES_CAP};

    #[test]
    fn success_path() {
        let mut session = AnalysisSession::new();
        assert_eq!(*session.state(), AnalysisState::Idle);
        assert!(session.summary().is_none());

        session.begin();
        assert!(session.is_loading());

        session.complete(summarize(&[], DEFAULT_SERIES_CAP));
        assert!(!session.is_loading());
        assert_eq!(session.summary().unwrap().stats.total, 0);
    }

    #[test]
    fn failure_path_and_reset() {
        let mut session = AnalysisSession::new();
        session.begin();
        session.fail("connection refused");
        assert_eq!(
            *session.state(),
            AnalysisState::Failed("connection refused".into())
        );
        assert!(session.summary().is_none());

        session.reset();
        assert_eq!(*session.state(), AnalysisState::Idle);
    }

    #[test]
    fn begin_discards_previous_result() {
        let mut session = AnalysisSession::new();
        session.begin();
        session.complete(summarize(&[], DEFAULT_SERIES_CAP));
        session.begin();
        assert!(session.is_loading());
        assert!(session.summary().is_none());
    }
}
