//! Inlining outcome tracking
//!
//! Per-asset failures are collected here instead of only being printed, so
//! callers and tests can inspect what a run did without capturing process
//! output.

/// Reference kind, for failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
    /// A generic `src`-bearing tag (img, audio, video, source, track).
    Media,
    /// An icon-type `<link>`.
    Icon,
    /// A `url(...)` target inside a stylesheet.
    CssUrl,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Stylesheet => write!(f, "stylesheet"),
            AssetKind::Script => write!(f, "script"),
            AssetKind::Media => write!(f, "media"),
            AssetKind::Icon => write!(f, "icon"),
            AssetKind::CssUrl => write!(f, "css url"),
        }
    }
}

/// A reference that could not be inlined
#[derive(Debug, Clone)]
pub struct InlineFailure {
    pub location: String,
    pub kind: AssetKind,
    pub reason: String,
}

/// Result of one inlining run with success and failure tracking
#[derive(Debug, Clone, Default)]
pub struct InlineReport {
    pub successes: usize,
    pub failures: Vec<InlineFailure>,
}

impl InlineReport {
    /// Record one successful substitution.
    pub(crate) fn success(&mut self) {
        self.successes += 1;
    }

    /// Record a reference that was left unchanged.
    pub(crate) fn failure(
        &mut self,
        location: impl Into<String>,
        kind: AssetKind,
        reason: impl Into<String>,
    ) {
        self.failures.push(InlineFailure {
            location: location.into(),
            kind,
            reason: reason.into(),
        });
    }

    /// Total number of references processed
    #[must_use]
    pub fn total(&self) -> usize {
        self.successes + self.failures.len()
    }

    /// Check if any failures occurred
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get failure rate as a ratio between 0.0 and 1.0
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.failures.len() as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_has_zero_failure_rate() {
        let report = InlineReport::default();
        assert_eq!(report.total(), 0);
        assert!(!report.has_failures());
        assert_eq!(report.failure_rate(), 0.0);
    }

    #[test]
    fn failure_rate_counts_both_outcomes() {
        let mut report = InlineReport::default();
        report.success();
        report.success();
        report.success();
        report.failure("style.css", AssetKind::Stylesheet, "not found");
        assert_eq!(report.total(), 4);
        assert!(report.has_failures());
        assert_eq!(report.failure_rate(), 0.25);
    }
}
