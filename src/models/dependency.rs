//! Precedence links between tasks.
//!
//! A [`Dependency`] lives on the **successor** and points at its
//! predecessor by ID. All four classic link types are enforced, both in
//! the forward push ([`Dependency::earliest_start`]) and in the backward
//! critical-path pass ([`Dependency::latest_finish`]).
//!
//! With inclusive day durations, "finish" means the last working day, so
//! a zero-lag Finish-to-Start successor starts the day **after** its
//! predecessor ends.
//!
//! # Reference
//! PMI (2017), "PMBOK Guide", 6th ed., §6.3.2.1 (Precedence Diagramming Method)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::add_days;

/// Precedence relation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Successor starts after predecessor finishes.
    #[default]
    FinishToStart,
    /// Successor starts no earlier than predecessor starts.
    StartToStart,
    /// Successor finishes no earlier than predecessor finishes.
    FinishToFinish,
    /// Successor finishes no earlier than predecessor starts.
    StartToFinish,
}

impl DependencyType {
    /// Two-letter code used by dependency notation (`FS`, `SS`, `FF`, `SF`).
    pub fn code(self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }

    /// Parses a two-letter code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "FS" => Some(Self::FinishToStart),
            "SS" => Some(Self::StartToStart),
            "FF" => Some(Self::FinishToFinish),
            "SF" => Some(Self::StartToFinish),
            _ => None,
        }
    }
}

/// A precedence link from a predecessor to the task that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// ID of the predecessor task.
    pub predecessor_id: String,
    /// Link type.
    #[serde(rename = "type")]
    pub kind: DependencyType,
    /// Signed offset in days (negative = lead).
    pub lag_days: i64,
}

impl Dependency {
    /// Creates a dependency with zero lag.
    pub fn new(predecessor_id: impl Into<String>, kind: DependencyType) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            kind,
            lag_days: 0,
        }
    }

    /// Zero-lag Finish-to-Start link.
    pub fn finish_to_start(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, DependencyType::FinishToStart)
    }

    /// Zero-lag Start-to-Start link.
    pub fn start_to_start(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, DependencyType::StartToStart)
    }

    /// Sets the lag.
    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }

    /// Earliest start this link allows for a successor of the given duration.
    ///
    /// | type | constraint | earliest start |
    /// |------|-----------|----------------|
    /// | FS | `succ.start > pred.end + lag` | `pred.end + 1 + lag` |
    /// | SS | `succ.start >= pred.start + lag` | `pred.start + lag` |
    /// | FF | `succ.end >= pred.end + lag` | `pred.end + lag - (dur - 1)` |
    /// | SF | `succ.end >= pred.start + lag` | `pred.start + lag - (dur - 1)` |
    pub fn earliest_start(
        &self,
        pred_start: NaiveDate,
        pred_end: NaiveDate,
        succ_duration: i64,
    ) -> NaiveDate {
        let span = succ_duration.max(1) - 1;
        let lag = self.lag_days;
        match self.kind {
            DependencyType::FinishToStart => add_days(pred_end, lag.saturating_add(1)),
            DependencyType::StartToStart => add_days(pred_start, lag),
            DependencyType::FinishToFinish => add_days(pred_end, lag.saturating_sub(span)),
            DependencyType::StartToFinish => add_days(pred_start, lag.saturating_sub(span)),
        }
    }

    /// Latest finish this link allows the predecessor, given the
    /// successor's latest finish and both durations.
    ///
    /// This is the backward mirror of [`earliest_start`](Self::earliest_start).
    /// For a zero-lag FS link it is the successor's latest start minus one day.
    pub fn latest_finish(
        &self,
        succ_late_finish: NaiveDate,
        succ_duration: i64,
        pred_duration: i64,
    ) -> NaiveDate {
        let succ_span = succ_duration.max(1) - 1;
        let pred_span = pred_duration.max(1) - 1;
        let succ_late_start = add_days(succ_late_finish, -succ_span);
        let lag = self.lag_days;
        match self.kind {
            DependencyType::FinishToStart => add_days(succ_late_start, (-1i64).saturating_sub(lag)),
            DependencyType::StartToStart => {
                add_days(succ_late_start, pred_span.saturating_sub(lag))
            }
            DependencyType::FinishToFinish => {
                add_days(succ_late_finish, 0i64.saturating_sub(lag))
            }
            DependencyType::StartToFinish => {
                add_days(succ_late_finish, pred_span.saturating_sub(lag))
            }
        }
    }
}
