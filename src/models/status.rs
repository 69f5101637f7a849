//! Task status and health (RAG) indicators.
//!
//! Leaf health is normalized from status on every rollup pass; parent
//! health and status are aggregated from children. Both rules live here
//! so the rollup pass only orchestrates.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Completed,
    /// Work is paused by decision.
    OnHold,
    /// Work cannot continue until an impediment is removed.
    Blocked,
}

/// Traffic-light health indicator ("RAG").
///
/// Variants are ordered by severity: `Gray < Green < Amber < Red`, so
/// the worst health of a set of children is simply its maximum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Health {
    /// Not yet assessed.
    #[default]
    Gray,
    /// On track.
    Green,
    /// At risk.
    Amber,
    /// Off track.
    Red,
}

impl TaskStatus {
    /// Health a leaf task must carry given its status.
    ///
    /// | status | health |
    /// |--------|--------|
    /// | Blocked | Red |
    /// | OnHold | Amber |
    /// | InProgress, current Red | Red |
    /// | any other, `at_risk` | Amber |
    /// | Completed | Green |
    /// | NotStarted | Gray |
    /// | InProgress | Amber if current Amber, else Green |
    ///
    /// A manual Red on an in-progress task outranks the at-risk flag.
    pub fn leaf_health(self, current: Health, at_risk: bool) -> Health {
        match self {
            Self::Blocked => Health::Red,
            Self::OnHold => Health::Amber,
            Self::InProgress if current == Health::Red => Health::Red,
            _ if at_risk => Health::Amber,
            Self::Completed => Health::Green,
            Self::NotStarted => Health::Gray,
            Self::InProgress if current == Health::Amber => Health::Amber,
            Self::InProgress => Health::Green,
        }
    }

    /// Summary status of a parent given its direct children's statuses.
    ///
    /// Blocked if any child is blocked; Completed if all are completed;
    /// InProgress if any child has started (in progress, completed or on
    /// hold); otherwise NotStarted. An empty set is NotStarted.
    pub fn aggregate<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut any = false;
        let mut all_completed = true;
        let mut any_blocked = false;
        let mut any_started = false;

        for status in children {
            any = true;
            all_completed &= status == Self::Completed;
            any_blocked |= status == Self::Blocked;
            any_started |= matches!(status, Self::InProgress | Self::Completed | Self::OnHold);
        }

        if any_blocked {
            Self::Blocked
        } else if any && all_completed {
            Self::Completed
        } else if any_started {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }
}

impl Health {
    /// Worst health among `children` (Gray if empty).
    pub fn aggregate<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        children.into_iter().max().unwrap_or(Self::Gray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Blocked, Health::Green, false, Health::Red)]
    #[case(TaskStatus::Blocked, Health::Gray, true, Health::Red)]
    #[case(TaskStatus::OnHold, Health::Green, false, Health::Amber)]
    #[case(TaskStatus::Completed, Health::Red, false, Health::Green)]
    #[case(TaskStatus::Completed, Health::Green, true, Health::Amber)]
    #[case(TaskStatus::NotStarted, Health::Red, false, Health::Gray)]
    #[case(TaskStatus::NotStarted, Health::Gray, true, Health::Amber)]
    #[case(TaskStatus::InProgress, Health::Gray, false, Health::Green)]
    #[case(TaskStatus::InProgress, Health::Green, false, Health::Green)]
    #[case(TaskStatus::InProgress, Health::Amber, false, Health::Amber)]
    #[case(TaskStatus::InProgress, Health::Green, true, Health::Amber)]
    #[case(TaskStatus::InProgress, Health::Red, false, Health::Red)]
    #[case(TaskStatus::InProgress, Health::Red, true, Health::Red)]
    fn test_leaf_health(
        #[case] status: TaskStatus,
        #[case] current: Health,
        #[case] at_risk: bool,
        #[case] expected: Health,
    ) {
        assert_eq!(status.leaf_health(current, at_risk), expected);
    }

    #[test]
    fn test_leaf_health_is_stable() {
        let statuses = [
            TaskStatus::NotStarted,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::OnHold,
            TaskStatus::Blocked,
        ];
        let healths = [Health::Gray, Health::Green, Health::Amber, Health::Red];
        for status in statuses {
            for health in healths {
                for at_risk in [false, true] {
                    let once = status.leaf_health(health, at_risk);
                    assert_eq!(status.leaf_health(once, at_risk), once);
                }
            }
        }
    }

    #[test]
    fn test_health_ordering() {
        assert!(Health::Red > Health::Amber);
        assert!(Health::Amber > Health::Green);
        assert!(Health::Green > Health::Gray);
    }

    #[test]
    fn test_health_aggregate() {
        assert_eq!(Health::aggregate([Health::Green, Health::Red, Health::Gray]), Health::Red);
        assert_eq!(Health::aggregate([Health::Green, Health::Amber]), Health::Amber);
        assert_eq!(Health::aggregate([Health::Gray, Health::Green]), Health::Green);
        assert_eq!(Health::aggregate([Health::Gray]), Health::Gray);
        assert_eq!(Health::aggregate(std::iter::empty()), Health::Gray);
    }

    #[test]
    fn test_status_aggregate() {
        use TaskStatus::*;
        assert_eq!(TaskStatus::aggregate([Completed, Blocked]), Blocked);
        assert_eq!(TaskStatus::aggregate([Completed, Completed]), Completed);
        assert_eq!(TaskStatus::aggregate([Completed, NotStarted]), InProgress);
        assert_eq!(TaskStatus::aggregate([OnHold, NotStarted]), InProgress);
        assert_eq!(TaskStatus::aggregate([InProgress]), InProgress);
        assert_eq!(TaskStatus::aggregate([NotStarted, NotStarted]), NotStarted);
        assert_eq!(TaskStatus::aggregate(std::iter::empty()), NotStarted);
    }
}
