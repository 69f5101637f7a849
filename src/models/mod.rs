//! Project scheduling domain models.
//!
//! Provides the data types for a hierarchical project plan: tasks
//! (work items), their status and health, precedence links, and
//! project-level summary indicators.
//!
//! # Domain Mappings
//!
//! | gantt-core | MS Project | Jira | PMBOK |
//! |------------|-----------|------|-------|
//! | Task (parent) | Summary Task | Epic | Work Package |
//! | Task (leaf) | Task | Story/Task | Activity |
//! | Dependency | Predecessor Link | Issue Link | Logical Relationship |
//! | Health | Indicator | Flag | RAG Status |

mod dependency;
mod stats;
mod status;
mod task;

pub use dependency::{Dependency, DependencyType};
pub(crate) use stats::weighted_progress;
pub use stats::ProjectStats;
pub use status::{Health, TaskStatus};
pub use task::Task;
