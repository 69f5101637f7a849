//! Hierarchical project scheduling engine.
//!
//! Keeps a flat, parent-linked task collection (a work breakdown
//! structure) internally consistent after every edit:
//!
//! - **Rollup**: summary tasks take their span, progress, status and
//!   health from their children.
//! - **Propagation**: moving a task pushes dependent tasks later along
//!   finish-to-start, start-to-start, finish-to-finish and start-to-finish
//!   links, with lag.
//! - **Critical path**: a backward pass derives total float and flags
//!   zero-float tasks as critical.
//!
//! Every pass is a pure function from a task slice to a new `Vec<Task>`;
//! no caller-supplied collection is mutated.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Dependency`, `TaskStatus`, `Health`, `ProjectStats`
//! - **`calendar`**: Inclusive day arithmetic on calendar dates
//! - **`hierarchy`**: Arena index (`TaskTree`), outline order, WBS codes
//! - **`rollup`** / **`propagation`** / **`critical_path`**: The recompute passes
//! - **`notation`**: `2.1FS+3`-style dependency text
//! - **`engine`**: Edit transactions (`ScheduleEngine`)
//! - **`config`**: Layered configuration (defaults, `gantt.toml`, `GANTT_*`)
//! - **`validation`**: Strict structural checks
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gantt_core::{ScheduleEngine, TaskEdit};
//! use gantt_core::models::{Dependency, Task};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
//! let engine = ScheduleEngine::default();
//! let tasks = engine.recompute(&[
//!     Task::new("P", d(1)),
//!     Task::new("A", d(1)).with_parent("P").with_duration(5),
//!     Task::new("B", d(6)).with_parent("P").with_duration(3)
//!         .with_dependency(Dependency::finish_to_start("A")),
//! ])?;
//!
//! let tasks = engine.apply_edit(&tasks, "A", TaskEdit::SetDuration(10))?;
//! assert_eq!(tasks[2].start_date, d(11));
//! assert_eq!(tasks[0].end_date, d(13));
//! assert!(tasks.iter().all(|t| t.is_critical));
//! # Ok::<(), gantt_core::ScheduleError>(())
//! ```
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-path planning and scheduling"
//! - PMI (2021), "PMBOK Guide", 7th ed., schedule network analysis

pub mod calendar;
pub mod config;
pub mod critical_path;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod notation;
pub mod propagation;
pub mod rollup;
pub mod validation;

pub use config::EngineConfig;
pub use critical_path::identify_critical_path;
pub use engine::{ScheduleEngine, TaskEdit};
pub use error::{ParseError, ScheduleError};
pub use hierarchy::{visible_tasks, TaskTree};
pub use notation::{format_dependencies, parse_dependencies};
pub use propagation::propagate_changes;
pub use rollup::rollup_hierarchy;
pub use validation::{validate_tasks, ValidationError, ValidationErrorKind};
