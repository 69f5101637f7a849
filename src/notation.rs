//! Dependency short-hand notation.
//!
//! Callers display and edit predecessor lists as text, referring to tasks
//! by hierarchy position rather than by ID:
//!
//! ```text
//! 2.1FS+3, 1SS-2, 3
//! ```
//!
//! reads "finish-to-start from 2.1 with 3 days lag, start-to-start from 1
//! with a 2-day lead, finish-to-start from 3".
//!
//! # Grammar
//!
//! ```text
//! list     := "" | entry ("," entry)*
//! entry    := position [type] [lag]
//! position := digits ("." digits)*
//! type     := "FS" | "SS" | "FF" | "SF"      (case-insensitive, default FS)
//! lag      := ("+" | "-") digits              (days, default 0)
//! ```
//!
//! Whitespace is ignored. Parsing is all-or-nothing: any bad entry fails
//! the whole list, so a caller never applies half an edit.

use std::collections::HashMap;

use crate::error::ParseError;
use crate::hierarchy::TaskTree;
use crate::models::{Dependency, DependencyType, Task};

/// Parses notation into links for the task `target_id`.
///
/// Positions are resolved against the current hierarchy of `tasks`.
///
/// # Errors
/// Any [`ParseError`]; no partial result is returned.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_core::models::{DependencyType, Task};
/// use gantt_core::notation::parse_dependencies;
///
/// let d = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
/// let tasks = vec![
///     Task::new("a", d),
///     Task::new("b", d),
///     Task::new("b1", d).with_parent("b"),
///     Task::new("c", d),
/// ];
/// let deps = parse_dependencies("2.1FS+3, 1ss", &tasks, "c").unwrap();
/// assert_eq!(deps[0].predecessor_id, "b1");
/// assert_eq!(deps[0].lag_days, 3);
/// assert_eq!(deps[1].kind, DependencyType::StartToStart);
/// ```
pub fn parse_dependencies(
    text: &str,
    tasks: &[Task],
    target_id: &str,
) -> Result<Vec<Dependency>, ParseError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(Vec::new());
    }

    let tree = TaskTree::build(tasks);
    let by_code: HashMap<String, &str> = tree
        .wbs_codes()
        .into_iter()
        .map(|(id, code)| (code, id))
        .collect();

    compact
        .split(',')
        .map(|entry| {
            let parsed = parse_entry(entry)?;
            let id = by_code
                .get(&parsed.position)
                .copied()
                .ok_or_else(|| ParseError::UnknownPosition {
                    position: parsed.position.clone(),
                })?;
            if id == target_id {
                return Err(ParseError::SelfReference {
                    position: parsed.position,
                });
            }
            Ok(Dependency::new(id, parsed.kind).with_lag(parsed.lag))
        })
        .collect()
}

/// Formats a task's links as notation, the inverse of [`parse_dependencies`].
///
/// FS with zero lag is written as the bare position; any other link
/// spells out its type. Links to missing tasks are omitted.
pub fn format_dependencies(task: &Task, tasks: &[Task]) -> String {
    let tree = TaskTree::build(tasks);
    let codes = tree.wbs_codes();
    task.dependencies
        .iter()
        .filter_map(|dep| {
            let code = codes.get(dep.predecessor_id.as_str())?;
            Some(format_entry(code, dep))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_entry(code: &str, dep: &Dependency) -> String {
    match (dep.kind, dep.lag_days) {
        (DependencyType::FinishToStart, 0) => code.to_string(),
        (kind, 0) => format!("{code}{}", kind.code()),
        (kind, lag) => format!("{code}{}{lag:+}", kind.code()),
    }
}

#[derive(Debug, PartialEq)]
struct Entry {
    position: String,
    kind: DependencyType,
    lag: i64,
}

fn parse_entry(entry: &str) -> Result<Entry, ParseError> {
    if entry.is_empty() {
        return Err(ParseError::EmptyReference);
    }

    let type_at = entry
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(entry.len());
    let (position, rest) = entry.split_at(type_at);
    if !is_valid_position(position) {
        return Err(ParseError::InvalidPosition {
            entry: entry.to_string(),
        });
    }

    let lag_at = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (code, lag) = rest.split_at(lag_at);

    let kind = if code.is_empty() {
        DependencyType::FinishToStart
    } else {
        DependencyType::from_code(code).ok_or_else(|| ParseError::UnknownLinkType {
            entry: entry.to_string(),
            code: code.to_string(),
        })?
    };

    Ok(Entry {
        position: position.to_string(),
        kind,
        lag: parse_lag(entry, lag)?,
    })
}

fn is_valid_position(position: &str) -> bool {
    !position.is_empty()
        && position
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_lag(entry: &str, lag: &str) -> Result<i64, ParseError> {
    if lag.is_empty() {
        return Ok(0);
    }
    let invalid = || ParseError::InvalidLag {
        entry: entry.to_string(),
        lag: lag.to_string(),
    };
    let digits = lag
        .strip_prefix('+')
        .or_else(|| lag.strip_prefix('-'))
        .ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let magnitude: i64 = digits.parse().map_err(|_| invalid())?;
    Ok(if lag.starts_with('-') {
        -magnitude
    } else {
        magnitude
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tasks() -> Vec<Task> {
        let d = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        vec![
            Task::new("1", d),
            Task::new("1.1", d).with_parent("1"),
            Task::new("1.2", d).with_parent("1"),
            Task::new("2", d),
            Task::new("2.1", d).with_parent("2"),
            Task::new("2.2", d).with_parent("2"),
        ]
    }

    #[rstest]
    #[case("2.1", "2.1", DependencyType::FinishToStart, 0)]
    #[case("2.1FS+3", "2.1", DependencyType::FinishToStart, 3)]
    #[case("1ss-2", "1", DependencyType::StartToStart, -2)]
    #[case(" 1.2 FF ", "1.2", DependencyType::FinishToFinish, 0)]
    #[case("1.1SF+10", "1.1", DependencyType::StartToFinish, 10)]
    #[case("1.1+1", "1.1", DependencyType::FinishToStart, 1)]
    fn test_parse_single(
        #[case] text: &str,
        #[case] predecessor: &str,
        #[case] kind: DependencyType,
        #[case] lag: i64,
    ) {
        let deps = parse_dependencies(text, &tasks(), "2.2").unwrap();
        assert_eq!(deps, vec![Dependency::new(predecessor, kind).with_lag(lag)]);
    }

    #[test]
    fn test_parse_list() {
        let deps = parse_dependencies("1.1, 2.1SS+1", &tasks(), "2.2").unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].predecessor_id, "1.1");
        assert_eq!(deps[1].predecessor_id, "2.1");
    }

    #[test]
    fn test_parse_empty_clears() {
        assert!(parse_dependencies("  ", &tasks(), "2.2").unwrap().is_empty());
    }

    #[rstest]
    #[case("1,,2", ParseError::EmptyReference)]
    #[case("FS", ParseError::InvalidPosition { entry: "FS".into() })]
    #[case("1..2", ParseError::InvalidPosition { entry: "1..2".into() })]
    #[case("9", ParseError::UnknownPosition { position: "9".into() })]
    #[case("1XX", ParseError::UnknownLinkType { entry: "1XX".into(), code: "XX".into() })]
    #[case("1FS+", ParseError::InvalidLag { entry: "1FS+".into(), lag: "+".into() })]
    #[case("1FS3", ParseError::InvalidLag { entry: "1FS3".into(), lag: "3".into() })]
    #[case("1FS+2d", ParseError::InvalidLag { entry: "1FS+2d".into(), lag: "+2d".into() })]
    #[case("2.2", ParseError::SelfReference { position: "2.2".into() })]
    fn test_parse_errors(#[case] text: &str, #[case] expected: ParseError) {
        assert_eq!(parse_dependencies(text, &tasks(), "2.2").unwrap_err(), expected);
    }

    #[test]
    fn test_one_bad_entry_fails_whole_list() {
        assert!(parse_dependencies("1.1, 7", &tasks(), "2.2").is_err());
    }

    #[test]
    fn test_format() {
        let all = tasks();
        let task = all[5]
            .clone()
            .with_dependency(Dependency::finish_to_start("1.1"))
            .with_dependency(Dependency::start_to_start("2.1"))
            .with_dependency(Dependency::finish_to_start("1").with_lag(3))
            .with_dependency(Dependency::start_to_start("1.2").with_lag(-2))
            .with_dependency(Dependency::finish_to_start("ghost"));
        assert_eq!(
            format_dependencies(&task, &all),
            "1.1, 2.1SS, 1FS+3, 1.2SS-2"
        );
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        let all = tasks();
        let task = all[5]
            .clone()
            .with_dependency(Dependency::new("1.2", DependencyType::FinishToFinish).with_lag(1))
            .with_dependency(Dependency::finish_to_start("2.1"));
        let text = format_dependencies(&task, &all);
        assert_eq!(parse_dependencies(&text, &all, "2.2").unwrap(), task.dependencies);
    }
}
