//! Input validation for task names and descriptions.
//!
//! Both fields are checked independently, so a single call can report a
//! name issue and a description issue together. Nothing reaches the store
//! unless every rule passes.
//!
//! Lengths are measured in UTF-16 code units, the same as the web client
//! reading this data. A character outside the Basic Multilingual Plane
//! (most emoji) counts as two.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Maximum trimmed length of a task name, in UTF-16 code units
pub const NAME_MAX_LEN: usize = 100;

/// Maximum trimmed length of a task description, in UTF-16 code units
pub const DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    NameRequired,
    NameTooLong,
    DescriptionRequired,
    DescriptionTooLong,
}

impl ValidationIssue {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationIssue::NameRequired | ValidationIssue::NameTooLong => "name",
            ValidationIssue::DescriptionRequired | ValidationIssue::DescriptionTooLong => {
                "description"
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationIssue::NameRequired => "Task name is required",
            ValidationIssue::NameTooLong => "Task name must be at most 100 characters",
            ValidationIssue::DescriptionRequired => "Description is required",
            ValidationIssue::DescriptionTooLong => "Description must be at most 500 characters",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

/// Field-level failures from a rejected submission
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn contains(&self, issue: ValidationIssue) -> bool {
        self.issues.contains(&issue)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|issue| issue.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Trimmed name and description that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub name: String,
    pub description: String,
}

fn check_field(
    value: &str,
    max_len: usize,
    required: ValidationIssue,
    too_long: ValidationIssue,
    issues: &mut Vec<ValidationIssue>,
) {
    let len = value.encode_utf16().count();
    if len == 0 {
        issues.push(required);
    } else if len > max_len {
        issues.push(too_long);
    }
}

/// Validate a create/update submission
///
/// Returns the trimmed values on success, or `Error::Validation` carrying
/// every failed rule.
pub fn validate_task_input(name: &str, description: &str) -> Result<TaskInput> {
    let name = name.trim();
    let description = description.trim();

    let mut issues = Vec::new();
    check_field(
        name,
        NAME_MAX_LEN,
        ValidationIssue::NameRequired,
        ValidationIssue::NameTooLong,
        &mut issues,
    );
    check_field(
        description,
        DESCRIPTION_MAX_LEN,
        ValidationIssue::DescriptionRequired,
        ValidationIssue::DescriptionTooLong,
        &mut issues,
    );

    if !issues.is_empty() {
        return Err(Error::Validation(ValidationErrors { issues }));
    }

    Ok(TaskInput {
        name: name.to_string(),
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues_for(name: &str, description: &str) -> Vec<ValidationIssue> {
        match validate_task_input(name, description) {
            Err(Error::Validation(errors)) => errors.issues().to_vec(),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(input) => panic!("expected failure, got {input:?}"),
        }
    }

    #[test]
    fn trims_accepted_input() {
        let input = validate_task_input("  Buy milk ", "\t2 liters\n").expect("valid");
        assert_eq!(input.name, "Buy milk");
        assert_eq!(input.description, "2 liters");
    }

    #[test]
    fn whitespace_name_is_required() {
        assert_eq!(issues_for("   ", "ok"), vec![ValidationIssue::NameRequired]);
    }

    #[test]
    fn name_over_limit_is_too_long() {
        let name = "n".repeat(NAME_MAX_LEN + 1);
        assert_eq!(issues_for(&name, "ok"), vec![ValidationIssue::NameTooLong]);

        let exact = "n".repeat(NAME_MAX_LEN);
        assert!(validate_task_input(&exact, "ok").is_ok());
    }

    #[test]
    fn description_limit_is_inclusive() {
        let exact = "d".repeat(DESCRIPTION_MAX_LEN);
        assert!(validate_task_input("name", &exact).is_ok());

        let over = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        assert_eq!(
            issues_for("name", &over),
            vec![ValidationIssue::DescriptionTooLong]
        );
    }

    #[test]
    fn surrounding_whitespace_does_not_count() {
        let padded = format!("   {}   ", "n".repeat(NAME_MAX_LEN));
        assert!(validate_task_input(&padded, "ok").is_ok());
    }

    #[test]
    fn length_counts_utf16_units_not_bytes() {
        let name = "é".repeat(NAME_MAX_LEN);
        assert!(name.len() > NAME_MAX_LEN);
        assert!(validate_task_input(&name, "ok").is_ok());
    }

    #[test]
    fn astral_characters_count_twice() {
        // 60 emoji are 120 UTF-16 units.
        let name = "\u{1F600}".repeat(60);
        assert_eq!(issues_for(&name, "ok"), vec![ValidationIssue::NameTooLong]);

        let name = "\u{1F600}".repeat(NAME_MAX_LEN / 2);
        assert!(validate_task_input(&name, "ok").is_ok());
    }

    #[test]
    fn errors_report_contained_issues() {
        let err = match validate_task_input("ok", "") {
            Err(Error::Validation(errors)) => errors,
            other => panic!("unexpected result: {other:?}"),
        };
        assert!(err.contains(ValidationIssue::DescriptionRequired));
        assert!(!err.contains(ValidationIssue::NameRequired));
    }

    #[test]
    fn both_fields_report_together() {
        let issues = issues_for("", &"d".repeat(DESCRIPTION_MAX_LEN + 1));
        assert_eq!(
            issues,
            vec![
                ValidationIssue::NameRequired,
                ValidationIssue::DescriptionTooLong
            ]
        );
    }

    #[test]
    fn display_lists_field_messages() {
        let err = validate_task_input("", "").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("name: Task name is required"));
        assert!(text.contains("description: Description is required"));
    }
}
