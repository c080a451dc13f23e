//! Error types shared by the checker, formatter and command layers.

use crate::model::PackageType;
use crate::output::OutputFormat;
use std::path::PathBuf;
use thiserror::Error;

/// A check that could not be completed.
///
/// Inside a batch these are reported to post-check callbacks and skipped.
/// Everywhere else they fail the command.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("No vulnerability data found for {} '{}'", .package_type.as_str(), .slug)]
    NotFound {
        package_type: PackageType,
        slug: String,
    },

    #[error("A {} slug must not be empty", .package_type.as_str())]
    EmptySlug { package_type: PackageType },

    #[error("Failed to load vulnerability database: {}\nDetails: {details}", .path.display())]
    Database { path: PathBuf, details: String },

    #[error("Failed to scan WordPress install: {}\nDetails: {details}", .path.display())]
    Scan { path: PathBuf, details: String },

    #[error("Could not determine the installed WordPress version")]
    MissingCoreVersion,
}

/// Rejected `--fields` values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{}", invalid_fields_message(.0))]
    Invalid(Vec<String>),

    #[error("At least one field must be requested")]
    Empty,
}

fn invalid_fields_message(names: &[String]) -> String {
    if names.len() == 1 {
        format!("{} is not a valid field", names[0])
    } else {
        format!("{} are not valid fields", names.join(", "))
    }
}

/// Misuse of the progress reporter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("Too much progress for one request: a progress bar is already open")]
    AlreadyOpen,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Fields(#[from] FieldError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error("Failed to render {format} output: {details}")]
    Render {
        format: OutputFormat,
        details: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_invalid_field_message() {
        let error = FieldError::Invalid(vec!["foo".to_string()]);
        assert_eq!(error.to_string(), "foo is not a valid field");
    }

    #[test]
    fn test_multiple_invalid_fields_message() {
        let error = FieldError::Invalid(vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(error.to_string(), "foo, bar are not valid fields");
    }

    #[test]
    fn test_not_found_display() {
        let error = CheckError::NotFound {
            package_type: PackageType::Plugin,
            slug: "akismet".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No vulnerability data found for plugin 'akismet'"
        );
    }

    #[test]
    fn test_command_error_is_transparent() {
        let error: CommandError = FieldError::Invalid(vec!["foo".to_string()]).into();
        assert_eq!(error.to_string(), "foo is not a valid field");

        let error: CommandError = ProgressError::AlreadyOpen.into();
        assert!(error.to_string().contains("Too much progress"));
    }

    #[test]
    fn test_database_error_display() {
        let error = CheckError::Database {
            path: PathBuf::from("/tmp/db.json"),
            details: "expected value".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("/tmp/db.json"));
        assert!(display.contains("expected value"));
    }
}
