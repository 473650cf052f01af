use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to tell a failed version check apart
/// from a broken invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no conflicts, or conflicts that are configured not to fail the build
    Success = 0,
    /// Version conflicts were detected and the fail flags turned them into a failure
    ConflictsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, unresolved dependencies, file I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ConflictsDetected => write!(f, "Conflicts Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised while checking dependency versions.
///
/// Variants that drive recovery policy (unresolved dependencies, model
/// building) are recovered from `anyhow::Error` with `downcast_ref`.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid configuration: {message}\n\n💡 Hint: Check the scope, strategy names and exclusions in your configuration")]
    InvalidConfiguration { message: String },

    #[error("Could not resolve the following dependencies: [{}]", .dependencies.join(", "))]
    UnresolvedDependencies { dependencies: Vec<String> },

    #[error("Cannot determine the recommended version of dependency '{dependency}'; its version specification is '{specification}', and the resolved version is '{resolved}'.")]
    RangeInconsistency {
        dependency: String,
        specification: String,
        resolved: String,
    },

    #[error("Could not build the project model for {artifact}: {details}")]
    ModelBuilding { artifact: String, details: String },

    #[error("Invalid version specification '{specification}': {details}")]
    InvalidVersionRange {
        specification: String,
        details: String,
    },

    #[error("Version check failed for [{}]\n{message}", .roots.join(", "))]
    Execution { roots: Vec<String>, message: String },

    #[error("Failed to parse dependency graph snapshot: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is a dependency graph snapshot in JSON format")]
    GraphSnapshotError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CheckError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        CheckError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ConflictsDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::ConflictsDetected),
            "Conflicts Detected (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_invalid_configuration_display() {
        let error = CheckError::invalid_configuration("Scope 'bogus' is unknown!");
        let display = error.to_string();
        assert!(display.contains("Scope 'bogus' is unknown!"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_unresolved_dependencies_lists_every_dependency() {
        let error = CheckError::UnresolvedDependencies {
            dependencies: vec![
                "g:a:jar:1.0 [compile]".to_string(),
                "g:b:jar:2.0 [test, optional]".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Could not resolve the following dependencies: [g:a:jar:1.0 [compile], g:b:jar:2.0 [test, optional]]"
        );
    }

    #[test]
    fn test_range_inconsistency_display() {
        let error = CheckError::RangeInconsistency {
            dependency: "g:a:jar:[1.0,2.0) [compile]".to_string(),
            specification: "[1.0,2.0)".to_string(),
            resolved: "2.5".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("'[1.0,2.0)'"));
        assert!(display.contains("'2.5'"));
    }

    #[test]
    fn test_execution_display_names_roots() {
        let error = CheckError::Execution {
            roots: vec!["g:a".to_string(), "g:b".to_string()],
            message: "boom".to_string(),
        };
        let display = error.to_string();
        assert!(display.starts_with("Version check failed for [g:a, g:b]"));
        assert!(display.ends_with("boom"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let error: anyhow::Error = CheckError::ModelBuilding {
            artifact: "g:a:pom:1.0".to_string(),
            details: "Unknown packaging: bundle".to_string(),
        }
        .into();
        assert!(matches!(
            error.downcast_ref::<CheckError>(),
            Some(CheckError::ModelBuilding { .. })
        ));
    }
}
