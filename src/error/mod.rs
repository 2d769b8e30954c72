//! Error types and handling for license-collect
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by area:
//! - configuration and manifest lookup
//! - external tool invocation (lister, detector)
//! - reading dependency files (fatal only outside the per-dependency phase)
//! - writing the output bundle (always fatal)

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for license-collect operations
#[derive(Error, Diagnostic, Debug)]
pub enum LicenseCollectError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(license_collect::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(license_collect::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(license_collect::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Dependency manifest not found: {path}")]
    #[diagnostic(
        code(license_collect::config::manifest_not_found),
        help("Pass the module manifest with --dependency, e.g. --dependency ../my-service/go.mod")
    )]
    ManifestNotFound { path: String },

    // External tool errors
    #[error("External command '{command}' failed: {reason}")]
    #[diagnostic(
        code(license_collect::tool::failed),
        help("Check that the tool is installed and on PATH")
    )]
    ToolFailed { command: String, reason: String },

    #[error("External command '{command}' not found")]
    #[diagnostic(
        code(license_collect::tool::not_found),
        help("Install the tool or point --go-bin / --detector-bin at it")
    )]
    ToolNotFound { command: String },

    #[error("External command '{command}' timed out after {seconds}s")]
    #[diagnostic(code(license_collect::tool::timed_out))]
    ToolTimedOut { command: String, seconds: u64 },

    #[error("Malformed detector output: {reason}")]
    #[diagnostic(code(license_collect::tool::malformed_output))]
    MalformedDetectorOutput { reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(license_collect::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}: {reason}")]
    #[diagnostic(code(license_collect::output::dir_create_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("Failed to copy {from} to {path}: {reason}")]
    #[diagnostic(code(license_collect::output::copy_failed))]
    FileCopyFailed {
        from: String,
        path: String,
        reason: String,
    },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(license_collect::output::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(license_collect::fs::io_error))]
    IoError { message: String },

    #[error("Run cancelled before the bundle was written")]
    #[diagnostic(code(license_collect::cancelled))]
    Cancelled,
}

impl LicenseCollectError {
    /// Whether this error belongs to the output phase.
    /// Whether running the same command again may succeed.
    ///
    /// Only plain tool failures qualify; a missing binary, a hung tool or
    /// output that does not parse will fail the same way next time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LicenseCollectError::ToolFailed { .. })
    }

    pub fn is_output_failure(&self) -> bool {
        matches!(
            self,
            LicenseCollectError::DirCreateFailed { .. }
                | LicenseCollectError::FileCopyFailed { .. }
                | LicenseCollectError::FileWriteFailed { .. }
        )
    }
}

impl From<std::io::Error> for LicenseCollectError {
    fn from(err: std::io::Error) -> Self {
        LicenseCollectError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LicenseCollectError {
    fn from(err: serde_json::Error) -> Self {
        LicenseCollectError::MalformedDetectorOutput {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, LicenseCollectError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = LicenseCollectError::ManifestNotFound {
            path: "go.mod".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("license_collect::config::manifest_not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LicenseCollectError = io_err.into();
        assert!(matches!(err, LicenseCollectError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ not json");
        let err: LicenseCollectError = parse_result.unwrap_err().into();
        assert!(matches!(
            err,
            LicenseCollectError::MalformedDetectorOutput { .. }
        ));
    }

    #[test]
    fn test_output_failures_are_classified() {
        let copy = LicenseCollectError::FileCopyFailed {
            from: "/src/LICENSE".to_string(),
            path: "/out/LICENSE_a_b".to_string(),
            reason: "disk full".to_string(),
        };
        let read = LicenseCollectError::FileReadFailed {
            path: "/src/LICENSE".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(copy.is_output_failure());
        assert!(!read.is_output_failure());
    }

    #[test]
    fn test_only_tool_failures_are_retryable() {
        let failed = LicenseCollectError::ToolFailed {
            command: "licensee detect".to_string(),
            reason: "exit status: 1".to_string(),
        };
        let timed_out = LicenseCollectError::ToolTimedOut {
            command: "licensee detect".to_string(),
            seconds: 120,
        };
        let not_found = LicenseCollectError::ToolNotFound {
            command: "licensee detect".to_string(),
        };
        let malformed = LicenseCollectError::MalformedDetectorOutput {
            reason: "expected value".to_string(),
        };
        assert!(failed.is_retryable());
        assert!(!timed_out.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(!malformed.is_retryable());
    }

    test_error_contains!(
        test_copy_failed_names_both_paths,
        LicenseCollectError::FileCopyFailed {
            from: "/src/LICENSE".to_string(),
            path: "/out/LICENSE_a_b".to_string(),
            reason: "disk full".to_string(),
        },
        "/src/LICENSE",
        "/out/LICENSE_a_b"
    );

    test_error_contains!(
        test_timeout_names_command,
        LicenseCollectError::ToolTimedOut {
            command: "licensee".to_string(),
            seconds: 5,
        },
        "licensee",
        "5s"
    );

    test_error_contains!(
        test_cancelled_message,
        LicenseCollectError::Cancelled,
        "cancelled"
    );
}
