//! Exit codes for the tlm CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by fixing the arguments or file)
//! - 20-29: Internal errors (bugs, should be reported)

use tlm_telemetry::TelemetryError;

/// Exit codes for tlm operations.
///
/// These codes are a stable contract for scripts. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments, or a provider/field that is not in the recording
    ArgsError = 10,

    /// Config file missing, unreadable or invalid
    ConfigError = 12,

    /// File is not a supported telemetry recording (bad header or too large)
    UnsupportedFormat = 13,

    /// Stream header was valid but the records are not
    MalformedStream = 14,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            ExitCode::MalformedStream => "ERR_MALFORMED_STREAM",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&TelemetryError> for ExitCode {
    fn from(err: &TelemetryError) -> Self {
        match err {
            TelemetryError::UnsupportedFormat { .. } | TelemetryError::FileTooLarge { .. } => {
                ExitCode::UnsupportedFormat
            }
            TelemetryError::Io(_) => ExitCode::IoError,
            _ => ExitCode::MalformedStream,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::MalformedStream.is_user_error());
        assert!(!ExitCode::MalformedStream.is_internal_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert_eq!(i32::from(ExitCode::ConfigError), 12);
    }

    #[test]
    fn telemetry_errors_map_to_codes() {
        let unsupported = TelemetryError::UnsupportedFormat {
            version: 3,
            header_length: 8,
        };
        assert_eq!(ExitCode::from(&unsupported), ExitCode::UnsupportedFormat);

        let too_large = TelemetryError::FileTooLarge { size: 10, limit: 5 };
        assert_eq!(ExitCode::from(&too_large), ExitCode::UnsupportedFormat);

        let orphan = TelemetryError::OrphanedEvent { id: 2, parent: 9 };
        assert_eq!(ExitCode::from(&orphan), ExitCode::MalformedStream);

        let deep = TelemetryError::EventNestingTooDeep { id: 257, limit: 256 };
        assert_eq!(ExitCode::from(&deep), ExitCode::MalformedStream);

        let io = TelemetryError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn display_includes_name_and_code() {
        assert_eq!(ExitCode::MalformedStream.to_string(), "ERR_MALFORMED_STREAM (14)");
    }
}
