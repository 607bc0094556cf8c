//! Error types and error codes for the quota engine
//!
//! This module defines:
//! - `QuotaError`: errors raised around (never inside) quota evaluation
//! - `ErrorCode`: structured error codes for callers that surface them

use serde::{Deserialize, Serialize};

/// Quota specific error types
#[derive(thiserror::Error, Debug)]
pub enum QuotaError {
    #[error("unrecognized quota limit subject: {0}")]
    UnrecognizedSubject(String),

    #[error("invalid quota limit {0}: must be -1 (unlimited) or a non-negative byte count")]
    InvalidLimit(i64),

    #[error("invalid size: {0}")]
    InvalidSize(String),

    #[error("quota subject '{0}' has no usage counter")]
    UncountedSubject(String),

    #[error("invalid byte count {0}: usage cannot shrink")]
    NegativeBytes(i64),

    #[error("rule '{rule}' is already in group '{group}'")]
    RuleAlreadyInGroup { group: String, rule: String },

    #[error("rule '{rule}' is not in group '{group}'")]
    RuleNotInGroup { group: String, rule: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("quota source error: {0}")]
    Source(#[from] anyhow::Error),

    #[error("user {user_id} is over quota for '{subject}'")]
    QuotaExceeded { user_id: i64, subject: String },
}

impl QuotaError {
    /// Structured code for this error
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            QuotaError::UnrecognizedSubject(_)
            | QuotaError::InvalidLimit(_)
            | QuotaError::InvalidSize(_)
            | QuotaError::UncountedSubject(_)
            | QuotaError::NegativeBytes(_) => PARAMETER_VALIDATE_ERROR,
            QuotaError::RuleAlreadyInGroup { .. } => RESOURCE_CONFLICT,
            QuotaError::RuleNotInGroup { .. } => RESOURCE_NOT_FOUND,
            QuotaError::ConfigError(_) => CONFIG_ERROR,
            QuotaError::Source(_) => DATA_ACCESS_ERROR,
            QuotaError::QuotaExceeded { .. } => OVER_QUOTA,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, QuotaError::QuotaExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, QuotaError>;

/// Error code structure for API responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const CONFIG_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "quota configuration error",
};

pub const OVER_QUOTA: ErrorCode<'static> = ErrorCode {
    code: 5035,
    message: "quota exceeded",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_display() {
        let err = QuotaError::UnrecognizedSubject("size:nope".to_string());
        assert_eq!(
            format!("{}", err),
            "unrecognized quota limit subject: size:nope"
        );

        let err = QuotaError::RuleNotInGroup {
            group: "users".to_string(),
            rule: "lfs".to_string(),
        };
        assert_eq!(format!("{}", err), "rule 'lfs' is not in group 'users'");

        let err = QuotaError::QuotaExceeded {
            user_id: 7,
            subject: "size:git:lfs".to_string(),
        };
        assert_eq!(format!("{}", err), "user 7 is over quota for 'size:git:lfs'");
    }

    #[test]
    fn test_error_codes() {
        let err = QuotaError::QuotaExceeded {
            user_id: 1,
            subject: "size:all".to_string(),
        };
        assert!(err.is_quota_exceeded());
        assert_eq!(err.error_code(), OVER_QUOTA);

        assert_eq!(
            QuotaError::InvalidLimit(-2).error_code().code,
            PARAMETER_VALIDATE_ERROR.code
        );
        assert_eq!(
            QuotaError::NegativeBytes(-1).error_code(),
            PARAMETER_VALIDATE_ERROR
        );
        assert_eq!(
            QuotaError::RuleNotInGroup {
                group: "vip".to_string(),
                rule: "lfs".to_string(),
            }
            .error_code(),
            RESOURCE_NOT_FOUND
        );
    }

    #[test]
    fn test_source_error_from_anyhow() {
        let err: QuotaError = anyhow::anyhow!("connection refused").into();
        assert!(matches!(err, QuotaError::Source(_)));
        assert_eq!(format!("{}", err), "quota source error: connection refused");
        assert_eq!(err.error_code(), DATA_ACCESS_ERROR);
    }
}
