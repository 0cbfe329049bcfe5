use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} not found: {id}")]
    NotFoundError { entity: &'static str, id: String },

    #[error("Snapshot error in {block} block: {message}")]
    SnapshotError { block: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Lookup,
    Persistence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ParkError {
    pub fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ParkError::InvalidValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        ParkError::NotFoundError {
            entity,
            id: id.to_string(),
        }
    }

    pub fn snapshot(block: impl Into<String>, message: impl Into<String>) -> Self {
        ParkError::SnapshotError {
            block: block.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParkError::ConfigError { .. }
            | ParkError::ConfigValidationError { .. }
            | ParkError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ParkError::InvalidValueError { .. } => ErrorCategory::Validation,
            ParkError::NotFoundError { .. } => ErrorCategory::Lookup,
            ParkError::IoError(_)
            | ParkError::SerializationError(_)
            | ParkError::CsvError(_)
            | ParkError::SnapshotError { .. } => ErrorCategory::Persistence,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Persistence => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ParkError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
            ParkError::SerializationError(_) | ParkError::SnapshotError { .. } => {
                "The snapshot file may be damaged; restore a backup or remove it to start empty"
                    .to_string()
            }
            ParkError::CsvError(_) => "Check the export directory permissions".to_string(),
            ParkError::ConfigError { .. } | ParkError::ConfigValidationError { .. } => {
                "Review the TOML configuration file".to_string()
            }
            ParkError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
            ParkError::InvalidValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            ParkError::NotFoundError { entity, .. } => {
                format!("List existing {} records to find a valid id", entity.to_lowercase())
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ParkError::NotFoundError { entity, id } => format!("{} '{}' does not exist", entity, id),
            ParkError::InvalidValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            ParkError::SnapshotError { block, message } => {
                format!("Could not read the {} data: {}", block, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let missing = ParkError::not_found("User", "u-1");
        assert_eq!(missing.category(), ErrorCategory::Lookup);
        assert_eq!(missing.severity(), ErrorSeverity::Low);

        let bad = ParkError::invalid_value("international_rate", -1.0, "must be positive");
        assert_eq!(bad.category(), ErrorCategory::Validation);
        assert!(bad.severity() < ErrorSeverity::High);

        let io = ParkError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message() {
        let missing = ParkError::not_found("Zone", "z-9");
        assert_eq!(missing.user_friendly_message(), "Zone 'z-9' does not exist");
        assert!(missing.recovery_suggestion().contains("zone"));
    }
}
