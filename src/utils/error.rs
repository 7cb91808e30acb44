use thiserror::Error;

#[derive(Error, Debug)]
pub enum SajuError {
    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Lunar to solar conversion failed: {message}")]
    Conversion { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

/// 錯誤分類，供 CLI 決定如何呈現
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Conversion,
    Io,
    Configuration,
}

/// 錯誤嚴重程度，對應 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 生辰資料本身有問題，修正輸入即可
    Medium,
    /// 設定錯誤
    High,
    /// 讀寫檔案或序列化失敗
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SajuError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        SajuError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        SajuError::Conversion {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SajuError::InvalidInput { .. } => ErrorCategory::Input,
            SajuError::Conversion { .. } => ErrorCategory::Conversion,
            SajuError::CsvError(_) | SajuError::IoError(_) | SajuError::SerializationError(_) => {
                ErrorCategory::Io
            }
            SajuError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Conversion => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SajuError::InvalidInput { .. } => {
                "Check that year is 1900-2100, month is 1-12 and day is a real day of that month"
            }
            SajuError::Conversion { .. } => {
                "Check the lunar date exists (month length, leap month) and lies within 1900-2100"
            }
            SajuError::CsvError(_) => "Make sure the input CSV has a header row with year,month,day",
            SajuError::IoError(_) => "Check that the file exists and the output path is writable",
            SajuError::SerializationError(_) => "Inspect the generated data for invalid values",
            SajuError::ConfigValidationError { .. } => "Fix the configuration value and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SajuError::InvalidInput { field, reason, .. } => {
                format!("生辰資料不正確 ({}): {}", field, reason)
            }
            SajuError::Conversion { message } => format!("陰曆轉換失敗: {}", message),
            SajuError::ConfigValidationError { field, message } => {
                format!("設定錯誤 ({}): {}", field, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SajuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_data_errors_are_medium_severity() {
        let err = SajuError::invalid_input("month", 13, "Value must be between 1 and 12");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.severity().exit_code(), 2);
        assert!(err.to_string().contains("month"));

        let err = SajuError::conversion("day 30 does not exist");
        assert_eq!(err.category(), ErrorCategory::Conversion);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("day 30"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: SajuError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SajuError::ConfigValidationError {
            field: "batch.output_formats".to_string(),
            message: "Unsupported value 'xml'".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.severity().exit_code(), 1);
    }
}
