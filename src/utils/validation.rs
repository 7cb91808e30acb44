use crate::utils::error::{Result, SajuError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(SajuError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SajuError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_choices(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    if values.is_empty() {
        return Err(SajuError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("At least one value is required. Valid values: {}", allowed.join(", ")),
        });
    }

    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(SajuError::ConfigValidationError {
                field: field_name.to_string(),
                message: format!(
                    "Unsupported value '{}'. Valid values: {}",
                    value,
                    allowed.join(", ")
                ),
            });
        }
    }

    Ok(())
}

/// 生辰欄位的範圍檢查，失敗時回傳 InvalidInput
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SajuError::invalid_input(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 把字串欄位轉成整數，"1990"、" 7 " 都可以
pub fn parse_integer(field_name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SajuError::invalid_input(field_name, raw, "Value is not an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("month", 1, 1, 12).is_ok());
        assert!(validate_range("month", 12, 1, 12).is_ok());
        assert!(matches!(
            validate_range("month", 13, 1, 12),
            Err(SajuError::InvalidInput { .. })
        ));
        assert!(validate_range("year", 1899, 1900, 2100).is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("year", " 1990 ").unwrap(), 1990);
        assert!(matches!(
            parse_integer("year", "nineteen"),
            Err(SajuError::InvalidInput { .. })
        ));
        assert!(parse_integer("day", "").is_err());
    }

    #[test]
    fn test_validate_choices() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_choices("output.formats", &formats, &["csv", "json"]).is_ok());

        let invalid = vec!["xml".to_string()];
        assert!(validate_choices("output.formats", &invalid, &["csv", "json"]).is_err());
        assert!(validate_choices("output.formats", &[], &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./charts").is_ok());
        assert!(validate_path("output.path", "  ").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }
}
