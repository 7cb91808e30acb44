use crate::core::ConfigProvider;
use crate::domain::model::CalendarKind;
use crate::utils::error::{Result, SajuError};
use crate::utils::validation::{validate_choices, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];
pub const RECORD_ERROR_POLICIES: [&str; 2] = ["skip", "fail"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchConfig,
    pub defaults: Option<DefaultsConfig>,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: Option<String>,
    pub input_path: String,
    pub output_path: String,
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// 輸入列沒有 calendar 欄位時使用
    pub calendar: Option<CalendarKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    /// "skip" 跳過錯誤列並記錄，"fail" 遇錯即停
    pub on_record_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SajuError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SajuError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BIRTH_DATA_DIR})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SajuError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("batch.input_path", &self.batch.input_path)?;
        validate_path("batch.output_path", &self.batch.output_path)?;
        validate_choices(
            "batch.output_formats",
            &self.batch.output_formats,
            &OUTPUT_FORMATS,
        )?;

        if let Some(policy) = self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_record_error.clone())
        {
            validate_choices(
                "error_handling.on_record_error",
                &[policy],
                &RECORD_ERROR_POLICIES,
            )?;
        }

        Ok(())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.batch.input_path
    }

    fn output_path(&self) -> &str {
        &self.batch.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.batch.output_formats
    }

    fn default_calendar(&self) -> CalendarKind {
        self.defaults
            .as_ref()
            .and_then(|d| d.calendar)
            .unwrap_or_default()
    }

    fn skip_invalid_records(&self) -> bool {
        // 預設跳過
        self.error_handling
            .as_ref()
            .and_then(|e| e.on_record_error.as_deref())
            .map_or(true, |policy| policy == "skip")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
