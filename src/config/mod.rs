#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::display::OutputFormat;
use crate::domain::model::SourceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use toml_config::TomlConfig;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// 合併 TOML 與命令列後的最終設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    pub source_kind: SourceKind,
    pub endpoint: Option<String>,
    pub file: Option<String>,
    pub format: OutputFormat,
    pub greet: bool,
    pub output_path: String,
    pub output_file: Option<String>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            source_kind: SourceKind::Static,
            endpoint: None,
            file: None,
            format: OutputFormat::Text,
            greet: false,
            output_path: ".".to_string(),
            output_file: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry_attempts: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RosterSettings {
    /// 輸出檔名沒有副檔名時，依輸出格式補上
    pub fn output_file_name(&self) -> Option<String> {
        self.output_file.as_ref().map(|file| {
            if Path::new(file).extension().is_some() {
                file.clone()
            } else {
                format!("{}.{}", file, self.format.extension())
            }
        })
    }
}

impl From<TomlConfig> for RosterSettings {
    fn from(config: TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            source_kind: config.source.r#type,
            endpoint: config.source.endpoint,
            file: config.source.file,
            format: config.display.format,
            greet: config.display.greet,
            output_path: config.output.path.unwrap_or(defaults.output_path),
            output_file: config.output.file,
            timeout_seconds: config
                .source
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            retry_attempts: config
                .source
                .retry_attempts
                .unwrap_or(defaults.retry_attempts),
            retry_delay_ms: config
                .source
                .retry_delay_ms
                .unwrap_or(defaults.retry_delay_ms),
        }
    }
}

impl Validate for RosterSettings {
    fn validate(&self) -> Result<()> {
        match self.source_kind {
            SourceKind::Static => {}
            SourceKind::Http => {
                let endpoint = validate_required_field("source.endpoint", &self.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
            }
            SourceKind::File => {
                let file = validate_required_field("source.file", &self.file)?;
                validate_path("source.file", file)?;
                validate_file_extension("source.file", file, &["json", "csv"])?;
            }
        }

        validate_positive_number("source.timeout_seconds", self.timeout_seconds, 1)?;
        validate_path("output.path", &self.output_path)?;
        if let Some(file) = &self.output_file {
            validate_path("output.file", file)?;
        }

        Ok(())
    }
}

impl ConfigProvider for RosterSettings {
    fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms
    }
}
