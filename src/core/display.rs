use crate::domain::model::User;
use crate::utils::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(RosterError::InvalidConfigValueError {
                field: "display.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

pub fn render(users: &[User], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(users)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(users)?),
        OutputFormat::Csv => render_csv(users),
    }
}

fn render_text(users: &[User]) -> String {
    users
        .iter()
        .map(|user| format!("{}\n", user.full_name()))
        .collect()
}

fn render_csv(users: &[User]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // 空名單也要輸出標頭
    writer.write_record(["first_name", "last_name"])?;
    for user in users {
        writer.write_record([&user.first_name, &user.last_name])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| RosterError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })?;
    String::from_utf8(data).map_err(|e| RosterError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
