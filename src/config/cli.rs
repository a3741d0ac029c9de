use crate::config::toml_config::TomlConfig;
use crate::config::RosterSettings;
use crate::core::display::OutputFormat;
use crate::domain::model::SourceKind;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "user-roster")]
#[command(about = "Fetch a list of users and display them")]
pub struct CliConfig {
    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Users endpoint for the http source
    #[arg(long)]
    pub endpoint: Option<String>,

    /// JSON or CSV file for the file source
    #[arg(long)]
    pub file: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory the output file is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Also write the rendered roster to this file
    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Print a timestamped greeting before the roster
    #[arg(long)]
    pub greet: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 先載入 TOML (若有)，再套用命令列覆蓋
    pub fn resolve(&self) -> Result<RosterSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                RosterSettings::from(TomlConfig::from_file(path)?)
            }
            None => RosterSettings::default(),
        };

        if let Some(source) = self.source {
            settings.source_kind = source;
        }
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = Some(endpoint.clone());
        }
        if let Some(file) = &self.file {
            settings.file = Some(file.clone());
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(output_path) = &self.output_path {
            settings.output_path = output_path.clone();
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(attempts) = self.retry_attempts {
            settings.retry_attempts = attempts;
        }
        settings.greet |= self.greet;

        Ok(settings)
    }
}
