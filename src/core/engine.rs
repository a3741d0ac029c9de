use crate::core::display::{render, OutputFormat};
use crate::core::users::get_users_from;
use crate::domain::model::Roster;
use crate::domain::ports::{Storage, UserSource};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub users: Roster,
    pub rendered: String,
    pub output_path: Option<String>,
}

pub struct RosterEngine<U: UserSource, S: Storage> {
    source: U,
    storage: S,
    format: OutputFormat,
    output_file: Option<String>,
}

impl<U: UserSource, S: Storage> RosterEngine<U, S> {
    pub fn new(source: U, storage: S, format: OutputFormat) -> Self {
        Self {
            source,
            storage,
            format,
            output_file: None,
        }
    }

    /// 設定後會把輸出寫入 storage
    pub fn with_output_file(mut self, output_file: Option<String>) -> Self {
        self.output_file = output_file;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting roster run");

        let users = get_users_from(&self.source).await?;

        tracing::debug!("Rendering {} users as {:?}", users.len(), self.format);
        let rendered = render(&users, self.format)?;

        let output_path = match &self.output_file {
            Some(file) => {
                self.storage.write_file(file, rendered.as_bytes()).await?;
                tracing::info!("📁 Roster saved to: {}", file);
                Some(file.clone())
            }
            None => None,
        };

        Ok(RunReport {
            users,
            rendered,
            output_path,
        })
    }
}
