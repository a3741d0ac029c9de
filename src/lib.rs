pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::sources::{build_source, FileUserSource, HttpUserSource, StaticUserSource};
pub use crate::adapters::storage::LocalStorage;
pub use crate::config::RosterSettings;
pub use crate::core::display::{render, OutputFormat};
pub use crate::core::engine::{RosterEngine, RunReport};
pub use crate::core::users::{get_users, get_users_from};
pub use crate::domain::model::{SourceKind, User};
pub use crate::utils::error::{Result, RosterError};
