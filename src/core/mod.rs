pub mod display;
pub mod engine;
pub mod greeting;
pub mod users;

pub use crate::domain::model::{Roster, User};
pub use crate::domain::ports::{ConfigProvider, Storage, UserSource};
pub use crate::utils::error::Result;
