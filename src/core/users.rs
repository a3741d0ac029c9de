use crate::adapters::sources::StaticUserSource;
use crate::domain::model::Roster;
use crate::domain::ports::UserSource;
use crate::utils::error::Result;

/// 取得使用者名單 (內建來源)
pub async fn get_users() -> Result<Roster> {
    get_users_from(&StaticUserSource::default()).await
}

pub async fn get_users_from<U: UserSource + ?Sized>(source: &U) -> Result<Roster> {
    tracing::debug!("Fetching users from {}", source.describe());
    let users = source.fetch_users().await?;
    tracing::info!("Fetched {} users from {}", users.len(), source.describe());
    Ok(users)
}
