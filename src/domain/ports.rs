use crate::domain::model::{SourceKind, User};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> SourceKind;
    fn endpoint(&self) -> Option<&str>;
    fn file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_ms(&self) -> u64;
}

#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<User>>;

    /// 供日誌使用的來源描述
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: UserSource + ?Sized> UserSource for Box<T> {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        (**self).fetch_users().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
