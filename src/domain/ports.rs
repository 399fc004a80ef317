use crate::domain::model::{HydratedEntity, Template};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A typed entity that can be built from a hydrated record.
pub trait Hydratable: Sized {
    /// Entity factory: a fresh template for every record.
    fn template() -> Template;

    fn from_entity(entity: HydratedEntity) -> Result<Self>;
}

/// Supplies the auth token attached to outgoing API requests.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_key(&self) -> &str;
}

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value>;
}
