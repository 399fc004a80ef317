pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{EnvToken, FetchClient, NoToken, StaticToken};
pub use app::MovieService;
pub use config::AppConfig;
pub use core::{
    camelize, classify, coerce, hydrate_collection, hydrate_collection_with, hydrate_entity,
    hydrate_record, hydrate_records, is_compatible, transform_keys, Classify, HydrateOptions,
};
pub use domain::model::{Collection, FieldValue, HydratedEntity, RealType, Template};
pub use domain::movie::Movie;
pub use domain::ports::{ConfigProvider, Hydratable, JsonFetcher, TokenProvider};
pub use utils::error::{HydrateError, Result};
