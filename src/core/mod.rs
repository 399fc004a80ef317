pub mod classifier;
pub mod coercion;
pub mod collection;
pub mod entity;
pub mod keys;

pub use crate::domain::model::{Collection, FieldValue, HydratedEntity, RealType, Template};
pub use crate::domain::ports::Hydratable;
pub use crate::utils::error::Result;
pub use classifier::{classify, Classify};
pub use coercion::{coerce, is_compatible};
pub use collection::{hydrate_collection, hydrate_collection_with, hydrate_records, HydrateOptions};
pub use entity::{hydrate_entity, hydrate_record};
pub use keys::{camelize, to_camel_case, transform_keys};
