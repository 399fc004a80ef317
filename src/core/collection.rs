use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::classifier::Classify;
use crate::core::entity::{hydrate_entity, hydrate_record};
use crate::domain::model::{Collection, HydratedEntity, Template, COLLECTION_DATA_FIELD};
use crate::domain::ports::Hydratable;
use crate::utils::error::{HydrateError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrateOptions {
    /// Drop records that fail hydration instead of aborting the batch.
    #[serde(default)]
    pub ignore_errors: bool,
}

impl HydrateOptions {
    pub fn ignoring_errors() -> Self {
        Self {
            ignore_errors: true,
        }
    }
}

/// Hydrates a bare array or a collection wrapper element by element.
///
/// `collection` supplies the output's starting metadata. Non-null sibling
/// fields of a wrapper input are copied over it verbatim. Element order is
/// preserved; with `ignore_errors` set, elements failing with a record-level
/// error are dropped without leaving a gap.
pub fn hydrate_collection_with<T, F>(
    raw: &Value,
    collection: Collection<T>,
    mut hydrate: F,
    options: HydrateOptions,
) -> Result<Collection<T>>
where
    F: FnMut(&Value) -> Result<T>,
{
    let empty: &[Value] = &[];
    let (elements, wrapper) = match raw {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(map) => {
            let items = match map.get(COLLECTION_DATA_FIELD) {
                None | Some(Value::Null) => empty,
                Some(Value::Array(items)) => items.as_slice(),
                Some(other) => {
                    return Err(HydrateError::InvalidCollection {
                        message: format!(
                            "`{}` must be an array, found {}",
                            COLLECTION_DATA_FIELD,
                            other.real_type()
                        ),
                    })
                }
            };
            (items, Some(map))
        }
        other => {
            return Err(HydrateError::InvalidCollection {
                message: format!("expected an array or an object, found {}", other.real_type()),
            })
        }
    };

    let mut output = Collection {
        data: Vec::with_capacity(elements.len()),
        extra: collection.extra,
    };
    if let Some(map) = wrapper {
        for (key, value) in map {
            if key != COLLECTION_DATA_FIELD && !value.is_null() {
                output.extra.insert(key.clone(), value.clone());
            }
        }
    }

    let mut skipped = 0usize;
    for (index, element) in elements.iter().enumerate() {
        match hydrate(element) {
            Ok(entity) => output.data.push(entity),
            Err(e) if options.ignore_errors && e.is_record_error() => {
                tracing::debug!(index, error = %e, "Skipping record that failed hydration");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        hydrated = output.data.len(),
        skipped,
        "Collection hydration finished"
    );
    Ok(output)
}

/// Hydrates a collection into typed entities.
pub fn hydrate_collection<T: Hydratable>(
    raw: &Value,
    collection: Collection<T>,
    options: HydrateOptions,
) -> Result<Collection<T>> {
    hydrate_collection_with(raw, collection, hydrate_entity::<T>, options)
}

/// Hydrates a collection against templates built by `factory`, one per element.
pub fn hydrate_records<F>(
    raw: &Value,
    collection: Collection<HydratedEntity>,
    factory: F,
    options: HydrateOptions,
) -> Result<Collection<HydratedEntity>>
where
    F: Fn() -> Template,
{
    hydrate_collection_with(raw, collection, |record| hydrate_record(record, &factory()), options)
}
