use chrono::SecondsFormat;
use serde::Serialize;

use crate::core::coercion::format_number;
use crate::domain::model::{FieldValue, HydratedEntity, Template};
use crate::utils::error::{HydrateError, Result};

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One header column per template field, one row per entity.
pub fn render_csv(template: &Template, entities: &[HydratedEntity]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(template.fields().map(|(name, _)| name))?;

    for entity in entities {
        let row: Vec<String> = template
            .fields()
            .map(|(name, _)| entity.get(name).map(to_cell).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HydrateError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| HydrateError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn to_cell(value: &FieldValue) -> String {
    match value {
        FieldValue::Undefined | FieldValue::Null | FieldValue::Date(None) => String::new(),
        FieldValue::Boolean(b) => b.to_string(),
        FieldValue::Number(n) => format_number(*n),
        FieldValue::String(s) => s.clone(),
        FieldValue::Date(Some(dt)) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        FieldValue::Array(_) | FieldValue::Object(_) => value.to_json().to_string(),
    }
}
