//! MySQL type mappings.
//!
//! Value conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. A category-specific decoder extracts the value as JSON
//!
//! DECIMAL columns (the schema's money columns) are preserved as exact
//! strings rather than lossy floats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo};

/// Logical category for MySQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Binary,
    Json,
    Text,
}

/// Classify a MySQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Decimal first: overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }
    if lower.contains("int") || lower.contains("serial") {
        return TypeCategory::Integer;
    }
    if lower.contains("float") || lower.contains("double") || lower == "real" {
        return TypeCategory::Float;
    }
    if lower == "json" {
        return TypeCategory::Json;
    }
    if lower == "date" {
        return TypeCategory::Date;
    }
    if lower == "datetime" || lower == "timestamp" {
        return TypeCategory::DateTime;
    }
    if lower == "time" {
        return TypeCategory::Time;
    }
    if lower.contains("blob") || lower.contains("binary") {
        return TypeCategory::Binary;
    }

    // varchar, char, text, enum, set, year, ...
    TypeCategory::Text
}

/// Wrapper type for raw DECIMAL/NUMERIC values as strings.
/// This preserves the exact database representation.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Decode every column of a row into JSON values, in column order.
pub fn row_to_values(row: &MySqlRow) -> Vec<(String, JsonValue)> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let type_name = col.type_info().name();
            let category = categorize_type(type_name);
            let value = decode_column(row, idx, type_name, category);
            (col.name().to_string(), value)
        })
        .collect()
}

fn decode_column(row: &MySqlRow, idx: usize, type_name: &str, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Date => decode_date(row, idx),
        TypeCategory::DateTime => decode_datetime(row, idx),
        TypeCategory::Time => decode_time(row, idx),
        TypeCategory::Binary => decode_binary_col(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::Text => decode_text(row, idx, type_name),
    }
}

fn decode_decimal(row: &MySqlRow, idx: usize) -> JsonValue {
    match row.try_get::<Option<RawDecimal>, _>(idx) {
        Ok(Some(v)) => JsonValue::String(v.0),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::error!("Failed to decode DECIMAL: {:?}", e);
            JsonValue::Null
        }
    }
}

fn decode_integer(row: &MySqlRow, idx: usize) -> JsonValue {
    // Check NULL first
    if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
        return JsonValue::Null;
    }
    // Signed widths
    if let Ok(Some(v)) = row.try_get::<Option<i8>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    // Unsigned widths
    if let Ok(Some(v)) = row.try_get::<Option<u8>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u16>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u32>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    JsonValue::Null
}

fn decode_boolean(row: &MySqlRow, idx: usize) -> JsonValue {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::Bool)
        .unwrap_or(JsonValue::Null)
}

fn decode_float(row: &MySqlRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return serde_json::Number::from_f64(v as f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    JsonValue::Null
}

fn decode_date(row: &MySqlRow, idx: usize) -> JsonValue {
    row.try_get::<Option<NaiveDate>, _>(idx)
        .ok()
        .flatten()
        .map(|d| JsonValue::String(d.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_datetime(row: &MySqlRow, idx: usize) -> JsonValue {
    // TIMESTAMP decodes as DateTime<Utc>, DATETIME as NaiveDateTime
    if let Ok(Some(v)) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
        return JsonValue::String(v.to_rfc3339());
    }
    if let Ok(Some(v)) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return JsonValue::String(v.to_string());
    }
    JsonValue::Null
}

fn decode_time(row: &MySqlRow, idx: usize) -> JsonValue {
    row.try_get::<Option<NaiveTime>, _>(idx)
        .ok()
        .flatten()
        .map(|t| JsonValue::String(t.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_binary_col(row: &MySqlRow, idx: usize) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|v| match std::str::from_utf8(&v) {
            Ok(s) => JsonValue::String(s.to_string()),
            Err(_) => JsonValue::String(STANDARD.encode(&v)),
        })
        .unwrap_or(JsonValue::Null)
}

fn decode_json(row: &MySqlRow, idx: usize) -> JsonValue {
    row.try_get::<Option<serde_json::Value>, _>(idx)
        .ok()
        .flatten()
        .unwrap_or(JsonValue::Null)
}

fn decode_text(row: &MySqlRow, idx: usize, type_name: &str) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        if type_name.to_lowercase().contains("json") {
            if let Ok(json) = serde_json::from_str::<JsonValue>(&v) {
                return json;
            }
        }
        return JsonValue::String(v);
    }
    JsonValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_money_types() {
        assert_eq!(categorize_type("DECIMAL(12,2)"), TypeCategory::Decimal);
        assert_eq!(categorize_type("NUMERIC"), TypeCategory::Decimal);
    }

    #[test]
    fn test_categorize_integers() {
        assert_eq!(categorize_type("INT"), TypeCategory::Integer);
        assert_eq!(categorize_type("BIGINT UNSIGNED"), TypeCategory::Integer);
        assert_eq!(categorize_type("TINYINT"), TypeCategory::Integer);
    }

    #[test]
    fn test_categorize_temporal() {
        assert_eq!(categorize_type("DATE"), TypeCategory::Date);
        assert_eq!(categorize_type("DATETIME"), TypeCategory::DateTime);
        assert_eq!(categorize_type("TIMESTAMP"), TypeCategory::DateTime);
        assert_eq!(categorize_type("TIME"), TypeCategory::Time);
    }

    #[test]
    fn test_categorize_text_fallback() {
        assert_eq!(categorize_type("VARCHAR(50)"), TypeCategory::Text);
        assert_eq!(
            categorize_type("ENUM('Active','Expired')"),
            TypeCategory::Text
        );
        assert_eq!(categorize_type("YEAR"), TypeCategory::Text);
    }

    #[test]
    fn test_categorize_binary_and_json() {
        assert_eq!(categorize_type("BLOB"), TypeCategory::Binary);
        assert_eq!(categorize_type("VARBINARY(255)"), TypeCategory::Binary);
        assert_eq!(categorize_type("JSON"), TypeCategory::Json);
    }
}
