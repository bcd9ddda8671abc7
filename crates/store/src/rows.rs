//! Dynamic row → JSON decoding.
//!
//! Analytical queries are model-authored, so the result shape is unknown at
//! compile time. Each column is decoded by its Postgres type name into a
//! JSON value. The transcript round-trips through a text-only channel to the
//! model, so date/time values become ISO-8601 strings and NUMERIC becomes a
//! float here, at the store boundary, before anything enters a payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use shopscope_core::error::StoreError;
use sqlx::postgres::{PgColumn, PgRow};
use sqlx::{Column, Row, TypeInfo};

/// Decode one row into an ordered JSON object keyed by column name.
pub fn row_to_json(row: &PgRow) -> Result<Map<String, Value>, StoreError> {
    let mut object = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column)?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn decode_column(row: &PgRow, idx: usize, column: &PgColumn) -> Result<Value, StoreError> {
    let type_name = column.type_info().name();

    macro_rules! get {
        ($ty:ty, $map:expr) => {
            row.try_get::<Option<$ty>, _>(idx)
                .map(|opt| opt.map($map).unwrap_or(Value::Null))
        };
    }

    let decoded = match type_name {
        "BOOL" => get!(bool, Value::Bool),
        "INT2" => get!(i16, |v| Value::from(v)),
        "INT4" => get!(i32, |v| Value::from(v)),
        "INT8" => get!(i64, |v| Value::from(v)),
        "FLOAT4" => get!(f32, |v| Value::from(f64::from(v))),
        "FLOAT8" => get!(f64, Value::from),
        "NUMERIC" => get!(Decimal, decimal_to_json),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => get!(String, Value::String),
        "DATE" => get!(NaiveDate, |v| Value::String(iso_date(v))),
        "TIME" => get!(NaiveTime, |v| Value::String(v.to_string())),
        "TIMESTAMP" => get!(NaiveDateTime, |v| Value::String(iso_datetime(v))),
        "TIMESTAMPTZ" => get!(DateTime<Utc>, |v| Value::String(v.to_rfc3339())),
        "UUID" => get!(uuid::Uuid, |v| Value::String(v.to_string())),
        "JSON" | "JSONB" => get!(Value, |v| v),
        // Unknown types: fall back to text, then give up with NULL.
        _ => row
            .try_get::<Option<String>, _>(idx)
            .map(|opt| opt.map(Value::String).unwrap_or(Value::Null))
            .or(Ok(Value::Null)),
    };

    decoded.map_err(|e| StoreError::Decode {
        column: column.name().to_string(),
        reason: e.to_string(),
    })
}

/// NUMERIC → f64. The transcript carries floats, not decimal strings.
pub fn decimal_to_json(value: Decimal) -> Value {
    value
        .to_f64()
        .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
        .unwrap_or(Value::Null)
}

/// DATE → ISO-8601 (`2024-03-01`).
pub fn iso_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// TIMESTAMP → ISO-8601 (`2024-03-01T14:30:00`), fractional seconds only
/// when present.
pub fn iso_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn decimal_becomes_float() {
        let value = decimal_to_json(Decimal::from_str("1299.99").unwrap());
        assert_eq!(value, Value::from(1299.99));
    }

    #[test]
    fn date_is_iso8601() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(iso_date(date), "2024-03-01");
    }

    #[test]
    fn datetime_is_iso8601_with_t_separator() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(iso_datetime(dt), "2024-03-01T14:30:00");
    }

    #[test]
    fn normalization_is_idempotent() {
        // Once a payload holds an ISO string and a float, re-serializing it
        // any number of times yields the same logical values.
        let payload = serde_json::json!({
            "timestamp": iso_datetime(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(14, 30, 0).unwrap()
            ),
            "amount": decimal_to_json(Decimal::from_str("42.50").unwrap()),
        });

        let once: Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        let twice: Value = serde_json::from_str(&serde_json::to_string(&once).unwrap()).unwrap();

        assert_eq!(payload, once);
        assert_eq!(once, twice);
        assert_eq!(twice["timestamp"], Value::from("2024-03-01T14:30:00"));
        assert_eq!(twice["amount"], Value::from(42.5));
    }
}
