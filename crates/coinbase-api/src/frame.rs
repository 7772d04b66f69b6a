//! Data frame construction for the market data calls.
//!
//! Product and stats records become one polars column per JSON key, typed
//! from the values they hold. Candles become a fixed six-column frame led
//! by `timestamp`.

use polars::prelude::*;
use serde_json::{Map, Value};

use crate::types::{Candle, CANDLE_COLUMNS};

/// Frame construction errors.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    /// A row does not have one value per column.
    #[error("row {row} has {found} values, expected {expected}")]
    ShapeMismatch {
        /// Zero-based row position.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },
    /// A row is not the kind of JSON value the constructor takes.
    #[error("row {row} is not a JSON {expected}")]
    UnexpectedValue {
        /// Zero-based row position.
        row: usize,
        /// Expected JSON kind ("object" or "array").
        expected: &'static str,
    },
    /// The key column does not exist.
    #[error("column not found: {0}")]
    MissingColumn(String),
    /// Polars rejected the columns.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Build a frame from a list of JSON objects.
///
/// Columns are the union of keys in first-seen order; a record lacking a
/// key gets a null in that column. With `key` the matching column is moved
/// to the front and must exist in a non-empty list.
pub fn records_frame(records: Vec<Value>, key: Option<&str>) -> Result<DataFrame, TableError> {
    let mut objects = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(map) => objects.push(map),
            _ => {
                return Err(TableError::UnexpectedValue {
                    row,
                    expected: "object",
                })
            }
        }
    }
    objects_frame(&objects, key)
}

/// Build a single-row frame from one JSON object.
pub fn record_frame(record: Map<String, Value>) -> Result<DataFrame, TableError> {
    objects_frame(&[record], None)
}

/// Build the candle frame: `timestamp, low, high, open, close, volume`.
///
/// Rows keep the order given.
pub fn candles_frame(candles: &[Candle]) -> Result<DataFrame, TableError> {
    let timestamps: Vec<i64> = candles.iter().map(|c| c.timestamp).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let opens: Vec<f64> = candles.iter().map(|c| c.open).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let df = df![
        CANDLE_COLUMNS[0] => timestamps,
        CANDLE_COLUMNS[1] => lows,
        CANDLE_COLUMNS[2] => highs,
        CANDLE_COLUMNS[3] => opens,
        CANDLE_COLUMNS[4] => closes,
        CANDLE_COLUMNS[5] => volumes,
    ]?;
    Ok(df)
}

/// Decode raw candle rows, checking the arity of each one.
pub fn decode_candles(rows: Vec<Value>) -> crate::Result<Vec<Candle>> {
    let mut candles = Vec::with_capacity(rows.len());
    for (row, value) in rows.into_iter().enumerate() {
        let found = match &value {
            Value::Array(values) => values.len(),
            _ => {
                return Err(TableError::UnexpectedValue {
                    row,
                    expected: "array",
                }
                .into())
            }
        };
        if found != CANDLE_COLUMNS.len() {
            return Err(TableError::ShapeMismatch {
                row,
                expected: CANDLE_COLUMNS.len(),
                found,
            }
            .into());
        }
        candles.push(serde_json::from_value(value)?);
    }
    Ok(candles)
}

fn objects_frame(objects: &[Map<String, Value>], key: Option<&str>) -> Result<DataFrame, TableError> {
    let mut names: Vec<&str> = Vec::new();
    for object in objects {
        for name in object.keys() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    if let (Some(key), false) = (key, objects.is_empty()) {
        let pos = names
            .iter()
            .position(|n| *n == key)
            .ok_or_else(|| TableError::MissingColumn(key.to_string()))?;
        let name = names.remove(pos);
        names.insert(0, name);
    }

    let columns: Vec<Series> = names
        .iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> = objects
                .iter()
                .map(|object| object.get(*name).filter(|v| !v.is_null()))
                .collect();
            column_series(name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

// Strings, booleans and integers keep their type; mixed columns fall back to text
fn column_series(name: &str, cells: &[Option<&Value>]) -> Series {
    let present = || cells.iter().flatten();

    if present().all(|v| v.is_string()) {
        Series::new(name, text_cells(cells))
    } else if present().all(|v| v.is_boolean()) {
        let values: Vec<Option<bool>> = cells.iter().map(|v| v.and_then(Value::as_bool)).collect();
        Series::new(name, values)
    } else if present().all(|v| v.is_i64()) {
        let values: Vec<Option<i64>> = cells.iter().map(|v| v.and_then(Value::as_i64)).collect();
        Series::new(name, values)
    } else if present().all(|v| v.is_number()) {
        let values: Vec<Option<f64>> = cells.iter().map(|v| v.and_then(Value::as_f64)).collect();
        Series::new(name, values)
    } else {
        Series::new(name, text_cells(cells))
    }
}

fn text_cells(cells: &[Option<&Value>]) -> Vec<Option<String>> {
    cells
        .iter()
        .map(|v| {
            v.map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_union_of_keys() {
        let records = vec![
            json!({"id": "BTC-USD", "status": "online"}),
            json!({"id": "ETH-USD", "base_currency": "ETH"}),
        ];
        let df = records_frame(records, None).unwrap();

        assert_eq!(df.get_column_names(), ["id", "status", "base_currency"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("base_currency").unwrap().null_count(), 1);
        assert_eq!(df.column("status").unwrap().str().unwrap().get(1), None);
    }

    #[test]
    fn test_records_key_column_first() {
        let records = vec![
            json!({"status": "online", "id": "BTC-USD"}),
            json!({"status": "delisted", "id": "ETH-USD"}),
        ];
        let df = records_frame(records, Some("id")).unwrap();

        assert_eq!(df.get_column_names(), ["id", "status"]);
        let ids = df.column("id").unwrap().str().unwrap();
        assert_eq!(ids.get(1), Some("ETH-USD"));
    }

    #[test]
    fn test_records_keep_value_types() {
        let records = vec![
            json!({"disabled": false, "count": 3, "ratio": 0.5, "mixed": "a"}),
            json!({"disabled": true, "count": 4, "ratio": 1, "mixed": 2}),
        ];
        let df = records_frame(records, None).unwrap();

        assert_eq!(df.column("disabled").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("count").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("ratio").unwrap().dtype(), &DataType::Float64);
        let mixed = df.column("mixed").unwrap().str().unwrap();
        assert_eq!(mixed.get(1), Some("2"));
    }

    #[test]
    fn test_records_reject_non_objects() {
        let err = records_frame(vec![json!({"id": "a"}), json!(3)], None).unwrap_err();
        assert!(matches!(
            err,
            TableError::UnexpectedValue {
                row: 1,
                expected: "object"
            }
        ));
    }

    #[test]
    fn test_records_missing_key() {
        let err = records_frame(vec![json!({"name": "a"})], Some("id")).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(ref c) if c == "id"));
    }

    #[test]
    fn test_record_keeps_key_order() {
        let Value::Object(map) = json!({"open": "1", "high": "2", "low": "0.5", "volume": "10"})
        else {
            unreachable!()
        };
        let df = record_frame(map).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.get_column_names(), ["open", "high", "low", "volume"]);
    }

    #[test]
    fn test_candles_frame_columns() {
        let candles = decode_candles(vec![
            json!([1672617600, 16600.0, 16720.0, 16610.0, 16670.0, 110.0]),
            json!([1672531200, "16500", 16700, 16600.0, 16550.0, 120.5]),
        ])
        .unwrap();
        let df = candles_frame(&candles).unwrap();

        assert_eq!(df.get_column_names(), CANDLE_COLUMNS);
        assert_eq!(df.column("timestamp").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("low").unwrap().f64().unwrap().get(1), Some(16500.0));
        assert_eq!(df.column("high").unwrap().f64().unwrap().get(1), Some(16700.0));
    }

    #[test]
    fn test_decode_candles_shape_mismatch() {
        let err = decode_candles(vec![json!([1, 2.0, 3.0, 4.0, 5.0, 6.0]), json!([2, 4.0])])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Table(TableError::ShapeMismatch {
                row: 1,
                expected: 6,
                found: 2
            })
        ));
    }

    #[test]
    fn test_decode_candles_rejects_objects() {
        let err = decode_candles(vec![json!({"time": 1})]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Table(TableError::UnexpectedValue { row: 0, .. })
        ));
    }
}
