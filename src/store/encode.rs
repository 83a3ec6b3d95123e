//! Encoding between typed values and persisted rows
//!
//! Pure functions, no row-store access. `encode_rows` produces the desired
//! row set for a value (header first, elements in index order); the decode
//! helpers materialize rows back into values with NULL-column checks. A row
//! whose declared kind requires a column that is NULL never decodes to a
//! default; it is corruption and fails loudly.

use super::errors::{StoreError, StoreResult};
use super::row::{element_key, Row};
use crate::value::{Kind, Value};

fn scalar_row(key: String, kind: Kind, value: &Value) -> Row {
    let mut row = Row {
        key,
        kind: kind.code(),
        value_int: None,
        value_string: None,
        value_float: None,
    };
    match value {
        Value::Int(v) => row.value_int = Some(*v),
        Value::Bool(v) => row.value_int = Some(i64::from(*v)),
        Value::String(v) => row.value_string = Some(v.clone()),
        Value::Float(v) => row.value_float = Some(*v),
        // slice payloads never reach here; encode_rows splits them first
        _ => unreachable!("scalar_row called with a slice value"),
    }
    row
}

/// The full row set a value occupies: one row for scalars, a header row plus
/// one element row per member for slices.
pub fn encode_rows(key: &str, value: &Value) -> StoreResult<Vec<Row>> {
    value.validate()?;
    let kind = value.kind();

    let elements: Vec<Value> = match value {
        Value::SliceInt(v) => v.iter().copied().map(Value::Int).collect(),
        Value::SliceString(v) => v.iter().cloned().map(Value::String).collect(),
        Value::SliceFloat(v) => v.iter().copied().map(Value::Float).collect(),
        Value::SliceBool(v) => v.iter().copied().map(Value::Bool).collect(),
        scalar => return Ok(vec![scalar_row(key.to_owned(), kind, scalar)]),
    };

    let mut rows = Vec::with_capacity(elements.len() + 1);
    rows.push(Row {
        key: key.to_owned(),
        kind: kind.code(),
        value_int: Some(elements.len() as i64),
        value_string: None,
        value_float: None,
    });
    for (i, element) in elements.iter().enumerate() {
        rows.push(scalar_row(element_key(key, i), kind.element_kind(), element));
    }
    Ok(rows)
}

/// Decode a row carrying a scalar kind.
///
/// Fails with `CorruptRow` when the column the kind requires is NULL, or
/// when the row turns out to be a slice header.
pub fn decode_scalar(row: &Row) -> StoreResult<Value> {
    let kind = Kind::from_code(row.kind)?;
    let null_column = |column: &'static str| StoreError::CorruptRow {
        key: row.key.clone(),
        detail: format!("kind {} but {} is NULL", kind.name(), column),
    };

    match kind {
        Kind::Int => Ok(Value::Int(row.value_int.ok_or_else(|| null_column("value_int"))?)),
        Kind::Bool => Ok(Value::Bool(
            row.value_int.ok_or_else(|| null_column("value_int"))? != 0,
        )),
        Kind::String => Ok(Value::String(
            row.value_string
                .clone()
                .ok_or_else(|| null_column("value_string"))?,
        )),
        Kind::Float => Ok(Value::Float(
            row.value_float.ok_or_else(|| null_column("value_float"))?,
        )),
        slice => Err(StoreError::CorruptRow {
            key: row.key.clone(),
            detail: format!("expected a scalar row but kind is {}", slice.name()),
        }),
    }
}

/// Element count declared by a slice header row.
///
/// `None` for scalar rows. A header with a NULL or non-positive count is
/// corrupt: such a value cannot have been written by a successful set.
pub fn header_len(row: &Row) -> StoreResult<Option<usize>> {
    let kind = Kind::from_code(row.kind)?;
    if !kind.is_slice() {
        return Ok(None);
    }
    let count = row.value_int.ok_or_else(|| StoreError::CorruptSlice {
        key: row.key.clone(),
        detail: "slice header with NULL count".to_owned(),
    })?;
    if count <= 0 {
        return Err(StoreError::CorruptSlice {
            key: row.key.clone(),
            detail: format!("slice header with count {}", count),
        });
    }
    Ok(Some(count as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_encodes_to_single_row() {
        let rows = encode_rows("k", &Value::Bool(true)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, Kind::Bool.code());
        assert_eq!(rows[0].value_int, Some(1));
        assert_eq!(rows[0].value_string, None);
        assert_eq!(rows[0].value_float, None);
    }

    #[test]
    fn slice_encodes_to_header_plus_elements() {
        let rows = encode_rows("l", &Value::SliceString(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].key, "l");
        assert_eq!(rows[0].kind, Kind::SliceString.code());
        assert_eq!(rows[0].value_int, Some(2));
        assert_eq!(rows[1].key, "l[0]");
        assert_eq!(rows[1].kind, Kind::String.code());
        assert_eq!(rows[1].value_string.as_deref(), Some("a"));
        assert_eq!(rows[2].key, "l[1]");
        assert_eq!(rows[2].value_string.as_deref(), Some("b"));
    }

    #[test]
    fn empty_slice_does_not_encode() {
        assert!(encode_rows("l", &Value::SliceFloat(vec![])).is_err());
    }

    #[test]
    fn scalar_rows_round_trip_through_decode() {
        for value in [
            Value::Int(-3),
            Value::Bool(false),
            Value::String("s".into()),
            Value::Float(2.75),
        ] {
            let rows = encode_rows("k", &value).unwrap();
            assert_eq!(decode_scalar(&rows[0]).unwrap(), value);
        }
    }

    #[test]
    fn null_column_fails_decode() {
        let row = Row {
            key: "k".into(),
            kind: Kind::String.code(),
            value_int: None,
            value_string: None,
            value_float: None,
        };
        assert!(matches!(
            decode_scalar(&row),
            Err(StoreError::CorruptRow { .. })
        ));
    }

    #[test]
    fn nonzero_int_decodes_to_true() {
        let row = Row {
            key: "k".into(),
            kind: Kind::Bool.code(),
            value_int: Some(2),
            value_string: None,
            value_float: None,
        };
        assert_eq!(decode_scalar(&row).unwrap(), Value::Bool(true));
    }

    #[test]
    fn header_len_distinguishes_scalars_and_slices() {
        let rows = encode_rows("l", &Value::SliceInt(vec![1, 2, 3])).unwrap();
        assert_eq!(header_len(&rows[0]).unwrap(), Some(3));
        let rows = encode_rows("k", &Value::Int(1)).unwrap();
        assert_eq!(header_len(&rows[0]).unwrap(), None);
    }

    #[test]
    fn header_with_bad_count_is_corrupt() {
        let row = Row {
            key: "l".into(),
            kind: Kind::SliceInt.code(),
            value_int: Some(0),
            value_string: None,
            value_float: None,
        };
        assert!(matches!(
            header_len(&row),
            Err(StoreError::CorruptSlice { .. })
        ));
        let row = Row {
            key: "l".into(),
            kind: Kind::SliceInt.code(),
            value_int: None,
            value_string: None,
            value_float: None,
        };
        assert!(header_len(&row).is_err());
    }
}
