//! # collection.rs
//!
//! Length, indexing and slicing helpers.
//!
//! Strings are measured and indexed by byte, lists by element, maps by
//! string key.

use crate::error::FuncError;
use crate::value::{Kind, Value};

pub(crate) fn len(args: &[Value]) -> Result<Value, FuncError>
{
    let n = match &args[0] {
        Value::Str(s) => s.len(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => return Err(FuncError::NoLength(other.kind())),
    };
    Ok(Value::Int(n as i64))
}

fn position(index: &Value, container: Kind, len: usize) -> Result<usize, FuncError>
{
    let i = index.as_index().ok_or(FuncError::BadIndexType {
        container,
        key: index.kind(),
    })?;
    usize::try_from(i)
        .ok()
        .filter(|&i| i < len)
        .ok_or(FuncError::IndexOutOfRange { index: i, len })
}

fn index_one(item: &Value, index: &Value) -> Result<Value, FuncError>
{
    match item {
        Value::List(items) => {
            let i = position(index, Kind::List, items.len())?;
            Ok(items[i].clone())
        },
        Value::Str(s) => {
            let i = position(index, Kind::Str, s.len())?;
            Ok(Value::Uint(u64::from(s.as_bytes()[i])))
        },
        Value::Map(map) => match index {
            Value::Str(key) => Ok(map.get(key).cloned().unwrap_or_default()),
            other => Err(FuncError::BadIndexType { container: Kind::Map, key: other.kind() }),
        },
        Value::Nil => Err(FuncError::BadArgument("index of untyped nil".into())),
        other => Err(FuncError::NotIndexable(other.kind())),
    }
}

/// `index item i j ...` is `item[i][j]...`.
pub(crate) fn index(args: &[Value]) -> Result<Value, FuncError>
{
    let (item, indexes) = args.split_first()
        .ok_or_else(|| FuncError::BadArgument("index of nothing".into()))?;

    let mut current = item.clone();
    for index in indexes {
        current = index_one(&current, index)?;
    }
    Ok(current)
}

fn slice_bound(index: &Value) -> Result<usize, FuncError>
{
    let i = index.as_index()
        .ok_or_else(|| FuncError::InvalidSliceIndex(format!("non-integer index of type {}", index.kind())))?;
    usize::try_from(i).map_err(|_| FuncError::InvalidSliceIndex(i.to_string()))
}

/// Checks `0 <= i <= j <= cap` and returns `(i, j)`.
fn bounds(indexes: &[Value], len: usize) -> Result<(usize, usize), FuncError>
{
    let bounds = indexes.iter().map(slice_bound).collect::<Result<Vec<_>, _>>()?;
    let cap = bounds.get(2).copied().unwrap_or(len);
    let i = bounds.first().copied().unwrap_or(0);
    let j = bounds.get(1).copied().unwrap_or(cap.min(len));

    if cap > len {
        return Err(FuncError::IndexOutOfRange { index: cap as i64, len });
    }
    if j > cap {
        return Err(FuncError::IndexOutOfRange { index: j as i64, len });
    }
    if i > j {
        return Err(FuncError::InvalidSliceIndex(format!("{i} > {j}")));
    }
    Ok((i, j))
}

/// `slice item i j k` is `item[i:j:k]`; every index is optional.
pub(crate) fn slice(args: &[Value]) -> Result<Value, FuncError>
{
    let (item, indexes) = args.split_first()
        .ok_or_else(|| FuncError::BadArgument("slice of nothing".into()))?;

    match item {
        Value::Str(s) => {
            if indexes.len() > 2 {
                return Err(FuncError::BadArgument("cannot 3-index slice a string".into()));
            }
            let (i, j) = bounds(indexes, s.len())?;
            s.get(i..j)
                .map(|sub| Value::Str(sub.to_string()))
                .ok_or_else(|| FuncError::InvalidSliceIndex(format!("{i}:{j} splits a character")))
        },
        Value::List(items) => {
            let (i, j) = bounds(indexes, items.len())?;
            Ok(Value::List(items[i..j].to_vec()))
        },
        Value::Nil => Err(FuncError::BadArgument("slice of untyped nil".into())),
        other => Err(FuncError::NotSliceable(other.kind())),
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(len(&[Value::from("héllo")]), Ok(Value::Int(6)));
        assert_eq!(len(&[Value::list([1, 2, 3])]), Ok(Value::Int(3)));
        assert_eq!(len(&[Value::map([("a", 1)])]), Ok(Value::Int(1)));
        assert_eq!(len(&[Value::from(3)]), Err(FuncError::NoLength(Kind::Int)));
    }

    #[test]
    fn test_index_list_and_nested() {
        let nested = Value::list([Value::list([1, 2]), Value::list([3, 4])]);
        assert_eq!(index(&[nested.clone(), Value::from(1), Value::from(0)]), Ok(Value::from(3)));
        assert_eq!(index(&[nested.clone()]), Ok(nested));
    }

    #[test]
    fn test_index_out_of_range() {
        let list = Value::list([1, 2]);
        assert_eq!(
            index(&[list.clone(), Value::from(2)]),
            Err(FuncError::IndexOutOfRange { index: 2, len: 2 }),
        );
        assert!(index(&[list, Value::from(-1)]).is_err());
    }

    #[test]
    fn test_index_map() {
        let map = Value::map([("a", 1)]);
        assert_eq!(index(&[map.clone(), Value::from("a")]), Ok(Value::from(1)));
        assert_eq!(index(&[map.clone(), Value::from("z")]), Ok(Value::Nil));
        assert!(index(&[map, Value::from(0)]).is_err());
    }

    #[test]
    fn test_index_string_byte() {
        assert_eq!(index(&[Value::from("AB"), Value::from(1)]), Ok(Value::Uint(66)));
    }

    #[test]
    fn test_index_not_indexable() {
        assert_eq!(index(&[Value::from(1), Value::from(0)]), Err(FuncError::NotIndexable(Kind::Int)));
        assert!(index(&[Value::Nil, Value::from(0)]).is_err());
    }

    #[test]
    fn test_slice_string() {
        let s = Value::from("abcdef");
        assert_eq!(slice(&[s.clone()]), Ok(Value::from("abcdef")));
        assert_eq!(slice(&[s.clone(), Value::from(2)]), Ok(Value::from("cdef")));
        assert_eq!(slice(&[s.clone(), Value::from(1), Value::from(3)]), Ok(Value::from("bc")));
        assert!(slice(&[s.clone(), Value::from(1), Value::from(2), Value::from(3)]).is_err());
        assert!(slice(&[s, Value::from(4), Value::from(2)]).is_err());
    }

    #[test]
    fn test_slice_list() {
        let list = Value::list([1, 2, 3, 4]);
        assert_eq!(slice(&[list.clone(), Value::from(1), Value::from(3)]), Ok(Value::list([2, 3])));
        assert_eq!(
            slice(&[list.clone(), Value::from(0), Value::from(2), Value::from(3)]),
            Ok(Value::list([1, 2])),
        );
        assert!(slice(&[list.clone(), Value::from(0), Value::from(5)]).is_err());
        assert!(slice(&[list, Value::from(0), Value::from(3), Value::from(2)]).is_err());
    }

    #[test]
    fn test_slice_rejects() {
        assert_eq!(slice(&[Value::from(1.5)]), Err(FuncError::NotSliceable(Kind::Float)));
        assert!(slice(&[Value::from("é"), Value::from(1)]).is_err());
    }
}
