//! JSON query parser
//!
//! Turns a JSON request body into a [`QueryDescription`]. Object key order
//! is preserved (serde_json is built with `preserve_order`), so condition
//! entries evaluate in the order they were written.
//!
//! Unset or empty parts default to empty values. `order`, `offset`, `group`
//! and `joins` are accepted and ignored.

use serde_json::Value;

use super::ast::{CompareOp, Condition, ConditionTree, ConditionValue, QueryDescription};
use super::errors::{QueryError, QueryResult};

impl QueryDescription {
    /// Parses a query description from a JSON object
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let obj = value.as_object().ok_or(QueryError::NotAnObject)?;

        let fields = match obj.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => parse_fields(v)?,
        };

        let conditions = match obj.get("conditions") {
            None => ConditionTree::new(),
            Some(v) => ConditionTree::from_json(v)?,
        };

        let page = obj.get("page").and_then(parse_window_value);
        let limit = obj.get("limit").and_then(parse_window_value);

        let count_only = match (obj.get("count"), obj.get("type")) {
            (Some(Value::Null), Some(kind)) | (None, Some(kind)) => kind.as_str() == Some("count"),
            (Some(flag), _) => is_truthy(flag),
            (None, None) => false,
        };

        Ok(QueryDescription {
            fields,
            conditions,
            page,
            limit,
            count_only,
        })
    }
}

impl ConditionTree {
    /// Parses a condition tree from a JSON object.
    ///
    /// `null`, an empty object and an empty array all mean "no conditions".
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        match value {
            Value::Null => Ok(ConditionTree::new()),
            Value::Array(items) if items.is_empty() => Ok(ConditionTree::new()),
            Value::Object(map) => {
                let mut tree = ConditionTree::new();
                for (key, value) in map {
                    tree.push(parse_entry(key, value)?);
                }
                Ok(tree)
            }
            other => Err(QueryError::InvalidConditions(json_type_name(other).to_string())),
        }
    }
}

fn parse_fields(value: &Value) -> QueryResult<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(QueryError::InvalidFields)
            })
            .collect(),
        _ => Err(QueryError::InvalidFields),
    }
}

/// Non-positive values normalize to unset.
/// A positive whole number, given as a JSON number or a numeric string.
/// Anything else leaves the value unset.
fn parse_window_value(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if n >= 1.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

/// `0`, `""`, `"0"`, `false`, `null` and empty arrays or objects are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn parse_entry(key: &str, value: &Value) -> QueryResult<Condition> {
    if key.eq_ignore_ascii_case("or") {
        return Ok(Condition::Or(parse_group(key, value)?));
    }
    if key.eq_ignore_ascii_case("and") {
        return Ok(Condition::And(parse_group(key, value)?));
    }

    let (field, op) = split_key(key)?;
    let value = parse_value(key, value)?;
    Ok(Condition::Field { field, op, value })
}

/// A group is either an object of entries or a list of objects, each of
/// which becomes a nested conjunction.
fn parse_group(key: &str, value: &Value) -> QueryResult<ConditionTree> {
    match value {
        Value::Object(_) => ConditionTree::from_json(value),
        Value::Array(items) => {
            let mut tree = ConditionTree::new();
            for item in items {
                if !item.is_object() {
                    return Err(QueryError::InvalidGroup(key.to_string()));
                }
                tree.push(Condition::And(ConditionTree::from_json(item)?));
            }
            Ok(tree)
        }
        _ => Err(QueryError::InvalidGroup(key.to_string())),
    }
}

/// Splits `"age >="` into `("age", Gte)`. A key without a trailing
/// operator token is a plain equality on the whole key.
fn split_key(key: &str) -> QueryResult<(String, CompareOp)> {
    let key = key.trim();

    if let Some((field, token)) = key.rsplit_once(char::is_whitespace) {
        if let Some(op) = CompareOp::parse(token) {
            return Ok((field.trim_end().to_string(), op));
        }
        if token.chars().all(|c| "<>=!~".contains(c)) {
            return Err(QueryError::UnknownOperator(
                key.to_string(),
                token.to_string(),
            ));
        }
    }

    Ok((key.to_string(), CompareOp::Eq))
}

fn parse_value(key: &str, value: &Value) -> QueryResult<ConditionValue> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| parse_scalar(key, item))
            .collect::<QueryResult<Vec<_>>>()
            .map(ConditionValue::List),
        other => parse_scalar(key, other),
    }
}

fn parse_scalar(key: &str, value: &Value) -> QueryResult<ConditionValue> {
    match value {
        Value::Null => Ok(ConditionValue::Null),
        Value::Bool(b) => Ok(ConditionValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(ConditionValue::Number)
            .ok_or_else(|| QueryError::InvalidValue(key.to_string())),
        Value::String(s) => Ok(ConditionValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(QueryError::InvalidValue(key.to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
