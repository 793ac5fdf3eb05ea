//! In-memory pipeline evaluation.
//!
//! Interprets typed stages over plain documents with the same observable
//! semantics the production document store has: AND-composed match
//! predicates without type coercion, a deterministic cross-type sort order
//! (null < bool < number < string), stable multi-key sorting, and a `$count`
//! stage that emits nothing on an empty stream.

use std::cmp::Ordering;

use serde_json::{json, Map, Value};

use crate::query::{compile_pattern, Pipeline, SortKey, Stage};

use super::errors::{StoreError, StoreResult};

/// Runs a pipeline over a snapshot of a collection.
pub(crate) fn run(documents: Vec<Value>, pipeline: &Pipeline) -> StoreResult<Vec<Value>> {
    let mut docs = documents;
    for stage in pipeline {
        docs = match stage {
            Stage::Match(predicate) => {
                let mut kept = Vec::with_capacity(docs.len());
                for doc in docs {
                    if matches(&doc, predicate)? {
                        kept.push(doc);
                    }
                }
                kept
            }
            Stage::Sort(keys) => {
                let mut sorted = docs;
                sort_documents(&mut sorted, keys);
                sorted
            }
            Stage::Skip(count) => docs.into_iter().skip(*count as usize).collect(),
            Stage::Limit(count) => docs.into_iter().take(*count as usize).collect(),
            Stage::Count(field) => {
                if docs.is_empty() {
                    Vec::new()
                } else {
                    let mut count_doc = Map::new();
                    count_doc.insert(field.clone(), json!(docs.len()));
                    vec![Value::Object(count_doc)]
                }
            }
            Stage::Group(id) => group(&docs, id),
        };
    }
    Ok(docs)
}

/// Checks a document against a match predicate (AND semantics).
pub(crate) fn matches(document: &Value, predicate: &Value) -> StoreResult<bool> {
    let entries = predicate
        .as_object()
        .ok_or_else(|| StoreError::Execution("match predicate must be a document".to_string()))?;

    for (key, expected) in entries {
        let matched = match key.as_str() {
            "$and" => {
                let clauses = clause_list(expected, "$and")?;
                let mut all = true;
                for clause in clauses {
                    if !matches(document, clause)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => {
                let clauses = clause_list(expected, "$or")?;
                let mut any = false;
                for clause in clauses {
                    if matches(document, clause)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            path => field_matches(document, path, expected)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn clause_list<'a>(value: &'a Value, operator: &str) -> StoreResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        StoreError::Execution(format!("{operator} expects an array of predicates"))
    })
}

fn field_matches(document: &Value, path: &str, expected: &Value) -> StoreResult<bool> {
    let candidates = resolve_path(document, path);

    if let Some(operators) = operator_document(expected) {
        let options = operators
            .iter()
            .find(|(op, _)| op.as_str() == "$options")
            .and_then(|(_, v)| v.as_str())
            .unwrap_or("");
        for (op, arg) in operators {
            if op == "$options" {
                continue;
            }
            if !operator_matches(op, &candidates, arg, options)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    // Plain equality. A null expectation also matches an absent field.
    if candidates.is_empty() {
        return Ok(expected.is_null());
    }
    Ok(eq_any(&candidates, expected))
}

/// Returns the operator entries when every key of an expectation document is
/// an operator; a mixed or plain document is an exact-equality expectation.
fn operator_document(expected: &Value) -> Option<Vec<(&String, &Value)>> {
    let map = expected.as_object()?;
    if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) {
        Some(map.iter().collect())
    } else {
        None
    }
}

fn operator_matches(
    op: &str,
    candidates: &[&Value],
    arg: &Value,
    options: &str,
) -> StoreResult<bool> {
    match op {
        "$eq" => Ok(eq_any(candidates, arg)),
        "$ne" => Ok(!eq_any(candidates, arg)),
        "$gt" | "$gte" | "$lt" | "$lte" => Ok(expand(candidates)
            .iter()
            .any(|candidate| range_matches(candidate, arg, op))),
        "$in" => {
            let members = arg.as_array().ok_or_else(|| {
                StoreError::Execution("$in expects an array of values".to_string())
            })?;
            Ok(members.iter().any(|member| eq_any(candidates, member)))
        }
        "$exists" => {
            let expected = arg.as_bool().unwrap_or(false);
            Ok(candidates.is_empty() != expected)
        }
        "$regex" => {
            let pattern = arg.as_str().ok_or_else(|| {
                StoreError::Execution("$regex expects a string pattern".to_string())
            })?;
            let regex = compile_pattern(pattern, options)
                .map_err(|err| StoreError::Execution(err.to_string()))?;
            Ok(expand(candidates)
                .iter()
                .filter_map(|candidate| candidate.as_str())
                .any(|text| regex.is_match(text)))
        }
        other => Err(StoreError::Execution(format!(
            "unsupported operator `{other}`"
        ))),
    }
}

/// Equality over candidates; a candidate array also matches by element.
fn eq_any(candidates: &[&Value], expected: &Value) -> bool {
    candidates.iter().any(|candidate| {
        *candidate == expected
            || candidate
                .as_array()
                .is_some_and(|items| items.contains(expected))
    })
}

/// Candidates plus the elements of any array candidate.
fn expand<'a>(candidates: &[&'a Value]) -> Vec<&'a Value> {
    let mut expanded = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        expanded.push(*candidate);
        if let Value::Array(items) = candidate {
            expanded.extend(items.iter());
        }
    }
    expanded
}

/// Resolves a dotted path, descending through arrays the way the document
/// store does: `fields.value` reaches the `value` of every element of a
/// `fields` array.
fn resolve_path<'a>(document: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![document];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(inner) = map.get(segment) {
                        next.push(inner);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(inner) = item.get(segment) {
                            next.push(inner);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// Strict same-type range comparison (numbers and strings only).
fn range_matches(candidate: &Value, bound: &Value, op: &str) -> bool {
    let ordering = match (candidate, bound) {
        (Value::Number(a), Value::Number(b)) => {
            let a_f = a.as_f64().unwrap_or(0.0);
            let b_f = b.as_f64().unwrap_or(0.0);
            match a_f.partial_cmp(&b_f) {
                Some(ordering) => ordering,
                None => return false,
            }
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => return false,
    };
    match op {
        "$gt" => ordering == Ordering::Greater,
        "$gte" => ordering != Ordering::Less,
        "$lt" => ordering == Ordering::Less,
        "$lte" => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Stable multi-key sort; ties keep their input order.
fn sort_documents(documents: &mut [Value], keys: &[SortKey]) {
    documents.sort_by(|a, b| {
        for key in keys {
            let a_val = sort_value(a, &key.field);
            let b_val = sort_value(b, &key.field);
            let mut ordering = compare_optional(a_val, b_val);
            if key.order.is_descending() {
                ordering = ordering.reverse();
            }
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn sort_value<'a>(document: &'a Value, field: &str) -> Option<&'a Value> {
    resolve_path(document, field).into_iter().next()
}

/// Missing fields sort before present ones.
fn compare_optional(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => compare_values(a_val, b_val),
    }
}

/// Deterministic cross-type ordering:
/// null < bool < number < string < array < object.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    let type_order = |value: &Value| -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    };

    let a_type = type_order(a);
    let b_type = type_order(b);
    if a_type != b_type {
        return a_type.cmp(&b_type);
    }

    match (a, b) {
        (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
        (Value::Number(a_n), Value::Number(b_n)) => {
            let a_f = a_n.as_f64().unwrap_or(0.0);
            let b_f = b_n.as_f64().unwrap_or(0.0);
            a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
        }
        (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
        _ => Ordering::Equal,
    }
}

/// `$group` over an id expression; output order is first-seen order.
fn group(documents: &[Value], id: &Value) -> Vec<Value> {
    let mut keys: Vec<Value> = Vec::new();
    for doc in documents {
        let key = eval_expression(doc, id);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys.into_iter().map(|key| json!({ "_id": key })).collect()
}

/// `"$field"` references resolve against the document; anything else is a
/// constant.
fn eval_expression(document: &Value, expression: &Value) -> Value {
    if let Value::String(text) = expression {
        if let Some(path) = text.strip_prefix('$') {
            return resolve_path(document, path)
                .into_iter()
                .next()
                .cloned()
                .unwrap_or(Value::Null);
        }
    }
    expression.clone()
}
