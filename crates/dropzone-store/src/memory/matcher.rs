//! Condition evaluation, ordering, and projection over stored records.

use std::cmp::Ordering;

use serde_json::Value;

use dropzone_core::types::{
    FilterOperator, ID_FIELD, OrderBy, Record, SortDirection, WhereCondition,
};

/// Whether a record satisfies every condition.
pub fn matches_all(record: &Record, conditions: &[WhereCondition]) -> bool {
    conditions.iter().all(|c| matches(record, c))
}

/// Whether a record satisfies one condition.
pub fn matches(record: &Record, condition: &WhereCondition) -> bool {
    let value = record.get(&condition.field_name);
    match condition.operator {
        FilterOperator::ExactMatch => value.is_some_and(|v| {
            !is_unset(Some(v)) && condition.values.iter().any(|c| values_equal(v, c))
        }),
        FilterOperator::DoesNotHaveValue => is_unset(value),
        FilterOperator::Contains => {
            let needles: Vec<String> = condition
                .values
                .iter()
                .filter_map(as_text)
                .map(|n| n.to_lowercase())
                .collect();
            match value {
                Some(Value::String(s)) => {
                    let haystack = s.to_lowercase();
                    needles.iter().any(|n| haystack.contains(n.as_str()))
                }
                Some(Value::Array(items)) => items.iter().filter_map(as_text).any(|item| {
                    let item = item.to_lowercase();
                    needles.iter().any(|n| item.contains(n.as_str()))
                }),
                _ => false,
            }
        }
    }
}

/// A field is unset when absent, null, an empty string, or an empty list.
pub fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(_), Value::Number(_)) | (Value::Number(_), Value::String(_)) => {
            as_text(stored) == as_text(wanted)
        }
        _ => stored == wanted,
    }
}

/// Compare two records by a sequence of ordering clauses.
pub fn compare(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for clause in order {
        let ord = compare_values(a.get(&clause.field_name), b.get(&clause.field_name));
        let ord = match clause.sort_type {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (is_unset(a), is_unset(b)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

/// Keep only the requested fields (plus `Id`). No fields means all fields.
pub fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(key, _)| key.as_str() == ID_FIELD || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_unset_covers_absent_null_and_empty() {
        let r = record(json!({ "a": null, "b": "", "c": "x" }));
        assert!(matches(&r, &WhereCondition::unset("a")));
        assert!(matches(&r, &WhereCondition::unset("b")));
        assert!(matches(&r, &WhereCondition::unset("missing")));
        assert!(!matches(&r, &WhereCondition::unset("c")));
    }

    #[test]
    fn test_exact_match_never_matches_unset() {
        let r = record(json!({ "parent_id": null }));
        let cond = WhereCondition::new("parent_id", FilterOperator::ExactMatch, vec![Value::Null]);
        assert!(!matches(&r, &cond));
    }

    #[test]
    fn test_exact_match_any_value() {
        let r = record(json!({ "size": 10, "folder_id": "abc" }));
        assert!(matches(&r, &WhereCondition::exact("folder_id", "abc")));
        assert!(!matches(&r, &WhereCondition::exact("folder_id", "abd")));
        let cond = WhereCondition::new(
            "size",
            FilterOperator::ExactMatch,
            vec![json!(3), json!(10.0)],
        );
        assert!(matches(&r, &cond));
    }

    #[test]
    fn test_contains_ignores_case() {
        let r = record(json!({ "Name": "Quarterly Report.pdf" }));
        assert!(matches(&r, &WhereCondition::contains("Name", "report")));
        assert!(matches(&r, &WhereCondition::contains("Name", "QUART")));
        assert!(!matches(&r, &WhereCondition::contains("Name", "invoice")));
        assert!(!matches(&r, &WhereCondition::contains("Missing", "x")));
    }

    #[test]
    fn test_compare_orders_unset_first_then_case_insensitive() {
        let a = record(json!({ "Name": "beta" }));
        let b = record(json!({ "Name": "Alpha" }));
        let c = record(json!({}));
        let order = [OrderBy::asc("Name")];
        let mut rows = vec![a.clone(), b.clone(), c.clone()];
        rows.sort_by(|x, y| compare(x, y, &order));
        assert_eq!(rows, vec![c, b, a]);
    }

    #[test]
    fn test_compare_desc_numbers() {
        let small = record(json!({ "size": 2 }));
        let big = record(json!({ "size": 30 }));
        assert_eq!(compare(&small, &big, &[OrderBy::desc("size")]), Ordering::Greater);
    }

    #[test]
    fn test_project_keeps_id() {
        let r = record(json!({ "Id": "1", "Name": "x", "size": 3 }));
        let projected = project(&r, &["Name".to_string()]);
        assert_eq!(projected, record(json!({ "Id": "1", "Name": "x" })));
        assert_eq!(project(&r, &[]), r);
    }
}
