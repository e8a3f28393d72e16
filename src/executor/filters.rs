//! Condition evaluation for scanned records
//!
//! Top-level entries are ANDed and evaluated in order. An `or` group that
//! finds a matching alternative accepts the record immediately, without
//! looking at the entries that follow it. An `or` group with no match makes
//! the record fail unless a later `or` group matches.

use std::cmp::Ordering;

use crate::query::{CompareOp, Condition, ConditionTree, ConditionValue};

use super::record::{FieldValue, LogicalRecord};

/// Evaluates condition trees against records
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Checks if a record satisfies a condition tree
    pub fn matches(record: &LogicalRecord, conditions: &ConditionTree) -> bool {
        let mut result = true;

        for condition in conditions.entries() {
            match condition {
                Condition::Or(group) => {
                    result = false;
                    if group
                        .entries()
                        .iter()
                        .any(|alt| Self::matches_condition(record, alt))
                    {
                        return true;
                    }
                }
                other => {
                    if !Self::matches_condition(record, other) {
                        return false;
                    }
                }
            }
        }

        result
    }

    fn matches_condition(record: &LogicalRecord, condition: &Condition) -> bool {
        match condition {
            Condition::Field { field, op, value } => Self::matches_field(record, field, *op, value),
            Condition::Or(group) => group
                .entries()
                .iter()
                .any(|alt| Self::matches_condition(record, alt)),
            Condition::And(group) => Self::matches(record, group),
        }
    }

    /// A multi-value field matches if any of its cells does
    fn matches_field(
        record: &LogicalRecord,
        field: &str,
        op: CompareOp,
        expected: &ConditionValue,
    ) -> bool {
        let synthetic_id;
        let actual = match record.get(field) {
            Some(v) => v,
            None if field == "id" => {
                synthetic_id = FieldValue::Single(record.id().to_string());
                &synthetic_id
            }
            None => return false, // Missing field = no match
        };

        let matched = actual
            .values()
            .any(|cell| Self::cell_matches(cell, op, expected));
        matched
    }

    fn cell_matches(cell: &str, op: CompareOp, expected: &ConditionValue) -> bool {
        match (op, expected) {
            (CompareOp::Eq, ConditionValue::List(items)) => {
                items.iter().any(|item| Self::eq_match(cell, item))
            }
            (CompareOp::Neq, ConditionValue::List(items)) => {
                !items.iter().any(|item| Self::eq_match(cell, item))
            }
            (_, ConditionValue::List(_)) => false,
            (CompareOp::Eq, value) => Self::eq_match(cell, value),
            (CompareOp::Neq, value) => !Self::eq_match(cell, value),
            (CompareOp::Like, ConditionValue::Text(pattern)) => like_match(cell, pattern),
            (CompareOp::Like, ConditionValue::Number(n)) => like_match(cell, &format_number(*n)),
            (CompareOp::Like, _) => false,
            (ordering, value) => match Self::compare(cell, value) {
                Some(ord) => match ordering {
                    CompareOp::Gt => ord == Ordering::Greater,
                    CompareOp::Gte => ord != Ordering::Less,
                    CompareOp::Lt => ord == Ordering::Less,
                    CompareOp::Lte => ord != Ordering::Greater,
                    _ => false,
                },
                None => false,
            },
        }
    }

    /// Equality between a cell and a scalar
    fn eq_match(cell: &str, expected: &ConditionValue) -> bool {
        match expected {
            ConditionValue::Null => cell.is_empty(),
            ConditionValue::Bool(true) => cell == "1" || cell.eq_ignore_ascii_case("true"),
            ConditionValue::Bool(false) => {
                cell.is_empty() || cell == "0" || cell.eq_ignore_ascii_case("false")
            }
            ConditionValue::Number(n) => parse_number(cell).map_or(false, |c| c == *n),
            ConditionValue::Text(s) => cell == s,
            ConditionValue::List(_) => false,
        }
    }

    /// Numeric when both sides are numbers, lexicographic otherwise
    fn compare(cell: &str, bound: &ConditionValue) -> Option<Ordering> {
        match bound {
            ConditionValue::Number(n) => match parse_number(cell) {
                Some(c) => c.partial_cmp(n),
                None => Some(cell.cmp(format_number(*n).as_str())),
            },
            ConditionValue::Text(s) => match (parse_number(cell), parse_number(s)) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => Some(cell.cmp(s.as_str())),
            },
            _ => None,
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// SQL LIKE: `%` matches any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    // Position of the last `%` seen and the text index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;

    fn record(names: &[&str], cells: &[&str]) -> LogicalRecord {
        let schema = FieldSchema::new(names).unwrap();
        let cells: Vec<String> = cells.iter().map(|s| s.to_string()).collect();
        LogicalRecord::decode(1, &schema, &cells)
    }

    #[test]
    fn test_empty_tree_matches() {
        let rec = record(&["a"], &["1"]);
        assert!(ConditionEvaluator::matches(&rec, &ConditionTree::new()));
    }

    #[test]
    fn test_equality_match() {
        let rec = record(&["name", "age"], &["Alice", "30"]);

        let tree = ConditionTree::new().eq("name", "Alice");
        assert!(ConditionEvaluator::matches(&rec, &tree));

        let tree = ConditionTree::new().eq("name", "Bob");
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_numeric_equality() {
        let rec = record(&["age"], &["30.0"]);
        assert!(ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("age", 30)));
        assert!(!ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("age", "30")));
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let rec = record(&["a", "b"], &["1", "2"]);
        let tree = ConditionTree::new().eq("a", "1").eq("b", "3");
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_missing_field_no_match() {
        let rec = record(&["name"], &["Alice"]);
        let tree = ConditionTree::new().eq("age", 30);
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_multi_value_matches_any_element() {
        let rec = record(&["a", "b", "a"], &["1", "2", "3"]);
        assert!(ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("a", "3")));
        assert!(ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("a", "1")));
        assert!(!ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("a", "2")));
    }

    #[test]
    fn test_or_success_skips_later_constraints() {
        let rec = record(&["x", "y", "z"], &["0", "2", "9"]);

        // The OR group comes first and matches on y, so x is never checked
        let tree = ConditionTree::new()
            .or(ConditionTree::new().eq("y", 2).eq("z", 3))
            .eq("x", 1);
        assert!(ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_constraint_before_or_still_applies() {
        let rec = record(&["x", "y", "z"], &["0", "2", "9"]);

        let tree = ConditionTree::new()
            .eq("x", 1)
            .or(ConditionTree::new().eq("y", 2).eq("z", 3));
        assert!(!ConditionEvaluator::matches(&rec, &tree));

        let rec = record(&["x", "y", "z"], &["1", "2", "9"]);
        assert!(ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_or_without_match_fails() {
        let rec = record(&["y", "z"], &["0", "0"]);
        let tree = ConditionTree::new().or(ConditionTree::new().eq("y", 2).eq("z", 3));
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_failed_or_then_passing_constraint_still_fails() {
        let rec = record(&["x", "y"], &["1", "0"]);
        let tree = ConditionTree::new()
            .or(ConditionTree::new().eq("y", 2))
            .eq("x", 1);
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_and_group() {
        let rec = record(&["a", "b"], &["1", "2"]);
        let tree = ConditionTree::new().or(ConditionTree::new()
            .and(ConditionTree::new().eq("a", 1).eq("b", 3))
            .and(ConditionTree::new().eq("a", 1).eq("b", 2)));
        assert!(ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_range_operators() {
        let rec = record(&["age"], &["25"]);

        let check = |op, v: i64| {
            ConditionEvaluator::matches(&rec, &ConditionTree::new().with("age", op, v))
        };
        assert!(check(CompareOp::Gte, 18));
        assert!(check(CompareOp::Lte, 30));
        assert!(!check(CompareOp::Gt, 25));
        assert!(!check(CompareOp::Lt, 25));
        assert!(check(CompareOp::Gte, 25));

        // Numeric, not lexicographic: "25" > "100" as strings
        assert!(!check(CompareOp::Gt, 100));
    }

    #[test]
    fn test_text_ordering_falls_back_to_lexicographic() {
        let rec = record(&["city"], &["Berlin"]);
        let tree = ConditionTree::new().with("city", CompareOp::Lt, "Paris");
        assert!(ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_in_and_not_in() {
        let rec = record(&["status"], &["open"]);

        let tree = ConditionTree::new().eq("status", vec!["closed", "open"]);
        assert!(ConditionEvaluator::matches(&rec, &tree));

        let tree = ConditionTree::new().with("status", CompareOp::Neq, vec!["closed", "open"]);
        assert!(!ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_like() {
        assert!(like_match("Alice", "Al%"));
        assert!(like_match("Alice", "%ice"));
        assert!(like_match("Alice", "A_i%e"));
        assert!(like_match("", "%"));
        assert!(!like_match("Alice", "al%"));
        assert!(!like_match("Alice", "A_e"));
        assert!(like_match("a%b", "a%b"));
    }

    #[test]
    fn test_null_and_bool() {
        let rec = record(&["note", "flag"], &["", "1"]);
        let tree = ConditionTree::new()
            .eq("note", ConditionValue::Null)
            .eq("flag", true);
        assert!(ConditionEvaluator::matches(&rec, &tree));
    }

    #[test]
    fn test_synthetic_id_condition() {
        let rec = record(&["name"], &["Ann"]);
        assert!(ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("id", 1)));
        assert!(!ConditionEvaluator::matches(&rec, &ConditionTree::new().eq("id", 2)));
    }
}
