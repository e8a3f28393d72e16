//! Query AST structures
//!
//! Defines the query description handed to the scan engine.

use std::fmt;

/// Comparison operator carried by a field condition key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// field = value (default when the key names only a field)
    Eq,
    /// field != value
    Neq,
    /// field > value
    Gt,
    /// field >= value
    Gte,
    /// field < value
    Lt,
    /// field <= value
    Lte,
    /// SQL-style pattern with `%` and `_`
    Like,
}

impl CompareOp {
    /// Parses an operator token as written in a condition key
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" | "==" => Some(CompareOp::Eq),
            "!=" | "<>" => Some(CompareOp::Neq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            t if t.eq_ignore_ascii_case("like") => Some(CompareOp::Like),
            _ => None,
        }
    }

    /// Returns the canonical operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expected value on the right-hand side of a field condition
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Matches an empty cell
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Any-of for `=`, none-of for `!=`
    List(Vec<ConditionValue>),
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Number(n as f64)
    }
}

impl From<i32> for ConditionValue {
    fn from(n: i32) -> Self {
        ConditionValue::Number(f64::from(n))
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

impl From<bool> for ConditionValue {
    fn from(b: bool) -> Self {
        ConditionValue::Bool(b)
    }
}

impl<T: Into<ConditionValue>> From<Vec<T>> for ConditionValue {
    fn from(items: Vec<T>) -> Self {
        ConditionValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// One entry of a condition tree
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Constraint on a single field
    Field {
        field: String,
        op: CompareOp,
        value: ConditionValue,
    },
    /// Alternatives; the first match accepts the whole record
    Or(ConditionTree),
    /// Nested conjunction
    And(ConditionTree),
}

/// Ordered condition entries, implicitly ANDed at the top level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionTree {
    entries: Vec<Condition>,
}

impl ConditionTree {
    /// Creates an empty tree, which matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry
    pub fn push(&mut self, condition: Condition) {
        self.entries.push(condition);
    }

    /// Adds a field comparison
    pub fn with(
        mut self,
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<ConditionValue>,
    ) -> Self {
        self.push(Condition::Field {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Adds an equality constraint
    pub fn eq(self, field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.with(field, CompareOp::Eq, value)
    }

    /// Adds an `or` group
    pub fn or(mut self, group: ConditionTree) -> Self {
        self.push(Condition::Or(group));
        self
    }

    /// Adds an `and` group
    pub fn and(mut self, group: ConditionTree) -> Self {
        self.push(Condition::And(group));
        self
    }

    pub fn entries(&self) -> &[Condition] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// What to read from a table.
///
/// `page` and `limit` are `None` when unset; the scan engine then keeps
/// whatever window it used last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescription {
    /// Fields to project (empty = all)
    pub fields: Vec<String>,
    /// Condition tree
    pub conditions: ConditionTree,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
    /// Return the page size instead of the rows
    pub count_only: bool,
}

impl QueryDescription {
    /// Creates a query that returns every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projected fields
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the condition tree
    pub fn filter(mut self, conditions: ConditionTree) -> Self {
        self.conditions = conditions;
        self
    }

    /// Sets the page; zero leaves it unset
    pub fn page(mut self, page: u64) -> Self {
        self.page = (page > 0).then_some(page);
        self
    }

    /// Sets the page size; zero leaves it unset
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Switches to count mode
    pub fn count_only(mut self) -> Self {
        self.count_only = true;
        self
    }

    /// Returns true when every field should be projected
    pub fn selects_all(&self) -> bool {
        self.fields.is_empty()
    }
}
