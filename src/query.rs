//! Query evaluation for `find`.
//!
//! `QueryEvaluator` is the seam: given the ordered subjects of a container it
//! returns a parallel pass/fail vector. Any `Fn(&[Option<&T>]) -> Vec<bool>`
//! is an evaluator. `Query` is the built-in evaluator over `serde_json::Value`,
//! speaking a filtr/MongoDB-style operator language:
//!
//! ```
//! use ordered_hash::Query;
//! use serde_json::json;
//!
//! let q = Query::new(json!({ "stats.age": { "$gte": 18 }, "name": { "$ne": "bob" } })).unwrap();
//! assert!(q.matches(Some(&json!({ "name": "amy", "stats": { "age": 20 } }))));
//! ```

use crate::comparator::NaturalOrder;
use crate::error::{Error, Result};
use crate::path::Resolve;
use core::cmp::Ordering;
use core::convert::Infallible;
use serde_json::{Map, Value};

pub trait QueryEvaluator<T: ?Sized> {
    type Error;

    /// One verdict per subject, in order. `None` subjects are dead slots or
    /// values without the configured root path.
    fn pass(&self, subjects: &[Option<&T>]) -> Result<Vec<bool>, Self::Error>;
}

impl<T, F> QueryEvaluator<T> for F
where
    T: ?Sized,
    F: Fn(&[Option<&T>]) -> Vec<bool>,
{
    type Error = Infallible;

    fn pass(&self, subjects: &[Option<&T>]) -> Result<Vec<bool>, Infallible> {
        Ok(self(subjects))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cond {
    Eq(Value),
    Ne(Value),
    Cmp(Ordering, bool, Value), // (wanted, or-equal, operand)
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Size(usize),
    All(Vec<Value>),
    Mod(f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    And(Vec<Node>),
    Or(Vec<Node>),
    Nor(Vec<Node>),
    /// Conditions on the value at `path`; the empty path is the subject itself.
    Field { path: String, conds: Vec<Cond> },
}

/// A validated query over `serde_json::Value` subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    root: Node,
}

impl Query {
    pub fn new(query: Value) -> Result<Self> {
        Ok(Self {
            root: parse_query(query)?,
        })
    }

    pub fn matches(&self, subject: Option<&Value>) -> bool {
        eval(&self.root, subject)
    }
}

impl QueryEvaluator<Value> for Query {
    type Error = Infallible;

    fn pass(&self, subjects: &[Option<&Value>]) -> Result<Vec<bool>, Infallible> {
        Ok(subjects.iter().map(|s| self.matches(*s)).collect())
    }
}

fn parse_query(query: Value) -> Result<Node> {
    match query {
        Value::Object(map) => parse_object(map),
        other => Ok(Node::Field {
            path: String::new(),
            conds: vec![Cond::Eq(other)],
        }),
    }
}

fn parse_object(map: Map<String, Value>) -> Result<Node> {
    let mut nodes = Vec::new();
    let mut own = Vec::new();
    for (key, operand) in map {
        match key.as_str() {
            "$and" => nodes.push(Node::And(parse_list(&key, operand)?)),
            "$or" => nodes.push(Node::Or(parse_list(&key, operand)?)),
            "$nor" => nodes.push(Node::Nor(parse_list(&key, operand)?)),
            op if op.starts_with('$') => own.push(parse_cond(op, operand)?),
            _ => nodes.push(parse_field(key, operand)?),
        }
    }
    if !own.is_empty() {
        nodes.push(Node::Field {
            path: String::new(),
            conds: own,
        });
    }
    Ok(match nodes.len() {
        1 => nodes.remove(0),
        _ => Node::And(nodes),
    })
}

fn parse_list(op: &str, operand: Value) -> Result<Vec<Node>> {
    match operand {
        Value::Array(items) => items.into_iter().map(parse_query).collect(),
        _ => Err(malformed(op, "an array of queries")),
    }
}

fn parse_field(path: String, operand: Value) -> Result<Node> {
    let conds = match operand {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => map
            .into_iter()
            .map(|(op, v)| parse_cond(&op, v))
            .collect::<Result<Vec<_>>>()?,
        other => vec![Cond::Eq(other)],
    };
    Ok(Node::Field { path, conds })
}

fn parse_cond(op: &str, operand: Value) -> Result<Cond> {
    Ok(match op {
        "$eq" => Cond::Eq(operand),
        "$ne" => Cond::Ne(operand),
        "$gt" => Cond::Cmp(Ordering::Greater, false, operand),
        "$gte" => Cond::Cmp(Ordering::Greater, true, operand),
        "$lt" => Cond::Cmp(Ordering::Less, false, operand),
        "$lte" => Cond::Cmp(Ordering::Less, true, operand),
        "$in" => Cond::In(array(op, operand)?),
        "$nin" => Cond::Nin(array(op, operand)?),
        "$all" => Cond::All(array(op, operand)?),
        "$exists" => match operand {
            Value::Bool(b) => Cond::Exists(b),
            _ => return Err(malformed(op, "a boolean")),
        },
        "$size" => match operand.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(n) => Cond::Size(n),
            None => return Err(malformed(op, "a non-negative integer")),
        },
        "$mod" => match array(op, operand)?.as_slice() {
            [d, r] => match (d.as_f64(), r.as_f64()) {
                (Some(d), Some(r)) if d != 0.0 => Cond::Mod(d, r),
                _ => return Err(malformed(op, "[divisor, remainder] with a non-zero divisor")),
            },
            _ => return Err(malformed(op, "[divisor, remainder]")),
        },
        other => return Err(Error::UnknownOperator(other.to_owned())),
    })
}

fn array(op: &str, operand: Value) -> Result<Vec<Value>> {
    match operand {
        Value::Array(items) => Ok(items),
        _ => Err(malformed(op, "an array")),
    }
}

fn malformed(op: &str, expected: &'static str) -> Error {
    Error::MalformedOperand {
        op: op.to_owned(),
        expected,
    }
}

fn eval(node: &Node, subject: Option<&Value>) -> bool {
    match node {
        Node::And(nodes) => nodes.iter().all(|n| eval(n, subject)),
        Node::Or(nodes) => nodes.iter().any(|n| eval(n, subject)),
        Node::Nor(nodes) => !nodes.iter().any(|n| eval(n, subject)),
        Node::Field { path, conds } => {
            let target = subject.and_then(|s| s.resolve(path));
            conds.iter().all(|c| test(c, target))
        }
    }
}

/// Value equality with numbers compared by magnitude, so `2` equals `2.0`.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same(x, y)))
        }
        _ => a == b,
    }
}

fn contains(items: &[Value], operand: &Value) -> bool {
    items.iter().any(|item| same(item, operand))
}

fn equals(target: Option<&Value>, operand: &Value) -> bool {
    match target {
        Some(Value::Array(items)) if !operand.is_array() => contains(items, operand),
        Some(v) => same(v, operand),
        None => false,
    }
}

fn test(cond: &Cond, target: Option<&Value>) -> bool {
    match cond {
        Cond::Eq(v) => equals(target, v),
        Cond::Ne(v) => !equals(target, v),
        Cond::Cmp(wanted, or_equal, v) => match target.and_then(|t| t.natural_cmp(v)) {
            Some(Ordering::Equal) => *or_equal,
            Some(ord) => ord == *wanted,
            None => false,
        },
        Cond::In(list) => list.iter().any(|v| equals(target, v)),
        Cond::Nin(list) => !list.iter().any(|v| equals(target, v)),
        Cond::Exists(want) => target.is_some() == *want,
        Cond::Size(n) => matches!(target, Some(Value::Array(items)) if items.len() == *n),
        Cond::All(list) => match target {
            Some(Value::Array(items)) => list.iter().all(|v| contains(items, v)),
            _ => false,
        },
        Cond::Mod(d, r) => target
            .and_then(Value::as_f64)
            .map(|n| n % d == *r)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passes(query: Value, subjects: &[Value]) -> Vec<bool> {
        let q = Query::new(query).unwrap();
        let refs: Vec<Option<&Value>> = subjects.iter().map(Some).collect();
        match q.pass(&refs) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    #[test]
    fn comparison_on_scalars() {
        let subjects = [json!(48), json!(1000), json!(5000)];
        assert_eq!(passes(json!({ "$lt": 1000 }), &subjects), [true, false, false]);
        assert_eq!(passes(json!({ "$lte": 1000 }), &subjects), [true, true, false]);
        assert_eq!(passes(json!({ "$gt": 1000 }), &subjects), [false, false, true]);
        assert_eq!(passes(json!({ "$gte": 48, "$lt": 5000 }), &subjects), [true, true, false]);
        assert_eq!(passes(json!(1000), &subjects), [false, true, false]);
    }

    #[test]
    fn field_paths_and_equality() {
        let subjects = [
            json!({ "last": "Doctor", "stats": { "age": 900 } }),
            json!({ "last": "Williams", "stats": { "age": 27 } }),
        ];
        assert_eq!(passes(json!({ "last": "Williams" }), &subjects), [false, true]);
        assert_eq!(passes(json!({ "stats.age": { "$gt": 100 } }), &subjects), [true, false]);
        assert_eq!(
            passes(json!({ "last": { "$in": ["Pond", "Doctor"] } }), &subjects),
            [true, false]
        );
        assert_eq!(passes(json!({ "last": { "$nin": ["Doctor"] } }), &subjects), [false, true]);
        assert_eq!(passes(json!({ "first": { "$exists": false } }), &subjects), [true, true]);
    }

    #[test]
    fn logical_operators() {
        let subjects = [json!(1), json!(5), json!(10)];
        assert_eq!(
            passes(json!({ "$or": [{ "$lt": 2 }, { "$gt": 8 }] }), &subjects),
            [true, false, true]
        );
        assert_eq!(
            passes(json!({ "$nor": [{ "$lt": 2 }, { "$gt": 8 }] }), &subjects),
            [false, true, false]
        );
        assert_eq!(
            passes(json!({ "$and": [{ "$gt": 2 }, { "$mod": [5, 0] }] }), &subjects),
            [false, true, true]
        );
    }

    #[test]
    fn array_operators() {
        let subjects = [json!({ "tags": ["a", "b"] }), json!({ "tags": ["b"] })];
        assert_eq!(passes(json!({ "tags": "a" }), &subjects), [true, false]);
        assert_eq!(passes(json!({ "tags": { "$size": 1 } }), &subjects), [false, true]);
        assert_eq!(passes(json!({ "tags": { "$all": ["a", "b"] } }), &subjects), [true, false]);
    }

    #[test]
    fn integer_and_float_numbers_are_equal() {
        let subjects = [json!(2.0), json!(2), json!({ "n": [2.0, 3] })];
        assert_eq!(passes(json!(2), &subjects[..2]), [true, true]);
        assert_eq!(passes(json!({ "$in": [2] }), &subjects[..2]), [true, true]);
        assert_eq!(passes(json!({ "$nin": [2.0] }), &subjects[..2]), [false, false]);
        assert_eq!(passes(json!({ "$ne": 2 }), &subjects[..2]), [false, false]);
        assert_eq!(
            passes(json!({ "$gte": 2, "$lte": 2 }), &subjects[..2]),
            passes(json!({ "$eq": 2 }), &subjects[..2])
        );
        assert_eq!(passes(json!({ "n": { "$all": [2, 3.0] } }), &subjects[2..]), [true]);
        assert_eq!(passes(json!({ "n": 2 }), &subjects[2..]), [true]);
        assert_eq!(passes(json!({ "n": [2, 3] }), &subjects[2..]), [true]);
    }

    #[test]
    fn missing_subjects_fail_ordering_and_equality() {
        let q = Query::new(json!({ "$lt": 10 })).unwrap();
        assert!(!q.matches(None));
        let ne = Query::new(json!({ "$ne": 1 })).unwrap();
        assert!(ne.matches(None));
        assert!(!q.matches(Some(&json!("5"))));
    }

    #[test]
    fn invalid_queries_are_rejected() {
        assert_eq!(
            Query::new(json!({ "$near": 1 })),
            Err(Error::UnknownOperator("$near".into()))
        );
        assert!(matches!(
            Query::new(json!({ "$in": 3 })),
            Err(Error::MalformedOperand { .. })
        ));
        assert!(Query::new(json!({ "$or": {} })).is_err());
        assert!(Query::new(json!({ "$mod": [0, 1] })).is_err());
        assert!(Query::new(json!({ "a": { "$exists": "yes" } })).is_err());
        assert!(matches!(
            Query::new(json!({ "a": { "$size": -1 } })),
            Err(Error::MalformedOperand { .. })
        ));
    }

    #[test]
    fn closures_are_evaluators() {
        let even = |subjects: &[Option<&u64>]| -> Vec<bool> {
            subjects.iter().map(|s| s.is_some_and(|n| n % 2 == 0)).collect()
        };
        let subjects: [Option<&u64>; 3] = [Some(&1), Some(&2), None];
        assert_eq!(
            QueryEvaluator::<u64>::pass(&even, &subjects),
            Ok(vec![false, true, false])
        );
    }
}
