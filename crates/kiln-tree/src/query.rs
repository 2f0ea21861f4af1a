//! Path queries: `Section/List/*[level != 0]`.
//!
//! ```text
//! path      = segment ( "/" segment )*
//! segment   = ( name | "*" ) ( "[" attribute op value "]" )?
//! op        = "=" | "==" | "!=" | "in" | "not in"
//! ```
//!
//! `value` is a literal as accepted by [`Value::parse`].

use std::fmt;
use std::str::FromStr;

use kiln_cursor::{Cursor as _, SliceCursor};
use kiln_errors::QueryError;

use crate::value::{parse_value, skip_ws};
use crate::{NodeData, NodeKind as _, NodeRef, Value};

/// A parsed path query, reusable across trees.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    segments: Vec<Segment>,
}

/// One `/`-separated step of a [`Query`].
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Kind name to match, `None` for `*`.
    pub kind: Option<String>,
    pub predicate: Option<Predicate>,
}

/// `[attribute op value]`
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub attribute: String,
    pub op: Op,
    pub value: Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    In,
    NotIn,
}

impl Query {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches the first segment against the children of `node`, each
    /// following segment against the children of the nodes accepted so far,
    /// and returns the nodes accepted by the last one in tree order.
    pub fn select<'t, N: NodeData>(&self, node: NodeRef<'t, N>) -> Vec<NodeRef<'t, N>> {
        let mut found = Vec::new();
        select_into(node, &self.segments, &mut found);
        found
    }
}

fn select_into<'t, N: NodeData>(
    node: NodeRef<'t, N>,
    segments: &[Segment],
    found: &mut Vec<NodeRef<'t, N>>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    for child in node.children() {
        if !segment.matches(child) {
            continue;
        }
        if rest.is_empty() {
            found.push(child);
        } else {
            select_into(child, rest, found);
        }
    }
}

impl Segment {
    pub fn matches<N: NodeData>(&self, node: NodeRef<'_, N>) -> bool {
        if self.kind.as_deref().is_some_and(|kind| kind != node.kind().name()) {
            return false;
        }
        self.predicate.as_ref().is_none_or(|predicate| predicate.matches(node))
    }
}

impl Predicate {
    /// A node without the attribute never matches, whatever the operator.
    pub fn matches<N: NodeData>(&self, node: NodeRef<'_, N>) -> bool {
        let Some(actual) = node.attribute(&self.attribute) else {
            return false;
        };

        match self.op {
            Op::Eq => actual == self.value,
            Op::Ne => actual != self.value,
            Op::In => self.value.contains(&actual) == Some(true),
            Op::NotIn => self.value.contains(&actual) == Some(false),
        }
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = path.chars().collect();
        let mut cursor = SliceCursor::new(&chars);
        let mut segments = Vec::new();

        loop {
            segments.push(parse_segment(&mut cursor)?);

            skip_ws(&mut cursor);
            match cursor.get().copied() {
                None => break,
                Some('/') => {
                    cursor.next();
                }
                Some(c) => {
                    return Err(QueryError::new(cursor.pos(), format!("unexpected `{c}`")));
                }
            }
        }

        Ok(Self { segments })
    }
}

fn parse_segment(cursor: &mut SliceCursor<'_, char>) -> Result<Segment, QueryError> {
    skip_ws(cursor);

    let kind = if cursor.consume('*') {
        None
    } else {
        Some(parse_name(cursor, "expected a node kind or `*`")?)
    };

    skip_ws(cursor);
    if !cursor.consume('[') {
        return Ok(Segment { kind, predicate: None });
    }

    skip_ws(cursor);
    let attribute = parse_name(cursor, "expected an attribute name")?;
    let op = parse_op(cursor)?;
    let value = parse_value(cursor)?;

    skip_ws(cursor);
    if !cursor.consume(']') {
        return Err(QueryError::new(cursor.pos(), "expected `]`"));
    }

    Ok(Segment { kind, predicate: Some(Predicate { attribute, op, value }) })
}

fn parse_name(cursor: &mut SliceCursor<'_, char>, message: &str) -> Result<String, QueryError> {
    let start = cursor.pos();
    if !cursor.get().is_some_and(|c| c.is_alphabetic() || *c == '_') {
        return Err(QueryError::new(start, message));
    }

    cursor.skip_while(|c| c.is_alphanumeric() || *c == '_');
    Ok(cursor.buffer()[start..cursor.pos()].iter().collect())
}

fn parse_op(cursor: &mut SliceCursor<'_, char>) -> Result<Op, QueryError> {
    skip_ws(cursor);
    let start = cursor.pos();

    if cursor.consume('=') {
        cursor.consume('=');
        return Ok(Op::Eq);
    }
    if cursor.consume('!') {
        if cursor.consume('=') {
            return Ok(Op::Ne);
        }
        return Err(QueryError::new(start, "expected `!=`"));
    }

    match keyword(cursor).as_deref() {
        Some("in") => Ok(Op::In),
        Some("not") => {
            skip_ws(cursor);
            match keyword(cursor).as_deref() {
                Some("in") => Ok(Op::NotIn),
                _ => Err(QueryError::new(start, "expected `not in`")),
            }
        }
        _ => Err(QueryError::new(start, "expected one of `=`, `!=`, `in`, `not in`")),
    }
}

fn keyword(cursor: &mut SliceCursor<'_, char>) -> Option<String> {
    let start = cursor.pos();
    let len = cursor.skip_while(char::is_ascii_alphabetic);
    (len > 0).then(|| cursor.buffer()[start..cursor.pos()].iter().collect())
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment.kind.as_deref().unwrap_or("*"))?;
            if let Some(predicate) = &segment.predicate {
                write!(f, "[{} {} {}]", predicate.attribute, predicate.op, predicate.value)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::In => "in",
            Self::NotIn => "not in",
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Tree;
    use crate::fixture::{Kind, Node, sample};

    fn xs(nodes: &[NodeRef<'_, Node>]) -> Vec<Value> {
        nodes.iter().filter_map(|node| node.attribute("x")).collect()
    }

    #[test]
    fn predicate_round_trip() {
        let mut tree = Tree::new(Node::Root);
        let root = tree.root_id();
        let a = tree.add(root, Node::A);
        let b = tree.add(a, Node::B { x: 1 });

        let found = tree.root().find_path("A/B[x = 1]").unwrap();
        assert_eq!(found, vec![tree.node(b)]);

        assert!(tree.root().find_path("A/B[x = 2]").unwrap().is_empty());
    }

    #[test]
    fn results_follow_tree_order() {
        let tree = sample();
        let root = tree.root();

        let query = |path: &str| xs(&root.find_path(path).unwrap());

        assert_eq!(query("A/B"), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(query("*/B[x != 2]"), vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(query("A/*[x in [3, 1]]"), vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(query("A/B[x not in {1, 2}]"), vec![Value::Int(3)]);
    }

    #[test]
    fn matching_starts_at_children() {
        let tree = sample();
        let root = tree.root();

        assert!(root.find_path("Root").unwrap().is_empty());
        assert!(root.find_path("B").unwrap().is_empty());
        assert_eq!(root.find_path("*").unwrap().len(), 3);
        assert_eq!(root.find_path("C").unwrap(), root.find_all(Kind::C));
    }

    #[test]
    fn missing_attribute_never_matches() {
        let tree = sample();
        let root = tree.root();

        assert!(root.find_path("*[x != 99]").unwrap().is_empty());
        assert!(root.find_path("*[x not in [99]]").unwrap().is_empty());
        assert_eq!(root.find_path("A/*[x not in [99]]").unwrap().len(), 3);
    }

    #[test]
    fn substring_and_numeric_predicates() {
        let tree = sample();
        let root = tree.root();

        assert_eq!(root.find_path(r#"C[text in "well hello there"]"#).unwrap().len(), 1);
        assert_eq!(root.find_path("C[text = 'hello']").unwrap().len(), 1);
        assert_eq!(root.find_path("A/B[x == 2.0]").unwrap().len(), 1);
        assert!(root.find_path("C[text in 'help']").unwrap().is_empty());
    }

    #[test]
    fn queries_are_reusable() {
        let query: Query = " A / B [ x=3 ] ".parse().unwrap();
        assert_eq!(query.segments().len(), 2);
        assert_eq!(query.to_string(), "A/B[x = 3]");

        let tree = sample();
        assert_eq!(xs(&tree.root().select(&query)), vec![Value::Int(3)]);
    }

    #[test]
    fn malformed_queries() {
        let offset = |path: &str| path.parse::<Query>().unwrap_err().offset;

        assert_eq!(offset(""), 0);
        assert_eq!(offset("A/"), 2);
        assert_eq!(offset("A//B"), 2);
        assert_eq!(offset("A[x]"), 3);
        assert_eq!(offset("A[x = 1"), 7);
        assert_eq!(offset("A[x ! 1]"), 4);
        assert_eq!(offset("A[x not 1]"), 4);
        assert_eq!(offset("A[x = ]"), 6);
        assert_eq!(offset("A B"), 2);
        assert_eq!(offset("A[x = 'open]"), 6);
    }

    #[test]
    fn find_path_reports_errors() {
        let tree = sample();
        let error = tree.root().find_path("A[").unwrap_err();

        assert_eq!(error.offset, 2);
        assert!(error.to_string().contains("attribute name"));
    }
}
