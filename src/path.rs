//! Canonical path expressions and query resolution.

use tracing::*;

use crate::tree::TreeNode;

/// Canonical path of the document root.
pub const ROOT_PATH: &str = "$";

/// One step from a parent value down to a child value.
#[derive(Clone, Copy, Debug)]
pub enum Segment<'a> {
    /// Object member access by key.
    Key(&'a str),
    /// Array element access by index.
    Index(usize),
}

/// Appends `segment` to `parent`, producing the child's canonical path.
///
/// Keys append as `.key` and indices as `[idx]`, so `$.user.roles[0]` falls
/// out of repeated application starting from [`ROOT_PATH`]. Keys are spliced
/// in verbatim; a key containing `.`, `[` or `]` yields a path that reads as
/// extra structure and cannot be told apart from one.
pub fn child(parent: &str, segment: Segment<'_>) -> String {
    match segment {
        Segment::Key(key) => format!("{parent}.{key}"),
        Segment::Index(idx) => format!("{parent}[{idx}]"),
    }
}

/// Normalizes a raw user query into canonical path form.
///
/// The query is trimmed first. A query already rooted at `$` passes through
/// unchanged. A leading `.` gets `$` prepended, and anything else gets `$.`
/// prepended. Returns `None` when nothing is left after trimming.
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    if query.is_empty() {
        None
    } else if query.starts_with('$') {
        Some(query.to_owned())
    } else if query.starts_with('.') {
        Some(format!("${query}"))
    } else {
        Some(format!("$.{query}"))
    }
}

/// Outcome of resolving a query against a built tree.
#[derive(Debug, PartialEq)]
pub enum Lookup<'t> {
    /// The first node in node order whose canonical path matches.
    Found(&'t TreeNode<'t>),
    /// No node matches; carries the normalized query for reporting.
    NoMatch(String),
    /// The query was blank after trimming.
    EmptyQuery,
}

/// Resolves `raw_query` against `nodes` by exact canonical-path match.
pub fn resolve<'t>(nodes: &'t [TreeNode<'t>], raw_query: &str) -> Lookup<'t> {
    let Some(query) = normalize_query(raw_query) else {
        return Lookup::EmptyQuery;
    };

    debug!(%query, "resolving path query");

    match nodes.iter().find(|node| node.path == query) {
        Some(node) => Lookup::Found(node),
        None => Lookup::NoMatch(query),
    }
}

#[cfg(test)]
mod tests {
    use chumsky::Parser as _;

    use super::*;
    use crate::parser::{self, Json};
    use crate::tree::{self, Layout, NodeId, NodeKind, Position};
    use crate::Spanned;

    fn parse(src: &str) -> Spanned<Json> {
        parser::parser().parse(src).into_result().unwrap()
    }

    #[test]
    fn child_paths() {
        assert_eq!(child(ROOT_PATH, Segment::Key("a")), "$.a");
        assert_eq!(child("$.a", Segment::Index(0)), "$.a[0]");
        assert_eq!(child("$[3]", Segment::Key("b")), "$[3].b");
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query("$"), Some("$".to_owned()));
        assert_eq!(normalize_query("$.a"), Some("$.a".to_owned()));
        assert_eq!(normalize_query(".a.b"), Some("$.a.b".to_owned()));
        assert_eq!(normalize_query("a.b[1]"), Some("$.a.b[1]".to_owned()));
        assert_eq!(normalize_query("  a  "), Some("$.a".to_owned()));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["a.b[1]", ".a", "$", "$.x[2].y", "  spaced  "] {
            let once = normalize_query(raw).unwrap();
            assert_eq!(normalize_query(&once), Some(once.clone()));
        }
    }

    #[test]
    fn resolves_relative_and_rooted_queries() {
        let doc = parse(r#"{"a": {"b": [1, 2]}}"#);
        let tree = tree::build(&doc, &Layout::default());

        for query in ["a.b[1]", ".a.b[1]", "$.a.b[1]"] {
            let Lookup::Found(node) = resolve(&tree.nodes, query) else {
                panic!("{query:?} should resolve");
            };
            assert_eq!(node.path, "$.a.b[1]");
            assert_eq!(node.raw_value.val, Json::Num(2.0));
        }
    }

    #[test]
    fn resolves_index_paths() {
        let doc = parse("[10, 20]");
        let tree = tree::build(&doc, &Layout::default());

        let Lookup::Found(node) = resolve(&tree.nodes, "$[1]") else {
            panic!("$[1] should resolve");
        };
        assert_eq!(node.raw_value.val, Json::Num(20.0));
        assert_eq!(node.key, "1");
    }

    #[test]
    fn blank_queries_are_empty_not_unmatched() {
        let doc = parse(r#"{"a": 1}"#);
        let tree = tree::build(&doc, &Layout::default());

        assert_eq!(resolve(&tree.nodes, ""), Lookup::EmptyQuery);
        assert_eq!(resolve(&tree.nodes, "   "), Lookup::EmptyQuery);
    }

    #[test]
    fn unmatched_queries_report_the_normalized_form() {
        let doc = parse(r#"{"a": 1}"#);
        let tree = tree::build(&doc, &Layout::default());

        assert_eq!(
            resolve(&tree.nodes, "zzz"),
            Lookup::NoMatch("$.zzz".to_owned())
        );
        // Resolving the already-normalized form agrees.
        assert_eq!(
            resolve(&tree.nodes, "$.zzz"),
            Lookup::NoMatch("$.zzz".to_owned())
        );

        // A failed lookup leaves the tree usable.
        let Lookup::Found(node) = resolve(&tree.nodes, "a") else {
            panic!("`a` should still resolve");
        };
        assert_eq!(node.path, "$.a");
        assert_eq!(node.raw_value.val, Json::Num(1.0));
    }

    #[test]
    fn first_match_in_node_order_wins() {
        let doc = parse("1");
        let node = |id: u32| TreeNode {
            id: NodeId(id),
            key: "dup".to_owned(),
            path: "$.dup".to_owned(),
            kind: NodeKind::Primitive,
            raw_value: &doc,
            depth: 1,
            sibling_index: 0,
            position: Position { x: 0, y: 0 },
        };
        let nodes = vec![node(1), node(2)];

        let Lookup::Found(found) = resolve(&nodes, "dup") else {
            panic!("expected a match");
        };
        assert_eq!(found.id, NodeId(1));
    }
}
