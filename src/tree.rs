//! Flat tree construction from parsed JSON documents.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::*;

use crate::parser::Json;
use crate::path::{self, Segment, ROOT_PATH};
use crate::Spanned;

/// Identifier of a node within one built tree.
///
/// Ids are handed out in visitation order starting at 1 and are only
/// meaningful within the build that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Coarse classification of a node's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    Primitive,
}

impl NodeKind {
    fn of(value: &Json) -> NodeKind {
        match value {
            Json::Object(_) => NodeKind::Object,
            Json::Array(_) => NodeKind::Array,
            Json::Null | Json::Bool(_) | Json::Str(_) | Json::Num(_) => NodeKind::Primitive,
        }
    }
}

/// 2D position hint for laying the tree out left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Gaps used to compute position hints.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    /// Horizontal distance between consecutive depths.
    pub x_gap: i32,
    /// Vertical distance between consecutive siblings.
    pub y_gap: i32,
    /// Extra vertical offset applied once per depth level.
    pub depth_nudge: i32,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout {
            x_gap: 220,
            y_gap: 90,
            depth_nudge: 10,
        }
    }
}

impl Layout {
    fn position(&self, depth: usize, sibling_index: usize) -> Position {
        Position {
            x: depth as i32 * self.x_gap,
            y: sibling_index as i32 * self.y_gap + depth as i32 * self.depth_nudge,
        }
    }
}

/// One addressable value in the built tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<'a> {
    pub id: NodeId,
    /// Property name, element index or the sentinel `"root"`. Display only.
    pub key: String,
    /// Canonical path expression; unique within one build.
    pub path: String,
    pub kind: NodeKind,
    /// The parsed value at this position. Serialized as plain JSON with
    /// spans stripped and duplicate keys collapsed.
    #[serde(serialize_with = "serialize_raw")]
    pub raw_value: &'a Spanned<Json>,
    pub depth: usize,
    pub sibling_index: usize,
    pub position: Position,
}

fn serialize_raw<S: Serializer>(value: &&Spanned<Json>, serializer: S) -> Result<S::Ok, S::Error> {
    value.val.to_value().serialize(serializer)
}

/// Parent/child relationship between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Flat node list plus edge relation for one JSON document.
#[derive(Debug, Serialize)]
pub struct Tree<'a> {
    pub nodes: Vec<TreeNode<'a>>,
    pub edges: Vec<Edge>,
}

struct WorkItem<'a> {
    value: &'a Spanned<Json>,
    key: String,
    path: String,
    depth: usize,
    sibling_index: usize,
    parent: Option<NodeId>,
}

/// Builds the flat tree for `doc`.
///
/// Nodes come out in pre-order: parents before children, with object members
/// in insertion order and array elements by index. The traversal runs on an
/// explicit work stack, so document depth is bounded by memory rather than
/// by the call stack.
#[instrument(level = "debug", skip_all)]
pub fn build<'a>(doc: &'a Spanned<Json>, layout: &Layout) -> Tree<'a> {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    // Ids restart at 1 on every build.
    let mut next_id: u32 = 1;

    let mut stack = vec![WorkItem {
        value: doc,
        key: "root".to_owned(),
        path: ROOT_PATH.to_owned(),
        depth: 0,
        sibling_index: 0,
        parent: None,
    }];

    while let Some(item) = stack.pop() {
        let WorkItem {
            value,
            key,
            path,
            depth,
            sibling_index,
            parent,
        } = item;

        let id = NodeId(next_id);
        next_id += 1;

        if let Some(source) = parent {
            edges.push(Edge { source, target: id });
        }

        // Children are pushed in reverse so the first child is popped next.
        match &value.val {
            Json::Object(members) => {
                let mut unique = IndexMap::new();
                for (member_key, member_value) in members {
                    if unique.insert(member_key.val.as_str(), member_value).is_some() {
                        warn!(
                            key = %member_key.val,
                            %path,
                            "duplicate object member, keeping the last value"
                        );
                    }
                }
                for (idx, (member_key, member_value)) in unique.into_iter().enumerate().rev() {
                    stack.push(WorkItem {
                        value: member_value,
                        key: member_key.to_owned(),
                        path: path::child(&path, Segment::Key(member_key)),
                        depth: depth + 1,
                        sibling_index: idx,
                        parent: Some(id),
                    });
                }
            }
            Json::Array(items) => {
                for (idx, element) in items.iter().enumerate().rev() {
                    stack.push(WorkItem {
                        value: element,
                        key: idx.to_string(),
                        path: path::child(&path, Segment::Index(idx)),
                        depth: depth + 1,
                        sibling_index: idx,
                        parent: Some(id),
                    });
                }
            }
            _ => {}
        }

        nodes.push(TreeNode {
            id,
            key,
            kind: NodeKind::of(&value.val),
            raw_value: value,
            depth,
            sibling_index,
            position: layout.position(depth, sibling_index),
            path,
        });
    }

    debug!(nodes = nodes.len(), edges = edges.len(), "built tree");

    Tree { nodes, edges }
}
