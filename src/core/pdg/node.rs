//! Node-level pieces of the program dependence graph.
//!
//! A [`Node`] is an AST element augmented with four families of labelled
//! dependency edges. Nodes are owned by their [`Pdg`](super::Pdg) arena and
//! referenced by integer [`NodeId`]s, which keeps cyclic dependency edges
//! (including self-loops) free of ownership hazards.

use std::fmt;

use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Default statement vocabulary (Esprima AST kinds).
pub(crate) const DEFAULT_STATEMENT_KINDS: &[&str] = &[
    "BlockStatement",
    "BreakStatement",
    "ClassDeclaration",
    "ContinueStatement",
    "DebuggerStatement",
    "DoWhileStatement",
    "EmptyStatement",
    "ExpressionStatement",
    "ForInStatement",
    "ForOfStatement",
    "ForStatement",
    "FunctionDeclaration",
    "IfStatement",
    "LabeledStatement",
    "ReturnStatement",
    "SwitchStatement",
    "ThrowStatement",
    "TryStatement",
    "VariableDeclaration",
    "WhileStatement",
    "WithStatement",
];

/// Default comment vocabulary (Esprima attaches comments as `Line`/`Block`).
pub(crate) const DEFAULT_COMMENT_KINDS: &[&str] = &["Line", "Block"];

pub(crate) static DEFAULT_STATEMENT_SET: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| DEFAULT_STATEMENT_KINDS.iter().copied().collect());

pub(crate) static DEFAULT_COMMENT_SET: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| DEFAULT_COMMENT_KINDS.iter().copied().collect());

/// Stable identifier of a node within one PDG.
///
/// Ids index into the owning arena and are only meaningful for the PDG that
/// produced them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four dependency-edge families carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepLabel {
    /// Outgoing edges from a statement to sub-parts of the same statement
    Statement,
    /// Outgoing control-flow dependencies
    ControlChildren,
    /// Incoming control-flow dependencies
    ControlParents,
    /// Incoming data-flow dependencies (the nodes being read from)
    DataParents,
}

/// A directed, labelled dependency edge; `extremity` is the far endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepEdge {
    /// Node at the far end of the edge
    pub extremity: NodeId,
}

pub(crate) type EdgeList = SmallVec<[DepEdge; 2]>;

/// Canonical category of a `Literal` node's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralCategory {
    /// Numeric literals (`1`, `2.5`)
    Numeric,
    /// String literals
    String,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,
    /// Regular expression literals
    Regex,
}

impl LiteralCategory {
    /// Canonical label used in token-mismatch reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Null => "Null",
            Self::Regex => "Regex",
        }
    }
}

impl fmt::Display for LiteralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A PDG vertex: one AST element plus its dependency edges.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) is_statement: bool,
    pub(crate) is_comment: bool,
    pub(crate) attributes: Map<String, Value>,
    pub(crate) statement_dep_children: EdgeList,
    pub(crate) control_dep_children: EdgeList,
    pub(crate) control_dep_parents: EdgeList,
    pub(crate) data_dep_parents: EdgeList,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: &str, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            is_statement: false,
            is_comment: false,
            attributes: Map::new(),
            statement_dep_children: EdgeList::new(),
            control_dep_children: EdgeList::new(),
            control_dep_parents: EdgeList::new(),
            data_dep_parents: EdgeList::new(),
        }
    }

    /// Identifier of this node inside its PDG.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// AST kind label (e.g. `IfStatement`, `Literal`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// AST parent, absent for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered AST children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node's kind is a statement.
    pub fn is_statement(&self) -> bool {
        self.is_statement
    }

    /// Whether this node's kind is a comment.
    pub fn is_comment(&self) -> bool {
        self.is_comment
    }

    /// Opaque key/value attribute bag.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Raw token text, when the producer recorded one.
    pub fn raw(&self) -> Option<&str> {
        self.attributes.get("raw").and_then(Value::as_str)
    }

    /// Canonical token category of a `Literal` node.
    ///
    /// Returns `None` for non-literal kinds. A literal carrying a `regex`
    /// attribute is a [`LiteralCategory::Regex`] regardless of its `value`;
    /// otherwise the category follows the JSON type of the `value` attribute,
    /// falling back to [`LiteralCategory::Null`] when it is missing.
    pub fn literal_type(&self) -> Option<LiteralCategory> {
        if self.name != "Literal" {
            return None;
        }
        if self.attributes.contains_key("regex") {
            return Some(LiteralCategory::Regex);
        }
        Some(match self.attributes.get("value") {
            Some(Value::Number(_)) => LiteralCategory::Numeric,
            Some(Value::String(_)) => LiteralCategory::String,
            Some(Value::Bool(_)) => LiteralCategory::Boolean,
            _ => LiteralCategory::Null,
        })
    }

    /// Dependency edges of the requested family.
    pub fn edges(&self, label: DepLabel) -> &[DepEdge] {
        match label {
            DepLabel::Statement => &self.statement_dep_children,
            DepLabel::ControlChildren => &self.control_dep_children,
            DepLabel::ControlParents => &self.control_dep_parents,
            DepLabel::DataParents => &self.data_dep_parents,
        }
    }
}
