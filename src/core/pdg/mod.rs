//! Arena-backed program dependence graphs.
//!
//! A [`Pdg`] owns its nodes in a flat vector; [`NodeId`]s are indices into
//! that arena. The graph is immutable once built and stays read-only for the
//! whole detection pipeline; analysis state such as clone flags lives in
//! side tables keyed by node id.
//!
//! Graphs are assembled through [`PdgBuilder`], which validates node
//! references and wires the inverse control-dependency edges automatically.

pub mod node;

pub use node::{DepEdge, DepLabel, LiteralCategory, Node, NodeId};

use ahash::AHashSet;
use serde_json::Value;

use crate::core::config::KindConfig;
use crate::core::errors::{CloneSeekError, Result};
use node::{DEFAULT_COMMENT_SET, DEFAULT_STATEMENT_SET};

/// An immutable program dependence graph.
#[derive(Debug, Clone)]
pub struct Pdg {
    nodes: Vec<Node>,
    root: NodeId,
    source: String,
}

impl Pdg {
    /// Root node id (always the first node in the arena).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Opaque source label (typically the path of the analysed file).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes in the graph, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node by id.
    ///
    /// Panics if `id` was produced by a different PDG and is out of range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Iterate over all nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All descendants of `id` in pre-order, the node itself excluded.
    ///
    /// Comment nodes are part of the sequence; filtering happens at the
    /// reporting stages, not here. The traversal uses an explicit stack, so
    /// arbitrarily deep trees cannot overflow the call stack.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    /// Streaming variant of [`descendants`](Self::descendants) yielding AST
    /// kind labels, used for lock-step shape comparison without
    /// materialising the full node lists.
    pub fn descendant_names(&self, id: NodeId) -> DescendantNames<'_> {
        DescendantNames {
            pdg: self,
            stack: self.node(id).children.iter().rev().copied().collect(),
        }
    }
}

/// Iterator over descendant kind labels in pre-order.
#[derive(Debug)]
pub struct DescendantNames<'a> {
    pdg: &'a Pdg,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantNames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let node = self.pdg.node(next);
        self.stack.extend(node.children.iter().rev().copied());
        Some(node.name.as_str())
    }
}

/// Incremental constructor for [`Pdg`] values.
#[derive(Debug)]
pub struct PdgBuilder {
    nodes: Vec<Node>,
    source: String,
    kinds: Option<(AHashSet<String>, AHashSet<String>)>,
}

impl PdgBuilder {
    /// Start a graph whose root has the given AST kind, classified with the
    /// default (Esprima) kind vocabulary.
    pub fn new(root_kind: &str) -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            source: String::new(),
            kinds: None,
        };
        builder.push_node(root_kind, None);
        builder
    }

    /// Start a graph with a custom kind vocabulary.
    pub fn with_kinds(root_kind: &str, kinds: &KindConfig) -> Result<Self> {
        kinds.validate()?;
        let mut builder = Self {
            nodes: Vec::new(),
            source: String::new(),
            kinds: Some((
                kinds.statement_kinds.iter().cloned().collect(),
                kinds.comment_kinds.iter().cloned().collect(),
            )),
        };
        builder.push_node(root_kind, None);
        Ok(builder)
    }

    /// Attach an opaque source label to the graph.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new AST child under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, kind: &str) -> Result<NodeId> {
        self.check(parent)?;
        let id = self.push_node(kind, Some(parent));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Record the raw token text and value of a `Literal` node.
    pub fn set_literal(&mut self, id: NodeId, raw: &str, value: Value) -> Result<()> {
        self.check(id)?;
        let node = &mut self.nodes[id.index()];
        if node.name != "Literal" {
            return Err(CloneSeekError::validation(format!(
                "cannot attach literal attributes to a {} node",
                node.name
            )));
        }
        node.attributes.insert("raw".to_string(), Value::String(raw.to_string()));
        node.attributes.insert("value".to_string(), value);
        Ok(())
    }

    /// Set an arbitrary attribute on a node.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: Value) -> Result<()> {
        self.check(id)?;
        self.nodes[id.index()]
            .attributes
            .insert(key.to_string(), value);
        Ok(())
    }

    /// Add a statement-dependency edge from a statement to one of its parts.
    pub fn add_statement_dep(&mut self, statement: NodeId, part: NodeId) -> Result<()> {
        self.check(statement)?;
        self.check(part)?;
        self.nodes[statement.index()]
            .statement_dep_children
            .push(DepEdge { extremity: part });
        Ok(())
    }

    /// Add a control dependency from `parent` to `child`.
    ///
    /// Both directions are wired: the edge appears in the parent's
    /// `control_dep_children` and in the child's `control_dep_parents`.
    pub fn add_control_dep(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        self.nodes[parent.index()]
            .control_dep_children
            .push(DepEdge { extremity: child });
        self.nodes[child.index()]
            .control_dep_parents
            .push(DepEdge { extremity: parent });
        Ok(())
    }

    /// Add a data dependency: `dependent` reads from `dependency`.
    ///
    /// Self-loops are legal; the matcher breaks them by id comparison.
    pub fn add_data_dep(&mut self, dependent: NodeId, dependency: NodeId) -> Result<()> {
        self.check(dependent)?;
        self.check(dependency)?;
        self.nodes[dependent.index()]
            .data_dep_parents
            .push(DepEdge {
                extremity: dependency,
            });
        Ok(())
    }

    /// Finish construction.
    pub fn build(self) -> Pdg {
        Pdg {
            nodes: self.nodes,
            root: NodeId(0),
            source: self.source,
        }
    }

    fn push_node(&mut self, kind: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(id, kind, parent);
        match &self.kinds {
            Some((statements, comments)) => {
                node.is_statement = statements.contains(kind);
                node.is_comment = comments.contains(kind);
            }
            None => {
                node.is_statement = DEFAULT_STATEMENT_SET.contains(kind);
                node.is_comment = DEFAULT_COMMENT_SET.contains(kind);
            }
        }
        self.nodes.push(node);
        id
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(CloneSeekError::graph_element(
                "node id out of range for this builder",
                id.to_string(),
            ))
        }
    }
}
