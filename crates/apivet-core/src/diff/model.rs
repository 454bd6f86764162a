//! Diff tree node types.

use serde_json::Value;

/// Classification of one node of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Both sides present and equal (for containers: all children clean)
    Identical,
    /// Both sides present, same kind, different content
    ContentDiffer,
    /// Both sides present with incompatible kinds (incl. null vs non-null)
    TypeDiffer,
    /// Present in the base (`lhs`) only
    Missing,
    /// Present in the target (`rhs`) only
    Excess,
    /// Rewritten by a pruning pass; treated as identical but never deleted
    Ignored,
}

/// What kind of container produced this node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Scalar or one-sided leaf
    None,
    /// Keyed map comparison
    Mapping,
    /// Ordered sequence comparison
    Sequence,
}

/// One node of the comparison tree.
///
/// `path` is a dotted/bracketed locator (`.Results[0].Bar`); the root has
/// an empty path. `lhs`/`rhs` carry the compared values for leaves; for
/// one-sided nodes (`Missing`/`Excess`) the absent side is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffNode {
    pub path: String,
    pub kind: DiffKind,
    pub container: ContainerKind,
    pub children: Vec<DiffNode>,
    pub lhs: Option<Value>,
    pub rhs: Option<Value>,
}

impl DiffNode {
    pub(crate) fn leaf(
        path: impl Into<String>,
        kind: DiffKind,
        lhs: Option<Value>,
        rhs: Option<Value>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            container: ContainerKind::None,
            children: Vec::new(),
            lhs,
            rhs,
        }
    }

    pub(crate) fn container(
        path: impl Into<String>,
        container: ContainerKind,
        children: Vec<DiffNode>,
    ) -> Self {
        let kind = if children.iter().all(DiffNode::is_clean) {
            DiffKind::Identical
        } else {
            DiffKind::ContentDiffer
        };
        Self {
            path: path.into(),
            kind,
            container,
            children,
            lhs: None,
            rhs: None,
        }
    }

    /// True iff this subtree carries no reportable difference.
    ///
    /// Computed from the live tree rather than the stored kind so that
    /// pruning a descendant to `Ignored` is reflected without re-walking
    /// ancestors.
    pub fn is_clean(&self) -> bool {
        match self.kind {
            DiffKind::Ignored => true,
            _ if !self.children.is_empty() => self.children.iter().all(DiffNode::is_clean),
            DiffKind::Identical => true,
            _ => false,
        }
    }

    /// True iff this is a leaf comparison (no recursion happened here).
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.container == ContainerKind::None
    }

    /// True iff either side's decoded value is literal null.
    pub fn touches_null(&self) -> bool {
        matches!(self.lhs, Some(Value::Null)) || matches!(self.rhs, Some(Value::Null))
    }
}
