use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use crate::types::{Action, Direction, Edges, NodeId, ScopeId};

/// Callback invoked with confirm/back/menu while a node is focused.
pub type ActionHandler = Arc<dyn Fn(Action) + Send + Sync>;

/// Identity of whoever put a node in the registry. Clones share the
/// identity; two separately created tokens never match.
#[derive(Clone, Default)]
pub struct OwnerToken(Arc<()>);

impl OwnerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self, other: &OwnerToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerToken({:p})", Arc::as_ptr(&self.0))
    }
}

/// One focusable element as seen by the engine.
#[derive(Clone)]
pub struct NavNode {
    pub id: NodeId,
    pub edges: Edges,
    pub on_action: Option<ActionHandler>,
    pub disabled: bool,
    /// Set by long-lived registrants (bindings) so they only ever remove
    /// their own entry.
    pub owner: Option<OwnerToken>,
}

impl NavNode {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            edges: Edges::default(),
            on_action: None,
            disabled: false,
            owner: None,
        }
    }

    pub fn with_edges(mut self, edges: Edges) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_action<F>(mut self, handler: F) -> Self
    where
        F: Fn(Action) + Send + Sync + 'static,
    {
        self.on_action = Some(Arc::new(handler));
        self
    }

    pub fn with_handler(mut self, handler: Option<ActionHandler>) -> Self {
        self.on_action = handler;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_owner(mut self, owner: OwnerToken) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn owned_by(&self, owner: &OwnerToken) -> bool {
        self.owner.as_ref().is_some_and(|token| token.matches(owner))
    }

    pub fn edge(&self, direction: Direction) -> Option<&str> {
        self.edges.get(direction)
    }

    /// Whether `other` describes the same registration: equal edges and
    /// disabled flag, the very same action callback and the same owner.
    pub fn same_as(&self, other: &NavNode) -> bool {
        let same_action = match (&self.on_action, &other.on_action) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        let same_owner = match (&self.owner, &other.owner) {
            (None, None) => true,
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };
        self.id == other.id
            && self.disabled == other.disabled
            && self.edges == other.edges
            && same_action
            && same_owner
    }
}

impl fmt::Debug for NavNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavNode")
            .field("id", &self.id)
            .field("edges", &self.edges)
            .field("on_action", &self.on_action.is_some())
            .field("disabled", &self.disabled)
            .field("owner", &self.owner)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First registration of this id in the scope.
    Inserted,
    /// The id was already present; `changed` is false when the new node is
    /// indistinguishable from the old one.
    Replaced { changed: bool },
}

/// Table of navigable nodes keyed by `(scope, id)`.
///
/// A scope exists only while it holds at least one node.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    scopes: HashMap<ScopeId, HashMap<NodeId, NavNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces in place. Never touches focus.
    pub fn register(&mut self, scope: &str, node: NavNode) -> RegisterOutcome {
        let nodes = self.scopes.entry(scope.to_string()).or_default();
        match nodes.entry(node.id.clone()) {
            Entry::Occupied(mut slot) => {
                let changed = !slot.get().same_as(&node);
                slot.insert(node);
                RegisterOutcome::Replaced { changed }
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
                RegisterOutcome::Inserted
            }
        }
    }

    pub fn unregister(&mut self, scope: &str, id: &str) -> Option<NavNode> {
        let nodes = self.scopes.get_mut(scope)?;
        let removed = nodes.remove(id);
        if nodes.is_empty() {
            self.scopes.remove(scope);
        }
        removed
    }

    pub fn lookup(&self, scope: &str, id: &str) -> Option<&NavNode> {
        self.scopes.get(scope).and_then(|nodes| nodes.get(id))
    }

    /// Like [`NodeRegistry::lookup`] but hides disabled nodes, which are never
    /// legal focus targets.
    pub fn focusable(&self, scope: &str, id: &str) -> Option<&NavNode> {
        self.lookup(scope, id).filter(|node| !node.disabled)
    }

    pub fn contains_scope(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }

    pub fn scope_ids(&self) -> Vec<ScopeId> {
        let mut ids: Vec<_> = self.scopes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self, scope: &str) -> usize {
        self.scopes.get(scope).map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn nodes(&self, scope: &str) -> impl Iterator<Item = &NavNode> + '_ {
        self.scopes
            .get(scope)
            .into_iter()
            .flat_map(|nodes| nodes.values())
    }

    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}
