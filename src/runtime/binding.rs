//! Node binding adapter.
//!
//! A [`NodeBinding`] ties one UI element to the engine for as long as the
//! binding lives: it registers on mount, atomically replaces its node when
//! its `NodeSpec` changes and unregisters on drop. The native-focus side effect is
//! driven purely by focus-change notifications, so the graph itself never
//! touches the UI.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::registry::{ActionHandler, NavNode, OwnerToken};
use crate::types::{Action, Edges, NodeId, ScopeId};

use super::NavEngine;
use super::focus::{FocusChange, ListenerId};

/// Native tab order never competes with graph navigation.
pub const MANUAL_TAB_INDEX: i32 = -1;

/// Host-side handle that can take real input focus (caret, IME, autofill).
pub trait NativeFocus: Send + Sync {
    fn focus(&self);
}

impl<F> NativeFocus for F
where
    F: Fn() + Send + Sync,
{
    fn focus(&self) {
        self()
    }
}

/// What an element declares about itself on every render.
#[derive(Clone)]
pub struct NodeSpec {
    pub scope: ScopeId,
    pub id: NodeId,
    pub edges: Edges,
    pub on_action: Option<ActionHandler>,
    pub disabled: bool,
}

impl NodeSpec {
    pub fn new(scope: impl Into<ScopeId>, id: impl Into<NodeId>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
            edges: Edges::default(),
            on_action: None,
            disabled: false,
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

    fn to_node(&self, owner: &OwnerToken) -> NavNode {
        NavNode::new(self.id.clone())
            .with_edges(self.edges.clone())
            .with_handler(self.on_action.clone())
            .disabled(self.disabled)
            .with_owner(owner.clone())
    }
}

/// Per-render view handed back to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingView {
    pub focused: bool,
    pub tab_index: i32,
}

#[derive(Debug, Clone)]
struct BoundKey {
    scope: ScopeId,
    id: NodeId,
    disabled: bool,
}

pub struct NodeBinding {
    engine: NavEngine,
    key: Arc<Mutex<BoundKey>>,
    owner: OwnerToken,
    node: NavNode,
    handle: Arc<dyn NativeFocus>,
    listener: ListenerId,
}

impl NodeBinding {
    pub fn mount<H>(engine: &NavEngine, spec: NodeSpec, handle: H) -> Self
    where
        H: NativeFocus + 'static,
    {
        let handle: Arc<dyn NativeFocus> = Arc::new(handle);
        let key = Arc::new(Mutex::new(BoundKey {
            scope: spec.scope.clone(),
            id: spec.id.clone(),
            disabled: spec.disabled,
        }));
        let owner = OwnerToken::new();
        let node = spec.to_node(&owner);
        engine.register(&spec.scope, node.clone());

        let listener = {
            let key = Arc::clone(&key);
            let handle = Arc::clone(&handle);
            engine.subscribe(move |change: &FocusChange| {
                let gained = {
                    let key = lock(&key);
                    !key.disabled && change.gained(&key.scope, &key.id)
                };
                if gained {
                    handle.focus();
                }
            })
        };

        let binding = Self {
            engine: engine.clone(),
            key,
            owner,
            node,
            handle,
            listener,
        };
        if !spec.disabled && binding.is_focused() {
            binding.handle.focus();
        }
        binding
    }

    /// Re-render with a new spec. Returns `false` when nothing changed.
    ///
    /// The new registration always lands before the old one is removed, so
    /// the router never observes the id as missing.
    pub fn update(&mut self, spec: NodeSpec) -> bool {
        let node = spec.to_node(&self.owner);
        let previous = lock(&self.key).clone();
        let same_key = previous.scope == spec.scope && previous.id == spec.id;
        if same_key && node.same_as(&self.node) {
            return false;
        }

        self.engine.register(&spec.scope, node.clone());
        *lock(&self.key) = BoundKey {
            scope: spec.scope.clone(),
            id: spec.id.clone(),
            disabled: spec.disabled,
        };
        self.node = node;
        if !same_key {
            self.engine
                .unregister_owned(&previous.scope, &previous.id, &self.owner);
        }

        let newly_focusable = !same_key || previous.disabled;
        if newly_focusable && !spec.disabled && self.is_focused() {
            self.handle.focus();
        }
        true
    }

    pub fn is_focused(&self) -> bool {
        let key = lock(&self.key).clone();
        self.engine.is_focused(&key.scope, &key.id)
    }

    pub fn tab_index(&self) -> i32 {
        MANUAL_TAB_INDEX
    }

    pub fn view(&self) -> BindingView {
        BindingView {
            focused: self.is_focused(),
            tab_index: self.tab_index(),
        }
    }

    pub fn id(&self) -> NodeId {
        lock(&self.key).id.clone()
    }

    pub fn scope(&self) -> ScopeId {
        lock(&self.key).scope.clone()
    }
}

impl Drop for NodeBinding {
    fn drop(&mut self) {
        self.engine.unsubscribe(self.listener);
        let key = lock(&self.key).clone();
        self.engine.unregister_owned(&key.scope, &key.id, &self.owner);
    }
}

fn lock(key: &Mutex<BoundKey>) -> MutexGuard<'_, BoundKey> {
    key.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = {
            let count = Arc::clone(&count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        (count, handle)
    }

    #[test]
    fn mount_registers_and_drop_unregisters() {
        let engine = NavEngine::new();
        let (_, handle) = counter();
        let binding = NodeBinding::mount(&engine, NodeSpec::new("login", "email"), handle);
        assert!(engine.lookup("login", "email").is_some());
        assert_eq!(binding.tab_index(), -1);
        drop(binding);
        assert!(engine.lookup("login", "email").is_none());
    }

    #[test]
    fn native_focus_follows_focus_changes() {
        let engine = NavEngine::new();
        let (count, handle) = counter();
        let binding = NodeBinding::mount(&engine, NodeSpec::new("login", "email"), handle);

        engine.set_active_scope(Some("login"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        engine.set_focus("email");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            binding.view(),
            BindingView {
                focused: true,
                tab_index: MANUAL_TAB_INDEX
            }
        );

        engine.set_focus("email");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        engine.set_active_scope(Some("keyboard"));
        assert!(!binding.is_focused());
        engine.set_focus("email");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mounting_an_already_focused_node_focuses_natively() {
        let engine = NavEngine::new();
        engine.set_active_scope(Some("home"));
        engine.set_focus("first");
        let (count, handle) = counter();
        let _binding = NodeBinding::mount(&engine, NodeSpec::new("home", "first"), handle);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_nodes_never_take_native_focus() {
        let engine = NavEngine::new();
        let (count, handle) = counter();
        let mut binding = NodeBinding::mount(
            &engine,
            NodeSpec::new("s", "a").disabled(true),
            handle,
        );
        engine.set_active_scope(Some("s"));
        engine.set_focus("a");
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert!(binding.update(NodeSpec::new("s", "a")));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_replaces_without_disturbing_focus() {
        let engine = NavEngine::new();
        let (_, handle) = counter();
        let mut binding = NodeBinding::mount(
            &engine,
            NodeSpec::new("s", "x").with_edges(Edges::new().right("y")),
            handle,
        );
        engine.set_active_scope(Some("s"));
        engine.set_focus("x");

        assert!(!binding.update(NodeSpec::new("s", "x").with_edges(Edges::new().right("y"))));
        assert!(binding.update(NodeSpec::new("s", "x").with_edges(Edges::new().right("z"))));
        assert_eq!(
            engine.lookup("s", "x").and_then(|n| n.edges.right),
            Some("z".to_string())
        );
        assert!(engine.is_focused("s", "x"));
    }

    #[test]
    fn rekeyed_binding_moves_its_registration() {
        let engine = NavEngine::new();
        let (_, handle) = counter();
        let mut binding = NodeBinding::mount(&engine, NodeSpec::new("s", "old"), handle);
        assert!(binding.update(NodeSpec::new("s", "new")));
        assert!(engine.lookup("s", "old").is_none());
        assert!(engine.lookup("s", "new").is_some());
        assert_eq!(binding.id(), "new");
        drop(binding);
        assert_eq!(engine.node_count("s"), 0);
    }

    #[test]
    fn drop_leaves_a_newer_owner_alone() {
        let engine = NavEngine::new();
        let (_, first_handle) = counter();
        let (_, second_handle) = counter();
        let first = NodeBinding::mount(&engine, NodeSpec::new("s", "a"), first_handle);
        let second = NodeBinding::mount(
            &engine,
            NodeSpec::new("s", "a").with_edges(Edges::new().down("b")),
            second_handle,
        );
        drop(first);
        assert!(engine.lookup("s", "a").is_some());
        drop(second);
        assert!(engine.lookup("s", "a").is_none());
    }

    #[test]
    fn remount_with_an_identical_spec_survives_the_old_drop() {
        let engine = NavEngine::new();
        let spec = NodeSpec::new("s", "a").with_edges(Edges::new().right("b"));
        let _target = NodeBinding::mount(&engine, NodeSpec::new("s", "b"), || {});
        let old = NodeBinding::mount(&engine, spec.clone(), || {});
        let new = NodeBinding::mount(&engine, spec, || {});
        engine.set_active_scope(Some("s"));
        engine.set_focus("a");

        drop(old);
        assert!(engine.lookup("s", "a").is_some());
        assert_eq!(engine.handle_dom_key("ArrowRight").route.moved_to(), Some("b"));

        drop(new);
        assert!(engine.lookup("s", "a").is_none());
    }

    #[test]
    fn rekeying_away_leaves_a_newer_owner_of_the_old_key() {
        let engine = NavEngine::new();
        let mut first = NodeBinding::mount(&engine, NodeSpec::new("s", "a"), || {});
        let _second = NodeBinding::mount(&engine, NodeSpec::new("s", "a"), || {});
        assert!(first.update(NodeSpec::new("s", "c")));
        assert!(engine.lookup("s", "a").is_some());
        assert!(engine.lookup("s", "c").is_some());
    }
}
