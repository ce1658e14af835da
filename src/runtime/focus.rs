use std::sync::Arc;

use crate::logging::{LogLevel, json_kv};
use crate::metrics::NavMetrics;
use crate::types::{NodeId, ScopeId};

use super::audit::{NavAuditEventBuilder, NavAuditStage};
use super::{NavEngine, read, write};

/// `(active_scope, focused_id)`. Both start out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pub active_scope: Option<ScopeId>,
    pub focused_id: Option<NodeId>,
}

impl FocusState {
    /// True when `id` holds focus and `scope` is the active scope.
    pub fn is_focused(&self, scope: &str, id: &str) -> bool {
        self.active_scope.as_deref() == Some(scope) && self.focused_id.as_deref() == Some(id)
    }
}

/// Delivered to listeners after every effective focus transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: FocusState,
    pub current: FocusState,
}

impl FocusChange {
    pub fn gained(&self, scope: &str, id: &str) -> bool {
        !self.previous.is_focused(scope, id) && self.current.is_focused(scope, id)
    }

    pub fn lost(&self, scope: &str, id: &str) -> bool {
        self.previous.is_focused(scope, id) && !self.current.is_focused(scope, id)
    }

    pub fn scope_changed(&self) -> bool {
        self.previous.active_scope != self.current.active_scope
    }
}

pub type FocusListener = Arc<dyn Fn(&FocusChange) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl NavEngine {
    /// Activate `scope`. Switching to a different scope clears focus;
    /// re-activating the current scope leaves it alone.
    pub fn set_active_scope(&self, scope: Option<&str>) {
        let change = self.transition(|state| {
            if state.active_scope.as_deref() != scope {
                state.active_scope = scope.map(str::to_string);
                state.focused_id = None;
            }
        });

        if let Some(change) = change {
            self.record_metric(NavMetrics::record_scope_switch);
            let scope_value = scope.unwrap_or_default();
            self.log(
                LogLevel::Info,
                "scope_activated",
                [json_kv("scope", scope_value)],
            );
            self.audit(
                NavAuditEventBuilder::new(NavAuditStage::ScopeActivated)
                    .detail("scope", scope_value)
                    .detail(
                        "previous",
                        change.previous.active_scope.clone().unwrap_or_default(),
                    ),
            );
            self.notify(&change);
        }
    }

    /// Focus `id` without checking the registry; the id may belong to a node
    /// that has not mounted yet.
    pub fn set_focus(&self, id: impl Into<NodeId>) {
        let id = id.into();
        let change = self.transition(|state| state.focused_id = Some(id.clone()));
        if let Some(change) = change {
            self.audit(NavAuditEventBuilder::new(NavAuditStage::FocusSet).detail("id", id.as_str()));
            self.notify(&change);
        }
    }

    pub fn clear_focus(&self) {
        if let Some(change) = self.transition(|state| state.focused_id = None) {
            self.notify(&change);
        }
    }

    pub fn focus_state(&self) -> FocusState {
        read(self.focus_lock()).clone()
    }

    pub fn active_scope(&self) -> Option<ScopeId> {
        read(self.focus_lock()).active_scope.clone()
    }

    pub fn focused_id(&self) -> Option<NodeId> {
        read(self.focus_lock()).focused_id.clone()
    }

    pub fn is_focused(&self, scope: &str, id: &str) -> bool {
        read(self.focus_lock()).is_focused(scope, id)
    }

    /// Registered node behind the current focus, if any.
    pub fn focused_node(&self) -> Option<crate::registry::NavNode> {
        let state = self.focus_state();
        let scope = state.active_scope?;
        let id = state.focused_id?;
        self.lookup(&scope, &id)
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&FocusChange) + Send + Sync + 'static,
    {
        let id = self.next_listener_id();
        write(self.listeners_lock()).push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = write(self.listeners_lock());
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn transition(&self, apply: impl FnOnce(&mut FocusState)) -> Option<FocusChange> {
        let mut state = write(self.focus_lock());
        let previous = state.clone();
        apply(&mut state);
        (*state != previous).then(|| FocusChange {
            previous,
            current: state.clone(),
        })
    }

    // Listeners may call back into the engine, so they run on a snapshot
    // with no lock held.
    pub(crate) fn notify(&self, change: &FocusChange) {
        let listeners: Vec<FocusListener> = read(self.listeners_lock())
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}
