//! Key-event router.
//!
//! The router is the only consumer of key input. Each key is resolved
//! through the engine's [`KeyMap`](super::keymap::KeyMap), then applied to the
//! registry as it stands at that moment; edges are never cached across keys.

use crossterm::event::KeyEvent;

use crate::logging::{LogLevel, json_kv};
use crate::metrics::NavMetrics;
use crate::registry::ActionHandler;
use crate::types::{Action, Direction, NodeId};

use super::NavEngine;
use super::audit::{NavAuditEventBuilder, NavAuditStage};
use super::keymap::NavCommand;

/// Platform layout. Directional navigation only runs in `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Standard,
    /// Touch/pointer layout; the router ignores every key.
    Compact,
}

impl LayoutMode {
    pub fn from_width(width: u32, compact_threshold: u32) -> Self {
        if width <= compact_threshold {
            LayoutMode::Compact
        } else {
            LayoutMode::Standard
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Standard => "standard",
            LayoutMode::Compact => "compact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Not a navigation key.
    Unrecognized,
    /// Compact layout; nothing was routed.
    Inactive,
    /// No active scope, no focus, or the focused node is missing or disabled.
    NoCurrentNode,
    Moved { from: NodeId, to: NodeId },
    /// No edge, or the edge target is missing or disabled.
    Swallowed { from: NodeId, direction: Direction },
    ActionDispatched { id: NodeId, action: Action },
    /// The focused node has no action callback.
    ActionIgnored { id: NodeId, action: Action },
}

impl RouteOutcome {
    pub fn moved_to(&self) -> Option<&str> {
        match self {
            RouteOutcome::Moved { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Result of handing one key to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub command: Option<NavCommand>,
    pub route: RouteOutcome,
    /// Set for every recognised key so the host suppresses native
    /// scrolling and tabbing.
    pub prevent_default: bool,
}

impl KeyOutcome {
    fn ignored(route: RouteOutcome) -> Self {
        Self {
            command: None,
            route,
            prevent_default: false,
        }
    }
}

impl NavEngine {
    /// Route a DOM-style key name (`"ArrowUp"`, `"Enter"`, ...).
    pub fn handle_dom_key(&self, key: &str) -> KeyOutcome {
        if self.is_compact() {
            return KeyOutcome::ignored(RouteOutcome::Inactive);
        }
        match self.config().keymap.resolve_dom(key) {
            Some(command) => self.handle_command(command),
            None => KeyOutcome::ignored(RouteOutcome::Unrecognized),
        }
    }

    /// Route a terminal key event.
    pub fn handle_key_event(&self, event: &KeyEvent) -> KeyOutcome {
        if self.is_compact() {
            return KeyOutcome::ignored(RouteOutcome::Inactive);
        }
        match self.config().keymap.resolve(event) {
            Some(command) => self.handle_command(command),
            None => KeyOutcome::ignored(RouteOutcome::Unrecognized),
        }
    }

    fn handle_command(&self, command: NavCommand) -> KeyOutcome {
        KeyOutcome {
            command: Some(command),
            route: self.route(command),
            prevent_default: true,
        }
    }

    /// Apply an already-resolved command. Honors compact mode.
    pub fn route(&self, command: NavCommand) -> RouteOutcome {
        if self.is_compact() {
            return RouteOutcome::Inactive;
        }
        self.record_metric(NavMetrics::record_key);
        match command {
            NavCommand::Move(direction) => self.route_move(direction),
            NavCommand::Act(action) => self.route_action(action),
        }
    }

    fn route_move(&self, direction: Direction) -> RouteOutcome {
        let state = self.focus_state();
        let (Some(scope), Some(from)) = (state.active_scope, state.focused_id) else {
            return RouteOutcome::NoCurrentNode;
        };

        let target = {
            let registry = self.registry();
            let Some(current) = registry.focusable(&scope, &from) else {
                return RouteOutcome::NoCurrentNode;
            };
            current
                .edge(direction)
                .filter(|to| registry.focusable(&scope, to).is_some())
                .map(str::to_string)
        };

        let Some(to) = target else {
            self.record_metric(NavMetrics::record_swallowed);
            self.log(
                LogLevel::Trace,
                "key_swallowed",
                [
                    json_kv("scope", scope.as_str()),
                    json_kv("from", from.as_str()),
                    json_kv("direction", direction.as_str()),
                ],
            );
            self.audit(
                NavAuditEventBuilder::new(NavAuditStage::KeySwallowed)
                    .detail("from", from.as_str())
                    .detail("direction", direction.as_str()),
            );
            return RouteOutcome::Swallowed { from, direction };
        };

        if let Some(change) = self.transition(|state| state.focused_id = Some(to.clone())) {
            self.record_metric(NavMetrics::record_move);
            self.log(
                LogLevel::Trace,
                "focus_moved",
                [
                    json_kv("scope", scope.as_str()),
                    json_kv("from", from.as_str()),
                    json_kv("to", to.as_str()),
                    json_kv("direction", direction.as_str()),
                ],
            );
            self.audit(
                NavAuditEventBuilder::new(NavAuditStage::FocusMoved)
                    .detail("from", from.as_str())
                    .detail("to", to.as_str())
                    .detail("direction", direction.as_str()),
            );
            self.notify(&change);
        }
        RouteOutcome::Moved { from, to }
    }

    fn route_action(&self, action: Action) -> RouteOutcome {
        let state = self.focus_state();
        let (Some(scope), Some(id)) = (state.active_scope, state.focused_id) else {
            return RouteOutcome::NoCurrentNode;
        };

        let handler: Option<ActionHandler> = {
            let registry = self.registry();
            let Some(current) = registry.focusable(&scope, &id) else {
                return RouteOutcome::NoCurrentNode;
            };
            current.on_action.clone()
        };

        let Some(handler) = handler else {
            return RouteOutcome::ActionIgnored { id, action };
        };

        self.record_metric(NavMetrics::record_action);
        self.audit(
            NavAuditEventBuilder::new(NavAuditStage::ActionDispatched)
                .detail("id", id.as_str())
                .detail("action", action.as_str()),
        );
        self.log(
            LogLevel::Debug,
            "action_dispatched",
            [json_kv("id", id.as_str()), json_kv("action", action.as_str())],
        );
        handler(action);
        RouteOutcome::ActionDispatched { id, action }
    }
}
