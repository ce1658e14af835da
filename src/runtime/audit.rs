//! Engine audit hooks.
//!
//! Every effective state change of the engine is reported to the configured
//! [`NavAudit`] sink as a stage plus structured details, so hosts can buffer
//! or visualise navigation without touching the core.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAuditStage {
    /// A node id appeared in a scope.
    NodeRegistered,
    /// An existing registration was swapped for a different one.
    NodeReplaced,
    NodeUnregistered,
    /// The active scope changed (focus was cleared with it).
    ScopeActivated,
    /// `set_focus` changed the focused id.
    FocusSet,
    /// An arrow key moved focus along an edge.
    FocusMoved,
    /// An arrow key was recognised but focus stayed put.
    KeySwallowed,
    ActionDispatched,
    /// Compact/standard layout switched.
    LayoutModeChanged,
}

#[derive(Debug, Clone)]
pub struct NavAuditEvent {
    pub timestamp: SystemTime,
    pub stage: NavAuditStage,
    pub details: Vec<(String, Value)>,
}

impl NavAuditEvent {
    fn new(stage: NavAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct NavAuditEventBuilder {
    event: NavAuditEvent,
}

impl NavAuditEventBuilder {
    pub fn new(stage: NavAuditStage) -> Self {
        Self {
            event: NavAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> NavAuditEvent {
        self.event
    }
}

pub trait NavAudit: Send + Sync {
    fn record(&self, event: NavAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullNavAudit;

impl NavAudit for NullNavAudit {
    fn record(&self, _event: NavAuditEvent) {}
}

/// Buffers every event; handy for tests and debug overlays.
#[derive(Debug, Default)]
pub struct BufferedNavAudit {
    events: Mutex<Vec<NavAuditEvent>>,
}

impl BufferedNavAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<NavAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn count(&self, stage: NavAuditStage) -> usize {
        self.events()
            .iter()
            .filter(|event| event.stage == stage)
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl NavAudit for BufferedNavAudit {
    fn record(&self, event: NavAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
