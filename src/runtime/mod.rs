use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::{Duration, Instant};

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, NavMetrics};
use crate::registry::{NavNode, NodeRegistry, OwnerToken, RegisterOutcome};
use crate::types::ScopeId;

pub mod audit;
pub mod binding;
pub mod driver;
pub mod focus;
pub mod keymap;
pub mod router;
pub mod settings;

use audit::{NavAudit, NavAuditEventBuilder, NavAuditStage, NullNavAudit};
use focus::{FocusListener, FocusState, ListenerId};
use keymap::KeyMap;
use router::LayoutMode;

/// Viewport widths at or below this are treated as a compact/touch layout.
pub const DEFAULT_COMPACT_THRESHOLD: u32 = 600;

const LOG_TARGET: &str = "couch_nav::engine";

/// Configuration knobs for a [`NavEngine`].
#[derive(Clone)]
pub struct NavConfig {
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Shared counters, see [`NavConfig::enable_metrics`].
    pub metrics: Option<Arc<Mutex<NavMetrics>>>,
    /// Receives an event for every effective state change.
    pub audit: Arc<dyn NavAudit>,
    pub keymap: KeyMap,
    /// Viewport width at or below which the router is disabled.
    pub compact_threshold: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            audit: Arc::new(NullNavAudit),
            keymap: KeyMap::default(),
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl NavConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(NavMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<NavMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

struct EngineShared {
    registry: RwLock<NodeRegistry>,
    focus: RwLock<FocusState>,
    layout_mode: RwLock<LayoutMode>,
    listeners: RwLock<Vec<(ListenerId, FocusListener)>>,
    next_listener: AtomicU64,
    config: NavConfig,
    started_at: Instant,
}

/// Navigation engine context: node registry, focus state and router in one
/// cloneable handle.
///
/// Clones share state. Independent engines never observe each other, so
/// tests can run many in parallel.
#[derive(Clone)]
pub struct NavEngine {
    shared: Arc<EngineShared>,
}

/// Non-owning engine handle held by focus listeners.
#[derive(Clone)]
pub struct WeakNavEngine {
    shared: Weak<EngineShared>,
}

impl WeakNavEngine {
    pub fn upgrade(&self) -> Option<NavEngine> {
        self.shared.upgrade().map(|shared| NavEngine { shared })
    }
}

impl Default for NavEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NavEngine {
    pub fn new() -> Self {
        Self::with_config(NavConfig::default())
    }

    pub fn with_config(config: NavConfig) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                registry: RwLock::new(NodeRegistry::new()),
                focus: RwLock::new(FocusState::default()),
                layout_mode: RwLock::new(LayoutMode::Standard),
                listeners: RwLock::new(Vec::new()),
                next_listener: AtomicU64::new(1),
                config,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.shared.config
    }

    pub fn downgrade(&self) -> WeakNavEngine {
        WeakNavEngine {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn ptr_eq(&self, other: &NavEngine) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // ---------------------------------------------------------------------
    // Node registry
    // ---------------------------------------------------------------------

    /// Insert or atomically replace `node` in `scope`. Focus is untouched.
    pub fn register(&self, scope: &str, node: NavNode) -> RegisterOutcome {
        let id = node.id.clone();
        let outcome = write(&self.shared.registry).register(scope, node);

        match outcome {
            RegisterOutcome::Inserted => {
                self.record_metric(NavMetrics::record_registration);
                self.audit(
                    NavAuditEventBuilder::new(NavAuditStage::NodeRegistered)
                        .detail("scope", scope)
                        .detail("id", id.as_str()),
                );
            }
            RegisterOutcome::Replaced { changed: true } => {
                self.log(
                    LogLevel::Debug,
                    "node_replaced",
                    [json_kv("scope", scope), json_kv("id", id.as_str())],
                );
                self.audit(
                    NavAuditEventBuilder::new(NavAuditStage::NodeReplaced)
                        .detail("scope", scope)
                        .detail("id", id.as_str()),
                );
            }
            RegisterOutcome::Replaced { changed: false } => {}
        }
        outcome
    }

    /// Remove `id` from `scope`. A focused node leaves focus dangling; the
    /// caller picks the next target.
    pub fn unregister(&self, scope: &str, id: &str) -> Option<NavNode> {
        let removed = write(&self.shared.registry).unregister(scope, id);
        if removed.is_some() {
            self.on_unregistered(scope, id);
        }
        removed
    }

    /// Remove `(scope, id)` only while the stored node still carries
    /// `owner`. Lets an outgoing owner drop its registration without
    /// clobbering one a newer owner already put in place, even when both
    /// registered identical nodes.
    pub fn unregister_owned(&self, scope: &str, id: &str, owner: &OwnerToken) -> bool {
        let removed = {
            let mut registry = write(&self.shared.registry);
            let owned = registry
                .lookup(scope, id)
                .is_some_and(|node| node.owned_by(owner));
            owned && registry.unregister(scope, id).is_some()
        };
        if removed {
            self.on_unregistered(scope, id);
        }
        removed
    }

    pub fn lookup(&self, scope: &str, id: &str) -> Option<NavNode> {
        read(&self.shared.registry).lookup(scope, id).cloned()
    }

    pub fn contains_scope(&self, scope: &str) -> bool {
        read(&self.shared.registry).contains_scope(scope)
    }

    pub fn scope_ids(&self) -> Vec<ScopeId> {
        read(&self.shared.registry).scope_ids()
    }

    pub fn node_count(&self, scope: &str) -> usize {
        read(&self.shared.registry).len(scope)
    }

    pub(crate) fn registry(&self) -> RwLockReadGuard<'_, NodeRegistry> {
        read(&self.shared.registry)
    }

    fn on_unregistered(&self, scope: &str, id: &str) {
        self.record_metric(NavMetrics::record_unregistration);
        self.audit(
            NavAuditEventBuilder::new(NavAuditStage::NodeUnregistered)
                .detail("scope", scope)
                .detail("id", id),
        );
    }

    // ---------------------------------------------------------------------
    // Platform layout
    // ---------------------------------------------------------------------

    pub fn layout_mode(&self) -> LayoutMode {
        *read(&self.shared.layout_mode)
    }

    pub fn is_compact(&self) -> bool {
        self.layout_mode() == LayoutMode::Compact
    }

    /// Focus state is left alone in either direction.
    pub fn set_layout_mode(&self, mode: LayoutMode) {
        let previous = std::mem::replace(&mut *write(&self.shared.layout_mode), mode);
        if previous != mode {
            self.log(
                LogLevel::Info,
                "layout_mode_changed",
                [json_kv("mode", mode.as_str())],
            );
            self.audit(
                NavAuditEventBuilder::new(NavAuditStage::LayoutModeChanged)
                    .detail("mode", mode.as_str()),
            );
        }
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.set_layout_mode(LayoutMode::from_width(
            width,
            self.shared.config.compact_threshold,
        ));
    }

    // ---------------------------------------------------------------------
    // Observability
    // ---------------------------------------------------------------------

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.shared.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.shared.started_at.elapsed()))
    }

    /// Push the current metrics snapshot through the logger, if both exist.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) =
            (self.shared.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event("couch_nav::metrics"));
        }
    }

    pub fn uptime(&self) -> Duration {
        self.shared.started_at.elapsed()
    }

    pub(crate) fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.shared.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = event_with_fields(level, LOG_TARGET, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }

    pub(crate) fn record_metric(&self, record: impl FnOnce(&mut NavMetrics)) {
        if let Some(metrics) = self.shared.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    pub(crate) fn audit(&self, builder: NavAuditEventBuilder) {
        self.shared.config.audit.record(builder.finish());
    }

    pub(crate) fn focus_lock(&self) -> &RwLock<FocusState> {
        &self.shared.focus
    }

    pub(crate) fn listeners_lock(&self) -> &RwLock<Vec<(ListenerId, FocusListener)>> {
        &self.shared.listeners
    }

    pub(crate) fn next_listener_id(&self) -> ListenerId {
        ListenerId(self.shared.next_listener.fetch_add(1, Ordering::Relaxed))
    }
}

// A panic inside a host callback must not wedge navigation for the rest of
// the process, so poisoned locks are recovered rather than propagated.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::runtime::audit::BufferedNavAudit;
    use crate::types::Edges;

    #[test]
    fn registration_is_scoped_and_reported() {
        let audit = Arc::new(BufferedNavAudit::new());
        let mut config = NavConfig::default();
        config.audit = audit.clone();
        config.enable_metrics();
        let engine = NavEngine::with_config(config);

        engine.register("login", NavNode::new("email"));
        engine.register("login", NavNode::new("email"));
        engine.register("login", NavNode::new("email").with_edges(Edges::new().down("password")));
        engine.unregister("login", "email");
        engine.unregister("login", "email");

        assert_eq!(
            audit.stages(),
            vec![
                NavAuditStage::NodeRegistered,
                NavAuditStage::NodeReplaced,
                NavAuditStage::NodeUnregistered,
            ]
        );
        let snapshot = engine.metrics_snapshot().unwrap();
        assert_eq!(snapshot.registrations, 1);
        assert_eq!(snapshot.unregistrations, 1);
        assert!(!engine.contains_scope("login"));
    }

    #[test]
    fn unregister_owned_keeps_newer_owner_of_an_identical_node() {
        let engine = NavEngine::new();
        let old_owner = OwnerToken::new();
        let new_owner = OwnerToken::new();
        let node = NavNode::new("a").with_edges(Edges::new().right("b"));
        engine.register("s", node.clone().with_owner(old_owner.clone()));
        engine.register("s", node.with_owner(new_owner.clone()));

        assert!(!engine.unregister_owned("s", "a", &old_owner));
        assert!(engine.lookup("s", "a").is_some());
        assert!(!engine.unregister_owned("s", "missing", &new_owner));
        assert!(engine.unregister_owned("s", "a", &new_owner));
        assert!(engine.lookup("s", "a").is_none());
    }

    #[test]
    fn viewport_width_drives_layout_mode() {
        let sink = MemorySink::new();
        let mut config = NavConfig::default();
        config.logger = Some(Logger::new(sink.clone()));
        let engine = NavEngine::with_config(config);

        assert_eq!(engine.layout_mode(), LayoutMode::Standard);
        engine.set_viewport_width(600);
        assert!(engine.is_compact());
        engine.set_viewport_width(601);
        assert!(!engine.is_compact());
        engine.set_viewport_width(1920);
        assert_eq!(
            sink.messages(),
            vec!["layout_mode_changed".to_string(), "layout_mode_changed".to_string()]
        );
    }

    #[test]
    fn engines_do_not_share_state() {
        let first = NavEngine::new();
        let second = NavEngine::new();
        first.register("s", NavNode::new("a"));
        assert!(second.lookup("s", "a").is_none());
        assert!(first.clone().ptr_eq(&first));
        assert!(!first.ptr_eq(&second));
    }
}
