//! Directional focus navigation for remote and keyboard driven front-ends.
//!
//! UI elements register as nodes in named scopes, each carrying up to four
//! directional edges. Only the active scope reacts to keys: arrows follow
//! edges, while confirm/back/menu reach the focused node's action callback.
//! Edge maps are usually compiled from a 2-D grid of ids and then patched
//! for irregular layouts.
//!
//! ```
//! use couch_nav::{NavEngine, NavNode, Edges};
//!
//! let engine = NavEngine::new();
//! engine.register("s", NavNode::new("x").with_edges(Edges::new().right("y")));
//! engine.register("s", NavNode::new("y").with_edges(Edges::new().left("x")));
//! engine.set_active_scope(Some("s"));
//! engine.set_focus("x");
//!
//! let outcome = engine.handle_dom_key("ArrowRight");
//! assert!(outcome.prevent_default);
//! assert_eq!(engine.focused_id().as_deref(), Some("y"));
//! ```

pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod runtime;
pub mod screens;
pub mod types;

pub use error::{NavError, Result};
pub use layout::{
    DanglingEdge, EdgeOverride, MapCache, NavigationMap, apply_overrides, compile_column,
    compile_grid, compile_grid_with_prefix, link_row,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult, MemorySink,
};
pub use metrics::{MetricSnapshot, NavMetrics};
pub use registry::{ActionHandler, NavNode, NodeRegistry, OwnerToken, RegisterOutcome};
pub use runtime::audit::{
    BufferedNavAudit, NavAudit, NavAuditEvent, NavAuditEventBuilder, NavAuditStage, NullNavAudit,
};
pub use runtime::binding::{BindingView, MANUAL_TAB_INDEX, NativeFocus, NodeBinding, NodeSpec};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::focus::{FocusChange, FocusListener, FocusState, ListenerId};
pub use runtime::keymap::{KeyMap, NavCommand};
pub use runtime::router::{KeyOutcome, LayoutMode, RouteOutcome};
pub use runtime::settings::{LogFileSettings, NavSettings};
pub use runtime::{DEFAULT_COMPACT_THRESHOLD, NavConfig, NavEngine, WeakNavEngine};
pub use types::{Action, Direction, Edges, NodeId, ScopeId};
