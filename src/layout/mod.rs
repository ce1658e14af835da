//! Navigation-map compilation.
//!
//! Maps are built in two stages: [`grid`] generates edges from a ragged 2-D
//! layout, then [`overrides`] applies ordered point patches. Both stages are
//! pure so results can be memoized with [`MapCache`].

mod cache;
pub mod grid;
mod map;
pub mod overrides;

pub use cache::{DEFAULT_MAP_CACHE_CAPACITY, MapCache, MapFingerprint};
pub use grid::{compile_column, compile_grid, compile_grid_with_prefix};
pub use map::{DanglingEdge, NavigationMap};
pub use overrides::{EdgeOverride, apply_overrides, link_row};
