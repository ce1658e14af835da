//! Grid compiler - derive directional edges from a ragged 2-D layout
//!
//! Rows may have different lengths. For a cell at `(r, c)`:
//! - `left`/`right` target `(r, c-1)` / `(r, c+1)` when in range (no wraparound)
//! - `up`/`down` target the adjacent row at `min(c, len - 1)`, i.e. the column
//!   is clamped by index, not by on-screen distance
//!
//! # Example
//! ```
//! use couch_nav::layout::grid::compile_grid;
//! use couch_nav::Direction;
//!
//! let map = compile_grid(&[vec!["1", "2", "3"], vec!["ok"]]);
//! assert_eq!(map.target("3", Direction::Down), Some("ok"));
//! assert_eq!(map.target("ok", Direction::Up), Some("1"));
//! assert_eq!(map.target("1", Direction::Left), None);
//! ```

use crate::types::{Direction, Edges, NodeId};

use super::map::NavigationMap;

/// Compile a ragged grid of ids into a navigation map.
///
/// A 1x1 or empty grid yields an empty map.
pub fn compile_grid<R, S>(rows: &[R]) -> NavigationMap
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    compile_grid_with_prefix(rows, "")
}

/// Same as [`compile_grid`] with `prefix` prepended to every id.
pub fn compile_grid_with_prefix<R, S>(rows: &[R], prefix: &str) -> NavigationMap
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let id = |cell: &S| -> NodeId { format!("{prefix}{}", cell.as_ref()) };

    let mut cells: Vec<(NodeId, Edges)> = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let above = r.checked_sub(1).map(|i| rows[i].as_ref());
        let below = rows.get(r + 1).map(|next| next.as_ref());

        for (c, cell) in row.iter().enumerate() {
            let mut edges = Edges::new();
            if let Some(target) = above.and_then(|adjacent| clamped(adjacent, c)) {
                edges.set(Direction::Up, id(target));
            }
            if let Some(target) = below.and_then(|adjacent| clamped(adjacent, c)) {
                edges.set(Direction::Down, id(target));
            }
            if let Some(target) = c.checked_sub(1).map(|left| &row[left]) {
                edges.set(Direction::Left, id(target));
            }
            if let Some(target) = row.get(c + 1) {
                edges.set(Direction::Right, id(target));
            }
            cells.push((id(cell), edges));
        }
    }
    cells.into_iter().collect()
}

/// Vertical list: each id links `up`/`down` to its neighbours.
pub fn compile_column<S: AsRef<str>>(ids: &[S]) -> NavigationMap {
    let rows: Vec<[&str; 1]> = ids.iter().map(|id| [id.as_ref()]).collect();
    compile_grid(&rows)
}

fn clamped<S>(row: &[S], column: usize) -> Option<&S> {
    let last = row.len().checked_sub(1)?;
    row.get(column.min(last))
}
