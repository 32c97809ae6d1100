//! Greedy collision-avoiding placement for newly introduced nodes
//!
//! Each hop rank gets a cursor displaced horizontally from the origin. The
//! cursor is pushed upward until a column tall enough for every new node of
//! that rank is clear of all existing nodes, then the rank is stacked
//! downward from it. Not optimal, but deterministic and cheap; the layered
//! layout is the tool for a tidy global arrangement.

use crate::config::PlacementConfig;
use crate::error::{GraphError, Result};
use crate::model::{Direction, GraphNode, Position};

/// Axis-aligned proximity test.
pub fn collides(a: Position, b: Position, config: &PlacementConfig) -> bool {
    (a.x - b.x).abs() < config.x_threshold && (a.y - b.y).abs() < config.y_threshold
}

/// Starting cursor for the rank `hop` steps away from `origin`.
pub fn rank_anchor(
    origin: Position,
    hop: usize,
    direction: Direction,
    config: &PlacementConfig,
) -> Position {
    Position {
        x: origin.x + direction.horizontal_sign() * config.rank_distance() * hop as f64,
        y: origin.y,
    }
}

fn stacking_step(config: &PlacementConfig) -> f64 {
    let step = config.vertical_step();
    if step.is_finite() && step > 0.0 {
        step
    } else {
        PlacementConfig::default().vertical_step()
    }
}

fn column(top: Position, count: usize, step: f64) -> impl Iterator<Item = Position> {
    (0..count).map(move |i| Position {
        x: top.x,
        y: top.y + step * i as f64,
    })
}

/// Shift `cursor` upward until `count` stacked slots below it are clear of `existing`.
///
/// Every existing node blocks a bounded run of cursor heights, so the search
/// gives up with [`GraphError::PlacementStalled`] once it has stepped past all
/// of them, or as soon as a step no longer moves the cursor.
pub fn clear_column(
    cursor: Position,
    count: usize,
    existing: &[GraphNode],
    config: &PlacementConfig,
) -> Result<Position> {
    let step = stacking_step(config);
    let stalled = |top: Position| GraphError::PlacementStalled { x: top.x, y: top.y };
    if !config.y_threshold.is_finite() {
        return Err(stalled(cursor));
    }

    let blocked_per_node = (2.0 * config.y_threshold / step).ceil() + count as f64 + 1.0;
    let max_shifts = blocked_per_node * existing.len() as f64;

    let mut top = cursor;
    let mut shifts = 0usize;
    while column(top, count, step)
        .any(|slot| existing.iter().any(|n| collides(slot, n.position, config)))
    {
        let next = top.y - step;
        if next == top.y || shifts as f64 >= max_shifts {
            return Err(stalled(top));
        }
        top.y = next;
        shifts += 1;
    }

    if shifts > 0 {
        tracing::debug!(
            "Placement cursor at x={:.1} shifted up {} step(s) to y={:.1}",
            top.x,
            shifts,
            top.y
        );
    }
    Ok(top)
}

/// Positions for `count` new nodes at hop distance `hop` from `origin`.
pub fn place_rank(
    origin: Position,
    hop: usize,
    direction: Direction,
    count: usize,
    existing: &[GraphNode],
    config: &PlacementConfig,
) -> Result<Vec<Position>> {
    let anchor = rank_anchor(origin, hop, direction, config);
    let top = clear_column(anchor, count, existing, config)?;
    Ok(column(top, count, stacking_step(config)).collect())
}
