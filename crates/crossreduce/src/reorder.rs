//! Rank Reorderer
//!
//! Proposes a new order for one rank via the weighted barycenter heuristic,
//! decomposes the proposal into maximal "out-of-place" intervals, and
//! accepts each interval only if it strictly improves crossings against the
//! north neighbour without worsening the combined north+south total.
//!
//! Every `Vec` this module touches while trying a rank — the barycenter
//! means, the proposed order, the change intervals, the trial order — lives
//! on the `Arena` as a scratch field sized once for the largest rank in the
//! graph. Nothing here allocates once a sweep is underway.

use crate::arena::{Arena, NeighbourList, CROSSINGS_INFINITY};
use crate::crossing::count_crossings;

/// Sweep direction: which neighbour rank is "north" (the reference side
/// whose positions the barycenter is computed against) for this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// North = `r - 1`, south = `r + 1`.
    Down,
    /// North = `r + 1`, south = `r - 1`.
    Up,
}

/// Result of trying a rank: the maximum improvement code seen across all
/// change intervals tried for that rank.
///
/// * `0` — no interval was accepted.
/// * `1` — at least one interval was accepted, but the combined total held steady.
/// * `2` — at least one interval strictly decreased the combined total.
pub type ImprovementCode = u8;

/// `(offset to north's crossings[] slot, offset to south's crossings[] slot)`
/// relative to rank `r`, for the given sweep direction.
fn crossing_offsets(direction: SweepDirection) -> (isize, isize) {
    match direction {
        SweepDirection::Down => (0, 1),
        SweepDirection::Up => (1, 0),
    }
}

/// Sort nodes ascending by the weighted mean position of their north-side
/// neighbours, writing the result into `out`. Nodes with no north neighbours
/// keep their current position as their sort key, so they don't migrate
/// purely from floating-point noise.
///
/// `scratch_means` is a caller-owned working buffer, cleared and refilled on
/// every call.
fn propose_order(
    current_order: &[u32],
    neighbours: &[NeighbourList],
    north_positions: &[u32],
    scratch_means: &mut Vec<(f64, u32)>,
    out: &mut Vec<u32>,
) {
    scratch_means.clear();
    scratch_means.extend(current_order.iter().enumerate().map(|(pos, &local)| {
        let mut sum = 0.0f64;
        let mut num = 0.0f64;
        for &(north_local, weight) in &neighbours[local as usize] {
            sum += weight as f64 * north_positions[north_local as usize] as f64;
            num += weight as f64;
        }
        let mean = if num > 0.0 { sum / num } else { pos as f64 };
        (mean, local)
    }));

    // Stable sort: ties preserve relative order, which keeps the loop from
    // oscillating between two equally-good permutations.
    scratch_means.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    out.clear();
    out.extend(scratch_means.iter().map(|&(_, local)| local));
}

/// Decompose `new_order` into maximal intervals `[a, b]` where at least one
/// slot wants to move to a strictly higher position than it currently
/// occupies, writing the result into `out`.
///
/// `scratch_perm` is a caller-owned working buffer, cleared and refilled on
/// every call.
fn change_intervals(
    new_order: &[u32],
    positions: &[u32],
    scratch_perm: &mut Vec<usize>,
    out: &mut Vec<(usize, usize)>,
) {
    let num_nodes = new_order.len();
    scratch_perm.clear();
    scratch_perm.extend(new_order.iter().map(|&local| positions[local as usize] as usize));

    out.clear();
    let mut open: Option<(usize, usize)> = None; // (seq_start, seq_end)

    for (pos, &target) in scratch_perm.iter().enumerate() {
        if target > pos {
            open = match open {
                None => Some((pos, target)),
                Some((start, end)) if end < pos => {
                    out.push((start, pos - 1));
                    Some((pos, target))
                }
                Some((start, end)) => Some((start, end.max(target))),
            };
        }
        if target == pos {
            if let Some((start, end)) = open {
                if end < pos {
                    out.push((start, pos - 1));
                    open = None;
                }
            }
        }
    }
    if let Some((start, _)) = open {
        out.push((start, num_nodes - 1));
    }
}

/// Try every change interval for rank `r` in ascending order, mutating
/// `arena` in place on acceptance. Returns the maximum improvement code
/// across all intervals tried.
///
/// `is_sweep_terminal` marks the last rank the current sweep visits, which
/// has no south side to weigh against.
pub fn try_rank(
    arena: &mut Arena,
    rank: usize,
    direction: SweepDirection,
    is_sweep_terminal: bool,
) -> ImprovementCode {
    let north_rank = match direction {
        SweepDirection::Down => rank - 1,
        SweepDirection::Up => rank + 1,
    };

    match direction {
        SweepDirection::Down => propose_order(
            &arena.order[rank],
            &arena.adjacency_up[rank],
            &arena.positions[north_rank],
            &mut arena.scratch_means,
            &mut arena.scratch_new_order,
        ),
        SweepDirection::Up => propose_order(
            &arena.order[rank],
            &arena.adjacency_down[rank],
            &arena.positions[north_rank],
            &mut arena.scratch_means,
            &mut arena.scratch_new_order,
        ),
    }

    change_intervals(
        &arena.scratch_new_order,
        &arena.positions[rank],
        &mut arena.scratch_perm,
        &mut arena.scratch_intervals,
    );

    let (offset_north, offset_south) = crossing_offsets(direction);
    let mut best = 0u8;

    for i in 0..arena.scratch_intervals.len() {
        let (a, b) = arena.scratch_intervals[i];

        arena.scratch_trial.clear();
        arena.scratch_trial.extend_from_slice(&arena.order[rank]);
        arena.scratch_trial[a..=b].copy_from_slice(&arena.scratch_new_order[a..=b]);

        let new_north = match direction {
            SweepDirection::Down => count_crossings(
                &arena.scratch_trial,
                &arena.adjacency_up[rank],
                &arena.positions[north_rank],
                &mut arena.scratch_edges,
                &mut arena.scratch_tree,
            ),
            SweepDirection::Up => count_crossings(
                &arena.scratch_trial,
                &arena.adjacency_down[rank],
                &arena.positions[north_rank],
                &mut arena.scratch_edges,
                &mut arena.scratch_tree,
            ),
        };
        let prev_north = arena.crossings[(rank as isize + offset_north) as usize];

        let (new_south, prev_south) = if is_sweep_terminal {
            (0i64, 0i64)
        } else {
            let south_rank = match direction {
                SweepDirection::Down => rank + 1,
                SweepDirection::Up => rank - 1,
            };
            let new_south = match direction {
                SweepDirection::Down => count_crossings(
                    &arena.scratch_trial,
                    &arena.adjacency_down[rank],
                    &arena.positions[south_rank],
                    &mut arena.scratch_edges,
                    &mut arena.scratch_tree,
                ),
                SweepDirection::Up => count_crossings(
                    &arena.scratch_trial,
                    &arena.adjacency_up[rank],
                    &arena.positions[south_rank],
                    &mut arena.scratch_edges,
                    &mut arena.scratch_tree,
                ),
            };
            let prev_south = arena.crossings[(rank as isize + offset_south) as usize];
            (new_south, prev_south)
        };

        let fewer_north = new_north < prev_north;
        let fewer_or_equal_total = new_north + new_south <= prev_south + prev_north;

        if fewer_north && fewer_or_equal_total {
            let strictly_fewer_total = new_north + new_south < prev_north + prev_south;

            arena.crossings[(rank as isize + offset_north) as usize] = new_north;
            if !is_sweep_terminal {
                arena.crossings[(rank as isize + offset_south) as usize] = new_south;
            }
            for (pos, &local) in arena.scratch_trial.iter().enumerate() {
                arena.positions[rank][local as usize] = pos as u32;
            }
            arena.order[rank].copy_from_slice(&arena.scratch_trial);

            best = best.max(if strictly_fewer_total { 2 } else { 1 });
        }
    }

    best
}

/// Seed value used for cache slots that have never been computed, matching
/// the "+infinity" sentinel `Arena` seeds unvisited ranks with.
pub(crate) const _UNSET: i64 = CROSSINGS_INFINITY;
