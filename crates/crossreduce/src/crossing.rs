//! Weighted bilayer crossing counter
//!
//! Adapted from Barth, W., Jünger, M., & Mutzel, P. (2002). "Simple and
//! efficient bilayer cross counting." In *International Symposium on Graph
//! Drawing* (pp. 130-141). Springer, Berlin, Heidelberg. Runs in
//! `O(|E| · log |S|)` for a bilayer with south-rank size `|S|`.

use crate::arena::{next_pow2, NeighbourList};

/// Count the total weighted crossings between a south rank (given by
/// `south_order`, its current permutation of local indices) and a north
/// rank, given the south-to-north adjacency and the north rank's current
/// positions.
///
/// `neighbours_by_local[local]` holds the north-side neighbours of the
/// south node with that local index, as `(north local index, weight)`.
/// `north_positions[local]` holds the current position of the north node
/// with that local index.
///
/// `scratch_edges`/`scratch_tree` are caller-owned working buffers, cleared
/// and refilled on every call; passing in buffers already sized for the
/// largest rank in the graph keeps this allocation-free.
pub fn count_crossings(
    south_order: &[u32],
    neighbours_by_local: &[NeighbourList],
    north_positions: &[u32],
    scratch_edges: &mut Vec<(u32, u32, i64)>,
    scratch_tree: &mut Vec<i64>,
) -> i64 {
    scratch_edges.clear();
    for (south_pos, &south_local) in south_order.iter().enumerate() {
        for &(north_local, weight) in &neighbours_by_local[south_local as usize] {
            let north_pos = north_positions[north_local as usize];
            scratch_edges.push((south_pos as u32, north_pos, weight as i64));
        }
    }
    count_crossings_sorted_edges(north_positions.len(), scratch_edges, scratch_tree)
}

/// Core Barth–Jünger–Mutzel accumulator-tree pass over an edge list already
/// materialized as `(south_pos, north_pos, weight)` triples. Sorts `edges`
/// in place and walks the accumulator tree once per edge.
fn count_crossings_sorted_edges(
    num_north: usize,
    edges: &mut [(u32, u32, i64)],
    tree: &mut Vec<i64>,
) -> i64 {
    edges.sort_unstable_by_key(|&(south_pos, north_pos, _)| (south_pos, north_pos));

    // Smallest power of two >= num_north; leaves occupy [tree_base, 2*k - 1).
    let k = next_pow2(num_north);
    let tree_base = k.saturating_sub(1);
    tree.clear();
    tree.resize(2 * k - 1, 0);

    let mut cross_weight = 0i64;
    for &(_, north_pos, weight) in edges.iter() {
        let mut index = north_pos as usize + tree_base;
        tree[index] += weight;
        let mut weight_sum = 0i64;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) / 2;
            tree[index] += weight;
        }
        cross_weight += weight * weight_sum;
    }
    cross_weight
}
