//! Sweep Controller and the crate's top-level `reorder` entry point.

use tracing::{debug, debug_span, info, info_span};

use crate::arena::Arena;
use crate::crossing::count_crossings;
use crate::error::EngineError;
use crate::reorder::{try_rank, SweepDirection};

/// Whether a rank's barycenter proposal is applied once per sweep visit, or
/// re-applied until it stops changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InnerLoopMode {
    /// Apply the barycenter proposal once per rank per sweep visit.
    #[default]
    Once,
    /// Re-run the barycenter proposal for a rank until it produces no
    /// further accepted change, before moving to the next rank.
    UntilStable,
}

/// Configuration for one `reorder` call. The algorithm itself has no other
/// tunable knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderConfig {
    pub inner_loop: InnerLoopMode,
}

/// Drives the alternating down/up sweeps over an [`Arena`] until convergence.
pub struct Engine {
    arena: Arena,
    config: ReorderConfig,
}

impl Engine {
    pub fn new(arena: Arena, config: ReorderConfig) -> Self {
        Engine { arena, config }
    }

    pub fn into_arena(self) -> Arena {
        self.arena
    }

    /// Seed `crossings[1..]` with the actual initial crossing counts (rather
    /// than leaving the "+infinity" sentinel), so the very first sweep can
    /// compare against a real baseline instead of trivially improving on
    /// infinity.
    fn seed_crossings(&mut self) {
        let arena = &mut self.arena;
        for rank in 1..arena.num_ranks {
            arena.crossings[rank] = count_crossings(
                &arena.order[rank],
                &arena.adjacency_up[rank],
                &arena.positions[rank - 1],
                &mut arena.scratch_edges,
                &mut arena.scratch_tree,
            );
        }
    }

    /// Alternate DOWN/UP sweeps until `improve_counter` drains.
    pub fn run_to_convergence(&mut self) {
        self.seed_crossings();

        let num_ranks = self.arena.num_ranks;
        if num_ranks < 2 {
            return;
        }

        let _reorder_span = info_span!(
            "reorder",
            num_ranks,
            initial_crossings = self.total_crossings()
        )
        .entered();

        let mut improve_counter = 2i32;
        let mut direction = SweepDirection::Down;
        let mut iteration = 0u32;

        while improve_counter > 0 {
            improve_counter -= 1;

            let ranks: Vec<usize> = match direction {
                SweepDirection::Down => (1..num_ranks).collect(),
                SweepDirection::Up => (0..num_ranks - 1).rev().collect(),
            };
            let last_rank = *ranks.last().unwrap();
            let offset_north: isize = match direction {
                SweepDirection::Down => 0,
                SweepDirection::Up => 1,
            };

            let sweep_span = debug_span!("sweep", ?direction, iteration).entered();

            for r in ranks {
                let is_sweep_terminal = r == last_rank;
                if self.arena.crossings[(r as isize + offset_north) as usize] != 0 {
                    let mut code = try_rank(&mut self.arena, r, direction, is_sweep_terminal);
                    if self.config.inner_loop == InnerLoopMode::UntilStable {
                        while code > 0 {
                            let next = try_rank(&mut self.arena, r, direction, is_sweep_terminal);
                            if next == 0 {
                                break;
                            }
                            code = next;
                        }
                    }
                    if code == 2 {
                        improve_counter = 2;
                    }
                }
            }

            debug!(total_crossings = self.total_crossings(), "sweep done");
            drop(sweep_span);

            direction = match direction {
                SweepDirection::Down => SweepDirection::Up,
                SweepDirection::Up => SweepDirection::Down,
            };
            iteration += 1;
        }

        info!(total_crossings = self.total_crossings(), "converged");
    }

    fn total_crossings(&self) -> i64 {
        self.arena.crossings[1..].iter().sum()
    }
}

/// Top-level library entry point: reorders every rank in place to reduce
/// weighted edge crossings, writing the result back into `buffer`.
///
/// `num_nodes`/`num_edges` are validated against the buffer's own counts
/// when non-zero; pass `0` for either to skip that check (used by callers
/// whose header omits the totals).
pub fn reorder(
    num_ranks: usize,
    num_nodes: usize,
    num_edges: usize,
    buffer: &mut [i32],
) -> Result<(), EngineError> {
    let arena = Arena::build(num_ranks, num_nodes, num_edges, buffer)?;
    let mut engine = Engine::new(arena, ReorderConfig::default());
    engine.run_to_convergence();
    engine.into_arena().write_back(buffer);
    Ok(())
}

/// Like [`reorder`], but with an explicit [`ReorderConfig`].
pub fn reorder_with_config(
    num_ranks: usize,
    num_nodes: usize,
    num_edges: usize,
    buffer: &mut [i32],
    config: ReorderConfig,
) -> Result<(), EngineError> {
    let arena = Arena::build(num_ranks, num_nodes, num_edges, buffer)?;
    let mut engine = Engine::new(arena, config);
    engine.run_to_convergence();
    engine.into_arena().write_back(buffer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two ranks of `rank_size` nodes each, with globally unique node ids
    /// (rank 0: `0..n`, rank 1: `n..2n`). `edges` are `(from_local, to_local,
    /// weight)` local positions, translated to global ids here.
    fn buffer_two_rank(rank_size: usize, edges: &[(i32, i32, i32)]) -> Vec<i32> {
        let n = rank_size as i32;
        let mut buf = Vec::new();
        buf.push(n);
        buf.extend(0..n);
        buf.push(n);
        buf.extend(n..2 * n);
        buf.push(edges.len() as i32);
        for &(f, t, w) in edges {
            buf.push(f);
            buf.push(n + t);
            buf.push(w);
        }
        buf
    }

    #[test]
    fn s1_two_node_swap() {
        let mut buf = buffer_two_rank(2, &[(0, 1, 1), (1, 0, 1)]);
        reorder(2, 4, 2, &mut buf).unwrap();
        assert_eq!(&buf[0..2], &[0, 1]);
        assert_eq!(&buf[2..4], &[3, 2]);
    }

    #[test]
    fn s2_three_node_full_reversal() {
        let mut buf = buffer_two_rank(3, &[(0, 2, 1), (1, 1, 1), (2, 0, 1)]);
        reorder(2, 6, 3, &mut buf).unwrap();
        assert_eq!(&buf[0..3], &[0, 1, 2]);
        assert_eq!(&buf[3..6], &[5, 4, 3]);
    }

    #[test]
    fn s5_weighted_swap() {
        let mut buf = buffer_two_rank(2, &[(0, 1, 5), (1, 0, 2)]);
        reorder(2, 4, 2, &mut buf).unwrap();
        assert_eq!(&buf[2..4], &[3, 2]);
    }

    #[test]
    fn s4_already_optimal_is_unchanged() {
        // output buffer layout is order-only, so "unchanged" means the
        // written-back order matches the input order, not byte-for-byte
        // buffer equality against the header+edges input.
        let mut buf = buffer_two_rank(2, &[(0, 0, 1), (1, 1, 1)]);
        reorder(2, 4, 2, &mut buf).unwrap();
        assert_eq!(&buf[0..2], &[0, 1]);
        assert_eq!(&buf[2..4], &[2, 3]);
    }

    #[test]
    fn s6_single_rank_no_edges_unchanged() {
        let mut buf = vec![2, 0, 1];
        reorder(1, 2, 0, &mut buf).unwrap();
        assert_eq!(&buf[0..2], &[0, 1]);
    }

    /// Rebuilds a buffer with the same rank sizes and edges as the diamond
    /// fixture, but with each rank's node-id list replaced by `orders`, so a
    /// test can re-derive crossing counts for an already-written-back order.
    fn diamond_buffer(orders: [&[i32]; 3]) -> Vec<i32> {
        let mut buf = Vec::new();
        for order in orders {
            buf.push(order.len() as i32);
            buf.extend_from_slice(order);
        }
        buf.push(3);
        for &(f, t, w) in &[(0, 5, 1), (1, 4, 1), (2, 3, 1)] {
            buf.push(f);
            buf.push(t);
            buf.push(w);
        }
        buf.push(3);
        for &(f, t, w) in &[(3, 8, 1), (4, 7, 1), (5, 6, 1)] {
            buf.push(f);
            buf.push(t);
            buf.push(w);
        }
        buf
    }

    /// Assembles a two-rank buffer from explicit per-rank node-id orders and
    /// a global-id edge list, for tests that need to vary both independently.
    fn two_rank_buffer_with_edges(orders: [&[i32]; 2], edges: &[(i32, i32, i32)]) -> Vec<i32> {
        let mut buf = Vec::new();
        for order in orders {
            buf.push(order.len() as i32);
            buf.extend_from_slice(order);
        }
        buf.push(edges.len() as i32);
        for &(f, t, w) in edges {
            buf.push(f);
            buf.push(t);
            buf.push(w);
        }
        buf
    }

    /// Test-only wrapper around `count_crossings` that owns its own scratch
    /// buffers, since tests call it once-off rather than in a hot loop.
    fn count(arena: &Arena, rank: usize) -> i64 {
        let mut edges = Vec::new();
        let mut tree = Vec::new();
        count_crossings(
            &arena.order[rank],
            &arena.adjacency_up[rank],
            &arena.positions[rank - 1],
            &mut edges,
            &mut tree,
        )
    }

    #[test]
    fn three_rank_diamond_converges_to_zero_crossings() {
        // three ranks of 3 nodes each, with distinct global ids per rank,
        // wired so only the fully-reversed order on ranks 1 and 2 is crossing-free.
        let mut buf = diamond_buffer([&[0, 1, 2], &[3, 4, 5], &[6, 7, 8]]);
        reorder(3, 9, 6, &mut buf).unwrap();

        let final_buf = diamond_buffer([&buf[0..3], &buf[3..6], &buf[6..9]]);
        let arena = Arena::build(3, 9, 6, &final_buf).unwrap();
        let mut total = 0i64;
        for r in 1..3 {
            total += count(&arena, r);
        }
        assert_eq!(total, 0);
    }

    #[test]
    fn running_twice_never_increases_crossings() {
        let edges = [(0, 5, 3), (1, 4, 1), (2, 3, 2)];

        let mut first_pass = two_rank_buffer_with_edges([&[0, 1, 2], &[3, 4, 5]], &edges);
        reorder(2, 6, 3, &mut first_pass).unwrap();
        let after_first = {
            let rebuilt = two_rank_buffer_with_edges([&first_pass[0..3], &first_pass[3..6]], &edges);
            let arena = Arena::build(2, 6, 3, &rebuilt).unwrap();
            count(&arena, 1)
        };

        // re-run on a buffer whose input order is the first pass's output
        // and whose edges are unchanged — what a caller driving the engine
        // to a fixed point would actually do.
        let mut second_input = two_rank_buffer_with_edges([&first_pass[0..3], &first_pass[3..6]], &edges);
        reorder(2, 6, 3, &mut second_input).unwrap();
        let after_second = {
            let rebuilt = two_rank_buffer_with_edges([&second_input[0..3], &second_input[3..6]], &edges);
            let arena = Arena::build(2, 6, 3, &rebuilt).unwrap();
            count(&arena, 1)
        };

        assert!(after_second <= after_first);
    }

    fn bilayer_crossings(orders: [&[i32]; 2], edges: &[(i32, i32, i32)]) -> i64 {
        let buf = two_rank_buffer_with_edges(orders, edges);
        let arena = Arena::build(2, orders[0].len() + orders[1].len(), edges.len(), &buf).unwrap();
        count(&arena, 1)
    }

    proptest::proptest! {
        /// Running `reorder` once never leaves the bilayer with more weighted
        /// crossings than it started with, and running it again on its own
        /// output never increases the count further — the sweep controller's
        /// well-founded termination argument (monotone non-increasing total).
        #[test]
        fn reorder_never_increases_crossings(
            rank_size in 1usize..6,
            seed in proptest::collection::vec((0i32..6, 0i32..6, 1i32..5), 0..15),
        ) {
            let n = rank_size as i32;
            let rank0: Vec<i32> = (0..n).collect();
            let rank1: Vec<i32> = (n..2 * n).collect();
            let edges: Vec<(i32, i32, i32)> = seed
                .into_iter()
                .map(|(f, t, w)| (f % n, n + t % n, w))
                .collect();

            let before = bilayer_crossings([&rank0, &rank1], &edges);

            let mut buf = two_rank_buffer_with_edges([&rank0, &rank1], &edges);
            reorder(2, 2 * rank_size, edges.len(), &mut buf).unwrap();
            let after_once = bilayer_crossings([&buf[0..rank_size], &buf[rank_size..2 * rank_size]], &edges);
            proptest::prop_assert!(after_once <= before);

            let mut buf_again = two_rank_buffer_with_edges(
                [&buf[0..rank_size], &buf[rank_size..2 * rank_size]],
                &edges,
            );
            reorder(2, 2 * rank_size, edges.len(), &mut buf_again).unwrap();
            let after_twice =
                bilayer_crossings([&buf_again[0..rank_size], &buf_again[rank_size..2 * rank_size]], &edges);
            proptest::prop_assert!(after_twice <= after_once);
        }
    }
}
