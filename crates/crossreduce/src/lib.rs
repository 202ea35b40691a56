//! crossreduce - weighted bilayer crossing counting and barycenter reordering
//!
//! An engine for the *ordering* phase of Sugiyama-style layered graph
//! layout: given a graph already assigned to discrete ranks, find a
//! per-rank node permutation that reduces edge crossings between
//! consecutive ranks.
//!
//! # Quick Start
//!
//! ```rust
//! use crossreduce::reorder;
//!
//! // two ranks of two nodes each, one crossing edge pair. node ids are
//! // unique across the whole graph, so rank 1 uses 2 and 3, not 0 and 1.
//! let mut buffer = vec![
//!     2, 0, 1,       // rank 0: nodes [0, 1]
//!     2, 2, 3,       // rank 1: nodes [2, 3]
//!     2,             // 2 edges into rank 1
//!     0, 3, 1,       // 0 -> 3, weight 1
//!     1, 2, 1,       // 1 -> 2, weight 1
//! ];
//! reorder(2, 4, 2, &mut buffer).unwrap();
//! assert_eq!(&buffer[2..4], &[3, 2]);
//! ```

pub mod arena;
pub mod crossing;
pub mod engine;
pub mod error;
pub mod logging;
pub mod reorder;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crossing::count_crossings;
pub use engine::{reorder, reorder_with_config, Engine, InnerLoopMode, ReorderConfig};
pub use error::EngineError;
pub use reorder::SweepDirection;
