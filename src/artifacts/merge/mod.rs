//! Three-way merge
//!
//! - `merge_base`: split point of two branches (bidirectional breadth-first search)
//! - `tree_merge`: per-path resolution of base, current and incoming trees
//! - `conflict`: content written for paths both sides changed differently

pub mod conflict;
pub mod merge_base;
pub mod tree_merge;
