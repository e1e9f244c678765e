//! Version control data structures and algorithms
//!
//! - `branch`: Branch name validation
//! - `checkout`: Planning working tree changes between two trees
//! - `index`: Staging area file format
//! - `merge`: Merge base search and three-way tree resolution
//! - `objects`: Object types (blob, tree, commit)
//! - `status`: Working file classification

pub mod branch;
pub mod checkout;
pub mod index;
pub mod merge;
pub mod objects;
pub mod status;
