//! Core repository components
//!
//! - `database`: Object store for blobs, trees and commits
//! - `index`: Staging area for the next commit
//! - `refs`: Branch pointers and HEAD
//! - `repository`: Repository context tying the other areas to one root directory
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
