//! Object types and operations
//!
//! Everything the repository records is stored as an immutable object identified by the
//! SHA-1 hash of its content:
//!
//! - **Blob**: raw file content
//! - **Tree**: flat mapping of repository paths to blob IDs
//! - **Commit**: snapshot metadata (message, timestamp, parents, tree)
//!
//! Blobs and trees are stored as `<Type> <size>\0<content>`; commits as `Commit\0<fields>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated hash used in merge log lines
pub const SHORT_OID_LENGTH: usize = 7;
