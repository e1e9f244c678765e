//! Staging area file format
//!
//! The staging area is persisted as a single file that is rewritten as a unit.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "GIDX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length, ascending path order):
//!   - Tag: 'A' (staged content) or 'R' (staged removal) (1 byte)
//!   - Path length (4 bytes) followed by the path
//!   - For 'A' only: content length (4 bytes) followed by the content
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod index_header;
pub mod staged_entry;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &str = "GIDX";

/// Index file format version
pub const VERSION: u32 = 1;
