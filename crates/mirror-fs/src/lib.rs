//! Filesystem layer for dirmirror
//!
//! Provides the primitives the sync passes are built from:
//!
//! - [`TreeSnapshot`]: a point-in-time listing of every folder and file under a root
//! - [`RelPath`]: a root-relative, forward-slash path used as the key for both trees
//! - [`checksum`]: streaming SHA-256 content hashes used for move detection
//! - [`io`]: path-annotated wrappers around the mutating operations, including atomic copy

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;
pub mod tree;

pub use error::{Error, Result};
pub use path::RelPath;
pub use tree::{FileMeta, TreeSnapshot};
