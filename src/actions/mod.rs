//! Cleanup actions applied to confirmed duplicate groups.
//!
//! - [`delete`]: move members to the system trash or unlink them, with
//!   dry-run support and a guard that one copy always survives.
//! - [`link`]: replace a deleted member with a symlink to the retained copy.
//! - [`policy`]: regex-driven selection of which members to delete.

pub mod delete;
pub mod link;
pub mod policy;

pub use delete::{
    delete_batch, delete_to_trash, permanent_delete, validate_preserves_copy, BatchDeleteResult,
    DeleteConfig, DeleteError, DeleteResult,
};
pub use link::{create_link, LinkError};
pub use policy::KeepPolicy;
