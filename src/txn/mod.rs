//! txn: версии и видимость (внешний коллаборатор, здесь только интерфейс).
//!
//! - update.rs: Update / UpdateKind / UpdateChain (новые → старые).
//! - resolver.rs: трейт VisibilityResolver, SnapshotResolver, ReadUncommitted.

pub mod resolver;
pub mod update;

pub use resolver::{ReadUncommitted, SnapshotResolver, VisibilityResolver};
pub use update::{Update, UpdateChain, UpdateKind};
