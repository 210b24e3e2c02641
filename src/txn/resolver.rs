//! txn/resolver: интерфейс резолвера видимости и две простые реализации.
//!
//! Ядро курсора вызывает `VisibilityResolver::read` только для чтения и пробрасывает
//! любую ошибку без изменений (`?`).

use std::collections::HashSet;

use anyhow::Result;

use super::update::{Update, UpdateChain, UpdateKind};
use crate::errors::BtError;

/// Given a version chain, return the update visible to the current transaction.
pub trait VisibilityResolver {
    fn read<'u>(&self, chain: &'u UpdateChain) -> Result<Option<&'u Update>>;
}

/// Snapshot isolation view.
///
/// Update by `txn_id` is visible when it is the reader's own write, or when it
/// committed before the snapshot: `txn_id < snap_max` and not in `concurrent`.
#[derive(Clone, Debug)]
pub struct SnapshotResolver {
    pub txn_id: u64,
    pub snap_max: u64,
    pub concurrent: HashSet<u64>,
}

impl SnapshotResolver {
    pub fn new(txn_id: u64, snap_max: u64) -> Self {
        Self {
            txn_id,
            snap_max,
            concurrent: HashSet::new(),
        }
    }

    pub fn with_concurrent<I: IntoIterator<Item = u64>>(mut self, ids: I) -> Self {
        self.concurrent.extend(ids);
        self
    }

    #[inline]
    pub fn is_visible(&self, id: u64) -> bool {
        if id == self.txn_id {
            return true;
        }
        id < self.snap_max && !self.concurrent.contains(&id)
    }
}

impl VisibilityResolver for SnapshotResolver {
    fn read<'u>(&self, chain: &'u UpdateChain) -> Result<Option<&'u Update>> {
        for upd in chain.iter() {
            if matches!(upd.kind, UpdateKind::Reserve) {
                continue;
            }
            if !self.is_visible(upd.txn_id) {
                continue;
            }
            if upd.prepared && upd.txn_id != self.txn_id {
                return Err(BtError::PrepareConflict { txn_id: upd.txn_id }.into());
            }
            return Ok(Some(upd));
        }
        Ok(None)
    }
}

/// Sees the newest non-reserved update regardless of commit state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadUncommitted;

impl VisibilityResolver for ReadUncommitted {
    fn read<'u>(&self, chain: &'u UpdateChain) -> Result<Option<&'u Update>> {
        Ok(chain
            .iter()
            .find(|u| !matches!(u.kind, UpdateKind::Reserve)))
    }
}
