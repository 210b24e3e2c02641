//! txn/update: обновления и цепочки версий (новые → старые).

/// Payload of one update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    /// Full value.
    Standard(Vec<u8>),
    /// Placeholder reserved by a writer; never visible to readers.
    Reserve,
    /// Logical delete.
    Tombstone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub txn_id: u64,
    pub kind: UpdateKind,
    /// Writer has prepared but not yet committed/rolled back.
    pub prepared: bool,
}

impl Update {
    pub fn standard<V: Into<Vec<u8>>>(txn_id: u64, value: V) -> Self {
        Self {
            txn_id,
            kind: UpdateKind::Standard(value.into()),
            prepared: false,
        }
    }

    pub fn tombstone(txn_id: u64) -> Self {
        Self {
            txn_id,
            kind: UpdateKind::Tombstone,
            prepared: false,
        }
    }

    pub fn reserve(txn_id: u64) -> Self {
        Self {
            txn_id,
            kind: UpdateKind::Reserve,
            prepared: false,
        }
    }

    pub fn prepared(mut self) -> Self {
        self.prepared = true;
        self
    }

    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self.kind, UpdateKind::Tombstone)
    }

    /// Value bytes of a standard update.
    pub fn value(&self) -> Option<&[u8]> {
        match &self.kind {
            UpdateKind::Standard(v) => Some(v),
            _ => None,
        }
    }
}

/// Updates for one slot, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateChain {
    updates: Vec<Update>,
}

impl UpdateChain {
    /// `updates` must already be ordered newest first.
    pub fn new(updates: Vec<Update>) -> Self {
        Self { updates }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn newest(&self) -> Option<&Update> {
        self.updates.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Update> {
        self.updates.iter()
    }
}
