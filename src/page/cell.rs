//! page/cell: уже декодированные on-page записи (кодек ячеек: внешний сервис).

/// Type of a variable-length column-store cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Value,
    /// Deleted record(s), written into the backing store.
    Deleted,
}

/// Variable-length column cell: `rle` consecutive records sharing one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarCell {
    pub kind: CellKind,
    pub rle: u64,
    pub value: Vec<u8>,
}

impl VarCell {
    pub fn value<V: Into<Vec<u8>>>(value: V) -> Self {
        Self {
            kind: CellKind::Value,
            rle: 1,
            value: value.into(),
        }
    }

    pub fn deleted() -> Self {
        Self {
            kind: CellKind::Deleted,
            rle: 1,
            value: Vec::new(),
        }
    }

    /// Repeat count (0 is treated as 1).
    pub fn with_rle(mut self, rle: u64) -> Self {
        self.rle = rle.max(1);
        self
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.kind == CellKind::Deleted
    }
}

/// Row-store on-page entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowEntry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl RowEntry {
    pub fn new<K: Into<Vec<u8>>, V: Into<Vec<u8>>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
