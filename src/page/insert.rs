//! page/insert: in-memory insert lists attached to a page.
//!
//! Сам skip-list и его конкурентная вставка: внешний сервис; здесь отсортированный
//! вектор узлов, достаточный для позиционирования курсора и для тестов.

use crate::txn::UpdateChain;

/// Which insert list a cursor's insert node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsertHeadId {
    /// Row store: keys sorting before the first on-page key.
    Smallest,
    /// Row store: keys between on-page slot `s` and `s + 1`.
    /// Column store: updates to records of on-page slot `s`.
    Slot(u32),
    /// Column store: records past the page's last on-page record number.
    Append,
}

/// Key of an insert-list node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertKey {
    Recno(u64),
    Row(Vec<u8>),
}

#[derive(Clone, Debug)]
pub struct InsertNode {
    pub key: InsertKey,
    pub updates: UpdateChain,
}

impl InsertNode {
    pub fn recno(recno: u64, updates: UpdateChain) -> Self {
        Self {
            key: InsertKey::Recno(recno),
            updates,
        }
    }

    pub fn row<K: Into<Vec<u8>>>(key: K, updates: UpdateChain) -> Self {
        Self {
            key: InsertKey::Row(key.into()),
            updates,
        }
    }

    /// Record number for column-store nodes, None for row nodes.
    pub fn as_recno(&self) -> Option<u64> {
        match self.key {
            InsertKey::Recno(r) => Some(r),
            InsertKey::Row(_) => None,
        }
    }

    /// Key bytes for row-store nodes, None for column nodes.
    pub fn as_row_key(&self) -> Option<&[u8]> {
        match &self.key {
            InsertKey::Row(k) => Some(k),
            InsertKey::Recno(_) => None,
        }
    }
}

/// Ordered insert list (ascending by key).
#[derive(Clone, Debug, Default)]
pub struct InsertList {
    nodes: Vec<InsertNode>,
}

impl InsertList {
    pub fn new(nodes: Vec<InsertNode>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&InsertNode> {
        self.nodes.get(idx)
    }

    pub fn first(&self) -> Option<&InsertNode> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&InsertNode> {
        self.nodes.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InsertNode> {
        self.nodes.iter()
    }

    /// Column lookup by record number.
    pub fn find_recno(&self, recno: u64) -> Option<&InsertNode> {
        self.nodes.iter().find(|n| n.as_recno() == Some(recno))
    }
}
