//! page/body: загруженная страница одной из трёх раскладок плюс её in-memory modify.
//!
//! Страница неизменна после загрузки; курсор держит на неё заимствованную ссылку.
//! Modify (цепочки обновлений, insert-списки) меняет только внешний write path.

use super::cell::{RowEntry, VarCell};
use super::common::PageLayout;
use super::insert::{InsertHeadId, InsertList};
use crate::errors::{integrity_fault, IntegrityFault};
use crate::txn::UpdateChain;

/// On-page array, tagged by layout.
#[derive(Clone, Debug)]
pub enum PageBody {
    /// One value per record number, starting at `Page::base_recno`.
    FixedColumn { values: Vec<u8> },
    VarColumn { cells: Vec<VarCell> },
    Row { rows: Vec<RowEntry> },
}

/// In-memory modifications attached to a page.
#[derive(Clone, Debug, Default)]
pub struct PageModify {
    /// Row store: per-slot update chains (None = slot never updated).
    pub row_updates: Vec<Option<UpdateChain>>,
    /// Row store: keys below the first on-page key.
    pub insert_smallest: Option<InsertList>,
    /// Per-slot insert lists (row: keys after slot `s`; column: updates to slot `s`).
    pub inserts: Vec<Option<InsertList>>,
    /// Column store: records beyond the on-page range.
    pub append: Option<InsertList>,
}

#[derive(Clone, Debug)]
pub struct Page {
    /// First record number on the page (column layouts; ignored for row pages).
    pub base_recno: u64,
    pub body: PageBody,
    pub modify: Option<PageModify>,
}

impl Page {
    pub fn fixed(base_recno: u64, values: Vec<u8>) -> Self {
        Self {
            base_recno,
            body: PageBody::FixedColumn { values },
            modify: None,
        }
    }

    pub fn var(base_recno: u64, cells: Vec<VarCell>) -> Self {
        Self {
            base_recno,
            body: PageBody::VarColumn { cells },
            modify: None,
        }
    }

    pub fn row(rows: Vec<RowEntry>) -> Self {
        Self {
            base_recno: 0,
            body: PageBody::Row { rows },
            modify: None,
        }
    }

    #[inline]
    pub fn layout(&self) -> PageLayout {
        match self.body {
            PageBody::FixedColumn { .. } => PageLayout::FixedColumn,
            PageBody::VarColumn { .. } => PageLayout::VarColumn,
            PageBody::Row { .. } => PageLayout::Row,
        }
    }

    /// Number of on-page entries (cells for var pages, not records).
    ///
    /// Slots are `u32` with `SLOT_NONE` reserved, so a body with more entries is corrupt.
    #[inline]
    pub fn entries(&self) -> u32 {
        let n = match &self.body {
            PageBody::FixedColumn { values } => values.len(),
            PageBody::VarColumn { cells } => cells.len(),
            PageBody::Row { rows } => rows.len(),
        };
        slot_count(n)
    }

    fn modify_mut(&mut self) -> &mut PageModify {
        self.modify.get_or_insert_with(PageModify::default)
    }

    /// Attach an update chain to a row slot.
    pub fn set_row_update(&mut self, slot: u32, chain: UpdateChain) {
        let m = self.modify_mut();
        let idx = slot as usize;
        if m.row_updates.len() <= idx {
            m.row_updates.resize(idx + 1, None);
        }
        m.row_updates[idx] = Some(chain);
    }

    /// Attach (replace) an insert list.
    pub fn set_insert_list(&mut self, head: InsertHeadId, list: InsertList) {
        let m = self.modify_mut();
        match head {
            InsertHeadId::Smallest => m.insert_smallest = Some(list),
            InsertHeadId::Append => m.append = Some(list),
            InsertHeadId::Slot(s) => {
                let idx = s as usize;
                if m.inserts.len() <= idx {
                    m.inserts.resize(idx + 1, None);
                }
                m.inserts[idx] = Some(list);
            }
        }
    }

    /// Update chain of a row slot, if the slot was ever updated in memory.
    pub fn row_update(&self, slot: u32) -> Option<&UpdateChain> {
        self.modify
            .as_ref()?
            .row_updates
            .get(slot as usize)?
            .as_ref()
    }

    pub fn insert_head(&self, head: InsertHeadId) -> Option<&InsertList> {
        let m = self.modify.as_ref()?;
        match head {
            InsertHeadId::Smallest => m.insert_smallest.as_ref(),
            InsertHeadId::Append => m.append.as_ref(),
            InsertHeadId::Slot(s) => m.inserts.get(s as usize)?.as_ref(),
        }
    }

    /// Var-column cell at `slot`.
    pub fn var_cell(&self, slot: u32) -> Option<&VarCell> {
        match &self.body {
            PageBody::VarColumn { cells } => cells.get(slot as usize),
            _ => None,
        }
    }

    /// Row-store key at `slot`.
    pub fn row_key(&self, slot: u32) -> Option<&[u8]> {
        match &self.body {
            PageBody::Row { rows } => rows.get(slot as usize).map(|r| r.key.as_slice()),
            _ => None,
        }
    }

    /// Largest record number physically represented on a column page.
    ///
    /// - fixed: `base + entries - 1`
    /// - var: номер последней неудалённой записи с учётом RLE
    ///
    /// Без живых записей возвращает `base - 1`: пустой диапазон. Row pages: 0.
    pub fn last_recno(&self) -> u64 {
        match &self.body {
            PageBody::FixedColumn { values } => match values.len() as u64 {
                0 => self.base_recno.saturating_sub(1),
                n => self.base_recno.saturating_add(n - 1),
            },
            PageBody::VarColumn { cells } => {
                // Номера записей кончаются на u64::MAX: RLE за этой границей насыщается.
                let mut start = self.base_recno;
                let mut last_live = self.base_recno.saturating_sub(1);
                for cell in cells {
                    let end = start.saturating_add(cell.rle.max(1) - 1);
                    if !cell.is_deleted() {
                        last_live = end;
                    }
                    start = end.saturating_add(1);
                }
                last_live
            }
            PageBody::Row { .. } => 0,
        }
    }

    /// First record number stored in var-column cell `slot` (RLE-aware).
    pub fn var_slot_recno(&self, slot: u32) -> Option<u64> {
        let PageBody::VarColumn { cells } = &self.body else {
            return None;
        };
        if slot as usize >= cells.len() {
            return None;
        }
        Some(
            cells[..slot as usize]
                .iter()
                .fold(self.base_recno, |r, c| r.saturating_add(c.rle.max(1))),
        )
    }
}

/// On-page entry count as a slot number; beyond the slot space is an integrity fault.
pub(crate) fn slot_count(n: usize) -> u32 {
    // Слоты 0..=u32::MAX-1; SLOT_NONE сам слотом не бывает.
    match u32::try_from(n) {
        Ok(c) => c,
        Err(_) => integrity_fault(IntegrityFault::PageOversized { entries: n as u64 }),
    }
}
