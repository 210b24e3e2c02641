//! cursor/iterate: подготовка курсора к next/prev после успешного позиционирования.
//!
//! Column: last_standard_recno (последняя запись, физически лежащая на странице) и флаг
//! обхода append-списка.
//!
//! Row: единое пространство логических слотов, чтобы переключение next <-> prev не
//! требовало отдельной бухгалтерии:
//!
//! ```text
//! 1          smallest-key insert list
//! 2          on-page slot 0
//! 3          insert list after slot 0
//! (s+1)*2    on-page slot s
//! (s+1)*2+1  insert list after slot s
//! ```
//!
//! Insert-списки всегда на нечётных номерах, on-page записи на чётных.

use log::debug;

use super::Cursor;
use crate::metrics::record_iteration_setup;
use crate::page::{InsertHeadId, PageLayout};

/// A row-store traversal position in logical-slot space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowPosition {
    SmallestInsert,
    OnPage(u32),
    /// Insert list between on-page slot `s` and `s + 1`.
    InsertAfter(u32),
}

impl RowPosition {
    #[inline]
    pub fn logical_slot(self) -> u64 {
        match self {
            RowPosition::SmallestInsert => 1,
            RowPosition::OnPage(s) => (s as u64 + 1) * 2,
            RowPosition::InsertAfter(s) => (s as u64 + 1) * 2 + 1,
        }
    }

    /// Inverse of `logical_slot`. Slot 0 names no position.
    pub fn from_logical_slot(n: u64) -> Option<Self> {
        match n {
            0 => None,
            1 => Some(RowPosition::SmallestInsert),
            n => {
                let s = u32::try_from(n / 2 - 1).ok()?;
                if n % 2 == 0 {
                    Some(RowPosition::OnPage(s))
                } else {
                    Some(RowPosition::InsertAfter(s))
                }
            }
        }
    }
}

impl<'a> Cursor<'a> {
    /// Compute resumable-traversal bookkeeping for a freshly positioned cursor.
    pub fn setup_iteration(&mut self) {
        match self.layout() {
            PageLayout::FixedColumn | PageLayout::VarColumn => {
                self.last_standard_recno = self.page.last_recno();
                self.flags.iterate_append = self.ins_head == Some(InsertHeadId::Append);
                debug!(
                    "iterate_setup[{}]: recno={} last_standard_recno={} append={}",
                    self.layout(),
                    self.recno,
                    self.last_standard_recno,
                    self.flags.iterate_append
                );
                record_iteration_setup(self.flags.iterate_append);
            }
            PageLayout::Row => {
                self.row_iteration_slot = self.row_position().logical_slot();
                debug!(
                    "iterate_setup[row]: slot={} row_iteration_slot={}",
                    self.slot, self.row_iteration_slot
                );
                record_iteration_setup(false);
            }
        }
    }

    /// Where a row cursor currently sits, in logical-slot terms.
    pub fn row_position(&self) -> RowPosition {
        match self.ins_head {
            Some(InsertHeadId::Smallest) => RowPosition::SmallestInsert,
            Some(_) => RowPosition::InsertAfter(self.slot),
            None => RowPosition::OnPage(self.slot),
        }
    }
}
