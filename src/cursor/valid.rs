//! cursor/valid: классификация позиции курсора после поиска.
//!
//! Семантика по раскладкам:
//! - fix: валидно, если recno попадает в [base, base + entries). Цепочки версий тут не смотрим.
//! - var: пустая страница → нет; insert-узел без on-page совпадения → нет (авторитетен узел);
//!   удалённая ячейка → нет.
//! - row: пустая страница → нет; insert-узел → нет (row insert никогда не дублирует
//!   on-page ключ); видимый tombstone → нет; видимое обновление → валидно, значение
//!   берётся из обновления, а не со страницы.
//!
//! Ошибки резолвера видимости пробрасываются без изменений.

use anyhow::Result;
use log::{debug, warn};

use super::Cursor;
use crate::errors::{integrity_fault, BtError, IntegrityFault};
use crate::metrics::{
    record_invalid_deleted_cell, record_invalid_empty_page, record_invalid_insert,
    record_invalid_out_of_range, record_invalid_tombstone, record_resolver_call,
    record_valid_check, record_valid_on_page, record_valid_updated,
    record_visibility_conflict,
};
use crate::page::{Page, PageLayout, SLOT_NONE};
use crate::txn::{Update, VisibilityResolver};

/// Why a position is not returnable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    EmptyPage,
    /// Record number outside the page's range.
    OutOfRange,
    /// An insert node is authoritative; the caller consults its value.
    InsertNode,
    /// On-page cell marks a deleted record.
    DeletedCell,
    /// The visible update is a logical delete.
    Tombstone,
}

/// Result of a validity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity<'a> {
    Invalid(InvalidReason),
    /// Valid, the on-page value is authoritative.
    OnPage,
    /// Valid, the visible update's value is authoritative.
    Updated(&'a Update),
}

impl<'a> Validity<'a> {
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Validity::Invalid(_))
    }

    pub fn visible_update(&self) -> Option<&'a Update> {
        match self {
            Validity::Updated(u) => Some(u),
            _ => None,
        }
    }
}

impl<'a> Cursor<'a> {
    /// Is the current position live and visible?
    ///
    /// Never mutates the page; the only side effect is the resolver call.
    pub fn check_valid<R>(&self, resolver: &R) -> Result<Validity<'a>>
    where
        R: VisibilityResolver + ?Sized,
    {
        record_valid_check();
        let res = match self.layout() {
            PageLayout::FixedColumn => self.fix_valid(),
            PageLayout::VarColumn => self.var_valid(),
            PageLayout::Row => self.row_valid(resolver)?,
        };

        match res {
            Validity::Invalid(reason) => {
                match reason {
                    InvalidReason::EmptyPage => record_invalid_empty_page(),
                    InvalidReason::OutOfRange => record_invalid_out_of_range(),
                    InvalidReason::InsertNode => record_invalid_insert(),
                    InvalidReason::DeletedCell => record_invalid_deleted_cell(),
                    InvalidReason::Tombstone => record_invalid_tombstone(),
                }
                debug!(
                    "cursor_valid[{}]: slot={} recno={} -> {:?}",
                    self.layout(),
                    self.slot,
                    self.recno,
                    reason
                );
            }
            Validity::OnPage => record_valid_on_page(),
            Validity::Updated(_) => record_valid_updated(),
        }
        Ok(res)
    }

    fn fix_valid(&self) -> Validity<'a> {
        // Fixed pages map record numbers one-to-one onto entries.
        // Смещение от base, а не base + entries: страница может кончаться на u64::MAX.
        let page = self.page;
        if self.recno < page.base_recno || self.recno - page.base_recno >= page.entries() as u64 {
            return Validity::Invalid(InvalidReason::OutOfRange);
        }
        Validity::OnPage
    }

    fn var_valid(&self) -> Validity<'a> {
        let page = self.page;
        // Поиск не проверяет пустые страницы.
        if page.entries() == 0 {
            return Validity::Invalid(InvalidReason::EmptyPage);
        }
        assert_slot_bounds(page, self.slot);

        if self.ins.is_some() && !self.flags.var_onpage_match {
            return Validity::Invalid(InvalidReason::InsertNode);
        }

        // Var-column deletes are written into the backing store as deleted cells.
        let Some(cell) = page.var_cell(self.slot) else {
            integrity_fault(IntegrityFault::NoPosition {
                layout: PageLayout::VarColumn,
            });
        };
        if cell.is_deleted() {
            return Validity::Invalid(InvalidReason::DeletedCell);
        }
        Validity::OnPage
    }

    fn row_valid<R>(&self, resolver: &R) -> Result<Validity<'a>>
    where
        R: VisibilityResolver + ?Sized,
    {
        let page: &'a Page = self.page;
        if page.entries() == 0 {
            return Ok(Validity::Invalid(InvalidReason::EmptyPage));
        }
        assert_slot_bounds(page, self.slot);

        if self.ins.is_some() {
            return Ok(Validity::Invalid(InvalidReason::InsertNode));
        }
        if self.slot == SLOT_NONE {
            integrity_fault(IntegrityFault::NoPosition {
                layout: PageLayout::Row,
            });
        }

        if let Some(chain) = page.row_update(self.slot) {
            record_resolver_call();
            let visible = resolver.read(chain).map_err(|e| {
                if let Some(be) = e.downcast_ref::<BtError>() {
                    record_visibility_conflict();
                    warn!("cursor_valid[row]: slot={} visibility: {}", self.slot, be);
                }
                e
            })?;
            if let Some(upd) = visible {
                if upd.is_tombstone() {
                    return Ok(Validity::Invalid(InvalidReason::Tombstone));
                }
                return Ok(Validity::Updated(upd));
            }
        }
        Ok(Validity::OnPage)
    }
}

/// Slot must be SLOT_NONE or inside the page.
#[inline]
fn assert_slot_bounds(page: &Page, slot: u32) {
    let entries = page.entries();
    if slot != SLOT_NONE && slot >= entries {
        integrity_fault(IntegrityFault::SlotBounds { slot, entries });
    }
}
