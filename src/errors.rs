//! errors: типизированные ошибки ядра курсора.
//!
//! Публичный API возвращает `anyhow::Result`; конкретную причину вызывающий код
//! достаёт через `err.downcast_ref::<BtError>()`.
//!
//! Два класса проблем:
//! - `BtError`: обычные (восстанавливаемые) ошибки: конфигурация, конфликт видимости.
//! - `IntegrityFault`: нарушение инварианта (порядок ключей, границы слота). Никогда не
//!   возвращается как `Err`: только через `integrity_fault()`, который раскручивает стек.

use log::error;
use thiserror::Error;

use crate::cursor::Direction;
use crate::metrics::record_integrity_fault;
use crate::page::PageLayout;

/// Recoverable errors surfaced by the core (or passed through from its collaborators).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BtError {
    /// Table definition rejected at creation/open time.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transaction cannot safely view this version chain.
    #[error("write conflict: update by txn {txn_id} is not visible to this transaction")]
    WriteConflict { txn_id: u64 },

    /// The visible update belongs to a prepared, not yet resolved transaction.
    #[error("prepare conflict: update by txn {txn_id} is prepared but not resolved")]
    PrepareConflict { txn_id: u64 },

    /// A cursor was opened over a page of a different layout than its tree.
    #[error("layout mismatch: tree is {tree}, page is {page}")]
    LayoutMismatch { tree: PageLayout, page: PageLayout },
}

/// Internal invariant violations: corruption or an engine defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityFault {
    #[error("cursor.{op} out-of-order returns: returned key {last} then key {current}")]
    KeyOrder {
        op: Direction,
        last: String,
        current: String,
    },

    #[error("cursor slot {slot} out of bounds for page with {entries} entries")]
    SlotBounds { slot: u32, entries: u32 },

    #[error("{layout} cursor has neither an on-page slot nor an insert node")]
    NoPosition { layout: PageLayout },

    #[error("page holds {entries} entries, more than a cursor slot can address")]
    PageOversized { entries: u64 },
}

/// Report an integrity fault and abandon the operation.
///
/// The fault travels as the panic payload so a harness can recover it with
/// `catch_unwind` + `downcast_ref::<IntegrityFault>()`.
#[cold]
pub fn integrity_fault(fault: IntegrityFault) -> ! {
    error!("integrity fault: {}", fault);
    record_integrity_fault();
    std::panic::panic_any(fault)
}
