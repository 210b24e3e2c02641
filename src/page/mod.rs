//! page: модель страниц, которую потребляет ядро курсора.
//!
//! Разделение по подмодулям:
//! - common.rs: тег раскладки (FixedColumn/VarColumn/Row), SLOT_NONE, RECNO_OOB.
//! - cell.rs: декодированные on-page записи (VarCell, RowEntry).
//! - insert.rs: in-memory insert-списки (smallest / per-slot / append).
//! - body.rs: Page + PageModify, last_recno().

pub mod body;
pub mod cell;
pub mod common;
pub mod insert;

// ---------------- re-exports (внешний API модуля page) ----------------

pub use common::{PageLayout, RECNO_OOB, SLOT_NONE};

pub use cell::{CellKind, RowEntry, VarCell};

pub use insert::{InsertHeadId, InsertKey, InsertList, InsertNode};

pub use body::{Page, PageBody, PageModify};
