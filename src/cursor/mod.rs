//! cursor: позиция курсора на странице и три операции над ней.
//!
//! Разделение по подмодулям:
//! - valid.rs: check_valid(): жива ли и видима ли позиция (fix / var / row).
//! - iterate.rs: setup_iteration(): last_standard_recno, append-флаг, логический слот row.
//! - key_order.rs: диагностическая проверка строгой монотонности next/prev.
//!
//! Позицию (slot / ins / recno / key) выставляет внешний поиск; курсор принадлежит
//! одному потоку, страница и цепочки версий только читаются.

use std::fmt;

use crate::page::{InsertHeadId, InsertNode, Page, PageLayout, RECNO_OOB, SLOT_NONE};
use crate::tree::Tree;

pub mod iterate;
pub mod key_order;
pub mod valid;

pub use iterate::RowPosition;
pub use key_order::KeyOrderCheck;
pub use valid::{InvalidReason, Validity};

/// Traversal direction of a cursor movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => f.write_str("next"),
            Direction::Prev => f.write_str("prev"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorFlags {
    /// Var column: the insert node's record also matched an on-page cell.
    pub var_onpage_match: bool,
    /// Column: traversal is walking the page's append list.
    pub iterate_append: bool,
}

/// Cursor over one page. Borrowed references are valid for the cursor's position.
pub struct Cursor<'a> {
    pub tree: &'a Tree,
    pub page: &'a Page,

    /// On-page slot, or SLOT_NONE.
    pub slot: u32,
    /// Insert list the cursor's insert node belongs to.
    pub ins_head: Option<InsertHeadId>,
    pub ins: Option<&'a InsertNode>,

    /// Current record number (column layouts).
    pub recno: u64,
    /// Current returned key (row layout).
    pub key: Vec<u8>,

    /// Largest record number physically on the page (set by setup_iteration).
    pub last_standard_recno: u64,
    /// Unified slot number (row layout, set by setup_iteration).
    pub row_iteration_slot: u64,

    pub flags: CursorFlags,

    key_order: KeyOrderCheck,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tree: &'a Tree, page: &'a Page) -> Self {
        Self {
            tree,
            page,
            slot: SLOT_NONE,
            ins_head: None,
            ins: None,
            recno: RECNO_OOB,
            key: Vec::new(),
            last_standard_recno: 0,
            row_iteration_slot: 0,
            flags: CursorFlags::default(),
            key_order: KeyOrderCheck::for_config(tree.config().key_order_check),
        }
    }

    #[inline]
    pub fn layout(&self) -> PageLayout {
        self.page.layout()
    }

    /// Position on on-page slot `slot` with no insert node.
    ///
    /// Column cursors get the record number of the slot, row cursors its key.
    pub fn set_slot(&mut self, slot: u32) -> &mut Self {
        self.slot = slot;
        self.ins_head = None;
        self.ins = None;
        self.flags.var_onpage_match = false;
        match self.layout() {
            PageLayout::FixedColumn => self.recno = self.page.base_recno.saturating_add(slot as u64),
            PageLayout::VarColumn => {
                if let Some(r) = self.page.var_slot_recno(slot) {
                    self.recno = r;
                }
            }
            PageLayout::Row => {
                if let Some(k) = self.page.row_key(slot) {
                    self.key = k.to_vec();
                }
            }
        }
        self
    }

    /// Position on an insert node. `slot` is the on-page slot the search stopped at
    /// (SLOT_NONE when there is none).
    pub fn set_insert(&mut self, head: InsertHeadId, node: &'a InsertNode, slot: u32) -> &mut Self {
        self.slot = slot;
        self.ins_head = Some(head);
        self.ins = Some(node);
        self.flags.var_onpage_match = false;
        if let Some(r) = node.as_recno() {
            self.recno = r;
        }
        if let Some(k) = node.as_row_key() {
            self.key = k.to_vec();
        }
        self
    }

    /// Record number override (column search by recno).
    pub fn set_recno(&mut self, recno: u64) -> &mut Self {
        self.recno = recno;
        self
    }

    /// Mark that the var-column insert node also matched the on-page cell.
    pub fn set_var_onpage_match(&mut self, on: bool) -> &mut Self {
        self.flags.var_onpage_match = on;
        self
    }

    /// Whether the diagnostic key-order checker is active on this cursor.
    pub fn key_order_enabled(&self) -> bool {
        self.key_order.is_enabled()
    }
}
