#![allow(non_snake_case)]

// Базовые модули
pub mod config;
pub mod errors;
pub mod metrics;
pub mod util;

// Модель страниц и версий (внешние коллабораторы ядра)
pub mod page;   // src/page/{mod,common,cell,insert,body}.rs
pub mod txn;    // src/txn/{mod,update,resolver}.rs

// Порядок ключей и config gate
pub mod collator;
pub mod huffman;

// Дерево и курсор
pub mod tree;
pub mod cursor; // src/cursor/{mod,valid,iterate,key_order}.rs

// Удобные реэкспорты
pub use collator::{ByteCollator, Collator, CollatorKind, ReverseCollator};
pub use config::{TreeBuilder, TreeConfig};
pub use cursor::{Cursor, Direction, InvalidReason, RowPosition, Validity};
pub use errors::{integrity_fault, BtError, IntegrityFault};
pub use huffman::check_huffman_applicable;
pub use page::{
    InsertHeadId, InsertList, InsertNode, Page, PageLayout, RowEntry, VarCell, RECNO_OOB,
    SLOT_NONE,
};
pub use tree::Tree;
pub use txn::{ReadUncommitted, SnapshotResolver, Update, UpdateChain, VisibilityResolver};
