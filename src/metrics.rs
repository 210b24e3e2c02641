//! Lightweight global metrics for the cursor core.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Cursor validity (проверки позиции и причины невалидности)
//! - Visibility resolver (вызовы и конфликты)
//! - Iteration setup
//! - Key-order checker (diagnostic)
//! - Config gate (Huffman)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ----- Cursor validity -----
static VALID_CHECKS: AtomicU64 = AtomicU64::new(0);
static VALID_ON_PAGE: AtomicU64 = AtomicU64::new(0);
static VALID_UPDATED: AtomicU64 = AtomicU64::new(0);
static INVALID_EMPTY_PAGE: AtomicU64 = AtomicU64::new(0);
static INVALID_OUT_OF_RANGE: AtomicU64 = AtomicU64::new(0);
static INVALID_INSERT: AtomicU64 = AtomicU64::new(0);
static INVALID_DELETED_CELL: AtomicU64 = AtomicU64::new(0);
static INVALID_TOMBSTONE: AtomicU64 = AtomicU64::new(0);

// ----- Visibility -----
static RESOLVER_CALLS: AtomicU64 = AtomicU64::new(0);
static VISIBILITY_CONFLICTS: AtomicU64 = AtomicU64::new(0);

// ----- Iteration setup -----
static ITERATION_SETUPS: AtomicU64 = AtomicU64::new(0);
static APPEND_SETUPS: AtomicU64 = AtomicU64::new(0);

// ----- Key order (diagnostic) -----
static KEY_ORDER_CHECKS: AtomicU64 = AtomicU64::new(0);
static KEY_ORDER_RESETS: AtomicU64 = AtomicU64::new(0);
static INTEGRITY_FAULTS: AtomicU64 = AtomicU64::new(0);

// ----- Config gate -----
static HUFFMAN_REJECTIONS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    // Cursor validity
    pub valid_checks: u64,
    pub valid_on_page: u64,
    pub valid_updated: u64,
    pub invalid_empty_page: u64,
    pub invalid_out_of_range: u64,
    pub invalid_insert: u64,
    pub invalid_deleted_cell: u64,
    pub invalid_tombstone: u64,

    // Visibility
    pub resolver_calls: u64,
    pub visibility_conflicts: u64,

    // Iteration setup
    pub iteration_setups: u64,
    pub append_setups: u64,

    // Key order
    pub key_order_checks: u64,
    pub key_order_resets: u64,
    pub integrity_faults: u64,

    // Config gate
    pub huffman_rejections: u64,
}

impl MetricsSnapshot {
    pub fn invalid_total(&self) -> u64 {
        self.invalid_empty_page
            + self.invalid_out_of_range
            + self.invalid_insert
            + self.invalid_deleted_cell
            + self.invalid_tombstone
    }

    /// Доля проверок, закончившихся валидной позицией.
    pub fn valid_ratio(&self) -> f64 {
        if self.valid_checks == 0 {
            0.0
        } else {
            (self.valid_on_page + self.valid_updated) as f64 / self.valid_checks as f64
        }
    }
}

// ----- Recorders (Cursor validity) -----
pub fn record_valid_check() {
    VALID_CHECKS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_valid_on_page() {
    VALID_ON_PAGE.fetch_add(1, Ordering::Relaxed);
}
pub fn record_valid_updated() {
    VALID_UPDATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_invalid_empty_page() {
    INVALID_EMPTY_PAGE.fetch_add(1, Ordering::Relaxed);
}
pub fn record_invalid_out_of_range() {
    INVALID_OUT_OF_RANGE.fetch_add(1, Ordering::Relaxed);
}
pub fn record_invalid_insert() {
    INVALID_INSERT.fetch_add(1, Ordering::Relaxed);
}
pub fn record_invalid_deleted_cell() {
    INVALID_DELETED_CELL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_invalid_tombstone() {
    INVALID_TOMBSTONE.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Visibility) -----
pub fn record_resolver_call() {
    RESOLVER_CALLS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_visibility_conflict() {
    VISIBILITY_CONFLICTS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Iteration setup) -----
pub fn record_iteration_setup(append: bool) {
    ITERATION_SETUPS.fetch_add(1, Ordering::Relaxed);
    if append {
        APPEND_SETUPS.fetch_add(1, Ordering::Relaxed);
    }
}

// ----- Recorders (Key order) -----
pub fn record_key_order_check() {
    KEY_ORDER_CHECKS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_key_order_reset() {
    KEY_ORDER_RESETS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_integrity_fault() {
    INTEGRITY_FAULTS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Config gate) -----
pub fn record_huffman_rejection() {
    HUFFMAN_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        valid_checks: VALID_CHECKS.load(Ordering::Relaxed),
        valid_on_page: VALID_ON_PAGE.load(Ordering::Relaxed),
        valid_updated: VALID_UPDATED.load(Ordering::Relaxed),
        invalid_empty_page: INVALID_EMPTY_PAGE.load(Ordering::Relaxed),
        invalid_out_of_range: INVALID_OUT_OF_RANGE.load(Ordering::Relaxed),
        invalid_insert: INVALID_INSERT.load(Ordering::Relaxed),
        invalid_deleted_cell: INVALID_DELETED_CELL.load(Ordering::Relaxed),
        invalid_tombstone: INVALID_TOMBSTONE.load(Ordering::Relaxed),

        resolver_calls: RESOLVER_CALLS.load(Ordering::Relaxed),
        visibility_conflicts: VISIBILITY_CONFLICTS.load(Ordering::Relaxed),

        iteration_setups: ITERATION_SETUPS.load(Ordering::Relaxed),
        append_setups: APPEND_SETUPS.load(Ordering::Relaxed),

        key_order_checks: KEY_ORDER_CHECKS.load(Ordering::Relaxed),
        key_order_resets: KEY_ORDER_RESETS.load(Ordering::Relaxed),
        integrity_faults: INTEGRITY_FAULTS.load(Ordering::Relaxed),

        huffman_rejections: HUFFMAN_REJECTIONS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    VALID_CHECKS.store(0, Ordering::Relaxed);
    VALID_ON_PAGE.store(0, Ordering::Relaxed);
    VALID_UPDATED.store(0, Ordering::Relaxed);
    INVALID_EMPTY_PAGE.store(0, Ordering::Relaxed);
    INVALID_OUT_OF_RANGE.store(0, Ordering::Relaxed);
    INVALID_INSERT.store(0, Ordering::Relaxed);
    INVALID_DELETED_CELL.store(0, Ordering::Relaxed);
    INVALID_TOMBSTONE.store(0, Ordering::Relaxed);

    RESOLVER_CALLS.store(0, Ordering::Relaxed);
    VISIBILITY_CONFLICTS.store(0, Ordering::Relaxed);

    ITERATION_SETUPS.store(0, Ordering::Relaxed);
    APPEND_SETUPS.store(0, Ordering::Relaxed);

    KEY_ORDER_CHECKS.store(0, Ordering::Relaxed);
    KEY_ORDER_RESETS.store(0, Ordering::Relaxed);
    INTEGRITY_FAULTS.store(0, Ordering::Relaxed);

    HUFFMAN_REJECTIONS.store(0, Ordering::Relaxed);
}
