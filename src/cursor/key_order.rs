//! cursor/key_order: диагностическая проверка порядка возвращаемых ключей.
//!
//! Внутри одного непрерывного обхода next обязан возвращать строго возрастающие ключи
//! (recno для column, порядок компаратора для row), prev: строго убывающие. Нарушение -
//! порча данных или баг обхода: integrity_fault(), без возврата ошибки.
//!
//! Стратегия выбирается конфигурацией дерева: Disabled ничего не делает, логика курсора
//! в обоих режимах одинакова.

use std::cmp::Ordering;

use super::{Cursor, Direction};
use crate::errors::{integrity_fault, IntegrityFault};
use crate::metrics::{record_key_order_check, record_key_order_reset};
use crate::page::{PageLayout, RECNO_OOB};
use crate::util::{printable_key, PRINTABLE_KEY_LIMIT};

/// Baseline of the last key returned by the current traversal.
#[derive(Clone, Debug)]
pub struct KeyOrderState {
    /// Row layout; empty = no baseline.
    last_key: Vec<u8>,
    /// Column layouts; RECNO_OOB = no baseline.
    last_recno: u64,
}

impl Default for KeyOrderState {
    fn default() -> Self {
        Self {
            last_key: Vec::new(),
            last_recno: RECNO_OOB,
        }
    }
}

#[derive(Clone, Debug)]
pub enum KeyOrderCheck {
    Disabled,
    Enabled(KeyOrderState),
}

impl KeyOrderCheck {
    pub fn for_config(enabled: bool) -> Self {
        if enabled {
            KeyOrderCheck::Enabled(KeyOrderState::default())
        } else {
            KeyOrderCheck::Disabled
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, KeyOrderCheck::Enabled(_))
    }

    /// Column baseline, None when disabled or unset.
    pub fn baseline_recno(&self) -> Option<u64> {
        match self {
            KeyOrderCheck::Enabled(st) if st.last_recno != RECNO_OOB => Some(st.last_recno),
            _ => None,
        }
    }

    /// Row baseline, None when disabled or unset.
    pub fn baseline_key(&self) -> Option<&[u8]> {
        match self {
            KeyOrderCheck::Enabled(st) if !st.last_key.is_empty() => Some(&st.last_key),
            _ => None,
        }
    }
}

impl<'a> Cursor<'a> {
    pub fn key_order(&self) -> &KeyOrderCheck {
        &self.key_order
    }

    /// Set the baseline to the current position (after a successful search).
    pub fn key_order_init(&mut self) {
        let layout = self.layout();
        let KeyOrderCheck::Enabled(st) = &mut self.key_order else {
            return;
        };
        match layout {
            PageLayout::FixedColumn | PageLayout::VarColumn => st.last_recno = self.recno,
            PageLayout::Row => {
                st.last_key.clear();
                st.last_key.extend_from_slice(&self.key);
            }
        }
    }

    /// Verify the key just returned by `dir` against the baseline, then advance it.
    pub fn key_order_check(&mut self, dir: Direction) {
        let layout = self.layout();
        let KeyOrderCheck::Enabled(st) = &mut self.key_order else {
            return;
        };
        record_key_order_check();

        let want = match dir {
            Direction::Next => Ordering::Less,
            Direction::Prev => Ordering::Greater,
        };

        match layout {
            PageLayout::FixedColumn | PageLayout::VarColumn => {
                if st.last_recno == RECNO_OOB || st.last_recno.cmp(&self.recno) == want {
                    st.last_recno = self.recno;
                    return;
                }
                integrity_fault(IntegrityFault::KeyOrder {
                    op: dir,
                    last: st.last_recno.to_string(),
                    current: self.recno.to_string(),
                });
            }
            PageLayout::Row => {
                if st.last_key.is_empty()
                    || self.tree.collator().compare(&st.last_key, &self.key) == want
                {
                    st.last_key.clear();
                    st.last_key.extend_from_slice(&self.key);
                    return;
                }
                let fmt = self.tree.config().key_format.as_str();
                integrity_fault(IntegrityFault::KeyOrder {
                    op: dir,
                    last: printable_key(&st.last_key, fmt, PRINTABLE_KEY_LIMIT),
                    current: printable_key(&self.key, fmt, PRINTABLE_KEY_LIMIT),
                });
            }
        }
    }

    /// Drop the baseline: the cursor jumped instead of moving sequentially.
    pub fn key_order_reset(&mut self) {
        if let KeyOrderCheck::Enabled(st) = &mut self.key_order {
            st.last_key.clear();
            st.last_recno = RECNO_OOB;
            record_key_order_reset();
        }
    }
}
