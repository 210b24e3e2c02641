//! page/common: тег раскладки страницы и общие константы курсора.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BtError;

/// Slot sentinel: the cursor is not positioned on an on-page entry.
pub const SLOT_NONE: u32 = u32::MAX;

/// Out-of-band record number. Valid record numbers start at 1.
pub const RECNO_OOB: u64 = 0;

/// Physical page layout of a tree. Closed set: every cursor operation matches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    /// Fixed-length column store: one fixed-width value per record number.
    FixedColumn,
    /// Variable-length column store: run-length encoded cells keyed by record number.
    VarColumn,
    /// Row store: arbitrary byte-string keys.
    Row,
}

impl PageLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLayout::FixedColumn => "fix",
            PageLayout::VarColumn => "var",
            PageLayout::Row => "row",
        }
    }

    /// Column layouts address entries by record number.
    #[inline]
    pub fn is_column(&self) -> bool {
        !matches!(self, PageLayout::Row)
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageLayout {
    type Err = BtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fix" | "fixed" | "fixed_column" | "col_fix" => Ok(PageLayout::FixedColumn),
            "var" | "variable" | "var_column" | "col_var" => Ok(PageLayout::VarColumn),
            "row" => Ok(PageLayout::Row),
            other => Err(BtError::Config(format!(
                "unknown page layout '{}' (expected fix|var|row)",
                other
            ))),
        }
    }
}
