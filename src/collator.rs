//! collator: порядок ключей row-store дерева.
//!
//! По умолчанию побайтовое сравнение; пользователь может подставить любой полный порядок.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::BtError;

/// Total order over row keys.
pub trait Collator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

/// Lexicographic byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteCollator;

impl Collator for ByteCollator {
    fn name(&self) -> &str {
        "bytes"
    }

    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// Descending byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReverseCollator;

impl Collator for ReverseCollator {
    fn name(&self) -> &str {
        "reverse"
    }

    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        b.cmp(a)
    }
}

/// Built-in collators selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollatorKind {
    #[default]
    Bytes,
    Reverse,
}

impl CollatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollatorKind::Bytes => "bytes",
            CollatorKind::Reverse => "reverse",
        }
    }

    pub fn build(&self) -> Arc<dyn Collator> {
        match self {
            CollatorKind::Bytes => Arc::new(ByteCollator),
            CollatorKind::Reverse => Arc::new(ReverseCollator),
        }
    }
}

impl FromStr for CollatorKind {
    type Err = BtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "bytes" | "default" => Ok(CollatorKind::Bytes),
            "reverse" => Ok(CollatorKind::Reverse),
            other => Err(BtError::Config(format!("unknown collator '{}'", other))),
        }
    }
}
