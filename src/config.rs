//! Centralized configuration and builder for a QuiverBT tree.
//!
//! Goals:
//! - Single place to collect per-tree tunables instead of scattering env lookups.
//! - TreeConfig::from_env() reads the P1_* env vars, TreeBuilder overrides on top.
//! - validate() runs the Huffman config gate; Tree::open refuses invalid definitions.
//!
//! Env:
//! - P1_TREE_LAYOUT     = fix|var|row (default row)
//! - P1_HUFFMAN_KEY     = huffman table name for keys (default none)
//! - P1_HUFFMAN_VALUE   = huffman table name for values (default none)
//! - P1_KEY_ORDER_CHECK = 0|1|true|false (default: on in debug builds / `diagnostic` feature)
//! - P1_COLLATOR        = bytes|reverse (default bytes)
//! - P1_KEY_FORMAT      = key format used in diagnostics (default "u")

use std::fmt;

use log::warn;

use crate::collator::CollatorKind;
use crate::errors::BtError;
use crate::huffman::check_huffman_applicable;
use crate::page::PageLayout;
use crate::util::parse_bool_env;

/// Key-order checks are on by default in debug builds or with the `diagnostic` feature.
pub const KEY_ORDER_CHECK_DEFAULT: bool = cfg!(any(debug_assertions, feature = "diagnostic"));

/// Per-tree configuration.
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// Physical page layout of every page in the tree.
    /// Env: P1_TREE_LAYOUT (default row)
    pub layout: PageLayout,

    /// Huffman key-encoding request (table name). None/empty = not requested.
    /// Env: P1_HUFFMAN_KEY
    pub huffman_key: Option<String>,

    /// Huffman value-encoding request. Only consulted to decide whether the gate runs.
    /// Env: P1_HUFFMAN_VALUE
    pub huffman_value: Option<String>,

    /// Enable the diagnostic key-order checker on cursors of this tree.
    /// Env: P1_KEY_ORDER_CHECK
    pub key_order_check: bool,

    /// Row-store key order.
    /// Env: P1_COLLATOR (default bytes)
    pub collator: CollatorKind,

    /// Key format, only used to render keys in diagnostics ("r" = record number).
    /// Env: P1_KEY_FORMAT (default "u")
    pub key_format: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            layout: PageLayout::Row,
            huffman_key: None,
            huffman_value: None,
            key_order_check: KEY_ORDER_CHECK_DEFAULT,
            collator: CollatorKind::Bytes,
            key_format: "u".to_string(),
        }
    }
}

impl TreeConfig {
    /// Load configuration from environment variables. Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("P1_TREE_LAYOUT") {
            match v.parse::<PageLayout>() {
                Ok(l) => cfg.layout = l,
                Err(e) => warn!("P1_TREE_LAYOUT ignored: {}", e),
            }
        }

        if let Ok(v) = std::env::var("P1_HUFFMAN_KEY") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.huffman_key = Some(s.to_string());
            }
        }

        if let Ok(v) = std::env::var("P1_HUFFMAN_VALUE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.huffman_value = Some(s.to_string());
            }
        }

        if let Ok(v) = std::env::var("P1_KEY_ORDER_CHECK") {
            cfg.key_order_check = parse_bool_env(&v);
        }

        if let Ok(v) = std::env::var("P1_COLLATOR") {
            match v.parse::<CollatorKind>() {
                Ok(c) => cfg.collator = c,
                Err(e) => warn!("P1_COLLATOR ignored: {}", e),
            }
        }

        if let Ok(v) = std::env::var("P1_KEY_FORMAT") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.key_format = s.to_string();
            }
        }

        cfg
    }

    /// Length of the Huffman key request as seen by the config gate.
    pub fn huffman_key_len(&self) -> usize {
        self.huffman_key.as_deref().map(str::len).unwrap_or(0)
    }

    fn huffman_value_len(&self) -> usize {
        self.huffman_value.as_deref().map(str::len).unwrap_or(0)
    }

    /// Reject definitions the layout cannot support.
    ///
    /// The Huffman gate runs only when some Huffman encoding is requested at all.
    pub fn validate(&self) -> Result<(), BtError> {
        if self.huffman_key_len() == 0 && self.huffman_value_len() == 0 {
            return Ok(());
        }
        check_huffman_applicable(self.layout, self.huffman_key_len())
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_huffman_key<S: Into<String>>(mut self, key: Option<S>) -> Self {
        self.huffman_key = key.map(Into::into);
        self
    }

    pub fn with_huffman_value<S: Into<String>>(mut self, value: Option<S>) -> Self {
        self.huffman_value = value.map(Into::into);
        self
    }

    pub fn with_key_order_check(mut self, on: bool) -> Self {
        self.key_order_check = on;
        self
    }

    pub fn with_collator(mut self, c: CollatorKind) -> Self {
        self.collator = c;
        self
    }

    pub fn with_key_format<S: Into<String>>(mut self, fmt: S) -> Self {
        self.key_format = fmt.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for TreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TreeConfig {{ \
             layout: {}, \
             huffman_key: {}, \
             huffman_value: {}, \
             key_order_check: {}, \
             collator: {}, \
             key_format: {} \
             }}",
            self.layout,
            self.huffman_key.as_deref().unwrap_or("none"),
            self.huffman_value.as_deref().unwrap_or("none"),
            self.key_order_check,
            self.collator.as_str(),
            self.key_format,
        )
    }
}

/// Lightweight builder that produces a TreeConfig.
#[derive(Clone, Debug)]
pub struct TreeBuilder {
    cfg: TreeConfig,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: TreeConfig::from_env(),
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: TreeConfig::default(),
        }
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.cfg.layout = layout;
        self
    }

    pub fn huffman_key<S: Into<String>>(mut self, key: Option<S>) -> Self {
        self.cfg.huffman_key = key.map(Into::into);
        self
    }

    pub fn huffman_value<S: Into<String>>(mut self, value: Option<S>) -> Self {
        self.cfg.huffman_value = value.map(Into::into);
        self
    }

    pub fn key_order_check(mut self, on: bool) -> Self {
        self.cfg.key_order_check = on;
        self
    }

    pub fn collator(mut self, c: CollatorKind) -> Self {
        self.cfg.collator = c;
        self
    }

    pub fn key_format<S: Into<String>>(mut self, fmt: S) -> Self {
        self.cfg.key_format = fmt.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> TreeConfig {
        self.cfg
    }
}
