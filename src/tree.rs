//! tree: дескриптор дерева: раскладка, компаратор и конфигурация для курсоров.

use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::collator::Collator;
use crate::config::TreeConfig;
use crate::cursor::Cursor;
use crate::errors::BtError;
use crate::page::{Page, PageLayout};

#[derive(Debug)]
pub struct Tree {
    name: String,
    config: TreeConfig,
    collator: Arc<dyn Collator>,
}

impl Tree {
    /// Open a tree definition. Rejected definitions create nothing.
    pub fn open<S: Into<String>>(name: S, config: TreeConfig) -> Result<Self> {
        config.validate()?;
        let name = name.into();
        let collator = config.collator.build();
        info!("tree '{}' opened: {}", name, config);
        Ok(Self {
            name,
            config,
            collator,
        })
    }

    /// Replace the configured collator with a user-supplied total order.
    pub fn with_collator(mut self, collator: Arc<dyn Collator>) -> Self {
        self.collator = collator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> PageLayout {
        self.config.layout
    }

    pub fn collator(&self) -> &dyn Collator {
        self.collator.as_ref()
    }

    /// Unpositioned cursor over `page`, which must match the tree's layout.
    pub fn cursor<'a>(&'a self, page: &'a Page) -> Result<Cursor<'a>> {
        if page.layout() != self.layout() {
            return Err(BtError::LayoutMismatch {
                tree: self.layout(),
                page: page.layout(),
            }
            .into());
        }
        Ok(Cursor::new(self, page))
    }
}
