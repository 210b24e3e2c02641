use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use QuiverBT::page::{InsertHeadId, InsertList, InsertNode, Page, PageLayout, RowEntry, VarCell};
use QuiverBT::txn::{Update, UpdateChain};

use super::util::decode_bytes_arg;

#[derive(Debug, Deserialize)]
struct PageJson {
    layout: PageLayout,
    #[serde(default = "default_base_recno")]
    base_recno: u64,
    /// fixed column
    #[serde(default)]
    values: Vec<u8>,
    /// var column
    #[serde(default)]
    cells: Vec<CellJson>,
    /// row
    #[serde(default)]
    rows: Vec<RowJson>,
    #[serde(default)]
    smallest: Vec<InsJson>,
    #[serde(default)]
    inserts: BTreeMap<u32, Vec<InsJson>>,
    #[serde(default)]
    append: Vec<InsJson>,
}

#[derive(Debug, Deserialize)]
struct CellJson {
    #[serde(default)]
    value: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default = "default_rle")]
    rle: u64,
}

#[derive(Debug, Deserialize)]
struct RowJson {
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    updates: Vec<UpdJson>,
}

#[derive(Debug, Deserialize)]
struct UpdJson {
    txn: u64,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    tombstone: bool,
    #[serde(default)]
    prepared: bool,
}

#[derive(Debug, Deserialize)]
struct InsJson {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    recno: Option<u64>,
    #[serde(default)]
    updates: Vec<UpdJson>,
}

fn default_base_recno() -> u64 {
    1
}

fn default_rle() -> u64 {
    1
}

/// Прочитать страницу из JSON-файла (формат: см. `quiverbt valid --help`).
pub fn load_page(path: &Path) -> Result<Page> {
    let raw = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let pj: PageJson = serde_json::from_slice(&raw)
        .with_context(|| format!("parse page json {}", path.display()))?;
    build_page(pj)
}

fn build_page(pj: PageJson) -> Result<Page> {
    let mut page = match pj.layout {
        PageLayout::FixedColumn => Page::fixed(pj.base_recno, pj.values),
        PageLayout::VarColumn => {
            let mut cells = Vec::with_capacity(pj.cells.len());
            for c in pj.cells {
                let cell = if c.deleted {
                    VarCell::deleted()
                } else {
                    VarCell::value(decode_bytes_arg(&c.value)?)
                };
                cells.push(cell.with_rle(c.rle));
            }
            Page::var(pj.base_recno, cells)
        }
        PageLayout::Row => {
            let mut rows = Vec::with_capacity(pj.rows.len());
            let mut chains = Vec::new();
            for (slot, r) in pj.rows.into_iter().enumerate() {
                rows.push(RowEntry::new(
                    decode_bytes_arg(&r.key)?,
                    decode_bytes_arg(&r.value)?,
                ));
                if !r.updates.is_empty() {
                    chains.push((slot as u32, build_chain(r.updates)?));
                }
            }
            let mut page = Page::row(rows);
            for (slot, chain) in chains {
                page.set_row_update(slot, chain);
            }
            page
        }
    };

    if !pj.smallest.is_empty() {
        page.set_insert_list(InsertHeadId::Smallest, build_list(pj.smallest)?);
    }
    for (slot, nodes) in pj.inserts {
        page.set_insert_list(InsertHeadId::Slot(slot), build_list(nodes)?);
    }
    if !pj.append.is_empty() {
        page.set_insert_list(InsertHeadId::Append, build_list(pj.append)?);
    }
    Ok(page)
}

fn build_chain(updates: Vec<UpdJson>) -> Result<UpdateChain> {
    let mut out = Vec::with_capacity(updates.len());
    for u in updates {
        let mut upd = if u.tombstone {
            Update::tombstone(u.txn)
        } else {
            let v = u
                .value
                .ok_or_else(|| anyhow!("update txn={} needs 'value' or 'tombstone'", u.txn))?;
            Update::standard(u.txn, decode_bytes_arg(&v)?)
        };
        if u.prepared {
            upd = upd.prepared();
        }
        out.push(upd);
    }
    Ok(UpdateChain::new(out))
}

fn build_list(nodes: Vec<InsJson>) -> Result<InsertList> {
    let mut out = Vec::with_capacity(nodes.len());
    for n in nodes {
        let chain = build_chain(n.updates)?;
        let node = match (n.recno, n.key) {
            (Some(r), _) => InsertNode::recno(r, chain),
            (None, Some(k)) => InsertNode::row(decode_bytes_arg(&k)?, chain),
            (None, None) => return Err(anyhow!("insert node needs 'key' or 'recno'")),
        };
        out.push(node);
    }
    Ok(InsertList::new(out))
}

/// "smallest" | "append" | "slot:N"
pub fn parse_insert_head(s: &str) -> Result<InsertHeadId> {
    match s.trim() {
        "smallest" => Ok(InsertHeadId::Smallest),
        "append" => Ok(InsertHeadId::Append),
        other => {
            let n = other
                .strip_prefix("slot:")
                .ok_or_else(|| anyhow!("bad --insert '{}' (smallest|append|slot:N)", other))?;
            let slot = n
                .parse::<u32>()
                .with_context(|| format!("bad slot in --insert '{}'", other))?;
            Ok(InsertHeadId::Slot(slot))
        }
    }
}
