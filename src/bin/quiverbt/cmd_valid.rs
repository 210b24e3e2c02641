use anyhow::{anyhow, Result};
use std::path::PathBuf;

use QuiverBT::config::TreeConfig;
use QuiverBT::cursor::{Cursor, InvalidReason, Validity};
use QuiverBT::page::{Page, PageBody, PageLayout, SLOT_NONE};
use QuiverBT::txn::{ReadUncommitted, SnapshotResolver, VisibilityResolver};
use QuiverBT::Tree;

use super::page_json::{load_page, parse_insert_head};
use super::util::{display_text, to_hex};

pub struct ValidArgs {
    pub page: PathBuf,
    pub slot: Option<u32>,
    pub recno: Option<u64>,
    pub insert: Option<String>,
    pub insert_index: usize,
    pub onpage_match: bool,
    pub snapshot: Option<u64>,
    pub json: bool,
}

/// Traversal bookkeeping after setup_iteration().
#[derive(Debug, PartialEq, Eq)]
enum Iteration {
    Column {
        last_standard_recno: u64,
        iterate_append: bool,
    },
    Row {
        row_iteration_slot: u64,
    },
}

struct ValidReport {
    slot: Option<u32>,
    recno: u64,
    key: Vec<u8>,
    valid: bool,
    state: String,
    value: Option<Vec<u8>>,
    iteration: Option<Iteration>,
}

/// CLI: valid: позиционировать курсор на странице из JSON и проверить позицию.
pub fn exec(args: ValidArgs) -> Result<()> {
    let page = load_page(&args.page)?;
    let rep = evaluate(&page, &args)?;

    if args.json {
        let mut obj = serde_json::json!({
            "layout": page.layout().as_str(),
            "slot": rep.slot,
            "recno": rep.recno,
            "valid": rep.valid,
            "state": rep.state,
            "value_hex": rep.value.as_deref().map(to_hex),
            "metrics": QuiverBT::metrics::snapshot(),
        });
        match rep.iteration {
            Some(Iteration::Column {
                last_standard_recno,
                iterate_append,
            }) => {
                obj["last_standard_recno"] = last_standard_recno.into();
                obj["iterate_append"] = iterate_append.into();
            }
            Some(Iteration::Row { row_iteration_slot }) => {
                obj["row_iteration_slot"] = row_iteration_slot.into();
            }
            None => {}
        }
        println!("{}", serde_json::to_string_pretty(&obj)?);
        return Ok(());
    }

    println!("layout:       {}", page.layout());
    println!("entries:      {}", page.entries());
    match rep.slot {
        Some(s) => println!("slot:         {}", s),
        None => println!("slot:         (none)"),
    }
    if page.layout().is_column() {
        println!("recno:        {}", rep.recno);
    } else {
        println!("key:          '{}'", display_text(&rep.key));
    }
    println!("state:        {}", rep.state);
    if let Some(v) = &rep.value {
        println!("value:        '{}' ({} B)", display_text(v), v.len());
    }
    match rep.iteration {
        Some(Iteration::Column {
            last_standard_recno,
            iterate_append,
        }) => {
            println!("last_standard_recno: {}", last_standard_recno);
            println!("iterate_append:      {}", iterate_append);
        }
        Some(Iteration::Row { row_iteration_slot }) => {
            println!("row_iteration_slot:  {}", row_iteration_slot);
        }
        None => {}
    }
    Ok(())
}

fn evaluate(page: &Page, args: &ValidArgs) -> Result<ValidReport> {
    let cfg = TreeConfig::default()
        .with_layout(page.layout())
        .with_key_order_check(false);
    let tree = Tree::open("cli", cfg)?;
    let mut cur = tree.cursor(page)?;

    // Ядро считает выход слота за границы порчей (fatal), здесь это ошибка ввода.
    if let Some(s) = args.slot {
        if s >= page.entries() {
            return Err(anyhow!(
                "slot {} out of range (page has {} entries)",
                s,
                page.entries()
            ));
        }
    }
    if args.onpage_match && args.slot.is_none() {
        return Err(anyhow!("--onpage-match needs the matching --slot"));
    }

    match args.insert.as_deref() {
        Some(head_arg) => {
            let head = parse_insert_head(head_arg)?;
            let node = page
                .insert_head(head)
                .and_then(|l| l.get(args.insert_index))
                .ok_or_else(|| anyhow!("no insert node {} in list {:?}", args.insert_index, head))?;
            cur.set_insert(head, node, args.slot.unwrap_or(SLOT_NONE));
        }
        None => {
            let slot = args
                .slot
                .ok_or_else(|| anyhow!("either --slot or --insert is required"))?;
            cur.set_slot(slot);
        }
    }
    if let Some(r) = args.recno {
        cur.set_recno(r);
    }
    cur.set_var_onpage_match(args.onpage_match);

    let resolver: Box<dyn VisibilityResolver> = match args.snapshot {
        Some(max) => Box::new(SnapshotResolver::new(u64::MAX, max)),
        None => Box::new(ReadUncommitted),
    };
    let validity = cur.check_valid(resolver.as_ref())?;

    // Insert-узел: живая позиция, значение берётся из узла, обход от неё тоже идёт.
    let positioned = matches!(
        validity,
        Validity::OnPage | Validity::Updated(_) | Validity::Invalid(InvalidReason::InsertNode)
    );
    let iteration = if positioned {
        cur.setup_iteration();
        Some(iteration_of(&cur))
    } else {
        None
    };

    let (state, value) = match validity {
        Validity::Invalid(InvalidReason::InsertNode) => (
            "insert node (value from its update list)".to_string(),
            cur.ins
                .and_then(|n| n.updates.newest())
                .and_then(|u| u.value())
                .map(|v| v.to_vec()),
        ),
        Validity::Invalid(reason) => (format!("invalid ({:?})", reason), None),
        Validity::OnPage => (
            "valid (on-page value)".to_string(),
            on_page_value(page, cur.slot, cur.recno),
        ),
        Validity::Updated(u) => (
            format!("valid (update by txn {})", u.txn_id),
            u.value().map(|v| v.to_vec()),
        ),
    };

    Ok(ValidReport {
        slot: (cur.slot != SLOT_NONE).then_some(cur.slot),
        recno: cur.recno,
        key: cur.key.clone(),
        valid: validity.is_valid(),
        state,
        value,
        iteration,
    })
}

fn iteration_of(cur: &Cursor<'_>) -> Iteration {
    if cur.layout() == PageLayout::Row {
        Iteration::Row {
            row_iteration_slot: cur.row_iteration_slot,
        }
    } else {
        Iteration::Column {
            last_standard_recno: cur.last_standard_recno,
            iterate_append: cur.flags.iterate_append,
        }
    }
}

fn on_page_value(page: &Page, slot: u32, recno: u64) -> Option<Vec<u8>> {
    match &page.body {
        PageBody::FixedColumn { values } => {
            let idx = recno.checked_sub(page.base_recno)? as usize;
            values.get(idx).map(|b| vec![*b])
        }
        PageBody::VarColumn { cells } => cells.get(slot as usize).map(|c| c.value.clone()),
        PageBody::Row { rows } => rows.get(slot as usize).map(|r| r.value.clone()),
    }
}
