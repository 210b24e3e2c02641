use anyhow::{anyhow, Context, Result};
use std::panic::{self, AssertUnwindSafe};

use QuiverBT::collator::CollatorKind;
use QuiverBT::config::TreeConfig;
use QuiverBT::cursor::Direction;
use QuiverBT::page::{Page, PageLayout};
use QuiverBT::{IntegrityFault, Tree};

use super::util::decode_bytes_arg;

/// CLI: order: прогнать последовательность ключей через проверку порядка.
///
/// Первый ключ: результат поиска (init), остальные: результаты next/prev.
/// Нарушение порядка печатается и завершает процесс с кодом 2.
pub fn exec(layout: String, direction: String, keys: Vec<String>, collator: String) -> Result<()> {
    let layout: PageLayout = layout.parse()?;
    let collator: CollatorKind = collator.parse()?;
    let dir = match direction.trim() {
        "next" => Direction::Next,
        "prev" => Direction::Prev,
        other => return Err(anyhow!("bad --direction '{}' (next|prev)", other)),
    };
    if keys.is_empty() {
        return Err(anyhow!("--keys is empty"));
    }

    let mut recnos = Vec::new();
    let mut row_keys = Vec::new();
    for k in &keys {
        if layout.is_column() {
            let r = k
                .trim()
                .parse::<u64>()
                .with_context(|| format!("bad record number '{}'", k))?;
            recnos.push(r);
        } else {
            row_keys.push(decode_bytes_arg(k)?);
        }
    }

    let cfg = TreeConfig::default()
        .with_layout(layout)
        .with_collator(collator)
        .with_key_order_check(true);
    let tree = Tree::open("cli", cfg)?;
    let page = match layout {
        PageLayout::FixedColumn => Page::fixed(1, Vec::new()),
        PageLayout::VarColumn => Page::var(1, Vec::new()),
        PageLayout::Row => Page::row(Vec::new()),
    };
    let mut cur = tree.cursor(&page)?;

    // Диагностика уже ушла в лог, стандартный хук только дублирует её.
    panic::set_hook(Box::new(|_| {}));
    let n = keys.len();
    let res = panic::catch_unwind(AssertUnwindSafe(|| {
        for i in 0..n {
            if layout.is_column() {
                cur.set_recno(recnos[i]);
            } else {
                cur.key = row_keys[i].clone();
            }
            if i == 0 {
                cur.key_order_init();
            } else {
                cur.key_order_check(dir);
            }
        }
    }));
    let _ = panic::take_hook();

    match res {
        Ok(()) => {
            println!("OK: {} key(s) in strict {} order", n, dir);
            Ok(())
        }
        Err(payload) => match payload.downcast_ref::<IntegrityFault>() {
            Some(fault) => {
                eprintln!("INTEGRITY FAULT: {}", fault);
                std::process::exit(2);
            }
            None => panic::resume_unwind(payload),
        },
    }
}
