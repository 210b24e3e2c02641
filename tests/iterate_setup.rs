use std::collections::HashSet;

use anyhow::{anyhow, Result};
use oorandom::Rand64;

use QuiverBT::config::TreeConfig;
use QuiverBT::page::{InsertHeadId, InsertList, InsertNode, Page, PageLayout, RowEntry, VarCell};
use QuiverBT::txn::UpdateChain;
use QuiverBT::{RowPosition, Tree, SLOT_NONE};

fn tree(layout: PageLayout) -> Result<Tree> {
    Tree::open(
        format!("iter-{layout}"),
        TreeConfig::default().with_layout(layout),
    )
}

#[test]
fn fixed_setup_last_recno_and_append_flag() -> Result<()> {
    let t = tree(PageLayout::FixedColumn)?;
    let mut page = Page::fixed(100, vec![0; 5]);
    page.set_insert_list(
        InsertHeadId::Append,
        InsertList::new(vec![InsertNode::recno(105, UpdateChain::default())]),
    );

    let mut cur = t.cursor(&page)?;
    cur.set_slot(2);
    cur.setup_iteration();
    assert_eq!(cur.last_standard_recno, 104);
    assert!(!cur.flags.iterate_append);

    let node = page
        .insert_head(InsertHeadId::Append)
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("append node"))?;
    cur.set_insert(InsertHeadId::Append, node, SLOT_NONE);
    cur.setup_iteration();
    assert_eq!(cur.recno, 105);
    assert_eq!(cur.last_standard_recno, 104);
    assert!(cur.flags.iterate_append);

    // Повторная установка на страницу сбрасывает флаг.
    cur.set_slot(0);
    cur.setup_iteration();
    assert!(!cur.flags.iterate_append);
    Ok(())
}

#[test]
fn var_setup_last_recno_skips_trailing_deleted() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let mut page = Page::var(
        1,
        vec![
            VarCell::value("a").with_rle(3),
            VarCell::value("b"),
            VarCell::deleted().with_rle(5),
        ],
    );
    page.set_insert_list(
        InsertHeadId::Slot(0),
        InsertList::new(vec![InsertNode::recno(2, UpdateChain::default())]),
    );

    let mut cur = t.cursor(&page)?;
    cur.set_slot(1);
    cur.setup_iteration();
    assert_eq!(cur.recno, 4);
    assert_eq!(cur.last_standard_recno, 4);
    assert!(!cur.flags.iterate_append);

    // Per-slot update list: не append.
    let node = page
        .insert_head(InsertHeadId::Slot(0))
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("node"))?;
    cur.set_insert(InsertHeadId::Slot(0), node, 0);
    cur.setup_iteration();
    assert!(!cur.flags.iterate_append);
    Ok(())
}

#[test]
fn column_setup_at_the_end_of_the_recno_space() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let page = Page::var(
        2,
        vec![VarCell::value("a").with_rle(u64::MAX), VarCell::value("b")],
    );
    let mut cur = t.cursor(&page)?;
    cur.set_slot(0);
    cur.setup_iteration();
    assert_eq!(cur.recno, 2);
    assert_eq!(cur.last_standard_recno, u64::MAX);

    cur.set_slot(1);
    assert_eq!(cur.recno, u64::MAX);

    let t = tree(PageLayout::FixedColumn)?;
    let page = Page::fixed(u64::MAX - 1, vec![1, 2]);
    let mut cur = t.cursor(&page)?;
    cur.set_slot(0);
    cur.setup_iteration();
    assert_eq!(cur.last_standard_recno, u64::MAX);
    Ok(())
}

#[test]
fn row_setup_maps_positions_to_logical_slots() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let mut page = Page::row(vec![
        RowEntry::new("b", "1"),
        RowEntry::new("d", "2"),
        RowEntry::new("f", "3"),
    ]);
    page.set_insert_list(
        InsertHeadId::Smallest,
        InsertList::new(vec![InsertNode::row("a", UpdateChain::default())]),
    );
    page.set_insert_list(
        InsertHeadId::Slot(1),
        InsertList::new(vec![InsertNode::row("e", UpdateChain::default())]),
    );

    let mut cur = t.cursor(&page)?;
    for s in 0..3u32 {
        cur.set_slot(s);
        cur.setup_iteration();
        assert_eq!(cur.row_iteration_slot, (s as u64 + 1) * 2);
        assert_eq!(cur.row_position(), RowPosition::OnPage(s));
    }

    let smallest = page
        .insert_head(InsertHeadId::Smallest)
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("smallest"))?;
    // Слот поиска для smallest-списка не важен (может быть и SLOT_NONE).
    for slot in [0u32, SLOT_NONE] {
        cur.set_insert(InsertHeadId::Smallest, smallest, slot);
        cur.setup_iteration();
        assert_eq!(cur.row_iteration_slot, 1);
    }

    let after_d = page
        .insert_head(InsertHeadId::Slot(1))
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("after d"))?;
    cur.set_insert(InsertHeadId::Slot(1), after_d, 1);
    cur.setup_iteration();
    assert_eq!(cur.row_iteration_slot, 5);
    assert_eq!(
        RowPosition::from_logical_slot(cur.row_iteration_slot),
        Some(RowPosition::InsertAfter(1))
    );
    Ok(())
}

#[test]
fn logical_slots_are_a_bijection() {
    let mut rng = Rand64::new(0x5107_u128);
    let mut seen = HashSet::new();

    let mut positions = vec![RowPosition::SmallestInsert];
    for s in 0..500u32 {
        positions.push(RowPosition::OnPage(s));
        positions.push(RowPosition::InsertAfter(s));
    }
    for _ in 0..200 {
        let s = rng.rand_range(500..u32::MAX as u64) as u32;
        positions.push(RowPosition::OnPage(s));
        positions.push(RowPosition::InsertAfter(s));
    }

    for p in positions {
        let n = p.logical_slot();
        // Insert-списки: нечётные, on-page: чётные.
        match p {
            RowPosition::OnPage(_) => assert_eq!(n % 2, 0),
            _ => assert_eq!(n % 2, 1),
        }
        assert_eq!(RowPosition::from_logical_slot(n), Some(p));
        if !seen.insert(n) {
            // Случайные слоты могли повториться: тогда совпадает и позиция.
            assert!(matches!(p, RowPosition::OnPage(s) | RowPosition::InsertAfter(s) if s >= 500));
        }
    }
}

#[test]
fn adjacent_logical_slots_walk_the_page_in_order() {
    // Шаг ±1 в логическом пространстве: smallest, slot0, ins0, slot1, ins1, ...
    let walk: Vec<RowPosition> = (1..=7)
        .filter_map(RowPosition::from_logical_slot)
        .collect();
    assert_eq!(
        walk,
        vec![
            RowPosition::SmallestInsert,
            RowPosition::OnPage(0),
            RowPosition::InsertAfter(0),
            RowPosition::OnPage(1),
            RowPosition::InsertAfter(1),
            RowPosition::OnPage(2),
            RowPosition::InsertAfter(2),
        ]
    );
}
