use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use oorandom::Rand64;

use QuiverBT::config::TreeConfig;
use QuiverBT::cursor::{InvalidReason, Validity};
use QuiverBT::page::{InsertHeadId, InsertList, InsertNode, Page, PageLayout, RowEntry, VarCell};
use QuiverBT::txn::{ReadUncommitted, SnapshotResolver, Update, UpdateChain, VisibilityResolver};
use QuiverBT::{BtError, IntegrityFault, Tree, SLOT_NONE};

fn tree(layout: PageLayout) -> Result<Tree> {
    Tree::open(
        format!("valid-{layout}"),
        TreeConfig::default().with_layout(layout),
    )
}

/// Резолвер, считающий вызовы (и опционально падающий конфликтом).
struct CountingResolver {
    calls: Cell<usize>,
    conflict: bool,
}

impl CountingResolver {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            conflict: false,
        }
    }

    fn conflicting() -> Self {
        Self {
            calls: Cell::new(0),
            conflict: true,
        }
    }
}

impl VisibilityResolver for CountingResolver {
    fn read<'u>(&self, chain: &'u UpdateChain) -> Result<Option<&'u Update>> {
        self.calls.set(self.calls.get() + 1);
        if self.conflict {
            let id = chain.newest().map(|u| u.txn_id).unwrap_or(0);
            return Err(BtError::WriteConflict { txn_id: id }.into());
        }
        Ok(chain.newest())
    }
}

fn catch_fault<F: FnOnce()>(f: F) -> IntegrityFault {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("integrity fault expected");
    payload
        .downcast_ref::<IntegrityFault>()
        .cloned()
        .expect("panic payload must be an IntegrityFault")
}

// ---------------- fixed column ----------------

#[test]
fn fixed_valid_iff_recno_in_page_range() -> Result<()> {
    let t = tree(PageLayout::FixedColumn)?;
    let mut rng = Rand64::new(0xF1C5_u128);

    for _ in 0..64 {
        let base = rng.rand_range(1..1_000);
        let entries = rng.rand_range(0..50) as usize;
        let page = Page::fixed(base, vec![0xAB; entries]);
        let mut cur = t.cursor(&page)?;

        for _ in 0..32 {
            let recno = rng.rand_range(0..base + entries as u64 + 10);
            cur.set_recno(recno);
            let v = cur.check_valid(&ReadUncommitted)?;
            let expect = recno >= base && recno < base + entries as u64;
            assert_eq!(v.is_valid(), expect, "base={base} entries={entries} recno={recno}");
            if !expect {
                assert_eq!(v, Validity::Invalid(InvalidReason::OutOfRange));
            }
        }
    }
    Ok(())
}

#[test]
fn fixed_page_ending_at_max_recno() -> Result<()> {
    let t = tree(PageLayout::FixedColumn)?;
    let page = Page::fixed(u64::MAX - 1, vec![1, 2]);
    let mut cur = t.cursor(&page)?;

    for (recno, valid) in [
        (u64::MAX - 2, false),
        (u64::MAX - 1, true),
        (u64::MAX, true),
    ] {
        cur.set_recno(recno);
        assert_eq!(cur.check_valid(&ReadUncommitted)?.is_valid(), valid, "recno={recno}");
    }

    cur.set_slot(1);
    assert_eq!(cur.recno, u64::MAX);
    assert_eq!(cur.check_valid(&ReadUncommitted)?, Validity::OnPage);
    Ok(())
}

#[test]
fn fixed_ignores_insert_node_and_resolver() -> Result<()> {
    let t = tree(PageLayout::FixedColumn)?;
    let mut page = Page::fixed(10, vec![1, 2, 3]);
    page.set_insert_list(
        InsertHeadId::Slot(0),
        InsertList::new(vec![InsertNode::recno(
            11,
            UpdateChain::new(vec![Update::tombstone(5)]),
        )]),
    );
    let res = CountingResolver::new();
    let node = page
        .insert_head(InsertHeadId::Slot(0))
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("node"))?;

    let mut cur = t.cursor(&page)?;
    cur.set_insert(InsertHeadId::Slot(0), node, 1);
    assert_eq!(cur.recno, 11);
    assert_eq!(cur.check_valid(&res)?, Validity::OnPage);
    assert_eq!(res.calls.get(), 0);
    Ok(())
}

// ---------------- var column ----------------

#[test]
fn var_example_scenario_deleted_middle_slot() -> Result<()> {
    // 3 записи, slot 1 удалён, insert-узлов нет.
    let t = tree(PageLayout::VarColumn)?;
    let page = Page::var(
        10,
        vec![VarCell::value("a"), VarCell::deleted(), VarCell::value("c")],
    );
    let mut cur = t.cursor(&page)?;

    cur.set_slot(0);
    assert_eq!(cur.check_valid(&ReadUncommitted)?, Validity::OnPage);
    cur.set_slot(1);
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::DeletedCell)
    );
    cur.set_slot(2);
    assert_eq!(cur.check_valid(&ReadUncommitted)?, Validity::OnPage);
    assert_eq!(cur.recno, 12);
    Ok(())
}

#[test]
fn var_empty_page_is_invalid() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let page = Page::var(1, Vec::new());
    let cur = t.cursor(&page)?;
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::EmptyPage)
    );
    Ok(())
}

#[test]
fn var_insert_node_without_onpage_match_defers_to_node() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let mut page = Page::var(1, vec![VarCell::value("a"), VarCell::value("b")]);
    page.set_insert_list(
        InsertHeadId::Slot(1),
        InsertList::new(vec![InsertNode::recno(
            2,
            UpdateChain::new(vec![Update::standard(3, "B")]),
        )]),
    );
    let node = page
        .insert_head(InsertHeadId::Slot(1))
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("node"))?;

    let mut cur = t.cursor(&page)?;
    cur.set_insert(InsertHeadId::Slot(1), node, 1);
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::InsertNode)
    );

    // С on-page совпадением проверяется сама ячейка.
    cur.set_var_onpage_match(true);
    assert_eq!(cur.check_valid(&ReadUncommitted)?, Validity::OnPage);
    Ok(())
}

#[test]
fn var_onpage_match_still_sees_deleted_cell() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let mut page = Page::var(1, vec![VarCell::deleted().with_rle(4)]);
    page.set_insert_list(
        InsertHeadId::Slot(0),
        InsertList::new(vec![InsertNode::recno(3, UpdateChain::default())]),
    );
    let node = page
        .insert_head(InsertHeadId::Slot(0))
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("node"))?;

    let mut cur = t.cursor(&page)?;
    cur.set_insert(InsertHeadId::Slot(0), node, 0);
    cur.set_var_onpage_match(true);
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::DeletedCell)
    );
    Ok(())
}

#[test]
fn var_slot_out_of_bounds_is_fatal() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let page = Page::var(1, vec![VarCell::value("a")]);
    let mut cur = t.cursor(&page)?;
    cur.slot = 5;
    let fault = catch_fault(|| {
        let _ = cur.check_valid(&ReadUncommitted);
    });
    assert_eq!(fault, IntegrityFault::SlotBounds { slot: 5, entries: 1 });
    Ok(())
}

#[test]
fn var_append_node_without_slot_defers_to_node() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let mut page = Page::var(1, vec![VarCell::value("a"), VarCell::value("b")]);
    page.set_insert_list(
        InsertHeadId::Append,
        InsertList::new(vec![InsertNode::recno(
            3,
            UpdateChain::new(vec![Update::standard(4, "c")]),
        )]),
    );
    let node = page
        .insert_head(InsertHeadId::Append)
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("append node"))?;

    let mut cur = t.cursor(&page)?;
    cur.set_insert(InsertHeadId::Append, node, SLOT_NONE);
    assert_eq!(cur.recno, 3);
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::InsertNode)
    );
    Ok(())
}

#[test]
fn var_onpage_match_without_slot_is_fatal() -> Result<()> {
    let t = tree(PageLayout::VarColumn)?;
    let mut page = Page::var(1, vec![VarCell::value("a")]);
    page.set_insert_list(
        InsertHeadId::Append,
        InsertList::new(vec![InsertNode::recno(2, UpdateChain::default())]),
    );
    let node = page
        .insert_head(InsertHeadId::Append)
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("append node"))?;

    let mut cur = t.cursor(&page)?;
    cur.set_insert(InsertHeadId::Append, node, SLOT_NONE);
    cur.set_var_onpage_match(true);
    let fault = catch_fault(|| {
        let _ = cur.check_valid(&ReadUncommitted);
    });
    assert_eq!(
        fault,
        IntegrityFault::NoPosition {
            layout: PageLayout::VarColumn
        }
    );
    Ok(())
}

// ---------------- row ----------------

fn row_page() -> Page {
    Page::row(vec![
        RowEntry::new("b", "on-page-b"),
        RowEntry::new("d", "on-page-d"),
        RowEntry::new("f", "on-page-f"),
    ])
}

#[test]
fn row_without_chain_uses_on_page_value() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let page = row_page();
    let res = CountingResolver::new();
    let mut cur = t.cursor(&page)?;
    cur.set_slot(1);
    assert_eq!(cur.key, b"d");
    assert_eq!(cur.check_valid(&res)?, Validity::OnPage);
    assert_eq!(res.calls.get(), 0);
    Ok(())
}

#[test]
fn row_visible_tombstone_invalidates_and_update_wins() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let mut page = row_page();
    page.set_row_update(
        0,
        UpdateChain::new(vec![Update::tombstone(20), Update::standard(10, "b10")]),
    );
    page.set_row_update(2, UpdateChain::new(vec![Update::standard(15, "f15")]));
    let mut cur = t.cursor(&page)?;

    // Снапшот видит всё: tombstone побеждает.
    let all = SnapshotResolver::new(100, 100);
    cur.set_slot(0);
    assert_eq!(
        cur.check_valid(&all)?,
        Validity::Invalid(InvalidReason::Tombstone)
    );

    // Старый снапшот видит только txn 10: валидно, значение из обновления.
    let old = SnapshotResolver::new(100, 12);
    let v = cur.check_valid(&old)?;
    assert!(v.is_valid());
    assert_eq!(v.visible_update().and_then(|u| u.value()), Some(b"b10".as_ref()));

    // Совсем старый снапшот не видит ничего: on-page значение авторитетно.
    let ancient = SnapshotResolver::new(100, 5);
    assert_eq!(cur.check_valid(&ancient)?, Validity::OnPage);

    cur.set_slot(2);
    let v = cur.check_valid(&all)?;
    match v {
        Validity::Updated(u) => assert_eq!(u.value(), Some(b"f15".as_ref())),
        other => panic!("expected update, got {other:?}"),
    }
    Ok(())
}

#[test]
fn row_insert_node_never_consults_slot_chain() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let mut page = row_page();
    page.set_row_update(0, UpdateChain::new(vec![Update::tombstone(1)]));
    page.set_row_update(1, UpdateChain::new(vec![Update::standard(1, "x")]));
    page.set_insert_list(
        InsertHeadId::Smallest,
        InsertList::new(vec![InsertNode::row("a", UpdateChain::default())]),
    );
    page.set_insert_list(
        InsertHeadId::Slot(0),
        InsertList::new(vec![InsertNode::row("c", UpdateChain::default())]),
    );

    let res = CountingResolver::conflicting();
    let mut cur = t.cursor(&page)?;

    for (head, slot) in [(InsertHeadId::Smallest, 0u32), (InsertHeadId::Slot(0), 0)] {
        let node = page
            .insert_head(head)
            .and_then(|l| l.first())
            .ok_or_else(|| anyhow!("node"))?;
        cur.set_insert(head, node, slot);
        assert_eq!(
            cur.check_valid(&res)?,
            Validity::Invalid(InvalidReason::InsertNode)
        );
    }
    // Ни одного обращения к резолверу, хотя он бы упал.
    assert_eq!(res.calls.get(), 0);

    // Insert-узел без on-page слота тоже просто невалиден.
    let node = page
        .insert_head(InsertHeadId::Smallest)
        .and_then(|l| l.first())
        .ok_or_else(|| anyhow!("node"))?;
    cur.set_insert(InsertHeadId::Smallest, node, SLOT_NONE);
    assert_eq!(
        cur.check_valid(&res)?,
        Validity::Invalid(InvalidReason::InsertNode)
    );
    Ok(())
}

#[test]
fn row_resolver_error_propagates_unchanged() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let mut page = row_page();
    page.set_row_update(1, UpdateChain::new(vec![Update::standard(42, "v")]));
    let res = CountingResolver::conflicting();
    let mut cur = t.cursor(&page)?;
    cur.set_slot(1);

    let err = cur.check_valid(&res).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BtError>(),
        Some(&BtError::WriteConflict { txn_id: 42 })
    );
    assert_eq!(res.calls.get(), 1);

    // Prepared-обновление от SnapshotResolver: тоже как есть.
    let mut page = row_page();
    page.set_row_update(2, UpdateChain::new(vec![Update::standard(7, "p").prepared()]));
    let mut cur = t.cursor(&page)?;
    cur.set_slot(2);
    let err = cur.check_valid(&SnapshotResolver::new(100, 100)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BtError>(),
        Some(&BtError::PrepareConflict { txn_id: 7 })
    );
    Ok(())
}

#[test]
fn row_empty_page_and_bounds() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let empty = Page::row(Vec::new());
    let cur = t.cursor(&empty)?;
    assert_eq!(
        cur.check_valid(&ReadUncommitted)?,
        Validity::Invalid(InvalidReason::EmptyPage)
    );

    let page = row_page();
    let mut cur = t.cursor(&page)?;
    cur.slot = 3;
    let fault = catch_fault(|| {
        let _ = cur.check_valid(&ReadUncommitted);
    });
    assert_eq!(fault, IntegrityFault::SlotBounds { slot: 3, entries: 3 });

    // Ни слота, ни insert-узла: позиции нет вовсе.
    let mut cur = t.cursor(&page)?;
    cur.slot = SLOT_NONE;
    let fault = catch_fault(|| {
        let _ = cur.check_valid(&ReadUncommitted);
    });
    assert_eq!(fault, IntegrityFault::NoPosition { layout: PageLayout::Row });
    Ok(())
}

#[test]
fn cursor_rejects_layout_mismatch() -> Result<()> {
    let t = tree(PageLayout::Row)?;
    let page = Page::fixed(1, vec![1]);
    let err = t.cursor(&page).err().ok_or_else(|| anyhow!("must fail"))?;
    assert_eq!(
        err.downcast_ref::<BtError>(),
        Some(&BtError::LayoutMismatch {
            tree: PageLayout::Row,
            page: PageLayout::FixedColumn,
        })
    );
    Ok(())
}
