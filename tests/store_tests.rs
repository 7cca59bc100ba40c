// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise::api::RecordService;
use spendwise::errors::{TrackerError, TrackerResult};
use spendwise::models::{Amount, ExpenseDraft, ExpenseRecord};
use spendwise::store::TransactionStore;

/// In-memory backend that hands out sequential ids.
#[derive(Default)]
struct FakeExpenses {
    rows: RefCell<Vec<ExpenseRecord>>,
    next_id: RefCell<u32>,
    fail: bool,
}

impl FakeExpenses {
    fn seeded(rows: Vec<ExpenseRecord>) -> Self {
        Self {
            rows: RefCell::new(rows),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn offline(&self) -> TrackerResult<()> {
        if self.fail {
            Err(TrackerError::Api {
                status: 500,
                message: "Server error".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl RecordService<ExpenseRecord> for FakeExpenses {
    fn fetch_all(&self) -> TrackerResult<Vec<ExpenseRecord>> {
        self.offline()?;
        Ok(self.rows.borrow().clone())
    }

    fn create(&self, draft: &ExpenseDraft) -> TrackerResult<ExpenseRecord> {
        self.offline()?;
        let mut n = self.next_id.borrow_mut();
        *n += 1;
        let rec = ExpenseRecord {
            id: format!("new{}", n),
            icon: draft.icon.clone(),
            category: draft.category.clone(),
            amount: Amount::Value(draft.amount),
            date: draft.date.to_string(),
        };
        self.rows.borrow_mut().insert(0, rec.clone());
        Ok(rec)
    }

    fn remove(&self, id: &str) -> TrackerResult<()> {
        self.offline()?;
        self.rows.borrow_mut().retain(|r| r.id != id);
        Ok(())
    }
}

fn row(id: &str, amount: i64) -> ExpenseRecord {
    ExpenseRecord {
        id: id.into(),
        icon: "🛒".into(),
        category: "Groceries".into(),
        amount: Amount::Value(Decimal::from(amount)),
        date: "2024-03-01".into(),
    }
}

fn draft(amount: i64) -> ExpenseDraft {
    ExpenseDraft {
        icon: "🍕".into(),
        category: "Dining".into(),
        amount: Decimal::from(amount),
        date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
    }
}

#[test]
fn refresh_replaces_the_whole_list() {
    let backend = FakeExpenses::seeded(vec![row("a", 10), row("b", 20)]);
    let mut store = TransactionStore::from_records(vec![row("stale", 99)]);
    assert_eq!(store.refresh(&backend).unwrap(), 2);
    let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(store.total(), Decimal::from(30));
}

#[test]
fn add_prepends_the_confirmed_record() {
    let backend = FakeExpenses::seeded(vec![]);
    let mut store = TransactionStore::from_records(vec![row("a", 10)]);
    let created = store.add(&backend, &draft(15)).unwrap().clone();

    assert_eq!(created.id, "new1");
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].id, "new1");
    assert_eq!(store.records()[1].id, "a");
    assert_eq!(store.total(), Decimal::from(25));
}

#[test]
fn delete_removes_exactly_one_entry_and_updates_total() {
    let seeded = vec![row("a", 10), row("b", 20), row("c", 30)];
    let backend = FakeExpenses::seeded(seeded.clone());
    let mut store = TransactionStore::from_records(seeded);

    let removed = store.delete(&backend, "b").unwrap();
    assert_eq!(removed.id, "b");
    assert_eq!(store.len(), 2);
    assert!(store.records().iter().all(|r| r.id != "b"));
    assert_eq!(store.total(), Decimal::from(40));
    assert_eq!(backend.rows.borrow().len(), 2);
}

#[test]
fn delete_of_duplicate_ids_drops_only_the_first() {
    let seeded = vec![row("dup", 10), row("dup", 20)];
    let backend = FakeExpenses::seeded(seeded.clone());
    let mut store = TransactionStore::from_records(seeded);
    store.delete(&backend, "dup").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.total(), Decimal::from(20));
}

#[test]
fn backend_failure_leaves_the_list_untouched() {
    let backend = FakeExpenses::failing();
    let mut store = TransactionStore::from_records(vec![row("a", 10)]);

    let err = store.add(&backend, &draft(5)).unwrap_err();
    assert!(err.is_remote());
    let err = store.delete(&backend, "a").unwrap_err();
    assert!(err.is_remote());

    assert_eq!(store.len(), 1);
    assert_eq!(store.total(), Decimal::from(10));
}

#[test]
fn delete_of_unknown_local_id_is_not_found() {
    let backend = FakeExpenses::seeded(vec![]);
    let mut store = TransactionStore::from_records(vec![row("a", 10)]);
    assert!(matches!(
        store.delete(&backend, "zzz"),
        Err(TrackerError::NotFound(_))
    ));
    assert_eq!(store.len(), 1);
}
