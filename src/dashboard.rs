// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Loads both record lists independently and aggregates whatever arrived.
//! A source that is still pending or that failed counts as an empty list.

use crate::aggregate::{AggregateOptions, DashboardSummary, summarize};
use crate::api::ApiClient;
use crate::errors::TrackerResult;
use crate::models::{ExpenseRecord, IncomeRecord, RecordKind};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WAIT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    Loaded(T),
    Failed(String),
}

impl<T> From<TrackerResult<T>> for FetchResult<T> {
    fn from(r: TrackerResult<T>) -> Self {
        match r {
            Ok(v) => FetchResult::Loaded(v),
            Err(e) => FetchResult::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Pending,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Loadable::Pending)
    }
}

impl<T> From<FetchResult<T>> for Loadable<T> {
    fn from(r: FetchResult<T>) -> Self {
        match r {
            FetchResult::Loaded(v) => Loadable::Loaded(v),
            FetchResult::Failed(reason) => Loadable::Failed(reason),
        }
    }
}

enum Update {
    Income(FetchResult<Vec<IncomeRecord>>),
    Expense(FetchResult<Vec<ExpenseRecord>>),
}

#[derive(Debug)]
pub struct DashboardView {
    income: Loadable<Vec<IncomeRecord>>,
    expense: Loadable<Vec<ExpenseRecord>>,
    open: bool,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            income: Loadable::Pending,
            expense: Loadable::Pending,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Both sources have answered, successfully or not.
    pub fn is_settled(&self) -> bool {
        !self.income.is_pending() && !self.expense.is_pending()
    }

    /// Returns `false` when the view is already closed and the result was dropped.
    pub fn apply_income(&mut self, result: FetchResult<Vec<IncomeRecord>>) -> bool {
        if !self.open {
            tracing::debug!("income result arrived after close; ignored");
            return false;
        }
        self.income = result.into();
        true
    }

    pub fn apply_expense(&mut self, result: FetchResult<Vec<ExpenseRecord>>) -> bool {
        if !self.open {
            tracing::debug!("expense result arrived after close; ignored");
            return false;
        }
        self.expense = result.into();
        true
    }

    fn apply(&mut self, update: Update) -> bool {
        match update {
            Update::Income(r) => self.apply_income(r),
            Update::Expense(r) => self.apply_expense(r),
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn income(&self) -> &[IncomeRecord] {
        match &self.income {
            Loadable::Loaded(v) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn expense(&self) -> &[ExpenseRecord] {
        match &self.expense {
            Loadable::Loaded(v) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn state(&self, kind: RecordKind) -> &'static str {
        let pending_or = |pending: bool, failed: bool| {
            if pending {
                "pending"
            } else if failed {
                "failed"
            } else {
                "loaded"
            }
        };
        match kind {
            RecordKind::Income => pending_or(
                self.income.is_pending(),
                matches!(self.income, Loadable::Failed(_)),
            ),
            RecordKind::Expense => pending_or(
                self.expense.is_pending(),
                matches!(self.expense, Loadable::Failed(_)),
            ),
        }
    }

    /// One line per source that failed or never answered.
    pub fn notices(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (kind, state) in [
            (RecordKind::Income, describe(&self.income)),
            (RecordKind::Expense, describe(&self.expense)),
        ] {
            if let Some(msg) = state {
                out.push(format!("{}: {}", kind, msg));
            }
        }
        out
    }

    pub fn summary(&self, opts: &AggregateOptions) -> TrackerResult<DashboardSummary> {
        summarize(self.income(), self.expense(), opts)
    }

    pub fn load(client: &ApiClient, wait: Duration) -> Self {
        let income_client = client.clone();
        let expense_client = client.clone();
        Self::load_with(
            move || income_client.list::<IncomeRecord>(),
            move || expense_client.list::<ExpenseRecord>(),
            wait,
        )
    }

    /// Runs both fetches on their own threads and collects results until
    /// both have answered or `wait` runs out. The view is closed on return,
    /// so a fetch that finishes later is discarded.
    pub fn load_with<FI, FE>(fetch_income: FI, fetch_expense: FE, wait: Duration) -> Self
    where
        FI: FnOnce() -> TrackerResult<Vec<IncomeRecord>> + Send + 'static,
        FE: FnOnce() -> TrackerResult<Vec<ExpenseRecord>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Update>();
        let income_tx = tx.clone();
        thread::spawn(move || {
            let _ = income_tx.send(Update::Income(fetch_income().into()));
        });
        thread::spawn(move || {
            let _ = tx.send(Update::Expense(fetch_expense().into()));
        });

        let deadline = Instant::now() + wait;
        let mut view = DashboardView::new();
        while !view.is_settled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(update) => {
                    view.apply(update);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        income = view.state(RecordKind::Income),
                        expense = view.state(RecordKind::Expense),
                        "dashboard rendered with partial data"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        view.close();
        view
    }
}

fn describe<T>(state: &Loadable<T>) -> Option<String> {
    match state {
        Loadable::Pending => Some("still loading; shown as empty".to_string()),
        Loadable::Failed(reason) => Some(reason.clone()),
        Loadable::Loaded(_) => None,
    }
}
