// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::compute_total;
use crate::api::RecordService;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::Record;
use rust_decimal::Decimal;

/// Ordered in-memory list of one record kind, newest additions first.
/// Every mutation builds a new list and swaps it in.
#[derive(Debug, Clone)]
pub struct TransactionStore<R: Record> {
    records: Vec<R>,
}

impl<R: Record> Default for TransactionStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> TransactionStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> Decimal {
        compute_total(&self.records)
    }

    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records = records;
    }

    pub fn refresh<S: RecordService<R>>(&mut self, service: &S) -> TrackerResult<usize> {
        let fresh = service.fetch_all()?;
        self.replace_all(fresh);
        Ok(self.records.len())
    }

    /// Sends the draft and prepends the record the backend confirmed.
    pub fn add<S: RecordService<R>>(&mut self, service: &S, draft: &R::Draft) -> TrackerResult<&R> {
        let created = service.create(draft)?;
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(created);
        next.extend(self.records.iter().cloned());
        self.records = next;
        Ok(&self.records[0])
    }

    /// Deletes on the backend, then drops exactly one local entry with `id`.
    pub fn delete<S: RecordService<R>>(&mut self, service: &S, id: &str) -> TrackerResult<R> {
        service.remove(id)?;
        let pos = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| TrackerError::NotFound(format!("{} '{}'", R::KIND, id)))?;
        let mut next = self.records.clone();
        let removed = next.remove(pos);
        self.records = next;
        Ok(removed)
    }
}
