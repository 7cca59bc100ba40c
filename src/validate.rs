// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::RegisterRequest;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::{ExpenseDraft, ExpenseRecord, IncomeDraft, IncomeRecord, Record, RecordKind};
use crate::utils::{parse_date, parse_decimal};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Raw add-record form, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub icon: Option<String>,
    pub label: String,
    pub amount: String,
    pub date: String,
}

pub fn validate_email(email: &str) -> TrackerResult<()> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(TrackerError::validation("Please enter a valid email address"))
    }
}

fn checked_fields(
    kind: RecordKind,
    form: &RecordForm,
) -> TrackerResult<(String, String, Decimal, NaiveDate)> {
    let label = form.label.trim();
    let amount_raw = form.amount.trim();
    let date_raw = form.date.trim();
    if label.is_empty() || amount_raw.is_empty() || date_raw.is_empty() {
        return Err(TrackerError::validation("All fields are required"));
    }
    let amount = parse_decimal(amount_raw)
        .map_err(|_| TrackerError::validation(format!("Amount '{}' is not a number", amount_raw)))?;
    if amount.is_sign_negative() {
        return Err(TrackerError::validation("Amount cannot be negative"));
    }
    let date = parse_date(date_raw).map_err(|_| {
        TrackerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", date_raw))
    })?;
    let icon = form
        .icon
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(kind.default_icon())
        .to_string();
    Ok((icon, label.to_string(), amount, date))
}

pub fn income_draft(form: &RecordForm) -> TrackerResult<IncomeDraft> {
    let (icon, source, amount, date) = checked_fields(RecordKind::Income, form)?;
    Ok(IncomeDraft {
        icon,
        source,
        amount,
        date,
    })
}

pub fn expense_draft(form: &RecordForm) -> TrackerResult<ExpenseDraft> {
    let (icon, category, amount, date) = checked_fields(RecordKind::Expense, form)?;
    Ok(ExpenseDraft {
        icon,
        category,
        amount,
        date,
    })
}

/// Turns a typed form into the body for `POST /<resource>/add`.
pub trait FormDraft: Record {
    fn draft_from(form: &RecordForm) -> TrackerResult<Self::Draft>;
}

impl FormDraft for IncomeRecord {
    fn draft_from(form: &RecordForm) -> TrackerResult<IncomeDraft> {
        income_draft(form)
    }
}

impl FormDraft for ExpenseRecord {
    fn draft_from(form: &RecordForm) -> TrackerResult<ExpenseDraft> {
        expense_draft(form)
    }
}

pub fn validate_login(email: &str, password: &str) -> TrackerResult<()> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(TrackerError::validation("Please enter the password"));
    }
    Ok(())
}

pub fn register_request(
    full_name: &str,
    email: &str,
    password: &str,
) -> TrackerResult<RegisterRequest> {
    if full_name.trim().is_empty() {
        return Err(TrackerError::validation("Please enter your name"));
    }
    validate_email(email)?;
    if password.is_empty() {
        return Err(TrackerError::validation("Please enter the password"));
    }
    Ok(RegisterRequest {
        full_name: full_name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        profile_image_url: None,
    })
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> TrackerResult<()> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(TrackerError::validation("All fields required"));
    }
    if new != confirm {
        return Err(TrackerError::validation("New passwords do not match"));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(TrackerError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
