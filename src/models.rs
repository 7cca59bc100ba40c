// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{TrackerError, TrackerResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const INCOME_ICONS: [&str; 10] = ["💰", "💵", "🏦", "💼", "📈", "🎯", "🏠", "🎁", "💳", "🤑"];
pub const EXPENSE_ICONS: [&str; 10] = ["🛒", "🍕", "🚗", "🏠", "👕", "💊", "📱", "🎬", "✈️", "🎮"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    /// Path segment of the backend resource.
    pub fn resource(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    pub fn download_file_name(&self) -> &'static str {
        match self {
            RecordKind::Income => "income.xlsx",
            RecordKind::Expense => "expenses.xlsx",
        }
    }

    pub fn label_heading(&self) -> &'static str {
        match self {
            RecordKind::Income => "Source",
            RecordKind::Expense => "Category",
        }
    }

    pub fn default_icon(&self) -> &'static str {
        match self {
            RecordKind::Income => INCOME_ICONS[0],
            RecordKind::Expense => EXPENSE_ICONS[0],
        }
    }

    pub fn sign(&self) -> char {
        match self {
            RecordKind::Income => '+',
            RecordKind::Expense => '-',
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// Amount as received from the backend. A value that is not numeric is kept
/// verbatim so one bad record does not fail the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Value(Decimal),
    Unparsable(String),
}

impl Amount {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Amount::Value(d) => Some(*d),
            Amount::Unparsable(_) => None,
        }
    }

    fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Number(n) => {
                let s = n.to_string();
                Decimal::from_str(&s)
                    .or_else(|_| Decimal::from_scientific(&s))
                    .ok()
                    .or_else(|| n.as_f64().and_then(Decimal::from_f64))
                    .map(Amount::Value)
                    .unwrap_or(Amount::Unparsable(s))
            }
            serde_json::Value::String(s) => match Decimal::from_str(s.trim()) {
                Ok(d) => Amount::Value(d),
                Err(_) => Amount::Unparsable(s.clone()),
            },
            other => Amount::Unparsable(other.to_string()),
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Unparsable(String::new())
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::Value(d)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(d) => write!(f, "{}", d),
            Amount::Unparsable(raw) => write!(f, "{}", raw),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        Ok(Amount::from_json(&v))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Amount::Value(d) => Serialize::serialize(d, serializer),
            Amount::Unparsable(raw) => serializer.serialize_str(raw),
        }
    }
}

/// Parses the date shapes the backend emits: plain `YYYY-MM-DD`, RFC 3339
/// timestamps (normalised to UTC), and naive ISO timestamps.
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Common view over income and expense records.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + 'static {
    const KIND: RecordKind;

    /// Body sent to `POST /<resource>/add`.
    type Draft: Serialize + fmt::Debug + Send + Sync;

    fn id(&self) -> &str;
    fn icon(&self) -> &str;
    /// `source` for income, `category` for expense.
    fn label(&self) -> &str;
    fn amount(&self) -> &Amount;
    fn raw_date(&self) -> &str;

    fn timestamp(&self) -> TrackerResult<NaiveDateTime> {
        let raw = self.raw_date();
        if raw.trim().is_empty() {
            return Err(TrackerError::malformed(self.id(), "missing date"));
        }
        parse_record_date(raw)
            .ok_or_else(|| TrackerError::malformed(self.id(), format!("unparsable date '{}'", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, alias = "cateory")]
    pub category: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeDraft {
    pub icon: String,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub icon: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// The label goes out under both `category` and the backend's `cateory`.
impl Serialize for ExpenseDraft {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut st = serializer.serialize_struct("ExpenseDraft", 5)?;
        st.serialize_field("icon", &self.icon)?;
        st.serialize_field("category", &self.category)?;
        st.serialize_field("cateory", &self.category)?;
        st.serialize_field("amount", &self.amount)?;
        st.serialize_field("date", &self.date)?;
        st.end()
    }
}

impl Record for IncomeRecord {
    const KIND: RecordKind = RecordKind::Income;
    type Draft = IncomeDraft;

    fn id(&self) -> &str {
        &self.id
    }
    fn icon(&self) -> &str {
        &self.icon
    }
    fn label(&self) -> &str {
        &self.source
    }
    fn amount(&self) -> &Amount {
        &self.amount
    }
    fn raw_date(&self) -> &str {
        &self.date
    }
}

impl Record for ExpenseRecord {
    const KIND: RecordKind = RecordKind::Expense;
    type Draft = ExpenseDraft;

    fn id(&self) -> &str {
        &self.id
    }
    fn icon(&self) -> &str {
        &self.icon
    }
    fn label(&self) -> &str {
        &self.category
    }
    fn amount(&self) -> &Amount {
        &self.amount
    }
    fn raw_date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let rec: IncomeRecord = serde_json::from_str(
            r#"{"_id":"a1","icon":"💰","source":"Salary","amount":"1200.50","date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(rec.amount, Amount::Value(Decimal::new(120050, 2)));

        let rec: IncomeRecord = serde_json::from_str(
            r#"{"_id":"a2","source":"Gift","amount":75,"date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(rec.amount.value(), Some(Decimal::from(75)));
    }

    #[test]
    fn amount_keeps_garbage_without_failing() {
        let rec: IncomeRecord = serde_json::from_str(
            r#"{"_id":"a3","source":"Gift","amount":"abc","date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(rec.amount, Amount::Unparsable("abc".into()));
    }

    #[test]
    fn expense_accepts_legacy_label_field() {
        let rec: ExpenseRecord = serde_json::from_str(
            r#"{"_id":"e1","icon":"🛒","cateory":"Food","amount":12,"date":"2024-01-10"}"#,
        )
        .unwrap();
        assert_eq!(rec.label(), "Food");
    }

    #[test]
    fn record_dates_parse_in_backend_shapes() {
        let plain = parse_record_date("2024-01-05").unwrap();
        assert_eq!(plain.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        let stamped = parse_record_date("2024-01-05T10:30:00.000Z").unwrap();
        assert_eq!(stamped.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        let offset = parse_record_date("2024-02-01T01:00:00+02:00").unwrap();
        assert_eq!(offset.date(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        assert!(parse_record_date("").is_none());
        assert!(parse_record_date("05/01/2024").is_none());
    }

    #[test]
    fn missing_date_is_malformed() {
        let rec = IncomeRecord {
            id: "x".into(),
            icon: String::new(),
            source: "Salary".into(),
            amount: Amount::Value(Decimal::ONE),
            date: String::new(),
        };
        match rec.timestamp() {
            Err(TrackerError::MalformedRecord { id, .. }) => assert_eq!(id, "x"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
