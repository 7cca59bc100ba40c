// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::{Canned, serve};
use rust_decimal::Decimal;
use serde_json::json;
use spendwise::api::{ApiClient, Credentials, RecordService};
use spendwise::errors::TrackerError;
use spendwise::models::{Amount, ExpenseDraft, ExpenseRecord, IncomeRecord, RecordKind};
use tempfile::tempdir;

fn session_credentials() -> Credentials {
    Credentials {
        cookie: Some("token=abc".into()),
        token: None,
    }
}

#[test]
fn login_captures_cookie_and_profile() {
    let backend = serve(vec![
        Canned::json(
            200,
            r#"{"user":{"_id":"u1","fullName":"Ada Lovelace","email":"ada@example.com"},"token":"jwt-1"}"#,
        )
        .with_header("Set-Cookie", "token=abc; HttpOnly; Path=/"),
    ]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path())).unwrap();

    let outcome = client.login("ada@example.com", "secret").unwrap();
    assert_eq!(outcome.user.full_name, "Ada Lovelace");
    assert_eq!(outcome.user.id.as_deref(), Some("u1"));
    assert_eq!(outcome.credentials.cookie.as_deref(), Some("token=abc"));
    assert_eq!(outcome.credentials.token.as_deref(), Some("jwt-1"));

    let req = backend.next_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api/login");
    assert_eq!(req.json(), json!({"email": "ada@example.com", "password": "secret"}));
}

#[test]
fn list_replays_cookie_and_reads_backend_field_names() {
    let backend = serve(vec![
        Canned::json(
            200,
            r#"[{"_id":"i1","icon":"💰","source":"Salary","amount":5000,"date":"2024-01-31T00:00:00.000Z"}]"#,
        ),
        Canned::json(
            200,
            r#"[{"_id":"e1","icon":"🛒","cateory":"Groceries","amount":"42.10","date":"2024-02-02"}]"#,
        ),
    ]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path()))
        .unwrap()
        .with_credentials(session_credentials());

    let income = client.list::<IncomeRecord>().unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].id, "i1");
    assert_eq!(income[0].amount, Amount::Value(Decimal::from(5000)));
    let req = backend.next_request();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/api/income/get");
    assert_eq!(req.header("cookie"), Some("token=abc"));

    let expense = client.list::<ExpenseRecord>().unwrap();
    assert_eq!(expense[0].category, "Groceries");
    assert_eq!(expense[0].amount, Amount::Value(Decimal::new(4210, 2)));
    assert_eq!(backend.next_request().path, "/api/expense/get");
}

#[test]
fn rejected_requests_surface_backend_message() {
    let backend = serve(vec![Canned::json(401, r#"{"message":"Not authorized, no token"}"#)]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path())).unwrap();

    match client.list::<IncomeRecord>() {
        Err(TrackerError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Not authorized, no token");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[test]
fn add_posts_draft_and_returns_created_record() {
    let backend = serve(vec![Canned::json(
        201,
        r#"{"_id":"e9","icon":"🚗","category":"Fuel","amount":60,"date":"2024-04-10T00:00:00.000Z"}"#,
    )]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path()))
        .unwrap()
        .with_credentials(session_credentials());

    let draft = ExpenseDraft {
        icon: "🚗".into(),
        category: "Fuel".into(),
        amount: Decimal::from(60),
        date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
    };
    let created: ExpenseRecord = RecordService::<ExpenseRecord>::create(&client, &draft).unwrap();
    assert_eq!(created.id, "e9");

    let req = backend.next_request();
    assert_eq!(req.path, "/api/expense/add");
    let body = req.json();
    assert_eq!(body["category"], "Fuel");
    assert_eq!(body["cateory"], "Fuel");
    assert_eq!(body["date"], "2024-04-10");
    assert_eq!(body["icon"], "🚗");
}

#[test]
fn delete_targets_record_path() {
    let backend = serve(vec![Canned::json(200, r#"{"message":"Expense deleted successfully"}"#)]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path()))
        .unwrap()
        .with_credentials(session_credentials());

    client.delete::<ExpenseRecord>("e1").unwrap();
    let req = backend.next_request();
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/api/expense/e1");
}

#[test]
fn delete_rejects_path_like_ids_without_a_request() {
    let dir = tempdir().unwrap();
    let cfg = spendwise::config::Config::new(
        "http://127.0.0.1:9/api",
        std::time::Duration::from_millis(200),
        dir.path().to_path_buf(),
    )
    .without_proxy();
    let client = ApiClient::new(&cfg).unwrap();
    assert!(matches!(
        client.delete::<IncomeRecord>("../users"),
        Err(TrackerError::Validation(_))
    ));
}

#[test]
fn download_returns_raw_bytes() {
    let payload = b"PK\x03\x04fake-xlsx";
    let backend = serve(vec![Canned::bytes(payload)]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path()))
        .unwrap()
        .with_credentials(session_credentials());

    let bytes = client.download_report(RecordKind::Income).unwrap();
    assert_eq!(bytes, payload.to_vec());
    assert_eq!(backend.next_request().path, "/api/income/downloadexcel");
}

#[test]
fn change_password_sends_camel_case_body() {
    let backend = serve(vec![Canned::json(200, r#"{"message":"Password updated"}"#)]);
    let dir = tempdir().unwrap();
    let client = ApiClient::new(&backend.config(dir.path()))
        .unwrap()
        .with_credentials(session_credentials());

    client.change_password("old-secret", "new-secret").unwrap();
    let req = backend.next_request();
    assert_eq!(req.path, "/api/change-password");
    assert_eq!(
        req.json(),
        json!({"currentPassword": "old-secret", "newPassword": "new-secret"})
    );
}

#[test]
fn unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = tempdir().unwrap();
    let cfg = spendwise::config::Config::new(
        &format!("http://127.0.0.1:{}/api", port),
        std::time::Duration::from_secs(2),
        dir.path().to_path_buf(),
    )
    .without_proxy();
    let err = ApiClient::new(&cfg).unwrap().list::<IncomeRecord>().unwrap_err();
    assert!(matches!(err, TrackerError::Network(_)));
    assert!(err.is_remote());
}
