#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::{bail, ensure, Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use billdesk::bills::{
    BillClient, BillQuery, Category, NewBill, PaymentRequest, PaymentUpdate,
};
use billdesk::AppError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Requests the mock bill service received, as `(method path, body)`.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    fn record(&self, call: impl Into<String>, body: Value) {
        self.calls.lock().unwrap().push((call.into(), body));
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

fn bill(id: &str, category: &str) -> Value {
    json!({
        "_id": id,
        "title": format!("{category} bill"),
        "category": category,
        "amount": 1250,
        "location": "Mirpur-10, Dhaka",
        "description": "Monthly bill",
        "image": "https://img.example/bill.png",
        "date": "2025-01-15",
        "email": "owner@x.com"
    })
}

async fn list_bills(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    recorder.record("GET /bills", json!(query));
    let limit = query
        .get("limit")
        .and_then(|limit| limit.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let bills: Vec<Value> = ["Electricity", "Gas", "Water", "Internet", "Gas"]
        .iter()
        .enumerate()
        .map(|(index, category)| bill(&format!("b{index}"), category))
        .filter(|bill| {
            query
                .get("category")
                .map_or(true, |category| bill["category"] == category.as_str())
        })
        .take(limit)
        .collect();
    Json(Value::Array(bills))
}

async fn get_bill(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, "  Bill not found \n").into_response(),
        "broken" => Json(json!({ "_id": "broken" })).into_response(),
        _ => Json(bill(&id, "Water")).into_response(),
    }
}

async fn create_bill(State(recorder): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    recorder.record("POST /bills", body);
    StatusCode::CREATED
}

async fn pay_bill(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Json<Value> {
    recorder.record("POST /myBills", body);
    Json(json!({ "insertedId": "p1" }))
}

async fn list_payments(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let email = query.get("email").cloned().unwrap_or_default();
    Json(json!([
        {
            "_id": "p1",
            "billsId": "b1",
            "username": "alice",
            "address": "Dhaka",
            "phone": "017",
            "email": email,
            "amount": 100,
            "date": "2025-01-20"
        },
        {
            "_id": "p2",
            "billsId": "b2",
            "username": "alice",
            "address": "Dhaka",
            "phone": "017",
            "email": email,
            "amount": "12.5",
            "date": "2025-01-21"
        }
    ]))
}

async fn update_payment(
    State(recorder): State<Recorder>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    recorder.record(format!("PUT /myBills/{id}"), body);
    StatusCode::OK
}

async fn delete_payment(State(recorder): State<Recorder>, Path(id): Path<String>) -> impl IntoResponse {
    if id == "locked" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(500)).into_response();
    }
    recorder.record(format!("DELETE /myBills/{id}"), Value::Null);
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_service() -> Result<(BillClient, Recorder)> {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/bills", get(list_bills).post(create_bill))
        .route("/api/bills/:id", get(get_bill))
        .route("/api/myBills", get(list_payments).post(pay_bill))
        .route("/api/myBills/:id", put(update_payment).delete(delete_payment))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = BillClient::new(billdesk::http::client()?, &format!("http://{addr}/api"))
        .context("bill client")?;
    Ok((client, recorder))
}

#[tokio::test]
async fn lists_recent_bills_by_category() -> Result<()> {
    let (client, recorder) = spawn_service().await?;

    let all = client.list_bills(BillQuery::all(None)).await?;
    ensure!(all.len() == 5);

    let recent = client.list_bills(BillQuery::recent(None)).await?;
    ensure!(recent.len() == 5);

    let gas = client.list_bills(BillQuery::recent(Some(Category::Gas))).await?;
    ensure!(gas.len() == 2);
    ensure!(gas.iter().all(|bill| bill.category == Category::Gas));

    let queries: Vec<Value> = recorder.calls().into_iter().map(|(_, query)| query).collect();
    ensure!(queries[0] == json!({}));
    ensure!(queries[1] == json!({ "limit": "6" }));
    ensure!(queries[2] == json!({ "category": "Gas", "limit": "6" }));
    Ok(())
}

#[tokio::test]
async fn fetches_bill_details() -> Result<()> {
    let (client, _) = spawn_service().await?;

    let bill = client.get_bill("b42").await?;
    ensure!(bill.id == "b42");
    ensure!(bill.category == Category::Water);
    ensure!((bill.amount - 1250.0).abs() < f64::EPSILON);
    ensure!(bill.email.as_deref() == Some("owner@x.com"));
    Ok(())
}

#[tokio::test]
async fn missing_bill_is_not_found() -> Result<()> {
    let (client, _) = spawn_service().await?;

    let err = client.get_bill("missing").await.unwrap_err();
    ensure!(err.is_not_found());
    ensure!(matches!(
        err,
        AppError::Http { status: 404, ref message } if message == "Bill not found"
    ));
    Ok(())
}

#[tokio::test]
async fn malformed_bill_is_a_parse_error() -> Result<()> {
    let (client, _) = spawn_service().await?;

    let err = client.get_bill("broken").await.unwrap_err();
    ensure!(matches!(err, AppError::Parse(_)));
    Ok(())
}

#[tokio::test]
async fn creates_bill_with_wire_field_names() -> Result<()> {
    let (client, recorder) = spawn_service().await?;

    let new_bill = NewBill {
        title: "Gas".to_string(),
        category: Category::Gas,
        amount: 800.0,
        location: "Uttara".to_string(),
        description: "January".to_string(),
        image: "https://img.example/gas.png".to_string(),
        date: "2025-01-10".to_string(),
        email: "a@x.com".to_string(),
    };
    client.create_bill(&new_bill).await?;

    let calls = recorder.calls();
    ensure!(calls.len() == 1);
    let (call, body) = &calls[0];
    ensure!(call == "POST /bills");
    ensure!(body["category"] == "Gas");
    ensure!(body["email"] == "a@x.com");
    ensure!(body["amount"] == 800.0);
    Ok(())
}

#[tokio::test]
async fn pays_updates_and_deletes_payments() -> Result<()> {
    let (client, recorder) = spawn_service().await?;

    client
        .pay_bill(&PaymentRequest {
            bill_id: "b1".to_string(),
            username: "alice".to_string(),
            address: "Dhaka".to_string(),
            phone: "017".to_string(),
            email: "a@x.com".to_string(),
            amount: 1250.0,
            date: "2025-01-20".to_string(),
        })
        .await?;
    client
        .update_payment(
            "p1",
            &PaymentUpdate {
                amount: 900.0,
                address: "Banani".to_string(),
                phone: "018".to_string(),
                date: "2025-01-22".to_string(),
            },
        )
        .await?;
    client.delete_payment("p1").await?;

    let calls = recorder.calls();
    let names: Vec<&str> = calls.iter().map(|(call, _)| call.as_str()).collect();
    ensure!(names == ["POST /myBills", "PUT /myBills/p1", "DELETE /myBills/p1"]);
    ensure!(calls[0].1["billsId"] == "b1");
    ensure!(calls[1].1["address"] == "Banani");
    Ok(())
}

#[tokio::test]
async fn lists_payments_for_email() -> Result<()> {
    let (client, _) = spawn_service().await?;

    let payments = client.list_payments("a+b@x.com").await?;
    ensure!(payments.len() == 2);
    ensure!(payments.iter().all(|payment| payment.email == "a+b@x.com"));
    ensure!(payments[0].bill_id == "b1");
    ensure!((payments[1].amount - 12.5).abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn server_errors_are_truncated() -> Result<()> {
    let (client, recorder) = spawn_service().await?;

    let err = client.delete_payment("locked").await.unwrap_err();
    let (status, message) = match err {
        AppError::Http { status, message } => (status, message),
        other => bail!("expected an HTTP error, got {other:?}"),
    };
    ensure!(status == 500);
    ensure!(message.chars().count() == 200);
    ensure!(recorder.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = BillClient::new(billdesk::http::client()?, &format!("http://{addr}"))?;
    let err = client.list_bills(BillQuery::all(None)).await.unwrap_err();
    ensure!(matches!(err, AppError::Network(_)), "unexpected error: {err:?}");
    Ok(())
}
