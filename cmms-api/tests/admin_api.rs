use cmms_api::orm::testing::test_rocket;
use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

#[rocket::async_test]
async fn test_registry_lists_all_entities() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/admin").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let entities: Vec<Value> = response.into_json().await.expect("registry json");

    let paths: Vec<&str> = entities.iter().filter_map(|e| e["path"].as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "Users",
            "Teams",
            "Equipment",
            "SpareParts",
            "SpareTransactions",
            "PurchaseRequests",
            "MaintenanceSchedules",
            "WorkOrders",
            "PerformanceReports",
        ]
    );

    let locked: Vec<&Value> = entities.iter().filter(|e| e["editable"] == false).collect();
    assert_eq!(locked.len(), 1);
    assert_eq!(locked[0]["name"], "SpareTransaction");
}

#[rocket::async_test]
async fn test_changelist_uses_display_strings() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    client
        .post("/api/1/Equipment")
        .json(&json!({ "name": "Chiller", "serial_number": "CH-9", "location": "Roof" }))
        .dispatch()
        .await;

    let response = client.get("/api/1/admin/Equipment").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let list: Value = response.into_json().await.expect("changelist json");
    assert_eq!(list["count"], 1);
    assert_eq!(list["rows"][0]["display"], "Chiller (CH-9) - active : Roof");
    assert_eq!(list["entity"]["name"], "Equipment");

    let users: Value = client
        .get("/api/1/admin/Users")
        .dispatch()
        .await
        .into_json()
        .await
        .expect("changelist json");
    assert_eq!(users["rows"][0]["display"], "admin (admin)");
}

#[rocket::async_test]
async fn test_unknown_admin_entity() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/admin/Invoices").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_health_status() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("status json");
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "cmms-api");
}
