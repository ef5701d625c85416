mod common;
mod http_helpers;

use axum::http::StatusCode;
use common::{TestApp, read_json, test_app};
use http_helpers::{authed_json_request, authed_request, json_request};
use serde_json::json;
use tower::ServiceExt;
use trattoria_api::model::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};
use trattoria_api::store::RestaurantStore;
use trattoria_authz::Role;

async fn create_order(test: &TestApp, token: &str) -> i64 {
    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("POST", "/v1/orders", token, json!({})))
        .await
        .expect("order");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"].as_i64().expect("order id")
}

async fn add_item(
    test: &TestApp,
    token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    test.app
        .clone()
        .oneshot(authed_json_request("POST", "/v1/order-items", token, body))
        .await
        .expect("order item")
}

#[tokio::test]
async fn order_list_fails_whole_when_any_order_is_foreign() {
    let test = test_app();
    let (ana, ana_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, bruno_token) = test.user_with_token("bruno@example.com", Role::Client).await;
    create_order(&test, &ana_token).await;
    create_order(&test, &bruno_token).await;

    let response = test
        .app
        .clone()
        .oneshot(authed_request("GET", "/v1/orders", &ana_token))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/v1/orders?customer={ana}");
    let response = test
        .app
        .clone()
        .oneshot(authed_request("GET", &uri, &ana_token))
        .await
        .expect("own list");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["total"], 1);

    // An empty result set passes even for a guest.
    let response = test
        .app
        .clone()
        .oneshot(http_helpers::get("/v1/orders?customer=12345"))
        .await
        .expect("empty list");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_records_are_404_before_authorization() {
    let test = test_app();
    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let response = test
        .app
        .clone()
        .oneshot(authed_request("GET", "/v1/orders/999", &token))
        .await
        .expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["message"], "order not found");

    let (_, bruno_token) = test.user_with_token("bruno@example.com", Role::Client).await;
    let order = create_order(&test, &bruno_token).await;
    let uri = format!("/v1/orders/{order}");
    let response = test
        .app
        .oneshot(authed_request("GET", &uri, &token))
        .await
        .expect("foreign");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_guests_quote_carts() {
    let test = test_app();
    let dish = test.dish("Margherita", 850).await;
    let cart = json!({"items": [{"dish": dish.id, "quantity": 2}]});

    let response = test
        .app
        .clone()
        .oneshot(json_request("POST", "/v1/cart/quote", cart.clone()))
        .await
        .expect("guest quote");
    assert_eq!(response.status(), StatusCode::OK);
    let quote = read_json(response).await;
    assert_eq!(quote["total_cents"], 1700);
    assert_eq!(quote["lines"][0]["name"], "Margherita");

    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("POST", "/v1/cart/quote", &token, cart))
        .await
        .expect("client quote");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .oneshot(json_request(
            "POST",
            "/v1/cart/quote",
            json!({"items": [{"dish": 404, "quantity": 1}]}),
        ))
        .await
        .expect("unknown dish");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn managers_update_any_order_admins_only_read() {
    let test = test_app();
    let (_, client_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, manager_token) = test.user_with_token("chef@example.com", Role::Manager).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let order = create_order(&test, &client_token).await;
    let uri = format!("/v1/orders/{order}");
    let confirm = json!({"status_id": 2});

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("PATCH", &uri, &client_token, confirm.clone()))
        .await
        .expect("client patch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("PATCH", &uri, &admin_token, confirm.clone()))
        .await
        .expect("admin patch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .clone()
        .oneshot(authed_request("GET", &uri, &admin_token))
        .await
        .expect("admin read");
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("PATCH", &uri, &manager_token, confirm))
        .await
        .expect("manager patch");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status_id"], 2);

    // Managers inherit client rules, so a foreign order is not readable.
    let response = test
        .app
        .oneshot(authed_request("GET", &uri, &manager_token))
        .await
        .expect("manager read");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn items_go_into_the_callers_active_order() {
    let test = test_app();
    let carbonara = test.dish("Carbonara", 1250).await;
    let (_, ana_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, bruno_token) = test.user_with_token("bruno@example.com", Role::Client).await;
    let order = create_order(&test, &ana_token).await;
    let foreign = create_order(&test, &bruno_token).await;

    let response = add_item(&test, &ana_token, json!({"dish": carbonara.id, "quantity": 2})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = read_json(response).await;
    assert_eq!(item["order_id"], order);
    assert_eq!(item["price_cents"], 2500);
    let item_id = item["id"].as_i64().expect("item id");

    let response = add_item(
        &test,
        &ana_token,
        json!({"order": foreign, "dish": carbonara.id, "quantity": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = add_item(&test, &ana_token, json!({"dish": carbonara.id, "quantity": 0})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/v1/order-items/{item_id}");
    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("PATCH", &uri, &ana_token, json!({"quantity": 3})))
        .await
        .expect("patch item");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["price_cents"], 3750);

    let stored = test.store.get_order(order).await.expect("order");
    assert_eq!(stored.total_cents, 3750);

    let response = test
        .app
        .oneshot(authed_request("GET", &uri, &bruno_token))
        .await
        .expect("foreign item");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn confirmed_order_is_no_longer_editable_by_its_customer() {
    let test = test_app();
    let dish = test.dish("Ribollita", 900).await;
    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, manager_token) = test.user_with_token("chef@example.com", Role::Manager).await;
    let order = create_order(&test, &token).await;
    let response = add_item(&test, &token, json!({"dish": dish.id, "quantity": 1})).await;
    let item_id = read_json(response).await["id"].as_i64().expect("item id");

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            &format!("/v1/orders/{order}"),
            &manager_token,
            json!({"status_id": 2}),
        ))
        .await
        .expect("confirm");
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .oneshot(authed_request(
            "DELETE",
            &format!("/v1/order-items/{item_id}"),
            &token,
        ))
        .await
        .expect("delete item");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_cannot_add_order_items() {
    let test = test_app();
    let dish = test.dish("Panna cotta", 600).await;
    let (_, client_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let order = create_order(&test, &client_token).await;

    let response = add_item(
        &test,
        &admin_token,
        json!({"order": order, "dish": dish.id, "quantity": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins hold no order create rule either.
    let response = test
        .app
        .oneshot(authed_json_request("POST", "/v1/orders", &admin_token, json!({})))
        .await
        .expect("admin order");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn menu_is_managed_by_admins_only() {
    let test = test_app();
    let (_, client_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, manager_token) = test.user_with_token("chef@example.com", Role::Manager).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let dish = json!({"name": "Ossobuco", "price_cents": 2200});

    for token in [&client_token, &manager_token] {
        let response = test
            .app
            .clone()
            .oneshot(authed_json_request("POST", "/v1/dishes", token, dish.clone()))
            .await
            .expect("dish");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("POST", "/v1/dishes", &admin_token, dish))
        .await
        .expect("admin dish");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["available"], true);
    let uri = format!("/v1/dishes/{}", created["id"]);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            &uri,
            &admin_token,
            json!({"price_cents": 2400}),
        ))
        .await
        .expect("admin patch");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["price_cents"], 2400);

    let response = test
        .app
        .oneshot(authed_request("DELETE", &uri, &client_token))
        .await
        .expect("client delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reviews_are_written_as_the_caller() {
    let test = test_app();
    let dish = test.dish("Cacio e pepe", 1100).await;
    let (ana, ana_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (bruno, _) = test.user_with_token("bruno@example.com", Role::Client).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reviews",
            &ana_token,
            json!({"dish": dish.id, "rating": 5, "comment": "perfetto"}),
        ))
        .await
        .expect("review");
    assert_eq!(response.status(), StatusCode::CREATED);
    let review = read_json(response).await;
    assert_eq!(review["user_id"], ana);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reviews",
            &ana_token,
            json!({"user": bruno, "dish": dish.id, "rating": 1}),
        ))
        .await
        .expect("forged review");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reviews",
            &ana_token,
            json!({"dish": dish.id, "rating": 6}),
        ))
        .await
        .expect("bad rating");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/v1/reviews/{}", review["id"]);
    let response = test
        .app
        .clone()
        .oneshot(authed_request("DELETE", &uri, &ana_token))
        .await
        .expect("author delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .oneshot(authed_request("DELETE", &uri, &admin_token))
        .await
        .expect("admin delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reservations_respect_capacity_and_ownership() {
    let test = test_app();
    let table = test.table(7, 4).await;
    let (ana, ana_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (bruno, _) = test.user_with_token("bruno@example.com", Role::Client).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let at = "2026-11-20T19:30:00Z";

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reservations",
            &ana_token,
            json!({"table": table.id, "reserved_at": at, "guests": 6}),
        ))
        .await
        .expect("too many guests");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reservations",
            &ana_token,
            json!({"customer": bruno, "table": table.id, "reserved_at": at, "guests": 2}),
        ))
        .await
        .expect("on behalf of another");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reservations",
            &ana_token,
            json!({"table": table.id, "reserved_at": at, "guests": 3}),
        ))
        .await
        .expect("reservation");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json(response).await["customer_id"], ana);

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/reservations",
            &admin_token,
            json!({"table": table.id, "reserved_at": at, "guests": 2}),
        ))
        .await
        .expect("double booking");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Clients hold no reservation read rule; admins read all.
    let response = test
        .app
        .clone()
        .oneshot(authed_request("GET", "/v1/reservations", &ana_token))
        .await
        .expect("client list");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .oneshot(authed_request("GET", "/v1/reservations", &admin_token))
        .await
        .expect("admin list");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["total"], 1);
}

#[tokio::test]
async fn deleting_an_order_removes_its_items() {
    let test = test_app();
    let dish = test.dish("Tiramisù", 700).await;
    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let order = create_order(&test, &token).await;
    for _ in 0..2 {
        let response = add_item(&test, &token, json!({"dish": dish.id, "quantity": 1})).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    assert_eq!(
        test.store
            .list_order_items(Some(order))
            .await
            .expect("items")
            .len(),
        2
    );

    let response = test
        .app
        .oneshot(authed_request("DELETE", &format!("/v1/orders/{order}"), &token))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(
        test.store
            .list_order_items(Some(order))
            .await
            .expect("items")
            .is_empty()
    );
}

#[tokio::test]
async fn admins_promote_users() {
    let test = test_app();
    let (ana, ana_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let uri = format!("/v1/users/{ana}");

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request("PATCH", &uri, &ana_token, json!({"role": "admin"})))
        .await
        .expect("self promote");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test
        .app
        .oneshot(authed_json_request("PATCH", &uri, &admin_token, json!({"role": "manager"})))
        .await
        .expect("promote");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["role"], "manager");
}

#[tokio::test]
async fn demotion_applies_to_existing_tokens() {
    let test = test_app();
    let (_, client_token) = test.user_with_token("ana@example.com", Role::Client).await;
    let (chef, manager_token) = test.user_with_token("chef@example.com", Role::Manager).await;
    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let order = create_order(&test, &client_token).await;
    let uri = format!("/v1/orders/{order}");

    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            &format!("/v1/users/{chef}"),
            &admin_token,
            json!({"role": "client"}),
        ))
        .await
        .expect("demote");
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .oneshot(authed_json_request(
            "PATCH",
            &uri,
            &manager_token,
            json!({"status_id": 2}),
        ))
        .await
        .expect("stale manager patch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn prices_and_quantities_stay_in_range() {
    let test = test_app();
    let banquet = test.dish("Banchetto", i64::MAX / 2 + 1).await;
    let focaccia = test.dish("Focaccia", 400).await;

    for cart in [
        json!({"items": [{"dish": banquet.id, "quantity": 2}]}),
        json!({"items": [
            {"dish": banquet.id, "quantity": 1},
            {"dish": banquet.id, "quantity": 1}
        ]}),
        json!({"items": [{"dish": focaccia.id, "quantity": MAX_LINE_QUANTITY + 1}]}),
    ] {
        let response = test
            .app
            .clone()
            .oneshot(json_request("POST", "/v1/cart/quote", cart))
            .await
            .expect("quote");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "validation_error");
    }

    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let order = create_order(&test, &token).await;
    let response = add_item(&test, &token, json!({"dish": banquet.id, "quantity": 2})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = add_item(
        &test,
        &token,
        json!({"dish": focaccia.id, "quantity": MAX_LINE_QUANTITY + 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let total = test.store.get_order(order).await.expect("order").total_cents;
    assert_eq!(total, 0);

    let (_, admin_token) = test.user_with_token("root@example.com", Role::Admin).await;
    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/dishes",
            &admin_token,
            json!({"name": "Tartufo", "price_cents": MAX_PRICE_CENTS + 1}),
        ))
        .await
        .expect("overpriced dish");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/v1/dishes/{}", focaccia.id);
    let response = test
        .app
        .oneshot(authed_json_request(
            "PATCH",
            &uri,
            &admin_token,
            json!({"price_cents": MAX_PRICE_CENTS + 1}),
        ))
        .await
        .expect("overpriced patch");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn addresses_have_no_delete_route() {
    let test = test_app();
    let (_, token) = test.user_with_token("ana@example.com", Role::Client).await;
    let response = test
        .app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/v1/addresses",
            &token,
            json!({"street": "Via Zamboni 3", "city": "Bologna", "postal_code": "40126"}),
        ))
        .await
        .expect("address");
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!("/v1/addresses/{}", read_json(response).await["id"]);

    let response = test
        .app
        .oneshot(authed_request("DELETE", &uri, &token))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
