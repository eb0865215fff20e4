mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn contact_crud_roundtrip() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "contacts-crud").await?;

    // Create: server generates the id, stamps lastContact, defaults value
    let created = client
        .post(format!("{}/contacts", server.base_url))
        .header("x-auth-token", &token)
        .json(&json!({
            "name": "Grace Hopper",
            "email": "grace@navy.mil",
            "position": "Rear Admiral",
            "tags": ["vip"],
        }))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let contact = created.json::<Value>().await?;
    let id = contact["id"].as_str().unwrap().to_string();
    assert_eq!(contact["status"], "prospect");
    assert_eq!(contact["value"], 0);
    assert!(contact["lastContact"].as_str().is_some());

    // Get one
    let fetched = client
        .get(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .send()
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);

    // Full-replace update: omitting email/position nulls them
    let updated = client
        .put(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .json(&json!({ "name": "Grace Hopper", "status": "active", "value": 5000 }))
        .send()
        .await?;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = updated.json::<Value>().await?;
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["value"], 5000);
    assert!(updated["email"].is_null());
    assert!(updated["position"].is_null());

    // Delete, then 404 on re-fetch
    let deleted = client
        .delete(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .get(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .send()
        .await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_without_name_is_rejected() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "contacts-validation").await?;

    let res = client
        .post(format!("{}/contacts", server.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "email": "anonymous@example.test" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn search_filters_by_substring_case_insensitively() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "contacts-search").await?;

    for name in ["Alan Turing", "Grace Hopper", "Alonzo Church"] {
        client
            .post(format!("{}/contacts", server.base_url))
            .header("x-auth-token", &token)
            .json(&json!({ "name": name }))
            .send()
            .await?;
    }

    let res = client
        .get(format!("{}/contacts?search=alo", server.base_url))
        .header("x-auth-token", &token)
        .send()
        .await?;
    let contacts = res.json::<Vec<Value>>().await?;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["name"], "Alonzo Church");
    Ok(())
}

#[tokio::test]
async fn tenants_cannot_see_or_touch_each_others_contacts() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token_a, _) = common::register_tenant(server, &client, "tenant-a").await?;
    let (token_b, _) = common::register_tenant(server, &client, "tenant-b").await?;

    let created = client
        .post(format!("{}/contacts", server.base_url))
        .header("x-auth-token", &token_a)
        .json(&json!({ "name": "Secret Contact" }))
        .send()
        .await?;
    let id = created.json::<Value>().await?["id"].as_str().unwrap().to_string();

    // Tenant B holds a valid id from another tenant; every operation 404s
    let get = client
        .get(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token_b)
        .send()
        .await?;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let update = client
        .put(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token_b)
        .json(&json!({ "name": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = client
        .delete(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token_b)
        .send()
        .await?;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    // And B's listing never includes A's row
    let list = client
        .get(format!("{}/contacts", server.base_url))
        .header("x-auth-token", &token_b)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(list.iter().all(|c| c["id"] != id.as_str()));

    // The row is untouched for its owner
    let still_there = client
        .get(format!("{}/contacts/{}", server.base_url, id))
        .header("x-auth-token", &token_a)
        .send()
        .await?;
    assert_eq!(still_there.status(), StatusCode::OK);
    Ok(())
}
