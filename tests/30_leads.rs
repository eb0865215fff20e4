mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn pipeline_groups_follow_the_fixed_stage_sequence() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "pipeline").await?;

    for (title, stage, value, probability) in [
        ("Big deal", "negotiation", 75000, 70),
        ("Small deal", "proposal", 5000, 50),
    ] {
        let res = client
            .post(format!("{}/leads", server.base_url))
            .header("x-auth-token", &token)
            .json(&json!({
                "title": title,
                "stage": stage,
                "value": value,
                "probability": probability,
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let rows = client
        .get(format!("{}/leads/stats/pipeline", server.base_url))
        .header("x-auth-token", &token)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;

    assert_eq!(rows.len(), 2);
    // proposal precedes negotiation in the stage sequence
    assert_eq!(rows[0]["stage"], "proposal");
    assert_eq!(rows[0]["count"], 1);
    assert_eq!(rows[0]["totalValue"], 5000);
    assert_eq!(rows[0]["avgProbability"], 50.0);
    assert_eq!(rows[1]["stage"], "negotiation");
    assert_eq!(rows[1]["count"], 1);
    assert_eq!(rows[1]["totalValue"], 75000);
    assert_eq!(rows[1]["avgProbability"], 70.0);
    Ok(())
}

#[tokio::test]
async fn probability_is_clamped_on_create_and_update() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "clamp").await?;

    let created = client
        .post(format!("{}/leads", server.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "title": "Overconfident", "probability": 150 }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(created["probability"], 100);
    let id = created["id"].as_str().unwrap();

    let updated = client
        .put(format!("{}/leads/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .json(&json!({ "title": "Overconfident", "probability": -10 }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(updated["probability"], 0);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_omitted_fields_with_defaults() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "leads-replace").await?;

    let created = client
        .post(format!("{}/leads", server.base_url))
        .header("x-auth-token", &token)
        .json(&json!({
            "title": "Full lead",
            "companyName": "Acme",
            "stage": "qualified",
            "value": 1234,
            "source": "referral",
        }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap();

    // Omit everything except the title: full-replace semantics
    let updated = client
        .put(format!("{}/leads/{}", server.base_url, id))
        .header("x-auth-token", &token)
        .json(&json!({ "title": "Full lead" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(updated["companyName"].is_null());
    assert!(updated["source"].is_null());
    assert_eq!(updated["stage"], "lead");
    assert_eq!(updated["value"], 0);
    Ok(())
}

#[tokio::test]
async fn stage_filter_limits_listing() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_tenant(server, &client, "leads-filter").await?;

    for (title, stage) in [("A", "lead"), ("B", "proposal"), ("C", "proposal")] {
        client
            .post(format!("{}/leads", server.base_url))
            .header("x-auth-token", &token)
            .json(&json!({ "title": title, "stage": stage }))
            .send()
            .await?;
    }

    let rows = client
        .get(format!("{}/leads?stage=proposal", server.base_url))
        .header("x-auth-token", &token)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|l| l["stage"] == "proposal"));
    Ok(())
}
