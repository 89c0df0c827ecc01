use std::net::SocketAddr;

use axum::Router;
use chrono::{FixedOffset, Utc};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::routes;
use server::state::ServerState;
use service::jobs::schedule::SchedulePolicy;

struct TestApp {
    base_url: String,
    http: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn post(&self, path: &str, body: Value) -> anyhow::Result<reqwest::Response> {
        Ok(self.http.post(self.url(path)).json(&body).send().await?)
    }

    async fn patch(&self, path: &str, body: Value) -> anyhow::Result<reqwest::Response> {
        Ok(self.http.patch(self.url(path)).json(&body).send().await?)
    }

    async fn get(&self, path: &str) -> anyhow::Result<reqwest::Response> {
        Ok(self.http.get(self.url(path)).send().await?)
    }

    async fn delete(&self, path: &str) -> anyhow::Result<reqwest::Response> {
        Ok(self.http.delete(self.url(path)).send().await?)
    }

    async fn create_client(&self, name: &str) -> anyhow::Result<i64> {
        let res = self.post("/clients", json!({ "name": name })).await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        let body: Value = res.json().await?;
        Ok(body["id"].as_i64().expect("client id"))
    }
}

fn utc_policy(enforce: bool) -> SchedulePolicy {
    SchedulePolicy {
        zone: FixedOffset::east_opt(0).expect("utc offset"),
        upcoming_default_days: 7,
        enforce_status_transitions: enforce,
    }
}

async fn start_server(policy: SchedulePolicy) -> anyhow::Result<TestApp> {
    let state = ServerState::in_memory(policy);
    let app: Router = routes::build_router(state, routes::build_cors(&[]), None);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, http: reqwest::Client::new() })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    let res = app.get("/health").await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_client_crud_and_partial_update() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;

    let res = app
        .post("/clients", json!({ "name": "Ann Lee", "email": "ann@example.com", "phone": "555-0100" }))
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["name"], "Ann Lee");
    assert!(created["createdAt"].is_string());

    let fetched: Value = app.get(&format!("/clients/{id}")).await?.json().await?;
    assert_eq!(fetched["email"], "ann@example.com");
    assert_eq!(fetched["jobs"], json!([]));

    let res = app.patch(&format!("/clients/{id}"), json!({ "phone": null, "notes": "side gate" })).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["phone"], Value::Null);
    assert_eq!(updated["notes"], "side gate");
    assert_eq!(updated["email"], "ann@example.com");
    assert_eq!(updated["name"], "Ann Lee");

    let res = app.post("/clients", json!({ "name": "   " })).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "Bad Request");

    // oversized values are rejected before reaching the varchar columns
    let res = app.post("/clients", json!({ "name": "N".repeat(256) })).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = app.post("/job-types", json!({ "name": "T".repeat(256) })).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    assert_eq!(app.delete(&format!("/clients/{id}")).await?.status(), HttpStatusCode::NO_CONTENT);
    let res = app.get(&format!("/clients/{id}")).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let err: Value = res.json().await?;
    assert_eq!(err["message"], format!("Client with ID {id} not found"));
    Ok(())
}

#[tokio::test]
async fn e2e_job_lifecycle() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    let client_id = app.create_client("Bob").await?;

    let res = app.post("/job-types", json!({ "name": "Ceiling Fan Install", "defaultPrice": 120.0 })).await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let job_type: Value = res.json().await?;

    let res = app
        .post(
            "/jobs",
            json!({
                "clientId": client_id,
                "jobTypeId": job_type["id"],
                "scheduledAt": "2024-06-15T09:30",
                "description": "Living room",
                "priceEstimate": 150
            }),
        )
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let job: Value = res.json().await?;
    let job_id = job["id"].as_i64().expect("job id");
    assert_eq!(job["status"], "scheduled");
    assert_eq!(job["client"]["name"], "Bob");
    assert_eq!(job["jobType"]["name"], "Ceiling Fan Install");
    assert_eq!(job["scheduledAt"], "2024-06-15T09:30:00Z");

    let res = app.patch(&format!("/jobs/{job_id}/status"), json!({ "status": "in_progress" })).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let moved: Value = res.json().await?;
    assert_eq!(moved["status"], "in_progress");
    assert_eq!(moved["description"], job["description"]);
    assert_eq!(moved["priceEstimate"], job["priceEstimate"]);
    assert_eq!(moved["scheduledAt"], job["scheduledAt"]);

    let res = app.patch(&format!("/jobs/{job_id}/status"), json!({ "status": "done" })).await?;
    assert!(res.status().is_client_error());

    // client listing carries jobs without repeating the client
    let clients: Value = app.get("/clients").await?.json().await?;
    let jobs = clients[0]["jobs"].as_array().expect("jobs array");
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].get("client").is_none());
    assert_eq!(jobs[0]["jobType"]["id"], job_type["id"]);

    let res = app.delete(&format!("/clients/{client_id}")).await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    assert_eq!(app.delete(&format!("/job-types/{}", job_type["id"])).await?.status(), HttpStatusCode::NO_CONTENT);
    let detached: Value = app.get(&format!("/jobs/{job_id}")).await?.json().await?;
    assert_eq!(detached["jobType"], Value::Null);

    assert_eq!(app.delete(&format!("/jobs/{job_id}")).await?.status(), HttpStatusCode::NO_CONTENT);
    assert_eq!(app.delete(&format!("/jobs/{job_id}")).await?.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(app.delete(&format!("/clients/{client_id}")).await?.status(), HttpStatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn e2e_job_for_missing_client_is_404_and_not_saved() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    let res = app.post("/jobs", json!({ "clientId": 999, "scheduledAt": "2024-06-15T09:30" })).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let jobs: Value = app.get("/jobs").await?.json().await?;
    assert_eq!(jobs, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_jobs_by_date() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    let client_id = app.create_client("Cara").await?;
    for at in ["2024-06-14T23:59:59", "2024-06-15T00:00", "2024-06-15T23:59:59.999", "2024-06-16T00:00"] {
        let res = app.post("/jobs", json!({ "clientId": client_id, "scheduledAt": at })).await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let day: Value = app.get("/jobs?date=2024-06-15").await?.json().await?;
    let times: Vec<&str> = day.as_array().expect("array").iter().filter_map(|j| j["scheduledAt"].as_str()).collect();
    assert_eq!(times, vec!["2024-06-15T00:00:00Z", "2024-06-15T23:59:59.999Z"]);

    let all: Value = app.get("/jobs").await?.json().await?;
    assert_eq!(all.as_array().map(|a| a.len()), Some(4));

    let res = app.get("/jobs?date=15-06-2024").await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_upcoming_excludes_non_scheduled() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    let client_id = app.create_client("Dee").await?;
    let in_two_days = (Utc::now() + chrono::Duration::days(2)).to_rfc3339();
    let in_twenty = (Utc::now() + chrono::Duration::days(20)).to_rfc3339();

    let keep: Value = app.post("/jobs", json!({ "clientId": client_id, "scheduledAt": in_two_days })).await?.json().await?;
    let done: Value = app.post("/jobs", json!({ "clientId": client_id, "scheduledAt": in_two_days })).await?.json().await?;
    app.patch(&format!("/jobs/{}/status", done["id"]), json!({ "status": "completed" })).await?;
    app.post("/jobs", json!({ "clientId": client_id, "scheduledAt": in_twenty })).await?;

    let upcoming: Value = app.get("/jobs/upcoming").await?.json().await?;
    let ids: Vec<i64> = upcoming.as_array().expect("array").iter().filter_map(|j| j["id"].as_i64()).collect();
    assert_eq!(ids, vec![keep["id"].as_i64().expect("id")]);

    let wide: Value = app.get("/jobs/upcoming?days=30").await?.json().await?;
    assert_eq!(wide.as_array().map(|a| a.len()), Some(2));

    // blank days falls back to the default window
    let res = app.get("/jobs/upcoming?days=").await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let blank: Value = res.json().await?;
    assert_eq!(blank, upcoming);

    let res = app.get("/jobs/upcoming?days=-1").await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "Bad Request");
    assert!(err["message"].as_str().is_some_and(|m| m.contains("days")));
    Ok(())
}

#[tokio::test]
async fn e2e_enforced_transitions_conflict() -> anyhow::Result<()> {
    let app = start_server(utc_policy(true)).await?;
    let client_id = app.create_client("Eve").await?;
    let job: Value = app.post("/jobs", json!({ "clientId": client_id, "scheduledAt": "2024-06-15" })).await?.json().await?;
    let path = format!("/jobs/{}/status", job["id"]);

    assert_eq!(app.patch(&path, json!({ "status": "completed" })).await?.status(), HttpStatusCode::OK);
    let res = app.patch(&path, json!({ "status": "scheduled" })).await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn e2e_missing_records_are_404() -> anyhow::Result<()> {
    let app = start_server(utc_policy(false)).await?;
    for path in ["/clients/41", "/job-types/41", "/jobs/41"] {
        assert_eq!(app.get(path).await?.status(), HttpStatusCode::NOT_FOUND, "GET {path}");
        assert_eq!(app.patch(path, json!({ "name": "Renamed" })).await?.status(), HttpStatusCode::NOT_FOUND, "PATCH {path}");
        assert_eq!(app.delete(path).await?.status(), HttpStatusCode::NOT_FOUND, "DELETE {path}");
    }
    Ok(())
}
