//! End-to-end tests driving the REST router in memory.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use api_rest::{router, AppState};
use clinica_core::{CoreConfig, MedicationCatalog, PrescriptionService, TYPE_UNAVAILABLE};

fn test_app() -> (Router, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");

    let reference_path = tmp.path().join("medicamentos.csv");
    let mut file = std::fs::File::create(&reference_path).expect("Failed to create reference file");
    writeln!(file, "0;DIPIRONA;a;b;c;d;e;Analgésico").expect("write should succeed");
    writeln!(file, "1;DIPIRONA SODICA;a;b;c;d;e;").expect("write should succeed");
    writeln!(file, "2;IBUPROFENO;a;b;c;d;e;Anti-inflamatório").expect("write should succeed");

    let cfg = CoreConfig::new(tmp.path().to_path_buf(), reference_path.clone());
    let catalog = Arc::new(MedicationCatalog::load(&reference_path).expect("load should succeed"));
    let service =
        Arc::new(PrescriptionService::new(&cfg, catalog.clone()).expect("new should succeed"));

    (router(AppState { service, catalog }), tmp)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn create_body() -> Value {
    json!({
        "paciente_id": "p1",
        "medico_id": "m1",
        "medicamentos": [{"nome": "DIPIRONA", "dose": "500mg"}]
    })
}

#[tokio::test]
async fn post_prescription_returns_enriched_document() {
    let (app, _tmp) = test_app();

    let response = app
        .oneshot(json_request("POST", "/prescricoes", create_body()))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let doc = response_json(response).await;
    assert_eq!(doc["paciente_id"], "p1");
    assert_eq!(doc["medico_id"], "m1");
    assert!(doc["id"].is_string());
    assert!(doc["criado_em"].is_string());

    let med = &doc["medicamentos"][0];
    assert_eq!(med["dose"], "500mg");
    assert_eq!(med["informacoes_medicamento"]["nome"], "DIPIRONA");
    assert_eq!(med["informacoes_medicamento"]["tipo"], "Analgésico");
    assert!(
        med.get("nome").is_none(),
        "raw lookup name must not survive enrichment"
    );
}

#[tokio::test]
async fn post_with_unknown_medication_is_404_and_persists_nothing() {
    let (app, _tmp) = test_app();

    let body = json!({
        "paciente_id": "p1",
        "medico_id": "m1",
        "medicamentos": [{"nome": "NAOEXISTE", "dose": "10mg"}]
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/prescricoes", body))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let err = response_json(response).await;
    assert!(err["error"].as_str().unwrap().contains("NAOEXISTE"));

    let response = app
        .oneshot(get_request("/prescricoes"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([]));
}

#[tokio::test]
async fn post_with_missing_fields_is_400() {
    let (app, _tmp) = test_app();

    let body = json!({"medico_id": "m1", "medicamentos": [{"nome": "DIPIRONA"}]});
    let response = app
        .oneshot(json_request("POST", "/prescricoes", body))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let err = response_json(response).await;
    assert!(err["error"].as_str().unwrap().contains("paciente_id"));
}

#[tokio::test]
async fn get_prescription_by_id_and_error_cases() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/prescricoes", create_body()))
        .await
        .expect("request should succeed");
    let id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/prescricoes/{id}")))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["id"], id.as_str());

    let response = app
        .clone()
        .oneshot(get_request(
            "/prescricoes/00000000000000000000000000000000",
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_request("/prescricoes/not-a-uuid"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_applies_sparse_update_and_preserves_other_fields() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/prescricoes", create_body()))
        .await
        .expect("request should succeed");
    let id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/prescricoes/{id}"),
            json!({"paciente_id": "p2"}),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await["message"],
        "Prescrição atualizada com sucesso"
    );

    let response = app
        .clone()
        .oneshot(get_request(&format!("/prescricoes/{id}")))
        .await
        .expect("request should succeed");
    let doc = response_json(response).await;
    assert_eq!(doc["paciente_id"], "p2");
    assert_eq!(doc["medico_id"], "m1");
    assert_eq!(doc["medicamentos"][0]["dose"], "500mg");

    // Empty payload carries no recognized field.
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/prescricoes/{id}"),
            json!({}),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/prescricoes", create_body()))
        .await
        .expect("request should succeed");
    let id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let delete_req = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/prescricoes/{id}"))
            .body(Body::empty())
            .expect("request should build")
    };

    let response = app
        .clone()
        .oneshot(delete_req())
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await["message"],
        "Prescrição deletada com sucesso"
    );

    let response = app
        .oneshot(delete_req())
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_medications_returns_full_table_with_sentinel() {
    let (app, _tmp) = test_app();

    let response = app
        .oneshot(get_request("/medicamentos"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);

    let rows = response_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[0]["nome"], "DIPIRONA");
    assert_eq!(rows[1]["tipo"], TYPE_UNAVAILABLE);
}

#[tokio::test]
async fn search_medications_matches_fragment_in_table_order() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/medicamentos/busca?search=dipirona"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);

    let rows = response_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["nome"], "DIPIRONA");
    assert_eq!(rows[1]["nome"], "DIPIRONA SODICA");

    let response = app
        .clone()
        .oneshot(get_request("/medicamentos/busca"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A present-but-blank parameter is just as invalid as a missing one.
    let response = app
        .clone()
        .oneshot(get_request("/medicamentos/busca?search="))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_request("/medicamentos/busca?search=zzz"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_is_alive() {
    let (app, _tmp) = test_app();

    let response = app
        .oneshot(get_request("/health"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["ok"], true);
}
