//! End-to-end checks of the REST router against mocked upstream systems.

use api_rest::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Datelike, Utc};
use gateway_core::constants::{OID_HDID, OID_PHN};
use gateway_core::GatewayConfig;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";
const AUDIENCE: &str = "health-gateway";
const GUARDIAN: &str = "P6FFO433A5WPMVTGM7T4ZVWBKCSVNAYGTWTU3J2LWMGUMERKI72A";
const GUARDIAN_PHN: &str = "9735353315";
const CHILD: &str = "CHILDHDID0000000000000000000000000000001";
const CHILD_PHN: &str = "9879455523";

struct Harness {
    router: Router,
    upstream: MockServer,
    _data: tempfile::TempDir,
}

fn registry_reply(hdid: &str, phn: &str, given: &str, family: &str, birth: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <HCIM_IN_GetDemographicsResponse xmlns="urn:hl7-org:v3">
      <controlActProcess>
        <queryAck><queryResponseCode code="BCHCIM.GD.0.0013"/></queryAck>
        <subject>
          <target>
            <id root="{OID_PHN}" extension="{phn}"/>
            <identifiedPerson>
              <id root="{OID_HDID}" extension="{hdid}"/>
              <name use="L"><given>{given}</given><family>{family}</family></name>
              <birthTime value="{birth}"/>
              <administrativeGenderCode code="F"/>
            </identifiedPerson>
          </target>
        </subject>
      </controlActProcess>
    </HCIM_IN_GetDemographicsResponse>
  </soap:Body>
</soap:Envelope>"#
    )
}

fn child_birth_year() -> i32 {
    Utc::now().year() - 5
}

async fn harness() -> Harness {
    let upstream = MockServer::start_async().await;
    let data = tempfile::tempdir().unwrap();

    upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path("/soap")
                .body_contains(format!(r#"extension="{GUARDIAN}""#));
            then.status(200).body(registry_reply(
                GUARDIAN,
                GUARDIAN_PHN,
                "SIMONE",
                "POWELL",
                "19800102",
            ));
        })
        .await;
    for identifier in [CHILD_PHN, CHILD] {
        upstream
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/soap")
                    .body_contains(format!(r#"extension="{identifier}""#));
                then.status(200).body(registry_reply(
                    CHILD,
                    CHILD_PHN,
                    "ROBIN",
                    "POWELL",
                    &format!("{}0101", child_birth_year()),
                ));
            })
            .await;
    }

    let mut env = HashMap::new();
    env.insert("AUTH_JWT_SECRET", SECRET.to_string());
    env.insert("AUTH_AUDIENCE", AUDIENCE.to_string());
    env.insert("CLIENT_REGISTRY_URL", format!("{}/soap", upstream.base_url()));
    env.insert("PHSA_BASE_URL", upstream.base_url());
    env.insert("BCMAILPLUS_BASE_URL", upstream.base_url());
    env.insert("GATEWAY_DATA_DIR", data.path().display().to_string());

    let config = GatewayConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
    let state = AppState::from_config(&config).unwrap();

    Harness {
        router: build_router(state),
        upstream,
        _data: data,
    }
}

fn token_for(hdid: &str) -> String {
    let claims = json!({
        "hdid": hdid,
        "aud": AUDIENCE,
        "exp": Utc::now().timestamp() + 600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_needs_no_token() {
    let h = harness().await;
    let (status, body) = send(&h.router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn missing_token_is_problem_details() {
    let h = harness().await;
    let request = Request::builder()
        .uri(format!("/UserProfile/{GUARDIAN}"))
        .body(Body::empty())
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn other_patients_profile_is_forbidden() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let (status, body) = send(
        &h.router,
        Method::GET,
        &format!("/UserProfile/{CHILD}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn lowercased_own_hdid_is_forbidden() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let (status, _) = send(
        &h.router,
        Method::GET,
        &format!("/UserProfile/{}", GUARDIAN.to_ascii_lowercase()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_registration_and_preferences() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let uri = format!("/UserProfile/{GUARDIAN}");

    let (_, body) = send(&h.router, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(body["resultStatus"], "Success");
    assert!(body["resourcePayload"].is_null());

    let (status, body) = send(
        &h.router,
        Method::POST,
        &uri,
        Some(&token),
        Some(json!({"acceptedTermsOfService": true, "email": " simone@example.com "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultStatus"], "Success");
    assert_eq!(body["resourcePayload"]["email"], "simone@example.com");

    let (_, body) = send(
        &h.router,
        Method::PUT,
        &format!("{uri}/preference"),
        Some(&token),
        Some(json!({"tutorialSeen": "true"})),
    )
    .await;
    assert_eq!(body["resourcePayload"]["tutorialSeen"], "true");

    let (_, body) = send(&h.router, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(body["resourcePayload"]["hdid"], GUARDIAN);
    assert_eq!(body["resourcePayload"]["preferences"]["tutorialSeen"], "true");
}

#[tokio::test]
async fn public_vaccine_status_requires_headers() {
    let h = harness().await;
    let request = Request::builder()
        .uri("/PublicVaccineStatus")
        .header("phn", CHILD_PHN)
        .body(Body::empty())
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn immunizations_forward_the_caller_token() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let phsa = h
        .upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/Immunizations")
                .query_param("subjectHdid", GUARDIAN)
                .header("authorization", format!("Bearer {token}"));
            then.status(200).json_body(json!({
                "result": {"immunizationViews": [], "recommendations": []},
                "loadState": {"refreshInProgress": false}
            }));
        })
        .await;

    let (status, body) = send(
        &h.router,
        Method::GET,
        &format!("/Immunization?hdid={GUARDIAN}"),
        Some(&token),
        None,
    )
    .await;

    phsa.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultStatus"], "Success");
}

#[tokio::test]
async fn notes_round_trip_through_the_store() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let uri = format!("/Note/{GUARDIAN}");

    let (_, created) = send(
        &h.router,
        Method::POST,
        &uri,
        Some(&token),
        Some(json!({"title": "Flu shot", "text": "Left arm", "journalDate": "2024-10-01"})),
    )
    .await;
    assert_eq!(created["resultStatus"], "Success");
    let id = created["resourcePayload"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &h.router,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"title": "Flu shot", "journalDate": "2024-10-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, updated) = send(
        &h.router,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({
            "id": id,
            "version": 0,
            "title": "Flu shot 2024",
            "journalDate": "2024-10-01"
        })),
    )
    .await;
    assert_eq!(updated["resultStatus"], "Success");
    assert_eq!(updated["resourcePayload"]["version"], 1);

    let (_, stale) = send(
        &h.router,
        Method::DELETE,
        &uri,
        Some(&token),
        Some(json!({"id": id, "version": 0})),
    )
    .await;
    assert_eq!(stale["resultStatus"], "Error");

    let (_, deleted) = send(
        &h.router,
        Method::DELETE,
        &uri,
        Some(&token),
        Some(json!({"id": id, "version": 1})),
    )
    .await;
    assert_eq!(deleted["resultStatus"], "Success");

    let (_, listed) = send(&h.router, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(listed["resourcePayload"], json!([]));
}

#[tokio::test]
async fn guardian_reads_dependent_health_data_but_not_profile() {
    let h = harness().await;
    let token = token_for(GUARDIAN);

    let (_, added) = send(
        &h.router,
        Method::POST,
        &format!("/UserProfile/{GUARDIAN}/Dependent"),
        Some(&token),
        Some(json!({
            "phn": CHILD_PHN,
            "firstName": "Robin",
            "lastName": "Powell",
            "dateOfBirth": format!("{}-01-01", child_birth_year()),
        })),
    )
    .await;
    assert_eq!(added["resultStatus"], "Success");
    assert_eq!(added["resourcePayload"]["ownerId"], CHILD);

    let (status, patient) = send(
        &h.router,
        Method::GET,
        &format!("/Patient/{CHILD}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patient["resultStatus"], "Success");

    let (status, _) = send(
        &h.router,
        Method::GET,
        &format!("/Note/{CHILD}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, removed) = send(
        &h.router,
        Method::DELETE,
        &format!("/UserProfile/{GUARDIAN}/Dependent/{CHILD}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(removed["resultStatus"], "Success");

    let (status, _) = send(
        &h.router,
        Method::GET,
        &format!("/Patient/{CHILD}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn comments_lifecycle_on_a_timeline_entry() {
    let h = harness().await;
    let token = token_for(GUARDIAN);
    let uri = format!("/UserProfile/{GUARDIAN}/Comment");

    let (status, _) = send(
        &h.router,
        Method::POST,
        &uri,
        Some(&token),
        Some(json!({"parentEntryId": "imm-1", "entryTypeCode": "Allergy", "text": "Sore"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &h.router,
        Method::POST,
        &uri,
        Some(&token),
        Some(json!({"parentEntryId": "imm-1", "entryTypeCode": "Immunization", "text": "Sore arm"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["resultStatus"], "Success");
    assert_eq!(created["resourcePayload"]["version"], 0);
    let id = created["resourcePayload"]["id"].as_str().unwrap().to_string();

    let (_, listed) = send(
        &h.router,
        Method::GET,
        &format!("{uri}?parentEntryId=imm-1"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(listed["resultStatus"], "Success");
    assert_eq!(listed["resourcePayload"][0]["text"], "Sore arm");

    let (_, updated) = send(
        &h.router,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"id": id, "text": "Sore arm for a day", "version": 0})),
    )
    .await;
    assert_eq!(updated["resultStatus"], "Success");
    assert_eq!(updated["resourcePayload"]["version"], 1);

    let (_, all) = send(
        &h.router,
        Method::GET,
        &format!("{uri}/all"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(all["resourcePayload"]["imm-1"][0]["text"], "Sore arm for a day");

    let (status, _) = send(
        &h.router,
        Method::GET,
        &format!("/UserProfile/{CHILD}/Comment/all"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, deleted) = send(
        &h.router,
        Method::DELETE,
        &uri,
        Some(&token),
        Some(json!({"id": id, "version": 1})),
    )
    .await;
    assert_eq!(deleted["resultStatus"], "Success");

    let (_, listed) = send(
        &h.router,
        Method::GET,
        &format!("{uri}?parentEntryId=imm-1"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(listed["resourcePayload"], json!([]));
}
