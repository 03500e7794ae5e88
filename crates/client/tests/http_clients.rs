use healthrecs_client::{HttpExtractionClient, HttpRecordsClient};
use healthrecs_core::models::{NewVisit, Patient};
use healthrecs_core::pages::dashboard::DashboardPage;
use healthrecs_core::pages::registration::{PatientForm, RegistrationWizard, WizardState};
use healthrecs_core::service::{ExtractionApi, ImageUpload, RecordsApi};
use healthrecs_core::{ApiAction, ApiError, CoreConfig, RegNo};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cfg_for(server: &MockServer) -> Arc<CoreConfig> {
    cfg_at(Url::parse(&server.uri()).expect("mock server URI should parse"))
}

fn cfg_at(base: Url) -> Arc<CoreConfig> {
    Arc::new(
        CoreConfig::new(
            base.clone(),
            base,
            PathBuf::from("unused"),
            Duration::ZERO,
            3,
        )
        .expect("config should build"),
    )
}

fn records(server: &MockServer) -> HttpRecordsClient {
    HttpRecordsClient::new(cfg_for(server)).expect("client should build")
}

#[tokio::test]
async fn test_list_patients_decodes_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "1", "regNo": "REG-1", "name": "Arun Mehta", "otherAilments": {"cancer": true}},
            {"_id": "2", "regNo": "REG-2", "name": "Priya Sharma", "age": "32"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let patients = records(&server)
        .list_patients()
        .await
        .expect("list should succeed");

    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0].name, "Arun Mehta");
    assert_eq!(patients[1].age, Some(32));
}

#[tokio::test]
async fn test_non_array_payload_is_zero_patients() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "db offline"})))
        .mount(&server)
        .await;

    let patients = records(&server)
        .list_patients()
        .await
        .expect("non-array should not fail");
    assert!(patients.is_empty());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = records(&server)
        .list_patients()
        .await
        .expect_err("500 should fail");
    assert!(matches!(err, ApiError::Status { status: 500, ref body } if body == "boom"));
}

#[tokio::test]
async fn test_get_patient_uses_record_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/record/REG-2023-0042"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"regNo": "REG-2023-0042", "name": "Arun Mehta"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reg_no = RegNo::parse("REG-2023-0042").expect("valid reg no");
    let patient = records(&server)
        .get_patient(&reg_no)
        .await
        .expect("get should succeed");
    assert_eq!(patient.name, "Arun Mehta");
}

#[tokio::test]
async fn test_get_patient_rejects_non_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/record/REG-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["REG-1"])))
        .mount(&server)
        .await;

    let reg_no = RegNo::parse("REG-1").expect("valid reg no");
    let err = records(&server)
        .get_patient(&reg_no)
        .await
        .expect_err("array should fail");
    assert!(matches!(err, ApiError::UnexpectedShape(_)));
}

#[tokio::test]
async fn test_add_visit_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/REG-1/visits"))
        .and(body_json(json!({
            "investigation": "Skin smear",
            "treatmentGiven": "MDT"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let reg_no = RegNo::parse("REG-1").expect("valid reg no");
    let visit = NewVisit {
        investigation: "Skin smear".into(),
        treatment_given: "MDT".into(),
    };
    let created = records(&server)
        .add_visit(&reg_no, &visit)
        .await
        .expect("visit should be added");

    assert_eq!(created.investigation, "Skin smear");
    assert_eq!(created.treatment_given, "MDT");
}

#[tokio::test]
async fn test_registration_round_trip_confirms_reg_no() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/newRecord"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = records(&server);
    let mut wizard = RegistrationWizard::new();
    *wizard.form_mut() = PatientForm {
        reg_no: "REG-2024-0300".into(),
        name: "Deepa Menon".into(),
        age: "41".into(),
        sex: "F".into(),
        mobile_no: "9000000002".into(),
        disability_status: "Grade 1".into(),
        ..PatientForm::default()
    };
    wizard.submit(&api).await.expect("submit should succeed");

    assert_eq!(
        wizard.state(),
        &WizardState::Confirmed {
            reg_no: "REG-2024-0300".into()
        }
    );

    let requests = server.received_requests().await.expect("requests recorded");
    let sent: Patient = serde_json::from_slice(&requests[0].body).expect("body is a patient");
    assert_eq!(sent.reg_no, "REG-2024-0300");
    let raw: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(raw["disablitiyStatus"], "Grade 1");
}

#[tokio::test]
async fn test_dashboard_with_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let cfg = cfg_for(&server);
    let api = HttpRecordsClient::new(cfg.clone()).expect("client should build");
    let mut dashboard = DashboardPage::new(&cfg);
    dashboard.load(&api).await.expect("load should succeed");

    assert_eq!(dashboard.stats().total, 0);
    assert!(dashboard.recent().is_empty());
}

#[tokio::test]
async fn test_extract_uploads_image_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract-data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Asha", "sex": "female"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpExtractionClient::new(cfg_for(&server)).expect("client should build");
    let image = ImageUpload {
        file_name: "card.png".into(),
        mime_type: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
    };
    let value = client.extract(&image).await.expect("extract should succeed");
    assert_eq!(value["name"], "Asha");

    let requests = server.received_requests().await.expect("requests recorded");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"image\""));
    assert!(body.contains("filename=\"card.png\""));
    assert!(body.contains("image/png"));
}

#[tokio::test]
async fn test_list_keeps_patient_with_null_visits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"regNo": "R1", "name": "A", "visits": null}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/record/R1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"regNo": "R1", "name": "A", "visits": null})),
        )
        .mount(&server)
        .await;

    let api = records(&server);
    let patients = api.list_patients().await.expect("list should succeed");
    assert_eq!(patients.len(), 1);
    assert!(patients[0].visits.is_empty());

    let reg_no = RegNo::parse("R1").expect("valid reg no");
    let patient = api.get_patient(&reg_no).await.expect("get should succeed");
    assert_eq!(patient.name, "A");
    assert!(patient.visits.is_empty());
}

#[tokio::test]
async fn test_add_visit_accepts_plain_text_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/REG-1/visits"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Visit added"))
        .expect(1)
        .mount(&server)
        .await;

    let reg_no = RegNo::parse("REG-1").expect("valid reg no");
    let visit = NewVisit {
        investigation: "Skin smear".into(),
        treatment_given: "MDT".into(),
    };
    let created = records(&server)
        .add_visit(&reg_no, &visit)
        .await
        .expect("a 201 is a saved visit whatever the body");
    assert_eq!(created.treatment_given, "MDT");
}

#[tokio::test]
async fn test_create_patient_accepts_empty_created_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/newRecord"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let patient = Patient {
        reg_no: "REG-2024-0301".into(),
        name: "Deepa Menon".into(),
        ..Patient::default()
    };
    let created = records(&server)
        .create_patient(&patient)
        .await
        .expect("an empty 201 is a saved patient");
    assert_eq!(created.reg_no, "REG-2024-0301");
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind a free port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let base = Url::parse(&format!("http://127.0.0.1:{port}")).expect("valid url");
    let api = HttpRecordsClient::new(cfg_at(base)).expect("client should build");
    let err = api
        .list_patients()
        .await
        .expect_err("closed port should fail");

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(
        err.user_message(ApiAction::Load),
        "Failed to load data. Please try again."
    );
}
