// SPDX-License-Identifier: MIT

//! HTTP client behaviour against a mock portal backend

use mockito::{Matcher, Server};
use serde_json::json;
use std::io::Write;

use trial_portal::api::models::auth::{PreRegisterRequest, UserType};
use trial_portal::api::models::{PaginationRequest, Section, UserRole};
use trial_portal::api::{ApiClient, Attachment, LookupApi, StudyApi};
use trial_portal::script::AnswerLoader;
use trial_portal::{PortalConfig, PortalError};

fn config(base_url: String, token: Option<&str>, refresh: Option<&str>) -> PortalConfig {
    PortalConfig {
        base_url,
        locale: Some("AR".to_string()),
        token: token.map(str::to_string),
        refresh_token: refresh.map(str::to_string),
        timeout_secs: Some(5),
    }
}

#[tokio::test]
async fn test_sends_locale_and_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Study/GetStudyBrief/S-1")
        .match_header("accept-language", "ar")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"","data":{"scientificTitle":"Aspirin trial"}}"#)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("tok-1"), Some("ref-1"))).unwrap();
    let resp = client.get_section(Section::StudyBrief, "S-1").await.unwrap();

    assert_eq!(resp.data["scientificTitle"], json!("Aspirin trial"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_refreshes_once_and_retries_on_401() {
    let mut server = Server::new_async().await;
    let stale = server
        .mock("POST", "/Study/Submit/S-1")
        .match_header("authorization", "Bearer old")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/token/refresh")
        .match_body(Matcher::Json(json!({"refreshToken": "r-1", "token": "old"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"new","refreshToken":"r-2"}"#)
        .expect(1)
        .create_async()
        .await;
    let fresh = server
        .mock("POST", "/Study/Submit/S-1")
        .match_header("authorization", "Bearer new")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"Submitted","data":null}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("old"), Some("r-1"))).unwrap();
    let resp = client.submit("S-1").await.unwrap();

    assert_eq!(resp.message, "Submitted");
    assert_eq!(client.session().token().await.as_deref(), Some("new"));
    assert_eq!(client.session().refresh_token().await.as_deref(), Some("r-2"));
    stale.assert_async().await;
    refresh.assert_async().await;
    fresh.assert_async().await;
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/Study/GetFunders/S-1")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/token/refresh")
        .with_status(401)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("old"), Some("r-1"))).unwrap();
    let err = client.get_section(Section::Funders, "S-1").await.unwrap_err();

    assert!(matches!(err, PortalError::SessionExpired));
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_anonymous_401_is_plain_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/Study/Initiate")
        .with_status(401)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), None, None)).unwrap();
    let err = client.initiate().await.unwrap_err();

    match err {
        PortalError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_message_becomes_error_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/Study/SaveStudyBrief")
        .match_body(Matcher::PartialJson(json!({"studyId": "S-1", "isDraft": true})))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":400,"message":"Scientific title already used"}"#)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("t"), Some("r"))).unwrap();
    let err = client
        .save_section(
            Section::StudyBrief,
            json!({"studyId": "S-1", "isDraft": true, "scientificTitle": "Dup"}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Scientific title already used");
}

#[tokio::test]
async fn test_lists_send_pagination_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Study")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pageNumber".into(), "2".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
            Matcher::UrlEncoded("search".into(), "aspirin".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"code":200,"message":"","data":[{"studyId":"S-9","status":"Draft"}],
                "totalRowsCount":6,"pageNumber":2,"pageSize":5,"currentPage":2,"numberOfPages":2}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("t"), Some("r"))).unwrap();
    let page = client
        .list_studies(&PaginationRequest::page(2, 5).with_search("aspirin"))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].study_id, "S-9");
    assert!(!page.has_more());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_attachment_uploads_as_multipart() {
    let path = std::env::temp_dir().join(format!("trial-portal-upload-{}.pdf", std::process::id()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"%PDF-1.4 test")
        .unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/Study/SaveEthicalApproval/Attachment/S-1")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::Regex(r#"name="model""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"Uploaded","data":null}"#)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("t"), Some("r"))).unwrap();
    let attachment = Attachment::from_path(&path).unwrap();
    let resp = client
        .upload_ethical_attachment("S-1", &attachment)
        .await
        .unwrap();

    assert_eq!(resp.message, "Uploaded");
    mock.assert_async().await;
    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_login_stores_tokens_and_roles() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "rev@example.com", "password": "Secret123"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"code":200,"message":"Welcome","data":{"id":"u-1","email":"rev@example.com",
                "roles":["Reviewer"],"token":"t-1","refreshToken":"r-1"}}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/auth/logout")
        .with_status(500)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), None, None)).unwrap();
    client.login("rev@example.com", "Secret123").await.unwrap();

    assert!(client.session().is_authenticated().await);
    assert!(client.session().has_role(UserRole::Reviewer).await);

    assert!(client.logout().await.is_err());
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_resend_confirmation_encodes_email() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/resend-email-confirmation")
        .match_query(Matcher::UrlEncoded("email".into(), "a+b@example.com".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"Sent","data":null}"#)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), None, None)).unwrap();
    let resp = client.resend_email_confirmation("a+b@example.com").await.unwrap();

    assert_eq!(resp.message, "Sent");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pre_register_returns_created_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/Registration/PreRegisteration")
        .match_body(Matcher::Json(json!({
            "email": "new@example.com",
            "password": "Secret123!",
            "confirmPassword": "Secret123!",
            "userType": 2
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"","data":{"id":"PRE-1"}}"#)
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), None, None)).unwrap();
    let body = PreRegisterRequest {
        email: "new@example.com".to_string(),
        password: "Secret123!".to_string(),
        confirm_password: "Secret123!".to_string(),
        user_type: UserType::OrgAdmin.code(),
    };
    let resp = client.pre_register(&body).await.unwrap();

    assert_eq!(resp.data.id, "PRE-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_subuser_registration_posts_subuser_type() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/Registration/subuser")
        .match_header("authorization", "Bearer admin")
        .match_body(Matcher::PartialJson(json!({
            "email": "lab@example.com",
            "userType": 3
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"User created","data":null}"#)
        .create_async()
        .await;

    let body = AnswerLoader::parse_subuser(
        "email: lab@example.com\npassword: Secret123!\nconfirmPassword: Secret123!\n",
    )
    .unwrap();
    let client = ApiClient::from_config(&config(server.url(), Some("admin"), Some("r"))).unwrap();
    let resp = client.register_subuser(&body).await.unwrap();

    assert_eq!(resp.message, "User created");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_enum_lookup_sends_names() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Lookup/enums")
        .match_query(Matcher::UrlEncoded(
            "names".into(),
            "SiteRequirementsStatus".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"code":200,"message":"","data":{"SiteRequirementsStatus":[{"id":1,"label":"Not yet recruiting"}]}}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::from_config(&config(server.url(), Some("t"), Some("r"))).unwrap();
    let resp = client.lookup_enum("SiteRequirementsStatus").await.unwrap();

    assert_eq!(
        resp.data["SiteRequirementsStatus"][0]["label"],
        json!("Not yet recruiting")
    );
    mock.assert_async().await;
}
