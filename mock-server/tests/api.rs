use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Project, AUTH_HEADER};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_HEADER, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_HEADER, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app(TOKEN)
        .oneshot(Request::builder().uri("/1.1/user").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_returns_401_with_message() {
    let resp = app(TOKEN)
        .oneshot(
            Request::builder()
                .uri("/1.1/user")
                .header(AUTH_HEADER, "nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let failure: Value = body_json(resp).await;
    assert_eq!(failure["status"], 401);
    assert!(failure["message"].as_str().unwrap().contains("auth token"));
}

// --- versions ---

#[tokio::test]
async fn user_is_served_under_every_version() {
    for version in ["1.1", "v2"] {
        let resp = app(TOKEN)
            .oneshot(request("GET", &format!("/{version}/user")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK, "{version}");
        let user: Value = body_json(resp).await;
        assert_eq!(user["username"], "mock-user");
    }
}

#[tokio::test]
async fn unknown_version_returns_404() {
    let resp = app(TOKEN).oneshot(request("GET", "/9.9/user")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- projects ---

#[tokio::test]
async fn list_projects_empty() {
    let resp = app(TOKEN).oneshot(request("GET", "/1.1/projects")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Value = body_json(resp).await;
    assert_eq!(listing["items"], serde_json::json!([]));
}

#[tokio::test]
async fn create_project_returns_201() {
    let resp = app(TOKEN)
        .oneshot(json_request("POST", "/1.1/projects", r#"{"name":"rna-seq"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let project: Project = body_json(resp).await;
    assert_eq!(project.name, "rna-seq");
    assert!(project.description.is_none());
}

#[tokio::test]
async fn create_project_malformed_json_returns_422() {
    let resp = app(TOKEN)
        .oneshot(json_request("POST", "/1.1/projects", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_project_not_found() {
    let resp = app(TOKEN)
        .oneshot(request("GET", "/1.1/projects/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let failure: Value = body_json(resp).await;
    assert_eq!(failure["status"], 404);
    assert_eq!(failure["message"], "Project missing not found");
}

#[tokio::test]
async fn update_project_not_found() {
    let resp = app(TOKEN)
        .oneshot(json_request("PUT", "/1.1/projects/missing", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let failure: Value = body_json(resp).await;
    assert_eq!(failure["message"], "Project missing not found");
}

#[tokio::test]
async fn update_project_blank_name_returns_400() {
    let resp = app(TOKEN)
        .oneshot(json_request("PUT", "/1.1/projects/any", r#"{"name":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let failure: Value = body_json(resp).await;
    assert_eq!(failure["status"], 400);
    assert_eq!(failure["message"], "Project name must not be empty");
}

#[tokio::test]
async fn delete_project_not_found() {
    let resp = app(TOKEN)
        .oneshot(request("DELETE", "/1.1/projects/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let failure: Value = body_json(resp).await;
    assert_eq!(failure["status"], 404);
    assert_eq!(failure["message"], "Project missing not found");
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_query_and_body() {
    let resp = app(TOKEN)
        .oneshot(json_request("POST", "/1.1/echo?q=x&limit=5", r#"{"b":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["query"]["q"], "x");
    assert_eq!(echoed["query"]["limit"], "5");
    assert_eq!(echoed["body"]["b"], 1);
}

#[tokio::test]
async fn echo_without_body_reports_null() {
    let resp = app(TOKEN).oneshot(request("DELETE", "/v2/echo")).await.unwrap();

    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["method"], "DELETE");
    assert!(echoed["body"].is_null());
}

// --- full project lifecycle ---

#[tokio::test]
async fn project_lifecycle() {
    use tower::Service;

    let mut app = app(TOKEN).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/1.1/projects",
            r#"{"name":"wgs","description":"whole genome"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Project = body_json(resp).await;
    assert_eq!(created.description.as_deref(), Some("whole genome"));
    let id = created.id.clone();

    // list, filtered by name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/1.1/projects?name=wgs"))
        .await
        .unwrap();
    let listing: Value = body_json(resp).await;
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);
    assert_eq!(listing["items"][0]["id"], id.as_str());

    // the same store backs every version
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/v2/projects/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Project = body_json(resp).await;
    assert_eq!(fetched, created);

    // update name only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/1.1/projects/{id}"),
            r#"{"name":"wgs-2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Project = body_json(resp).await;
    assert_eq!(updated.name, "wgs-2");
    assert_eq!(updated.description.as_deref(), Some("whole genome")); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/1.1/projects/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/1.1/projects/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
