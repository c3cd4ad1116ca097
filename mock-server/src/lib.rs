use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const AUTH_HEADER: &str = "X-SBG-Auth-Token";
pub const SUPPORTED_VERSIONS: [&str; 2] = ["1.1", "v2"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Project>>>;

/// Error response in the `{"status", "message"}` shape the SBG API sends.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn project_not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Project {id} not found"))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    db: Db,
}

/// Router serving every supported version prefix, accepting only `token`.
pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(HashMap::new())),
    };

    let api = Router::new()
        .route("/user", get(get_user))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/echo", any(echo));

    let mut router = Router::new();
    for version in SUPPORTED_VERSIONS {
        router = router.nest(&format!("/{version}"), api.clone());
    }
    router
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let presented = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented != Some(&*state.token) {
        warn!(uri = %request.uri(), "rejected request with bad or missing token");
        return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid or missing auth token"));
    }
    Ok(next.run(request).await)
}

async fn get_user() -> Json<Value> {
    Json(json!({
        "username": "mock-user",
        "email": "mock-user@example.com",
    }))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let projects = state.db.read().await;
    let mut items: Vec<Project> = projects
        .values()
        .filter(|p| params.name.as_ref().map_or(true, |n| &p.name == n))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Json(json!({ "items": items }))
}

async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> (StatusCode, Json<Project>) {
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
    };
    info!(id = %project.id, name = %project.name, "created project");
    state.db.write().await.insert(project.id.clone(), project.clone());
    (StatusCode::CREATED, Json(project))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiFailure> {
    let projects = state.db.read().await;
    projects
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::project_not_found(&id))
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Project>, ApiFailure> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Project name must not be empty"));
    }
    let mut projects = state.db.write().await;
    let project = projects
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::project_not_found(&id))?;
    if let Some(name) = input.name {
        project.name = name;
    }
    if let Some(description) = input.description {
        project.description = Some(description);
    }
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    match state.db.write().await.remove(&id) {
        Some(project) => {
            info!(%id, name = %project.name, "deleted project");
            Ok(StatusCode::NO_CONTENT)
        }
        None => {
            warn!(%id, "delete of unknown project");
            Err(ApiFailure::project_not_found(&id))
        }
    }
}

/// Reflects the method, decoded query pairs and JSON body back to the caller.
async fn echo(
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Json<Value> {
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body))
    };
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "body": body,
    }))
}
