use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub message: String,
}

/// Failures rendered as `{"error": "..."}` with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

struct Account {
    password: String,
    role: String,
}

/// In-memory accounts, sessions and posts.
#[derive(Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
    /// token -> username
    tokens: HashMap<String, String>,
    posts: Vec<Post>,
    next_id: i64,
}

impl Store {
    fn issue_token(&mut self, username: &str, role: &str) -> String {
        let token = format!("{username}.{role}.{}", Uuid::new_v4().simple());
        self.tokens.insert(token.clone(), username.to_string());
        token
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Router state seeded with one admin account.
pub fn seeded(admin_username: &str, admin_password: &str) -> Db {
    let mut store = Store {
        next_id: 1,
        ..Store::default()
    };
    store.accounts.insert(
        admin_username.to_string(),
        Account {
            password: admin_password.to_string(),
            role: "admin".to_string(),
        },
    );
    Arc::new(RwLock::new(store))
}

/// The API mounted under `/api`, with the default `admin`/`admin` account.
pub fn app() -> Router {
    app_with(seeded("admin", "admin"))
}

pub fn app_with(db: Db) -> Router {
    let api = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".into()));
    }
    if input.username.contains('.') {
        return Err(ApiError::BadRequest("Username may not contain '.'".into()));
    }
    let mut store = db.write().await;
    if store.accounts.contains_key(&input.username) {
        return Err(ApiError::Conflict("Username already exists".into()));
    }
    store.accounts.insert(
        input.username.clone(),
        Account {
            password: input.password,
            role: "user".to_string(),
        },
    );
    let token = store.issue_token(&input.username, "user");
    tracing::info!(username = %input.username, "registered");
    let user = AuthUser {
        username: input.username,
        role: "user".to_string(),
        token,
    };
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            message: "Registration successful".to_string(),
        }),
    ))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<AuthResponse>, ApiError> {
    let mut store = db.write().await;
    let role = match store.accounts.get(&input.username) {
        Some(account) if account.password == input.password => account.role.clone(),
        _ => return Err(ApiError::Unauthorized("Invalid username or password".into())),
    };
    let token = store.issue_token(&input.username, &role);
    Ok(Json(AuthResponse {
        user: AuthUser {
            username: input.username,
            role,
            token,
        },
        message: "Login successful".to_string(),
    }))
}

async fn list_posts(State(db): State<Db>) -> Json<serde_json::Value> {
    let store = db.read().await;
    let posts: Vec<&Post> = store.posts.iter().rev().collect();
    Json(json!({ "posts": posts }))
}

async fn get_post(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = db.read().await;
    store
        .posts
        .iter()
        .find(|p| p.id == id)
        .map(|post| Json(json!({ "post": post })))
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let mut store = db.write().await;
    let author = authorize_admin(&store, &headers)?;
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Title and content are required".into()));
    }
    let post = Post {
        id: store.next_id,
        title: input.title,
        content: input.content,
        author_name: author,
        created_at: Utc::now(),
    };
    store.next_id += 1;
    store.posts.push(post.clone());
    tracing::info!(id = post.id, title = %post.title, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// Resolve the bearer token to an admin username.
fn authorize_admin(store: &Store, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;
    let username = store
        .tokens
        .get(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".into()))?;
    match store.accounts.get(username) {
        Some(account) if account.role == "admin" => Ok(username.clone()),
        _ => Err(ApiError::Forbidden("Only admins can publish posts".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_to_json() {
        let post = Post {
            id: 1,
            title: "Test".to_string(),
            content: "Body".to_string(),
            author_name: "admin".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["author_name"], "admin");
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn issued_tokens_have_three_segments() {
        let mut store = Store::default();
        let token = store.issue_token("alice", "admin");
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(&parts[..2], &["alice", "admin"]);
        assert_eq!(store.tokens.get(&token).map(String::as_str), Some("alice"));
    }

    #[test]
    fn credentials_reject_missing_password() {
        let result: Result<Credentials, _> = serde_json::from_str(r#"{"username":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn errors_render_status() {
        let resp = ApiError::Forbidden("no".into()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = ApiError::Conflict("dup".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
