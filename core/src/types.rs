//! Domain DTOs for the blog API.
//!
//! # Design
//! These types mirror the API's JSON but are defined independently of the
//! mock-server crate; integration tests catch schema drift. Posts are
//! transient display copies, so the optional-looking fields default instead
//! of failing the whole payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a post. The API may encode it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl PostId {
    /// An empty text id names no post.
    pub fn is_empty(&self) -> bool {
        matches!(self, PostId::Text(s) if s.is_empty())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for PostId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => PostId::Number(n),
            Err(_) => PostId::Text(s.to_string()),
        })
    }
}

impl From<i64> for PostId {
    fn from(n: i64) -> Self {
        PostId::Number(n)
    }
}

/// A blog post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_name: String,
    /// Raw timestamp text; formatting is a rendering concern.
    #[serde(default)]
    pub created_at: String,
}

/// Display role derived from the credential token. Never used for
/// authorization; the API re-checks every protected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Anything other than `admin` only unlocks the ordinary user view.
    pub fn from_label(label: &str) -> Self {
        if label == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::User => f.write_str("user"),
        }
    }
}

/// The signed-in identity shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Request payload for `/login` and `/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Request payload for `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// The `user` object of an auth response. Only `token` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Success body of `/login` and `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    #[serde(default)]
    pub message: String,
}
