//! Client core for the blog: API client, session, view state and screens.
//!
//! # Overview
//! The blog itself lives behind an external HTTP API. This crate is the
//! client half: it decides what is shown given the session, the active view
//! and outstanding requests, and it describes the HTTP calls needed to get
//! there. It never touches the network (host-does-IO pattern); a host such
//! as the `blog` terminal client executes each `Fetch` and feeds the
//! `HttpResponse` back.
//!
//! # Design
//! - `ApiClient` is stateless apart from the base URL and normalizes every
//!   response into `Result<Option<Value>, RequestError>`.
//! - `SessionStore` is the only owner of the persisted credential token.
//! - `App` is the shell. It applies one `Action` or response at a time and
//!   returns the requests the new state needs.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod message;
pub mod nav;
pub mod screens;
pub mod session;
pub mod storage;
pub mod types;
pub mod view;

pub use app::{Action, App, Field};
pub use client::{ApiClient, RequestOptions};
pub use error::{RequestError, StorageError, TokenError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use message::{Message, MessageKind};
pub use nav::{NavEntry, NavItem};
pub use screens::{
    AuthMode, AuthPanel, CreatePanel, DetailPanel, Fetch, ListPanel, ScreenKind, Ticket,
};
pub use session::SessionStore;
pub use storage::{FileStore, MemoryStore, TokenStore, TOKEN_KEY};
pub use types::{Post, PostId, Role, User};
pub use view::View;
