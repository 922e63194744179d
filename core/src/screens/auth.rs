//! Shared login/register form.

use super::{ApiResult, Context, Fetch, RequestGuard, ScreenKind, Ticket};
use crate::client::RequestOptions;
use crate::types::{AuthResponse, Credentials, Role, User};
use crate::view::View;

pub const MISSING_CREDENTIALS: &str = "Username and password are required.";
pub const OPERATION_FAILED: &str = "Operation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::Login => "/login",
            AuthMode::Register => "/register",
        }
    }

    pub fn view(self) -> View {
        match self {
            AuthMode::Login => View::Login,
            AuthMode::Register => View::Register,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn from_view(view: &View) -> Option<Self> {
        match view {
            View::Login => Some(AuthMode::Login),
            View::Register => Some(AuthMode::Register),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPanel<'a> {
    pub mode: AuthMode,
    pub username: &'a str,
    /// Length only; the password itself is never rendered.
    pub password_len: usize,
    pub submitting: bool,
}

#[derive(Debug)]
pub struct AuthScreen {
    mode: AuthMode,
    username: String,
    password: String,
    guard: RequestGuard,
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            guard: RequestGuard::new(ScreenKind::Auth),
        }
    }
}

impl AuthScreen {
    /// Switch to `mode`. Fields survive a login/register toggle but start
    /// empty when the form is entered from another screen.
    pub fn enter(&mut self, mode: AuthMode, keep_fields: bool) {
        self.mode = mode;
        if !keep_fields {
            self.username.clear();
            self.password.clear();
        }
    }

    /// Drop an outstanding login or register call.
    pub fn cancel(&mut self) {
        self.guard.cancel();
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn submit(&mut self, ctx: &mut Context) -> Option<Fetch> {
        ctx.message.clear();
        if self.username.is_empty() || self.password.is_empty() {
            ctx.message.error(MISSING_CREDENTIALS);
            return None;
        }
        let credentials = Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        match RequestOptions::post(&credentials) {
            Ok(options) => Some(self.guard.issue(ctx.request(self.mode.endpoint(), options))),
            Err(e) => {
                ctx.message.error(e.to_string());
                None
            }
        }
    }

    /// On success: persist the token, activate the session, go to the list.
    /// On failure the form keeps its contents for a retry.
    pub fn on_result(&mut self, ticket: Ticket, result: ApiResult, ctx: &mut Context) {
        if !self.guard.accept(ticket) {
            return;
        }
        let response = match result {
            Ok(Some(data)) => serde_json::from_value::<AuthResponse>(data).map_err(|e| {
                tracing::warn!(error = %e, "auth response missing user token");
                OPERATION_FAILED.to_string()
            }),
            Ok(None) => Err(OPERATION_FAILED.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match response {
            Ok(response) => {
                let fallback = response.user.username.clone().map(|username| User {
                    username,
                    role: Role::from_label(response.user.role.as_deref().unwrap_or_default()),
                });
                ctx.session.sign_in(&response.user.token, fallback);
                tracing::info!(mode = ?self.mode, user = ?ctx.session.user(), "signed in");
                ctx.views.navigate(View::List);
                ctx.message.success(response.message);
                self.enter(self.mode, false);
            }
            Err(text) => ctx.message.error(text),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn panel(&self) -> AuthPanel<'_> {
        AuthPanel {
            mode: self.mode,
            username: &self.username,
            password_len: self.password.chars().count(),
            submitting: self.is_loading(),
        }
    }
}
