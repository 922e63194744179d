//! Create-post screen, functional for admins only.

use serde_json::Value;

use super::{ApiResult, Context, Fetch, RequestGuard, ScreenKind, Ticket};
use crate::client::RequestOptions;
use crate::types::NewPost;
use crate::view::View;

pub const EMPTY_FIELDS: &str = "Title and content cannot be empty!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePanel<'a> {
    PermissionDenied,
    Form {
        title: &'a str,
        content: &'a str,
        submitting: bool,
    },
}

#[derive(Debug)]
pub struct CreateScreen {
    title: String,
    content: String,
    guard: RequestGuard,
}

impl Default for CreateScreen {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            guard: RequestGuard::new(ScreenKind::Create),
        }
    }
}

impl CreateScreen {
    pub fn reset(&mut self) {
        self.title.clear();
        self.content.clear();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Validate and describe `POST /posts`. Non-admins never reach the API.
    pub fn submit(&mut self, ctx: &mut Context) -> Option<Fetch> {
        if !ctx.session.is_admin() {
            return None;
        }
        ctx.message.clear();
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            ctx.message.error(EMPTY_FIELDS);
            return None;
        }
        let input = NewPost {
            title: self.title.clone(),
            content: self.content.clone(),
        };
        match RequestOptions::post(&input) {
            Ok(options) => Some(self.guard.issue(ctx.request("/posts", options))),
            Err(e) => {
                ctx.message.error(e.to_string());
                None
            }
        }
    }

    pub fn on_result(&mut self, ticket: Ticket, result: ApiResult, ctx: &mut Context) {
        if !self.guard.accept(ticket) {
            return;
        }
        match result {
            Ok(data) => {
                let title = data
                    .as_ref()
                    .and_then(|d| d.get("title"))
                    .and_then(Value::as_str)
                    .unwrap_or(self.title.as_str())
                    .to_string();
                tracing::info!(title = %title, "post published");
                ctx.message.success(format!("Post published: {title}"));
                ctx.views.navigate(View::List);
                self.reset();
            }
            Err(e) => {
                tracing::warn!(error = %e, "publishing post failed");
                ctx.message.error(e.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn panel(&self, ctx: &Context) -> CreatePanel<'_> {
        if !ctx.session.is_admin() {
            return CreatePanel::PermissionDenied;
        }
        CreatePanel::Form {
            title: &self.title,
            content: &self.content,
            submitting: self.is_loading(),
        }
    }
}
