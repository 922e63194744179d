//! Post detail screen: `GET /posts/{id}`, re-fetched on every entry.

use super::{ApiResult, Context, Fetch, RequestGuard, ScreenKind, Ticket};
use crate::client::RequestOptions;
use crate::types::{Post, PostId};

pub const NOT_FOUND: &str = "Post not found or has been deleted.";
pub const INVALID_FORMAT: &str = "Failed to load post: invalid response format.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanel<'a> {
    Loading,
    /// Error panel with a back-to-list action.
    Failed(&'a str),
    Post(&'a Post),
}

#[derive(Debug)]
enum DetailState {
    Idle,
    Loaded(Post),
    Failed(String),
}

#[derive(Debug)]
pub struct DetailScreen {
    post_id: Option<PostId>,
    state: DetailState,
    guard: RequestGuard,
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self {
            post_id: None,
            state: DetailState::Idle,
            guard: RequestGuard::new(ScreenKind::Detail),
        }
    }
}

impl DetailScreen {
    /// Fetch `id`, discarding whatever was shown before.
    pub fn load(&mut self, id: PostId, ctx: &mut Context) -> Fetch {
        ctx.message.clear();
        self.state = DetailState::Idle;
        let request = ctx.request(&format!("/posts/{id}"), RequestOptions::get());
        self.post_id = Some(id);
        self.guard.issue(request)
    }

    pub fn deactivate(&mut self) {
        self.guard.cancel();
    }

    pub fn on_result(&mut self, ticket: Ticket, result: ApiResult, ctx: &mut Context) {
        if !self.guard.accept(ticket) {
            return;
        }
        let post = result.map(|data| {
            data.as_ref()
                .and_then(|d| d.get("post"))
                .and_then(|p| serde_json::from_value::<Post>(p.clone()).ok())
        });
        self.state = match post {
            Ok(Some(post)) => DetailState::Loaded(post),
            Ok(None) => {
                ctx.message.error(INVALID_FORMAT);
                DetailState::Failed(INVALID_FORMAT.to_string())
            }
            Err(e) => {
                tracing::warn!(id = ?self.post_id, error = %e, "fetching post failed");
                let text = e.to_string();
                ctx.message.error(text.clone());
                DetailState::Failed(text)
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn panel(&self) -> DetailPanel<'_> {
        if self.is_loading() {
            return DetailPanel::Loading;
        }
        match &self.state {
            DetailState::Loaded(post) => DetailPanel::Post(post),
            DetailState::Failed(text) if !text.is_empty() => DetailPanel::Failed(text),
            _ => DetailPanel::Failed(NOT_FOUND),
        }
    }
}
