//! Post list screen: `GET /posts` on activation.

use serde_json::Value;

use super::{ApiResult, Context, Fetch, RequestGuard, ScreenKind, Ticket};
use crate::client::RequestOptions;
use crate::types::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPanel<'a> {
    Loading,
    Empty,
    Posts(&'a [Post]),
}

#[derive(Debug)]
pub struct ListScreen {
    posts: Vec<Post>,
    guard: RequestGuard,
}

impl Default for ListScreen {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            guard: RequestGuard::new(ScreenKind::List),
        }
    }
}

impl ListScreen {
    pub fn activate(&mut self, ctx: &Context) -> Fetch {
        self.guard.issue(ctx.request("/posts", RequestOptions::get()))
    }

    pub fn deactivate(&mut self) {
        self.guard.cancel();
    }

    pub fn on_result(&mut self, ticket: Ticket, result: ApiResult, ctx: &mut Context) {
        if !self.guard.accept(ticket) {
            return;
        }
        match result {
            Ok(data) => {
                self.posts = extract_posts(data.as_ref());
                tracing::debug!(count = self.posts.len(), "post list loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetching posts failed");
                ctx.message.error(e.to_string());
                self.posts.clear();
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn panel(&self) -> ListPanel<'_> {
        if self.is_loading() {
            ListPanel::Loading
        } else if self.posts.is_empty() {
            ListPanel::Empty
        } else {
            ListPanel::Posts(&self.posts)
        }
    }
}

/// `data.posts` as posts; anything that is not an array yields an empty
/// list, and entries that do not look like posts are skipped.
fn extract_posts(data: Option<&Value>) -> Vec<Post> {
    let Some(entries) = data.and_then(|d| d.get("posts")).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed post entry");
                None
            }
        })
        .collect()
}
