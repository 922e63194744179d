//! View-state controller.
//!
//! Holds the single active `View`. `navigate` is plain replacement: no
//! history, no guards. Access checks belong to the screen that renders.

use std::fmt;

use crate::types::PostId;

/// The screen being shown plus any parameter it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Login,
    Register,
    Create,
    /// `None` or an empty id is not resolvable and is corrected back to `List`.
    Detail(Option<PostId>),
}

impl View {
    pub fn detail(id: impl Into<PostId>) -> Self {
        View::Detail(Some(id.into()))
    }

    /// The post a detail view can actually load.
    pub fn detail_id(&self) -> Option<&PostId> {
        match self {
            View::Detail(Some(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::List => "list",
            View::Login => "login",
            View::Register => "register",
            View::Create => "create",
            View::Detail(_) => "detail",
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, View::Login | View::Register)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Detail(Some(id)) => write!(f, "detail({id})"),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    current: View,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn navigate(&mut self, view: View) {
        tracing::debug!(from = %self.current, to = %view, "navigate");
        self.current = view;
    }
}
