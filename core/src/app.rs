//! Application shell: routes actions and responses, activates screens.
//!
//! # Design
//! `App` processes one event at a time. After every event it compares the
//! active view with the one before and runs the entry behavior of the new
//! view (fetch the list, fetch a detail, reset a form). That single place
//! is the whole state machine: `detail` without an id is corrected to
//! `list`, and successful auth or create lands on `list` through the same
//! path as a user click.

use crate::client::ApiClient;
use crate::http::HttpResponse;
use crate::message::Message;
use crate::nav::{nav_bar, NavEntry};
use crate::screens::{
    ApiResult, AuthMode, AuthPanel, AuthScreen, Context, CreatePanel, CreateScreen, DetailPanel,
    DetailScreen, Fetch, ListPanel, ListScreen, ScreenKind, Ticket,
};
use crate::error::RequestError;
use crate::session::SessionStore;
use crate::storage::TokenStore;
use crate::types::{PostId, User};
use crate::view::View;

pub const LOGGED_OUT: &str = "You have been logged out.";

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    Title,
    Content,
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(View),
    OpenPost(PostId),
    Edit(Field, String),
    Submit,
    ToggleAuthMode,
    Logout,
    DismissMessage,
}

#[derive(Debug)]
pub struct App {
    ctx: Context,
    list: ListScreen,
    detail: DetailScreen,
    create: CreateScreen,
    auth: AuthScreen,
}

impl App {
    /// Restore the session from `store`. Call `start` to load the first view.
    pub fn new(client: ApiClient, store: Box<dyn TokenStore>) -> Self {
        let session = SessionStore::bootstrap(store);
        Self {
            ctx: Context::new(client, session),
            list: ListScreen::default(),
            detail: DetailScreen::default(),
            create: CreateScreen::default(),
            auth: AuthScreen::default(),
        }
    }

    /// Requests needed by the initial view.
    pub fn start(&mut self) -> Vec<Fetch> {
        self.enter(None)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Fetch> {
        match &action {
            // Field values may be passwords.
            Action::Edit(field, _) => tracing::trace!(?field, "edit"),
            other => tracing::debug!(action = ?other, view = %self.view(), "dispatch"),
        }
        let previous = self.view().clone();
        let mut fetches = Vec::new();
        match action {
            Action::Navigate(view) => self.ctx.views.navigate(view),
            Action::OpenPost(id) => self.ctx.views.navigate(View::Detail(Some(id))),
            Action::Edit(field, value) => self.edit(field, value),
            Action::Submit => fetches.extend(self.submit()),
            Action::ToggleAuthMode => {
                if let Some(mode) = AuthMode::from_view(self.view()) {
                    self.ctx.views.navigate(mode.toggled().view());
                }
            }
            Action::Logout => {
                self.auth.cancel();
                self.ctx.session.sign_out();
                self.ctx.views.navigate(View::List);
                self.ctx.message.info(LOGGED_OUT);
            }
            Action::DismissMessage => self.ctx.message.clear(),
        }
        fetches.extend(self.settle(previous));
        fetches
    }

    pub fn handle_response(&mut self, ticket: Ticket, response: HttpResponse) -> Vec<Fetch> {
        tracing::debug!(?ticket, status = response.status, "response");
        let result = self.ctx.client.parse(response);
        self.deliver(ticket, result)
    }

    /// The host could not complete the request at all.
    pub fn handle_transport_error(&mut self, ticket: Ticket, reason: impl Into<String>) -> Vec<Fetch> {
        let error = RequestError::Transport(reason.into());
        tracing::warn!(?ticket, %error, "transport failure");
        self.deliver(ticket, Err(error))
    }

    /// A single shared flag: any screen waiting on the API.
    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
            || self.detail.is_loading()
            || self.create.is_loading()
            || self.auth.is_loading()
    }

    pub fn view(&self) -> &View {
        self.ctx.views.current()
    }

    pub fn user(&self) -> Option<&User> {
        self.ctx.session.user()
    }

    pub fn message(&self) -> Option<&Message> {
        self.ctx.message.current()
    }

    pub fn nav(&self) -> Vec<NavEntry> {
        nav_bar(&self.ctx.session, self.view(), self.is_loading())
    }

    pub fn list(&self) -> &ListScreen {
        &self.list
    }

    pub fn list_panel(&self) -> ListPanel<'_> {
        self.list.panel()
    }

    pub fn detail_panel(&self) -> DetailPanel<'_> {
        self.detail.panel()
    }

    pub fn create_panel(&self) -> CreatePanel<'_> {
        self.create.panel(&self.ctx)
    }

    pub fn auth_panel(&self) -> AuthPanel<'_> {
        self.auth.panel()
    }

    fn edit(&mut self, field: Field, value: String) {
        match field {
            Field::Username => self.auth.set_username(value),
            Field::Password => self.auth.set_password(value),
            Field::Title => self.create.set_title(value),
            Field::Content => self.create.set_content(value),
        }
    }

    fn submit(&mut self) -> Option<Fetch> {
        if self.is_loading() {
            tracing::debug!("submit ignored while a request is outstanding");
            return None;
        }
        match self.view().clone() {
            View::Create => self.create.submit(&mut self.ctx),
            View::Login | View::Register => self.auth.submit(&mut self.ctx),
            _ => None,
        }
    }

    fn deliver(&mut self, ticket: Ticket, result: ApiResult) -> Vec<Fetch> {
        let previous = self.view().clone();
        match ticket.screen {
            ScreenKind::List => self.list.on_result(ticket, result, &mut self.ctx),
            ScreenKind::Detail => self.detail.on_result(ticket, result, &mut self.ctx),
            ScreenKind::Create => self.create.on_result(ticket, result, &mut self.ctx),
            ScreenKind::Auth => self.auth.on_result(ticket, result, &mut self.ctx),
        }
        self.settle(previous)
    }

    /// Run exit and entry behavior if the view changed.
    fn settle(&mut self, previous: View) -> Vec<Fetch> {
        if matches!(self.view(), View::Detail(_)) && self.view().detail_id().is_none() {
            tracing::debug!("detail without a post id, returning to list");
            self.ctx.views.navigate(View::List);
        }
        if *self.view() == previous {
            return Vec::new();
        }
        match previous {
            View::List => self.list.deactivate(),
            View::Detail(_) => self.detail.deactivate(),
            _ => {}
        }
        self.enter(Some(&previous))
    }

    fn enter(&mut self, previous: Option<&View>) -> Vec<Fetch> {
        match self.view().clone() {
            View::List => vec![self.list.activate(&self.ctx)],
            view @ View::Detail(_) => match view.detail_id() {
                Some(id) => vec![self.detail.load(id.clone(), &mut self.ctx)],
                None => {
                    self.ctx.views.navigate(View::List);
                    vec![self.list.activate(&self.ctx)]
                }
            },
            View::Create => {
                self.create.reset();
                Vec::new()
            }
            view @ (View::Login | View::Register) => {
                let keep = previous.is_some_and(View::is_auth);
                if let Some(mode) = AuthMode::from_view(&view) {
                    self.auth.enter(mode, keep);
                }
                Vec::new()
            }
        }
    }
}
