//! Screen components and the state they share.
//!
//! # Design
//! Each screen owns only its local form or fetch state. Session, view and
//! message state live in one `Context` that the shell lends to whichever
//! screen is handling an event. Screens never perform I/O: they return a
//! `Fetch` for the host to execute and later receive the normalized result.
//!
//! Every screen carries a `RequestGuard`. A response is applied only if its
//! ticket matches the latest request the screen issued, so a slow response
//! from an earlier navigation cannot overwrite newer state.

pub mod auth;
pub mod create;
pub mod detail;
pub mod list;

use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::message::MessageSlot;
use crate::session::SessionStore;
use crate::view::ViewController;

pub use auth::{AuthMode, AuthPanel, AuthScreen};
pub use create::{CreatePanel, CreateScreen};
pub use detail::{DetailPanel, DetailScreen};
pub use list::{ListPanel, ListScreen};

/// Normalized outcome of one API round-trip.
pub type ApiResult = Result<Option<Value>, RequestError>;

/// Shared state lent to screens.
#[derive(Debug)]
pub struct Context {
    pub client: ApiClient,
    pub session: SessionStore,
    pub views: ViewController,
    pub message: MessageSlot,
}

impl Context {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self {
            client,
            session,
            views: ViewController::new(),
            message: MessageSlot::default(),
        }
    }

    /// Build a request carrying the session's bearer token, if any.
    pub fn request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        self.client.build(endpoint, options, self.session.token_store())
    }
}

/// Which screen issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    List,
    Detail,
    Create,
    Auth,
}

/// Correlates a response with the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub screen: ScreenKind,
    pub seq: u64,
}

/// A request the host must execute, tagged for routing the response back.
#[derive(Debug, Clone)]
pub struct Fetch {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// Monotonic request sequence for a single screen.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    screen: ScreenKind,
    latest: u64,
    in_flight: bool,
}

impl RequestGuard {
    pub fn new(screen: ScreenKind) -> Self {
        Self {
            screen,
            latest: 0,
            in_flight: false,
        }
    }

    /// Start a new request, superseding any outstanding one.
    pub fn issue(&mut self, request: HttpRequest) -> Fetch {
        self.latest += 1;
        self.in_flight = true;
        Fetch {
            ticket: Ticket {
                screen: self.screen,
                seq: self.latest,
            },
            request,
        }
    }

    /// True if `ticket` answers the outstanding request. Consumes it.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        let current = self.in_flight && ticket.screen == self.screen && ticket.seq == self.latest;
        if current {
            self.in_flight = false;
        } else {
            tracing::debug!(screen = ?ticket.screen, seq = ticket.seq, latest = self.latest, "dropping stale response");
        }
        current
    }

    /// Forget the outstanding request; its response will be dropped.
    pub fn cancel(&mut self) {
        self.in_flight = false;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight
    }
}
