//! End-to-end session against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `App` through real
//! HTTP using ureq: every `Fetch` the app returns is executed and its
//! response fed back until the app is idle. Validates that the core's
//! request building and response handling work against the actual API.

use blog_core::{
    Action, ApiClient, App, CreatePanel, DetailPanel, Fetch, Field, HttpMethod, HttpResponse,
    ListPanel, MemoryStore, MessageKind, PostId, Role, View,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// interpret them.
fn execute(req: blog_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut builder = agent.get(&req.path);
            for (key, value) in &req.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            builder.call()
        }
        (HttpMethod::Post, body) => {
            let mut builder = agent.post(&req.path);
            for (key, value) in &req.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            builder.send(body.unwrap_or_default().as_bytes())
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

/// Run fetches to completion, including any follow-up requests.
fn pump(app: &mut App, mut fetches: Vec<Fetch>) {
    while let Some(fetch) = fetches.pop() {
        let response = execute(fetch.request);
        fetches.extend(app.handle_response(fetch.ticket, response));
    }
    assert!(!app.is_loading());
}

fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

#[test]
fn blog_session_lifecycle() {
    let base = spawn_server();

    // Step 1: anonymous start loads an empty list.
    let mut app = App::new(ApiClient::new(&base), Box::new(MemoryStore::new()));
    let fetches = app.start();
    pump(&mut app, fetches);
    assert_eq!(app.view(), &View::List);
    assert_eq!(app.list_panel(), ListPanel::Empty);

    // Step 2: a plain user registers and cannot publish.
    app.dispatch(Action::Navigate(View::Register));
    app.dispatch(Action::Edit(Field::Username, "bob".into()));
    app.dispatch(Action::Edit(Field::Password, "pw".into()));
    let fetches = app.dispatch(Action::Submit);
    pump(&mut app, fetches);
    assert_eq!(app.view(), &View::List);
    assert_eq!(app.user().unwrap().username, "bob");
    assert_eq!(app.user().unwrap().role, Role::User);
    assert_eq!(app.message().unwrap().text, "Registration successful");

    app.dispatch(Action::Navigate(View::Create));
    assert_eq!(app.create_panel(), CreatePanel::PermissionDenied);
    assert!(app.dispatch(Action::Submit).is_empty());

    // Step 3: log out, then a wrong admin password keeps the form.
    let fetches = app.dispatch(Action::Logout);
    pump(&mut app, fetches);
    assert!(app.user().is_none());
    assert_eq!(app.message().unwrap().kind, MessageKind::Info);

    app.dispatch(Action::Navigate(View::Login));
    app.dispatch(Action::Edit(Field::Username, "admin".into()));
    app.dispatch(Action::Edit(Field::Password, "wrong".into()));
    let fetches = app.dispatch(Action::Submit);
    pump(&mut app, fetches);
    assert_eq!(app.view(), &View::Login);
    assert_eq!(app.message().unwrap().text, "Invalid username or password");

    // Step 4: correct password.
    app.dispatch(Action::Edit(Field::Password, "admin".into()));
    let fetches = app.dispatch(Action::Submit);
    pump(&mut app, fetches);
    assert!(app.user().unwrap().is_admin());

    // Step 5: publish and see it in the refreshed list.
    app.dispatch(Action::Navigate(View::Create));
    app.dispatch(Action::Edit(Field::Title, "Hello".into()));
    app.dispatch(Action::Edit(Field::Content, "First post".into()));
    let fetches = app.dispatch(Action::Submit);
    pump(&mut app, fetches);
    assert_eq!(app.view(), &View::List);
    assert!(app.message().unwrap().text.contains("Hello"));
    let id = match app.list_panel() {
        ListPanel::Posts(posts) => {
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].author_name, "admin");
            posts[0].id.clone()
        }
        other => panic!("unexpected panel {other:?}"),
    };

    // Step 6: open it.
    let fetches = app.dispatch(Action::OpenPost(id));
    pump(&mut app, fetches);
    match app.detail_panel() {
        DetailPanel::Post(post) => assert_eq!(post.content, "First post"),
        other => panic!("unexpected panel {other:?}"),
    }

    // Step 7: a missing post shows the API's error text.
    let fetches = app.dispatch(Action::OpenPost(PostId::Number(404)));
    pump(&mut app, fetches);
    assert_eq!(app.detail_panel(), DetailPanel::Failed("Post not found"));
    assert_eq!(app.message().unwrap().kind, MessageKind::Error);
}

#[test]
fn unreachable_api_reports_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let mut app = App::new(
        ApiClient::new(&format!("http://127.0.0.1:{port}/api")),
        Box::new(MemoryStore::new()),
    );
    let fetch = app.start().pop().unwrap();
    let agent = ureq::Agent::new_with_defaults();
    let err = agent.get(&fetch.request.path).call().unwrap_err();
    app.handle_transport_error(fetch.ticket, err.to_string());
    assert!(!app.is_loading());
    assert_eq!(app.message().unwrap().kind, MessageKind::Error);
    assert_eq!(app.list_panel(), ListPanel::Empty);
}
