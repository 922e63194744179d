//! Plain-text rendering of the shell: navigation bar, message, screen.

use std::fmt::Write;

use blog_core::{
    App, AuthMode, CreatePanel, DetailPanel, ListPanel, MessageKind, NavEntry, NavItem, Post,
    Role, View,
};
use chrono::DateTime;

const PREVIEW_CHARS: usize = 80;

pub fn render(app: &App) -> String {
    let mut out = String::new();
    out.push_str(&nav_line(&app.nav()));
    out.push('\n');
    if let Some(message) = app.message() {
        let label = match message.kind {
            MessageKind::Info => "info",
            MessageKind::Success => "ok",
            MessageKind::Error => "error",
        };
        let _ = writeln!(out, "[{label}] {}  (dismiss)", message.text);
    }
    out.push('\n');
    match app.view() {
        View::List | View::Detail(None) => list(&mut out, app.list_panel()),
        View::Detail(Some(_)) => detail(&mut out, app.detail_panel()),
        View::Create => create(&mut out, app.create_panel()),
        View::Login | View::Register => auth(&mut out, app),
    }
    out
}

fn nav_line(entries: &[NavEntry]) -> String {
    let mut parts = vec!["Blog".to_string()];
    for entry in entries {
        let label = match &entry.item {
            NavItem::Home => "home".to_string(),
            NavItem::Create => "new".to_string(),
            NavItem::UserBadge { username, role } => {
                let role = match role {
                    Role::Admin => "admin",
                    Role::User => "user",
                };
                parts.push(format!("{username} ({role})"));
                continue;
            }
            NavItem::Logout => "logout".to_string(),
            NavItem::SignIn => "login/register".to_string(),
        };
        let marker = if entry.active { "*" } else { "" };
        let busy = if entry.disabled { "~" } else { "" };
        parts.push(format!("[{busy}{label}{marker}]"));
    }
    parts.join(" ")
}

fn list(out: &mut String, panel: ListPanel<'_>) {
    out.push_str("Latest posts\n");
    match panel {
        ListPanel::Loading => out.push_str("  loading posts...\n"),
        ListPanel::Empty => {
            out.push_str("  No posts yet. Admins can publish one with `new`.\n");
        }
        ListPanel::Posts(posts) => {
            for (n, post) in posts.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", n + 1, post.title);
                let _ = writeln!(out, "     {}", preview(&post.content));
                let _ = writeln!(
                    out,
                    "     by {} on {}",
                    post.author_name,
                    format_date(&post.created_at, false)
                );
            }
        }
    }
}

fn detail(out: &mut String, panel: DetailPanel<'_>) {
    match panel {
        DetailPanel::Loading => out.push_str("loading post...\n"),
        DetailPanel::Failed(text) => {
            let _ = writeln!(out, "Error\n  {text}\n\n(back to list: `home`)");
        }
        DetailPanel::Post(post) => post_body(out, post),
    }
}

fn post_body(out: &mut String, post: &Post) {
    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "{}", "=".repeat(post.title.chars().count().max(3)));
    let _ = writeln!(
        out,
        "by {} | {}\n",
        post.author_name,
        format_date(&post.created_at, true)
    );
    let _ = writeln!(out, "{}\n\n(back to list: `home`)", post.content);
}

fn create(out: &mut String, panel: CreatePanel<'_>) {
    match panel {
        CreatePanel::PermissionDenied => {
            out.push_str("Permission denied\n  Only administrators can publish posts.\n");
        }
        CreatePanel::Form {
            title,
            content,
            submitting,
        } => {
            out.push_str("New post\n");
            let _ = writeln!(out, "  title:   {title}");
            let _ = writeln!(out, "  content: {content}");
            let action = if submitting { "publishing..." } else { "`submit` to publish" };
            let _ = writeln!(out, "  {action}");
        }
    }
}

fn auth(out: &mut String, app: &App) {
    let panel = app.auth_panel();
    let (heading, action, busy, toggle) = match panel.mode {
        AuthMode::Login => ("Sign in", "log in", "logging in...", "No account yet? `toggle` to register"),
        AuthMode::Register => ("Register", "register", "registering...", "Have an account? `toggle` to log in"),
    };
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "  username: {}", panel.username);
    let _ = writeln!(out, "  password: {}", "*".repeat(panel.password_len));
    if panel.submitting {
        let _ = writeln!(out, "  {busy}");
    } else {
        let _ = writeln!(out, "  `submit` to {action}");
    }
    let _ = writeln!(out, "  {toggle}");
}

fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// RFC 3339 timestamps are shown as a date (or date and time); anything
/// else is shown as sent.
fn format_date(raw: &str, with_time: bool) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) if with_time => ts.format("%Y-%m-%d %H:%M").to_string(),
        Ok(ts) => ts.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::{Action, ApiClient, HttpResponse, MemoryStore};

    fn started(token: Option<&str>, posts: &str) -> App {
        let store = match token {
            Some(token) => MemoryStore::with_token(token),
            None => MemoryStore::new(),
        };
        let mut app = App::new(ApiClient::new("http://test/api"), Box::new(store));
        let fetch = app.start().pop().unwrap();
        app.handle_response(fetch.ticket, HttpResponse::new(200, posts));
        app
    }

    #[test]
    fn anonymous_nav_offers_sign_in() {
        let out = render(&started(None, r#"{"posts":[]}"#));
        let nav = out.lines().next().unwrap();
        assert_eq!(nav, "Blog [home*] [login/register]");
        assert!(out.contains("No posts yet"));
    }

    #[test]
    fn admin_nav_and_numbered_list() {
        let posts = r#"{"posts":[{"id":1,"title":"Hello","content":"First line\nsecond","author_name":"alice","created_at":"2024-05-01T10:30:00Z"}]}"#;
        let out = render(&started(Some("alice.admin.sig"), posts));
        assert!(out.starts_with("Blog [home*] [new] alice (admin) [logout]"));
        assert!(out.contains("  1. Hello"));
        assert!(out.contains("First line..."));
        assert!(out.contains("by alice on 2024-05-01"));
    }

    #[test]
    fn permission_denied_for_users() {
        let mut app = started(Some("bob.user.x"), r#"{"posts":[]}"#);
        app.dispatch(Action::Navigate(View::Create));
        assert!(render(&app).contains("Permission denied"));
    }

    #[test]
    fn dates_fall_back_to_raw_text() {
        assert_eq!(format_date("2024-05-01T10:30:00Z", true), "2024-05-01 10:30");
        assert_eq!(format_date("yesterday", false), "yesterday");
    }

    #[test]
    fn password_is_masked() {
        let mut app = started(None, r#"{"posts":[]}"#);
        app.dispatch(Action::Navigate(View::Login));
        app.dispatch(Action::Edit(blog_core::Field::Password, "secret".into()));
        let out = render(&app);
        assert!(out.contains("password: ******"));
        assert!(!out.contains("secret"));
    }
}
