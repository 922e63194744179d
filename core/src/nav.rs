//! Navigation bar model.

use crate::session::SessionStore;
use crate::types::Role;
use crate::view::View;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Home,
    /// Only offered to admins.
    Create,
    UserBadge { username: String, role: Role },
    Logout,
    /// Login/register affordance for anonymous visitors.
    SignIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub item: NavItem,
    pub active: bool,
    pub disabled: bool,
}

/// Entries in display order. Buttons are disabled while a request is out.
pub fn nav_bar(session: &SessionStore, view: &View, loading: bool) -> Vec<NavEntry> {
    let button = |item, active| NavEntry {
        item,
        active,
        disabled: loading,
    };
    let mut entries = vec![button(NavItem::Home, *view == View::List)];
    if session.is_admin() {
        entries.push(button(NavItem::Create, *view == View::Create));
    }
    match session.user() {
        Some(user) => {
            entries.push(NavEntry {
                item: NavItem::UserBadge {
                    username: user.username.clone(),
                    role: user.role,
                },
                active: false,
                disabled: false,
            });
            entries.push(button(NavItem::Logout, false));
        }
        None => entries.push(button(NavItem::SignIn, view.is_auth())),
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn items(session: &SessionStore) -> Vec<NavItem> {
        nav_bar(session, &View::List, false).into_iter().map(|e| e.item).collect()
    }

    #[test]
    fn anonymous_sees_home_and_sign_in_only() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::new()));
        assert_eq!(items(&session), vec![NavItem::Home, NavItem::SignIn]);
    }

    #[test]
    fn admin_gets_create_and_logout() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::with_token("alice.admin.sig")));
        assert_eq!(
            items(&session),
            vec![
                NavItem::Home,
                NavItem::Create,
                NavItem::UserBadge {
                    username: "alice".to_string(),
                    role: Role::Admin
                },
                NavItem::Logout,
            ]
        );
    }

    #[test]
    fn plain_user_has_no_create() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::with_token("bob.user.x")));
        assert!(!items(&session).contains(&NavItem::Create));
    }

    #[test]
    fn loading_disables_buttons_and_marks_active_view() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::new()));
        let entries = nav_bar(&session, &View::Register, true);
        assert!(entries.iter().all(|e| e.disabled));
        assert!(!entries[0].active);
        assert!(entries[1].active);
    }
}
