//! Screen stack
//!
//! The navigator owns the stack of open pages. Every page gets a fresh
//! [`Visit`] number when it is opened; asynchronous results are addressed by
//! visit, so a result for a page that has since been closed finds no
//! recipient and is dropped.

use tracing::{debug, warn};

use crate::screen::{Action, Message, Navigation, Route, Screen};
use crate::session::SessionStore;

/// Identity of one opened page
pub type Visit = u64;

/// Entry logic may redirect (Home → Auth); bound the chain
const MAX_REDIRECTS: usize = 4;

/// One open page
#[derive(Debug)]
pub struct Page {
    pub visit: Visit,
    pub screen: Screen,
}

/// Stack of open pages; the last one is showing
#[derive(Debug)]
pub struct Navigator {
    pages: Vec<Page>,
    next_visit: Visit,
}

impl Navigator {
    /// Open the app on Home; without a session its guard sends us to Auth
    pub fn start(session: &dyn SessionStore) -> (Self, Visit, Action) {
        let mut navigator = Navigator {
            pages: Vec::new(),
            next_visit: 1,
        };
        let (visit, action) = navigator.navigate(Navigation::Reset(Route::Home), session);
        (navigator, visit, action)
    }

    /// The page on top
    pub fn current(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.pages.iter().map(|page| page.screen.route()).collect()
    }

    /// Deliver a message to the page opened as `visit`.
    ///
    /// Returns None when that page is gone.
    pub fn dispatch(
        &mut self,
        visit: Visit,
        message: Message,
        session: &dyn SessionStore,
    ) -> Option<Action> {
        match self.pages.iter_mut().find(|page| page.visit == visit) {
            Some(page) => Some(page.screen.update(message, session)),
            None => {
                debug!("🗑️  Discarding {:?} for closed page #{}", message, visit);
                None
            }
        }
    }

    /// Apply a navigation and run the entry logic of whatever ends up on top.
    ///
    /// Redirects requested by entry logic are followed here, so the returned
    /// action is never a navigation.
    pub fn navigate(
        &mut self,
        navigation: Navigation,
        session: &dyn SessionStore,
    ) -> (Visit, Action) {
        let mut navigation = navigation;

        for _ in 0..MAX_REDIRECTS {
            let (visit, action) = self.apply(navigation, session);
            match action {
                Action::Navigate(next) => navigation = next,
                action => return (visit, action),
            }
        }

        warn!("⚠️  Too many redirects, staying on {:?}", self.routes());
        (self.current().map(|page| page.visit).unwrap_or(0), Action::None)
    }

    fn apply(&mut self, navigation: Navigation, session: &dyn SessionStore) -> (Visit, Action) {
        match navigation {
            Navigation::Reset(route) => {
                self.pages.clear();
                self.open(route, session)
            }
            Navigation::Push(route) => self.open(route, session),
            Navigation::Back => {
                if self.pages.len() > 1 {
                    self.pages.pop();
                }
                match self.pages.last_mut() {
                    Some(page) => (page.visit, page.screen.focus(session)),
                    None => self.open(Route::Auth, session),
                }
            }
        }
    }

    fn open(&mut self, route: Route, session: &dyn SessionStore) -> (Visit, Action) {
        let visit = self.next_visit;
        self.next_visit += 1;

        let (screen, action) = Screen::open(route, session);
        debug!("🧭 Opened {:?} as page #{}", route, visit);
        self.pages.push(Page { visit, screen });
        (visit, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthResponse, HistoryEntry};
    use crate::screen::{auth, history, home, ApiCall};
    use crate::session::{MemorySessionStore, UserId};

    #[test]
    fn test_start_without_session_lands_on_auth() {
        let session = MemorySessionStore::new();
        let (navigator, _, action) = Navigator::start(&session);
        assert_eq!(navigator.routes(), vec![Route::Auth]);
        assert_eq!(action, Action::Call(ApiCall::Ping));
    }

    #[test]
    fn test_start_with_session_lands_on_home() {
        let session = MemorySessionStore::signed_in(UserId(42));
        let (navigator, _, action) = Navigator::start(&session);
        assert_eq!(navigator.routes(), vec![Route::Home]);
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_login_scenario_replaces_auth_with_home() {
        let session = MemorySessionStore::new();
        let (mut navigator, visit, _) = Navigator::start(&session);

        for message in [
            auth::Message::EmailChanged("a@b.com".to_string()),
            auth::Message::PasswordChanged("x".to_string()),
        ] {
            navigator.dispatch(visit, Message::Auth(message), &session);
        }
        let action = navigator
            .dispatch(visit, Message::Auth(auth::Message::Submit), &session)
            .unwrap();
        assert!(matches!(action, Action::Call(ApiCall::Login(_))));

        let response = AuthResponse {
            message: "ok".to_string(),
            user_id: UserId(42),
        };
        let completed = Message::Auth(auth::Message::Completed(Ok(response)));
        let action = navigator.dispatch(visit, completed, &session).unwrap();
        let Action::Navigate(navigation) = action else {
            panic!("expected navigation, got {:?}", action);
        };
        navigator.navigate(navigation, &session);

        assert_eq!(session.get().unwrap(), Some(UserId(42)));
        // Auth is gone: nothing to go back to
        assert_eq!(navigator.routes(), vec![Route::Home]);
    }

    #[test]
    fn test_history_round_trip_refocuses_home() {
        let session = MemorySessionStore::signed_in(UserId(42));
        let (mut navigator, home_visit, _) = Navigator::start(&session);

        let (history_visit, action) =
            navigator.navigate(Navigation::Push(Route::History), &session);
        assert_eq!(action, Action::Call(ApiCall::History(UserId(42))));
        assert_eq!(navigator.routes(), vec![Route::Home, Route::History]);

        let (visit, action) = navigator.navigate(Navigation::Back, &session);
        assert_eq!(visit, home_visit);
        assert_eq!(action, Action::None);

        // The history response arrives after the page was closed
        let entries: Vec<HistoryEntry> = Vec::new();
        let late = navigator.dispatch(
            history_visit,
            Message::History(history::Message::Loaded(Ok(entries))),
            &session,
        );
        assert!(late.is_none());
    }

    #[test]
    fn test_back_to_home_after_logout_elsewhere_redirects() {
        let session = MemorySessionStore::signed_in(UserId(42));
        let (mut navigator, _, _) = Navigator::start(&session);
        navigator.navigate(Navigation::Push(Route::History), &session);

        session.clear().unwrap();
        navigator.navigate(Navigation::Back, &session);
        assert_eq!(navigator.routes(), vec![Route::Auth]);
    }

    #[test]
    fn test_logout_then_home_redirects_to_auth() {
        let session = MemorySessionStore::signed_in(UserId(42));
        let (mut navigator, visit, _) = Navigator::start(&session);

        let action = navigator
            .dispatch(visit, Message::Home(home::Message::Logout), &session)
            .unwrap();
        let Action::Navigate(navigation) = action else {
            panic!("expected navigation, got {:?}", action);
        };
        navigator.navigate(navigation, &session);
        assert_eq!(navigator.routes(), vec![Route::Auth]);
        assert_eq!(session.get().unwrap(), None);

        // Trying to open Home again falls through to Auth
        navigator.navigate(Navigation::Reset(Route::Home), &session);
        assert_eq!(navigator.routes(), vec![Route::Auth]);
    }

    #[test]
    fn test_covered_home_still_receives_results() {
        let session = MemorySessionStore::signed_in(UserId(42));
        let (mut navigator, home_visit, _) = Navigator::start(&session);
        navigator.navigate(Navigation::Push(Route::History), &session);

        let delivered = navigator.dispatch(
            home_visit,
            Message::Home(home::Message::Acquired(Ok(None))),
            &session,
        );
        assert_eq!(delivered, Some(Action::None));
    }
}
