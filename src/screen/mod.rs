//! Screens
//!
//! Each screen is a state machine: `update` consumes a message and returns an
//! [`Action`] describing the one side effect to run next (a request, a photo
//! acquisition, a navigation, an alert). The application turns actions into
//! `iced` tasks; screens themselves never touch the network.

pub mod auth;
pub mod history;
pub mod home;

use iced::Element;
use tracing::debug;

use crate::api::Credentials;
use crate::capture::{ImageRef, ImageSource};
use crate::session::{SessionStore, UserId};

pub use auth::AuthScreen;
pub use history::HistoryScreen;
pub use home::HomeScreen;

/// Destinations in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Home,
    History,
}

/// How to move between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the whole stack; nothing behind it can be navigated back to
    Reset(Route),
    /// Open on top of the current screen
    Push(Route),
    /// Close the current screen and focus the one below
    Back,
}

/// One backend request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Ping,
    Register(Credentials),
    Login(Credentials),
    History(UserId),
    Predict { user_id: UserId, image: ImageRef },
}

/// Side effect requested by a screen
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Call(ApiCall),
    Acquire(ImageSource),
    Navigate(Navigation),
    Alert(String),
}

/// Message addressed to whichever screen is showing
#[derive(Debug, Clone)]
pub enum Message {
    Auth(auth::Message),
    Home(home::Message),
    History(history::Message),
}

impl From<auth::Message> for Message {
    fn from(message: auth::Message) -> Self {
        Message::Auth(message)
    }
}

impl From<home::Message> for Message {
    fn from(message: home::Message) -> Self {
        Message::Home(message)
    }
}

impl From<history::Message> for Message {
    fn from(message: history::Message) -> Self {
        Message::History(message)
    }
}

/// A live screen
#[derive(Debug)]
pub enum Screen {
    Auth(AuthScreen),
    Home(HomeScreen),
    History(HistoryScreen),
}

impl Screen {
    /// Create the screen for `route` and run its entry logic
    pub fn open(route: Route, session: &dyn SessionStore) -> (Self, Action) {
        match route {
            Route::Auth => {
                let screen = AuthScreen::new();
                let action = screen.mount();
                (Screen::Auth(screen), action)
            }
            Route::Home => {
                let mut screen = HomeScreen::new();
                let action = screen.focus(session);
                (Screen::Home(screen), action)
            }
            Route::History => {
                let mut screen = HistoryScreen::new();
                let action = screen.focus(session);
                (Screen::History(screen), action)
            }
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Screen::Auth(_) => Route::Auth,
            Screen::Home(_) => Route::Home,
            Screen::History(_) => Route::History,
        }
    }

    /// The screen became visible again
    pub fn focus(&mut self, session: &dyn SessionStore) -> Action {
        match self {
            Screen::Auth(_) => Action::None,
            Screen::Home(screen) => screen.focus(session),
            Screen::History(screen) => screen.focus(session),
        }
    }

    pub fn update(&mut self, message: Message, session: &dyn SessionStore) -> Action {
        match (self, message) {
            (Screen::Auth(screen), Message::Auth(message)) => screen.update(message, session),
            (Screen::Home(screen), Message::Home(message)) => screen.update(message, session),
            (Screen::History(screen), Message::History(message)) => {
                screen.update(message, session)
            }
            (screen, message) => {
                debug!("Dropping {:?} for {:?}", message, screen.route());
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match self {
            Screen::Auth(screen) => screen.view().map(Message::Auth),
            Screen::Home(screen) => screen.view().map(Message::Home),
            Screen::History(screen) => screen.view().map(Message::History),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Auth(_) => "Sign In",
            Screen::Home(_) => "Home",
            Screen::History(_) => "Past Scans",
        }
    }
}
