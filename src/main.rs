use iced::widget::text;
use iced::{Element, Task, Theme};
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod app;
mod capture;
mod config;
mod screen;
mod session;
mod ui;

use api::ApiClient;
use app::{Navigator, Visit};
use config::Config;
use screen::{auth, history, home, Action, ApiCall};
use session::{MemorySessionStore, SessionStore, SqliteSessionStore};

/// Main application state
struct PlantDoctor {
    /// Client for the classification backend
    api: ApiClient,
    /// Where the signed-in user id lives; the only state shared by screens
    session: Arc<dyn SessionStore>,
    /// Optional external camera command
    camera_command: Option<String>,
    /// Open screens
    navigator: Navigator,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Message for the page opened as the given visit
    Page(Visit, screen::Message),
}

impl PlantDoctor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::from_env();
        let session = open_session(&config);
        let api = ApiClient::new(config.base_url.clone());
        info!("🌱 Plant Doctor using backend {}", api.base_url());

        let (navigator, visit, action) = Navigator::start(session.as_ref());
        let mut app = PlantDoctor {
            api,
            session,
            camera_command: config.camera_command,
            navigator,
        };
        let task = app.perform(visit, action);

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Page(visit, message) => {
                let session = self.session.as_ref();
                match self.navigator.dispatch(visit, message, session) {
                    Some(action) => self.perform(visit, action),
                    None => Task::none(),
                }
            }
        }
    }

    /// Turn a screen action into work
    fn perform(&mut self, visit: Visit, action: Action) -> Task<Message> {
        match action {
            Action::None => Task::none(),
            Action::Alert(message) => {
                ui::show_error(&message);
                Task::none()
            }
            Action::Navigate(navigation) => {
                let (visit, action) = self.navigator.navigate(navigation, self.session.as_ref());
                self.perform(visit, action)
            }
            Action::Acquire(source) => Task::perform(
                capture::acquire(source, self.camera_command.clone()),
                move |outcome| Message::Page(visit, home::Message::Acquired(outcome).into()),
            ),
            Action::Call(call) => self.call(visit, call),
        }
    }

    /// Issue one backend request; its result goes back to the requesting page
    fn call(&self, visit: Visit, call: ApiCall) -> Task<Message> {
        let api = self.api.clone();

        match call {
            ApiCall::Ping => Task::perform(
                async move { api.ping().await },
                move |result| Message::Page(visit, auth::Message::Pinged(result).into()),
            ),
            ApiCall::Register(credentials) => Task::perform(
                async move { api.register(credentials.email, credentials.password).await },
                move |result| Message::Page(visit, auth::Message::Completed(result).into()),
            ),
            ApiCall::Login(credentials) => Task::perform(
                async move { api.login(credentials.email, credentials.password).await },
                move |result| Message::Page(visit, auth::Message::Completed(result).into()),
            ),
            ApiCall::History(user_id) => Task::perform(
                async move { api.history(user_id).await },
                move |result| Message::Page(visit, history::Message::Loaded(result).into()),
            ),
            ApiCall::Predict { user_id, image } => Task::perform(
                async move { api.predict(user_id, image).await },
                move |result| Message::Page(visit, home::Message::Predicted(result).into()),
            ),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.navigator.current() {
            Some(page) => {
                let visit = page.visit;
                page.screen
                    .view()
                    .map(move |message| Message::Page(visit, message))
            }
            None => text("").into(),
        }
    }

    fn title(&self) -> String {
        match self.navigator.current() {
            Some(page) => format!("Plant Doctor - {}", page.screen.title()),
            None => "Plant Doctor".to_string(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Open the persistent session store, falling back to memory if that fails
fn open_session(config: &Config) -> Arc<dyn SessionStore> {
    let opened = match &config.session_db {
        Some(path) => SqliteSessionStore::open(path),
        None => SqliteSessionStore::open_default(),
    };

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(
                "⚠️  Session database unavailable ({}), sessions will not survive a restart",
                e
            );
            Arc::new(MemorySessionStore::new())
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt().with_target(false).init();

    iced::application(PlantDoctor::title, PlantDoctor::update, PlantDoctor::view)
        .theme(PlantDoctor::theme)
        .window_size((480.0, 760.0))
        .centered()
        .run_with(PlantDoctor::new)
}
