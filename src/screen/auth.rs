use iced::widget::{button, column, container, text, text_input};
use iced::{Alignment, Color, Element, Length};
use tracing::{info, warn};

use super::{Action, ApiCall, Navigation, Route};
use crate::api::{ApiResult, AuthResponse, Credentials};
use crate::session::SessionStore;

/// Whether the form signs in or creates an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Login,
    Register,
}

impl Mode {
    fn toggled(self) -> Self {
        match self {
            Mode::Login => Mode::Register,
            Mode::Register => Mode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
}

/// What we know about the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Unknown,
    Online(String),
    Offline(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    PasswordChanged(String),
    ToggleMode,
    Submit,
    Completed(ApiResult<AuthResponse>),
    Pinged(ApiResult<String>),
}

/// Sign-in / registration form
#[derive(Debug)]
pub struct AuthScreen {
    mode: Mode,
    email: String,
    password: String,
    phase: Phase,
    backend: Backend,
}

impl AuthScreen {
    pub fn new() -> Self {
        AuthScreen {
            mode: Mode::Login,
            email: String::new(),
            password: String::new(),
            phase: Phase::Editing,
            backend: Backend::Unknown,
        }
    }

    /// Entry logic: check whether the backend is reachable
    pub fn mount(&self) -> Action {
        Action::Call(ApiCall::Ping)
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Editing
    }

    pub fn update(&mut self, message: Message, session: &dyn SessionStore) -> Action {
        match message {
            Message::EmailChanged(email) => {
                self.email = email;
                Action::None
            }
            Message::PasswordChanged(password) => {
                self.password = password;
                Action::None
            }
            Message::ToggleMode => {
                self.mode = self.mode.toggled();
                Action::None
            }
            Message::Submit => {
                if !self.can_submit() {
                    return Action::None;
                }
                self.phase = Phase::Submitting;

                let credentials = Credentials {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                Action::Call(match self.mode {
                    Mode::Login => ApiCall::Login(credentials),
                    Mode::Register => ApiCall::Register(credentials),
                })
            }
            Message::Completed(result) => {
                self.phase = Phase::Editing;
                match result {
                    Ok(response) => match session.set(response.user_id) {
                        Ok(()) => {
                            info!("🔑 Signed in as user {}", response.user_id);
                            Action::Navigate(Navigation::Reset(Route::Home))
                        }
                        Err(e) => {
                            warn!("⚠️  Could not store session: {}", e);
                            Action::Alert(format!("Could not save session: {}", e))
                        }
                    },
                    Err(e) => Action::Alert(e.to_string()),
                }
            }
            Message::Pinged(result) => {
                self.backend = match result {
                    Ok(message) => Backend::Online(message),
                    Err(e) => Backend::Offline(e.to_string()),
                };
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let (submit_label, toggle_label) = match self.mode {
            Mode::Login => ("Sign In", "No account yet? Register"),
            Mode::Register => ("Create Account", "Already registered? Sign in"),
        };
        let submit_label = if self.phase == Phase::Submitting {
            "Please wait..."
        } else {
            submit_label
        };

        let email = text_input("Email", &self.email)
            .on_input(Message::EmailChanged)
            .on_submit(Message::Submit)
            .padding(12);

        let password = text_input("Password", &self.password)
            .on_input(Message::PasswordChanged)
            .on_submit(Message::Submit)
            .secure(true)
            .padding(12);

        let submit = button(text(submit_label))
            .on_press_maybe(self.can_submit().then_some(Message::Submit))
            .width(Length::Fill)
            .padding(14);

        let toggle = button(text(toggle_label).size(14))
            .on_press(Message::ToggleMode)
            .style(button::text);

        let status = match &self.backend {
            Backend::Unknown => text("Checking server...").size(12),
            Backend::Online(message) => text(format!("Server: {}", message))
                .size(12)
                .color(Color::from_rgb(0.2, 0.6, 0.3)),
            Backend::Offline(message) => text(format!("Server unreachable: {}", message))
                .size(12)
                .color(Color::from_rgb(0.8, 0.3, 0.3)),
        };

        let content = column![
            text("Plant Doctor").size(32),
            email,
            password,
            submit,
            toggle,
            status,
        ]
        .spacing(12)
        .max_width(420)
        .align_x(Alignment::Center);

        container(content)
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self::new()
    }
}
