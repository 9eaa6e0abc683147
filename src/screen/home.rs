use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Image};
use iced::{Element, Length};
use tracing::{info, warn};

use super::{Action, ApiCall, Navigation, Route};
use crate::api::{ApiResult, PredictionRecord};
use crate::capture::{ImageRef, ImageSource};
use crate::session::{require_session, SessionStore, UserId};
use crate::ui;

/// What the screen is busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Acquiring,
    Predicting,
}

#[derive(Debug, Clone)]
pub enum Message {
    PickFromGallery,
    TakePhoto,
    Acquired(Result<Option<ImageRef>, String>),
    Predict,
    Predicted(ApiResult<PredictionRecord>),
    ShowHistory,
    Logout,
}

/// Main screen: choose a photo, send it off, show the diagnosis
#[derive(Debug)]
pub struct HomeScreen {
    user_id: Option<UserId>,
    image: Option<ImageRef>,
    result: Option<PredictionRecord>,
    activity: Activity,
}

impl HomeScreen {
    pub fn new() -> Self {
        HomeScreen {
            user_id: None,
            image: None,
            result: None,
            activity: Activity::Idle,
        }
    }

    /// Entry logic, run on every visit: no session means back to sign-in
    pub fn focus(&mut self, session: &dyn SessionStore) -> Action {
        match require_session(session) {
            Some(user_id) => {
                self.user_id = Some(user_id);
                Action::None
            }
            None => {
                self.user_id = None;
                Action::Navigate(Navigation::Reset(Route::Auth))
            }
        }
    }

    /// Prediction needs a session, a photo, and nothing else running
    pub fn can_predict(&self) -> bool {
        self.user_id.is_some() && self.image.is_some() && self.activity == Activity::Idle
    }

    pub fn can_acquire(&self) -> bool {
        self.activity == Activity::Idle
    }

    pub fn update(&mut self, message: Message, session: &dyn SessionStore) -> Action {
        match message {
            Message::PickFromGallery => self.acquire(ImageSource::Gallery),
            Message::TakePhoto => self.acquire(ImageSource::Camera),
            Message::Acquired(outcome) => {
                if self.activity != Activity::Acquiring {
                    return Action::None;
                }
                self.activity = Activity::Idle;

                match outcome {
                    Ok(Some(image)) => {
                        self.image = Some(image);
                        self.result = None;
                        Action::None
                    }
                    Ok(None) => Action::None,
                    Err(message) => Action::Alert(message),
                }
            }
            Message::Predict => {
                if !self.can_predict() {
                    return Action::None;
                }
                let Some(user_id) = require_session(session) else {
                    self.user_id = None;
                    return Action::Navigate(Navigation::Reset(Route::Auth));
                };
                let Some(image) = self.image.clone() else {
                    return Action::None;
                };

                self.user_id = Some(user_id);
                self.activity = Activity::Predicting;
                Action::Call(ApiCall::Predict { user_id, image })
            }
            Message::Predicted(outcome) => {
                if self.activity != Activity::Predicting {
                    return Action::None;
                }
                self.activity = Activity::Idle;

                match outcome {
                    Ok(record) => {
                        info!(
                            "🌿 Prediction {}: {} ({})",
                            record.prediction_id,
                            record.class_name,
                            crate::api::types::format_confidence(record.confidence)
                        );
                        self.result = Some(record);
                        Action::None
                    }
                    Err(e) => Action::Alert(e.to_string()),
                }
            }
            Message::ShowHistory => Action::Navigate(Navigation::Push(Route::History)),
            Message::Logout => match session.clear() {
                Ok(()) => {
                    info!("👋 Signed out");
                    Action::Navigate(Navigation::Reset(Route::Auth))
                }
                Err(e) => {
                    warn!("⚠️  Could not clear session: {}", e);
                    Action::Alert(format!("Could not sign out: {}", e))
                }
            },
        }
    }

    fn acquire(&mut self, source: ImageSource) -> Action {
        if !self.can_acquire() {
            return Action::None;
        }
        self.activity = Activity::Acquiring;
        Action::Acquire(source)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let acquire_enabled = self.can_acquire();
        let pickers = row![
            button(text("Choose from Gallery"))
                .on_press_maybe(acquire_enabled.then_some(Message::PickFromGallery))
                .width(Length::Fill)
                .padding(12),
            button(text("Take Photo"))
                .on_press_maybe(acquire_enabled.then_some(Message::TakePhoto))
                .width(Length::Fill)
                .padding(12),
        ]
        .spacing(10);

        let preview: Element<'_, Message> = match &self.image {
            Some(image) => Image::<Handle>::new(Handle::from_path(&image.uri))
                .width(Length::Fill)
                .height(Length::Fixed(260.0))
                .into(),
            None => text("Choose or take a photo of a leaf.").size(14).into(),
        };

        let predict_label = match self.activity {
            Activity::Predicting => "Analyzing...",
            _ => "Diagnose",
        };
        let predict = button(text(predict_label))
            .on_press_maybe(self.can_predict().then_some(Message::Predict))
            .width(Length::Fill)
            .padding(14);

        let result: Option<Element<'_, Message>> = self.result.as_ref().map(|record| {
            ui::prediction_card(
                Some("Result"),
                &record.class_name,
                record.confidence,
                &record.created_at,
            )
        });

        let footer = row![
            button(text("History"))
                .on_press(Message::ShowHistory)
                .style(button::secondary)
                .width(Length::Fill)
                .padding(12),
            button(text("Log Out"))
                .on_press(Message::Logout)
                .style(button::secondary)
                .width(Length::Fill)
                .padding(12),
        ]
        .spacing(10);

        let content = column![text("Home").size(26), pickers, preview, predict]
            .push_maybe(result)
            .push(footer)
            .spacing(12)
            .padding(16);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}
