use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length};
use tracing::debug;

use super::{Action, ApiCall, Navigation, Route};
use crate::api::{ApiResult, HistoryEntry};
use crate::session::{require_session, SessionStore};
use crate::ui;

/// Placeholder shown for an empty history
pub const EMPTY_PLACEHOLDER: &str = "No records.";

/// The list being shown
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// A fetch is in flight; `previous` is restored if it fails
    Loading { previous: Vec<HistoryEntry> },
    Loaded(Vec<HistoryEntry>),
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Loaded(Vec::new())
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(ApiResult<Vec<HistoryEntry>>),
    Refresh,
    Back,
}

/// Past predictions of the signed-in user
#[derive(Debug)]
pub struct HistoryScreen {
    listing: Listing,
}

impl HistoryScreen {
    pub fn new() -> Self {
        HistoryScreen {
            listing: Listing::default(),
        }
    }

    /// Run on every visit: re-read the session and fetch the whole list again
    pub fn focus(&mut self, session: &dyn SessionStore) -> Action {
        let Some(user_id) = require_session(session) else {
            return Action::Navigate(Navigation::Reset(Route::Auth));
        };

        // One fetch at a time; the running one will replace the list
        if self.is_loading() {
            return Action::None;
        }

        let previous = match std::mem::take(&mut self.listing) {
            Listing::Loaded(entries) => entries,
            Listing::Loading { previous } => previous,
        };
        self.listing = Listing::Loading { previous };
        Action::Call(ApiCall::History(user_id))
    }

    /// Entries currently on screen
    pub fn entries(&self) -> &[HistoryEntry] {
        match &self.listing {
            Listing::Loading { previous } => previous,
            Listing::Loaded(entries) => entries,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.listing, Listing::Loading { .. })
    }

    pub fn update(&mut self, message: Message, session: &dyn SessionStore) -> Action {
        match message {
            Message::Loaded(outcome) => {
                let previous = match std::mem::take(&mut self.listing) {
                    Listing::Loading { previous } => previous,
                    Listing::Loaded(entries) => {
                        // Nothing was requested
                        self.listing = Listing::Loaded(entries);
                        return Action::None;
                    }
                };

                match outcome {
                    Ok(entries) => {
                        debug!("📜 Loaded {} history entries", entries.len());
                        self.listing = Listing::Loaded(entries);
                        Action::None
                    }
                    Err(e) => {
                        self.listing = Listing::Loaded(previous);
                        Action::Alert(e.to_string())
                    }
                }
            }
            Message::Refresh => self.focus(session),
            Message::Back => Action::Navigate(Navigation::Back),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            button(text("Back"))
                .on_press(Message::Back)
                .style(button::secondary)
                .padding(10),
            text("Past Scans").size(24).width(Length::Fill),
            button(text("Refresh"))
                .on_press_maybe((!self.is_loading()).then_some(Message::Refresh))
                .padding(10),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center);

        let entries = self.entries();
        let body: Element<'_, Message> = if self.is_loading() && entries.is_empty() {
            text("Loading...").into()
        } else if entries.is_empty() {
            text(EMPTY_PLACEHOLDER).size(14).into()
        } else {
            let cards = entries.iter().fold(Column::new().spacing(10), |cards, entry| {
                cards.push(ui::prediction_card(
                    None,
                    &entry.class_name,
                    entry.confidence,
                    &entry.created_at,
                ))
            });
            scrollable(cards).height(Length::Fill).into()
        };

        container(column![header, body].spacing(16).padding(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Default for HistoryScreen {
    fn default() -> Self {
        Self::new()
    }
}
