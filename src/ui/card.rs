use iced::widget::{column, container, text, Column};
use iced::{Element, Length};

use crate::api::types::{display_timestamp, format_confidence};

/// Text lines of a prediction card: class name, confidence, local timestamp
pub fn card_lines(class_name: &str, confidence: f64, created_at: &str) -> [String; 3] {
    [
        class_name.to_string(),
        format!("Confidence: {}", format_confidence(confidence)),
        display_timestamp(created_at),
    ]
}

/// Bordered card showing one prediction
pub fn prediction_card<'a, Message: 'a>(
    heading: Option<&'a str>,
    class_name: &str,
    confidence: f64,
    created_at: &str,
) -> Element<'a, Message> {
    let [class_line, confidence_line, time_line] = card_lines(class_name, confidence, created_at);

    let body: Column<'a, Message> = Column::new()
        .push_maybe(heading.map(|heading| text(heading).size(18)))
        .push(column![
            text(class_line).size(16),
            text(confidence_line),
            text(time_line).size(12),
        ]
        .spacing(4))
        .spacing(6);

    container(body)
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
