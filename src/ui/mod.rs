//! Shared view pieces
//!
//! - Prediction cards used by Home and History (card.rs)
//! - Blocking error alerts (alert.rs)

pub mod alert;
pub mod card;

pub use alert::show_error;
pub use card::prediction_card;
