//! Inline keyboard construction for the format picker.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config::keyboard as kb;
use crate::core::utils::truncate_chars;
use crate::download::formats::DisplayFormat;

/// Callback data prefix for format choices.
pub const CALLBACK_PREFIX: &str = "ytdl:";

/// Callback data of the cancel button.
pub const CANCEL_DATA: &str = "ytdl:cancel";

/// Builds the picker keyboard: two buttons per row, capped at
/// `MAX_FORMAT_BUTTONS` formats, with a trailing Cancel row.
pub fn format_keyboard(formats: &[DisplayFormat]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let mut row: Vec<InlineKeyboardButton> = Vec::new();

    for format in formats.iter().take(kb::MAX_FORMAT_BUTTONS) {
        let label = truncate_chars(&format.label, kb::MAX_LABEL_CHARS);
        row.push(InlineKeyboardButton::callback(
            label,
            format!("{}{}", CALLBACK_PREFIX, format.format_id),
        ));
        if row.len() == kb::BUTTONS_PER_ROW {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }

    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", CANCEL_DATA.to_string())]);

    InlineKeyboardMarkup::new(rows)
}

/// Extracts the format id from picker callback data.
pub fn parse_callback(data: &str) -> Option<&str> {
    data.strip_prefix(CALLBACK_PREFIX).filter(|rest| !rest.is_empty())
}
