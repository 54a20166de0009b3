//! Labelled form fields

use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{column, text, text_input};
use iced::{Element, Length};

/// Single-line input with the shared input style
pub fn input<'a>(
    placeholder: &str,
    value: &str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .on_input(on_change)
        .padding(8)
        .size(14)
        .width(Length::Fill)
        .style(iced::theme::TextInput::Custom(Box::new(theme::InputStyle)))
        .into()
}

/// Small caption above a widget
pub fn labelled<'a>(label: &str, widget: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![
        text(label.to_string()).size(12).style(theme::TEXT_SECONDARY),
        widget.into()
    ]
    .spacing(4)
    .width(Length::Fill)
    .into()
}
