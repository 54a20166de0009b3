//! Multi-line URL box

use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{button, column, row, text, text_editor, tooltip, Space};
use iced::{Alignment, Element, Length};

/// URL editor with Paste and Clear buttons
pub fn url_input(content: &text_editor::Content) -> Element<'_, Message> {
    let header = row![
        text("Enter video URLs (one per line):")
            .size(14)
            .style(theme::TEXT_PRIMARY),
        Space::with_width(Length::Fill),
        tooltip(
            button(text("Paste").size(13))
                .on_press(Message::PasteFromClipboard)
                .padding([4, 10])
                .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            "Paste from clipboard",
            tooltip::Position::Bottom,
        ),
        button(text("Clear").size(13))
            .on_press(Message::ClearUrls)
            .padding([4, 10])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(8)
    .align_items(Alignment::Center);

    column![
        header,
        text_editor(content)
            .on_action(Message::UrlEdited)
            .height(Length::Fixed(100.0))
            .padding(10),
    ]
    .spacing(8)
    .into()
}
