//! Log tab: yt-dlp output as it arrives

use crate::downloader::log::LogBuffer;
use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Element, Font, Length};

pub fn log_scroll_id() -> scrollable::Id {
    scrollable::Id::new("activity-log")
}

pub fn log_view(log: &LogBuffer) -> Element<'_, Message> {
    let body = if log.is_empty() {
        text("Nothing yet. Output from yt-dlp shows up here.")
            .size(13)
            .style(theme::GRAY_400)
    } else {
        text(log.text()).size(13).font(Font::MONOSPACE)
    };

    let panel = container(
        scrollable(container(body).padding(12).width(Length::Fill))
            .id(log_scroll_id())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Scrollable::Custom(Box::new(theme::LogScrollable))),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(theme::LogPanel)));

    let actions = row![
        text(format!("{} lines", log.len()))
            .size(12)
            .style(theme::TEXT_SECONDARY),
        Space::with_width(Length::Fill),
        button(text("Clear").size(14))
            .on_press(Message::ClearLog)
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
        button(text("Open Log").size(14))
            .on_press(Message::OpenLog)
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(10)
    .align_items(iced::Alignment::Center);

    column![panel, actions]
        .spacing(10)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
