//! Download tab: URL box, options grid, presets and actions

use crate::downloader::options::{DownloadOptions, Quality, SUBTITLE_LANGUAGES};
use crate::gui::app::Message;
use crate::gui::components::{input, labelled, url_input};
use crate::gui::theme;
use iced::widget::{button, checkbox, column, container, pick_list, row, text, text_editor};
use iced::{Alignment, Element, Length};

/// Picker entry meaning "no subtitles"
pub const NO_SUBTITLES: &str = "None";

/// Entries of the subtitle picker
pub fn subtitle_choices() -> Vec<String> {
    std::iter::once(NO_SUBTITLES)
        .chain(SUBTITLE_LANGUAGES)
        .map(String::from)
        .collect()
}

/// Everything the download tab shows
pub struct DownloadForm<'a> {
    pub urls: &'a text_editor::Content,
    pub options: &'a DownloadOptions,
    pub preset_names: Vec<String>,
    pub selected_preset: &'a str,
    pub preset_name: &'a str,
    pub running_jobs: usize,
    pub downloader_ready: bool,
}

pub fn download_view(form: DownloadForm<'_>) -> Element<'_, Message> {
    let options = form.options;

    let folder_row = row![
        labelled(
            "Save To",
            input("Current folder", &options.folder, Message::FolderChanged)
        ),
        button(text("Browse").size(14))
            .on_press(Message::BrowseFolder)
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(10)
    .align_items(Alignment::End);

    let subtitle = options
        .subtitle_language
        .clone()
        .filter(|lang| !lang.trim().is_empty())
        .unwrap_or_else(|| NO_SUBTITLES.to_string());

    let toggles_row = row![
        checkbox("Audio Only (mp3)", options.audio_only)
            .on_toggle(Message::AudioOnlyToggled)
            .width(Length::Fill),
        labelled(
            "Subtitles",
            pick_list(subtitle_choices(), Some(subtitle), Message::SubtitleSelected)
                .text_size(14)
                .width(Length::Fill),
        ),
        checkbox("Skip SponsorBlock", options.sponsorblock)
            .on_toggle(Message::SponsorBlockToggled)
            .width(Length::Fill),
    ]
    .spacing(16)
    .align_items(Alignment::Center);

    let network_row = row![
        labelled(
            "Quality",
            pick_list(&Quality::ALL[..], Some(options.quality), Message::QualitySelected)
                .text_size(14)
                .width(Length::Fill),
        ),
        labelled(
            "Rate limit",
            input("Rate e.g. 500K", &options.rate_limit, Message::RateLimitChanged)
        ),
        labelled(
            "Proxy",
            input("Proxy URL", &options.proxy, Message::ProxyChanged)
        ),
    ]
    .spacing(16);

    let preset_row = row![
        labelled(
            "Output template",
            input(
                "%(title)s.%(ext)s",
                &options.output_template,
                Message::TemplateChanged
            )
        ),
        labelled(
            "Preset",
            pick_list(
                form.preset_names,
                Some(form.selected_preset.to_string()),
                Message::PresetSelected
            )
            .text_size(14)
            .width(Length::Fill),
        ),
        labelled(
            "Preset name",
            input(form.selected_preset, form.preset_name, Message::PresetNameChanged)
        ),
        button(text("Save Preset").size(14))
            .on_press(Message::SavePreset)
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
    ]
    .spacing(16)
    .align_items(Alignment::End);

    let settings = container(column![folder_row, toggles_row, network_row, preset_row].spacing(16))
        .padding(16)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(theme::Panel)));

    let download_button = button(text("Download").size(15))
        .on_press_maybe(form.downloader_ready.then_some(Message::DownloadPressed))
        .padding([10, 24])
        .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton)));

    let cancel_button = button(text("Cancel").size(15))
        .on_press_maybe((form.running_jobs > 0).then_some(Message::CancelPressed))
        .padding([10, 24])
        .style(iced::theme::Button::Custom(Box::new(theme::DestructiveButton)));

    let actions = row![
        download_button,
        button(text("Update yt-dlp").size(15))
            .on_press(Message::UpdatePressed)
            .padding([10, 24])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
        button(text("Open Folder").size(15))
            .on_press(Message::OpenFolder)
            .padding([10, 24])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
        cancel_button,
    ]
    .spacing(12);

    column![
        container(url_input(form.urls))
            .padding(16)
            .width(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(theme::Panel))),
        settings,
        container(actions).width(Length::Fill).center_x(),
    ]
    .spacing(16)
    .width(Length::Fill)
    .into()
}
