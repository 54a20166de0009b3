//! Main GUI application

use crate::backend::{BackendCommand, BackendEvent};
use crate::downloader::job::JobEvent;
use crate::downloader::log::LogBuffer;
use crate::downloader::options::{parse_urls, DownloadOptions, Quality};
use crate::gui::clipboard;
use crate::gui::views::download_view::{DownloadForm, NO_SUBTITLES};
use crate::gui::views::{download_view, log_scroll_id, log_view};
use crate::utils::config::{Preferences, DEFAULT_PRESET};
use crate::utils::paths::AppPaths;
use iced::widget::{scrollable, text_editor};
use iced::{Application, Command, Element, Subscription, Theme};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Everything the window needs from startup
pub struct GuiFlags {
    /// Hosts the backend actor; kept alive for the lifetime of the window
    pub runtime: Arc<Runtime>,
    pub commands: mpsc::Sender<BackendCommand>,
    pub events: mpsc::Receiver<BackendEvent>,
    pub paths: AppPaths,
    pub prefs: Preferences,
}

/// Main application state
pub struct EasyApp {
    _runtime: Arc<Runtime>,
    commands: mpsc::Sender<BackendCommand>,
    events: mpsc::Receiver<BackendEvent>,
    paths: AppPaths,
    prefs: Preferences,

    // UI State
    current_view: View,
    urls: text_editor::Content,
    options: DownloadOptions,
    selected_preset: String,
    preset_name: String,
    status_message: String,

    log: LogBuffer,
    running: HashSet<String>,
    downloader: Option<PathBuf>,
}

/// Application view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Download,
    Log,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // URL box
    UrlEdited(text_editor::Action),
    PasteFromClipboard,
    ClearUrls,

    // Options
    FolderChanged(String),
    BrowseFolder,
    AudioOnlyToggled(bool),
    SubtitleSelected(String),
    SponsorBlockToggled(bool),
    QualitySelected(Quality),
    RateLimitChanged(String),
    ProxyChanged(String),
    TemplateChanged(String),

    // Presets
    PresetSelected(String),
    PresetNameChanged(String),
    SavePreset,
    PreferencesSaved(Result<(), String>),

    // Actions
    DownloadPressed,
    UpdatePressed,
    CancelPressed,
    OpenFolder,
    OpenLog,
    ClearLog,

    // View navigation
    SwitchTo(View),

    DialogClosed,

    // System
    Tick, // Drains backend events
}

impl Application for EasyApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = GuiFlags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let GuiFlags {
            runtime,
            commands,
            events,
            paths,
            prefs,
        } = flags;

        let folder = prefs
            .last_folder
            .clone()
            .or_else(|| dirs::download_dir().map(|dir| dir.to_string_lossy().into_owned()))
            .unwrap_or_default();

        let selected_preset = prefs
            .preset_names()
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_PRESET.to_string());

        let app = Self {
            _runtime: runtime,
            commands,
            events,
            paths,
            prefs,
            current_view: View::Download,
            urls: text_editor::Content::new(),
            options: DownloadOptions {
                folder,
                ..Default::default()
            },
            preset_name: String::new(),
            selected_preset,
            status_message: "Looking for yt-dlp...".to_string(),
            log: LogBuffer::default(),
            running: HashSet::new(),
            downloader: None,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("YT-DLP Made Easy")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::UrlEdited(action) => {
                self.urls.perform(action);
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::get_clipboard_content() {
                    Ok(content) => {
                        self.urls = text_editor::Content::with_text(content.trim());
                        self.status_message = "URL pasted from clipboard".to_string();
                    }
                    Err(e) => {
                        self.status_message = e;
                    }
                }
                Command::none()
            }

            Message::ClearUrls => {
                self.urls = text_editor::Content::new();
                Command::none()
            }

            Message::FolderChanged(folder) => {
                self.options.folder = folder;
                Command::none()
            }

            Message::BrowseFolder => {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.options.folder = path.to_string_lossy().into_owned();
                }
                Command::none()
            }

            Message::AudioOnlyToggled(value) => {
                self.options.audio_only = value;
                Command::none()
            }

            Message::SubtitleSelected(choice) => {
                self.options.subtitle_language = (choice != NO_SUBTITLES).then_some(choice);
                Command::none()
            }

            Message::SponsorBlockToggled(value) => {
                self.options.sponsorblock = value;
                Command::none()
            }

            Message::QualitySelected(quality) => {
                self.options.quality = quality;
                Command::none()
            }

            Message::RateLimitChanged(value) => {
                self.options.rate_limit = value;
                Command::none()
            }

            Message::ProxyChanged(value) => {
                self.options.proxy = value;
                Command::none()
            }

            Message::TemplateChanged(value) => {
                self.options.output_template = value;
                Command::none()
            }

            Message::PresetSelected(name) => {
                if let Some(options) = self.prefs.preset(&name) {
                    let folder = std::mem::take(&mut self.options.folder);
                    self.options = options;
                    // presets saved without a folder keep the current one
                    if self.options.folder.trim().is_empty() {
                        self.options.folder = folder;
                    }
                    self.status_message = format!("Preset '{}' applied", name);
                }
                self.selected_preset = name;
                Command::none()
            }

            Message::PresetNameChanged(name) => {
                self.preset_name = name;
                Command::none()
            }

            Message::SavePreset => {
                let name = if self.preset_name.trim().is_empty() {
                    self.selected_preset.clone()
                } else {
                    self.preset_name.trim().to_string()
                };

                match self.prefs.save_preset(&name, self.options.clone()) {
                    Ok(()) => {
                        self.selected_preset = name.clone();
                        self.preset_name.clear();
                        self.status_message = format!("Preset '{}' saved", name);
                        self.save_preferences()
                    }
                    Err(e) => {
                        self.status_message = e.to_string();
                        Command::none()
                    }
                }
            }

            Message::PreferencesSaved(result) => {
                if let Err(e) = result {
                    warn!("Failed to save preferences: {}", e);
                    self.status_message = format!("Failed to save preferences: {}", e);
                }
                Command::none()
            }

            Message::DownloadPressed => {
                let urls = parse_urls(&self.urls.text());
                if urls.is_empty() {
                    self.status_message = "Enter at least one URL".to_string();
                    return Command::none();
                }

                info!("Queueing {} URL(s)", urls.len());
                self.status_message = format!("Starting {} download(s)...", urls.len());
                self.send(BackendCommand::StartDownloads {
                    urls,
                    options: self.options.clone(),
                });

                let folder = self.options.folder.trim();
                if !folder.is_empty() && self.prefs.last_folder.as_deref() != Some(folder) {
                    self.prefs.last_folder = Some(folder.to_string());
                    return self.save_preferences();
                }
                Command::none()
            }

            Message::UpdatePressed => {
                self.send(BackendCommand::UpdateDownloader);
                Command::none()
            }

            Message::CancelPressed => {
                self.send(BackendCommand::CancelAll);
                self.status_message = "Cancelling...".to_string();
                Command::none()
            }

            Message::OpenFolder => {
                let folder = self.options.destination();
                if let Err(e) = open::that(&folder) {
                    self.status_message = format!("Cannot open {}: {}", folder.display(), e);
                }
                Command::none()
            }

            Message::OpenLog => {
                if let Err(e) = open::that(&self.paths.activity_log) {
                    self.status_message = format!("Cannot open log: {}", e);
                }
                Command::none()
            }

            Message::ClearLog => {
                self.log.clear();
                Command::none()
            }

            Message::SwitchTo(view) => {
                self.current_view = view;
                if view == View::Log {
                    return scrollable::snap_to(log_scroll_id(), scrollable::RelativeOffset::END);
                }
                Command::none()
            }

            Message::DialogClosed => Command::none(),

            // System
            Message::Tick => {
                let mut commands = Vec::new();
                let mut new_lines = false;

                while let Ok(event) = self.events.try_recv() {
                    match event {
                        BackendEvent::DownloaderReady(path) => {
                            self.status_message = format!("Using {}", path.display());
                            self.downloader = Some(path);
                        }
                        BackendEvent::DownloaderMissing(error) => {
                            self.status_message = error.clone();
                            commands.push(show_error("Download Failed", error));
                        }
                        BackendEvent::Job(JobEvent::Started { job_id, label }) => {
                            self.running.insert(job_id);
                            self.status_message = format!("Running: {}", label);
                        }
                        BackendEvent::Job(JobEvent::Line { line, .. }) => {
                            self.log.push(line);
                            new_lines = true;
                        }
                        BackendEvent::Job(JobEvent::Finished {
                            job_id,
                            label,
                            outcome,
                        }) => {
                            self.running.remove(&job_id);
                            self.status_message = format!("{} {}", label, outcome.describe());
                        }
                        BackendEvent::Log(line) => {
                            self.log.push(line);
                            new_lines = true;
                        }
                        BackendEvent::ClipboardUrl(url) => {
                            self.urls = text_editor::Content::with_text(&url);
                            self.status_message = "URL pasted from clipboard".to_string();
                        }
                        BackendEvent::Error(error) => {
                            self.status_message = error;
                        }
                    }
                }

                if new_lines && self.current_view == View::Log {
                    commands.push(scrollable::snap_to(
                        log_scroll_id(),
                        scrollable::RelativeOffset::END,
                    ));
                }

                Command::batch(commands)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        use crate::gui::theme;
        use iced::widget::{button, column, container, row, text, Space};
        use iced::Length;

        let tab = |label: &'static str, view: View| {
            button(text(label).size(15))
                .style(iced::theme::Button::Custom(Box::new(
                    if self.current_view == view {
                        theme::TabButton::Active
                    } else {
                        theme::TabButton::Inactive
                    },
                )))
                .padding([8, 20])
                .on_press(Message::SwitchTo(view))
        };

        let tabs = row![
            tab("Download", View::Download),
            tab("Log", View::Log),
            Space::with_width(Length::Fill),
            text(if self.running.is_empty() {
                String::new()
            } else {
                format!("{} running", self.running.len())
            })
            .size(13)
            .style(theme::TEXT_SECONDARY),
        ]
        .spacing(8)
        .align_items(iced::Alignment::Center);

        let content = match self.current_view {
            View::Download => download_view(DownloadForm {
                urls: &self.urls,
                options: &self.options,
                preset_names: self.prefs.preset_names(),
                selected_preset: &self.selected_preset,
                preset_name: &self.preset_name,
                running_jobs: self.running.len(),
                downloader_ready: self.downloader.is_some(),
            }),
            View::Log => log_view(&self.log),
        };

        let status_bar = text(&self.status_message)
            .size(13)
            .style(theme::TEXT_SECONDARY);

        container(
            column![
                tabs,
                container(content).width(Length::Fill).height(Length::Fill),
                status_bar
            ]
            .spacing(12),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(15)
        .style(iced::theme::Container::Custom(Box::new(
            theme::WindowBackground,
        )))
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(100)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Self::Theme {
        Theme::Light
    }
}

impl EasyApp {
    fn send(&mut self, command: BackendCommand) {
        if let Err(e) = self.commands.try_send(command) {
            warn!("Backend did not accept command: {}", e);
            self.status_message = "Background worker is not responding".to_string();
        }
    }

    fn save_preferences(&self) -> Command<Message> {
        let prefs = self.prefs.clone();
        let path = self.paths.prefs_file.clone();
        Command::perform(
            async move { prefs.save(&path).await.map_err(|e| e.to_string()) },
            Message::PreferencesSaved,
        )
    }
}

fn show_error(title: &'static str, description: String) -> Command<Message> {
    Command::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::DialogClosed,
    )
}
