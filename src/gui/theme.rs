#![allow(clippy::approx_constant)]

//! Stylesheets for the light theme

use iced::widget::{button, container, scrollable, text_input};
use iced::{Background, Border, Color, Gradient, Shadow, Theme, Vector};

// --- Palette ---

// Window background gradient, warm white to rose
pub const BACKGROUND_START: Color = Color::from_rgb(0.996, 0.984, 0.976);
pub const BACKGROUND_END: Color = Color::from_rgb(0.992, 0.937, 0.937);

// Accent - red, like the player bar
pub const RED_600: Color = Color::from_rgb(0.863, 0.149, 0.149);
pub const RED_500: Color = Color::from_rgb(0.937, 0.267, 0.267);
pub const RED_100: Color = Color::from_rgb(0.996, 0.886, 0.886);
pub const ROSE_50: Color = Color::from_rgb(1.0, 0.945, 0.949);

// Grays for text and borders
pub const GRAY_900: Color = Color::from_rgb(0.067, 0.094, 0.153);
pub const GRAY_800: Color = Color::from_rgb(0.122, 0.161, 0.216);
pub const GRAY_600: Color = Color::from_rgb(0.294, 0.333, 0.388);
pub const GRAY_500: Color = Color::from_rgb(0.420, 0.447, 0.502);
pub const GRAY_400: Color = Color::from_rgb(0.616, 0.639, 0.667);
pub const GRAY_200: Color = Color::from_rgb(0.898, 0.906, 0.922);
pub const GRAY_100: Color = Color::from_rgb(0.953, 0.957, 0.965);

pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const WHITE_90: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.9);

// Log panel, a terminal look
pub const LOG_BACKGROUND: Color = Color::from_rgb(0.094, 0.106, 0.129);
pub const LOG_TEXT: Color = Color::from_rgb(0.851, 0.875, 0.902);

pub const TEXT_PRIMARY: Color = GRAY_800;
pub const TEXT_SECONDARY: Color = GRAY_600;

// --- Containers ---

pub struct WindowBackground;

impl container::StyleSheet for WindowBackground {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Gradient(Gradient::Linear(
                iced::gradient::Linear::new(iced::Radians(2.356)) // 135 degrees
                    .add_stop(0.0, BACKGROUND_START)
                    .add_stop(1.0, BACKGROUND_END),
            ))),
            ..Default::default()
        }
    }
}

pub struct Panel;

impl container::StyleSheet for Panel {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT_PRIMARY),
            background: Some(Background::Color(WHITE_90)),
            border: Border {
                color: GRAY_200,
                width: 1.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
        }
    }
}

pub struct LogPanel;

impl container::StyleSheet for LogPanel {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(LOG_TEXT),
            background: Some(Background::Color(LOG_BACKGROUND)),
            border: Border {
                color: GRAY_900,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }
}

// --- Buttons ---

pub struct PrimaryButton;

impl button::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(RED_600)),
            text_color: WHITE,
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.863, 0.149, 0.149, 0.25),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 6.0,
            },
            shadow_offset: Vector::new(0.0, 0.0),
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(RED_500)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(GRAY_400)),
            shadow: Shadow::default(),
            ..self.active(style)
        }
    }
}

pub struct SecondaryButton;

impl button::StyleSheet for SecondaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(WHITE)),
            text_color: GRAY_800,
            border: Border {
                radius: 8.0.into(),
                color: GRAY_200,
                width: 1.0,
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(GRAY_100)),
            ..self.active(style)
        }
    }
}

pub struct DestructiveButton;

impl button::StyleSheet for DestructiveButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(WHITE)),
            text_color: RED_600,
            border: Border {
                radius: 8.0.into(),
                color: RED_100,
                width: 1.0,
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(RED_100)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            text_color: GRAY_400,
            border: Border {
                color: GRAY_200,
                ..self.active(style).border
            },
            ..self.active(style)
        }
    }
}

/// Tab header buttons
pub enum TabButton {
    Active,
    Inactive,
}

impl button::StyleSheet for TabButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        let (background, text_color) = match self {
            Self::Active => (Some(Background::Color(RED_600)), WHITE),
            Self::Inactive => (None, GRAY_600),
        };
        button::Appearance {
            background,
            text_color,
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        match self {
            Self::Active => self.active(style),
            Self::Inactive => button::Appearance {
                background: Some(Background::Color(ROSE_50)),
                text_color: GRAY_800,
                ..self.active(style)
            },
        }
    }
}

// --- Inputs ---

pub struct InputStyle;

impl text_input::StyleSheet for InputStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(WHITE),
            border: Border {
                radius: 6.0.into(),
                width: 1.0,
                color: GRAY_200,
            },
            icon_color: GRAY_500,
        }
    }

    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        let active = self.active(style);
        text_input::Appearance {
            border: Border {
                color: RED_500,
                ..active.border
            },
            ..active
        }
    }

    fn placeholder_color(&self, _style: &Self::Style) -> Color {
        GRAY_400
    }

    fn value_color(&self, _style: &Self::Style) -> Color {
        GRAY_800
    }

    fn selection_color(&self, _style: &Self::Style) -> Color {
        Color::from_rgba(0.937, 0.267, 0.267, 0.3)
    }

    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(GRAY_100),
            ..self.active(style)
        }
    }

    fn disabled_color(&self, _style: &Self::Style) -> Color {
        GRAY_400
    }
}

// --- Scrollables ---

pub struct LogScrollable;

impl scrollable::StyleSheet for LogScrollable {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> scrollable::Appearance {
        scrollable::Appearance {
            container: container::Appearance::default(),
            scrollbar: scrollable::Scrollbar {
                background: Some(Background::Color(Color::TRANSPARENT)),
                border: Border::default(),
                scroller: scrollable::Scroller {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.25),
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                },
            },
            gap: None,
        }
    }

    fn hovered(
        &self,
        style: &Self::Style,
        is_mouse_over_scrollbar: bool,
    ) -> scrollable::Appearance {
        let active = self.active(style);
        if !is_mouse_over_scrollbar {
            return active;
        }
        scrollable::Appearance {
            scrollbar: scrollable::Scrollbar {
                scroller: scrollable::Scroller {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.45),
                    ..active.scrollbar.scroller
                },
                ..active.scrollbar
            },
            ..active
        }
    }
}
