use eframe::egui::{Color32, Visuals};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub(in crate::app) fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub(in crate::app) fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(in crate::app) fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::LIGHT,
            Self::Dark => Palette::DARK,
        }
    }

    pub(in crate::app) fn visuals(self) -> Visuals {
        match self {
            Self::Light => Visuals::light(),
            Self::Dark => Visuals::dark(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct Palette {
    pub(in crate::app) background: Color32,
    pub(in crate::app) foreground: Color32,
    pub(in crate::app) primary: Color32,
    pub(in crate::app) muted_foreground: Color32,
    pub(in crate::app) border: Color32,
}

impl Palette {
    pub(in crate::app) const LIGHT: Self = Self {
        background: Color32::from_rgb(0xe7, 0xe5, 0xe4),
        foreground: Color32::from_rgb(0x1e, 0x29, 0x3b),
        primary: Color32::from_rgb(0x06, 0x9e, 0xb9),
        muted_foreground: Color32::from_rgb(0x6b, 0x72, 0x80),
        border: Color32::from_rgb(0xd6, 0xd3, 0xd1),
    };

    pub(in crate::app) const DARK: Self = Self {
        background: Color32::from_rgb(0x1e, 0x1b, 0x18),
        foreground: Color32::from_rgb(0xe2, 0xe8, 0xf0),
        primary: Color32::from_rgb(0x07, 0xb7, 0xd6),
        muted_foreground: Color32::from_rgb(0x9c, 0xa3, 0xaf),
        border: Color32::from_rgb(0x3a, 0x36, 0x33),
    };
}
