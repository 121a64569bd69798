// SPDX-License-Identifier: MPL-2.0
//! Render-neutral description of toasts.
//!
//! Toasts appear as small cards with kind-colored accents, an icon and an
//! optional dismiss control. This module only computes *what* to draw; the
//! host toolkit decides how.

use super::notification::{Kind, NotificationId, NotificationRecord, RemovalState};
use std::fmt;

/// Viewport width (logical pixels) below which toasts use the mobile layout.
pub const MOBILE_BREAKPOINT: f32 = 640.0;

/// Card width in the desktop layout.
pub const TOAST_WIDTH: f32 = 320.0;

/// Where the toast stack is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Bottom-right corner, stacked upwards, fixed card width.
    Desktop,
    /// Top edge, full width.
    Mobile,
}

/// Screen edge or corner the toast stack is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopCenter,
    BottomRight,
}

/// Placement of the toast stack for a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Where the stack starts.
    pub anchor: Anchor,
    /// `None` means the full available width.
    pub width: Option<f32>,
}

impl Region {
    /// Picks the layout for a viewport `width` in logical pixels.
    #[must_use]
    pub fn for_viewport_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Region::Mobile
        } else {
            Region::Desktop
        }
    }

    /// Returns where and how wide the stack is drawn.
    #[must_use]
    pub fn placement(&self) -> Placement {
        match self {
            Region::Desktop => Placement {
                anchor: Anchor::BottomRight,
                width: Some(TOAST_WIDTH),
            },
            Region::Mobile => Placement {
                anchor: Anchor::TopCenter,
                width: None,
            },
        }
    }
}

/// Icon shown next to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Checkmark,
    Info,
    Warning,
    Error,
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS-style `#rrggbb`.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Accent colors, one per kind.
pub mod palette {
    use super::Rgb;

    pub const SUCCESS_500: Rgb = Rgb(67, 179, 103);
    pub const INFO_500: Rgb = Rgb(100, 150, 255);
    pub const WARNING_500: Rgb = Rgb(241, 166, 32);
    pub const ERROR_500: Rgb = Rgb(229, 57, 53);
}

impl Kind {
    /// Returns the icon shown for this kind.
    #[must_use]
    pub fn icon(&self) -> Icon {
        match self {
            Kind::Success => Icon::Checkmark,
            Kind::Info => Icon::Info,
            Kind::Warning => Icon::Warning,
            Kind::Error => Icon::Error,
        }
    }

    /// Accent color for the card border.
    #[must_use]
    pub fn accent(&self) -> Rgb {
        match self {
            Kind::Success => palette::SUCCESS_500,
            Kind::Info => palette::INFO_500,
            Kind::Warning => palette::WARNING_500,
            Kind::Error => palette::ERROR_500,
        }
    }
}

/// Everything needed to draw one toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    /// Id to send back with `Message::Dismiss` or `Message::ActionClicked`.
    pub id: NotificationId,
    pub kind: Kind,
    pub title: String,
    pub message: Option<String>,
    pub icon: Icon,
    pub accent: Rgb,
    /// Remaining countdown share, `None` when there is no running countdown.
    pub countdown: Option<f32>,
    /// Whether the dismiss control should react.
    pub dismissible: bool,
    /// Label of the action button, if any.
    pub action_label: Option<String>,
    /// Lifecycle state, for enter and exit animations.
    pub state: RemovalState,
    /// `HH:MM` of the push time, in UTC.
    pub timestamp: String,
}

impl ToastView {
    /// Builds the view for `record` with its last reported countdown `progress`.
    #[must_use]
    pub fn from_record(record: &NotificationRecord, progress: Option<f32>) -> Self {
        let kind = record.kind();
        Self {
            id: record.id(),
            kind,
            title: record.title().to_string(),
            message: record.message().map(str::to_string),
            icon: kind.icon(),
            accent: kind.accent(),
            countdown: progress.map(|p| p.clamp(0.0, 1.0)),
            dismissible: record.removal_state().is_dismissable(),
            action_label: record.action().map(|action| action.label().to_string()),
            state: record.removal_state(),
            timestamp: record.timestamp().format("%H:%M").to_string(),
        }
    }
}
