use serde::{Deserialize, Serialize};

/// Identifier of a notification. Allocated from 1 upwards and never reused.
pub type NotificationId = u32;

/// Version of the desktop notifications protocol this daemon implements.
pub const SPEC_VERSION: &str = "1.2";

/// Capabilities reported by `GetCapabilities`.
pub const CAPABILITIES: &[&str] = &[
    "action-icons",
    "actions",
    "body",
    "body-hyperlinks",
    "body-markup",
    "icon-static",
    "persistence",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Urgency {
    Low = 0,
    #[default]
    Normal = 1,
    Critical = 2,
}

impl Urgency {
    /// Maps a raw hint value to an urgency. Out-of-range values fall back to `Normal`.
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Urgency::Low,
            2 => Urgency::Critical,
            _ => Urgency::Normal,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Why a notification left the active set. The discriminant is the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CloseReason {
    Expired = 1,
    #[default]
    DismissedByUser = 2,
    ClosedByRequest = 3,
    Undefined = 4,
}

impl CloseReason {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(CloseReason::Expired),
            2 => Some(CloseReason::DismissedByUser),
            3 => Some(CloseReason::ClosedByRequest),
            4 => Some(CloseReason::Undefined),
            _ => None,
        }
    }
}

/// Raw pixel payload of the `image-data` hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub width: i32,
    pub height: i32,
    pub rowstride: i32,
    pub has_alpha: bool,
    pub bits_per_sample: i32,
    pub channels: i32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationImage {
    Pixels(ImageData),
    /// A file path, `file://` URI or icon name.
    Path(String),
}

/// The recognized subset of a notification's hints. Unknown keys are dropped by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hints {
    pub urgency: Urgency,
    /// Action keys should be rendered as icon names.
    pub action_icons: bool,
    /// Progress in percent, clamped to 0..=100.
    pub value: Option<u8>,
    pub image: Option<NotificationImage>,
    pub category: Option<String>,
    pub desktop_entry: Option<String>,
    pub transient: bool,
}

/// Arguments of a `Notify` call after hint decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationInput {
    pub app_name: String,
    pub replaces_id: NotificationId,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    /// Flat list of alternating action keys and labels.
    pub actions: Vec<String>,
    pub hints: Hints,
    /// Milliseconds. Negative never expires, zero expires immediately.
    pub expire_timeout: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInformation {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
}

impl ServerInformation {
    pub fn current() -> Self {
        Self {
            name: "novade-notifyd".to_string(),
            vendor: "NovaDE".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            spec_version: SPEC_VERSION.to_string(),
        }
    }
}
