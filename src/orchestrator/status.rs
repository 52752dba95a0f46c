//! Status strings published for the transient audio status readout.

/// Visual style of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Playing,
    Error,
}

impl StatusKind {
    /// CSS class applied to the readout element.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub message: String,
    pub kind: StatusKind,
}

impl StatusUpdate {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Full class list of the readout while this status is shown.
    pub fn class_list(&self) -> String {
        format!("audio-status show {}", self.kind.css_class())
    }
}
