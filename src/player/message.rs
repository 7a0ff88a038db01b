//! Modal message box shared by both players.
//!
//! Every failure ends up here: the operation that failed is abandoned, the
//! player returns to idle and the user sees one dialog until they dismiss it.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDialog {
    pub kind: MessageKind,
    pub title: String,
    pub text: String,
}

impl MessageDialog {
    pub fn warning(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            title: title.to_string(),
            text: text.into(),
        }
    }

    pub fn error(title: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        log::error!("{title}: {text}");
        Self {
            kind: MessageKind::Error,
            title: title.to_string(),
            text,
        }
    }

    pub fn info(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            title: title.to_string(),
            text: text.into(),
        }
    }
}
