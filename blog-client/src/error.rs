use crate::api::{self, FieldErrors};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Server rejected the submission: {}", .0.summary())]
    Rejected(FieldErrors),

    #[error("Server reported a failure")]
    Failed,

    #[error("Request failed")]
    Transport(#[source] anyhow::Error),

    #[error("Could not understand the server response")]
    Malformed(#[from] api::Error),

    #[error("Missing element {0:?}")]
    MissingElement(String),

    #[error("Element {element:?} has no {attribute:?} attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("DOM operation failed")]
    Dom(#[source] anyhow::Error),

    #[error("A request for this form is already in flight")]
    InFlight,
}

impl Error {
    pub fn missing_element(what: impl Into<String>) -> Error {
        Error::MissingElement(what.into())
    }

    pub fn missing_attribute(element: impl Into<String>, attribute: &'static str) -> Error {
        Error::MissingAttribute {
            element: element.into(),
            attribute,
        }
    }

    /// Whether the user should be told about this failure
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Error::Rejected(_) | Error::Failed | Error::Transport(_) | Error::Malformed(_)
        )
    }
}
