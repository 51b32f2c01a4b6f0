use std::{collections::BTreeMap, fmt};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    /// Id of the element rendering this comment
    pub fn element_id(&self) -> String {
        format!("comment-{}", self.0)
    }

    /// Id of the reply form attached to this comment
    pub fn reply_form_id(&self) -> String {
        format!("reply-form-{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field name to list of messages, as the server's form validation reports it
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|msgs| msgs.is_empty())
    }

    /// One `field: message` line per message, fields in name order
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Answer to a comment creation, reply or edit
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentResponse {
    pub success: bool,

    /// Rendered comment, for creations and replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// New text of the comment, for edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

impl CommentResponse {
    pub fn created(html: String) -> CommentResponse {
        CommentResponse {
            success: true,
            html: Some(html),
            content: None,
            errors: FieldErrors::default(),
        }
    }

    pub fn edited(content: String) -> CommentResponse {
        CommentResponse {
            success: true,
            html: None,
            content: Some(content),
            errors: FieldErrors::default(),
        }
    }

    pub fn rejected(errors: FieldErrors) -> CommentResponse {
        CommentResponse {
            success: false,
            html: None,
            content: None,
            errors,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
