//! Client-side check of the post writing form, run before letting the
//! browser submit it. The server validates again; this only saves a round
//! trip.

use crate::{Dom, Error, Position, UploadRules};

/// Class of the aggregated error block prepended to the form
pub const ERROR_BLOCK_CLASS: &str = "error-messages";

/// Name of the file input checked by the validator
pub const FILE_FIELD: &str = "file_upload";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Upload {
    pub name: String,
    pub size: u64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WriteForm {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub file: Option<Upload>,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Invalid {
    #[error("Please enter a title.")]
    MissingTitle,

    #[error("Please enter some content.")]
    MissingContent,

    #[error("Please choose a category.")]
    MissingCategory,

    #[error("Please enter tags.")]
    MissingTags,

    #[error("The file cannot be larger than {} MB.", megabytes(.max_bytes))]
    FileTooLarge { max_bytes: u64 },

    #[error("Allowed file types: {}.", .allowed.join(", "))]
    FileType { allowed: Vec<String> },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Validity {
    Valid,
    Invalid(Vec<Invalid>),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    /// One line per failure
    pub fn message(&self) -> Option<String> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(errs) => Some(
                errs.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

const MIB: u64 = 1024 * 1024;

fn megabytes(bytes: &u64) -> String {
    match bytes % MIB {
        0 => (bytes / MIB).to_string(),
        _ => {
            let mb = format!("{:.2}", *bytes as f64 / MIB as f64);
            mb.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

/// Lowercased text after the last dot of `name`, the whole name if it has
/// no dot
pub fn extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

impl WriteForm {
    /// Build the form from its serialized fields; multi-valued fields (tags
    /// picked from a multiple select) are joined with commas
    pub fn from_fields(fields: &[(String, String)], file: Option<Upload>) -> WriteForm {
        let get = |name: &str| {
            fields
                .iter()
                .filter(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        WriteForm {
            title: get("title"),
            content: get("content"),
            category: get("category"),
            tags: get("tags"),
            file,
        }
    }

    pub fn validate(&self, rules: &UploadRules) -> Validity {
        let mut errs = Vec::new();
        let required = [
            (&self.title, Invalid::MissingTitle),
            (&self.content, Invalid::MissingContent),
            (&self.category, Invalid::MissingCategory),
            (&self.tags, Invalid::MissingTags),
        ];
        for (value, err) in required {
            if value.trim().is_empty() {
                errs.push(err);
            }
        }
        if let Some(f) = &self.file {
            if f.size > rules.max_bytes {
                errs.push(Invalid::FileTooLarge {
                    max_bytes: rules.max_bytes,
                });
            }
            let ext = extension(&f.name);
            if !rules.allowed_extensions.iter().any(|a| a.to_lowercase() == ext) {
                errs.push(Invalid::FileType {
                    allowed: rules.allowed_extensions.clone(),
                });
            }
        }
        match errs.is_empty() {
            true => Validity::Valid,
            false => Validity::Invalid(errs),
        }
    }
}

/// Validate `input` and render the outcome on `form`: any previous error
/// block is removed, and an invalid form gets exactly one new block
pub fn check<D: Dom>(
    dom: &D,
    form: &D::Node,
    input: &WriteForm,
    rules: &UploadRules,
) -> Result<Validity, Error> {
    while let Some(old) = dom.child_with_class(form, ERROR_BLOCK_CLASS) {
        dom.remove(&old);
    }
    let validity = input.validate(rules);
    if let Some(msg) = validity.message() {
        tracing::debug!(%msg, "write form is invalid");
        let block = dom
            .create_child(form, "div", ERROR_BLOCK_CLASS, Position::First)
            .map_err(Error::Dom)?;
        dom.set_text(&block, &msg);
    }
    Ok(validity)
}
