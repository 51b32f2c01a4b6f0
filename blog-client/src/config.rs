use crate::api::Endpoints;

/// Page-level settings, usually embedded by the server as JSON
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path prefix of the blog endpoints
    pub prefix: String,
    pub labels: Labels,
    pub messages: Messages,
    pub upload: UploadRules,
}

/// Button labels, by state the server last reported
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Labels {
    pub like: String,
    pub unlike: String,
    pub bookmark: String,
    pub unbookmark: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Messages {
    pub confirm_delete: String,
    pub request_failed: String,
    pub submit_rejected: String,
    pub delete_failed: String,
    pub no_bookmarks: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct UploadRules {
    pub max_bytes: u64,

    /// Lowercase, without the leading dot
    pub allowed_extensions: Vec<String>,
}

impl Config {
    pub fn from_json(json: &str) -> serde_json::Result<Config> {
        serde_json::from_str(json)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.prefix)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prefix: String::from("/blog"),
            labels: Labels::default(),
            messages: Messages::default(),
            upload: UploadRules::default(),
        }
    }
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            like: String::from("Like"),
            unlike: String::from("Unlike"),
            bookmark: String::from("Bookmark"),
            unbookmark: String::from("Remove bookmark"),
        }
    }
}

impl Default for Messages {
    fn default() -> Messages {
        Messages {
            confirm_delete: String::from("Do you really want to delete this comment?"),
            request_failed: String::from("Something went wrong, please try again."),
            submit_rejected: String::from("Your comment could not be saved:"),
            delete_failed: String::from("The comment could not be deleted."),
            no_bookmarks: String::from("No bookmarked posts yet."),
        }
    }
}

impl Default for UploadRules {
    fn default() -> UploadRules {
        UploadRules {
            max_bytes: 5 * 1024 * 1024,
            allowed_extensions: ["jpg", "jpeg", "png", "gif"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
