mod comment;
pub use comment::{CommentId, CommentResponse, DeleteResponse, FieldErrors};

mod error;
pub use error::Error;

mod post;
pub use post::{BookmarkList, BookmarkResponse, BookmarkedPost, LikeResponse, PostId};

mod route;
pub use route::{Endpoints, Route};

/// Name of the cookie the server stores the anti-forgery token in
pub const CSRF_COOKIE: &str = "csrftoken";

/// Name of the hidden form field carrying the anti-forgery token
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Request header the server reads the anti-forgery token from
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Decode a JSON response body into one of the payload types of this crate
pub fn decode<T>(body: &str) -> Result<T, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| Error::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::NotAnObject);
    }
    serde_json::from_value(value).map_err(|e| Error::UnexpectedShape(e.to_string()))
}
