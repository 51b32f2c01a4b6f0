/// Failure to make sense of a server response
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Response is not JSON: {0}")]
    NotJson(String),

    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Response has an unexpected shape: {0}")]
    UnexpectedShape(String),

    #[error("Successful response is missing {0:?}")]
    MissingField(&'static str),
}
