use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,

    /// Sent as the anti-forgery header when present
    pub csrf_token: Option<String>,

    /// Form-encoded body, ignored for GET
    pub form: Vec<(String, String)>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and waits for the whole response
///
/// Network-level failures are errors, any HTTP status is a response.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: Request) -> anyhow::Result<Response>;
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn send(&self, req: Request) -> anyhow::Result<Response> {
        (**self).send(req).await
    }
}
