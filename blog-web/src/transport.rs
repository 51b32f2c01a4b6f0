use anyhow::Context;
use blog_client::{api::CSRF_HEADER, Method, Request, Response, Transport};

/// Same-origin fetches through the shared `reqwest` client
pub struct WebTransport {
    origin: String,
}

impl WebTransport {
    pub fn new(origin: String) -> WebTransport {
        WebTransport { origin }
    }

    fn absolute(&self, url: &str) -> String {
        match url.starts_with('/') {
            true => format!("{}{}", self.origin, url),
            false => url.to_string(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for WebTransport {
    async fn send(&self, req: Request) -> anyhow::Result<Response> {
        let url = self.absolute(&req.url);
        let mut builder = match req.method {
            Method::Get => crate::CLIENT.get(&url),
            Method::Post => crate::CLIENT.post(&url).form(&req.form),
        };
        if let Some(token) = &req.csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }
        let resp = builder
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .with_context(|| format!("sending request to {url}"))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading response of {url}"))?;
        Ok(Response { status, body })
    }
}
