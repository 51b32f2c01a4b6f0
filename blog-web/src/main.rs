use std::rc::Rc;

use blog_client::{Config, Controller, Dom};

mod dom;
use dom::WebDom;

mod listeners;
mod page;

mod transport;
use transport::WebTransport;

mod write_form;

lazy_static::lazy_static! {
    pub static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

fn main() {
    tracing_wasm::set_as_global_default();
    if let Err(err) = start() {
        tracing::error!(?err, "failed to start page scripts");
    }
}

fn start() -> anyhow::Result<()> {
    let dom = Rc::new(WebDom::new()?);
    let config = load_config(&dom);

    page::install(&dom)?;

    if let Some(form) = dom.query(write_form::POST_FORM) {
        write_form::install(dom.clone(), form, config.upload.clone())?;
    }

    let transport = WebTransport::new(dom.origin()?);
    let ctrl = Rc::new(Controller::new(dom, transport, config));
    listeners::install(ctrl)?;

    tracing::info!("page scripts started");
    Ok(())
}

/// Configuration embedded by the server as `<script type="application/json"
/// id="blog-config">`, defaults if absent or invalid
fn load_config(dom: &WebDom) -> Config {
    let Some(script) = dom.by_id("blog-config") else {
        return Config::default();
    };
    match Config::from_json(&dom.text(&script)) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(%err, "invalid page configuration, using defaults");
            Config::default()
        }
    }
}
