use std::time::Duration;

use blog_client::Dom;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlFormElement};

use crate::{dom::WebDom, listeners::listen};

// Flash messages stay this long before fading out
const FLASH_DURATION: Duration = Duration::from_secs(5);
// Must match the opacity transition of the stylesheet
const FADE_DURATION: Duration = Duration::from_millis(300);

/// Behaviors every page of the blog has: flash messages and the logout link
pub fn install(dom: &WebDom) -> anyhow::Result<()> {
    install_flash_messages(dom)?;
    install_logout_link(dom)
}

fn install_flash_messages(dom: &WebDom) -> anyhow::Result<()> {
    let messages = dom
        .document()
        .query_selector_all(".message")
        .map_err(crate::dom::js_err)?;
    for i in 0..messages.length() {
        let Some(msg) = messages.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        if let Some(close) = msg.query_selector(".close-message").ok().flatten() {
            let m = msg.clone();
            listen(&close, "click", move |_| hide(&m))?;
        }
        spawn_local(fade_out(msg));
    }
    Ok(())
}

fn hide(msg: &HtmlElement) {
    if let Err(e) = msg.style().set_property("display", "none") {
        tracing::warn!(?e, "failed hiding message");
    }
}

async fn fade_out(msg: HtmlElement) {
    if let Err(err) = wasm_timer::Delay::new(FLASH_DURATION).await {
        tracing::warn!(%err, "flash message timer failed");
        return;
    }
    if let Err(e) = msg.style().set_property("opacity", "0") {
        tracing::warn!(?e, "failed fading message");
    }
    if let Err(err) = wasm_timer::Delay::new(FADE_DURATION).await {
        tracing::warn!(%err, "flash message timer failed");
    }
    hide(&msg);
}

fn install_logout_link(dom: &WebDom) -> anyhow::Result<()> {
    let (Some(link), Some(form)) = (dom.by_id("logout-link"), dom.by_id("logout-form")) else {
        return Ok(());
    };
    let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
        tracing::warn!("#logout-form is not a form");
        return Ok(());
    };
    listen(&link, "click", move |e| {
        e.prevent_default();
        if let Err(e) = form.submit() {
            tracing::error!(?e, "failed submitting logout form");
        }
    })
}
