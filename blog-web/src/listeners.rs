use std::rc::Rc;

use blog_client::{delegate, Controller, Dom, Reaction};
use wasm_bindgen::{prelude::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event};

use crate::{
    dom::{js_err, WebDom},
    transport::WebTransport,
};

pub type WebController = Controller<Rc<WebDom>, WebTransport>;

pub fn event_element(e: &Event) -> Option<Element> {
    e.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Register `handler` for `event` on `target` for the lifetime of the page
pub fn listen<F>(target: &Element, event: &str, handler: F) -> anyhow::Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_err)?;
    closure.forget();
    Ok(())
}

/// Install the delegated `submit` and `click` listeners on the comments
/// section, and the reaction buttons' listeners
pub fn install(ctrl: Rc<WebController>) -> anyhow::Result<()> {
    match ctrl.dom().by_id(delegate::ROOT_ID) {
        None => tracing::debug!("no comments section on this page"),
        Some(root) => {
            let c = ctrl.clone();
            listen(&root, "submit", move |e| {
                let Some(target) = event_element(&e) else { return };
                if let Some(action) = c.route_submit(&target) {
                    e.prevent_default();
                    let c = c.clone();
                    spawn_local(async move { c.handle_submit(action).await });
                }
            })?;

            let c = ctrl.clone();
            listen(&root, "click", move |e| {
                let Some(target) = event_element(&e) else { return };
                if let Some(action) = c.route_click(&target) {
                    e.prevent_default();
                    let c = c.clone();
                    spawn_local(async move { c.handle_click(action).await });
                }
            })?;
            tracing::debug!("comment listeners installed");
        }
    }

    for reaction in [Reaction::Like, Reaction::Bookmark] {
        if let Some(button) = ctrl.dom().by_id(reaction.button_id()) {
            let c = ctrl.clone();
            let b = button.clone();
            listen(&button, "click", move |_| {
                let c = c.clone();
                let b = b.clone();
                spawn_local(async move { c.handle_reaction(reaction, &b).await });
            })?;
        }
    }

    if let Some(button) = ctrl.dom().by_id("bookmarks-button") {
        let c = ctrl.clone();
        listen(&button, "click", move |_| {
            let c = c.clone();
            spawn_local(async move { c.handle_show_bookmarks().await });
        })?;
    }
    Ok(())
}
