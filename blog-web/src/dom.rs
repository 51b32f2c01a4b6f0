use anyhow::{anyhow, Context};
use blog_client::{Dom, Position};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, FormData, HtmlDocument, HtmlElement, HtmlFormElement};

pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("javascript error: {:?}", e)
}

/// The browser document, as seen by the controller
pub struct WebDom {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl WebDom {
    pub fn new() -> anyhow::Result<WebDom> {
        let window = web_sys::window().context("no global window")?;
        let document = window.document().context("window has no document")?;
        Ok(WebDom { window, document })
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn origin(&self) -> anyhow::Result<String> {
        self.window.location().origin().map_err(js_err)
    }
}

fn style_of(node: &Element) -> Option<web_sys::CssStyleDeclaration> {
    node.dyn_ref::<HtmlElement>().map(|h| h.style())
}

/// Visibility from the `hidden` attribute and the computed `display`, so
/// elements hidden by the stylesheet count as hidden
fn displayed(hidden: bool, computed_display: Option<&str>) -> bool {
    !hidden && computed_display.map_or(true, |d| d.trim() != "none")
}

impl Dom for WebDom {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn child_with_class(&self, parent: &Element, class: &str) -> Option<Element> {
        let children = parent.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .find(|c| c.class_list().contains(class))
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn value(&self, node: &Element) -> Option<String> {
        js_sys::Reflect::get(node, &JsValue::from_str("value"))
            .ok()
            .and_then(|v| v.as_string())
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text))
    }

    fn is_visible(&self, node: &Element) -> bool {
        let display = self
            .window
            .get_computed_style(node)
            .ok()
            .flatten()
            .and_then(|s| s.get_property_value("display").ok());
        displayed(node.has_attribute("hidden"), display.as_deref())
    }

    fn set_visible(&self, node: &Element, visible: bool) -> anyhow::Result<()> {
        let style = style_of(node).context("element has no style")?;
        if visible {
            node.remove_attribute("hidden").map_err(js_err)?;
            style.set_property("display", "block").map_err(js_err)
        } else {
            style.set_property("display", "none").map_err(js_err)
        }
    }

    fn create_child(
        &self,
        parent: &Element,
        tag: &str,
        class: &str,
        pos: Position,
    ) -> anyhow::Result<Element> {
        let elt = self.document.create_element(tag).map_err(js_err)?;
        elt.set_class_name(class);
        match pos {
            Position::First => parent.prepend_with_node_1(&elt),
            Position::Last => parent.append_with_node_1(&elt),
        }
        .map_err(js_err)?;
        Ok(elt)
    }

    fn append_html(&self, parent: &Element, html: &str) -> anyhow::Result<()> {
        parent
            .insert_adjacent_html("beforeend", html)
            .map_err(js_err)
    }

    fn clear_children(&self, node: &Element) {
        node.set_inner_html("")
    }

    fn remove(&self, node: &Element) {
        node.remove()
    }

    fn form_fields(&self, form: &Element) -> anyhow::Result<Vec<(String, String)>> {
        let form = form
            .dyn_ref::<HtmlFormElement>()
            .context("submitted element is not a form")?;
        let data = FormData::new_with_form(form).map_err(js_err)?;
        let entries = js_sys::try_iter(&data)
            .map_err(js_err)?
            .context("form data is not iterable")?;
        let mut res = Vec::new();
        for entry in entries {
            let entry: js_sys::Array = entry.map_err(js_err)?.dyn_into().map_err(js_err)?;
            // files have no string value and are never sent by the controller
            if let (Some(k), Some(v)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
                res.push((k, v));
            }
        }
        Ok(res)
    }

    fn reset_form(&self, form: &Element) {
        if let Some(f) = form.dyn_ref::<HtmlFormElement>() {
            f.reset()
        }
    }

    fn form_control(&self, form: &Element, name: &str) -> Option<Element> {
        form.query_selector(&format!("[name={name}]")).ok().flatten()
    }

    fn set_control_value(&self, control: &Element, value: &str) -> anyhow::Result<()> {
        let key = JsValue::from_str("value");
        let set = js_sys::Reflect::set(control, &key, &JsValue::from_str(value)).map_err(js_err)?;
        anyhow::ensure!(set, "element has no writable value");
        Ok(())
    }

    fn cookies(&self) -> String {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default()
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::error!(?e, message, "failed to show alert");
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}
