use std::rc::Rc;

use blog_client::{
    validator::{self, Upload, WriteForm, FILE_FIELD},
    Dom, UploadRules,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::{dom::WebDom, listeners::listen};

/// Selector of the post writing form
pub const POST_FORM: &str = ".post-form";

fn selected_file(form: &Element) -> Option<Upload> {
    let input = form
        .query_selector(&format!("[name={FILE_FIELD}]"))
        .ok()
        .flatten()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;
    let file = input.files()?.get(0)?;
    Some(Upload {
        name: file.name(),
        size: file.size() as u64,
    })
}

/// Block submission of the writing form while it is invalid; a valid form
/// is submitted natively by the browser
pub fn install(dom: Rc<WebDom>, form: Element, rules: UploadRules) -> anyhow::Result<()> {
    let f = form.clone();
    listen(&form, "submit", move |e| {
        let fields = match dom.form_fields(&f) {
            Ok(fields) => fields,
            Err(err) => {
                // the server validates again anyway
                tracing::error!(?err, "failed reading write form");
                return;
            }
        };
        let input = WriteForm::from_fields(&fields, selected_file(&f));
        match validator::check(&*dom, &f, &input, &rules) {
            Ok(v) if v.is_valid() => (),
            Ok(_) => e.prevent_default(),
            Err(err) => tracing::error!(?err, "failed rendering validation errors"),
        }
    })
}
