use std::cell::RefCell;

use crate::{
    api::{self, CommentId, Endpoints},
    delegate, patcher, ClickAction, CommentRegistry, Config, Dom, Error, InFlight, Method,
    Request, Response, SubmitAction, Transport,
};

/// Name of the text control of comment edit forms
const EDIT_FIELD: &str = "content";

/// Comment & reaction controller of a post-detail page
///
/// Shared between listeners as an `Rc<Controller<..>>`: interior state is
/// only borrowed between awaits, never across one.
pub struct Controller<D: Dom, T> {
    pub(crate) dom: D,
    pub(crate) transport: T,
    pub(crate) config: Config,
    pub(crate) endpoints: Endpoints,
    pub(crate) registry: RefCell<CommentRegistry<D::Node>>,
    pub(crate) in_flight: InFlight,
}

impl<D: Dom, T: Transport> Controller<D, T> {
    pub fn new(dom: D, transport: T, config: Config) -> Controller<D, T> {
        let endpoints = config.endpoints();
        Controller {
            dom,
            transport,
            config,
            endpoints,
            registry: RefCell::new(CommentRegistry::new()),
            in_flight: InFlight::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub fn registry(&self) -> std::cell::Ref<'_, CommentRegistry<D::Node>> {
        self.registry.borrow()
    }

    /// Route a `submit` event; `Some` means the default action must be
    /// suppressed and the returned action handled
    pub fn route_submit(&self, target: &D::Node) -> Option<SubmitAction<D::Node>> {
        match delegate::route_submit(&self.dom, target) {
            Ok(a) => a,
            Err(err) => {
                tracing::warn!(%err, "submitted form breaks the markup contract");
                None
            }
        }
    }

    pub fn route_click(&self, target: &D::Node) -> Option<ClickAction> {
        match delegate::route_click(&self.dom, target) {
            Ok(a) => a,
            Err(err) => {
                tracing::warn!(%err, "clicked button breaks the markup contract");
                None
            }
        }
    }

    /// Handle a routed submission, telling the user about failures
    pub async fn handle_submit(&self, action: SubmitAction<D::Node>) {
        tracing::debug!(?action, "handling submission");
        if let Err(err) = self.submit(action).await {
            self.report(&err);
        }
    }

    /// Handle a routed click, telling the user about failures
    pub async fn handle_click(&self, action: ClickAction) {
        tracing::debug!(?action, "handling click");
        let res = match action {
            ClickAction::ToggleReply(id) => self.toggle_reply_form(&id),
            ClickAction::StartEdit(id) => self.set_editing(&id, true),
            ClickAction::CancelEdit(id) => self.set_editing(&id, false),
            ClickAction::Delete(id) => self.delete(&id).await,
        };
        if let Err(err) = res {
            self.report(&err);
        }
    }

    /// Flip the reply form of comment `id`
    pub fn toggle_reply_form(&self, id: &CommentId) -> Result<(), Error> {
        let mut registry = self.registry.borrow_mut();
        let view = registry.view(&self.dom, id)?;
        let form = view
            .reply_form
            .clone()
            .ok_or_else(|| Error::missing_element(format!("#{}", id.reply_form_id())))?;
        view.reply_form_visible = patcher::toggle(&self.dom, &form, view.reply_form_visible)?;
        Ok(())
    }

    /// Switch comment `id` between its content view and its edit form
    pub fn set_editing(&self, id: &CommentId, editing: bool) -> Result<(), Error> {
        let mut registry = self.registry.borrow_mut();
        let view = registry.view(&self.dom, id)?;
        let form = view.edit_form.clone().ok_or_else(|| {
            Error::missing_element(format!("#{} .edit-form", id.element_id()))
        })?;
        if editing {
            // the editor starts from what the page currently shows
            if let (Some(content), Some(field)) =
                (&view.content, self.dom.form_control(&form, EDIT_FIELD))
            {
                let text = self.dom.text(content);
                self.dom
                    .set_control_value(&field, &text)
                    .map_err(Error::Dom)?;
            }
        } else {
            // abandoning an edit drops whatever was typed
            self.dom.reset_form(&form);
        }
        patcher::show_editing(&self.dom, view.content.as_ref(), Some(&form), editing)?;
        view.editing = editing;
        Ok(())
    }

    pub(crate) fn report(&self, err: &Error) {
        if !err.is_user_visible() {
            match err {
                Error::InFlight => tracing::debug!(%err, "ignored user action"),
                _ => tracing::warn!(%err, "user action failed"),
            }
            return;
        }
        tracing::error!(?err, "request failed");
        let msg = match err {
            Error::Rejected(errors) if !errors.is_empty() => format!(
                "{}\n{}",
                self.config.messages.submit_rejected,
                errors.summary()
            ),
            Error::Rejected(_) => self.config.messages.submit_rejected.clone(),
            Error::Failed => self.config.messages.delete_failed.clone(),
            _ => self.config.messages.request_failed.clone(),
        };
        self.dom.alert(&msg);
    }

    /// Send one request, at most once; the anti-forgery token is looked up
    /// for every mutating request
    pub(crate) async fn send(
        &self,
        method: Method,
        url: String,
        form: Vec<(String, String)>,
    ) -> Result<Response, Error> {
        let csrf_token = match method {
            Method::Get => None,
            Method::Post => {
                let t = crate::csrf::token(&self.dom, &form);
                if t.is_none() {
                    tracing::warn!(%url, "no anti-forgery token found, sending without it");
                }
                t
            }
        };
        let req = Request {
            method,
            url,
            csrf_token,
            form,
        };
        tracing::trace!(method = ?req.method, url = %req.url, "sending request");
        self.transport.send(req).await.map_err(Error::Transport)
    }
}

/// Decode `resp`, a body that cannot be decoded after a non-success status
/// being a transport failure rather than a malformed answer
pub(crate) fn decode<R>(resp: &Response) -> Result<R, Error>
where
    R: for<'de> serde::Deserialize<'de>,
{
    match api::decode(&resp.body) {
        Ok(r) => Ok(r),
        Err(_) if !resp.is_success() => Err(Error::Transport(anyhow::anyhow!(
            "server answered with status {}",
            resp.status
        ))),
        Err(e) => Err(Error::Malformed(e)),
    }
}
