use crate::{
    api::{CommentId, CommentResponse, DeleteResponse, Error as ApiError, Route},
    controller::decode,
    patcher, Controller, Dom, Error, FlightKey, Method, SubmitAction, Transport,
};

const REPLIES_CLASS: &str = "replies";

impl<D: Dom, T: Transport> Controller<D, T> {
    /// Send a comment, reply or edit form and patch the page with the answer
    pub async fn submit(&self, action: SubmitAction<D::Node>) -> Result<(), Error> {
        let key = match &action {
            SubmitAction::NewComment { .. } => FlightKey::NewComment,
            SubmitAction::Reply { parent, .. } => FlightKey::Reply(parent.clone()),
            SubmitAction::Edit { comment, .. } => FlightKey::Edit(comment.clone()),
        };
        let _guard = self.in_flight.begin(key)?;

        let form = action.form();
        let url = self
            .dom
            .attr(form, "action")
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::missing_attribute("form", "action"))?;
        let fields = self.dom.form_fields(form).map_err(Error::Dom)?;

        let resp = self.send(Method::Post, url, fields).await?;
        let resp: CommentResponse = decode(&resp)?;
        if !resp.success {
            return Err(Error::Rejected(resp.errors));
        }

        match &action {
            SubmitAction::NewComment { form } => {
                let html = resp.html.ok_or(ApiError::MissingField("html"))?;
                let list = self
                    .dom
                    .by_id("comment-list")
                    .ok_or_else(|| Error::missing_element("#comment-list"))?;
                patcher::insert_fragment(&self.dom, &list, &html)?;
                self.dom.reset_form(form);
                tracing::info!("inserted new comment");
            }
            SubmitAction::Reply { form, parent } => {
                let html = resp.html.ok_or(ApiError::MissingField("html"))?;
                let mut registry = self.registry.borrow_mut();
                let view = registry.view(&self.dom, parent)?;
                let replies = patcher::ensure_container(&self.dom, &view.node, REPLIES_CLASS)?;
                patcher::insert_fragment(&self.dom, &replies, &html)?;
                self.dom.reset_form(form);
                patcher::set_visible(&self.dom, form, false)?;
                view.reply_form_visible = false;
                tracing::info!(%parent, "inserted reply");
            }
            SubmitAction::Edit { form, comment } => {
                let content = resp.content.ok_or(ApiError::MissingField("content"))?;
                let mut registry = self.registry.borrow_mut();
                let view = registry.view(&self.dom, comment)?;
                let content_node = view.content.clone().ok_or_else(|| {
                    Error::missing_element(format!("#{} .comment-content", comment.element_id()))
                })?;
                self.dom.set_text(&content_node, &content);
                self.dom.reset_form(form);
                patcher::show_editing(&self.dom, Some(&content_node), Some(form), false)?;
                view.editing = false;
                tracing::info!(%comment, "updated comment");
            }
        }
        Ok(())
    }

    /// Delete comment `id` after asking the user, removing it from the page
    /// once the server confirmed
    pub async fn delete(&self, id: &CommentId) -> Result<(), Error> {
        if !self.dom.confirm(&self.config.messages.confirm_delete) {
            tracing::debug!(%id, "deletion cancelled by user");
            return Ok(());
        }
        let _guard = self.in_flight.begin(FlightKey::Delete(id.clone()))?;

        let url = self.endpoints.url(&Route::DeleteComment(id.clone()));
        let resp = self.send(Method::Post, url, Vec::new()).await?;
        let resp: DeleteResponse = decode(&resp)?;
        if !resp.success {
            return Err(Error::Failed);
        }

        let node = match self.registry.borrow().get(id) {
            Some(view) => Some(view.node.clone()),
            None => self.dom.by_id(&id.element_id()),
        };
        match node {
            Some(node) => {
                // replies are removed along with their parent
                let forgotten = self
                    .registry
                    .borrow_mut()
                    .forget_within(&self.dom, &node);
                tracing::trace!(%id, forgotten, "dropped comment views");
                patcher::remove(&self.dom, &node);
                tracing::info!(%id, "deleted comment");
                Ok(())
            }
            None => Err(Error::missing_element(format!("#{}", id.element_id()))),
        }
    }
}
