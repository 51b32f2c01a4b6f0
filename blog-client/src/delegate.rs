//! Routing of events caught by the listeners installed on the comments
//! section, by selector match on the element the event originated from.
//!
//! Nothing here is bound to individual comments: comments and replies
//! inserted later are routed the same way as the ones rendered with the page.

use crate::{api::CommentId, Dom, Error};

/// Id of the stable ancestor the listeners are installed on
pub const ROOT_ID: &str = "comments-section";

pub const COMMENT_FORM: &str = "#comment-form";
pub const REPLY_FORM: &str = ".reply-form";
pub const EDIT_FORM: &str = ".edit-form";
pub const REPLY_BUTTON: &str = ".reply-button";
pub const EDIT_BUTTON: &str = ".edit-comment";
pub const CANCEL_EDIT_BUTTON: &str = ".cancel-edit";
pub const DELETE_BUTTON: &str = ".delete-comment";

const COMMENT_ID_ATTR: &str = "data-comment-id";

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitAction<N> {
    NewComment { form: N },
    Reply { form: N, parent: CommentId },
    Edit { form: N, comment: CommentId },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClickAction {
    ToggleReply(CommentId),
    StartEdit(CommentId),
    CancelEdit(CommentId),
    Delete(CommentId),
}

impl<N> SubmitAction<N> {
    pub fn form(&self) -> &N {
        match self {
            SubmitAction::NewComment { form }
            | SubmitAction::Reply { form, .. }
            | SubmitAction::Edit { form, .. } => form,
        }
    }
}

fn comment_id<D: Dom>(dom: &D, node: &D::Node, selector: &str) -> Result<CommentId, Error> {
    dom.attr(node, COMMENT_ID_ATTR)
        .filter(|id| !id.is_empty())
        .map(CommentId)
        .ok_or_else(|| Error::missing_attribute(selector, COMMENT_ID_ATTR))
}

/// Action for a `submit` event originating from `target`
///
/// `Ok(None)` means the form is none of ours and the browser should be left
/// to handle it.
pub fn route_submit<D: Dom>(
    dom: &D,
    target: &D::Node,
) -> Result<Option<SubmitAction<D::Node>>, Error> {
    if let Some(form) = dom.closest(target, COMMENT_FORM) {
        return Ok(Some(SubmitAction::NewComment { form }));
    }
    if let Some(form) = dom.closest(target, REPLY_FORM) {
        let parent = comment_id(dom, &form, REPLY_FORM)?;
        return Ok(Some(SubmitAction::Reply { form, parent }));
    }
    if let Some(form) = dom.closest(target, EDIT_FORM) {
        let comment = comment_id(dom, &form, EDIT_FORM)?;
        return Ok(Some(SubmitAction::Edit { form, comment }));
    }
    Ok(None)
}

/// Action for a `click` event originating from `target`
pub fn route_click<D: Dom>(dom: &D, target: &D::Node) -> Result<Option<ClickAction>, Error> {
    let routes: [(&str, fn(CommentId) -> ClickAction); 4] = [
        (REPLY_BUTTON, ClickAction::ToggleReply),
        (EDIT_BUTTON, ClickAction::StartEdit),
        (CANCEL_EDIT_BUTTON, ClickAction::CancelEdit),
        (DELETE_BUTTON, ClickAction::Delete),
    ];
    for (selector, action) in routes {
        if let Some(button) = dom.closest(target, selector) {
            return Ok(Some(action(comment_id(dom, &button, selector)?)));
        }
    }
    Ok(None)
}
