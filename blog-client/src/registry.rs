use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use crate::{
    api::CommentId,
    Dom, Error,
};

/// What the controller knows about one rendered comment
#[derive(Clone, Debug, PartialEq)]
pub struct CommentView<N> {
    /// The `#comment-<id>` container
    pub node: N,
    pub content: Option<N>,
    pub edit_form: Option<N>,
    pub reply_form: Option<N>,
    pub reply_form_visible: bool,
    pub editing: bool,
}

impl<N: Clone> CommentView<N> {
    fn read<D: Dom<Node = N>>(dom: &D, id: &CommentId) -> Result<CommentView<N>, Error> {
        let node = dom
            .by_id(&id.element_id())
            .ok_or_else(|| Error::missing_element(format!("#{}", id.element_id())))?;
        let content = dom.child_with_class(&node, "comment-content");
        let edit_form = dom.child_with_class(&node, "edit-form");
        let reply_form = dom.by_id(&id.reply_form_id());
        let reply_form_visible = reply_form.as_ref().map_or(false, |f| dom.is_visible(f));
        let editing = edit_form.as_ref().map_or(false, |f| dom.is_visible(f));
        Ok(CommentView {
            node,
            content,
            edit_form,
            reply_form,
            reply_form_visible,
            editing,
        })
    }
}

/// Typed view-model of the comments the user interacted with
///
/// Entries are read from the document on first use and kept until the
/// comment is deleted, so visibility flags are not re-derived from the
/// markup on every click.
#[derive(Debug)]
pub struct CommentRegistry<N> {
    views: HashMap<CommentId, CommentView<N>>,
}

impl<N: Clone> CommentRegistry<N> {
    pub fn new() -> CommentRegistry<N> {
        CommentRegistry {
            views: HashMap::new(),
        }
    }

    pub fn get(&self, id: &CommentId) -> Option<&CommentView<N>> {
        self.views.get(id)
    }

    /// The view of comment `id`, registering it from the document if needed
    pub fn view<D: Dom<Node = N>>(
        &mut self,
        dom: &D,
        id: &CommentId,
    ) -> Result<&mut CommentView<N>, Error> {
        if !self.views.contains_key(id) {
            let view = CommentView::read(dom, id)?;
            tracing::trace!(%id, "registered comment view");
            self.views.insert(id.clone(), view);
        }
        self.views
            .get_mut(id)
            .ok_or_else(|| Error::missing_element(format!("#{}", id.element_id())))
    }

    /// Forget the views of every comment rendered inside `node`, `node`
    /// included, returning how many were dropped
    pub fn forget_within<D: Dom<Node = N>>(&mut self, dom: &D, node: &N) -> usize {
        let before = self.views.len();
        self.views.retain(|_, v| !dom.contains(node, &v.node));
        before - self.views.len()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<N: Clone> Default for CommentRegistry<N> {
    fn default() -> CommentRegistry<N> {
        CommentRegistry::new()
    }
}

/// Identity of a form (or button) whose request may be in flight
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlightKey {
    NewComment,
    Reply(CommentId),
    Edit(CommentId),
    Delete(CommentId),
    Bookmarks,
}

/// Set of requests currently outstanding
#[derive(Debug, Default)]
pub struct InFlight(RefCell<HashSet<FlightKey>>);

/// Marks `key` as in flight until dropped
#[derive(Debug)]
pub struct FlightGuard<'a> {
    set: &'a InFlight,
    key: FlightKey,
}

impl InFlight {
    pub fn new() -> InFlight {
        InFlight::default()
    }

    /// Start a request for `key`, unless one is already running
    pub fn begin(&self, key: FlightKey) -> Result<FlightGuard<'_>, Error> {
        if !self.0.borrow_mut().insert(key.clone()) {
            tracing::debug!(?key, "ignoring duplicate submission");
            return Err(Error::InFlight);
        }
        Ok(FlightGuard { set: self, key })
    }

    pub fn contains(&self, key: &FlightKey) -> bool {
        self.0.borrow().contains(key)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.set.0.borrow_mut().remove(&self.key);
    }
}
