//! Mutation helpers run inside response handlers, once the server confirmed
//! the change.

use crate::{Dom, Error, Position};

/// Append a server-rendered fragment at the end of `container`
pub fn insert_fragment<D: Dom>(dom: &D, container: &D::Node, html: &str) -> Result<(), Error> {
    dom.append_html(container, html).map_err(Error::Dom)
}

/// The direct child of `parent` carrying `class`, created at the end of
/// `parent` if there is none yet
pub fn ensure_container<D: Dom>(dom: &D, parent: &D::Node, class: &str) -> Result<D::Node, Error> {
    if let Some(c) = dom.child_with_class(parent, class) {
        return Ok(c);
    }
    tracing::debug!(class, "creating container");
    dom.create_child(parent, "div", class, Position::Last)
        .map_err(Error::Dom)
}

/// Flip the visibility of `node`, returning the new visibility
pub fn toggle<D: Dom>(dom: &D, node: &D::Node, currently_visible: bool) -> Result<bool, Error> {
    let visible = !currently_visible;
    dom.set_visible(node, visible).map_err(Error::Dom)?;
    Ok(visible)
}

pub fn set_visible<D: Dom>(dom: &D, node: &D::Node, visible: bool) -> Result<(), Error> {
    dom.set_visible(node, visible).map_err(Error::Dom)
}

/// Show exactly one of `content` and `edit_form`
pub fn show_editing<D: Dom>(
    dom: &D,
    content: Option<&D::Node>,
    edit_form: Option<&D::Node>,
    editing: bool,
) -> Result<(), Error> {
    if let Some(c) = content {
        set_visible(dom, c, !editing)?;
    }
    if let Some(f) = edit_form {
        set_visible(dom, f, editing)?;
    }
    Ok(())
}

/// Replace the children of `list` with one text item per entry
pub fn fill_list<D: Dom>(
    dom: &D,
    list: &D::Node,
    tag: &str,
    class: &str,
    items: &[String],
) -> Result<(), Error> {
    dom.clear_children(list);
    for item in items {
        let li = dom
            .create_child(list, tag, class, Position::Last)
            .map_err(Error::Dom)?;
        dom.set_text(&li, item);
    }
    Ok(())
}

pub fn remove<D: Dom>(dom: &D, node: &D::Node) {
    dom.remove(node)
}
