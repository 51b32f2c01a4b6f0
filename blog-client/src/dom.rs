use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Position {
    First,
    Last,
}

/// The subset of the document the controller reads and mutates
///
/// Selectors passed to this trait are always simple: `#id`, `.class`,
/// `tag` or `[attribute=value]`.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn by_id(&self, id: &str) -> Option<Self::Node>;

    /// First element of the document matching `selector`
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// `node` itself or its nearest ancestor matching `selector`
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// Direct child of `parent` carrying `class`
    fn child_with_class(&self, parent: &Self::Node, class: &str) -> Option<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Current value of a form control
    fn value(&self, node: &Self::Node) -> Option<String>;

    fn text(&self, node: &Self::Node) -> String;

    fn set_text(&self, node: &Self::Node, text: &str);

    fn is_visible(&self, node: &Self::Node) -> bool;

    fn set_visible(&self, node: &Self::Node, visible: bool) -> anyhow::Result<()>;

    /// Create an element of type `tag` with class `class` under `parent`
    fn create_child(
        &self,
        parent: &Self::Node,
        tag: &str,
        class: &str,
        pos: Position,
    ) -> anyhow::Result<Self::Node>;

    /// Parse `html` and insert the result at the end of `parent`
    fn append_html(&self, parent: &Self::Node, html: &str) -> anyhow::Result<()>;

    fn clear_children(&self, node: &Self::Node);

    fn remove(&self, node: &Self::Node);

    /// Successful controls of a form, in document order
    fn form_fields(&self, form: &Self::Node) -> anyhow::Result<Vec<(String, String)>>;

    fn reset_form(&self, form: &Self::Node);

    /// The control named `name` inside `form`
    fn form_control(&self, form: &Self::Node, name: &str) -> Option<Self::Node>;

    fn set_control_value(&self, control: &Self::Node, value: &str) -> anyhow::Result<()>;

    /// The raw `document.cookie` string
    fn cookies(&self) -> String;

    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}

impl<D: Dom + ?Sized> Dom for Rc<D> {
    type Node = D::Node;

    fn by_id(&self, id: &str) -> Option<Self::Node> {
        (**self).by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Self::Node> {
        (**self).query(selector)
    }

    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node> {
        (**self).closest(node, selector)
    }

    fn child_with_class(&self, parent: &Self::Node, class: &str) -> Option<Self::Node> {
        (**self).child_with_class(parent, class)
    }

    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        (**self).contains(ancestor, node)
    }

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String> {
        (**self).attr(node, name)
    }

    fn value(&self, node: &Self::Node) -> Option<String> {
        (**self).value(node)
    }

    fn text(&self, node: &Self::Node) -> String {
        (**self).text(node)
    }

    fn set_text(&self, node: &Self::Node, text: &str) {
        (**self).set_text(node, text)
    }

    fn is_visible(&self, node: &Self::Node) -> bool {
        (**self).is_visible(node)
    }

    fn set_visible(&self, node: &Self::Node, visible: bool) -> anyhow::Result<()> {
        (**self).set_visible(node, visible)
    }

    fn create_child(
        &self,
        parent: &Self::Node,
        tag: &str,
        class: &str,
        pos: Position,
    ) -> anyhow::Result<Self::Node> {
        (**self).create_child(parent, tag, class, pos)
    }

    fn append_html(&self, parent: &Self::Node, html: &str) -> anyhow::Result<()> {
        (**self).append_html(parent, html)
    }

    fn clear_children(&self, node: &Self::Node) {
        (**self).clear_children(node)
    }

    fn remove(&self, node: &Self::Node) {
        (**self).remove(node)
    }

    fn form_fields(&self, form: &Self::Node) -> anyhow::Result<Vec<(String, String)>> {
        (**self).form_fields(form)
    }

    fn reset_form(&self, form: &Self::Node) {
        (**self).reset_form(form)
    }

    fn form_control(&self, form: &Self::Node, name: &str) -> Option<Self::Node> {
        (**self).form_control(form, name)
    }

    fn set_control_value(&self, control: &Self::Node, value: &str) -> anyhow::Result<()> {
        (**self).set_control_value(control, value)
    }

    fn cookies(&self) -> String {
        (**self).cookies()
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}
