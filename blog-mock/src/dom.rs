use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use blog_client::{Dom, Position};

use crate::server::TOKEN;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

/// Tag given to the nodes `append_html` creates, whose text is the raw markup
pub const FRAGMENT_TAG: &str = "#fragment";

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    default_value: Option<String>,
    text: String,
    visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document for driving the controller without a browser
///
/// Fragments are not parsed: they are kept as opaque `#fragment` nodes
/// holding the markup. Nodes are never freed, removal only detaches them.
#[derive(Debug)]
pub struct MockDom {
    nodes: RefCell<Vec<Node>>,
    cookies: RefCell<String>,
    alerts: RefCell<Vec<String>>,
    confirms: RefCell<Vec<String>>,
    confirm_answer: Cell<bool>,
}

impl MockDom {
    pub fn new() -> MockDom {
        MockDom {
            nodes: RefCell::new(vec![Node {
                tag: String::from("html"),
                attrs: BTreeMap::new(),
                default_value: None,
                text: String::new(),
                visible: true,
                parent: None,
                children: Vec::new(),
            }]),
            cookies: RefCell::new(String::new()),
            alerts: RefCell::new(Vec::new()),
            confirms: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a `tag` element to `parent`; the pseudo-attribute `hidden`
    /// makes it start invisible
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        let mut node = Node {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            default_value: None,
            text: String::new(),
            visible: true,
            parent: Some(parent),
            children: Vec::new(),
        };
        for (k, v) in attrs {
            match *k {
                "hidden" => node.visible = false,
                "text" => node.text = v.to_string(),
                _ => {
                    node.attrs.insert(k.to_string(), v.to_string());
                }
            }
        }
        node.default_value = node.attrs.get("value").cloned();
        nodes.push(node);
        nodes[parent.0].children.push(id);
        id
    }

    /// Append the markup of comment `id` to `parent`, with its buttons and
    /// its (hidden) edit and reply forms
    pub fn add_comment(&self, parent: NodeId, id: &str) -> NodeId {
        let elt_id = format!("comment-{id}");
        let comment = self.add(
            parent,
            "div",
            &[("id", elt_id.as_str()), ("class", "comment"), ("data-comment-id", id)],
        );
        let text = format!("Comment {id}");
        self.add(comment, "p", &[("class", "comment-content"), ("text", text.as_str())]);
        for class in ["reply-button", "edit-comment", "delete-comment"] {
            self.add(comment, "button", &[("class", class), ("data-comment-id", id)]);
        }

        let update = format!("/blog/comment/update/{id}/");
        let edit = self.add(
            comment,
            "form",
            &[
                ("class", "edit-form"),
                ("data-comment-id", id),
                ("action", update.as_str()),
                ("hidden", ""),
            ],
        );
        self.add(edit, "textarea", &[("name", "content"), ("value", text.as_str())]);
        self.add(edit, "button", &[("type", "submit")]);
        self.add(
            edit,
            "button",
            &[("class", "cancel-edit"), ("data-comment-id", id)],
        );

        let reply_id = format!("reply-form-{id}");
        let reply_url = format!("/blog/comment/reply/{id}/");
        let reply = self.add(
            comment,
            "form",
            &[
                ("id", reply_id.as_str()),
                ("class", "reply-form"),
                ("data-comment-id", id),
                ("action", reply_url.as_str()),
                ("hidden", ""),
            ],
        );
        self.add(reply, "textarea", &[("name", "content"), ("value", "")]);
        self.add(reply, "button", &[("type", "submit")]);
        comment
    }

    /// A post-detail page for `post` listing top-level `comments`, with the
    /// anti-forgery cookie set
    pub fn post_page(post: &str, comments: &[&str]) -> MockDom {
        let dom = MockDom::new();
        let body = dom.add(dom.root(), "body", &[]);

        let detail = dom.add(body, "article", &[("id", "post-detail")]);
        dom.add(
            detail,
            "button",
            &[("id", "like-button"), ("data-post-id", post), ("text", "Like")],
        );
        dom.add(detail, "span", &[("id", "like-count"), ("text", "0")]);
        dom.add(
            detail,
            "button",
            &[
                ("id", "bookmark-button"),
                ("data-post-id", post),
                ("text", "Bookmark"),
            ],
        );
        dom.add(detail, "span", &[("id", "bookmark-count"), ("text", "0")]);
        dom.add(detail, "button", &[("id", "bookmarks-button")]);
        dom.add(detail, "ul", &[("id", "bookmark-list")]);

        let section = dom.add(body, "section", &[("id", "comments-section")]);
        let create = format!("/blog/comment/create/{post}/");
        let form = dom.add(
            section,
            "form",
            &[("id", "comment-form"), ("action", create.as_str())],
        );
        dom.add(
            form,
            "input",
            &[("name", "csrfmiddlewaretoken"), ("value", TOKEN)],
        );
        dom.add(form, "textarea", &[("name", "content"), ("value", "")]);
        dom.add(form, "button", &[("type", "submit")]);

        let list = dom.add(section, "div", &[("id", "comment-list")]);
        for c in comments {
            dom.add_comment(list, c);
        }

        dom.set_cookies(&format!("sessionid=s3ss10n; csrftoken={TOKEN}"));
        dom
    }

    /// Simulate the user typing `value` into a control
    pub fn set_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(String::from("value"), value.to_string());
    }

    pub fn set_cookies(&self, cookies: &str) {
        *self.cookies.borrow_mut() = cookies.to_string();
    }

    /// Answer future `confirm` prompts with `answer`
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    /// Whether `node` is still reachable from the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = node;
        loop {
            if cur == self.root() {
                return true;
            }
            match nodes[cur.0].parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Markup of the fragments inserted under `node`, in order
    pub fn fragments(&self, node: NodeId) -> Vec<String> {
        let nodes = self.nodes.borrow();
        nodes[node.0]
            .children
            .iter()
            .filter(|c| nodes[c.0].tag == FRAGMENT_TAG)
            .map(|c| nodes[c.0].text.clone())
            .collect()
    }

    /// Number of attached nodes matching `selector`
    pub fn count(&self, selector: &str) -> usize {
        self.descendants(self.root())
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .count()
    }

    /// `node` and everything under it, in document order
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut res = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            res.push(n);
            stack.extend(nodes[n.0].children.iter().rev());
        }
        res
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let n = &nodes[node.0];
        if let Some(id) = selector.strip_prefix('#') {
            n.attrs.get("id").map_or(false, |i| i == id)
        } else if let Some(class) = selector.strip_prefix('.') {
            n.attrs
                .get("class")
                .map_or(false, |c| c.split_whitespace().any(|c| c == class))
        } else if let Some(attr) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            match attr.split_once('=') {
                Some((k, v)) => n.attrs.get(k).map_or(false, |a| a == v.trim_matches('"')),
                None => n.attrs.contains_key(attr),
            }
        } else {
            n.tag == selector
        }
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(p) = nodes[node.0].parent.take() {
            nodes[p.0].children.retain(|c| *c != node);
        }
    }

    fn insert(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], pos: Position) -> NodeId {
        let id = self.add(parent, tag, attrs);
        if pos == Position::First {
            let mut nodes = self.nodes.borrow_mut();
            let children = &mut nodes[parent.0].children;
            children.pop();
            children.insert(0, id);
        }
        id
    }
}

impl Default for MockDom {
    fn default() -> MockDom {
        MockDom::new()
    }
}

impl Dom for MockDom {
    type Node = NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&format!("#{id}"))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if self.matches(n, selector) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    fn child_with_class(&self, parent: &NodeId, class: &str) -> Option<NodeId> {
        self.children(*parent)
            .into_iter()
            .find(|c| self.matches(*c, &format!(".{class}")))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if n == *ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        self.attr(node, "value")
    }

    fn text(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        for c in self.children(*node) {
            self.detach(c);
        }
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn is_visible(&self, node: &NodeId) -> bool {
        self.nodes.borrow()[node.0].visible
    }

    fn set_visible(&self, node: &NodeId, visible: bool) -> anyhow::Result<()> {
        self.nodes.borrow_mut()[node.0].visible = visible;
        Ok(())
    }

    fn create_child(
        &self,
        parent: &NodeId,
        tag: &str,
        class: &str,
        pos: Position,
    ) -> anyhow::Result<NodeId> {
        Ok(self.insert(*parent, tag, &[("class", class)], pos))
    }

    fn append_html(&self, parent: &NodeId, html: &str) -> anyhow::Result<()> {
        self.insert(*parent, FRAGMENT_TAG, &[("text", html)], Position::Last);
        Ok(())
    }

    fn clear_children(&self, node: &NodeId) {
        for c in self.children(*node) {
            self.detach(c);
        }
    }

    fn remove(&self, node: &NodeId) {
        self.detach(*node);
    }

    fn form_fields(&self, form: &NodeId) -> anyhow::Result<Vec<(String, String)>> {
        let nodes = self.descendants(*form);
        let nodes_ref = self.nodes.borrow();
        Ok(nodes
            .into_iter()
            .skip(1)
            .filter_map(|n| {
                let n = &nodes_ref[n.0];
                let name = n.attrs.get("name")?;
                Some((
                    name.clone(),
                    n.attrs.get("value").cloned().unwrap_or_default(),
                ))
            })
            .collect())
    }

    fn reset_form(&self, form: &NodeId) {
        let desc = self.descendants(*form);
        let mut nodes = self.nodes.borrow_mut();
        for n in desc {
            let node = &mut nodes[n.0];
            match node.default_value.clone() {
                Some(v) => node.attrs.insert(String::from("value"), v),
                None => node.attrs.remove("value"),
            };
        }
    }

    fn form_control(&self, form: &NodeId, name: &str) -> Option<NodeId> {
        self.descendants(*form)
            .into_iter()
            .skip(1)
            .find(|n| self.attr(n, "name").as_deref() == Some(name))
    }

    fn set_control_value(&self, control: &NodeId, value: &str) -> anyhow::Result<()> {
        self.set_value(*control, value);
        Ok(())
    }

    fn cookies(&self) -> String {
        self.cookies.borrow().clone()
    }

    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert");
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }
}
