
use blog_client::{
    api::CommentId,
    delegate::{route_click, route_submit},
    ClickAction, Error, SubmitAction,
};
use blog_mock::MockDom;

fn id(s: &str) -> CommentId {
    CommentId(String::from(s))
}

#[test]
fn buttons_route_to_their_comment() {
    let p = common::page(&["1", "2"]);
    let cases = [
        ("reply-button", ClickAction::ToggleReply(id("2"))),
        ("edit-comment", ClickAction::StartEdit(id("2"))),
        ("cancel-edit", ClickAction::CancelEdit(id("2"))),
        ("delete-comment", ClickAction::Delete(id("2"))),
    ];
    for (class, action) in cases {
        let b = p.button("2", class);
        assert_eq!(route_click(&*p.dom, &b).unwrap(), Some(action));
    }
}

#[test]
fn click_inside_a_button_is_routed() {
    let p = common::page(&["7"]);
    let b = p.button("7", "reply-button");
    let icon = p.dom.add(b, "span", &[("class", "icon")]);
    assert_eq!(
        route_click(&*p.dom, &icon).unwrap(),
        Some(ClickAction::ToggleReply(id("7")))
    );
}

#[test]
fn unrelated_elements_are_ignored() {
    let p = common::page(&["1"]);
    let content = p.child(p.by_id("comment-1"), "comment-content");
    assert_eq!(route_click(&*p.dom, &content).unwrap(), None);
    assert_eq!(route_submit(&*p.dom, &content).unwrap(), None);
    assert_eq!(route_click(&*p.dom, &p.by_id("like-button")).unwrap(), None);
}

#[test]
fn forms_route_by_kind() {
    let p = common::page(&["3"]);
    let new = p.by_id("comment-form");
    assert_eq!(
        route_submit(&*p.dom, &new).unwrap(),
        Some(SubmitAction::NewComment { form: new })
    );

    let reply = p.by_id("reply-form-3");
    assert_eq!(
        route_submit(&*p.dom, &reply).unwrap(),
        Some(SubmitAction::Reply {
            form: reply,
            parent: id("3")
        })
    );

    let edit = p.child(p.by_id("comment-3"), "edit-form");
    assert_eq!(
        route_submit(&*p.dom, &edit).unwrap(),
        Some(SubmitAction::Edit {
            form: edit,
            comment: id("3")
        })
    );
}

#[test]
fn comments_added_later_need_no_rebinding() {
    let p = common::page(&["1"]);
    let list = p.by_id("comment-list");
    p.dom.add_comment(list, "99");
    let nested = p.dom.add_comment(p.by_id("comment-1"), "100");
    assert!(p.dom.is_attached(nested));

    assert_eq!(
        p.ctrl.route_click(&p.button("99", "delete-comment")),
        Some(ClickAction::Delete(id("99")))
    );
    assert_eq!(
        p.ctrl.route_click(&p.button("100", "reply-button")),
        Some(ClickAction::ToggleReply(id("100")))
    );
}

#[test]
fn missing_comment_id_is_a_contract_error() {
    let dom = MockDom::new();
    let b = dom.add(dom.root(), "button", &[("class", "delete-comment")]);
    assert!(matches!(
        route_click(&dom, &b),
        Err(Error::MissingAttribute {
            attribute: "data-comment-id",
            ..
        })
    ));

    let f = dom.add(dom.root(), "form", &[("class", "reply-form"), ("data-comment-id", "")]);
    assert!(route_submit(&dom, &f).is_err());
}
