
use blog_client::{
    api::{CommentId, CSRF_HEADER},
    Dom, Method,
};
use blog_mock::{render_comment, Failure, TOKEN};
use futures::{executor::LocalPool, task::LocalSpawnExt};

#[test]
fn new_comment_is_appended_to_the_list() {
    let p = common::page(&["1"]);
    let form = p.by_id("comment-form");
    let content = p.field(form, "content");
    p.dom.set_value(content, "Nice post!");

    p.submit(form);

    let list = p.by_id("comment-list");
    let frags = p.dom.fragments(list);
    assert_eq!(frags.len(), 1);
    assert!(frags[0].contains("Nice post!"), "{frags:?}");
    // the new fragment goes after the existing comment
    assert_eq!(
        p.dom.tag(*p.dom.children(list).last().unwrap()),
        blog_mock::FRAGMENT_TAG
    );
    assert_eq!(p.dom.value(&content).as_deref(), Some(""));
    assert!(p.dom.alerts().is_empty());
    assert_eq!(p.server.num_comments(), 2);
}

#[test]
fn requests_carry_the_cookie_token() {
    let p = common::page(&[]);
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "hi");
    p.submit(form);

    let reqs = p.server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::Post);
    assert_eq!(reqs[0].url, "/blog/comment/create/1/");
    assert_eq!(reqs[0].csrf_token.as_deref(), Some(TOKEN));
    assert!(reqs[0]
        .form
        .iter()
        .any(|(k, v)| k == "content" && v == "hi"));
    assert_eq!(CSRF_HEADER, "X-CSRFToken");
}

#[test]
fn hidden_field_token_is_used_without_cookie() {
    let p = common::page(&[]);
    p.dom.set_cookies("sessionid=abc");
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "hi");
    p.submit(form);
    assert_eq!(p.server.requests()[0].csrf_token.as_deref(), Some(TOKEN));
    assert_eq!(p.dom.fragments(p.by_id("comment-list")).len(), 1);
}

#[test]
fn first_reply_creates_the_replies_container_once() {
    let p = common::page(&["42", "43"]);
    let comment = p.by_id("comment-42");
    let form = p.by_id("reply-form-42");
    assert!(p.dom.child_with_class(&comment, "replies").is_none());

    p.click(p.button("42", "reply-button"));
    assert!(p.dom.is_visible(&form));
    p.dom.set_value(p.field(form, "content"), "first");
    p.submit(form);

    let replies = p.child(comment, "replies");
    assert_eq!(p.dom.fragments(replies).len(), 1);
    assert!(!p.dom.is_visible(&form), "reply form is hidden again");
    assert_eq!(p.dom.value(&p.field(form, "content")).as_deref(), Some(""));

    p.click(p.button("42", "reply-button"));
    p.dom.set_value(p.field(form, "content"), "second");
    p.submit(form);

    let containers = p
        .dom
        .children(comment)
        .into_iter()
        .filter(|c| p.dom.attr(c, "class").as_deref() == Some("replies"))
        .count();
    assert_eq!(containers, 1);
    assert_eq!(p.child(comment, "replies"), replies);
    let frags = p.dom.fragments(replies);
    assert_eq!(frags.len(), 2);
    assert!(frags[0].contains("first") && frags[1].contains("second"));

    // the sibling comment is untouched
    let sibling = p.by_id("comment-43");
    assert!(p.dom.child_with_class(&sibling, "replies").is_none());
    assert_eq!(p.server.comment_parent("1000").as_deref(), Some("42"));
}

#[test]
fn toggling_reply_form_twice_restores_it() {
    let p = common::page(&["1", "2"]);
    let form = p.by_id("reply-form-1");
    let other = p.by_id("reply-form-2");
    let before = p.dom.is_visible(&form);

    p.click(p.button("1", "reply-button"));
    assert_eq!(p.dom.is_visible(&form), !before);
    assert!(!p.dom.is_visible(&other));

    p.click(p.button("1", "reply-button"));
    assert_eq!(p.dom.is_visible(&form), before);
    assert!(p.server.requests().is_empty());
}

#[test]
fn edit_round_trip() {
    let p = common::page(&["5"]);
    let comment = p.by_id("comment-5");
    let content = p.child(comment, "comment-content");
    let form = p.child(comment, "edit-form");

    p.click(p.button("5", "edit-comment"));
    assert!(!p.dom.is_visible(&content));
    assert!(p.dom.is_visible(&form));
    let id = CommentId(String::from("5"));
    assert!(p.ctrl.registry().get(&id).unwrap().editing);

    p.dom.set_value(p.field(form, "content"), "Edited text");
    p.submit(form);

    assert_eq!(p.dom.text(&content), "Edited text");
    assert!(p.dom.is_visible(&content));
    assert!(!p.dom.is_visible(&form));
    assert_eq!(p.server.comment_text("5").as_deref(), Some("Edited text"));
}

#[test]
fn reopened_editor_shows_saved_text() {
    let p = common::page(&["5"]);
    let form = p.child(p.by_id("comment-5"), "edit-form");
    let field = p.field(form, "content");

    p.click(p.button("5", "edit-comment"));
    assert_eq!(p.dom.value(&field).as_deref(), Some("Comment 5"));
    p.dom.set_value(field, "Edited text");
    p.submit(form);

    p.click(p.button("5", "edit-comment"));
    assert_eq!(p.dom.value(&field).as_deref(), Some("Edited text"));

    // saving again unchanged keeps the edit
    p.submit(form);
    assert_eq!(p.server.comment_text("5").as_deref(), Some("Edited text"));
    let content = p.child(p.by_id("comment-5"), "comment-content");
    assert_eq!(p.dom.text(&content), "Edited text");
    assert!(p.dom.alerts().is_empty());
}

#[test]
fn cancel_edit_discards_typed_text() {
    let p = common::page(&["5"]);
    let comment = p.by_id("comment-5");
    let content = p.child(comment, "comment-content");
    let form = p.child(comment, "edit-form");
    let field = p.field(form, "content");

    p.click(p.button("5", "edit-comment"));
    p.dom.set_value(field, "never mind");
    p.click(p.button("5", "cancel-edit"));

    assert!(p.dom.is_visible(&content));
    assert!(!p.dom.is_visible(&form));
    assert_eq!(p.dom.text(&content), "Comment 5");
    assert_eq!(p.dom.value(&field).as_deref(), Some("Comment 5"));
    assert!(p.server.requests().is_empty());
}

#[test]
fn rejected_submission_lists_field_errors() {
    let p = common::page(&["1"]);
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "   ");
    p.submit(form);

    let alerts = p.dom.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("content: This field is required."), "{alerts:?}");
    assert!(p.dom.fragments(p.by_id("comment-list")).is_empty());
    // the user's input is kept for correction
    assert_eq!(p.dom.value(&p.field(form, "content")).as_deref(), Some("   "));
}

#[test]
fn network_failure_is_reported_once_without_retry() {
    let p = common::page(&["1"]);
    let form = p.by_id("reply-form-1");
    p.click(p.button("1", "reply-button"));
    p.dom.set_value(p.field(form, "content"), "hello");
    p.server.fail_next(Failure::Network);

    p.submit(form);

    assert_eq!(p.server.requests().len(), 1);
    assert_eq!(
        p.dom.alerts(),
        vec![p.ctrl.config().messages.request_failed.clone()]
    );
    let comment = p.by_id("comment-1");
    assert!(p.dom.child_with_class(&comment, "replies").is_none());
    assert!(p.dom.is_visible(&form), "form stays open for another try");
    assert_eq!(p.dom.value(&p.field(form, "content")).as_deref(), Some("hello"));
}

#[test]
fn malformed_and_error_pages_are_generic_failures() {
    let p = common::page(&["1"]);
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "x");

    p.server
        .fail_next(Failure::Status(500, String::from("<h1>Server Error</h1>")));
    p.submit(form);
    p.server.fail_next(Failure::Status(200, String::from("{\"success\": true}")));
    p.submit(form);

    let generic = p.ctrl.config().messages.request_failed.clone();
    assert_eq!(p.dom.alerts(), vec![generic.clone(), generic]);
    assert!(p.dom.fragments(p.by_id("comment-list")).is_empty());
}

#[test]
fn missing_token_is_rejected_by_server() {
    let p = common::page(&[]);
    p.dom.set_cookies("");
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "csrfmiddlewaretoken"), "");
    p.dom.set_value(p.field(form, "content"), "hi");
    p.submit(form);

    assert_eq!(p.server.requests()[0].csrf_token, None);
    assert_eq!(p.dom.alerts().len(), 1);
    assert_eq!(p.server.num_comments(), 0);
}

#[test]
fn double_submission_sends_one_request() {
    let p = common::page(&["1"]);
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "only once");
    let release = p.server.hold_next();

    let mut pool = LocalPool::new();
    let action = p.ctrl.route_submit(&form).unwrap();
    let ctrl = p.ctrl.clone();
    pool.spawner()
        .spawn_local(async move { ctrl.handle_submit(action).await })
        .unwrap();
    pool.run_until_stalled();
    assert_eq!(p.server.requests().len(), 1);

    // a second click while the first request is pending does nothing
    p.submit(form);
    assert_eq!(p.server.requests().len(), 1);
    assert!(p.dom.alerts().is_empty());

    release.send(()).unwrap();
    pool.run();
    assert_eq!(p.dom.fragments(p.by_id("comment-list")).len(), 1);

    // and once it completed the form can be used again
    p.dom.set_value(p.field(form, "content"), "twice");
    p.submit(form);
    assert_eq!(p.server.requests().len(), 2);
    assert_eq!(p.dom.fragments(p.by_id("comment-list")).len(), 2);
}

#[test]
fn fragments_are_inserted_verbatim() {
    let p = common::page(&[]);
    let form = p.by_id("comment-form");
    p.dom.set_value(p.field(form, "content"), "<b>bold</b>");
    p.submit(form);
    let frags = p.dom.fragments(p.by_id("comment-list"));
    assert_eq!(
        frags,
        vec![render_comment(&CommentId(String::from("1000")), "<b>bold</b>")]
    );
}
