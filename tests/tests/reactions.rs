
use blog_client::{Dom, Method, Reaction};
use blog_mock::Failure;
use futures::executor::block_on;

fn react(p: &common::Page, reaction: Reaction) {
    let button = p.by_id(reaction.button_id());
    block_on(p.ctrl.handle_reaction(reaction, &button));
}

fn texts(p: &common::Page, reaction: Reaction) -> (String, String) {
    (
        p.dom.text(&p.by_id(reaction.counter_id())),
        p.dom.text(&p.by_id(reaction.button_id())),
    )
}

#[test]
fn like_mirrors_the_server_answer() {
    let p = common::page(&[]);
    p.server.set_counts("1", 7, 0);
    let labels = p.ctrl.config().labels.clone();

    react(&p, Reaction::Like);
    assert_eq!(texts(&p, Reaction::Like), (String::from("8"), labels.unlike.clone()));

    react(&p, Reaction::Like);
    assert_eq!(texts(&p, Reaction::Like), (String::from("7"), labels.like.clone()));

    let reqs = p.server.requests();
    assert_eq!(reqs.len(), 2);
    assert!(reqs
        .iter()
        .all(|r| r.method == Method::Post && r.url == "/blog/like/1/"));
    // bookmarks are untouched
    assert_eq!(texts(&p, Reaction::Bookmark).0, "0");
}

#[test]
fn bookmark_mirrors_the_server_answer() {
    let p = common::page(&[]);
    p.server.set_counts("1", 0, 3);
    let labels = p.ctrl.config().labels.clone();

    react(&p, Reaction::Bookmark);
    assert_eq!(
        texts(&p, Reaction::Bookmark),
        (String::from("4"), labels.unbookmark.clone())
    );

    react(&p, Reaction::Bookmark);
    assert_eq!(
        texts(&p, Reaction::Bookmark),
        (String::from("3"), labels.bookmark.clone())
    );
    assert_eq!(texts(&p, Reaction::Like).0, "0");
}

#[test]
fn failures_change_nothing() {
    let p = common::page(&[]);
    p.server.set_counts("1", 7, 0);
    let before = texts(&p, Reaction::Like);

    p.server.fail_next(Failure::Network);
    react(&p, Reaction::Like);
    assert_eq!(texts(&p, Reaction::Like), before);

    p.server.fail_next(Failure::Status(500, String::from("<h1>oops</h1>")));
    react(&p, Reaction::Like);
    assert_eq!(texts(&p, Reaction::Like), before);

    // an answer in another reaction's schema is malformed
    p.server
        .fail_next(Failure::Status(200, String::from(r#"{"is_bookmarked": true, "bookmark_count": 1}"#)));
    react(&p, Reaction::Like);
    assert_eq!(texts(&p, Reaction::Like), before);

    assert_eq!(p.server.requests().len(), 3);
    assert!(p.dom.alerts().is_empty());
}

#[test]
fn button_without_post_id_sends_nothing() {
    let p = common::page(&[]);
    let stray = p.dom.add(p.dom.root(), "button", &[("id", "stray")]);
    block_on(p.ctrl.handle_reaction(Reaction::Like, &stray));
    assert!(p.server.requests().is_empty());
}

#[test]
fn bookmark_list_shows_titles() {
    let p = common::page(&[]);
    p.server.add_post("2", "Second post");
    react(&p, Reaction::Bookmark);

    block_on(p.ctrl.handle_show_bookmarks());

    let list = p.by_id("bookmark-list");
    let items = p.dom.children(list);
    assert_eq!(items.len(), 1);
    assert_eq!(p.dom.text(&items[0]), "First post");
    assert_eq!(p.dom.count(".bookmark-item"), 1);
    let last = p.server.requests().pop().unwrap();
    assert_eq!((last.method, last.url.as_str()), (Method::Get, "/blog/bookmarks/"));
    assert_eq!(last.csrf_token, None);

    // refreshing replaces the previous entries
    block_on(p.ctrl.handle_show_bookmarks());
    assert_eq!(p.dom.count(".bookmark-item"), 1);
}

#[test]
fn empty_bookmark_list_says_so() {
    let p = common::page(&[]);
    block_on(p.ctrl.handle_show_bookmarks());
    let items = p.dom.children(p.by_id("bookmark-list"));
    assert_eq!(items.len(), 1);
    assert_eq!(
        p.dom.text(&items[0]),
        p.ctrl.config().messages.no_bookmarks
    );
}
