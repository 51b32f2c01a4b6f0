use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
};

use blog_client::{
    api::{
        BookmarkList, BookmarkResponse, BookmarkedPost, CommentId, CommentResponse,
        DeleteResponse, Endpoints, FieldErrors, LikeResponse, PostId, Route,
    },
    Method, Request, Response, Transport,
};
use futures::channel::oneshot;

/// Anti-forgery token the mock server accepts
pub const TOKEN: &str = "mock-csrf-token";

/// How the next request should fail instead of reaching the blog
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Failure {
    Network,
    Status(u16, String),
}

#[derive(Debug)]
struct Post {
    title: String,
    likes: u64,
    liked: bool,
    bookmarks: u64,
    bookmarked: bool,
}

#[derive(Debug)]
struct Comment {
    post: PostId,
    parent: Option<CommentId>,
    text: String,
}

#[derive(Debug, Default)]
struct State {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    next_comment: u64,
    requests: Vec<Request>,
    failures: VecDeque<Failure>,
    gate: Option<oneshot::Receiver<()>>,
}

/// In-memory stand-in for the blog server, for a single logged-in user
pub struct MockServer {
    endpoints: Endpoints,
    state: RefCell<State>,
}

fn json<T: serde::Serialize>(status: u16, body: &T) -> Response {
    Response {
        status,
        body: serde_json::to_string(body).expect("serializing mock response"),
    }
}

fn html(status: u16, body: &str) -> Response {
    Response {
        status,
        body: body.to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Markup the server renders for a freshly created comment
pub fn render_comment(id: &CommentId, text: &str) -> String {
    format!(
        r#"<div class="comment" id="comment-{id}" data-comment-id="{id}"><p class="comment-content">{}</p></div>"#,
        escape(text)
    )
}

fn field<'a>(req: &'a Request, name: &str) -> &'a str {
    req.form
        .iter()
        .find(|(k, _)| k == name)
        .map_or("", |(_, v)| v.as_str())
}

fn required_content(req: &Request) -> Result<String, Response> {
    let content = field(req, "content").trim();
    if content.is_empty() {
        let mut errors = BTreeMap::new();
        errors.insert(
            String::from("content"),
            vec![String::from("This field is required.")],
        );
        return Err(json(200, &CommentResponse::rejected(FieldErrors(errors))));
    }
    Ok(content.to_string())
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            endpoints: Endpoints::default(),
            state: RefCell::new(State {
                next_comment: 1000,
                ..State::default()
            }),
        }
    }

    pub fn add_post(&self, id: &str, title: &str) {
        self.state.borrow_mut().posts.insert(
            PostId(id.to_string()),
            Post {
                title: title.to_string(),
                likes: 0,
                liked: false,
                bookmarks: 0,
                bookmarked: false,
            },
        );
    }

    /// Set the counters of `post` as seen from other users
    pub fn set_counts(&self, post: &str, likes: u64, bookmarks: u64) {
        if let Some(p) = self.state.borrow_mut().posts.get_mut(&PostId(post.to_string())) {
            p.likes = likes;
            p.bookmarks = bookmarks;
        }
    }

    pub fn add_comment(&self, id: &str, post: &str, parent: Option<&str>, text: &str) {
        self.state.borrow_mut().comments.insert(
            CommentId(id.to_string()),
            Comment {
                post: PostId(post.to_string()),
                parent: parent.map(|p| CommentId(p.to_string())),
                text: text.to_string(),
            },
        );
    }

    pub fn comment_text(&self, id: &str) -> Option<String> {
        self.state
            .borrow()
            .comments
            .get(&CommentId(id.to_string()))
            .map(|c| c.text.clone())
    }

    pub fn comment_parent(&self, id: &str) -> Option<String> {
        self.state
            .borrow()
            .comments
            .get(&CommentId(id.to_string()))
            .and_then(|c| c.parent.as_ref().map(|p| p.0.clone()))
    }

    pub fn num_comments(&self) -> usize {
        self.state.borrow().comments.len()
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn fail_next(&self, f: Failure) {
        self.state.borrow_mut().failures.push_back(f);
    }

    /// Hold the next request until the returned sender fires or is dropped
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.state.borrow_mut().gate = Some(receiver);
        sender
    }

    fn handle(&self, req: &Request) -> Response {
        let route = match self.endpoints.parse(&req.url) {
            Some(r) => r,
            None => return html(404, "<h1>Not Found</h1>"),
        };
        let expected_method = match route {
            Route::Bookmarks => Method::Get,
            _ => Method::Post,
        };
        if req.method != expected_method {
            return html(405, "<h1>Method Not Allowed</h1>");
        }
        if req.method == Method::Post && req.csrf_token.as_deref() != Some(TOKEN) {
            return html(403, "<h1>403 Forbidden</h1><p>CSRF verification failed.</p>");
        }

        let mut state = self.state.borrow_mut();
        match route {
            Route::CreateComment(post) => {
                if !state.posts.contains_key(&post) {
                    return html(404, "<h1>Not Found</h1>");
                }
                let text = match required_content(req) {
                    Ok(t) => t,
                    Err(resp) => return resp,
                };
                let id = CommentId(state.next_comment.to_string());
                state.next_comment += 1;
                let resp = CommentResponse::created(render_comment(&id, &text));
                state.comments.insert(
                    id,
                    Comment {
                        post,
                        parent: None,
                        text,
                    },
                );
                json(200, &resp)
            }
            Route::ReplyToComment(parent) => {
                let post = match state.comments.get(&parent) {
                    Some(c) => c.post.clone(),
                    None => return html(404, "<h1>Not Found</h1>"),
                };
                let text = match required_content(req) {
                    Ok(t) => t,
                    Err(resp) => return resp,
                };
                let id = CommentId(state.next_comment.to_string());
                state.next_comment += 1;
                let resp = CommentResponse::created(render_comment(&id, &text));
                state.comments.insert(
                    id,
                    Comment {
                        post,
                        parent: Some(parent),
                        text,
                    },
                );
                json(200, &resp)
            }
            Route::UpdateComment(id) => {
                if !state.comments.contains_key(&id) {
                    return html(404, "<h1>Not Found</h1>");
                }
                let text = match required_content(req) {
                    Ok(t) => t,
                    Err(resp) => return resp,
                };
                if let Some(c) = state.comments.get_mut(&id) {
                    c.text = text.clone();
                }
                json(200, &CommentResponse::edited(text))
            }
            Route::DeleteComment(id) => {
                if state.comments.remove(&id).is_none() {
                    return json(200, &DeleteResponse { success: false });
                }
                // replies go away with their parent
                let mut orphans = vec![id];
                while let Some(parent) = orphans.pop() {
                    let children = state
                        .comments
                        .iter()
                        .filter(|(_, c)| c.parent.as_ref() == Some(&parent))
                        .map(|(id, _)| id.clone())
                        .collect::<Vec<_>>();
                    for c in children {
                        state.comments.remove(&c);
                        orphans.push(c);
                    }
                }
                json(200, &DeleteResponse { success: true })
            }
            Route::Like(post) => match state.posts.get_mut(&post) {
                None => html(404, "<h1>Not Found</h1>"),
                Some(p) => {
                    p.liked = !p.liked;
                    json(
                        200,
                        &LikeResponse {
                            liked: p.liked,
                            total_likes: p.likes + u64::from(p.liked),
                        },
                    )
                }
            },
            Route::Bookmark(post) => match state.posts.get_mut(&post) {
                None => html(404, "<h1>Not Found</h1>"),
                Some(p) => {
                    p.bookmarked = !p.bookmarked;
                    json(
                        200,
                        &BookmarkResponse {
                            is_bookmarked: p.bookmarked,
                            bookmark_count: p.bookmarks + u64::from(p.bookmarked),
                        },
                    )
                }
            },
            Route::Bookmarks => json(
                200,
                &BookmarkList {
                    bookmarked_posts: state
                        .posts
                        .values()
                        .filter(|p| p.bookmarked)
                        .map(|p| BookmarkedPost {
                            title: p.title.clone(),
                        })
                        .collect(),
                },
            ),
        }
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockServer {
    async fn send(&self, req: Request) -> anyhow::Result<Response> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.requests.push(req.clone());
            state.gate.take()
        };
        if let Some(gate) = gate {
            // a dropped sender releases the request too
            let _ = gate.await;
        }
        let failure = self.state.borrow_mut().failures.pop_front();
        match failure {
            Some(Failure::Network) => Err(anyhow::anyhow!("network unreachable")),
            Some(Failure::Status(status, body)) => Ok(html(status, &body)),
            None => {
                let resp = self.handle(&req);
                tracing::debug!(url = %req.url, status = resp.status, "mock server answered");
                Ok(resp)
            }
        }
    }
}
