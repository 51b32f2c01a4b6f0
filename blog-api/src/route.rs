use crate::{CommentId, PostId};

/// Mutating and listing endpoints of the blog, relative to a path prefix
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoints {
    prefix: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    CreateComment(PostId),
    ReplyToComment(CommentId),
    UpdateComment(CommentId),
    DeleteComment(CommentId),
    Like(PostId),
    Bookmark(PostId),
    Bookmarks,
}

impl Endpoints {
    pub fn new(prefix: &str) -> Endpoints {
        Endpoints {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, route: &Route) -> String {
        let p = &self.prefix;
        match route {
            Route::CreateComment(post) => format!("{p}/comment/create/{post}/"),
            Route::ReplyToComment(c) => format!("{p}/comment/reply/{c}/"),
            Route::UpdateComment(c) => format!("{p}/comment/update/{c}/"),
            Route::DeleteComment(c) => format!("{p}/comment/delete/{c}/"),
            Route::Like(post) => format!("{p}/like/{post}/"),
            Route::Bookmark(post) => format!("{p}/bookmark/{post}/"),
            Route::Bookmarks => format!("{p}/bookmarks/"),
        }
    }

    /// Resolve a request path back to the route it designates
    pub fn parse(&self, path: &str) -> Option<Route> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        let rest = rest.strip_prefix('/')?.strip_suffix('/')?;
        let parts = rest.split('/').collect::<Vec<_>>();
        let id = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Some(match parts.as_slice() {
            ["comment", "create", post] => Route::CreateComment(PostId(id(*post)?)),
            ["comment", "reply", c] => Route::ReplyToComment(CommentId(id(*c)?)),
            ["comment", "update", c] => Route::UpdateComment(CommentId(id(*c)?)),
            ["comment", "delete", c] => Route::DeleteComment(CommentId(id(*c)?)),
            ["like", post] => Route::Like(PostId(id(*post)?)),
            ["bookmark", post] => Route::Bookmark(PostId(id(*post)?)),
            ["bookmarks"] => Route::Bookmarks,
            _ => return None,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Endpoints {
        Endpoints::new("/blog")
    }
}
