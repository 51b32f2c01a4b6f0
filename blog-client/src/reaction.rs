use crate::{
    api::{BookmarkList, BookmarkResponse, LikeResponse, PostId, Route},
    controller::decode,
    patcher, Controller, Dom, Error, FlightKey, Method, Transport,
};

/// A per-post toggle whose state lives on the server
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reaction {
    Like,
    Bookmark,
}

impl Reaction {
    pub fn button_id(self) -> &'static str {
        match self {
            Reaction::Like => "like-button",
            Reaction::Bookmark => "bookmark-button",
        }
    }

    pub fn counter_id(self) -> &'static str {
        match self {
            Reaction::Like => "like-count",
            Reaction::Bookmark => "bookmark-count",
        }
    }

    fn route(self, post: PostId) -> Route {
        match self {
            Reaction::Like => Route::Like(post),
            Reaction::Bookmark => Route::Bookmark(post),
        }
    }
}

impl<D: Dom, T: Transport> Controller<D, T> {
    /// Handle a click on a reaction button carrying `data-post-id`
    ///
    /// Failures are only logged: nothing was changed before the answer.
    pub async fn handle_reaction(&self, reaction: Reaction, button: &D::Node) {
        let post = match self.dom.attr(button, "data-post-id").filter(|p| !p.is_empty()) {
            Some(p) => PostId(p),
            None => {
                tracing::warn!(?reaction, "reaction button has no data-post-id");
                return;
            }
        };
        if let Err(err) = self.toggle_reaction(reaction, post).await {
            tracing::error!(?reaction, ?err, "failed toggling reaction");
        }
    }

    /// Ask the server to toggle `reaction` on `post`, then mirror the state it
    /// answered with; nothing is predicted before the answer arrives
    pub async fn toggle_reaction(&self, reaction: Reaction, post: PostId) -> Result<(), Error> {
        let url = self.endpoints.url(&reaction.route(post.clone()));
        let resp = self.send(Method::Post, url, Vec::new()).await?;
        if !resp.is_success() {
            return Err(Error::Transport(anyhow::anyhow!(
                "server answered with status {}",
                resp.status
            )));
        }
        let labels = &self.config.labels;
        let (active, count, label) = match reaction {
            Reaction::Like => {
                let r: LikeResponse = decode(&resp)?;
                let label = if r.liked { &labels.unlike } else { &labels.like };
                (r.liked, r.total_likes, label)
            }
            Reaction::Bookmark => {
                let r: BookmarkResponse = decode(&resp)?;
                let label = if r.is_bookmarked {
                    &labels.unbookmark
                } else {
                    &labels.bookmark
                };
                (r.is_bookmarked, r.bookmark_count, label)
            }
        };

        let counter = self
            .dom
            .by_id(reaction.counter_id())
            .ok_or_else(|| Error::missing_element(format!("#{}", reaction.counter_id())))?;
        let button = self
            .dom
            .by_id(reaction.button_id())
            .ok_or_else(|| Error::missing_element(format!("#{}", reaction.button_id())))?;
        self.dom.set_text(&counter, &count.to_string());
        self.dom.set_text(&button, label);
        tracing::info!(?reaction, %post, active, count, "reaction updated");
        Ok(())
    }

    /// Fetch the current user's bookmarked posts into `#bookmark-list`
    pub async fn show_bookmarks(&self) -> Result<(), Error> {
        let _guard = self.in_flight.begin(FlightKey::Bookmarks)?;
        let url = self.endpoints.url(&Route::Bookmarks);
        let resp = self.send(Method::Get, url, Vec::new()).await?;
        let list: BookmarkList = decode(&resp)?;

        let node = self
            .dom
            .by_id("bookmark-list")
            .ok_or_else(|| Error::missing_element("#bookmark-list"))?;
        let titles = match list.bookmarked_posts.is_empty() {
            true => vec![self.config.messages.no_bookmarks.clone()],
            false => list.bookmarked_posts.into_iter().map(|p| p.title).collect(),
        };
        patcher::fill_list(&self.dom, &node, "li", "bookmark-item", &titles)?;
        tracing::info!(count = titles.len(), "bookmark list refreshed");
        Ok(())
    }

    /// Handle a click on the bookmark list button; failures are logged
    pub async fn handle_show_bookmarks(&self) {
        if let Err(err) = self.show_bookmarks().await {
            match err {
                Error::InFlight => tracing::debug!("bookmark list already loading"),
                err => tracing::error!(?err, "failed fetching bookmark list"),
            }
        }
    }
}
