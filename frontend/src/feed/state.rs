use crate::feed::models::{Comment, Post};
use std::collections::HashSet;
use std::rc::Rc;
use yew::prelude::*;

/// Posts currently on screen. Each server response replaces exactly one post
/// by id; the last response to arrive wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub posts: Vec<Post>,
    visible_comments: HashSet<String>,
}

pub enum FeedAction {
    Loaded(Vec<Post>),
    Created(Post),
    Updated(Post),
    Deleted(String),
    CommentsReplaced {
        post_id: String,
        comments: Vec<Comment>,
    },
    ToggleComments(String),
}

impl FeedState {
    pub fn apply(&mut self, action: FeedAction) {
        match action {
            FeedAction::Loaded(posts) => {
                self.posts = posts;
                self.visible_comments.clear();
            }
            FeedAction::Created(post) => self.posts.insert(0, post),
            FeedAction::Updated(post) => {
                if let Some(slot) = self.posts.iter_mut().find(|p| p.id == post.id) {
                    *slot = post;
                }
            }
            FeedAction::Deleted(post_id) => {
                self.posts.retain(|p| p.id != post_id);
                self.visible_comments.remove(&post_id);
            }
            FeedAction::CommentsReplaced { post_id, comments } => {
                if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
                    post.comments = comments;
                }
            }
            FeedAction::ToggleComments(post_id) => {
                if !self.visible_comments.remove(&post_id) {
                    self.visible_comments.insert(post_id);
                }
            }
        }
    }

    pub fn comments_visible(&self, post_id: &str) -> bool {
        self.visible_comments.contains(post_id)
    }
}

impl Reducible for FeedState {
    type Action = FeedAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, content: &str) -> Comment {
        Comment {
            id: id.into(),
            username: None,
            content: content.into(),
        }
    }

    fn post(id: &str, likes: i64) -> Post {
        Post {
            id: id.into(),
            title: format!("title {id}"),
            content: format!("content {id}"),
            username: Some("asha".into()),
            likes,
            comments: vec![comment("c1", "first"), comment("c2", "second")],
            created_at: "2024-05-01T10:00:00Z".into(),
        }
    }

    fn feed(posts: Vec<Post>) -> FeedState {
        let mut state = FeedState::default();
        state.apply(FeedAction::Loaded(posts));
        state
    }

    #[test]
    fn like_response_replaces_only_that_post() {
        let mut state = feed(vec![post("a", 1), post("b", 5), post("c", 0)]);
        let before = state.clone();

        state.apply(FeedAction::Updated(post("b", 6)));

        assert_eq!(state.posts[1].likes, 6);
        assert_eq!(state.posts[0], before.posts[0]);
        assert_eq!(state.posts[2], before.posts[2]);
    }

    #[test]
    fn update_for_unknown_post_is_ignored() {
        let mut state = feed(vec![post("a", 1)]);
        let before = state.clone();
        state.apply(FeedAction::Updated(post("zzz", 9)));
        assert_eq!(state, before);
    }

    #[test]
    fn created_posts_go_first() {
        let mut state = feed(vec![post("a", 0)]);
        state.apply(FeedAction::Created(post("new", 0)));
        let ids: Vec<_> = state.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["new", "a"]);
    }

    #[test]
    fn create_then_delete_leaves_an_empty_feed() {
        let mut state = FeedState::default();
        let created = Post {
            id: "p1".into(),
            title: "Hi".into(),
            content: "World".into(),
            username: None,
            likes: 0,
            comments: vec![],
            created_at: String::new(),
        };
        state.apply(FeedAction::Created(created.clone()));
        state.apply(FeedAction::Deleted(created.id));
        assert!(state.posts.is_empty());
    }

    #[test]
    fn deleting_a_comment_adopts_the_server_list() {
        let mut state = feed(vec![post("a", 0), post("b", 0)]);

        state.apply(FeedAction::CommentsReplaced {
            post_id: "a".into(),
            comments: vec![comment("c2", "second")],
        });

        let remaining: Vec<_> = state.posts[0].comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, ["c2"]);
        assert_eq!(state.posts[1].comments.len(), 2);
    }

    #[test]
    fn comment_visibility_toggles_per_post() {
        let mut state = feed(vec![post("a", 0), post("b", 0)]);
        assert!(!state.comments_visible("a"));

        state.apply(FeedAction::ToggleComments("a".into()));
        assert!(state.comments_visible("a"));
        assert!(!state.comments_visible("b"));

        state.apply(FeedAction::ToggleComments("a".into()));
        assert!(!state.comments_visible("a"));
    }

    #[test]
    fn reducer_leaves_previous_snapshot_untouched() {
        let first = Rc::new(feed(vec![post("a", 0)]));
        let second = first.clone().reduce(FeedAction::Deleted("a".into()));
        assert_eq!(first.posts.len(), 1);
        assert!(second.posts.is_empty());
    }
}
