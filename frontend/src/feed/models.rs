use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub created_at: String,
}

pub fn display_name(username: Option<&str>) -> &str {
    match username {
        Some(name) if !name.trim().is_empty() => name,
        _ => "Anonymous",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Title and content cannot be empty.")]
    EmptyPost,
    #[error("Comment cannot be empty.")]
    EmptyComment,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    /// Rejects drafts whose title or content is blank once trimmed.
    pub fn validated(&self) -> Result<NewPost, FeedError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(FeedError::EmptyPost);
        }
        Ok(self.clone())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub post_id: String,
    pub content: String,
}

/// The single comment box in use. Typing under another post moves the draft
/// to that post.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentDraft {
    pub post_id: Option<String>,
    pub content: String,
}

impl CommentDraft {
    pub fn edit(post_id: &str, content: String) -> Self {
        Self {
            post_id: Some(post_id.to_string()),
            content,
        }
    }

    pub fn content_for(&self, post_id: &str) -> &str {
        match &self.post_id {
            Some(id) if id == post_id => &self.content,
            _ => "",
        }
    }

    pub fn request_for(&self, post_id: &str) -> Result<CommentRequest, FeedError> {
        let content = self.content_for(post_id);
        if content.trim().is_empty() {
            return Err(FeedError::EmptyComment);
        }
        Ok(CommentRequest {
            post_id: post_id.to_string(),
            content: content.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PostEnvelope {
    pub post: Post,
}

#[derive(Debug, Deserialize)]
pub struct CommentsEnvelope {
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_from_api_shape() {
        let json = r#"{
            "_id": "p1",
            "title": "Hi",
            "content": "World",
            "username": "asha",
            "likes": 3,
            "comments": [{"_id": "c1", "content": "nice"}],
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.likes, 3);
        assert_eq!(post.comments[0].username, None);
        assert_eq!(post.created_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn sparse_post_gets_defaults() {
        let post: Post =
            serde_json::from_str(r#"{"_id":"p2","title":"t","content":"c"}"#).unwrap();
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
        assert_eq!(display_name(post.username.as_deref()), "Anonymous");
    }

    #[test]
    fn blank_post_fields_are_rejected() {
        let blank_title = NewPost {
            title: "   ".into(),
            content: "World".into(),
        };
        let blank_content = NewPost {
            title: "Hi".into(),
            content: "\n".into(),
        };
        assert_eq!(blank_title.validated(), Err(FeedError::EmptyPost));
        assert_eq!(blank_content.validated(), Err(FeedError::EmptyPost));
        assert_eq!(
            FeedError::EmptyPost.to_string(),
            "Title and content cannot be empty."
        );
    }

    #[test]
    fn comment_draft_only_applies_to_its_post() {
        let draft = CommentDraft::edit("p1", "great".into());
        assert_eq!(draft.content_for("p1"), "great");
        assert_eq!(draft.content_for("p2"), "");
        assert_eq!(draft.request_for("p2"), Err(FeedError::EmptyComment));

        let request = draft.request_for("p1").unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"postId": "p1", "content": "great"}));
    }

    #[test]
    fn whitespace_comment_is_rejected() {
        let draft = CommentDraft::edit("p1", "  ".into());
        assert_eq!(draft.request_for("p1"), Err(FeedError::EmptyComment));
    }
}
