use crate::api::{segment, ApiClient, ApiError};
use crate::cancel::CancelToken;
use crate::feed::models::{
    Comment, CommentRequest, CommentsEnvelope, LikeRequest, NewPost, Post, PostEnvelope,
};
use crate::session::Session;

pub async fn list_posts(client: &ApiClient, cancel: &CancelToken) -> Result<Vec<Post>, ApiError> {
    client.get_json::<Vec<Post>>("/posts", cancel).await
}

pub async fn create_post(
    client: &ApiClient,
    session: &Session,
    post: &NewPost,
    cancel: &CancelToken,
) -> Result<Post, ApiError> {
    let envelope: PostEnvelope = client
        .post_json("/posts", post, Some(session), cancel)
        .await?;
    Ok(envelope.post)
}

pub async fn like_post(
    client: &ApiClient,
    post_id: &str,
    cancel: &CancelToken,
) -> Result<Post, ApiError> {
    let request = LikeRequest {
        post_id: post_id.to_string(),
    };
    let envelope: PostEnvelope = client
        .post_json("/posts/like", &request, None, cancel)
        .await?;
    Ok(envelope.post)
}

pub async fn add_comment(
    client: &ApiClient,
    session: &Session,
    request: &CommentRequest,
    cancel: &CancelToken,
) -> Result<Post, ApiError> {
    let envelope: PostEnvelope = client
        .post_json("/posts/comment", request, Some(session), cancel)
        .await?;
    Ok(envelope.post)
}

pub async fn delete_post(
    client: &ApiClient,
    session: &Session,
    post_id: &str,
    cancel: &CancelToken,
) -> Result<(), ApiError> {
    let path = format!("/posts/{}", segment(post_id));
    client.delete(&path, session, cancel).await
}

pub async fn delete_comment(
    client: &ApiClient,
    session: &Session,
    post_id: &str,
    comment_id: &str,
    cancel: &CancelToken,
) -> Result<Vec<Comment>, ApiError> {
    let path = format!(
        "/posts/{}/comments/{}",
        segment(post_id),
        segment(comment_id)
    );
    let envelope: CommentsEnvelope = client.delete_json(&path, session, cancel).await?;
    Ok(envelope.comments)
}
