use crate::api::{segment, ApiClient, ApiError};
use crate::cancel::CancelToken;
use crate::profile::models::{videos_from_value, ProfileData, UserProfile};
use serde_json::Value;

/// Fetches the user first, then their videos. A failed videos request still
/// yields the profile with an empty list.
pub async fn load_profile(
    client: &ApiClient,
    user_id: &str,
    cancel: &CancelToken,
) -> Result<ProfileData, ApiError> {
    let id = segment(user_id);
    let user: UserProfile = client.get_json(&format!("/api/users/{id}"), cancel).await?;

    let videos = match client
        .get_json::<Value>(&format!("/api/users/{id}/videos"), cancel)
        .await
    {
        Ok(body) => videos_from_value(body),
        Err(ApiError::Aborted) => return Err(ApiError::Aborted),
        Err(e) => {
            log::error!("Error fetching videos for {user_id}: {e}");
            Vec::new()
        }
    };

    Ok(ProfileData { user, videos })
}
