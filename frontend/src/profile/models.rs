use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserVideo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// A videos body that is not an array counts as no videos. Entries that do
/// not look like a video are skipped.
pub fn videos_from_value(value: Value) -> Vec<UserVideo> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<UserVideo>(item) {
                Ok(video) => Some(video),
                Err(e) => {
                    log::warn!("Skipping malformed video entry: {e}");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub user: UserProfile,
    pub videos: Vec<UserVideo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_reads_camel_case_join_date() {
        let user: UserProfile = serde_json::from_value(json!({
            "username": "asha",
            "email": "asha@example.com",
            "joinedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.username, "asha");
        assert_eq!(user.joined_at, "2024-03-01T10:00:00Z");
    }

    #[test]
    fn non_array_videos_body_is_empty() {
        assert!(videos_from_value(json!({"message": "no videos"})).is_empty());
        assert!(videos_from_value(Value::Null).is_empty());
    }

    #[test]
    fn videos_keep_server_order() {
        let videos = videos_from_value(json!([
            {"_id": "v2", "title": "Second", "description": "", "url": "/v/2.mp4"},
            {"_id": "v1", "title": "First", "url": "/v/1.mp4"},
            {"title": "missing id"}
        ]));
        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v2", "v1"]);
        assert_eq!(videos[1].description, "");
    }
}
