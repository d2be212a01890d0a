use serde::{Deserialize, Serialize};

/// A user profile as returned by `/api/v1/users/{id}` and `/api/v1/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    #[serde(rename = "profileImageUrl")]
    pub profile_image_url: Option<String>,
    #[serde(rename = "birthDay")]
    pub birth_day: Option<String>,
    pub job: Option<String>,
    pub domain: Option<String>,
    pub role: Option<String>,
}

/// Partial profile payload for `PATCH /api/v1/users/me/update` and the
/// signup detail step. `None` fields are omitted from the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "profileImageUrl", skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(rename = "birthDay", skip_serializing_if = "Option::is_none")]
    pub birth_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_camel_case_wire_format() {
        let json = r#"{
            "id": "0e65066c-ab20-4da0-b3bf-79dfd0668049",
            "email": "mina@example.com",
            "nickname": "mina",
            "profileImageUrl": "https://cdn.example.com/p.png",
            "birthDay": "1999-01-02",
            "job": "developer",
            "domain": "backend",
            "role": "USER"
        }"#;
        let user: User = serde_json::from_str(json).expect("should parse user");
        assert_eq!(user.id, "0e65066c-ab20-4da0-b3bf-79dfd0668049");
        assert_eq!(user.profile_image_url.as_deref(), Some("https://cdn.example.com/p.png"));
        assert_eq!(user.birth_day.as_deref(), Some("1999-01-02"));
    }

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            nickname: Some("mina".to_string()),
            birth_day: Some("1999-01-02".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["nickname"], "mina");
        assert_eq!(json["birthDay"], "1999-01-02");
        assert!(json.get("job").is_none());
        assert!(json.get("profileImageUrl").is_none());
    }
}
