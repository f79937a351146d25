use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Snippet;

#[derive(Debug, Deserialize)]
pub struct CreateSnippetRequest {
    pub code: String,
    pub language: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedSnippetResponse {
    pub id: Uuid,
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
pub struct SnippetListItem {
    pub id: Uuid,
    pub code: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: i64,
    pub display_name: String,
}

impl From<Snippet> for SnippetListItem {
    fn from(s: Snippet) -> Self {
        let display_name = s.display_name();
        Self {
            id: s.id,
            code: s.code,
            language: s.language,
            title: s.title,
            author: s.author,
            created_at: s.created_at,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_code_and_language() {
        let err = serde_json::from_str::<CreateSnippetRequest>(r#"{"language":"rust"}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<CreateSnippetRequest>(r#"{"code":"x"}"#);
        assert!(err.is_err());
    }

    // Empty strings pass the shape check; only presence is enforced.
    #[test]
    fn create_request_accepts_empty_code() {
        let req: CreateSnippetRequest =
            serde_json::from_str(r#"{"code":"","language":"x"}"#).unwrap();
        assert_eq!(req.code, "");
        assert_eq!(req.language, "x");
        assert!(req.title.is_none());
        assert!(req.author.is_none());
    }

    #[test]
    fn create_request_rejects_non_string_code() {
        let err = serde_json::from_str::<CreateSnippetRequest>(r#"{"code":42,"language":"x"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn created_response_is_id_and_timestamp_only() {
        let resp = CreatedSnippetResponse {
            id: Uuid::new_v4(),
            created_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&resp).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("id"));
        assert_eq!(obj["created_at"], 1_700_000_000_000_i64);
    }

    #[test]
    fn list_item_omits_absent_optionals() {
        let item = SnippetListItem::from(Snippet {
            id: Uuid::new_v4(),
            code: "print(1)".into(),
            language: "python".into(),
            title: None,
            author: None,
            created_at: 1_700_000_000_000,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("author").is_none());
        assert_eq!(json["display_name"], "python snippet");
        assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    }

    #[test]
    fn list_item_carries_derived_display_name() {
        let item = SnippetListItem::from(Snippet {
            id: Uuid::new_v4(),
            code: "SELECT 1".into(),
            language: "sql".into(),
            title: Some("Foo".into()),
            author: Some("Ann".into()),
            created_at: 1,
        });
        assert_eq!(item.display_name, "Foo");
    }
}
