use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Hard cap on every list read. Callers always get the newest records up
/// to this many; there is no pagination cursor.
pub const LIST_CAP: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Snippet {
    pub id: Uuid,
    pub code: String,
    pub language: String,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Milliseconds since the Unix epoch, assigned server-side at insert.
    pub created_at: i64,
}

impl Snippet {
    /// Title if present, otherwise "<language> snippet", with the author
    /// appended when one was given. Blank strings count as absent.
    pub fn display_name(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        match self.author.as_deref().filter(|a| !a.is_empty()) {
            Some(author) => format!("{} snippet by {}", self.language, author),
            None => format!("{} snippet", self.language),
        }
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

pub async fn insert(
    db: &PgPool,
    code: &str,
    language: &str,
    title: Option<&str>,
    author: Option<&str>,
) -> sqlx::Result<Snippet> {
    let snippet = sqlx::query_as::<_, Snippet>(
        r#"
        INSERT INTO snippets (code, language, title, author, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, code, language, title, author, created_at
        "#,
    )
    .bind(code)
    .bind(language)
    .bind(title)
    .bind(author)
    .bind(now_millis())
    .fetch_one(db)
    .await?;
    Ok(snippet)
}

pub async fn list_recent(db: &PgPool) -> sqlx::Result<Vec<Snippet>> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, code, language, title, author, created_at
        FROM snippets
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(LIST_CAP)
    .fetch_all(db)
    .await
}

/// Exact, case-sensitive match on the stored tag. The UI's suggestion
/// list is a convenience only; the store accepts any string.
pub async fn list_by_language(db: &PgPool, language: &str) -> sqlx::Result<Vec<Snippet>> {
    sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, code, language, title, author, created_at
        FROM snippets
        WHERE language = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(language)
    .bind(LIST_CAP)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(title: Option<&str>, language: &str, author: Option<&str>) -> Snippet {
        Snippet {
            id: Uuid::new_v4(),
            code: "fn main() {}".into(),
            language: language.into(),
            title: title.map(Into::into),
            author: author.map(Into::into),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn display_name_prefers_title() {
        let s = snippet(Some("Foo"), "rust", Some("Ann"));
        assert_eq!(s.display_name(), "Foo");
    }

    #[test]
    fn display_name_falls_back_to_language_and_author() {
        let s = snippet(None, "python", Some("Ann"));
        assert_eq!(s.display_name(), "python snippet by Ann");
    }

    #[test]
    fn display_name_falls_back_to_language_alone() {
        let s = snippet(None, "go", None);
        assert_eq!(s.display_name(), "go snippet");
    }

    #[test]
    fn display_name_treats_blank_title_as_absent() {
        let s = snippet(Some(""), "sql", Some("Bo"));
        assert_eq!(s.display_name(), "sql snippet by Bo");
    }

    #[test]
    fn recent_list_cap_is_one_hundred() {
        assert_eq!(LIST_CAP, 100);
    }

    #[test]
    fn now_millis_is_after_2023() {
        assert!(now_millis() > 1_672_531_200_000);
    }
}
