use serde::{Deserialize, Serialize};
use serde_json::json;

use shelf_store::Entity;

use crate::modules::authors::models::AuthorView;

const TITLE_MAX_LEN: usize = 255;

/// A book row as persisted. `author_id` may dangle after an author deletion;
/// view resolution nulls the relation in that case.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub cover_text: String,
    pub comment: String,
    pub author_id: Option<i64>,
}

impl Entity for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Incoming create payload. Field names follow the public JSON contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub title: String,
    pub cover_text: String,
    pub comment: String,
    pub id_author: Option<i64>,
}

impl BookPayload {
    pub fn violations(&self) -> Vec<serde_json::Value> {
        title_violations(&self.title)
    }
}

/// Incoming update payload; absent fields keep their stored values, except
/// `idAuthor` which is re-resolved on every update (absent means none).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub cover_text: Option<String>,
    pub comment: Option<String>,
    pub id_author: Option<i64>,
}

/// Violations for the one required field.
pub fn title_violations(title: &str) -> Vec<serde_json::Value> {
    let mut violations = Vec::new();
    if title.trim().is_empty() {
        violations.push(json!({"field": "title", "message": "the title must not be blank"}));
    } else if title.chars().count() > TITLE_MAX_LEN {
        violations.push(json!({
            "field": "title",
            "message": "the title must not exceed 255 characters"
        }));
    }
    violations
}

/// Public view of a book; the list and detail field group. Embeds the author
/// summary and never the author's books (cycle avoidance).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub cover_text: String,
    pub comment: String,
    pub author: Option<AuthorView>,
}
