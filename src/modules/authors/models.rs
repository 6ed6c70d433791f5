use serde::{Deserialize, Serialize};
use serde_json::json;

use shelf_store::Entity;

/// An author row as persisted. The owned books hang off `Book::author_id`;
/// the reverse relation is never materialized here.
#[derive(Debug, Clone)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub first_name: String,
}

impl Entity for Author {
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
pub struct AuthorPayload {
    pub name: String,
    pub first_name: String,
}

impl AuthorPayload {
    pub fn violations(&self) -> Vec<serde_json::Value> {
        name_violations(&self.name, &self.first_name)
    }
}

/// Incoming update payload; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorUpdate {
    pub name: Option<String>,
    pub first_name: Option<String>,
}

/// Violations for the required name fields.
pub fn name_violations(name: &str, first_name: &str) -> Vec<serde_json::Value> {
    let mut violations = Vec::new();
    if name.trim().is_empty() {
        violations.push(json!({"field": "name", "message": "the name must not be blank"}));
    }
    if first_name.trim().is_empty() {
        violations.push(json!({
            "field": "firstName",
            "message": "the first name must not be blank"
        }));
    }
    violations
}

/// Public view of an author; the list and detail field group.
/// Omits the owned books to avoid cyclic serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: i64,
    pub name: String,
    pub first_name: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            first_name: author.first_name,
        }
    }
}
