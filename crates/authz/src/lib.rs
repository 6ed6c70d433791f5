//! Caller identity and role-based write gating.
//!
//! Mutating operations are checked against a static per-operation role table
//! before the guarded operation runs; a failed check never partially executes
//! anything. Read operations only require an authenticated caller.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

/// Role required for the protected mutations.
pub const ROLE_ADMIN: &str = "admin";

/// An authenticated caller and the roles granted to it.
#[derive(Debug, Clone)]
pub struct Caller {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl Caller {
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Static bearer-token table standing in for a real token verifier.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    by_token: HashMap<String, Caller>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, caller: Caller) {
        self.by_token.insert(token.into(), caller);
    }

    /// Resolve a presented bearer token to its caller.
    pub fn resolve(&self, token: &str) -> Option<Caller> {
        self.by_token.get(token).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// Operation kind on a resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Detail,
    Create,
    Update,
    Delete,
}

/// Resource collection being operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Books,
    Authors,
}

impl ResourceKind {
    fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Books => "book",
            ResourceKind::Authors => "author",
        }
    }
}

/// Role required for an operation, or `None` when any authenticated caller
/// may perform it.
///
/// Delete on either resource type and Create on books need the elevated role;
/// everything else is open.
pub fn required_role(action: Action, resource: ResourceKind) -> Option<&'static str> {
    match (action, resource) {
        (Action::Delete, _) => Some(ROLE_ADMIN),
        (Action::Create, ResourceKind::Books) => Some(ROLE_ADMIN),
        _ => None,
    }
}

/// Outcome of a refused operation, with a human-readable reason.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Forbidden {
    pub message: String,
}

/// Check whether `caller` may perform `action` on `resource`.
pub fn authorize(caller: &Caller, action: Action, resource: ResourceKind) -> Result<(), Forbidden> {
    let Some(role) = required_role(action, resource) else {
        return Ok(());
    };

    if caller.has_role(role) {
        return Ok(());
    }

    let verb = match action {
        Action::Create => "create",
        Action::Update => "update",
        Action::Delete => "delete",
        Action::List | Action::Detail => "read",
    };

    tracing::debug!(
        subject = %caller.subject,
        required = role,
        verb,
        resource = resource.singular(),
        "operation refused"
    );

    Err(Forbidden {
        message: format!(
            "you do not have sufficient rights to {verb} a {}",
            resource.singular()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Caller {
        Caller::new("admin@example.com", [ROLE_ADMIN.to_string()])
    }

    fn reader() -> Caller {
        Caller::new("reader@example.com", [])
    }

    #[test]
    fn delete_requires_admin_on_both_resources() {
        for resource in [ResourceKind::Books, ResourceKind::Authors] {
            assert!(authorize(&admin(), Action::Delete, resource).is_ok());
            assert!(authorize(&reader(), Action::Delete, resource).is_err());
        }
    }

    #[test]
    fn book_create_requires_admin_but_author_create_does_not() {
        assert!(authorize(&reader(), Action::Create, ResourceKind::Books).is_err());
        assert!(authorize(&admin(), Action::Create, ResourceKind::Books).is_ok());
        assert!(authorize(&reader(), Action::Create, ResourceKind::Authors).is_ok());
    }

    #[test]
    fn reads_and_updates_are_open_to_any_caller() {
        for resource in [ResourceKind::Books, ResourceKind::Authors] {
            for action in [Action::List, Action::Detail, Action::Update] {
                assert!(authorize(&reader(), action, resource).is_ok());
            }
        }
    }

    #[test]
    fn refusal_names_the_resource() {
        let err = authorize(&reader(), Action::Delete, ResourceKind::Books).unwrap_err();
        assert!(err.message.contains("delete a book"));
    }

    #[test]
    fn token_set_resolves_known_tokens_only() {
        let mut tokens = TokenSet::new();
        tokens.insert("secret", admin());

        assert_eq!(
            tokens.resolve("secret").map(|c| c.subject),
            Some("admin@example.com".to_string())
        );
        assert!(tokens.resolve("other").is_none());
    }
}
