//! Scope auto-registration via inventory.
//!
//! `#[derive(Scopes)]` with `#[scope(query = "...")]` submits a [`ScopeRegistration`], so
//! the scopes a query type supports can be looked up by name without wiring them by hand.

use crate::scope::ScopeSet;

/// Scopes contributed by one `#[derive(Scopes)]` enum.
pub struct ScopeRegistration {
    /// The enum that declared the scopes (e.g., "ArticleScope")
    pub type_name: &'static str,
    /// The query type the scopes belong to (e.g., "articles")
    pub query_type: &'static str,
    pub scopes: &'static [&'static str],
}

inventory::collect!(ScopeRegistration);

pub fn registered_scopes() -> impl Iterator<Item = &'static ScopeRegistration> {
    inventory::iter::<ScopeRegistration>()
}

/// Union of every scope registered for `query_type`, or `None` if nothing registered it.
pub fn scopes_for(query_type: &str) -> Option<ScopeSet> {
    let mut found = false;
    let mut scopes = ScopeSet::new();
    for registration in registered_scopes().filter(|r| r.query_type == query_type) {
        found = true;
        scopes.extend(registration.scopes.iter().copied());
    }
    found.then_some(scopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scopes;

    #[derive(Scopes)]
    #[scope(query = "registry_test_posts")]
    #[allow(dead_code)]
    enum PostScope {
        Published,
        ByAuthor,
    }

    #[derive(Scopes)]
    #[scope(query = "registry_test_posts")]
    #[allow(dead_code)]
    enum PostAdminScope {
        Hidden,
    }

    #[test]
    fn collects_registrations_for_a_query_type() {
        let scopes = scopes_for("registry_test_posts").expect("scopes registered");
        assert_eq!(scopes.iter().collect::<Vec<_>>(), ["by_author", "hidden", "published"]);
    }

    #[test]
    fn unregistered_query_type_is_none() {
        assert!(scopes_for("registry_test_nothing").is_none());
    }

    #[test]
    fn registrations_carry_the_declaring_type() {
        let names: Vec<&str> = registered_scopes()
            .filter(|r| r.query_type == "registry_test_posts")
            .map(|r| r.type_name)
            .collect();
        assert!(names.contains(&"PostScope"));
        assert!(names.contains(&"PostAdminScope"));
    }
}
