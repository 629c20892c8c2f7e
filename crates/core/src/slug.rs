//! Slug derivation and per-scope uniqueness rules.
//!
//! Projects, categories and locations are addressed by a slug derived from
//! their display name. The slug must be unique within the entity's scope
//! (owner for projects, project for categories and locations).

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a project, category or location name.
pub const MAX_NAME_LEN: usize = 50;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII letters, keeps digits and underscores, drops every other
/// character, and turns each run of whitespace or hyphens into a single
/// hyphen. Leading and trailing hyphens and underscores are trimmed.
///
/// # Examples
///
/// ```
/// use timetrack_core::slug::slugify;
///
/// assert_eq!(slugify("Client Work"), "client-work");
/// assert_eq!(slugify("  R&D -- 2024 "), "rd-2024");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Validate a display name and return the slug it maps to.
pub fn validate_name(entity: &str, name: &str) -> Result<String, CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid(
            "name",
            format!("{entity} name must not be empty"),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::invalid(
            "name",
            format!("{entity} name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::invalid(
            "name",
            format!("{entity} name must contain at least one letter or digit"),
        ));
    }
    Ok(slug)
}

/// Check that a slug is free within its scope.
///
/// `existing` is the id of the row in the same scope already holding the
/// slug, if any. `current` is the id of the row being edited (`None` on
/// create). A match against the row itself is not a collision.
pub fn ensure_slug_available(
    entity: &str,
    existing: Option<DbId>,
    current: Option<DbId>,
) -> Result<(), CoreError> {
    match existing {
        Some(found) if Some(found) != current => Err(CoreError::Conflict(format!(
            "{entity} with this name already exists"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn simple_name() {
        assert_eq!(slugify("Foo"), "foo");
    }

    #[test]
    fn spaces_become_single_hyphen() {
        assert_eq!(slugify("Client   Work"), "client-work");
    }

    #[test]
    fn punctuation_is_dropped_not_replaced() {
        assert_eq!(slugify("R&D"), "rd");
        assert_eq!(slugify("what's up?"), "whats-up");
    }

    #[test]
    fn hyphen_runs_collapse() {
        assert_eq!(slugify("a - - b"), "a-b");
    }

    #[test]
    fn underscores_are_kept_inside() {
        assert_eq!(slugify("snake_case name"), "snake_case-name");
        assert_eq!(slugify("_edge_"), "edge");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("naïve plan"), "nave-plan");
    }

    #[test]
    fn punctuation_only_yields_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn validate_name_returns_slug() {
        assert_eq!(validate_name("Project", "My Project").unwrap(), "my-project");
    }

    #[test]
    fn validate_name_rejects_blank() {
        assert_matches!(
            validate_name("Project", "   "),
            Err(CoreError::InvalidField { field: "name", .. })
        );
    }

    #[test]
    fn validate_name_rejects_too_long() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert_matches!(
            validate_name("Category", &name),
            Err(CoreError::InvalidField { field: "name", .. })
        );
    }

    #[test]
    fn validate_name_accepts_max_length() {
        let name = "x".repeat(MAX_NAME_LEN);
        assert!(validate_name("Category", &name).is_ok());
    }

    #[test]
    fn validate_name_rejects_unsluggable() {
        assert_matches!(
            validate_name("Location", "???"),
            Err(CoreError::InvalidField { field: "name", .. })
        );
    }

    #[test]
    fn slug_free_on_create() {
        assert!(ensure_slug_available("Project", None, None).is_ok());
    }

    #[test]
    fn slug_taken_on_create() {
        let err = ensure_slug_available("Project", Some(7), None).unwrap_err();
        assert_matches!(&err, CoreError::Conflict(msg) if msg == "Project with this name already exists");
    }

    #[test]
    fn editing_self_is_not_a_collision() {
        assert!(ensure_slug_available("Project", Some(7), Some(7)).is_ok());
    }

    #[test]
    fn editing_into_another_rows_slug_collides() {
        assert_matches!(
            ensure_slug_available("Category", Some(3), Some(7)),
            Err(CoreError::Conflict(_))
        );
    }
}
