//! Person-name validation against the target system's roster.

use std::collections::HashSet;

use crate::config::{UserAlias, UsersConfig};

/// Resolves free-text person names to roster names.
#[derive(Debug, Clone)]
pub struct UserResolver {
    primary: String,
    valid: HashSet<String>,
    roster: Vec<String>,
    aliases: Vec<UserAlias>,
}

impl UserResolver {
    pub fn new(config: &UsersConfig) -> Self {
        Self {
            primary: config.primary.clone(),
            valid: config.valid.iter().cloned().collect(),
            roster: config.valid.clone(),
            aliases: config.aliases.clone(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Roster in configured order.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Resolve `name` to a roster member.
    ///
    /// The first alias whose short form appears anywhere in the name replaces
    /// the whole name. Names that do not resolve become the primary user when
    /// `default_to_primary` is set, otherwise the empty string.
    pub fn validate_user(&self, name: Option<&str>, default_to_primary: bool) -> String {
        let fallback = || {
            if default_to_primary {
                self.primary.clone()
            } else {
                String::new()
            }
        };

        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            return fallback();
        };

        let resolved = self
            .aliases
            .iter()
            .find(|alias| name.contains(alias.short.as_str()))
            .map(|alias| alias.full.as_str())
            .unwrap_or(name);

        if self.valid.contains(resolved) {
            resolved.to_string()
        } else {
            tracing::debug!("user '{name}' not on roster");
            fallback()
        }
    }

    /// Like [`validate_user`](Self::validate_user) without a default, `None`
    /// when nothing resolves.
    pub fn resolve(&self, name: Option<&str>) -> Option<String> {
        Some(self.validate_user(name, false)).filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> UserResolver {
        UserResolver::new(&UsersConfig::default())
    }

    #[test]
    fn blank_names_fall_back() {
        let users = resolver();
        assert_eq!(users.validate_user(None, true), "Tom Sanpakit");
        assert_eq!(users.validate_user(Some("  "), true), "Tom Sanpakit");
        assert_eq!(users.validate_user(None, false), "");
    }

    #[test]
    fn roster_names_pass_through() {
        let users = resolver();
        assert_eq!(users.validate_user(Some(" Lena Lebid "), false), "Lena Lebid");
    }

    #[test]
    fn aliases_substitute_whole_name() {
        let users = resolver();
        assert_eq!(users.validate_user(Some("Austin K."), false), "Austin Koziol");
        assert_eq!(users.validate_user(Some("matej"), false), "");
        // alias target missing from the roster
        assert_eq!(users.validate_user(Some("Tracy"), false), "");
        assert_eq!(users.validate_user(Some("Tracy"), true), "Tom Sanpakit");
    }

    #[test]
    fn first_alias_hit_wins() {
        // "Tom" appears last in the alias list, "Anna" earlier
        let users = resolver();
        assert_eq!(users.validate_user(Some("Anna and Tom"), false), "Anna Halstead");
    }

    #[test]
    fn unknown_names_use_default_policy() {
        let users = resolver();
        assert_eq!(users.validate_user(Some("Stranger Danger"), true), "Tom Sanpakit");
        assert_eq!(users.resolve(Some("Stranger Danger")), None);
        assert_eq!(users.resolve(Some("Debbie Hoffman")).as_deref(), Some("Debbie Hoffman"));
    }
}
