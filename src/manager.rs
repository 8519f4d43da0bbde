//! Chat managers and the GitHub username directory used for mentions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Chat platform user who may be mentioned from GitHub content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub github_organization: Option<String>,
}

impl Manager {
    /// Creates manager with identity only.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            github_username: None,
            github_organization: None,
        }
    }

    /// Returns the part of the email address before `@`.
    ///
    /// Returns `None` when no email is set or it has no `@`.
    pub fn email_local_part(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split_once('@'))
            .map(|(local, _)| local)
    }
}

/// Read-only lookup from lowercase GitHub username to manager.
pub trait ManagerDirectory {
    /// Looks up manager by already lowercased username.
    fn lookup(&self, username: &str) -> Option<&Manager>;
}

impl ManagerDirectory for HashMap<String, Manager> {
    fn lookup(&self, username: &str) -> Option<&Manager> {
        self.get(username)
    }
}

impl<D: ManagerDirectory + ?Sized> ManagerDirectory for &D {
    fn lookup(&self, username: &str) -> Option<&Manager> {
        (**self).lookup(username)
    }
}

impl<D: ManagerDirectory> ManagerDirectory for Option<D> {
    fn lookup(&self, username: &str) -> Option<&Manager> {
        self.as_ref().and_then(|directory| directory.lookup(username))
    }
}

/// Directory of managers keyed by GitHub username.
///
/// Managers with a GitHub username are keyed by it. Others fall back to
/// their email local part, which often matches the GitHub handle within
/// one organization. Keys are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Managers {
    by_username: HashMap<String, Manager>,
}

impl Managers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds directory from manager records.
    ///
    /// Later records win when two managers map to the same key.
    pub fn from_managers(managers: impl IntoIterator<Item = Manager>) -> Self {
        let mut by_username = HashMap::new();

        for manager in managers {
            let key = match (&manager.github_username, manager.email_local_part()) {
                (Some(username), _) => username.to_lowercase(),
                (None, Some(local)) => local.to_lowercase(),
                (None, None) => {
                    tracing::debug!(id = %manager.id, "Manager has no GitHub username or email");
                    continue;
                }
            };
            by_username.insert(key, manager);
        }

        Self { by_username }
    }

    /// Parses JSON array of manager records.
    ///
    /// # Errors
    ///
    /// Returns error if input is not a JSON array of managers
    pub fn from_json(json: &str) -> Result<Self> {
        let managers: Vec<Manager> =
            serde_json::from_str(json).context("Failed to parse manager list")?;
        Ok(Self::from_managers(managers))
    }

    /// Reads JSON manager list from file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manager list: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Invalid manager list: {}", path.display()))
    }

    /// Finds manager for GitHub username, ignoring case.
    pub fn find_by_github_username(&self, username: &str) -> Option<&Manager> {
        self.by_username.get(&username.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }
}

impl ManagerDirectory for Managers {
    fn lookup(&self, username: &str) -> Option<&Manager> {
        self.by_username.get(username)
    }
}

impl FromIterator<Manager> for Managers {
    fn from_iter<I: IntoIterator<Item = Manager>>(iter: I) -> Self {
        Self::from_managers(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(
        id: &str,
        github_username: Option<&str>,
        email: Option<&str>,
    ) -> Manager {
        Manager {
            github_username: github_username.map(String::from),
            email: email.map(String::from),
            ..Manager::new(id, format!("manager {}", id))
        }
    }

    #[test]
    fn test_email_local_part() {
        // Arrange
        let with_email = manager_with("1", None, Some("claud@example.com"));
        let invalid_email = manager_with("2", None, Some("not-an-email"));
        let no_email = manager_with("3", None, None);

        // Act & Assert
        assert_eq!(with_email.email_local_part(), Some("claud"));
        assert_eq!(invalid_email.email_local_part(), None);
        assert_eq!(no_email.email_local_part(), None);
    }

    #[test]
    fn test_directory_keys_by_lowercase_username() {
        // Arrange
        let managers = vec![manager_with("1", Some("Claud"), Some("other@example.com"))];

        // Act
        let directory = Managers::from_managers(managers);

        // Assert
        assert_eq!(directory.len(), 1);
        assert!(directory.lookup("claud").is_some(), "Key should be lowercase");
        assert!(directory.lookup("Claud").is_none(), "Lookup expects lowercase");
        assert!(
            directory.lookup("other").is_none(),
            "Email fallback only applies without username"
        );
    }

    #[test]
    fn test_directory_falls_back_to_email_local_part() {
        // Arrange
        let managers = vec![
            manager_with("1", None, Some("Nabi-Chan@example.com")),
            manager_with("2", None, None),
        ];

        // Act
        let directory: Managers = managers.into_iter().collect();

        // Assert
        assert_eq!(directory.len(), 1, "Manager without keys is skipped");
        assert_eq!(
            directory.lookup("nabi-chan").map(|m| m.id.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_find_by_github_username_ignores_case() {
        // Arrange
        let directory = Managers::from_managers(vec![manager_with("7", Some("igy95"), None)]);

        // Act
        let found = directory.find_by_github_username("IGY95");

        // Assert
        assert_eq!(found.map(|m| m.id.as_str()), Some("7"));
        assert!(directory.find_by_github_username("nobody").is_none());
    }

    #[test]
    fn test_from_json() {
        // Arrange
        let json = r#"[
            {"id": "12345", "name": "클로드", "github_username": "claud"},
            {"id": "67890", "name": "Nabi", "email": "nabi@example.com"}
        ]"#;

        // Act
        let directory = Managers::from_json(json).expect("Should parse managers");

        // Assert
        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.lookup("claud").map(|m| m.name.as_str()),
            Some("클로드")
        );
        assert_eq!(
            directory.lookup("nabi").map(|m| m.id.as_str()),
            Some("67890")
        );
    }

    #[test]
    fn test_from_json_rejects_invalid_input() {
        // Arrange
        let json = r#"{"id": "not a list"}"#;

        // Act
        let result = Managers::from_json(json);

        // Assert
        assert!(result.is_err(), "Object instead of array should fail");
        let err_msg = format!("{:#}", result.unwrap_err());
        assert!(
            err_msg.contains("manager list"),
            "Error should mention manager list: {}",
            err_msg
        );
    }

    #[test]
    fn test_hashmap_and_option_directories() {
        // Arrange
        let mut map = HashMap::new();
        map.insert("claud".to_string(), Manager::new("1", "Claud"));
        let absent: Option<&HashMap<String, Manager>> = None;

        // Act & Assert
        assert!(map.lookup("claud").is_some());
        assert!(Some(&map).lookup("claud").is_some());
        assert!(absent.lookup("claud").is_none());
    }
}
