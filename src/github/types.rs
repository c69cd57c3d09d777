// GitHub API response types.
// Only the fields the social graph needs are deserialized; the rest of each payload is ignored.

use serde::Deserialize;

/// Entry of a follower, stargazer or watcher list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Full user profile from `/users/{login}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Presentation string: `Name <login>`, or `<login>` without a display name.
    pub fn display(&self) -> String {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => format!("{} <{}>", name, self.login),
            None => format!("<{}>", self.login),
        }
    }
}

/// Repository entry of `/users/{login}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}

/// Body of an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_with_name() {
        let user: User =
            serde_json::from_value(json!({"login": "bob", "name": "Bob Smith", "id": 2})).unwrap();
        assert_eq!(user.display(), "Bob Smith <bob>");
    }

    #[test]
    fn test_display_without_name() {
        let user: User = serde_json::from_value(json!({"login": "carol", "name": null})).unwrap();
        assert_eq!(user.display(), "<carol>");

        let user: User = serde_json::from_value(json!({"login": "dave"})).unwrap();
        assert_eq!(user.display(), "<dave>");
    }

    #[test]
    fn test_display_with_empty_name() {
        let user = User {
            login: "erin".to_string(),
            name: Some(String::new()),
        };
        assert_eq!(user.display(), "<erin>");
    }
}
