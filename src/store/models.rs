use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
        }
    }
}

/// The only view of a user that is ever sent back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_omits_hash() {
        let user = User::new("alice", "$2b$12$hash");
        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json, serde_json::json!({ "username": "alice" }));
    }
}
