use serde::{Deserialize, Serialize};

/// Role recorded in the directory. Every account created through sign-up
/// is a manager for now; nothing reads the role yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
        }
    }
}

/// Profile row in the user directory, keyed by the provider-issued id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

impl DirectoryUser {
    pub fn new_manager(id: String, email: String, full_name: Option<String>) -> Self {
        Self {
            id,
            email,
            full_name,
            role: Role::Manager,
        }
    }
}
