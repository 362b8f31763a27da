use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_blank, RecordId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload returned by login and register.
///
/// The server decides what else it sends; only the fields the dashboard
/// reads are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// Session restored from `GET /auth/currentUser`.
    pub fn for_user(user: User) -> Self {
        Self {
            success: true,
            message: None,
            user: Some(user),
        }
    }
}

/// Seller profile as stored by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ];
        if fields.iter().any(|field| is_blank(field)) {
            return Err("All fields are required".to_owned());
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Efua".to_owned(),
            last_name: "Mensah".to_owned(),
            email: "efua@bakery.test".to_owned(),
            password: "s3cret".to_owned(),
            confirm_password: "s3cret".to_owned(),
        }
    }

    #[test]
    fn register_requires_every_field() {
        let request = RegisterRequest {
            last_name: String::new(),
            ..register()
        };
        assert_eq!(request.validate(), Err("All fields are required".to_owned()));
    }

    #[test]
    fn register_requires_matching_passwords() {
        let request = RegisterRequest {
            confirm_password: "other".to_owned(),
            ..register()
        };
        assert_eq!(request.validate(), Err("Passwords do not match".to_owned()));
        assert!(register().validate().is_ok());
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: Profile =
            serde_json::from_str(r#"{"_id":"s1","email":"a@b.c","shopName":"Crumbs"}"#).unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.c"));
        assert_eq!(profile.details.get("shopName"), Some(&Value::from("Crumbs")));
    }
}
