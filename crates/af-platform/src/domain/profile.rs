//! Profile Entity
//!
//! A portal user: either an applicant (student) or administrative staff.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Portal role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Admin,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Contact and demographic fields collected by the application wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub emergency_contact: Option<String>,
}

/// A portal user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub role: UserRole,
    pub full_name: String,
    pub email: String,

    /// Argon2 hash; never serialized.
    #[serde(skip)]
    pub password_hash: Option<String>,

    #[serde(flatten)]
    pub contact: ContactDetails,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: crate::TsidGenerator::generate(),
            role,
            full_name: full_name.into(),
            email: email.into().to_lowercase(),
            password_hash: None,
            contact: ContactDetails::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Merge non-empty wizard fields into the profile, stamping updated_at.
    pub fn apply_contact_update(&mut self, update: ContactDetails) {
        macro_rules! merge {
            ($field:ident) => {
                if update.$field.is_some() {
                    self.contact.$field = update.$field;
                }
            };
        }
        merge!(phone);
        merge!(date_of_birth);
        merge!(gender);
        merge!(nationality);
        merge!(address);
        merge!(city);
        merge!(state);
        merge!(pincode);
        merge!(father_name);
        merge!(mother_name);
        merge!(emergency_contact);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_lowercases_email() {
        let p = Profile::new("Asha Rao", "Asha.Rao@Example.com", UserRole::Student);
        assert_eq!(p.email, "asha.rao@example.com");
        assert!(!p.is_admin());
    }

    #[test]
    fn contact_update_keeps_existing_values() {
        let mut p = Profile::new("Asha Rao", "asha@example.com", UserRole::Student);
        p.contact.city = Some("Pune".to_string());

        p.apply_contact_update(ContactDetails {
            phone: Some("9876543210".to_string()),
            ..Default::default()
        });

        assert_eq!(p.contact.phone.as_deref(), Some("9876543210"));
        assert_eq!(p.contact.city.as_deref(), Some("Pune"));
    }
}
