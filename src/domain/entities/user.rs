use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::form::{Editable, FieldErrors, FieldReader, FormField, FormValues};
use crate::domain::entities::record::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::User => "User",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Admin" => Some(UserRole::Admin),
            "Manager" => Some(UserRole::Manager),
            "User" => Some(UserRole::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            "suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub phone: String,
    pub country: String,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub phone: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub phone: Option<String>,
    pub country: Option<String>,
}

impl Record for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value = match key {
            "id" => match self.id.parse::<i64>() {
                Ok(id) => FieldValue::Integer(id),
                Err(_) => FieldValue::from(self.id.as_str()),
            },
            "name" => FieldValue::from(self.name.as_str()),
            "email" => FieldValue::from(self.email.as_str()),
            "role" => FieldValue::from(self.role.as_str()),
            "status" => FieldValue::from(self.status.as_str()),
            "phone" => FieldValue::from(self.phone.as_str()),
            "country" => FieldValue::from(self.country.as_str()),
            "lastActive" => {
                FieldValue::Text(self.last_active.format("%Y-%m-%d %H:%M").to_string())
            }
            _ => return None,
        };
        Some(value)
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn from_draft(id: String, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: draft.status,
            phone: draft.phone,
            country: draft.country,
            last_active: Utc::now(),
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
    }
}

const USER_FORM: &[FormField] = &[
    FormField::text("name", "Full Name"),
    FormField::text("email", "Email"),
    FormField::choice("role", "Role", &["Admin", "Manager", "User"]),
    FormField::choice("status", "Status", &["active", "inactive", "suspended"]),
    FormField::text("phone", "Phone"),
    FormField::text("country", "Country"),
];

struct UserFields {
    name: Option<String>,
    email: Option<String>,
    role: Option<UserRole>,
    status: Option<UserStatus>,
    phone: Option<String>,
    country: Option<String>,
}

fn read_user_fields(reader: &mut FieldReader<'_>) -> UserFields {
    UserFields {
        name: reader.text("name", 1, "Name cannot be empty"),
        email: reader.email("email"),
        role: reader.choice("role", UserRole::parse),
        status: reader.choice("status", UserStatus::parse),
        phone: reader.phone("phone"),
        country: reader.text("country", 1, "Country is required"),
    }
}

impl Editable for User {
    fn form_fields() -> &'static [FormField] {
        USER_FORM
    }

    fn form_values(&self) -> FormValues {
        [
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("role", self.role.as_str().to_string()),
            ("status", self.status.as_str().to_string()),
            ("phone", self.phone.clone()),
            ("country", self.country.clone()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    fn parse_draft(values: &FormValues) -> Result<NewUser, FieldErrors> {
        let mut reader = FieldReader::new(values);
        let fields = read_user_fields(&mut reader);
        let name = reader.require("name", fields.name);
        let email = reader.require("email", fields.email);
        let role = reader.require("role", fields.role);
        let status = reader.require("status", fields.status);
        let phone = reader.require("phone", fields.phone);
        let country = reader.require("country", fields.country);
        let draft = match (name, email, role, status, phone, country) {
            (Some(name), Some(email), Some(role), Some(status), Some(phone), Some(country)) => {
                Some(NewUser {
                    name,
                    email,
                    role,
                    status,
                    phone,
                    country,
                })
            }
            _ => None,
        };
        reader.finish_complete(draft)
    }

    fn parse_patch(values: &FormValues) -> Result<UserPatch, FieldErrors> {
        let mut reader = FieldReader::new(values);
        let fields = read_user_fields(&mut reader);
        reader.finish(UserPatch {
            name: fields.name,
            email: fields.email,
            role: fields.role,
            status: fields.status,
            phone: fields.phone,
            country: fields.country,
        })
    }
}
