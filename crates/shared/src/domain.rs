use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory record as returned by the remote service.
///
/// `website` carries the department; `phone` is kept for wire compatibility
/// and is always submitted empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
}

impl User {
    pub fn first_name(&self) -> &str {
        split_name(&self.name).0
    }

    pub fn last_name(&self) -> &str {
        split_name(&self.name).1
    }

    pub fn department(&self) -> &str {
        &self.website
    }

    /// String form of every field, in wire order. An absent id contributes nothing.
    pub fn searchable_values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(5);
        if let Some(id) = self.id {
            values.push(id.to_string());
        }
        values.push(self.name.clone());
        values.push(self.email.clone());
        values.push(self.phone.clone());
        values.push(self.website.clone());
        values
    }

    /// Case-insensitive substring match against every field.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.searchable_values()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Request body for create and update calls: a [`User`] without its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

impl UserDraft {
    pub fn into_user(self, id: Option<UserId>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            website: self.website,
        }
    }
}

/// The operator-editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Department,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Department,
    ];

    pub fn id(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Department => "department",
        }
    }

    /// Identifier of the error slot rendered beside this field.
    pub fn error_slot(self) -> String {
        format!("{}Error", self.id())
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Email => "Email",
            FormField::Department => "Department",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl FormValues {
    pub fn from_user(user: &User) -> Self {
        let (first_name, last_name) = split_name(&user.name);
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: user.email.clone(),
            department: user.website.clone(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Department => &self.department,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::FirstName => self.first_name = value,
            FormField::LastName => self.last_name = value,
            FormField::Email => self.email = value,
            FormField::Department => self.department = value,
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
        }
    }

    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: compose_name(&self.first_name, &self.last_name),
            email: self.email.clone(),
            phone: String::new(),
            website: self.department.clone(),
        }
    }
}

/// Joins first and last name with a single space. An empty last name adds no
/// separator, so a one-word name comes back unchanged.
pub fn compose_name(first: &str, last: &str) -> String {
    if last.is_empty() {
        first.to_string()
    } else {
        format!("{first} {last}")
    }
}

/// Splits a display name on its first space. Multi-word first names do not
/// survive the round trip.
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_once(' ').unwrap_or((name, ""))
}
