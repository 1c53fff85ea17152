use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(CategoryId);
id_newtype!(UniversityId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    Topic,
    Product,
}

impl CategoryType {
    pub const ALL: [CategoryType; 2] = [CategoryType::Topic, CategoryType::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Topic => "TOPIC",
            CategoryType::Product => "PRODUCT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UniversityStatus {
    Active,
    Inactive,
    Deleted,
}

impl UniversityStatus {
    pub const ALL: [UniversityStatus; 3] = [
        UniversityStatus::Active,
        UniversityStatus::Inactive,
        UniversityStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UniversityStatus::Active => "ACTIVE",
            UniversityStatus::Inactive => "INACTIVE",
            UniversityStatus::Deleted => "DELETED",
        }
    }

    /// The status a toggle request would move to. A deleted record has no
    /// valid transition and is never offered one.
    pub fn toggled(self) -> Option<UniversityStatus> {
        match self {
            UniversityStatus::Active => Some(UniversityStatus::Inactive),
            UniversityStatus::Inactive => Some(UniversityStatus::Active),
            UniversityStatus::Deleted => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SystemAdmin,
    Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: UniversityId,
    pub name: String,
    pub short_name: String,
    pub address: String,
    pub city: String,
    pub website: String,
    pub logo_url: String,
    pub description: String,
    pub email_domain: String,
    pub status: UniversityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_verified: bool,
}
