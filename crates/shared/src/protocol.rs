use serde::{Deserialize, Serialize};

use crate::domain::{CategoryType, UniversityStatus, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserProfile,
}

/// One page of a list endpoint. Replaces the displayed page wholesale; items
/// are never merged into previous state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl<T> PageResponse<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            total_elements: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: UniversityStatus,
}
