//! User (library member) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_person_name;

/// User row from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub membership_date: NaiveDate,
}

/// User as exchanged over the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Ignored on input; the server assigns identifiers
    pub id: Option<Uuid>,
    #[validate(
        required(message = "The name is required"),
        custom(function = "validate_person_name")
    )]
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    /// Set by the server when the user is created; ignored on input
    pub membership_date: Option<NaiveDate>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            name: Some(user.name),
            membership_date: Some(user.membership_date),
        }
    }
}

impl UserDto {
    /// Validate and return the member name
    pub fn into_name(self) -> Result<String, validator::ValidationErrors> {
        self.validate()?;
        Ok(self.name.unwrap_or_default())
    }
}
