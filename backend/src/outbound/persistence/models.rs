//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{NewUser, User, UserValidationError};

use super::schema::users;

/// Row read back from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        User::try_from_columns(
            row.id,
            row.first_name,
            row.last_name,
            row.email,
            row.created_at,
        )
    }
}

/// Insert parameters. `created_at` is left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(value: &'a NewUser) -> Self {
        Self {
            id: value.id.as_ref(),
            first_name: value.first_name.as_ref(),
            last_name: value.last_name.as_ref(),
            email: value.email.as_ref(),
        }
    }
}
