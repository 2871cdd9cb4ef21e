//! Users API handlers.
//!
//! ```text
//! POST /api/v1/user/create {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com"}
//! GET /api/v1/query/user?id=3fa85f64-5717-4562-b3fc-2c963f66afa6
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreateUserRequest;
use crate::domain::{EmailAddress, Error, PersonName, UserDto, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_validation_error, require_field};

const FIRST_NAME: FieldName = FieldName::new("firstName");
const LAST_NAME: FieldName = FieldName::new("lastName");
const EMAIL: FieldName = FieldName::new("email");
const ID: FieldName = FieldName::new("id");

/// Request body for `POST /api/v1/user/create`.
///
/// Field names are camelCase; snake_case spellings are accepted as aliases.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[serde(default, alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TryFrom<CreateUserBody> for CreateUserRequest {
    type Error = Error;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        let first_name = require_field(body.first_name, FIRST_NAME)?;
        let last_name = require_field(body.last_name, LAST_NAME)?;
        let email = require_field(body.email, EMAIL)?;
        Ok(Self {
            first_name: PersonName::first(first_name)
                .map_err(|err| field_validation_error(FIRST_NAME, &err))?,
            last_name: PersonName::last(last_name)
                .map_err(|err| field_validation_error(LAST_NAME, &err))?,
            email: EmailAddress::new(email).map_err(|err| field_validation_error(EMAIL, &err))?,
        })
    }
}

/// Query parameters for `GET /api/v1/query/user`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserLookupParams {
    /// Identifier returned by the create endpoint.
    pub id: Option<String>,
}

/// Create a user, publishing a creation event once the row is committed.
///
/// A failure to publish the event is reported as a 500 even though the user
/// was stored.
#[utoipa::path(
    post,
    path = "/api/v1/user/create",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user/create")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.create_user.create_user(request).await?;
    Ok(HttpResponse::Created().json(UserDto::from(user)))
}

/// Fetch a single user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/query/user",
    params(UserLookupParams),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/query/user")]
pub async fn get_user(
    state: web::Data<HttpState>,
    query: web::Query<UserLookupParams>,
) -> ApiResult<web::Json<UserDto>> {
    let raw = require_field(query.into_inner().id, ID)?;
    let id = UserId::new(raw).map_err(|err| field_validation_error(ID, &err))?;
    debug!(user_id = %id, "looking up user");
    let user = state.lookup.fetch_user(&id).await?;
    Ok(web::Json(UserDto::from(user)))
}
