//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP path and the wire schemas they reference.
//! Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, UserDto};
use crate::inbound::http::{health, placeholders, users};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SimpleCRM backend API",
        description = "User creation and lookup, placeholder CRM endpoints, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        users::create_user,
        users::get_user,
        placeholders::update_user,
        placeholders::user_command,
        placeholders::get_lead,
        placeholders::create_lead,
        placeholders::update_lead,
        placeholders::lead_command,
        placeholders::get_contact,
        placeholders::create_contact,
        placeholders::update_contact,
        placeholders::contact_command,
        placeholders::get_task,
        placeholders::create_task,
        placeholders::update_task,
        placeholders::task_command,
        health::ready,
        health::live,
    ),
    components(schemas(UserDto, users::CreateUserBody, Error, ErrorCode)),
    tags(
        (name = "users", description = "User creation and lookup"),
        (name = "placeholders", description = "Routed but not yet implemented"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
