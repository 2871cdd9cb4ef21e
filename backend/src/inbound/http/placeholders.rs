//! Placeholder CRM endpoints.
//!
//! Leads, contacts, tasks, user updates and user commands are routed but not
//! implemented yet. Each responds `200 OK` with a fixed plain-text body so
//! clients can integrate against the final paths today.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, patch, post};

fn fixed(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(body)
}

macro_rules! placeholder {
    ($(#[$meta:meta])* $method:ident $path:literal ($doc_path:literal) => $name:ident, $body:literal, $op:literal) => {
        $(#[$meta])*
        #[utoipa::path(
            $method,
            path = $doc_path,
            responses((status = 200, description = "Fixed placeholder text", body = String, content_type = "text/plain")),
            tags = ["placeholders"],
            operation_id = $op
        )]
        #[$method($path)]
        pub async fn $name() -> HttpResponse {
            fixed($body)
        }
    };
}

placeholder!(
    /// Update a user.
    post "/user/update/{id}" ("/api/v1/user/update/{id}") => update_user, "Updated", "updateUser"
);
placeholder!(
    /// Send a command to a user.
    post "/user/command" ("/api/v1/user/command") => user_command, "Notified", "userCommand"
);

placeholder!(get "/query/lead/{id}" ("/api/v1/query/lead/{id}") => get_lead, "Lead", "getLead");
placeholder!(post "/lead/create" ("/api/v1/lead/create") => create_lead, "Created", "createLead");
placeholder!(patch "/lead/update/{id}" ("/api/v1/lead/update/{id}") => update_lead, "Updated", "updateLead");
placeholder!(
    /// Assign a lead.
    post "/lead/command" ("/api/v1/lead/command") => lead_command, "Assigned", "leadCommand"
);

placeholder!(get "/query/contact/{id}" ("/api/v1/query/contact/{id}") => get_contact, "Contact", "getContact");
placeholder!(post "/contact/create" ("/api/v1/contact/create") => create_contact, "Created", "createContact");
placeholder!(patch "/contact/update/{id}" ("/api/v1/contact/update/{id}") => update_contact, "Updated", "updateContact");
placeholder!(
    /// Record that a contact was reached.
    post "/contact/command" ("/api/v1/contact/command") => contact_command, "Contacted", "contactCommand"
);

placeholder!(get "/query/task/{id}" ("/api/v1/query/task/{id}") => get_task, "Task", "getTask");
placeholder!(post "/task/create" ("/api/v1/task/create") => create_task, "Created", "createTask");
placeholder!(patch "/task/update/{id}" ("/api/v1/task/update/{id}") => update_task, "Updated", "updateTask");
placeholder!(
    /// Start a task.
    post "/task/command" ("/api/v1/task/command") => task_command, "Started", "taskCommand"
);

/// Register every placeholder route on a scope.
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(update_user)
        .service(user_command)
        .service(get_lead)
        .service(create_lead)
        .service(update_lead)
        .service(lead_command)
        .service(get_contact)
        .service(create_contact)
        .service(update_contact)
        .service(contact_command)
        .service(get_task)
        .service(create_task)
        .service(update_task)
        .service(task_command);
}
