//! SimpleCRM backend library.
//!
//! Hexagonal layout: `domain` holds the user model, ports and the creation
//! workflow; `outbound` implements the store and event ports; `inbound::http`
//! exposes the REST surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
