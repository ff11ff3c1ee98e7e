//! Route tables, one function per resource, each route wired with its
//! validation middleware. Schemas come from the catalogue built at startup;
//! nothing here reaches into a global registry.

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers;
use crate::validation::{
    validate_request, Schema, SchemaCatalogue, SectionSchema, Target, ValidationConfig,
};

pub fn router(catalogue: &SchemaCatalogue) -> Router {
    Router::new()
        .merge(service_routes(catalogue))
        .merge(incident_routes(catalogue))
        .merge(maintenance_routes(catalogue))
        .merge(organization_routes(catalogue))
        .merge(team_routes(catalogue))
        .merge(search_routes(catalogue))
        .merge(public_routes(catalogue))
        .merge(health_routes())
        .fallback(handlers::route_not_found)
}

/// Path `{ id }` plus a body schema, validated in one pass.
fn id_and_body(catalogue: &SchemaCatalogue, body: &Arc<Schema>) -> ValidationConfig {
    ValidationConfig::sections(vec![
        SectionSchema::new(Target::Path, catalogue.id_path.clone()),
        SectionSchema::new(Target::Body, body.clone()),
    ])
}

pub fn service_routes(c: &SchemaCatalogue) -> Router {
    Router::new()
        .route(
            "/api/services",
            get(handlers::list_services).layer(from_fn_with_state(
                ValidationConfig::query(&c.service_filter),
                validate_request,
            )),
        )
        .route(
            "/api/services",
            post(handlers::create_service).layer(from_fn_with_state(
                ValidationConfig::body(&c.service_create),
                validate_request,
            )),
        )
        .route(
            "/api/services/:id",
            patch(handlers::update_service).layer(from_fn_with_state(
                id_and_body(c, &c.service_update),
                validate_request,
            )),
        )
        .route(
            "/api/services/:id/status",
            put(handlers::update_service_status).layer(from_fn_with_state(
                id_and_body(c, &c.service_status),
                validate_request,
            )),
        )
}

pub fn incident_routes(c: &SchemaCatalogue) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            get(handlers::list_incidents).layer(from_fn_with_state(
                ValidationConfig::query(&c.incident_filter),
                validate_request,
            )),
        )
        .route(
            "/api/incidents",
            post(handlers::create_incident).layer(from_fn_with_state(
                ValidationConfig::body(&c.incident_create),
                validate_request,
            )),
        )
        .route(
            "/api/incidents/:id",
            patch(handlers::update_incident).layer(from_fn_with_state(
                id_and_body(c, &c.incident_update),
                validate_request,
            )),
        )
        .route(
            "/api/incidents/:id/updates",
            post(handlers::post_incident_update).layer(from_fn_with_state(
                id_and_body(c, &c.incident_update_entry),
                validate_request,
            )),
        )
        .route(
            "/api/incidents/:id/resolve",
            post(handlers::resolve_incident).layer(from_fn_with_state(
                id_and_body(c, &c.incident_resolution),
                validate_request,
            )),
        )
}

pub fn maintenance_routes(c: &SchemaCatalogue) -> Router {
    Router::new()
        .route(
            "/api/maintenances",
            get(handlers::list_maintenances).layer(from_fn_with_state(
                ValidationConfig::query(&c.maintenance_filter),
                validate_request,
            )),
        )
        .route(
            "/api/maintenances",
            post(handlers::create_maintenance).layer(from_fn_with_state(
                ValidationConfig::body(&c.maintenance_create),
                validate_request,
            )),
        )
        .route(
            "/api/maintenances/:id",
            patch(handlers::update_maintenance).layer(from_fn_with_state(
                id_and_body(c, &c.maintenance_update),
                validate_request,
            )),
        )
}

pub fn organization_routes(c: &SchemaCatalogue) -> Router {
    Router::new()
        .route(
            "/api/organizations",
            post(handlers::create_organization).layer(from_fn_with_state(
                ValidationConfig::body(&c.organization_create),
                validate_request,
            )),
        )
        .route(
            "/api/organizations/:id",
            patch(handlers::update_organization).layer(from_fn_with_state(
                id_and_body(c, &c.organization_update),
                validate_request,
            )),
        )
}

pub fn team_routes(c: &SchemaCatalogue) -> Router {
    Router::new()
        .route(
            "/api/teams",
            post(handlers::create_team).layer(from_fn_with_state(
                ValidationConfig::body(&c.team_create),
                validate_request,
            )),
        )
        .route(
            "/api/teams/:id",
            patch(handlers::update_team).layer(from_fn_with_state(
                id_and_body(c, &c.team_update),
                validate_request,
            )),
        )
        .route(
            "/api/teams/:id/members",
            post(handlers::add_team_member).layer(from_fn_with_state(
                id_and_body(c, &c.team_member_add),
                validate_request,
            )),
        )
}

pub fn search_routes(c: &SchemaCatalogue) -> Router {
    Router::new().route(
        "/api/search",
        get(handlers::search).layer(from_fn_with_state(
            ValidationConfig::query(&c.search),
            validate_request,
        )),
    )
}

pub fn public_routes(c: &SchemaCatalogue) -> Router {
    Router::new().route(
        "/api/status",
        get(handlers::public_status).layer(from_fn_with_state(
            ValidationConfig::query(&c.public_status),
            validate_request,
        )),
    )
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health_check))
}
