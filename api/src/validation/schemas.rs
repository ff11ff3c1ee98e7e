//! The resource schema catalogue.
//!
//! Every (resource, operation) pair exposed by the API gets one named schema
//! here. The catalogue is built once at startup and handed explicitly to the
//! middleware factories; there is no ambient global registry.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use shared::models::{
    IncidentSeverity, IncidentStatus, MaintenanceStatus, SearchType, ServiceStatus, TeamRole,
};

use super::constraint::{Constraint, ConstraintKind};
use super::schema::{field, Field, Schema, SchemaError};

lazy_static! {
    /// URL-safe slug: lowercase letters, digits, hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

const SLUG_MESSAGE: &str = "may only contain lowercase letters, numbers, and hyphens";

/// Shared field length limits
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 255;
const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 255;
const DESCRIPTION_MIN: usize = 1;
const DESCRIPTION_MAX: usize = 1000;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 1000;
const SLUG_MIN: usize = 2;
const SLUG_MAX: usize = 100;
const QUERY_MIN: usize = 2;
const QUERY_MAX: usize = 100;

/// Pagination caps shared by every filter schema
const PAGE_MAX: i64 = 1000;
const LIMIT_MAX: i64 = 100;
const DAYS_MAX: i64 = 90;

fn slug() -> ConstraintKind {
    ConstraintKind::matching(SLUG_MIN, SLUG_MAX, SLUG_REGEX.clone(), SLUG_MESSAGE)
}

/// `page`/`limit` fragment merged into every filter/list schema.
fn pagination_fields() -> Vec<Field> {
    vec![
        field(
            "page",
            Constraint::with_default(ConstraintKind::integer(1, PAGE_MAX), json!(1)),
        ),
        field(
            "limit",
            Constraint::with_default(ConstraintKind::integer(1, LIMIT_MAX), json!(20)),
        ),
    ]
}

fn with_pagination(mut fields: Vec<Field>) -> Vec<Field> {
    let mut all = pagination_fields();
    all.append(&mut fields);
    all
}

/// Every schema the route surface validates against, built once at startup.
#[derive(Debug, Clone)]
pub struct SchemaCatalogue {
    /// `{ id: uuid }` for every `/:id` route's path section
    pub id_path: Arc<Schema>,

    pub service_create: Arc<Schema>,
    pub service_update: Arc<Schema>,
    pub service_status: Arc<Schema>,
    pub service_filter: Arc<Schema>,

    pub incident_create: Arc<Schema>,
    pub incident_update: Arc<Schema>,
    pub incident_filter: Arc<Schema>,
    pub incident_update_entry: Arc<Schema>,
    pub incident_resolution: Arc<Schema>,

    pub maintenance_create: Arc<Schema>,
    pub maintenance_update: Arc<Schema>,
    pub maintenance_filter: Arc<Schema>,

    pub organization_create: Arc<Schema>,
    pub organization_update: Arc<Schema>,

    pub team_create: Arc<Schema>,
    pub team_update: Arc<Schema>,
    pub team_member_add: Arc<Schema>,

    pub search: Arc<Schema>,
    pub public_status: Arc<Schema>,
}

impl SchemaCatalogue {
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            id_path: Arc::new(Schema::new(
                "id.path",
                vec![field("id", Constraint::required(ConstraintKind::uuid()))],
            )?),

            service_create: Arc::new(service_create()?),
            service_update: Arc::new(service_update()?),
            service_status: Arc::new(service_status()?),
            service_filter: Arc::new(service_filter()?),

            incident_create: Arc::new(incident_create()?),
            incident_update: Arc::new(incident_update()?),
            incident_filter: Arc::new(incident_filter()?),
            incident_update_entry: Arc::new(incident_update_entry()?),
            incident_resolution: Arc::new(incident_resolution()?),

            maintenance_create: Arc::new(maintenance_create()?),
            maintenance_update: Arc::new(maintenance_update()?),
            maintenance_filter: Arc::new(maintenance_filter()?),

            organization_create: Arc::new(organization_create()?),
            organization_update: Arc::new(organization_update()?),

            team_create: Arc::new(team_create()?),
            team_update: Arc::new(team_update()?),
            team_member_add: Arc::new(team_member_add()?),

            search: Arc::new(search()?),
            public_status: Arc::new(public_status()?),
        })
    }
}

fn service_create() -> Result<Schema, SchemaError> {
    Schema::new(
        "service.create",
        vec![
            field(
                "name",
                Constraint::required(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field(
                "description",
                Constraint::optional(ConstraintKind::nullable_text(
                    DESCRIPTION_MIN,
                    DESCRIPTION_MAX,
                )),
            ),
            field(
                "status",
                Constraint::with_default(
                    ConstraintKind::one_of(ServiceStatus::ALL),
                    json!(ServiceStatus::Operational.as_str()),
                ),
            ),
            field("team_id", Constraint::optional(ConstraintKind::uuid())),
        ],
    )
}

fn service_update() -> Result<Schema, SchemaError> {
    Schema::with_min_present(
        "service.update",
        vec![
            field(
                "name",
                Constraint::optional(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field(
                "description",
                Constraint::optional(ConstraintKind::nullable_text(
                    DESCRIPTION_MIN,
                    DESCRIPTION_MAX,
                )),
            ),
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(ServiceStatus::ALL)),
            ),
            field("team_id", Constraint::optional(ConstraintKind::uuid())),
        ],
        1,
    )
}

fn service_status() -> Result<Schema, SchemaError> {
    Schema::new(
        "service.status",
        vec![
            field(
                "status",
                Constraint::required(ConstraintKind::one_of(ServiceStatus::ALL)),
            ),
            field(
                "message",
                Constraint::optional(ConstraintKind::nullable_text(
                    DESCRIPTION_MIN,
                    DESCRIPTION_MAX,
                )),
            ),
        ],
    )
}

fn service_filter() -> Result<Schema, SchemaError> {
    Schema::new(
        "service.filter",
        with_pagination(vec![
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(ServiceStatus::ALL)),
            ),
            field("team_id", Constraint::optional(ConstraintKind::uuid())),
        ]),
    )
}

fn incident_create() -> Result<Schema, SchemaError> {
    Schema::new(
        "incident.create",
        vec![
            field(
                "title",
                Constraint::required(ConstraintKind::text_no_html(TITLE_MIN, TITLE_MAX)),
            ),
            field(
                "message",
                Constraint::optional(ConstraintKind::nullable_text(MESSAGE_MIN, MESSAGE_MAX)),
            ),
            field(
                "severity",
                Constraint::required(ConstraintKind::one_of(IncidentSeverity::ALL)),
            ),
            field(
                "status",
                Constraint::with_default(
                    ConstraintKind::one_of(IncidentStatus::ALL),
                    json!(IncidentStatus::Investigating.as_str()),
                ),
            ),
            field("service_id", Constraint::optional(ConstraintKind::uuid())),
        ],
    )
}

fn incident_update() -> Result<Schema, SchemaError> {
    Schema::with_min_present(
        "incident.update",
        vec![
            field(
                "title",
                Constraint::optional(ConstraintKind::text_no_html(TITLE_MIN, TITLE_MAX)),
            ),
            field(
                "severity",
                Constraint::optional(ConstraintKind::one_of(IncidentSeverity::ALL)),
            ),
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(IncidentStatus::ALL)),
            ),
            field("service_id", Constraint::optional(ConstraintKind::uuid())),
        ],
        1,
    )
}

fn incident_filter() -> Result<Schema, SchemaError> {
    Schema::new(
        "incident.filter",
        with_pagination(vec![
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(IncidentStatus::ALL)),
            ),
            field(
                "severity",
                Constraint::optional(ConstraintKind::one_of(IncidentSeverity::ALL)),
            ),
            field("service_id", Constraint::optional(ConstraintKind::uuid())),
        ]),
    )
}

/// A timeline entry posted while an incident is open.
fn incident_update_entry() -> Result<Schema, SchemaError> {
    Schema::new(
        "incident.update_entry",
        vec![
            field(
                "message",
                Constraint::required(ConstraintKind::text_no_html(MESSAGE_MIN, MESSAGE_MAX)),
            ),
            field(
                "status",
                Constraint::required(ConstraintKind::one_of(IncidentStatus::ALL)),
            ),
        ],
    )
}

fn incident_resolution() -> Result<Schema, SchemaError> {
    Schema::new(
        "incident.resolution",
        vec![field(
            "resolution",
            Constraint::optional(ConstraintKind::nullable_text(MESSAGE_MIN, MESSAGE_MAX)),
        )],
    )
}

fn maintenance_create() -> Result<Schema, SchemaError> {
    Schema::new(
        "maintenance.create",
        vec![
            field(
                "title",
                Constraint::required(ConstraintKind::text_no_html(TITLE_MIN, TITLE_MAX)),
            ),
            field(
                "description",
                Constraint::optional(ConstraintKind::nullable_text(
                    DESCRIPTION_MIN,
                    DESCRIPTION_MAX,
                )),
            ),
            field("service_id", Constraint::optional(ConstraintKind::uuid())),
            field(
                "scheduled_start",
                Constraint::required(ConstraintKind::date()),
            ),
            field(
                "scheduled_end",
                Constraint::required(ConstraintKind::date_after("scheduled_start")),
            ),
            field(
                "status",
                Constraint::with_default(
                    ConstraintKind::one_of(MaintenanceStatus::ALL),
                    json!(MaintenanceStatus::Scheduled.as_str()),
                ),
            ),
        ],
    )
}

fn maintenance_update() -> Result<Schema, SchemaError> {
    Schema::with_min_present(
        "maintenance.update",
        vec![
            field(
                "title",
                Constraint::optional(ConstraintKind::text_no_html(TITLE_MIN, TITLE_MAX)),
            ),
            field(
                "description",
                Constraint::optional(ConstraintKind::nullable_text(
                    DESCRIPTION_MIN,
                    DESCRIPTION_MAX,
                )),
            ),
            field(
                "scheduled_start",
                Constraint::optional(ConstraintKind::date()),
            ),
            field(
                "scheduled_end",
                Constraint::optional(ConstraintKind::date_after("scheduled_start")),
            ),
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(MaintenanceStatus::ALL)),
            ),
        ],
        1,
    )
}

fn maintenance_filter() -> Result<Schema, SchemaError> {
    Schema::new(
        "maintenance.filter",
        with_pagination(vec![
            field(
                "status",
                Constraint::optional(ConstraintKind::one_of(MaintenanceStatus::ALL)),
            ),
            field("service_id", Constraint::optional(ConstraintKind::uuid())),
        ]),
    )
}

fn organization_create() -> Result<Schema, SchemaError> {
    Schema::new(
        "organization.create",
        vec![
            field(
                "name",
                Constraint::required(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field("slug", Constraint::required(slug())),
        ],
    )
}

fn organization_update() -> Result<Schema, SchemaError> {
    Schema::with_min_present(
        "organization.update",
        vec![
            field(
                "name",
                Constraint::optional(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field("slug", Constraint::optional(slug())),
        ],
        1,
    )
}

fn team_create() -> Result<Schema, SchemaError> {
    Schema::new(
        "team.create",
        vec![
            field(
                "name",
                Constraint::required(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field("slug", Constraint::required(slug())),
            field(
                "organization_id",
                Constraint::required(ConstraintKind::uuid()),
            ),
        ],
    )
}

fn team_update() -> Result<Schema, SchemaError> {
    Schema::with_min_present(
        "team.update",
        vec![
            field(
                "name",
                Constraint::optional(ConstraintKind::text_no_html(NAME_MIN, NAME_MAX)),
            ),
            field("slug", Constraint::optional(slug())),
        ],
        1,
    )
}

fn team_member_add() -> Result<Schema, SchemaError> {
    Schema::new(
        "team.member_add",
        vec![
            field("user_id", Constraint::required(ConstraintKind::uuid())),
            field(
                "role",
                Constraint::with_default(
                    ConstraintKind::one_of(TeamRole::ALL),
                    json!(TeamRole::Member.as_str()),
                ),
            ),
        ],
    )
}

fn search() -> Result<Schema, SchemaError> {
    Schema::new(
        "search",
        vec![
            field(
                "q",
                Constraint::required(ConstraintKind::text(QUERY_MIN, QUERY_MAX)),
            ),
            field(
                "type",
                Constraint::with_default(
                    ConstraintKind::one_of(SearchType::ALL),
                    json!(SearchType::All.as_str()),
                ),
            ),
        ],
    )
}

fn public_status() -> Result<Schema, SchemaError> {
    Schema::new(
        "public.status",
        vec![
            field("organization", Constraint::required(slug())),
            field("team", Constraint::optional(slug())),
            field(
                "include_services",
                Constraint::with_default(ConstraintKind::Boolean, json!(true)),
            ),
            field(
                "include_incidents",
                Constraint::with_default(ConstraintKind::Boolean, json!(true)),
            ),
            field(
                "include_maintenances",
                Constraint::with_default(ConstraintKind::Boolean, json!(true)),
            ),
            field(
                "days",
                Constraint::with_default(ConstraintKind::integer(1, DAYS_MAX), json!(7)),
            ),
        ],
    )
}
