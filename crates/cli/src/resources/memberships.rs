//! Memberships link a user to an organization. The API stores them per
//! organization type (`broker-memberships`, `trucker-memberships`, ...) but
//! reads work across all of them through `/v1/memberships`.

use crate::{
    GlobalArgs,
    resources::{
        self, DeleteArgs, Details, ORGANIZATION_NAME, PageArgs, TableRow,
        organization_fields,
    },
    util::{DetailBlock, format_date, print_json, truncate},
};
use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Related, Resource, ResourceBody},
    resource_type::{
        class_name, parse_reference, reference_filter, singular_type,
    },
};

const PATH: &str = "/v1/memberships";

/// Browse memberships of every organization type
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List memberships, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a membership
    Show {
        /// Membership ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "memberships")
                    .await
            }
            Self::Show { id } => {
                resources::show::<MembershipDetails>(
                    global,
                    PATH,
                    &id,
                    &show_query(),
                )
                .await
            }
        }
    }
}

/// Create, update and delete memberships
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Add a user to an organization
    Create(CreateArgs),
    /// Update a membership. Only the given fields are changed
    Update {
        /// Membership ID
        id: String,
        #[command(flatten)]
        fields: MembershipFields,
    },
    /// Remove a user from an organization
    Delete(DeleteArgs),
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::Create(args) => {
                let (path, body) = args.request()?;
                let document = resources::create(global, &path, &body).await?;
                let details = MembershipDetails::from_document(&document);
                if global.json {
                    print_json(&details, global.omit_null)
                } else {
                    println!("Created membership {}\n", details.id);
                    print!("{}", details.block());
                    Ok(())
                }
            }
            Self::Update { id, fields } => update(global, &id, &fields).await,
            Self::Delete(args) => {
                resources::delete(global, PATH, "membership", &args).await
            }
        }
    }
}

/// Memberships can only be changed through their type-specific endpoint, so
/// look up the type first
async fn update(
    global: &GlobalArgs,
    id: &str,
    fields: &MembershipFields,
) -> anyhow::Result<()> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Resource ID is required");
    }
    let body = fields.apply(ResourceBody::update("memberships", id));
    if !body.has_changes() {
        bail!("At least one field to update is required");
    }

    let client = global.write_client()?;
    let existing = client
        .get(&format!("{PATH}/{id}"), &Query::new())
        .await
        .with_context(|| format!("Error fetching membership {id}"))?;
    let membership_type = Document::<Resource>::decode(&existing)?
        .data
        .resource_type;
    debug!(%membership_type, id, "Resolved membership type");

    let body = fields.apply(ResourceBody::update(&membership_type, id));
    let response = client
        .patch(
            &format!("/v1/{membership_type}/{id}"),
            body.to_bytes().context("Error encoding request body")?,
        )
        .await?;
    let document = Document::<Resource>::decode(&response)?;
    if global.json {
        print_json(&json!({"id": document.data.id}), global.omit_null)
    } else {
        println!("Updated membership {}", document.data.id);
        Ok(())
    }
}

/// JSON:API type and endpoint for memberships of an organization type, e.g.
/// `brokers` -> `broker-memberships`
fn membership_type(organization_type: &str) -> (String, String) {
    let membership_type =
        format!("{}-memberships", singular_type(organization_type));
    let path = format!("/v1/{membership_type}");
    (membership_type, path)
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by broker ID
    #[clap(long)]
    broker: Option<String>,
    /// Filter by user ID
    #[clap(long)]
    user: Option<String>,
    /// Filter by organization (Type|ID, e.g. Broker|123)
    #[clap(long)]
    organization: Option<String>,
    /// Filter by project office ID
    #[clap(long)]
    project_office: Option<String>,
    /// Filter by role (operations, manager)
    #[clap(long)]
    kind: Option<String>,
    /// Search by user name
    #[clap(long)]
    q: Option<String>,
    /// Filter by shift type (any, day, night)
    #[clap(long)]
    drives_shift_type: Option<String>,
    /// Filter by external employee ID
    #[clap(long)]
    external_employee_id: Option<String>,
    /// Filter by rate editor flag (true/false)
    #[clap(long)]
    is_rate_editor: Option<String>,
    /// Filter by time card auditor flag (true/false)
    #[clap(long)]
    is_time_card_auditor: Option<String>,
    /// Filter by equipment rental team flag (true/false)
    #[clap(long)]
    is_equipment_rental_team_member: Option<String>,
    /// Filter by geofence violation team flag (true/false)
    #[clap(long)]
    is_geofence_violation_team_member: Option<String>,
    /// Filter by unapproved time card subscription (true/false)
    #[clap(long)]
    is_unapproved_time_card_subscriber: Option<String>,
    /// Filter by default job production plan subscription (true/false)
    #[clap(long)]
    is_default_job_production_plan_subscriber: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.include(&["user", "organization", "broker"]);
        query.fields("users", &["name", "email-address", "mobile-number"]);
        organization_fields(&mut query);
        self.page.apply(&mut query);

        let organization = self.organization.as_deref().map(reference_filter);
        for (name, value) in [
            ("broker", self.broker.as_deref()),
            ("user", self.user.as_deref()),
            ("organization", organization.as_deref()),
            ("project_office", self.project_office.as_deref()),
            ("kind", self.kind.as_deref()),
            ("q", self.q.as_deref()),
            ("drives_shift_type", self.drives_shift_type.as_deref()),
            ("external_employee_id", self.external_employee_id.as_deref()),
            ("is_rate_editor", self.is_rate_editor.as_deref()),
            ("is_time_card_auditor", self.is_time_card_auditor.as_deref()),
            (
                "is_equipment_rental_team_member",
                self.is_equipment_rental_team_member.as_deref(),
            ),
            (
                "is_geofence_violation_team_member",
                self.is_geofence_violation_team_member.as_deref(),
            ),
            (
                "is_unapproved_time_card_subscriber",
                self.is_unapproved_time_card_subscriber.as_deref(),
            ),
            (
                "is_default_job_production_plan_subscriber",
                self.is_default_job_production_plan_subscriber.as_deref(),
            ),
        ] {
            query.filter(name, value);
        }
        query
    }
}

fn show_query() -> Query {
    let mut query = Query::new();
    query.include(&["user", "organization", "broker", "project-office"]);
    query.fields("users", &["name", "email-address", "mobile-number"]);
    query.fields("project-offices", &["name"]);
    organization_fields(&mut query);
    query
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_mobile: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    broker_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    broker_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    kind: String,
    is_admin: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    external_employee_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    color_hex: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] =
        &["ID", "USER", "TYPE", "NAME", "KIND"];

    fn from_resource(resource: &Resource, included: &Included) -> Self {
        let attributes = &resource.attributes;
        let user = Related::resolve(resource, included, "user", &["name"]);
        let user_resource = resource
            .relationships
            .to_one("user")
            .and_then(|identifier| included.resolve(identifier));
        let organization = Related::resolve(
            resource,
            included,
            "organization",
            ORGANIZATION_NAME,
        );
        let broker =
            Related::resolve(resource, included, "broker", &["company-name"]);
        Self {
            id: resource.id.clone(),
            user_id: user.id,
            user_name: user.name,
            user_email: user_resource
                .map(|user| user.attributes.string("email-address"))
                .unwrap_or_default(),
            user_mobile: user_resource
                .map(|user| user.attributes.string("mobile-number"))
                .unwrap_or_default(),
            organization_type: organization.resource_type,
            organization_id: organization.id,
            organization_name: organization.name,
            broker_id: broker.id,
            broker_name: broker.name,
            kind: attributes.string("kind"),
            is_admin: attributes.bool("is-admin"),
            title: attributes.string("title"),
            external_employee_id: attributes.string("external-employee-id"),
            color_hex: attributes.string("color-hex"),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            truncate(&self.user_name, 20),
            class_name(&self.organization_type),
            truncate(&self.organization_name, 25),
            self.kind.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MembershipDetails {
    id: String,
    #[serde(rename = "type")]
    membership_type: String,
    user_id: String,
    user_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    user_mobile: String,
    organization_type: String,
    organization_id: String,
    organization_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    broker_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    broker_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    project_office_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    project_office_name: String,
    kind: String,
    is_admin: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    color_hex: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    external_employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_sort_order: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    start_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    end_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    drives_shift_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    trailer_coassignments_reset_on: String,
    can_see_rates_as_driver: bool,
    can_see_rates_as_manager: bool,
    can_validate_profit_improvements: bool,
    is_rate_editor: bool,
    is_time_card_auditor: bool,
    is_equipment_rental_team_member: bool,
    is_geofence_violation_team_member: bool,
    is_unapproved_time_card_subscriber: bool,
    is_default_job_production_plan_subscriber: bool,
    enable_recap_notifications: bool,
    enable_inventory_capacity_notifications: bool,
}

impl Details for MembershipDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let included = document.included();
        let resource = &document.data;
        let attributes = &resource.attributes;
        let user = Related::resolve(resource, &included, "user", &["name"]);
        let user_resource = resource
            .relationships
            .to_one("user")
            .and_then(|identifier| included.resolve(identifier));
        let organization = Related::resolve(
            resource,
            &included,
            "organization",
            ORGANIZATION_NAME,
        );
        let broker =
            Related::resolve(resource, &included, "broker", &["company-name"]);
        let project_office =
            Related::resolve(resource, &included, "project-office", &["name"]);
        let flag = |key: &str| attributes.bool(key);

        Self {
            id: resource.id.clone(),
            membership_type: resource.resource_type.clone(),
            user_id: user.id,
            user_name: user.name,
            user_email: user_resource
                .map(|user| user.attributes.string("email-address"))
                .unwrap_or_default(),
            user_mobile: user_resource
                .map(|user| user.attributes.string("mobile-number"))
                .unwrap_or_default(),
            organization_type: organization.resource_type,
            organization_id: organization.id,
            organization_name: organization.name,
            broker_id: broker.id,
            broker_name: broker.name,
            project_office_id: project_office.id,
            project_office_name: project_office.name,
            kind: attributes.string("kind"),
            is_admin: flag("is-admin"),
            title: attributes.string("title"),
            color_hex: attributes.string("color-hex"),
            external_employee_id: attributes.string("external-employee-id"),
            explicit_sort_order: attributes
                .any("explicit-sort-order")
                .map(|_| attributes.int("explicit-sort-order")),
            start_at: attributes.string("start-at"),
            end_at: attributes.string("end-at"),
            drives_shift_type: attributes.string("drives-shift-type"),
            trailer_coassignments_reset_on: attributes
                .string("trailer-coassignments-reset-on"),
            can_see_rates_as_driver: flag("can-see-rates-as-driver"),
            can_see_rates_as_manager: flag("can-see-rates-as-manager"),
            can_validate_profit_improvements: flag(
                "can-validate-profit-improvements",
            ),
            is_rate_editor: flag("is-rate-editor"),
            is_time_card_auditor: flag("is-time-card-auditor"),
            is_equipment_rental_team_member: flag(
                "is-equipment-rental-team-member",
            ),
            is_geofence_violation_team_member: flag(
                "is-geofence-violation-team-member",
            ),
            is_unapproved_time_card_subscriber: flag(
                "is-unapproved-time-card-subscriber",
            ),
            is_default_job_production_plan_subscriber: flag(
                "is-default-job-production-plan-subscriber",
            ),
            enable_recap_notifications: flag("enable-recap-notifications"),
            enable_inventory_capacity_notifications: flag(
                "enable-inventory-capacity-notifications",
            ),
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Type", &self.membership_type)
            .section("User")
            .field("ID", &self.user_id)
            .field("Name", &self.user_name)
            .field("Email", &self.user_email)
            .field("Mobile", &self.user_mobile)
            .section("Organization")
            .field("Type", &self.organization_type)
            .field("ID", &self.organization_id)
            .field("Name", &self.organization_name)
            .section("Broker")
            .field("ID", &self.broker_id)
            .field("Name", &self.broker_name)
            .section("Project Office")
            .field("ID", &self.project_office_id)
            .field("Name", &self.project_office_name)
            .section("Role")
            .field("Kind", &self.kind)
            .flag("Is Admin", self.is_admin)
            .field("Title", &self.title)
            .field("Color", &self.color_hex)
            .field("External Employee ID", &self.external_employee_id)
            .field(
                "Explicit Sort Order",
                self.explicit_sort_order
                    .map(|order| order.to_string())
                    .unwrap_or_default(),
            )
            .field("Drives Shift Type", &self.drives_shift_type)
            .field(
                "Trailer Coassignments Reset On",
                format_date(&self.trailer_coassignments_reset_on),
            )
            .section("Effective Period")
            .field("Start", format_date(&self.start_at))
            .field("End", format_date(&self.end_at))
            .section("Permissions")
            .flag("Can See Rates As Driver", self.can_see_rates_as_driver)
            .flag("Can See Rates As Manager", self.can_see_rates_as_manager)
            .flag(
                "Can Validate Profit Improvements",
                self.can_validate_profit_improvements,
            )
            .flag("Is Rate Editor", self.is_rate_editor)
            .flag("Is Time Card Auditor", self.is_time_card_auditor)
            .flag(
                "Is Equipment Rental Team Member",
                self.is_equipment_rental_team_member,
            )
            .flag(
                "Is Geofence Violation Team Member",
                self.is_geofence_violation_team_member,
            )
            .section("Notifications")
            .flag(
                "Unapproved Time Card Subscriber",
                self.is_unapproved_time_card_subscriber,
            )
            .flag(
                "Default Job Production Plan Subscriber",
                self.is_default_job_production_plan_subscriber,
            )
            .flag("Recap Notifications", self.enable_recap_notifications)
            .flag(
                "Inventory Capacity Notifications",
                self.enable_inventory_capacity_notifications,
            )
    }
}

/// Role, permission and notification settings, shared by create and update
#[derive(Clone, Debug, Parser)]
pub struct MembershipFields {
    /// Role (operations, manager)
    #[clap(long)]
    kind: Option<String>,
    /// Admin status (true/false)
    #[clap(long)]
    is_admin: Option<bool>,
    /// Title within the organization
    #[clap(long)]
    title: Option<String>,
    /// Display color (e.g. #FF0000)
    #[clap(long)]
    color_hex: Option<String>,
    /// External system employee ID
    #[clap(long)]
    external_employee_id: Option<String>,
    /// Manual sort order
    #[clap(long)]
    explicit_sort_order: Option<i64>,
    /// Membership start (ISO 8601)
    #[clap(long)]
    start_at: Option<String>,
    /// Membership end (ISO 8601)
    #[clap(long)]
    end_at: Option<String>,
    /// Shift type (any, day, night)
    #[clap(long)]
    drives_shift_type: Option<String>,
    /// Project office ID. Pass an empty value to clear it
    #[clap(long)]
    project_office: Option<String>,
    /// Can see rates as driver (true/false)
    #[clap(long)]
    can_see_rates_as_driver: Option<bool>,
    /// Can see rates as manager (true/false)
    #[clap(long)]
    can_see_rates_as_manager: Option<bool>,
    /// Can validate profit improvements (true/false)
    #[clap(long)]
    can_validate_profit_improvements: Option<bool>,
    /// Is rate editor (true/false)
    #[clap(long)]
    is_rate_editor: Option<bool>,
    /// Is time card auditor (true/false)
    #[clap(long)]
    is_time_card_auditor: Option<bool>,
    /// Is equipment rental team member (true/false)
    #[clap(long)]
    is_equipment_rental_team_member: Option<bool>,
    /// Is geofence violation team member (true/false)
    #[clap(long)]
    is_geofence_violation_team_member: Option<bool>,
    /// Is unapproved time card subscriber (true/false)
    #[clap(long)]
    is_unapproved_time_card_subscriber: Option<bool>,
    /// Is default job production plan subscriber (true/false)
    #[clap(long)]
    is_default_job_production_plan_subscriber: Option<bool>,
    /// Enable recap notifications (true/false)
    #[clap(long)]
    enable_recap_notifications: Option<bool>,
    /// Enable inventory capacity notifications (true/false)
    #[clap(long)]
    enable_inventory_capacity_notifications: Option<bool>,
}

impl MembershipFields {
    fn apply(&self, body: ResourceBody) -> ResourceBody {
        let body = body
            .attribute_opt("kind", self.kind.clone())
            .attribute_opt("is-admin", self.is_admin)
            .attribute_opt("title", self.title.clone())
            .attribute_opt("color-hex", self.color_hex.clone())
            .attribute_opt(
                "external-employee-id",
                self.external_employee_id.clone(),
            )
            .attribute_opt("explicit-sort-order", self.explicit_sort_order)
            .attribute_opt("start-at", self.start_at.clone())
            .attribute_opt("end-at", self.end_at.clone())
            .attribute_opt("drives-shift-type", self.drives_shift_type.clone())
            .attribute_opt("can-see-rates-as-driver", self.can_see_rates_as_driver)
            .attribute_opt(
                "can-see-rates-as-manager",
                self.can_see_rates_as_manager,
            )
            .attribute_opt(
                "can-validate-profit-improvements",
                self.can_validate_profit_improvements,
            )
            .attribute_opt("is-rate-editor", self.is_rate_editor)
            .attribute_opt("is-time-card-auditor", self.is_time_card_auditor)
            .attribute_opt(
                "is-equipment-rental-team-member",
                self.is_equipment_rental_team_member,
            )
            .attribute_opt(
                "is-geofence-violation-team-member",
                self.is_geofence_violation_team_member,
            )
            .attribute_opt(
                "is-unapproved-time-card-subscriber",
                self.is_unapproved_time_card_subscriber,
            )
            .attribute_opt(
                "is-default-job-production-plan-subscriber",
                self.is_default_job_production_plan_subscriber,
            )
            .attribute_opt(
                "enable-recap-notifications",
                self.enable_recap_notifications,
            )
            .attribute_opt(
                "enable-inventory-capacity-notifications",
                self.enable_inventory_capacity_notifications,
            );
        match self.project_office.as_deref().map(str::trim) {
            Some("") => body.clear_to_one("project-office"),
            Some(id) => body.to_one("project-office", "project-offices", id),
            None => body,
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// User ID
    #[clap(long)]
    user: Option<String>,
    /// Organization (Type|ID, e.g. Broker|123)
    #[clap(long)]
    organization: Option<String>,
    #[command(flatten)]
    fields: MembershipFields,
}

impl CreateArgs {
    /// Endpoint and body for the create request
    fn request(&self) -> anyhow::Result<(String, ResourceBody)> {
        let Some(user) =
            self.user.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            bail!("--user is required");
        };
        let Some(organization) = self
            .organization
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            bail!("--organization is required (format: Type|ID, e.g. Broker|123)");
        };
        let organization = parse_reference(organization)?;
        let (membership_type, path) =
            membership_type(&organization.resource_type);

        let body = self
            .fields
            .apply(ResourceBody::create(membership_type))
            .to_one("user", "users", user)
            .to_one("organization", organization.resource_type, organization.id);
        Ok((path, body))
    }
}
