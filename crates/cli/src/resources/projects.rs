use crate::{
    GlobalArgs,
    resources::{self, Details, PageArgs, TableRow},
    util::{DetailBlock, format_date, format_related, truncate},
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Related, Resource, ResourceBody},
};

const PATH: &str = "/v1/projects";
const TYPE: &str = "projects";

/// Browse projects
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List projects, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a project
    Show {
        /// Project ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "projects")
                    .await
            }
            Self::Show { id } => {
                resources::show::<ProjectDetails>(global, PATH, &id, &show_query())
                    .await
            }
        }
    }
}

/// Create and update projects
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Create a project
    Create(CreateArgs),
    /// Update a project. Only the given fields are changed
    Update {
        /// Project ID
        id: String,
        /// New name
        #[clap(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ProjectFields,
    },
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        let (verb, document) = match self {
            Self::Create(args) => {
                ("Created", resources::create(global, PATH, &args.body()?).await?)
            }
            Self::Update { id, name, fields } => {
                let body = fields.apply(
                    ResourceBody::update(TYPE, id.trim())
                        .attribute_opt("name", name),
                );
                ("Updated", resources::update(global, PATH, &id, &body).await?)
            }
        };
        let name = document.data.attributes.string("name");
        resources::print_outcome(
            global,
            verb,
            "project",
            &document.data,
            name.trim(),
        )
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by name
    #[clap(long)]
    name: Option<String>,
    /// Filter by name (partial match)
    #[clap(long)]
    name_like: Option<String>,
    /// Filter by status
    #[clap(long)]
    status: Option<String>,
    /// Filter by minimum creation time (ISO 8601)
    #[clap(long)]
    created_at_min: Option<String>,
    /// Filter by maximum creation time (ISO 8601)
    #[clap(long)]
    created_at_max: Option<String>,
    /// Filter by broker ID
    #[clap(long)]
    broker: Option<String>,
    /// Filter by customer ID
    #[clap(long)]
    customer: Option<String>,
    /// Filter by project manager user ID
    #[clap(long)]
    project_manager: Option<String>,
    /// Filter by estimator user ID
    #[clap(long)]
    estimator: Option<String>,
    /// Filter by developer ID
    #[clap(long)]
    developer: Option<String>,
    /// Filter by project office ID
    #[clap(long)]
    project_office: Option<String>,
    /// Full-text search
    #[clap(long)]
    q: Option<String>,
    /// Filter by project number
    #[clap(long)]
    number: Option<String>,
    /// Filter by active status (true/false)
    #[clap(long)]
    is_active: Option<String>,
    /// Filter by managed status (true/false)
    #[clap(long)]
    is_managed: Option<String>,
    /// Filter by job start date (YYYY-MM-DD)
    #[clap(long)]
    job_start_on: Option<String>,
    /// Filter by minimum job start date (YYYY-MM-DD)
    #[clap(long)]
    job_start_on_min: Option<String>,
    /// Filter by maximum job start date (YYYY-MM-DD)
    #[clap(long)]
    job_start_on_max: Option<String>,
    /// Filter by due date (YYYY-MM-DD)
    #[clap(long)]
    due_on: Option<String>,
    /// Filter by minimum due date (YYYY-MM-DD)
    #[clap(long)]
    due_on_min: Option<String>,
    /// Filter by maximum due date (YYYY-MM-DD)
    #[clap(long)]
    due_on_max: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.fields(TYPE, &["name", "status", "created-at"]);
        self.page.apply(&mut query);
        for (name, value) in [
            ("name", &self.name),
            ("name-like", &self.name_like),
            ("status", &self.status),
            ("created_at_min", &self.created_at_min),
            ("created_at_max", &self.created_at_max),
            ("broker", &self.broker),
            ("customer", &self.customer),
            ("project-manager", &self.project_manager),
            ("estimator", &self.estimator),
            ("developer", &self.developer),
            ("project-office", &self.project_office),
            ("q", &self.q),
            ("number", &self.number),
            ("is-active", &self.is_active),
            ("is-managed", &self.is_managed),
            ("job-start-on", &self.job_start_on),
            ("job-start-on-min", &self.job_start_on_min),
            ("job-start-on-max", &self.job_start_on_max),
            ("due-on", &self.due_on),
            ("due-on-min", &self.due_on_min),
            ("due-on-max", &self.due_on_max),
        ] {
            query.filter(name, value.as_deref());
        }
        query
    }
}

fn show_query() -> Query {
    let mut query = Query::new();
    query.include(&[
        "developer",
        "customer",
        "broker",
        "project-manager",
        "estimator",
        "project-office",
    ]);
    query.fields("developers", &["name"]);
    query.fields("customers", &["company-name"]);
    query.fields("brokers", &["company-name"]);
    query.fields("users", &["name"]);
    query.fields("project-offices", &["name"]);
    query
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    created_at: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "STATUS", "CREATED"];

    fn from_resource(resource: &Resource, _: &Included) -> Self {
        let attributes = &resource.attributes;
        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            status: attributes.string("status"),
            created_at: attributes.string("created-at"),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            truncate(&self.name, 50),
            truncate(&self.status, 20),
            self.created_at.chars().take(10).collect(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectDetails {
    id: String,
    name: String,
    number: String,
    status: String,
    start_on: String,
    due_on: String,
    created_at: String,
    is_opportunity: bool,
    is_managed: bool,
    is_transport_only: bool,
    developer_id: String,
    developer_name: String,
    customer_id: String,
    customer_name: String,
    broker_id: String,
    broker_name: String,
    project_manager_id: String,
    project_manager_name: String,
    estimator_id: String,
    estimator_name: String,
    project_office_id: String,
    project_office_name: String,
}

impl Details for ProjectDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let included = document.included();
        let resource = &document.data;
        let attributes = &resource.attributes;
        let related = |name: &str, name_attributes: &[&str]| {
            Related::resolve(resource, &included, name, name_attributes)
        };
        let developer = related("developer", &["name"]);
        let customer = related("customer", &["company-name"]);
        let broker = related("broker", &["company-name"]);
        let manager = related("project-manager", &["name"]);
        let estimator = related("estimator", &["name"]);
        let office = related("project-office", &["name"]);
        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            number: attributes.string("number"),
            status: attributes.string("status"),
            start_on: format_date(&attributes.string("start-on")),
            due_on: format_date(&attributes.string("due-on")),
            created_at: format_date(&attributes.string("created-at")),
            is_opportunity: attributes.bool("is-opportunity"),
            is_managed: attributes.bool("is-managed"),
            is_transport_only: attributes.bool("is-transport-only"),
            developer_id: developer.id,
            developer_name: developer.name,
            customer_id: customer.id,
            customer_name: customer.name,
            broker_id: broker.id,
            broker_name: broker.name,
            project_manager_id: manager.id,
            project_manager_name: manager.name,
            estimator_id: estimator.id,
            estimator_name: estimator.name,
            project_office_id: office.id,
            project_office_name: office.name,
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Name", &self.name)
            .field("Number", &self.number)
            .field("Status", &self.status)
            .field("Start On", &self.start_on)
            .field("Due On", &self.due_on)
            .field("Created", &self.created_at)
            .flag("Is Opportunity", self.is_opportunity)
            .flag("Is Managed", self.is_managed)
            .flag("Is Transport Only", self.is_transport_only)
            .section("Relationships")
            .field(
                "Developer",
                format_related(&self.developer_name, &self.developer_id),
            )
            .field(
                "Customer",
                format_related(&self.customer_name, &self.customer_id),
            )
            .field("Broker", format_related(&self.broker_name, &self.broker_id))
            .field(
                "Project Manager",
                format_related(
                    &self.project_manager_name,
                    &self.project_manager_id,
                ),
            )
            .field(
                "Estimator",
                format_related(&self.estimator_name, &self.estimator_id),
            )
            .field(
                "Project Office",
                format_related(
                    &self.project_office_name,
                    &self.project_office_id,
                ),
            )
    }
}

/// Attributes and relationships shared by create and update
#[derive(Clone, Debug, Parser)]
pub struct ProjectFields {
    /// Project number
    #[clap(long)]
    number: Option<String>,
    /// Due date (ISO 8601)
    #[clap(long)]
    due_on: Option<String>,
    /// Start date (ISO 8601)
    #[clap(long)]
    start_on: Option<String>,
    /// Project manager user ID
    #[clap(long)]
    project_manager: Option<String>,
    /// Estimator user ID
    #[clap(long)]
    estimator: Option<String>,
    /// Project office ID
    #[clap(long)]
    project_office: Option<String>,
    /// Mark as opportunity (true/false)
    #[clap(long)]
    is_opportunity: Option<bool>,
    /// Mark as inactive (true/false)
    #[clap(long)]
    is_inactive: Option<bool>,
    /// Mark as managed (true/false)
    #[clap(long)]
    is_managed: Option<bool>,
    /// Prevailing wage (true/false)
    #[clap(long)]
    is_prevailing_wage_explicit: Option<bool>,
    /// Certification required (true/false)
    #[clap(long)]
    is_certification_required_explicit: Option<bool>,
    /// Time card payroll certification required (true/false)
    #[clap(long)]
    is_time_card_payroll_certification_required_explicit: Option<bool>,
    /// One-way job (true/false)
    #[clap(long)]
    is_one_way_job_explicit: Option<bool>,
    /// Transport only (true/false)
    #[clap(long)]
    is_transport_only: Option<bool>,
    /// Enforce number uniqueness (true/false)
    #[clap(long)]
    enforce_number_uniqueness: Option<bool>,
}

impl ProjectFields {
    fn apply(&self, body: ResourceBody) -> ResourceBody {
        body.attribute_opt("number", self.number.clone())
            .attribute_opt("due-on", self.due_on.clone())
            .attribute_opt("start-on", self.start_on.clone())
            .attribute_opt("is-opportunity", self.is_opportunity)
            .attribute_opt("is-inactive-explicit", self.is_inactive)
            .attribute_opt("is-managed", self.is_managed)
            .attribute_opt(
                "is-prevailing-wage-explicit",
                self.is_prevailing_wage_explicit,
            )
            .attribute_opt(
                "is-certification-required-explicit",
                self.is_certification_required_explicit,
            )
            .attribute_opt(
                "is-time-card-payroll-certification-required-explicit",
                self.is_time_card_payroll_certification_required_explicit,
            )
            .attribute_opt("is-one-way-job-explicit", self.is_one_way_job_explicit)
            .attribute_opt("is-transport-only", self.is_transport_only)
            .attribute_opt(
                "enforce-number-uniqueness",
                self.enforce_number_uniqueness,
            )
            .to_one_opt("project-manager", "users", self.project_manager.as_deref())
            .to_one_opt("estimator", "users", self.estimator.as_deref())
            .to_one_opt(
                "project-office",
                "project-offices",
                self.project_office.as_deref(),
            )
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// Project name
    #[clap(long)]
    name: Option<String>,
    /// Developer ID
    #[clap(long)]
    developer: Option<String>,
    #[command(flatten)]
    fields: ProjectFields,
}

impl CreateArgs {
    fn body(&self) -> anyhow::Result<ResourceBody> {
        let Some(name) =
            self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            bail!("--name is required");
        };
        let Some(developer) = self
            .developer
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            bail!("--developer is required");
        };
        Ok(self.fields.apply(
            ResourceBody::create(TYPE)
                .attribute("name", name)
                .to_one("developer", "developers", developer),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use xbe_util::assert_err;

    #[test]
    fn test_list_query() {
        let args = ListArgs::try_parse_from([
            "list",
            "--due-on-min",
            "2024-01-01",
            "--project-manager",
            "4",
            "--sort",
            "-created-at",
        ])
        .unwrap();
        let query = args.query();
        assert_eq!(query.get("fields[projects]"), Some("name,status,created-at"));
        assert_eq!(query.get("filter[due-on-min]"), Some("2024-01-01"));
        assert_eq!(query.get("filter[project-manager]"), Some("4"));
        assert_eq!(query.get("sort"), Some("-created-at"));
    }

    #[test]
    fn test_row_cells() {
        let row = Row {
            id: "9".into(),
            name: "Highway 36 Resurfacing".into(),
            status: "active".into(),
            created_at: "2024-05-02T10:11:12Z".into(),
        };
        assert_eq!(
            row.cells(),
            vec!["9", "Highway 36 Resurfacing", "active", "2024-05-02"]
        );
    }

    #[test]
    fn test_create_body() {
        let args = CreateArgs::try_parse_from([
            "create",
            "--name",
            "Runway",
            "--developer",
            "2",
            "--is-inactive",
            "true",
            "--estimator",
            "5",
        ])
        .unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&args.body().unwrap().to_bytes().unwrap())
                .unwrap(),
            json!({
                "data": {
                    "type": "projects",
                    "attributes": {"name": "Runway", "is-inactive-explicit": true},
                    "relationships": {
                        "developer": {"data": {"type": "developers", "id": "2"}},
                        "estimator": {"data": {"type": "users", "id": "5"}},
                    },
                },
            })
        );
    }

    #[test]
    fn test_create_validation() {
        let args =
            CreateArgs::try_parse_from(["create", "--developer", "2"]).unwrap();
        assert_err!(args.body(), "--name is required");
        let args =
            CreateArgs::try_parse_from(["create", "--name", "Runway"]).unwrap();
        assert_err!(args.body(), "--developer is required");
    }
}
