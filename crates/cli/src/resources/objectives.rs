//! Objectives: goals owned by a user and scoped to an organization, or
//! organization-less templates that other objectives are created from

use crate::{
    GlobalArgs,
    resources::{
        self, DeleteArgs, Details, ORGANIZATION_NAME, PageArgs, TableRow,
        organization_fields,
    },
    util::{
        DetailBlock, first_non_empty, format_any, format_date,
        format_polymorphic, format_related, truncate,
    },
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Related, Resource, ResourceBody},
    resource_type::{parse_reference, reference_filter},
};

const PATH: &str = "/v1/objectives";
const TYPE: &str = "objectives";

/// Browse objectives
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List objectives, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of an objective
    Show {
        /// Objective ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "objectives")
                    .await
            }
            Self::Show { id } => {
                resources::show::<ObjectiveDetails>(global, PATH, &id, &show_query())
                    .await
            }
        }
    }
}

/// Create, update and delete objectives
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Create an objective
    Create(CreateArgs),
    /// Update an objective. Only the given fields are changed
    Update {
        /// Objective ID
        id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete an objective
    Delete(DeleteArgs),
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::Create(args) => {
                let document =
                    resources::create(global, PATH, &args.body()?).await?;
                let name = document.data.attributes.string("name");
                resources::print_outcome(
                    global,
                    "Created",
                    "objective",
                    &document.data,
                    name.trim(),
                )
            }
            Self::Update { id, fields } => {
                let document =
                    resources::update(global, PATH, &id, &fields.body(&id)?)
                        .await?;
                let name = document.data.attributes.string("name");
                resources::print_outcome(
                    global,
                    "Updated",
                    "objective",
                    &document.data,
                    name.trim(),
                )
            }
            Self::Delete(args) => {
                resources::delete(global, PATH, "objective", &args).await
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by name (partial match)
    #[clap(long)]
    name: Option<String>,
    /// Filter by owner user ID (comma-separated for multiple)
    #[clap(long)]
    owner: Option<String>,
    /// Filter by organization (Type|ID, e.g. Broker|123)
    #[clap(long)]
    organization: Option<String>,
    /// Filter by status
    #[clap(long)]
    status: Option<String>,
    /// Filter by start date (YYYY-MM-DD)
    #[clap(long)]
    start_on: Option<String>,
    /// Filter by minimum start date (YYYY-MM-DD)
    #[clap(long)]
    start_on_min: Option<String>,
    /// Filter by maximum start date (YYYY-MM-DD)
    #[clap(long)]
    start_on_max: Option<String>,
    /// Filter by end date (YYYY-MM-DD)
    #[clap(long)]
    end_on: Option<String>,
    /// Filter by minimum end date (YYYY-MM-DD)
    #[clap(long)]
    end_on_min: Option<String>,
    /// Filter by maximum end date (YYYY-MM-DD)
    #[clap(long)]
    end_on_max: Option<String>,
    /// Filter by commitment (committed, aspirational)
    #[clap(long)]
    commitment: Option<String>,
    /// Filter by project ID (comma-separated for multiple)
    #[clap(long)]
    project: Option<String>,
    /// Filter by template flag (true/false)
    #[clap(long)]
    is_template: Option<String>,
    /// Filter by template scope
    #[clap(long)]
    template_scope: Option<String>,
    /// Filter by slug
    #[clap(long)]
    slug: Option<String>,
    /// Filter by sales responsible person user ID
    #[clap(long)]
    sales_responsible_person: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.fields(
            TYPE,
            &[
                "name",
                "status",
                "start-on",
                "end-on",
                "commitment",
                "is-template",
                "template-scope",
                "slug",
                "owner",
                "organization",
                "project",
                "sales-responsible-person",
            ],
        );
        query.include(&[
            "owner",
            "organization",
            "project",
            "sales-responsible-person",
        ]);
        query.fields("users", &["name"]);
        query.fields("projects", &["name"]);
        organization_fields(&mut query);
        self.page.apply(&mut query);

        let organization = self.organization.as_deref().map(reference_filter);
        for (name, value) in [
            ("name", self.name.as_deref()),
            ("owner", self.owner.as_deref()),
            ("organization", organization.as_deref()),
            ("status", self.status.as_deref()),
            ("start-on", self.start_on.as_deref()),
            ("start-on-min", self.start_on_min.as_deref()),
            ("start-on-max", self.start_on_max.as_deref()),
            ("end-on", self.end_on.as_deref()),
            ("end-on-min", self.end_on_min.as_deref()),
            ("end-on-max", self.end_on_max.as_deref()),
            ("commitment", self.commitment.as_deref()),
            ("project", self.project.as_deref()),
            ("is-template", self.is_template.as_deref()),
            ("template-scope", self.template_scope.as_deref()),
            ("slug", self.slug.as_deref()),
            (
                "sales-responsible-person",
                self.sales_responsible_person.as_deref(),
            ),
        ] {
            query.filter(name, value);
        }
        query
    }
}

fn show_query() -> Query {
    let mut query = Query::new();
    query.include(&[
        "owner",
        "organization",
        "parent",
        "project",
        "sales-responsible-person",
        "latest-objective-status-post",
    ]);
    query.fields("users", &["name"]);
    query.fields("projects", &["name"]);
    query.fields("posts", &["short-text-content"]);
    organization_fields(&mut query);
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
    commitment: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    start_on: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    end_on: String,
    /// Passed through as sent, since the server may omit it
    #[serde(skip_serializing_if = "Option::is_none")]
    is_template: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    template_scope: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    owner_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    owner_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    project_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    sales_responsible_person_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    sales_responsible_person_name: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] = &[
        "ID",
        "STATUS",
        "NAME",
        "COMMITMENT",
        "START",
        "END",
        "OWNER",
        "ORG",
        "TEMPLATE",
    ];

    fn from_resource(resource: &Resource, included: &Included) -> Self {
        let attributes = &resource.attributes;
        let owner = Related::resolve(resource, included, "owner", &["name"]);
        let organization = Related::resolve(
            resource,
            included,
            "organization",
            ORGANIZATION_NAME,
        );
        let project = Related::resolve(resource, included, "project", &["name"]);
        let sales = Related::resolve(
            resource,
            included,
            "sales-responsible-person",
            &["name"],
        );
        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            status: attributes.string("status"),
            commitment: attributes.string("commitment"),
            start_on: format_date(&attributes.string("start-on")),
            end_on: format_date(&attributes.string("end-on")),
            is_template: attributes.any("is-template").cloned(),
            template_scope: attributes.string("template-scope"),
            slug: attributes.string("slug"),
            owner_id: owner.id,
            owner_name: owner.name,
            organization_id: organization.id,
            organization_type: organization.resource_type,
            organization_name: organization.name,
            project_id: project.id,
            project_name: project.name,
            sales_responsible_person_id: sales.id,
            sales_responsible_person_name: sales.name,
        }
    }

    fn cells(&self) -> Vec<String> {
        let owner = first_non_empty([
            self.owner_name.as_str(),
            self.owner_id.as_str(),
        ]);
        let organization = if self.organization_name.is_empty()
            && !self.organization_type.is_empty()
            && !self.organization_id.is_empty()
        {
            format_polymorphic(&self.organization_type, &self.organization_id)
        } else {
            self.organization_name.clone()
        };
        vec![
            self.id.clone(),
            self.status.clone(),
            truncate(&self.name, 40),
            self.commitment.clone(),
            self.start_on.clone(),
            self.end_on.clone(),
            truncate(&owner, 25),
            truncate(&organization, 30),
            format_any(self.is_template.as_ref()),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ObjectiveDetails {
    id: String,
    name: String,
    description: String,
    status: String,
    commitment: String,
    start_on: String,
    end_on: String,
    name_summary: String,
    name_summary_explicit: String,
    name_summary_implicit: String,
    slug: String,
    is_template: bool,
    template_scope: String,
    is_generating_objective_stakeholder_classifications: bool,
    is_abandoned: bool,
    completion_percentage_calculated: Option<Value>,
    owner_id: String,
    owner_name: String,
    organization_type: String,
    organization_id: String,
    organization_name: String,
    parent_type: String,
    parent_id: String,
    parent_name: String,
    project_id: String,
    project_name: String,
    sales_responsible_person_id: String,
    sales_responsible_person_name: String,
    latest_objective_status_post_id: String,
    latest_objective_status_post_summary: String,
    key_result_ids: Vec<String>,
    child_objective_ids: Vec<String>,
    objective_stakeholder_classification_ids: Vec<String>,
}

impl Details for ObjectiveDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let included = document.included();
        let resource = &document.data;
        let attributes = &resource.attributes;
        let relationships = &resource.relationships;
        let related = |name: &str, name_attributes: &[&str]| {
            Related::resolve(resource, &included, name, name_attributes)
        };
        let owner = related("owner", &["name"]);
        let organization = related("organization", ORGANIZATION_NAME);
        // Parent is an objective (name) or a key result (title)
        let parent = related("parent", &["name", "title"]);
        let project = related("project", &["name"]);
        let sales = related("sales-responsible-person", &["name"]);
        let post =
            related("latest-objective-status-post", &["short-text-content"]);

        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            description: attributes.string("description").trim().to_owned(),
            status: attributes.string("status"),
            commitment: attributes.string("commitment"),
            start_on: format_date(&attributes.string("start-on")),
            end_on: format_date(&attributes.string("end-on")),
            name_summary: attributes.string("name-summary"),
            name_summary_explicit: attributes.string("name-summary-explicit"),
            name_summary_implicit: attributes.string("name-summary-implicit"),
            slug: attributes.string("slug"),
            is_template: attributes.bool("is-template"),
            template_scope: attributes.string("template-scope"),
            is_generating_objective_stakeholder_classifications: attributes
                .bool("is-generating-objective-stakeholder-classifications"),
            is_abandoned: attributes.bool("is-abandoned"),
            completion_percentage_calculated: attributes
                .any("completion-percentage-calculated")
                .cloned(),
            owner_id: owner.id,
            owner_name: owner.name,
            organization_type: organization.resource_type,
            organization_id: organization.id,
            organization_name: organization.name,
            parent_type: parent.resource_type,
            parent_id: parent.id,
            parent_name: parent.name,
            project_id: project.id,
            project_name: project.name,
            sales_responsible_person_id: sales.id,
            sales_responsible_person_name: sales.name,
            latest_objective_status_post_id: post.id,
            latest_objective_status_post_summary: post.name,
            key_result_ids: relationships.ids("key-results"),
            child_objective_ids: relationships.ids("children"),
            objective_stakeholder_classification_ids: relationships
                .ids("objective-stakeholder-classifications"),
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Name", &self.name)
            .field("Status", &self.status)
            .field("Commitment", &self.commitment)
            .field("Start On", &self.start_on)
            .field("End On", &self.end_on)
            .field("Description", &self.description)
            .field("Name Summary", &self.name_summary)
            .field("Name Summary Explicit", &self.name_summary_explicit)
            .field("Name Summary Implicit", &self.name_summary_implicit)
            .field("Slug", &self.slug)
            .flag("Is Template", self.is_template)
            .field("Template Scope", &self.template_scope)
            .flag(
                "Is Generating Stakeholder Classifications",
                self.is_generating_objective_stakeholder_classifications,
            )
            .flag("Is Abandoned", self.is_abandoned)
            .field(
                "Completion (Calculated)",
                format_any(self.completion_percentage_calculated.as_ref()),
            )
            .section("Relationships")
            .field("Owner", format_related(&self.owner_name, &self.owner_id))
            .field(
                "Organization",
                format_related(
                    &self.organization_name,
                    &format_polymorphic(
                        &self.organization_type,
                        &self.organization_id,
                    ),
                ),
            )
            .field(
                "Parent",
                format_related(
                    &self.parent_name,
                    &format_polymorphic(&self.parent_type, &self.parent_id),
                ),
            )
            .field(
                "Project",
                format_related(&self.project_name, &self.project_id),
            )
            .field(
                "Sales Responsible Person",
                format_related(
                    &self.sales_responsible_person_name,
                    &self.sales_responsible_person_id,
                ),
            )
            .field(
                "Latest Status Post",
                format_related(
                    &self.latest_objective_status_post_summary,
                    &self.latest_objective_status_post_id,
                ),
            )
            .ids("Key Results", &self.key_result_ids)
            .ids("Child Objectives", &self.child_objective_ids)
            .ids(
                "Objective Stakeholder Classifications",
                &self.objective_stakeholder_classification_ids,
            )
    }
}

/// Attributes and relationships shared by create and update
#[derive(Clone, Debug, Parser)]
pub struct ObjectiveFields {
    /// Description
    #[clap(long)]
    description: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[clap(long)]
    start_on: Option<String>,
    /// End date (YYYY-MM-DD)
    #[clap(long)]
    end_on: Option<String>,
    /// Commitment (committed, aspirational)
    #[clap(long)]
    commitment: Option<String>,
    /// Explicit name summary
    #[clap(long)]
    name_summary_explicit: Option<String>,
    /// Mark as template (true/false)
    #[clap(long)]
    is_template: Option<bool>,
    /// Template scope (match_all, organization, project)
    #[clap(long)]
    template_scope: Option<String>,
    /// Generate stakeholder classifications (true/false)
    #[clap(long)]
    is_generating_objective_stakeholder_classifications: Option<bool>,
    /// Owner user ID
    #[clap(long)]
    owner: Option<String>,
    /// Parent objective or key result (Type|ID, e.g. Objective|12)
    #[clap(long)]
    parent: Option<String>,
    /// Project ID
    #[clap(long)]
    project: Option<String>,
    /// Sales responsible person user ID
    #[clap(long)]
    sales_responsible_person: Option<String>,
}

impl ObjectiveFields {
    fn apply(&self, body: ResourceBody) -> anyhow::Result<ResourceBody> {
        let mut body = body
            .attribute_opt("description", self.description.clone())
            .attribute_opt("start-on", self.start_on.clone())
            .attribute_opt("end-on", self.end_on.clone())
            .attribute_opt("commitment", self.commitment.clone())
            .attribute_opt(
                "name-summary-explicit",
                self.name_summary_explicit.clone(),
            )
            .attribute_opt("is-template", self.is_template)
            .attribute_opt("template-scope", self.template_scope.clone())
            .attribute_opt(
                "is-generating-objective-stakeholder-classifications",
                self.is_generating_objective_stakeholder_classifications,
            )
            .to_one_opt("owner", "users", self.owner.as_deref())
            .to_one_opt("project", "projects", self.project.as_deref())
            .to_one_opt(
                "sales-responsible-person",
                "users",
                self.sales_responsible_person.as_deref(),
            );
        if let Some(parent) = &self.parent {
            let parent = parse_reference(parent)?;
            body = body.to_one("parent", parent.resource_type, parent.id);
        }
        Ok(body)
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// Objective name
    #[clap(long)]
    name: String,
    /// Organization (Type|ID, e.g. Broker|123). Required unless creating a
    /// template
    #[clap(long)]
    organization: Option<String>,
    #[command(flatten)]
    fields: ObjectiveFields,
}

impl CreateArgs {
    fn body(&self) -> anyhow::Result<ResourceBody> {
        let name = self.name.trim();
        if name.is_empty() {
            bail!("--name is required");
        }
        let fields = &self.fields;
        if fields.is_template == Some(true) {
            if fields.template_scope.is_none() {
                bail!("--template-scope is required when --is-template true");
            }
            if self.organization.is_some() {
                bail!("--organization cannot be used when --is-template true");
            }
            if fields.owner.is_some() {
                bail!("--owner cannot be used when --is-template true");
            }
            if fields.sales_responsible_person.is_some() {
                bail!(
                    "--sales-responsible-person cannot be used when \
                    --is-template true"
                );
            }
        } else {
            if fields.template_scope.is_some() {
                bail!("--template-scope requires --is-template true");
            }
            if self.organization.is_none() {
                bail!(
                    "--organization is required for non-template objectives \
                    (or set --is-template true)"
                );
            }
        }

        let mut body =
            fields.apply(ResourceBody::create(TYPE).attribute("name", name))?;
        if let Some(organization) = &self.organization {
            let organization = parse_reference(organization)?;
            body = body.to_one(
                "organization",
                organization.resource_type,
                organization.id,
            );
        }
        Ok(body)
    }
}

#[derive(Clone, Debug, Parser)]
pub struct UpdateArgs {
    /// New name
    #[clap(long)]
    name: Option<String>,
    /// Mark abandoned (true/false)
    #[clap(long)]
    is_abandoned: Option<bool>,
    #[command(flatten)]
    fields: ObjectiveFields,
}

impl UpdateArgs {
    fn body(&self, id: &str) -> anyhow::Result<ResourceBody> {
        self.fields.apply(
            ResourceBody::update(TYPE, id.trim())
                .attribute_opt("name", self.name.clone())
                .attribute_opt("is-abandoned", self.is_abandoned),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::flatten_rows;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use xbe_util::assert_err;

    fn decode<D: serde::de::DeserializeOwned + Default>(value: Value) -> Document<D> {
        Document::decode(&serde_json::to_vec(&value).unwrap()).unwrap()
    }

    fn create_args(args: &[&str]) -> CreateArgs {
        CreateArgs::try_parse_from(
            std::iter::once("create").chain(args.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn test_list_query() {
        let args = ListArgs::try_parse_from([
            "list",
            "--organization",
            "material-suppliers|8",
            "--status",
            " active ",
            "--owner",
            "",
        ])
        .unwrap();
        let query = args.query();
        assert_eq!(query.get("filter[organization]"), Some("MaterialSupplier|8"));
        assert_eq!(query.get("filter[status]"), Some("active"));
        assert_eq!(query.get("filter[owner]"), None);
        assert_eq!(
            query.get("include"),
            Some("owner,organization,project,sales-responsible-person")
        );
        assert_eq!(query.get("page[limit]"), Some("50"));
    }

    #[test]
    fn test_rows() {
        let document = decode(json!({
            "data": [
                {
                    "type": "objectives",
                    "id": "1",
                    "attributes": {
                        "name": " Grow revenue ",
                        "status": "active",
                        "start-on": "2024-01-01",
                        "is-template": false,
                    },
                    "relationships": {
                        "owner": {"data": {"type": "users", "id": "3"}},
                        "organization": {
                            "data": {"type": "brokers", "id": "4"},
                        },
                    },
                },
                {
                    "type": "objectives",
                    "id": "2",
                    "relationships": {
                        "organization": {
                            "data": {"type": "developers", "id": "6"},
                        },
                    },
                },
            ],
            "included": [
                {"type": "users", "id": "3", "attributes": {"name": "Ada"}},
                {
                    "type": "brokers",
                    "id": "4",
                    "attributes": {"company-name": "Acme Hauling"},
                },
            ],
        }));
        let rows: Vec<Row> = flatten_rows(&document);
        assert_eq!(
            rows[0].cells(),
            vec![
                "1",
                "active",
                "Grow revenue",
                "",
                "2024-01-01",
                "",
                "Ada",
                "Acme Hauling",
                "false"
            ]
        );
        // Unresolvable organization falls back to type/id
        assert_eq!(rows[1].cells()[7], "developers/6");
        assert_eq!(rows[1].cells()[6], "");
        assert_eq!(
            serde_json::to_value(&rows[1]).unwrap(),
            json!({
                "id": "2",
                "organization_id": "6",
                "organization_type": "developers",
            })
        );
    }

    #[test]
    fn test_details() {
        let document = decode(json!({
            "data": {
                "type": "objectives",
                "id": "1",
                "attributes": {
                    "name": "Grow revenue",
                    "is-template": "true",
                    "completion-percentage-calculated": 0.25,
                },
                "relationships": {
                    "parent": {"data": {"type": "key-results", "id": "5"}},
                    "key-results": {
                        "data": [
                            {"type": "key-results", "id": "8"},
                            {"type": "key-results", "id": "7"},
                        ],
                    },
                    "children": {"data": []},
                },
            },
            "included": [
                {
                    "type": "key-results",
                    "id": "5",
                    "attributes": {"title": "Ship it"},
                },
            ],
        }));
        let details = ObjectiveDetails::from_document(&document);
        assert_eq!(
            details.block().to_string(),
            "ID: 1
Name: Grow revenue
Is Template: true
Is Generating Stakeholder Classifications: false
Is Abandoned: false
Completion (Calculated): 0.25

Relationships:
----------------------------------------
  Parent: Ship it (key-results/5)
  Key Results: 8, 7
"
        );
    }

    #[test]
    fn test_create_body() {
        let body = create_args(&[
            "--name",
            "Grow revenue",
            "--organization",
            "Broker|4",
            "--owner",
            "3",
            "--is-template",
            "false",
        ])
        .body()
        .unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&body.to_bytes().unwrap()).unwrap(),
            json!({
                "data": {
                    "type": "objectives",
                    "attributes": {
                        "name": "Grow revenue",
                        "is-template": false,
                    },
                    "relationships": {
                        "owner": {"data": {"type": "users", "id": "3"}},
                        "organization": {
                            "data": {"type": "brokers", "id": "4"},
                        },
                    },
                },
            })
        );
    }

    #[test]
    fn test_create_template_body() {
        let body = create_args(&[
            "--name",
            "Template",
            "--is-template",
            "true",
            "--template-scope",
            "match_all",
        ])
        .body()
        .unwrap();
        assert!(body.has_changes());
    }

    #[rstest]
    #[case::blank_name(&["--name", " ", "--organization", "Broker|4"], "--name is required")]
    #[case::template_no_scope(&["--name", "x", "--is-template", "true"], "--template-scope is required")]
    #[case::template_org(
        &["--name", "x", "--is-template", "true", "--template-scope", "project", "--organization", "Broker|4"],
        "--organization cannot be used",
    )]
    #[case::template_owner(
        &["--name", "x", "--is-template", "true", "--template-scope", "project", "--owner", "3"],
        "--owner cannot be used",
    )]
    #[case::scope_without_template(
        &["--name", "x", "--template-scope", "project", "--organization", "Broker|4"],
        "--template-scope requires --is-template true",
    )]
    #[case::no_organization(&["--name", "x"], "--organization is required")]
    #[case::bad_organization(&["--name", "x", "--organization", "Broker"], "Invalid reference `Broker`")]
    fn test_create_validation(#[case] args: &[&str], #[case] expected: &str) {
        assert_err!(create_args(args).body(), expected);
    }

    #[test]
    fn test_update_body() {
        let args = UpdateArgs::try_parse_from([
            "update",
            "--parent",
            "Objective|9",
            "--is-abandoned",
            "true",
        ])
        .unwrap();
        let body = args.body("1").unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&body.to_bytes().unwrap()).unwrap(),
            json!({
                "data": {
                    "type": "objectives",
                    "id": "1",
                    "attributes": {"is-abandoned": true},
                    "relationships": {
                        "parent": {"data": {"type": "objectives", "id": "9"}},
                    },
                },
            })
        );

        let empty = UpdateArgs::try_parse_from(["update"]).unwrap();
        assert!(!empty.body("1").unwrap().has_changes());
    }
}
