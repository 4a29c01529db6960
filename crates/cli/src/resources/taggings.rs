//! Taggings attach a tag to any taggable resource

use crate::{
    GlobalArgs,
    resources::{self, DeleteArgs, Details, PageArgs, TableRow},
    util::{DetailBlock, format_date_time, format_polymorphic, format_related},
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Related, Resource, ResourceBody},
    resource_type::{class_name, parse_reference, reference_filter},
};

const PATH: &str = "/v1/taggings";
const TYPE: &str = "taggings";

/// Browse taggings
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List taggings, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a tagging
    Show {
        /// Tagging ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "taggings")
                    .await
            }
            Self::Show { id } => {
                resources::show::<Row>(global, PATH, &id, &tag_query()).await
            }
        }
    }
}

/// Tag and untag resources
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Attach a tag to a resource
    Create(CreateArgs),
    /// Remove a tag from a resource
    Delete(DeleteArgs),
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::Create(args) => {
                let document =
                    resources::create(global, PATH, &args.body()?).await?;
                resources::print_outcome(
                    global,
                    "Created",
                    "tagging",
                    &document.data,
                    "",
                )
            }
            Self::Delete(args) => {
                resources::delete(global, PATH, "tagging", &args).await
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by tag ID
    #[clap(long)]
    tag: Option<String>,
    /// Filter by tagged resource (Type|ID, e.g. Project|12)
    #[clap(long)]
    taggable: Option<String>,
    /// Filter by tagged resource type (e.g. projects)
    #[clap(long)]
    taggable_type: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = tag_query();
        self.page.apply(&mut query);
        query.filter("tag", self.tag.as_deref());
        query.filter(
            "taggable",
            self.taggable.as_deref().map(reference_filter).as_deref(),
        );
        query.filter(
            "taggable_type",
            self.taggable_type
                .as_deref()
                .map(class_name)
                .as_deref(),
        );
        query
    }
}

/// Side-load the tag so rows can show its name
fn tag_query() -> Query {
    let mut query = Query::new();
    query.include(&["tag"]);
    query.fields("tags", &["name"]);
    query
}

/// Taggings are small enough that the row doubles as the detail view
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    tag_id: String,
    tag_name: String,
    taggable_type: String,
    taggable_id: String,
    created_at: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] = &["ID", "TAG", "TAGGED", "CREATED"];

    fn from_resource(resource: &Resource, included: &Included) -> Self {
        let tag = Related::resolve(resource, included, "tag", &["name"]);
        let taggable = Related::resolve(resource, included, "taggable", &[]);
        Self {
            id: resource.id.clone(),
            tag_id: tag.id,
            tag_name: tag.name,
            taggable_type: taggable.resource_type,
            taggable_id: taggable.id,
            created_at: format_date_time(
                &resource.attributes.string("created-at"),
            ),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format_related(&self.tag_name, &self.tag_id),
            format_polymorphic(&self.taggable_type, &self.taggable_id),
            self.created_at.clone(),
        ]
    }
}

impl Details for Row {
    fn from_document(document: &Document<Resource>) -> Self {
        Self::from_resource(&document.data, &document.included())
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Created", &self.created_at)
            .section("Relationships")
            .field("Tag", format_related(&self.tag_name, &self.tag_id))
            .field(
                "Tagged",
                format_polymorphic(&self.taggable_type, &self.taggable_id),
            )
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// Tag ID
    #[clap(long)]
    tag: String,
    /// Resource to tag (Type|ID, e.g. Project|12)
    #[clap(long)]
    taggable: String,
}

impl CreateArgs {
    fn body(&self) -> anyhow::Result<ResourceBody> {
        let tag = self.tag.trim();
        if tag.is_empty() {
            bail!("--tag is required");
        }
        let taggable = parse_reference(&self.taggable)?;
        Ok(ResourceBody::create(TYPE)
            .to_one("tag", "tags", tag)
            .to_one("taggable", taggable.resource_type, taggable.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use xbe_util::assert_err;

    fn tagging(included: bool) -> Document<Resource> {
        let mut document = json!({
            "data": {
                "type": "taggings",
                "id": "5",
                "relationships": {
                    "tag": {"data": {"type": "tags", "id": "9"}},
                },
            },
        });
        if included {
            document["included"] = json!([
                {"type": "tags", "id": "9", "attributes": {"name": "urgent"}},
            ]);
        }
        Document::decode(&serde_json::to_vec(&document).unwrap()).unwrap()
    }

    /// Tag name comes from `included`, the ID from the relationship alone
    #[rstest]
    #[case::included(true, "urgent")]
    #[case::not_included(false, "")]
    fn test_flatten_tag(#[case] included: bool, #[case] expected_name: &str) {
        let row = Row::from_document(&tagging(included));
        assert_eq!(row.tag_id, "9");
        assert_eq!(row.tag_name, expected_name);
    }

    #[test]
    fn test_details_block() {
        assert_eq!(
            Row::from_document(&tagging(true)).block().to_string(),
            "ID: 5

Relationships:
----------------------------------------
  Tag: urgent (9)
"
        );
    }

    #[test]
    fn test_list_query() {
        let args = ListArgs::try_parse_from([
            "list",
            "--taggable",
            "projects|12",
            "--taggable-type",
            "job_production_plans",
        ])
        .unwrap();
        let query = args.query();
        assert_eq!(query.get("include"), Some("tag"));
        assert_eq!(query.get("filter[taggable]"), Some("Project|12"));
        assert_eq!(
            query.get("filter[taggable_type]"),
            Some("JobProductionPlan")
        );
    }

    #[test]
    fn test_create_body() {
        let args = CreateArgs::try_parse_from([
            "create",
            "--tag",
            "9",
            "--taggable",
            "Project|12",
        ])
        .unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&args.body().unwrap().to_bytes().unwrap())
                .unwrap(),
            json!({
                "data": {
                    "type": "taggings",
                    "attributes": {},
                    "relationships": {
                        "tag": {"data": {"type": "tags", "id": "9"}},
                        "taggable": {"data": {"type": "projects", "id": "12"}},
                    },
                },
            })
        );

        let args = CreateArgs::try_parse_from([
            "create",
            "--tag",
            "9",
            "--taggable",
            "12",
        ])
        .unwrap();
        assert_err!(args.body(), "Invalid reference `12`");
    }
}
