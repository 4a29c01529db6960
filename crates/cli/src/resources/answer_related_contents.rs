//! Links between generated answers and the content they drew on, with a
//! similarity score

use crate::{
    GlobalArgs,
    resources::{self, Details, PageArgs, TableRow},
    util::{DetailBlock, format_date_time, format_polymorphic},
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Resource},
    resource_type::class_name,
};

const PATH: &str = "/v1/answer-related-contents";
const TYPE: &str = "answer-related-contents";
const FIELDS: &[&str] =
    &["answer", "related-content", "similarity", "created-at", "updated-at"];

/// Browse answer related contents
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List answer related contents, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of an answer related content
    Show {
        /// Answer related content ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(
                    global,
                    PATH,
                    &args.query()?,
                    "answer related contents",
                )
                .await
            }
            Self::Show { id } => {
                let mut query = Query::new();
                query.fields(TYPE, FIELDS);
                resources::show::<Row>(global, PATH, &id, &query).await
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by answer ID
    #[clap(long)]
    answer: Option<String>,
    /// Filter by related content type (e.g. GlossaryTerm, release-notes)
    #[clap(long)]
    related_content_type: Option<String>,
    /// Filter by related content ID. Requires --related-content-type
    #[clap(long)]
    related_content_id: Option<String>,
    /// Exclude a related content type
    #[clap(long)]
    not_related_content_type: Option<String>,
    /// Filter by minimum creation time (ISO 8601)
    #[clap(long)]
    created_at_min: Option<String>,
    /// Filter by maximum creation time (ISO 8601)
    #[clap(long)]
    created_at_max: Option<String>,
    /// Filter by presence of a creation time (true/false)
    #[clap(long)]
    is_created_at: Option<String>,
    /// Filter by minimum update time (ISO 8601)
    #[clap(long)]
    updated_at_min: Option<String>,
    /// Filter by maximum update time (ISO 8601)
    #[clap(long)]
    updated_at_max: Option<String>,
    /// Filter by presence of an update time (true/false)
    #[clap(long)]
    is_updated_at: Option<String>,
}

impl ListArgs {
    fn query(&self) -> anyhow::Result<Query> {
        let mut query = Query::new();
        query.fields(TYPE, FIELDS);
        self.page.apply(&mut query);
        query.filter("answer", self.answer.as_deref());

        let content_type =
            self.related_content_type.as_deref().map(class_name);
        let content_id = self
            .related_content_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        match (content_type.as_deref().filter(|t| !t.is_empty()), content_id) {
            (Some(content_type), Some(id)) => query.filter(
                "related_content",
                Some(format!("{content_type}|{id}").as_str()),
            ),
            (None, Some(_)) => {
                bail!("--related-content-id requires --related-content-type")
            }
            (content_type, None) => {
                query.filter("related_content_type", content_type);
            }
        }
        query.filter(
            "not_related_content_type",
            self.not_related_content_type
                .as_deref()
                .map(class_name)
                .as_deref(),
        );

        for (name, value) in [
            ("created-at-min", &self.created_at_min),
            ("created-at-max", &self.created_at_max),
            ("is-created-at", &self.is_created_at),
            ("updated-at-min", &self.updated_at_min),
            ("updated-at-max", &self.updated_at_max),
            ("is-updated-at", &self.is_updated_at),
        ] {
            query.filter(name, value.as_deref());
        }
        Ok(query)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    answer_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    related_content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    related_content_id: String,
    /// Absent when the server sent no score
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    updated_at: String,
}

impl Row {
    /// Four decimal places
    fn similarity_label(&self) -> String {
        self.similarity
            .map(|similarity| format!("{similarity:.4}"))
            .unwrap_or_default()
    }
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] =
        &["ID", "ANSWER", "RELATED CONTENT", "SIMILARITY"];

    fn from_resource(resource: &Resource, _: &Included) -> Self {
        let attributes = &resource.attributes;
        let relationships = &resource.relationships;
        let content = relationships.to_one("related-content");
        Self {
            id: resource.id.clone(),
            answer_id: relationships.id("answer"),
            related_content_type: content
                .map(|content| content.resource_type.clone())
                .unwrap_or_default(),
            related_content_id: content
                .map(|content| content.id.clone())
                .unwrap_or_default(),
            similarity: Some(attributes.float("similarity"))
                .filter(|similarity| similarity.abs() > f64::EPSILON),
            created_at: format_date_time(&attributes.string("created-at")),
            updated_at: format_date_time(&attributes.string("updated-at")),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.answer_id.clone(),
            format_polymorphic(
                &self.related_content_type,
                &self.related_content_id,
            ),
            self.similarity_label(),
        ]
    }
}

impl Details for Row {
    fn from_document(document: &Document<Resource>) -> Self {
        Self::from_resource(&document.data, &document.included())
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Similarity", self.similarity_label())
            .field("Created", &self.created_at)
            .field("Updated", &self.updated_at)
            .section("Relationships")
            .field("Answer", &self.answer_id)
            .field(
                "Related Content",
                format_polymorphic(
                    &self.related_content_type,
                    &self.related_content_id,
                ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::flatten_rows;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xbe_util::assert_err;

    fn list_args(args: &[&str]) -> ListArgs {
        ListArgs::try_parse_from(
            std::iter::once("list").chain(args.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn test_related_content_filter() {
        let query = list_args(&[
            "--related-content-type",
            "glossary_terms",
            "--related-content-id",
            "4",
        ])
        .query()
        .unwrap();
        assert_eq!(query.get("filter[related_content]"), Some("GlossaryTerm|4"));
        assert_eq!(query.get("filter[related_content_type]"), None);

        let query = list_args(&["--related-content-type", "release-notes"])
            .query()
            .unwrap();
        assert_eq!(
            query.get("filter[related_content_type]"),
            Some("ReleaseNote")
        );

        assert_err!(
            list_args(&["--related-content-id", "4"]).query(),
            "--related-content-id requires --related-content-type"
        );
    }

    #[test]
    fn test_rows() {
        let document = Document::decode(
            &serde_json::to_vec(&json!({
                "data": [
                    {
                        "type": "answer-related-contents",
                        "id": "1",
                        "attributes": {"similarity": 0.912_345},
                        "relationships": {
                            "answer": {"data": {"type": "answers", "id": "2"}},
                            "related-content": {
                                "data": {"type": "glossary-terms", "id": "3"},
                            },
                        },
                    },
                    {"type": "answer-related-contents", "id": "4"},
                ],
            }))
            .unwrap(),
        )
        .unwrap();
        let rows: Vec<Row> = flatten_rows(&document);
        assert_eq!(rows[0].cells(), vec!["1", "2", "glossary-terms/3", "0.9123"]);
        assert_eq!(rows[1].cells(), vec!["4", "", "", ""]);
        assert_eq!(
            serde_json::to_value(&rows[1]).unwrap(),
            json!({"id": "4"})
        );
    }
}
