//! Questions asked of the platform's knowledge base, and their triage state

use crate::{
    GlobalArgs,
    resources::{self, Details, PageArgs, TableRow},
    util::{
        DetailBlock, format_bool, format_date_time, format_polymorphic,
        print_json, truncate,
    },
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Resource, ResourceBody},
    resource_type::parse_reference,
};

const PATH: &str = "/v1/questions";
const TYPE: &str = "questions";

/// Browse questions
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List questions, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a question
    Show {
        /// Question ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "questions")
                    .await
            }
            Self::Show { id } => {
                resources::show::<QuestionDetails>(
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

/// Update questions
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Update a question. Only the given fields are changed
    Update {
        /// Question ID
        id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::Update { id, fields } => {
                let body = fields.body(&id)?;
                if !body.has_changes() {
                    bail!("No attributes or relationships to update");
                }
                let document =
                    resources::update(global, PATH, &id, &body).await?;
                if global.json {
                    let row =
                        Row::from_resource(&document.data, &document.included());
                    print_json(&row, global.omit_null)
                } else {
                    println!("Updated question {}", document.data.id);
                    Ok(())
                }
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by content (partial match)
    #[clap(long)]
    content: Option<String>,
    /// Filter by source
    #[clap(long)]
    source: Option<String>,
    /// Filter by motivation
    #[clap(long)]
    motivation: Option<String>,
    /// Filter by newsletter exclusion (true/false)
    #[clap(long)]
    ignore_organization_scoped_newsletters: Option<String>,
    /// Filter by triage status (true/false)
    #[clap(long)]
    is_triaged: Option<String>,
    /// Filter by creator user ID
    #[clap(long)]
    created_by: Option<String>,
    /// Filter by asker user ID
    #[clap(long)]
    asked_by: Option<String>,
    /// Filter by assignee user ID
    #[clap(long)]
    assigned_to: Option<String>,
    /// Filter by assignment status (true/false)
    #[clap(long)]
    is_assigned: Option<String>,
    /// Only questions with feedback (true/false)
    #[clap(long)]
    with_feedback: Option<String>,
    /// Only questions without feedback (true/false)
    #[clap(long)]
    without_feedback: Option<String>,
    /// Only questions with related content (true/false)
    #[clap(long)]
    with_related_content: Option<String>,
    /// Only questions without related content (true/false)
    #[clap(long)]
    without_related_content: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.fields(
            TYPE,
            &[
                "content",
                "source",
                "is-public",
                "is-triaged",
                "asked-by",
                "created-by",
                "assigned-to",
            ],
        );
        self.page.apply(&mut query);
        for (name, value) in [
            ("content", &self.content),
            ("source", &self.source),
            ("motivation", &self.motivation),
            (
                "ignore_organization_scoped_newsletters",
                &self.ignore_organization_scoped_newsletters,
            ),
            ("is_triaged", &self.is_triaged),
            ("created_by", &self.created_by),
            ("asked_by", &self.asked_by),
            ("assigned_to", &self.assigned_to),
            ("is_assigned", &self.is_assigned),
            ("with_feedback", &self.with_feedback),
            ("without_feedback", &self.without_feedback),
            ("with_related_content", &self.with_related_content),
            ("without_related_content", &self.without_related_content),
        ] {
            query.filter(name, value.as_deref());
        }
        query
    }
}

fn show_query() -> Query {
    let mut query = Query::new();
    query.fields(
        TYPE,
        &[
            "content",
            "source",
            "is-public",
            "is-public-to-organization-children",
            "ignore-organization-scoped-newsletters",
            "motivation",
            "motivation-guess",
            "is-triaged",
            "triaged-at",
            "best-answer-content",
            "asked-by",
            "created-by",
            "assigned-to",
            "public-organization-scope",
            "answer",
            "answers",
        ],
    );
    query
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    source: String,
    is_public: bool,
    is_triaged: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    asked_by_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    created_by_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    assigned_to_id: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] = &[
        "ID",
        "CONTENT",
        "SOURCE",
        "PUBLIC",
        "TRIAGED",
        "ASKED BY",
        "CREATED BY",
        "ASSIGNED TO",
    ];

    fn from_resource(resource: &Resource, _: &Included) -> Self {
        let attributes = &resource.attributes;
        let relationships = &resource.relationships;
        Self {
            id: resource.id.clone(),
            content: attributes.string("content").trim().to_owned(),
            source: attributes.string("source"),
            is_public: attributes.bool("is-public"),
            is_triaged: attributes.bool("is-triaged"),
            asked_by_id: relationships.id("asked-by"),
            created_by_id: relationships.id("created-by"),
            assigned_to_id: relationships.id("assigned-to"),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            truncate(&self.content, 60),
            self.source.clone(),
            format_bool(self.is_public),
            format_bool(self.is_triaged),
            self.asked_by_id.clone(),
            self.created_by_id.clone(),
            self.assigned_to_id.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QuestionDetails {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    source: String,
    is_public: bool,
    is_public_to_organization_children: bool,
    ignore_organization_scoped_newsletters: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    motivation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    motivation_guess: String,
    is_triaged: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    triaged_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    best_answer_content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    asked_by_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    created_by_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    assigned_to_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    public_organization_scope_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    public_organization_scope_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    answer_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    answer_ids: Vec<String>,
}

impl Details for QuestionDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let resource = &document.data;
        let attributes = &resource.attributes;
        let relationships = &resource.relationships;
        let scope = relationships.to_one("public-organization-scope");
        Self {
            id: resource.id.clone(),
            content: attributes.string("content").trim().to_owned(),
            source: attributes.string("source"),
            is_public: attributes.bool("is-public"),
            is_public_to_organization_children: attributes
                .bool("is-public-to-organization-children"),
            ignore_organization_scoped_newsletters: attributes
                .bool("ignore-organization-scoped-newsletters"),
            motivation: attributes.string("motivation"),
            motivation_guess: attributes.string("motivation-guess"),
            is_triaged: attributes.bool("is-triaged"),
            triaged_at: format_date_time(&attributes.string("triaged-at")),
            best_answer_content: attributes.string("best-answer-content"),
            asked_by_id: relationships.id("asked-by"),
            created_by_id: relationships.id("created-by"),
            assigned_to_id: relationships.id("assigned-to"),
            public_organization_scope_type: scope
                .map(|scope| scope.resource_type.clone())
                .unwrap_or_default(),
            public_organization_scope_id: scope
                .map(|scope| scope.id.clone())
                .unwrap_or_default(),
            answer_id: relationships.id("answer"),
            answer_ids: relationships.ids("answers"),
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Content", &self.content)
            .field("Source", &self.source)
            .field("Motivation", &self.motivation)
            .field("Motivation Guess", &self.motivation_guess)
            .field("Best Answer Content", &self.best_answer_content)
            .field("Triaged At", &self.triaged_at)
            .section("Flags")
            .flag("Is Public", self.is_public)
            .flag(
                "Is Public to Organization Children",
                self.is_public_to_organization_children,
            )
            .flag(
                "Ignore Organization Scoped Newsletters",
                self.ignore_organization_scoped_newsletters,
            )
            .flag("Is Triaged", self.is_triaged)
            .section("Relationships")
            .field("Asked By", &self.asked_by_id)
            .field("Created By", &self.created_by_id)
            .field("Assigned To", &self.assigned_to_id)
            .field(
                "Public Organization Scope",
                format_polymorphic(
                    &self.public_organization_scope_type,
                    &self.public_organization_scope_id,
                ),
            )
            .field("Answer", &self.answer_id)
            .ids("Answers", &self.answer_ids)
    }
}

#[derive(Clone, Debug, Parser)]
pub struct UpdateArgs {
    /// Question content
    #[clap(long)]
    content: Option<String>,
    /// Source
    #[clap(long)]
    source: Option<String>,
    /// Exclude from organization-scoped newsletters (true/false)
    #[clap(long)]
    ignore_organization_scoped_newsletters: Option<bool>,
    /// Public (true/false)
    #[clap(long)]
    is_public: Option<bool>,
    /// Public to child organizations (true/false)
    #[clap(long)]
    is_public_to_organization_children: Option<bool>,
    /// Motivation
    #[clap(long)]
    motivation: Option<String>,
    /// Triaged (true/false)
    #[clap(long)]
    is_triaged: Option<bool>,
    /// Regenerate the answer (true/false)
    #[clap(long)]
    recreate_answer: Option<bool>,
    /// Asker user ID
    #[clap(long)]
    asked_by: Option<String>,
    /// Assignee user ID. Pass an empty value to unassign
    #[clap(long)]
    assigned_to: Option<String>,
    /// Organization the question is public to (Type|ID, e.g. Broker|123).
    /// Pass an empty value to clear it
    #[clap(long)]
    public_organization_scope: Option<String>,
}

impl UpdateArgs {
    fn body(&self, id: &str) -> anyhow::Result<ResourceBody> {
        let mut body = ResourceBody::update(TYPE, id.trim())
            .attribute_opt("content", self.content.clone())
            .attribute_opt("source", self.source.clone())
            .attribute_opt(
                "ignore-organization-scoped-newsletters",
                self.ignore_organization_scoped_newsletters,
            )
            .attribute_opt("is-public", self.is_public)
            .attribute_opt(
                "is-public-to-organization-children",
                self.is_public_to_organization_children,
            )
            .attribute_opt("motivation", self.motivation.clone())
            .attribute_opt("is-triaged", self.is_triaged)
            .attribute_opt("recreate-answer", self.recreate_answer);

        if let Some(asked_by) = self.asked_by.as_deref().map(str::trim) {
            if asked_by.is_empty() {
                bail!("--asked-by cannot be empty");
            }
            body = body.to_one("asked-by", "users", asked_by);
        }
        body = match self.assigned_to.as_deref().map(str::trim) {
            Some("") => body.clear_to_one("assigned-to"),
            Some(user) => body.to_one("assigned-to", "users", user),
            None => body,
        };
        body = match self.public_organization_scope.as_deref().map(str::trim) {
            Some("") => body.clear_to_one("public-organization-scope"),
            Some(scope) => {
                let scope = parse_reference(scope)?;
                body.to_one(
                    "public-organization-scope",
                    scope.resource_type,
                    scope.id,
                )
            }
            None => body,
        };
        Ok(body)
    }
}
