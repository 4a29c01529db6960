use crate::{
    GlobalArgs,
    resources::{self, Details, PageArgs, TableRow},
    util::{DetailBlock, truncate},
};
use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Resource, ResourceBody},
};

const PATH: &str = "/v1/brokers";
const TYPE: &str = "brokers";

/// Browse brokers
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List brokers, sorted by company name
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a broker
    Show {
        /// Broker ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "brokers")
                    .await
            }
            Self::Show { id } => {
                resources::show::<BrokerDetails>(global, PATH, &id, &Query::new())
                    .await
            }
        }
    }
}

/// Create and update brokers
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Create a broker
    Create(CreateArgs),
    /// Update a broker. Only the given fields are changed
    Update {
        /// Broker ID
        id: String,
        /// New company name
        #[clap(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: BrokerFields,
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
                        .attribute_opt("company-name", name),
                );
                ("Updated", resources::update(global, PATH, &id, &body).await?)
            }
        };
        let name = document.data.attributes.string("company-name");
        resources::print_outcome(global, verb, "broker", &document.data, name.trim())
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Filter by company name (partial match)
    #[clap(long)]
    company_name: Option<String>,
    /// Filter by active status (true/false)
    #[clap(long)]
    is_active: Option<String>,
    /// Filter by default broker (true/false)
    #[clap(long)]
    is_default: Option<String>,
    /// Filter by subdomain
    #[clap(long)]
    sub_domain: Option<String>,
    /// Filter by QuickBooks integration (true/false)
    #[clap(long)]
    quickbooks_enabled: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.sort(Some("company-name"));
        query.fields(TYPE, &["company-name"]);
        self.page.apply(&mut query);
        for (name, value) in [
            ("company-name", &self.company_name),
            ("is-active", &self.is_active),
            ("is-default", &self.is_default),
            ("sub-domain", &self.sub_domain),
            ("quickbooks-enabled", &self.quickbooks_enabled),
        ] {
            query.filter(name, value.as_deref());
        }
        query
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Row {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    company_name: String,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] = &["ID", "COMPANY"];

    fn from_resource(resource: &Resource, _: &Included) -> Self {
        Self {
            id: resource.id.clone(),
            company_name: resource
                .attributes
                .string("company-name")
                .trim()
                .to_owned(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), truncate(&self.company_name, 80)]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BrokerDetails {
    id: String,
    company_name: String,
    abbreviation: String,
    sub_domain: String,
    default_reply_to_email_address: String,
    remit_to_address: String,
    help_text: String,
    is_active: bool,
    is_default: bool,
    is_transport_only: bool,
    quickbooks_enabled: bool,
}

impl Details for BrokerDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let resource = &document.data;
        let attributes = &resource.attributes;
        Self {
            id: resource.id.clone(),
            company_name: attributes.string("company-name").trim().to_owned(),
            abbreviation: attributes.string("abbreviation"),
            sub_domain: attributes.string("sub-domain"),
            default_reply_to_email_address: attributes
                .string("default-reply-to-email-address"),
            remit_to_address: attributes.string("remit-to-address"),
            help_text: attributes.string("help-text"),
            is_active: attributes.bool("is-active"),
            is_default: attributes.bool("is-default"),
            is_transport_only: attributes.bool("is-transport-only"),
            quickbooks_enabled: attributes.bool("quickbooks-enabled"),
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Company Name", &self.company_name)
            .field("Abbreviation", &self.abbreviation)
            .field("Subdomain", &self.sub_domain)
            .field("Reply-To Email", &self.default_reply_to_email_address)
            .field("Remit-To Address", &self.remit_to_address)
            .field("Help Text", &self.help_text)
            .section("Flags")
            .flag("Is Active", self.is_active)
            .flag("Is Default", self.is_default)
            .flag("Is Transport Only", self.is_transport_only)
            .flag("QuickBooks Enabled", self.quickbooks_enabled)
    }
}

/// Attributes shared by create and update
#[derive(Clone, Debug, Parser)]
pub struct BrokerFields {
    /// Short abbreviation
    #[clap(long)]
    abbreviation: Option<String>,
    /// Transport only (true/false)
    #[clap(long)]
    is_transport_only: Option<bool>,
    /// Default reply-to email address
    #[clap(long)]
    default_reply_to_email: Option<String>,
    /// Active status (true/false, admin only)
    #[clap(long)]
    is_active: Option<bool>,
    /// Enable implicit time card approval (true/false)
    #[clap(long)]
    enable_implicit_time_card_approval: Option<bool>,
    /// Remit-to address
    #[clap(long)]
    remit_to_address: Option<String>,
    /// QuickBooks enabled (true/false)
    #[clap(long)]
    quickbooks_enabled: Option<bool>,
    /// Help text
    #[clap(long)]
    help_text: Option<String>,
    /// Accepting open door issues (true/false)
    #[clap(long)]
    is_accepting_open_door_issues: Option<bool>,
    /// Enable equipment movement (true/false)
    #[clap(long)]
    enable_equipment_movement: Option<bool>,
}

impl BrokerFields {
    fn apply(&self, body: ResourceBody) -> ResourceBody {
        body.attribute_opt("abbreviation", self.abbreviation.clone())
            .attribute_opt("is-transport-only", self.is_transport_only)
            .attribute_opt(
                "default-reply-to-email-address",
                self.default_reply_to_email.clone(),
            )
            .attribute_opt("is-active", self.is_active)
            .attribute_opt(
                "enable-implicit-time-card-approval",
                self.enable_implicit_time_card_approval,
            )
            .attribute_opt("remit-to-address", self.remit_to_address.clone())
            .attribute_opt("quickbooks-enabled", self.quickbooks_enabled)
            .attribute_opt("help-text", self.help_text.clone())
            .attribute_opt(
                "is-accepting-open-door-issues",
                self.is_accepting_open_door_issues,
            )
            .attribute_opt(
                "enable-equipment-movement",
                self.enable_equipment_movement,
            )
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// Company name
    #[clap(long)]
    name: Option<String>,
    #[command(flatten)]
    fields: BrokerFields,
}

impl CreateArgs {
    fn body(&self) -> anyhow::Result<ResourceBody> {
        let Some(name) =
            self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            bail!("--name is required");
        };
        Ok(self
            .fields
            .apply(ResourceBody::create(TYPE).attribute("company-name", name)))
    }
}
