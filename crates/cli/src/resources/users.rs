use crate::{
    GlobalArgs,
    resources::{self, Details, PageArgs, TableRow},
    util::{DetailBlock, format_date, truncate},
};
use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Resource, ResourceBody},
};

const PATH: &str = "/v1/users";
const TYPE: &str = "users";

/// Browse users
#[derive(Clone, Debug, clap::Subcommand)]
pub enum View {
    /// List users, with filtering and pagination
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show full details of a user
    Show {
        /// User ID
        id: String,
    },
}

impl View {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                resources::list::<Row>(global, PATH, &args.query(), "users").await
            }
            Self::Show { id } => {
                resources::show::<UserDetails>(global, PATH, &id, &Query::new())
                    .await
            }
        }
    }
}

/// Create and update users
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Do {
    /// Create a user
    Create(CreateArgs),
    /// Update a user. Only the given fields are changed
    Update {
        /// User ID
        id: String,
        /// New name
        #[clap(long)]
        name: Option<String>,
        /// New email address
        #[clap(long)]
        email: Option<String>,
        #[command(flatten)]
        fields: UserFields,
    },
}

impl Do {
    pub async fn execute(self, global: &GlobalArgs) -> anyhow::Result<()> {
        let (verb, document) = match self {
            Self::Create(args) => {
                ("Created", resources::create(global, PATH, &args.body()?).await?)
            }
            Self::Update {
                id,
                name,
                email,
                fields,
            } => {
                let body = fields.apply(
                    ResourceBody::update(TYPE, id.trim())
                        .attribute_opt("name", name)
                        .attribute_opt("email-address", email),
                )?;
                ("Updated", resources::update(global, PATH, &id, &body).await?)
            }
        };
        let name = document.data.attributes.string("name");
        resources::print_outcome(global, verb, "user", &document.data, name.trim())
    }
}

#[derive(Clone, Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Search by name
    #[clap(long)]
    name: Option<String>,
    /// Only admins
    #[clap(long)]
    is_admin: bool,
    /// Filter by email address
    #[clap(long)]
    email_address: Option<String>,
    /// Filter by email address (partial match)
    #[clap(long)]
    email_address_like: Option<String>,
    /// Filter by mobile number
    #[clap(long)]
    mobile_number: Option<String>,
    /// Filter by Slack ID
    #[clap(long)]
    slack_id: Option<String>,
    /// Filter by driver status (true/false)
    #[clap(long)]
    is_driver: Option<String>,
    /// Filter by driving suspension (true/false)
    #[clap(long)]
    is_suspended_from_driving: Option<String>,
    /// Filter by customer membership (customer ID)
    #[clap(long)]
    having_customer_membership_with: Option<String>,
    /// Filter by trucker membership (trucker ID)
    #[clap(long)]
    having_trucker_membership_with: Option<String>,
    /// Filter by question assignment availability (true/false)
    #[clap(long)]
    is_available_for_question_assignment: Option<String>,
}

impl ListArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query.fields(TYPE, &["name", "email-address", "mobile-number", "is-admin"]);
        self.page.apply(&mut query);
        query.filter("q", self.name.as_deref());
        if self.is_admin {
            query.filter("is_admin", Some("true"));
        }
        for (name, value) in [
            ("email-address", &self.email_address),
            ("email-address-like", &self.email_address_like),
            ("mobile-number", &self.mobile_number),
            ("slack-id", &self.slack_id),
            ("is-driver", &self.is_driver),
            ("is-suspended-from-driving", &self.is_suspended_from_driving),
            (
                "having-customer-membership-with",
                &self.having_customer_membership_with,
            ),
            (
                "having-trucker-membership-with",
                &self.having_trucker_membership_with,
            ),
            (
                "is-available-for-question-assignment",
                &self.is_available_for_question_assignment,
            ),
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
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    mobile: String,
    is_admin: bool,
}

impl TableRow for Row {
    const HEADER: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "MOBILE", "ADMIN"];

    fn from_resource(resource: &Resource, _: &Included) -> Self {
        let attributes = &resource.attributes;
        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            email: attributes.string("email-address"),
            mobile: attributes.string("mobile-number"),
            is_admin: attributes.bool("is-admin"),
        }
    }

    fn cells(&self) -> Vec<String> {
        let admin = if self.is_admin { "yes" } else { "" };
        vec![
            self.id.clone(),
            truncate(&self.name, 25),
            truncate(&self.email, 35),
            self.mobile.clone(),
            admin.to_owned(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserDetails {
    id: String,
    name: String,
    email: String,
    mobile: String,
    default_contact_method: String,
    slack_id: String,
    dark_mode: String,
    explicit_time_zone_id: String,
    created_at: String,
    is_admin: bool,
    is_suspended_from_driving: bool,
    is_available_for_question_assignment: bool,
    is_notifiable: bool,
}

impl Details for UserDetails {
    fn from_document(document: &Document<Resource>) -> Self {
        let resource = &document.data;
        let attributes = &resource.attributes;
        Self {
            id: resource.id.clone(),
            name: attributes.string("name").trim().to_owned(),
            email: attributes.string("email-address"),
            mobile: attributes.string("mobile-number"),
            default_contact_method: attributes.string("default-contact-method"),
            slack_id: attributes.string("slack-id"),
            dark_mode: attributes.string("dark-mode"),
            explicit_time_zone_id: attributes.string("explicit-time-zone-id"),
            created_at: format_date(&attributes.string("created-at")),
            is_admin: attributes.bool("is-admin"),
            is_suspended_from_driving: attributes
                .bool("is-suspended-from-driving"),
            is_available_for_question_assignment: attributes
                .bool("is-available-for-question-assignment"),
            is_notifiable: attributes.bool("is-notifiable"),
        }
    }

    fn block(&self) -> DetailBlock {
        DetailBlock::new(&self.id)
            .field("Name", &self.name)
            .field("Email", &self.email)
            .field("Mobile", &self.mobile)
            .field("Default Contact Method", &self.default_contact_method)
            .field("Slack ID", &self.slack_id)
            .field("Dark Mode", &self.dark_mode)
            .field("Time Zone", &self.explicit_time_zone_id)
            .field("Created", &self.created_at)
            .section("Flags")
            .flag("Is Admin", self.is_admin)
            .flag("Is Suspended From Driving", self.is_suspended_from_driving)
            .flag(
                "Is Available For Question Assignment",
                self.is_available_for_question_assignment,
            )
            .flag("Is Notifiable", self.is_notifiable)
    }
}

/// Attributes shared by create and update
#[derive(Clone, Debug, Parser)]
pub struct UserFields {
    /// Mobile phone number
    #[clap(long)]
    mobile: Option<String>,
    /// Default contact method (email, sms, push)
    #[clap(long)]
    default_contact_method: Option<String>,
    /// Suspend from driving (true/false)
    #[clap(long)]
    is_suspended_from_driving: Option<bool>,
    /// Dark mode preference
    #[clap(long)]
    dark_mode: Option<String>,
    /// Available for question assignment (true/false)
    #[clap(long)]
    is_available_for_question: Option<bool>,
    /// Slack user ID (admin only)
    #[clap(long)]
    slack_id: Option<String>,
    /// Admin status (true/false)
    #[clap(long)]
    is_admin: Option<bool>,
    /// Potential trucker referrer (true/false)
    #[clap(long)]
    is_potential_trucker_referrer: Option<bool>,
    /// Opt out of check-in request notifications (true/false)
    #[clap(long)]
    opt_out_of_check_in_request_notifications: Option<bool>,
    /// Opt out of shift starting notifications (true/false)
    #[clap(long)]
    opt_out_of_shift_starting_notifications: Option<bool>,
    /// Contact method required (true/false)
    #[clap(long)]
    is_contact_method_required: Option<bool>,
    /// Explicit time zone ID
    #[clap(long)]
    explicit_time_zone_id: Option<String>,
    /// Reference data, as a JSON object
    #[clap(long)]
    reference_data: Option<String>,
    /// Read-only mode enabled (true/false)
    #[clap(long)]
    is_read_only_mode_enabled: Option<bool>,
    /// Notifiable (true/false)
    #[clap(long)]
    is_notifiable: Option<bool>,
}

impl UserFields {
    fn apply(&self, body: ResourceBody) -> anyhow::Result<ResourceBody> {
        let reference_data = self
            .reference_data
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .context("--reference-data must be valid JSON")?;
        Ok(body
            .attribute_opt("mobile-number", self.mobile.clone())
            .attribute_opt(
                "default-contact-method",
                self.default_contact_method.clone(),
            )
            .attribute_opt(
                "is-suspended-from-driving",
                self.is_suspended_from_driving,
            )
            .attribute_opt("dark-mode", self.dark_mode.clone())
            .attribute_opt(
                "is-available-for-question-assignment",
                self.is_available_for_question,
            )
            .attribute_opt("slack-id", self.slack_id.clone())
            .attribute_opt("is-admin", self.is_admin)
            .attribute_opt(
                "is-potential-trucker-referrer",
                self.is_potential_trucker_referrer,
            )
            .attribute_opt(
                "opt-out-of-check-in-request-notifications",
                self.opt_out_of_check_in_request_notifications,
            )
            .attribute_opt(
                "opt-out-of-shift-starting-notifications",
                self.opt_out_of_shift_starting_notifications,
            )
            .attribute_opt(
                "is-contact-method-required",
                self.is_contact_method_required,
            )
            .attribute_opt(
                "explicit-time-zone-id",
                self.explicit_time_zone_id.clone(),
            )
            .attribute_opt("reference-data", reference_data)
            .attribute_opt(
                "is-read-only-mode-enabled",
                self.is_read_only_mode_enabled,
            )
            .attribute_opt("is-notifiable", self.is_notifiable))
    }
}

#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// User name
    #[clap(long)]
    name: Option<String>,
    /// Email address
    #[clap(long)]
    email: Option<String>,
    #[command(flatten)]
    fields: UserFields,
}

impl CreateArgs {
    fn body(&self) -> anyhow::Result<ResourceBody> {
        let Some(name) =
            self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            bail!("--name is required");
        };
        let Some(email) =
            self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            bail!("--email is required");
        };
        self.fields.apply(
            ResourceBody::create(TYPE)
                .attribute("name", name)
                .attribute("email-address", email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xbe_util::assert_err;

    #[test]
    fn test_list_query() {
        let args =
            ListArgs::try_parse_from(["list", "--name", "ada", "--is-admin"])
                .unwrap();
        let query = args.query();
        assert_eq!(query.get("filter[q]"), Some("ada"));
        assert_eq!(query.get("filter[is_admin]"), Some("true"));

        let args = ListArgs::try_parse_from(["list"]).unwrap();
        assert_eq!(args.query().get("filter[is_admin]"), None);
    }

    #[test]
    fn test_row_cells() {
        let row = Row {
            id: "3".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            mobile: String::new(),
            is_admin: true,
        };
        assert_eq!(row.cells(), vec!["3", "Ada", "ada@example.com", "", "yes"]);
    }

    #[test]
    fn test_create_body() {
        let args = CreateArgs::try_parse_from([
            "create",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--reference-data",
            r#"{"badge": 12}"#,
        ])
        .unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&args.body().unwrap().to_bytes().unwrap())
                .unwrap(),
            json!({
                "data": {
                    "type": "users",
                    "attributes": {
                        "name": "Ada",
                        "email-address": "ada@example.com",
                        "reference-data": {"badge": 12},
                    },
                },
            })
        );
    }

    #[test]
    fn test_create_validation() {
        let args = CreateArgs::try_parse_from(["create", "--email", "a@b.c"])
            .unwrap();
        assert_err!(args.body(), "--name is required");
        let args = CreateArgs::try_parse_from(["create", "--name", "Ada"]).unwrap();
        assert_err!(args.body(), "--email is required");
        let args = CreateArgs::try_parse_from([
            "create",
            "--name",
            "Ada",
            "--email",
            "a@b.c",
            "--reference-data",
            "{",
        ])
        .unwrap();
        assert_err!(args.body(), "--reference-data must be valid JSON");
    }
}
