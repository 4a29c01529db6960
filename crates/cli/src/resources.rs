//! Resource families. Each submodule maps one API resource onto the command
//! line: flags become a query or request body, and the response document is
//! flattened into a row or detail struct for display. Everything that isn't
//! specific to a single family lives here.

pub mod answer_related_contents;
pub mod brokers;
pub mod memberships;
pub mod objectives;
pub mod projects;
pub mod questions;
pub mod taggings;
pub mod users;

use crate::{
    GlobalArgs,
    util::{DetailBlock, print_json, print_table},
};
use anyhow::{Context, bail};
use clap::Parser;
use itertools::Itertools;
use serde::Serialize;
use serde_json::json;
use xbe_core::{
    http::Query,
    jsonapi::{Document, Included, Resource, ResourceBody},
    resource_type::ORGANIZATION_KINDS,
};

/// Organization types whose display name is `company-name`. The rest use
/// `name`
const COMPANY_TYPES: &[&str] = &["brokers", "customers", "truckers"];

/// Pagination and sorting, shared by every list command
#[derive(Clone, Debug, Parser)]
pub struct PageArgs {
    /// Maximum number of results
    #[clap(long, default_value_t = 50)]
    limit: usize,
    /// Number of results to skip
    #[clap(long, default_value_t = 0)]
    offset: usize,
    /// Sort field. Prefix with `-` for descending
    #[clap(long, allow_hyphen_values = true)]
    sort: Option<String>,
}

impl PageArgs {
    pub fn apply(&self, query: &mut Query) {
        query.page(self.limit, self.offset);
        query.sort(self.sort.as_deref());
    }
}

/// Target of a delete. Deleting is irreversible so it has to be confirmed
#[derive(Clone, Debug, Parser)]
pub struct DeleteArgs {
    /// ID of the resource to delete
    id: String,
    /// Confirm the deletion
    #[clap(long)]
    confirm: bool,
}

/// One row of a list table
pub trait TableRow: Serialize + Sized {
    const HEADER: &'static [&'static str];

    fn from_resource(resource: &Resource, included: &Included) -> Self;

    /// Table cells, in [Self::HEADER] order
    fn cells(&self) -> Vec<String>;
}

/// Full description of a single resource
pub trait Details: Serialize + Sized {
    fn from_document(document: &Document<Resource>) -> Self;

    fn block(&self) -> DetailBlock;
}

/// Fetch a list of resources and print it as a table or JSON
pub async fn list<R: TableRow>(
    global: &GlobalArgs,
    path: &str,
    query: &Query,
    plural: &str,
) -> anyhow::Result<()> {
    let client = global.read_client()?;
    let body = client.get(path, query).await?;
    let document = Document::<Vec<Resource>>::decode(&body)?;
    let rows: Vec<R> = flatten_rows(&document);

    if global.json {
        print_json(&rows, global.omit_null)
    } else if rows.is_empty() {
        println!("No {plural} found.");
        Ok(())
    } else {
        print_table(R::HEADER, &rows.iter().map(R::cells).collect_vec());
        Ok(())
    }
}

/// Flatten every resource in a collection document
pub fn flatten_rows<R: TableRow>(document: &Document<Vec<Resource>>) -> Vec<R> {
    let included = document.included();
    document
        .data
        .iter()
        .map(|resource| R::from_resource(resource, &included))
        .collect()
}

/// Fetch a single resource and print its details
pub async fn show<D: Details>(
    global: &GlobalArgs,
    path: &str,
    id: &str,
    query: &Query,
) -> anyhow::Result<()> {
    let id = require_id(id)?;
    let client = global.read_client()?;
    let body = client.get(&format!("{path}/{id}"), query).await?;
    let document = Document::<Resource>::decode(&body)?;
    print_details(global, &D::from_document(&document))
}

pub fn print_details<D: Details>(
    global: &GlobalArgs,
    details: &D,
) -> anyhow::Result<()> {
    if global.json {
        print_json(details, global.omit_null)
    } else {
        print!("{}", details.block());
        Ok(())
    }
}

/// Send a create request and return the created resource
pub async fn create(
    global: &GlobalArgs,
    path: &str,
    body: &ResourceBody,
) -> anyhow::Result<Document<Resource>> {
    let client = global.write_client()?;
    let response = client
        .post(path, body.to_bytes().context("Error encoding request body")?)
        .await?;
    Ok(Document::decode(&response)?)
}

/// Send an update request and return the updated resource. An update that
/// doesn't change anything is rejected before anything is sent.
pub async fn update(
    global: &GlobalArgs,
    path: &str,
    id: &str,
    body: &ResourceBody,
) -> anyhow::Result<Document<Resource>> {
    let id = require_id(id)?;
    if !body.has_changes() {
        bail!("At least one field to update is required");
    }
    let client = global.write_client()?;
    let response = client
        .patch(
            &format!("{path}/{id}"),
            body.to_bytes().context("Error encoding request body")?,
        )
        .await?;
    Ok(Document::decode(&response)?)
}

/// Delete a resource. Requires `--confirm`, checked before anything is sent
pub async fn delete(
    global: &GlobalArgs,
    path: &str,
    singular: &str,
    args: &DeleteArgs,
) -> anyhow::Result<()> {
    let id = require_id(&args.id)?;
    if !args.confirm {
        bail!("Deleting {singular} {id} is irreversible; pass --confirm");
    }
    let client = global.write_client()?;
    client.delete(&format!("{path}/{id}")).await?;
    if global.json {
        print_json(&json!({"id": id, "deleted": true}), global.omit_null)
    } else {
        println!("Deleted {singular} {id}");
        Ok(())
    }
}

/// Report a successful create/update as `<Verb> <singular> <id> (<name>)`,
/// or `{"id", "name"}` in JSON
pub fn print_outcome(
    global: &GlobalArgs,
    verb: &str,
    singular: &str,
    resource: &Resource,
    name: &str,
) -> anyhow::Result<()> {
    if global.json {
        print_json(&json!({"id": resource.id, "name": name}), global.omit_null)
    } else {
        if name.is_empty() {
            println!("{verb} {singular} {}", resource.id);
        } else {
            println!("{verb} {singular} {} ({name})", resource.id);
        }
        Ok(())
    }
}

fn require_id(id: &str) -> anyhow::Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Resource ID is required");
    }
    Ok(id)
}

/// Request the display name of every organization type
pub fn organization_fields(query: &mut Query) {
    for kind in ORGANIZATION_KINDS {
        let resource_type = kind.json_type();
        let name = if COMPANY_TYPES.contains(&resource_type) {
            "company-name"
        } else {
            "name"
        };
        query.fields(resource_type, &[name]);
    }
}

/// Name attributes to try for a related organization
pub const ORGANIZATION_NAME: &[&str] = &["company-name", "name"];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_args() {
        let mut query = Query::new();
        PageArgs {
            limit: 50,
            offset: 100,
            sort: Some("-created-at".into()),
        }
        .apply(&mut query);
        assert_eq!(
            query.iter().collect_vec(),
            vec![
                ("page[limit]", "50"),
                ("page[offset]", "100"),
                ("sort", "-created-at"),
            ]
        );
    }

    #[test]
    fn test_organization_fields() {
        let mut query = Query::new();
        organization_fields(&mut query);
        assert_eq!(query.get("fields[truckers]"), Some("company-name"));
        assert_eq!(query.get("fields[developers]"), Some("name"));
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(" 12 ").unwrap(), "12");
        xbe_util::assert_err!(require_id("  "), "ID is required");
    }
}
