use crate::{
    GlobalArgs, Subcommand,
    util::{print_json, print_table},
};
use clap::Parser;
use itertools::Itertools;
use serde::Serialize;
use std::process::ExitCode;
use xbe_core::resource_type::ResourceKind;

/// List the resource types the CLI knows how to name. Any spelling of a type
/// (plural or singular, kebab or snake case, or the class name) is accepted
/// wherever a type is expected
#[derive(Clone, Debug, Parser)]
pub struct ResourcesCommand {}

#[derive(Debug, Serialize)]
struct ResourceTypeRow {
    class_name: &'static str,
    json_type: &'static str,
}

impl Subcommand for ResourcesCommand {
    async fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        let rows = ResourceKind::all()
            .map(|kind| ResourceTypeRow {
                class_name: kind.class_name(),
                json_type: kind.json_type(),
            })
            .collect_vec();
        if global.json {
            print_json(&rows, global.omit_null)?;
        } else {
            print_table(
                &["CLASS", "TYPE"],
                &rows
                    .iter()
                    .map(|row| {
                        vec![row.class_name.to_owned(), row.json_type.to_owned()]
                    })
                    .collect_vec(),
            );
        }
        Ok(ExitCode::SUCCESS)
    }
}
