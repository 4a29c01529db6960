use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use std::{
    fmt::{self, Display},
    iter,
};
use xbe_core::http::HttpError;

/// Column spacing in tables
const TABLE_PADDING: usize = 2;

/// Print an error chain to stderr. If the server rejected the request, its
/// response body goes first because that's where the useful message is.
pub fn print_error(error: &anyhow::Error) {
    if let Some(body) = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<HttpError>())
        .and_then(HttpError::response_body)
    {
        eprintln!("{body}");
    }
    eprintln!("{error}");
    error
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("  {cause}"));
}

/// Render rows as an aligned table with a header
pub fn format_table(header: &[&str], rows: &[Vec<String>]) -> String {
    // For each column, find the largest width of any cell
    let widths = (0..header.len())
        .map(|column| {
            iter::once(header[column].chars().count())
                .chain(rows.iter().map(|row| {
                    row.get(column).map_or(0, |cell| cell.chars().count())
                }))
                .max()
                .unwrap_or_default()
        })
        .collect_vec();

    let format_row = |cells: Vec<&str>| {
        let line = cells
            .into_iter()
            .zip(&widths)
            .map(|(cell, width)| {
                format!("{cell:<width$}", width = width + TABLE_PADDING)
            })
            .join("");
        format!("{}\n", line.trim_end())
    };
    iter::once(format_row(header.to_vec()))
        .chain(
            rows.iter()
                .map(|row| format_row(row.iter().map(String::as_str).collect())),
        )
        .collect()
}

/// Print rows in a table
pub fn print_table(header: &[&str], rows: &[Vec<String>]) {
    print!("{}", format_table(header, rows));
}

/// Serialize data to JSON. With `omit_null`, null and empty string members
/// are removed from every object, at any depth
pub fn to_json<T: Serialize>(
    value: &T,
    omit_null: bool,
) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(value)?;
    if omit_null {
        strip_empty(&mut value);
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Serialize data to JSON and print it
pub fn print_json<T: Serialize>(value: &T, omit_null: bool) -> anyhow::Result<()> {
    println!("{}", to_json(value, omit_null)?);
    Ok(())
}

fn strip_empty(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, value| {
                !(value.is_null() || value.as_str() == Some(""))
            });
            map.values_mut().for_each(strip_empty);
        }
        Value::Array(values) => values.iter_mut().for_each(strip_empty),
        _ => {}
    }
}

/// A `Key: value` block describing a single resource. Top-level fields come
/// first, then any number of titled sections (e.g. `Relationships`) with
/// indented fields. Blank values are skipped, except for booleans which are
/// always shown. A section with nothing in it isn't shown at all.
#[derive(Debug, Default)]
pub struct DetailBlock {
    fields: Vec<(&'static str, String)>,
    sections: Vec<Section>,
}

#[derive(Debug)]
struct Section {
    title: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl DetailBlock {
    pub fn new(id: &str) -> Self {
        Self {
            fields: vec![("ID", id.to_owned())],
            sections: Vec::new(),
        }
    }

    /// Start a new section. Subsequent fields are added to it
    #[must_use]
    pub fn section(mut self, title: &'static str) -> Self {
        self.sections.push(Section {
            title,
            fields: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn field(mut self, label: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.push(label, value);
        }
        self
    }

    #[must_use]
    pub fn flag(mut self, label: &'static str, value: bool) -> Self {
        self.push(label, value.to_string());
        self
    }

    /// Add a list of IDs, comma-separated
    #[must_use]
    pub fn ids(self, label: &'static str, ids: &[String]) -> Self {
        self.field(label, ids.join(", "))
    }

    fn push(&mut self, label: &'static str, value: String) {
        match self.sections.last_mut() {
            Some(section) => section.fields.push((label, value)),
            None => self.fields.push((label, value)),
        }
    }
}

impl Display for DetailBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in &self.fields {
            writeln!(f, "{label}: {value}")?;
        }
        for section in &self.sections {
            if section.fields.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{}:", section.title)?;
            writeln!(f, "{}", "-".repeat(40))?;
            for (label, value) in &section.fields {
                writeln!(f, "  {label}: {value}")?;
            }
        }
        Ok(())
    }
}

/// Reformat a date as `YYYY-MM-DD`. Full timestamps are cut down to their
/// date. Anything unparseable is shown as-is.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return date_time.format("%Y-%m-%d").to_string();
    }
    value.to_owned()
}

/// Reformat a timestamp as `YYYY-MM-DD HH:MM`, in the offset the server sent
/// it in. Anything unparseable is shown as-is.
pub fn format_date_time(value: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M";
    let value = value.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return date_time.format(FORMAT).to_string();
    }
    if let Ok(date_time) =
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
    {
        return date_time.format(FORMAT).to_string();
    }
    value.to_owned()
}

/// Shorten a string to at most `max` characters, marking the cut with `...`
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut truncated: String = value.chars().take(max - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Get the first value that isn't blank, trimmed
pub fn first_non_empty<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_owned()
}

/// Label a related resource as `name (id)`, or whichever half is present
pub fn format_related(name: &str, id: &str) -> String {
    match (name.is_empty(), id.is_empty()) {
        (true, _) => id.to_owned(),
        (false, true) => name.to_owned(),
        (false, false) => format!("{name} ({id})"),
    }
}

/// Label a polymorphic reference as `type/id`
pub fn format_polymorphic(resource_type: &str, id: &str) -> String {
    match (resource_type.is_empty(), id.is_empty()) {
        (true, _) => id.to_owned(),
        (false, true) => resource_type.to_owned(),
        (false, false) => format!("{resource_type}/{id}"),
    }
}

/// Table cell for a boolean
pub fn format_bool(value: bool) -> String {
    let label = if value { "yes" } else { "no" };
    label.to_owned()
}

/// Render an attribute of unknown type. Strings are trimmed and shown without
/// quotes, everything else as JSON
pub fn format_any(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_format_table() {
        let table = format_table(
            &["ID", "NAME"],
            &[
                vec!["1".into(), "Alpha".into()],
                vec!["1234".into(), "B".into()],
            ],
        );
        assert_eq!(table, "ID    NAME\n1     Alpha\n1234  B\n");
    }

    #[test]
    fn test_detail_block() {
        let block = DetailBlock::new("7")
            .field("Name", "Grow revenue")
            .field("Description", "")
            .flag("Is Template", false)
            .section("Relationships")
            .field("Owner", format_related("Ada", "3"))
            .field("Project", "")
            .ids("Key Results", &["1".into(), "2".into()]);
        assert_eq!(
            block.to_string(),
            "ID: 7
Name: Grow revenue
Is Template: false

Relationships:
----------------------------------------
  Owner: Ada (3)
  Key Results: 1, 2
"
        );
    }

    #[test]
    fn test_detail_block_empty_section() {
        let block = DetailBlock::new("7")
            .section("Relationships")
            .ids("Children", &[]);
        assert_eq!(block.to_string(), "ID: 7\n");
    }

    #[rstest]
    #[case::date("2024-03-01", "2024-03-01")]
    #[case::timestamp("2024-03-01T23:30:00-05:00", "2024-03-01")]
    #[case::blank("  ", "")]
    #[case::garbage("someday", "someday")]
    fn test_format_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_date(input), expected);
    }

    #[rstest]
    #[case::utc("2024-03-01T14:05:09Z", "2024-03-01 14:05")]
    #[case::offset("2024-03-01T14:05:09.123-07:00", "2024-03-01 14:05")]
    #[case::naive("2024-03-01T14:05:09", "2024-03-01 14:05")]
    #[case::garbage("later", "later")]
    fn test_format_date_time(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_date_time(input), expected);
    }

    #[rstest]
    #[case::short("abc", 5, "abc")]
    #[case::exact("abcde", 5, "abcde")]
    #[case::long("abcdefgh", 5, "ab...")]
    #[case::tiny("abcdefgh", 2, "ab")]
    #[case::multibyte("ééééééé", 6, "ééé...")]
    fn test_truncate(#[case] input: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate(input, max), expected);
    }

    #[rstest]
    #[case::both("Ada", "3", "Ada (3)")]
    #[case::name_only("Ada", "", "Ada")]
    #[case::id_only("", "3", "3")]
    fn test_format_related(#[case] name: &str, #[case] id: &str, #[case] expected: &str) {
        assert_eq!(format_related(name, id), expected);
    }

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(["", "  ", " Acme "]), "Acme");
        assert_eq!(first_non_empty(["", ""]), "");
    }

    #[rstest]
    #[case::absent(None, "")]
    #[case::string(Some(json!(" 42% ")), "42%")]
    #[case::number(Some(json!(0.5)), "0.5")]
    #[case::bool(Some(json!(true)), "true")]
    fn test_format_any(#[case] value: Option<Value>, #[case] expected: &str) {
        assert_eq!(format_any(value.as_ref()), expected);
    }

    #[rstest]
    #[case::keep(false, json!({"id": "1", "name": null, "tags": [{"a": ""}]}))]
    #[case::omit(true, json!({"id": "1", "tags": [{}]}))]
    fn test_to_json(#[case] omit_null: bool, #[case] expected: Value) {
        let value = json!({"id": "1", "name": null, "tags": [{"a": ""}]});
        let output = to_json(&value, omit_null).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&output).unwrap(), expected);
    }
}
