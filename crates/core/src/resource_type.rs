//! Resource type names. The API speaks in plural kebab-case JSON:API types
//! (`glossary-terms`), while polymorphic filters and `Type|ID` references use
//! class names (`GlossaryTerm`). Users type whatever they like. Every
//! conversion between these goes through the alias table here.

use crate::jsonapi::Identifier;
use std::fmt::{self, Display};
use thiserror::Error;
use xbe_util::Mapping;

/// A resource type known to the CLI
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Answer,
    AnswerRelatedContent,
    Broker,
    BusinessUnit,
    Customer,
    Developer,
    Feature,
    GlossaryTerm,
    KeyResult,
    MaterialSite,
    MaterialSupplier,
    Membership,
    Newsletter,
    Objective,
    Post,
    PressRelease,
    Project,
    ProjectOffice,
    Question,
    ReleaseNote,
    Tag,
    Tagging,
    Trucker,
    User,
}

/// Labels are `[JSON:API type, class name]`. Lookups compare labels with case
/// and separators ignored, so `glossary_term`, `Glossary-Terms` and
/// `glossaryterm` all land on the same row.
const KINDS: Mapping<ResourceKind> = Mapping::new(&[
    (ResourceKind::Answer, &["answers", "Answer"]),
    (
        ResourceKind::AnswerRelatedContent,
        &["answer-related-contents", "AnswerRelatedContent"],
    ),
    (ResourceKind::Broker, &["brokers", "Broker"]),
    (ResourceKind::BusinessUnit, &["business-units", "BusinessUnit"]),
    (ResourceKind::Customer, &["customers", "Customer"]),
    (ResourceKind::Developer, &["developers", "Developer"]),
    (ResourceKind::Feature, &["features", "Feature"]),
    (ResourceKind::GlossaryTerm, &["glossary-terms", "GlossaryTerm"]),
    (ResourceKind::KeyResult, &["key-results", "KeyResult"]),
    (ResourceKind::MaterialSite, &["material-sites", "MaterialSite"]),
    (
        ResourceKind::MaterialSupplier,
        &["material-suppliers", "MaterialSupplier"],
    ),
    (ResourceKind::Membership, &["memberships", "Membership"]),
    (ResourceKind::Newsletter, &["newsletters", "Newsletter"]),
    (ResourceKind::Objective, &["objectives", "Objective"]),
    (ResourceKind::Post, &["posts", "Post"]),
    (ResourceKind::PressRelease, &["press-releases", "PressRelease"]),
    (ResourceKind::Project, &["projects", "Project"]),
    (ResourceKind::ProjectOffice, &["project-offices", "ProjectOffice"]),
    (ResourceKind::Question, &["questions", "Question"]),
    (ResourceKind::ReleaseNote, &["release-notes", "ReleaseNote"]),
    (ResourceKind::Tag, &["tags", "Tag"]),
    (ResourceKind::Tagging, &["taggings", "Tagging"]),
    (ResourceKind::Trucker, &["truckers", "Trucker"]),
    (ResourceKind::User, &["users", "User"]),
]);

/// Organization types that own memberships
pub const ORGANIZATION_KINDS: &[ResourceKind] = &[
    ResourceKind::Broker,
    ResourceKind::Customer,
    ResourceKind::Trucker,
    ResourceKind::MaterialSupplier,
    ResourceKind::Developer,
];

impl ResourceKind {
    /// Find a kind by any spelling of its name
    pub fn parse(value: &str) -> Option<Self> {
        let key = compact(value);
        if key.is_empty() {
            return None;
        }
        KINDS.find(|label| compact(label) == key)
    }

    /// Every known kind, alphabetically by class name
    pub fn all() -> impl Iterator<Item = Self> {
        KINDS.values()
    }

    /// Plural kebab-case type, as used in JSON:API documents and endpoints
    pub fn json_type(self) -> &'static str {
        KINDS.get_label(self).unwrap_or_default()
    }

    /// Singular PascalCase name, as used in polymorphic filters
    pub fn class_name(self) -> &'static str {
        KINDS.labels(self).get(1).copied().unwrap_or_default()
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.json_type())
    }
}

/// Convert any spelling of a type to its JSON:API type. Unknown types are
/// converted by convention: `FooBar`/`foo_bar` become `foo-bars`.
pub fn json_type(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Some(kind) = ResourceKind::parse(value) {
        return kind.json_type().to_owned();
    }

    let kebab = kebab_case(value);
    if kebab.ends_with('s') {
        kebab
    } else {
        format!("{kebab}s")
    }
}

/// Convert any spelling of a type to its class name, for use in filters.
/// Unknown types that already contain an uppercase letter are assumed to be
/// class names and pass through. Otherwise `foo-bars` becomes `FooBar`.
pub fn class_name(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Some(kind) = ResourceKind::parse(value) {
        return kind.class_name().to_owned();
    }
    if value.chars().any(char::is_uppercase) {
        return value.to_owned();
    }

    let parts: Vec<&str> = value
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let part = if i == last && part.len() > 1 {
                part.strip_suffix('s').unwrap_or(part)
            } else {
                part
            };
            capitalize(&part.to_lowercase())
        })
        .collect()
}

/// Convert any spelling of a type to its singular kebab-case form, as used in
/// compound type names like `material-supplier-memberships`
pub fn singular_type(value: &str) -> String {
    kebab_case(&class_name(value))
}

/// A `Type|ID` reference couldn't be parsed
#[derive(Debug, Error)]
#[error("Invalid reference `{value}` (expected Type|ID, e.g. Broker|123)")]
pub struct ReferenceError {
    pub value: String,
}

/// Parse a polymorphic `Type|ID` reference into a JSON:API identifier. The
/// type may be spelled any way [json_type] accepts.
pub fn parse_reference(value: &str) -> Result<Identifier, ReferenceError> {
    let error = || ReferenceError {
        value: value.to_owned(),
    };
    let (resource_type, id) = value.split_once('|').ok_or_else(error)?;
    let (resource_type, id) = (resource_type.trim(), id.trim());
    if resource_type.is_empty() || id.is_empty() {
        return Err(error());
    }
    Ok(Identifier::new(json_type(resource_type), id))
}

/// Normalize a `Type|ID` filter value to `ClassName|ID`. Anything that isn't a
/// well-formed reference is passed through (trimmed) for the server to judge.
pub fn reference_filter(value: &str) -> String {
    let value = value.trim();
    match value.split_once('|') {
        Some((resource_type, id))
            if !resource_type.trim().is_empty() && !id.trim().is_empty() =>
        {
            format!("{}|{}", class_name(resource_type), id.trim())
        }
        _ => value.to_owned(),
    }
}

/// Lowercase and strip separators, for loose comparison
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// `FooBar` or `foo_bar` to `foo-bar`
fn kebab_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 4);
    for (i, c) in value.chars().enumerate() {
        if c == '_' || c == ' ' {
            output.push('-');
        } else if c.is_uppercase() {
            if i > 0 && !output.ends_with('-') {
                output.push('-');
            }
            output.extend(c.to_lowercase());
        } else {
            output.push(c);
        }
    }
    output
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xbe_util::assert_err;

    /// Every kind needs both labels, and its labels must round trip
    #[test]
    fn test_table_complete() {
        for kind in ResourceKind::all() {
            assert!(!kind.json_type().is_empty(), "{kind:?} has no type");
            assert!(!kind.class_name().is_empty(), "{kind:?} has no class");
            assert_eq!(ResourceKind::parse(kind.json_type()), Some(kind));
            assert_eq!(ResourceKind::parse(kind.class_name()), Some(kind));
        }
    }

    #[rstest]
    #[case::json_type("glossary-terms", Some(ResourceKind::GlossaryTerm))]
    #[case::singular_kebab("glossary-term", Some(ResourceKind::GlossaryTerm))]
    #[case::snake("glossary_terms", Some(ResourceKind::GlossaryTerm))]
    #[case::class_name("GlossaryTerm", Some(ResourceKind::GlossaryTerm))]
    #[case::shouting("GLOSSARY-TERMS", Some(ResourceKind::GlossaryTerm))]
    #[case::whitespace(" Broker ", Some(ResourceKind::Broker))]
    #[case::unknown("space-elevators", None)]
    #[case::empty("", None)]
    fn test_parse(#[case] value: &str, #[case] expected: Option<ResourceKind>) {
        assert_eq!(ResourceKind::parse(value), expected);
    }

    #[rstest]
    #[case::known_class("MaterialSupplier", "material-suppliers")]
    #[case::known_snake("material_supplier", "material-suppliers")]
    #[case::known_plural("brokers", "brokers")]
    #[case::unknown_class("SpaceElevator", "space-elevators")]
    #[case::unknown_snake("space_elevator", "space-elevators")]
    #[case::unknown_plural("space-elevators", "space-elevators")]
    #[case::empty("  ", "")]
    fn test_json_type(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(json_type(value), expected);
    }

    #[rstest]
    #[case::known_type("glossary-terms", "GlossaryTerm")]
    #[case::known_singular("key_result", "KeyResult")]
    #[case::unknown_plural("space-elevators", "SpaceElevator")]
    #[case::unknown_snake("space_elevator", "SpaceElevator")]
    #[case::unknown_class("SpaceElevator", "SpaceElevator")]
    #[case::short("s", "S")]
    #[case::empty("", "")]
    fn test_class_name(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(class_name(value), expected);
    }

    #[rstest]
    #[case::known_plural("material-suppliers", "material-supplier")]
    #[case::known_class("MaterialSupplier", "material-supplier")]
    #[case::known_single_word("brokers", "broker")]
    #[case::unknown_plural("space-elevators", "space-elevator")]
    #[case::empty("", "")]
    fn test_singular_type(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(singular_type(value), expected);
    }

    #[rstest]
    #[case::class("Broker|123", "brokers", "123")]
    #[case::json_type("material-suppliers|7", "material-suppliers", "7")]
    #[case::padded(" customer | 9 ", "customers", "9")]
    fn test_parse_reference(
        #[case] value: &str,
        #[case] expected_type: &str,
        #[case] expected_id: &str,
    ) {
        assert_eq!(
            parse_reference(value).unwrap(),
            Identifier::new(expected_type, expected_id)
        );
    }

    #[rstest]
    #[case::no_separator("Broker")]
    #[case::no_type("|123")]
    #[case::no_id("Broker| ")]
    fn test_parse_reference_error(#[case] value: &str) {
        assert_err!(parse_reference(value), "expected Type|ID");
    }

    #[rstest]
    #[case::json_type("brokers|1", "Broker|1")]
    #[case::snake("material_suppliers | 2", "MaterialSupplier|2")]
    #[case::unknown("space-elevators|3", "SpaceElevator|3")]
    #[case::malformed(" 42 ", "42")]
    fn test_reference_filter(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(reference_filter(value), expected);
    }
}
