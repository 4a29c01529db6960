use derive_more::{Deref, From};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A JSON:API top-level document. `D` is the shape of the primary data:
/// [Resource] for a single-resource response, `Vec<Resource>` for a
/// collection. The `data` key is required in both forms; a document without
/// it fails to decode. An explicit `null` decodes to the empty value: a
/// default resource or an empty collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "D: Default + Deserialize<'de>"))]
pub struct Document<D> {
    #[serde(deserialize_with = "null_as_default")]
    pub data: D,
    /// Side-loaded resources, requested via the `include` query param
    #[serde(default, deserialize_with = "null_as_default")]
    pub included: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// A single resource object. `(type, id)` is the only identity a resource
/// has.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Relationships,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Reference to a resource by identity, as found in relationship linkage
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl Identifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Attribute map of a resource. Keys are kebab-case, values are whatever
/// JSON the server sent. All accessors are total: an absent key, a null, or
/// a value of the wrong type produces the zero value of the requested type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Deref, From)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, Value>);

impl Attributes {
    /// Get a string attribute. Non-strings (including numbers) are blank
    pub fn string(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Get a boolean attribute. Accepts JSON booleans and the strings
    /// `"true"`/`"false"` (case-insensitive)
    pub fn bool(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Get an integer attribute. Accepts integers, floats (truncated toward
    /// zero), and numeric strings. A string with a fractional part is only
    /// accepted if the fraction is zero
    pub fn int(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncated))
                .unwrap_or_default(),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
                    .unwrap_or_default()
            }
            _ => 0,
        }
    }

    /// Get a float attribute. Accepts any number and numeric strings
    pub fn float(&self, key: &str) -> f64 {
        match self.0.get(key) {
            Some(Value::Number(number)) => number.as_f64().unwrap_or_default(),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or_default(),
            _ => 0.0,
        }
    }

    /// Get the string elements of an array attribute. Non-string elements are
    /// skipped; a non-array is an empty list
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Get an attribute of any type. `None` if absent or null
    pub fn any(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }
}

/// Relationship map of a resource, keyed by relationship name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Deref, From)]
#[serde(transparent)]
pub struct Relationships(IndexMap<String, Relationship>);

impl Relationships {
    /// Get the target of a to-one relationship. `None` if the relationship is
    /// absent, empty, or to-many
    pub fn to_one(&self, name: &str) -> Option<&Identifier> {
        self.0.get(name)?.to_one()
    }

    /// Get the ID of a to-one relationship, or an empty string
    pub fn id(&self, name: &str) -> String {
        self.to_one(name)
            .map(|identifier| identifier.id.clone())
            .unwrap_or_default()
    }

    /// Get the IDs of a relationship, in server order. Empty if absent
    pub fn ids(&self, name: &str) -> Vec<String> {
        self.0.get(name).map(Relationship::ids).unwrap_or_default()
    }
}

/// A single named relationship. Only resource linkage (`data`) is
/// interpreted; `links` and `meta` pass through
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// `None` covers both an absent `data` key and an explicit null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl Relationship {
    /// Get the linked resource if this is a to-one relationship
    pub fn to_one(&self) -> Option<&Identifier> {
        match &self.data {
            Some(RelationshipData::One(identifier)) => Some(identifier),
            Some(RelationshipData::Many(_)) | None => None,
        }
    }

    /// Get all linked IDs. A to-one relationship yields a single ID
    pub fn ids(&self) -> Vec<String> {
        match &self.data {
            Some(RelationshipData::One(identifier)) => {
                vec![identifier.id.clone()]
            }
            Some(RelationshipData::Many(identifiers)) => identifiers
                .iter()
                .map(|identifier| identifier.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Resource linkage: one identifier or an ordered list of them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(Identifier),
    Many(Vec<Identifier>),
}

/// Truncate a float toward zero, if it's finite and fits
fn truncated(f: f64) -> Option<i64> {
    (f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then_some(f.trunc() as i64)
}

/// Convert a float to an integer only if it has no fractional part and fits
fn integral(f: f64) -> Option<i64> {
    (f.is_finite()
        && f.fract() == 0.0
        && f >= i64::MIN as f64
        && f <= i64::MAX as f64)
        .then_some(f as i64)
}

/// Deserialize an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
