use crate::jsonapi::Identifier;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Builder for the body of a create (`POST`) or update (`PATCH`) request.
/// Only the attributes and relationships that are explicitly set end up in
/// the body, so an update never clobbers fields the user didn't mention.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceBody {
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    attributes: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    relationships: IndexMap<String, Linkage>,
}

/// Relationship linkage in a request body. Unlike response linkage, `null`
/// is always serialized because it means "clear this relationship"
#[derive(Clone, Debug, PartialEq, Serialize)]
struct Linkage {
    data: Option<Identifier>,
}

/// Top-level wrapper, `{"data": ...}`
#[derive(Serialize)]
struct Envelope<'a> {
    data: &'a ResourceBody,
}

impl ResourceBody {
    /// Start a body for creating a new resource. The server assigns the ID
    pub fn create(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
        }
    }

    /// Start a body for updating an existing resource
    pub fn update(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::create(resource_type)
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// Set an attribute only if a value was given
    #[must_use]
    pub fn attribute_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attribute(key, value),
            None => self,
        }
    }

    /// Link a to-one relationship
    #[must_use]
    pub fn to_one(
        mut self,
        name: &str,
        resource_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.relationships.insert(
            name.to_owned(),
            Linkage {
                data: Some(Identifier::new(resource_type, id)),
            },
        );
        self
    }

    /// Link a to-one relationship only if an ID was given
    #[must_use]
    pub fn to_one_opt(
        self,
        name: &str,
        resource_type: impl Into<String>,
        id: Option<impl Into<String>>,
    ) -> Self {
        match id {
            Some(id) => self.to_one(name, resource_type, id),
            None => self,
        }
    }

    /// Explicitly unlink a to-one relationship (`"data": null`)
    #[must_use]
    pub fn clear_to_one(mut self, name: &str) -> Self {
        self.relationships
            .insert(name.to_owned(), Linkage { data: None });
        self
    }

    /// Does this body set anything? An update with no changes should be
    /// rejected before it's sent
    pub fn has_changes(&self) -> bool {
        !self.attributes.is_empty() || !self.relationships.is_empty()
    }

    /// Serialize to the full request document
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&Envelope { data: self })
    }
}
