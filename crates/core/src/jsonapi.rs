//! JSON:API document model. Every response is decoded into a generic
//! [Document], whose primary data is either a single [Resource] or a list of
//! them. Consumers read fields through the total accessors on [Attributes]
//! and [Relationships], and resolve related resources through [Included].
//! A field that is missing, null, or of an unexpected type degrades to a
//! blank value rather than an error.

mod body;
mod models;

pub use body::*;
pub use models::*;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

/// Media type for JSON:API requests and responses
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Key for a resource in the `included` index
pub fn resource_key(resource_type: &str, id: &str) -> String {
    format!("{resource_type}|{id}")
}

/// Response body isn't a JSON:API document. This covers invalid JSON as well
/// as valid JSON without a `data` member
#[derive(Debug, Error)]
#[error("Error decoding JSON:API document")]
pub struct DecodeError(#[from] serde_json::Error);

impl<D: DeserializeOwned + Default> Document<D> {
    /// Decode a document from a response body
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl<D> Document<D> {
    /// Build an index over the side-loaded resources
    pub fn included(&self) -> Included<'_> {
        Included::new(&self.included)
    }
}

/// Lookup table over a document's `included` array, keyed by
/// [resource_key]. If the server sends the same resource twice, the last one
/// wins.
#[derive(Debug, Default)]
pub struct Included<'a>(HashMap<String, &'a Resource>);

impl<'a> Included<'a> {
    pub fn new(resources: &'a [Resource]) -> Self {
        Self(
            resources
                .iter()
                .map(|resource| {
                    (resource_key(&resource.resource_type, &resource.id), resource)
                })
                .collect(),
        )
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&'a Resource> {
        self.0.get(&resource_key(resource_type, id)).copied()
    }

    pub fn resolve(&self, identifier: &Identifier) -> Option<&'a Resource> {
        self.get(&identifier.resource_type, &identifier.id)
    }

    /// Follow a to-one relationship of a resource into the included set
    pub fn related(
        &self,
        resource: &Resource,
        relationship: &str,
    ) -> Option<&'a Resource> {
        self.resolve(resource.relationships.to_one(relationship)?)
    }
}

/// A to-one relationship flattened for display: the linked identity plus a
/// human-readable name pulled from the included resource. Anything that
/// can't be resolved is left blank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Related {
    pub id: String,
    pub resource_type: String,
    pub name: String,
}

impl Related {
    /// Resolve a relationship. `name_attributes` are tried in order against
    /// the included resource and the first non-blank string (trimmed) is the
    /// name
    pub fn resolve(
        resource: &Resource,
        included: &Included,
        relationship: &str,
        name_attributes: &[&str],
    ) -> Self {
        let Some(identifier) = resource.relationships.to_one(relationship) else {
            return Self::default();
        };
        let name = included
            .resolve(identifier)
            .and_then(|related| {
                name_attributes
                    .iter()
                    .map(|attribute| {
                        related.attributes.string(attribute).trim().to_owned()
                    })
                    .find(|name| !name.is_empty())
            })
            .unwrap_or_default();
        Self {
            id: identifier.id.clone(),
            resource_type: identifier.resource_type.clone(),
            name,
        }
    }
}
