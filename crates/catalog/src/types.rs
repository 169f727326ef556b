//! Domain types for the service catalog.
//!
//! Field names follow the catalog's GraphQL schema (camelCase on the wire),
//! so a transport backend can deserialize responses straight into these.

use serde::{Deserialize, Serialize};

/// A weak reference to another entity, by id and alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Opaque id of the referenced entity
    #[serde(default)]
    pub id: String,
    /// Human-friendly alias of the referenced entity
    #[serde(default)]
    pub alias: String,
}

impl EntityRef {
    /// Create a reference from an id and alias
    pub fn new(id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias: alias.into(),
        }
    }
}

/// A paginated GraphQL connection, reduced to its nodes.
///
/// A missing `nodes` field is an empty list, whatever the node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Connection<T> {
    fn from(nodes: Vec<T>) -> Self {
        Self { nodes }
    }
}

/// A key/value tag owned by exactly one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub key: String,
    pub value: String,
}

/// A service in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub tier: Option<EntityRef>,
    #[serde(default)]
    pub owner: Option<EntityRef>,
    #[serde(default)]
    pub lifecycle: Option<EntityRef>,
    #[serde(default)]
    pub tags: Connection<Tag>,
}

impl Service {
    /// The first alias, used when naming the service in messages
    pub fn display_alias(&self) -> &str {
        self.aliases.first().map_or(self.name.as_str(), String::as_str)
    }

    /// Find one of this service's tags by id
    pub fn tag(&self, tag_id: &str) -> Option<&Tag> {
        self.tags.nodes.iter().find(|t| t.id == tag_id)
    }
}

/// A group in the organization hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<EntityRef>,
}

/// A user, as listed among a group's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A team, as listed among a group's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub alias: String,
    pub name: String,
}

/// A rubric category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A saved service filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    pub name: String,
}

/// A lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub id: String,
    pub alias: String,
    pub name: String,
    pub index: i32,
}

/// A service tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub alias: String,
    pub name: String,
    pub index: i32,
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// Input for creating a tag on a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreateInput {
    /// Id of the owning service
    #[serde(rename = "id")]
    pub owner_id: String,
    pub key: String,
    pub value: String,
}

/// Sparse input for updating a tag; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TagUpdateInput {
    /// Whether the patch carries no field changes
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.value.is_none()
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_alias: Option<String>,
}

/// Sparse input for updating a service; `None` fields are left untouched.
///
/// `Some("")` on a reference alias clears the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_alias: Option<String>,
}

impl ServiceUpdateInput {
    /// Whether the patch carries no field changes
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.product.is_none()
            && self.description.is_none()
            && self.language.is_none()
            && self.framework.is_none()
            && self.tier_alias.is_none()
            && self.owner_alias.is_none()
            && self.lifecycle_alias.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_deserializes_from_graphql_shape() {
        let json = r#"{
            "id": "Z2lkOi8vb3BzbGV2ZWwvU2VydmljZS8x",
            "aliases": ["payments"],
            "name": "Payments",
            "owner": {"id": "Z2lkOi8vb3BzbGV2ZWwvVGVhbS8x", "alias": "platform"},
            "tags": {"nodes": [{"id": "t1", "key": "env", "value": "prod"}]}
        }"#;

        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.display_alias(), "payments");
        assert_eq!(service.owner.unwrap().alias, "platform");
        assert!(service.tier.is_none());
        assert_eq!(service.tags.nodes.len(), 1);
        assert_eq!(service.language, "");
    }

    #[test]
    fn test_service_without_tags_or_nodes() {
        let bare: Service = serde_json::from_str(r#"{"id": "s1", "name": "Bare"}"#).unwrap();
        assert!(bare.tags.nodes.is_empty());

        let empty: Service =
            serde_json::from_str(r#"{"id": "s2", "name": "Empty", "tags": {}}"#).unwrap();
        assert!(empty.tags.nodes.is_empty());
    }

    #[test]
    fn test_connection_of_non_default_nodes() {
        let teams: Connection<Team> = serde_json::from_str("{}").unwrap();
        assert!(teams.nodes.is_empty());
    }

    #[test]
    fn test_tag_update_input_omits_unset_fields() {
        let input = TagUpdateInput {
            id: "t1".into(),
            key: None,
            value: Some("staging".into()),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"id": "t1", "value": "staging"}));
        assert!(!input.is_empty());
    }

    #[test]
    fn test_tag_create_input_wire_names() {
        let input = TagCreateInput {
            owner_id: "svc".into(),
            key: "env".into(),
            value: "prod".into(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["id"], "svc");
    }

    #[test]
    fn test_service_update_input_camel_case() {
        let input = ServiceUpdateInput {
            id: "s1".into(),
            owner_alias: Some("platform".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "s1", "ownerAlias": "platform"})
        );
    }

    #[test]
    fn test_display_alias_falls_back_to_name() {
        let service = Service {
            name: "Billing".into(),
            ..Default::default()
        };
        assert_eq!(service.display_alias(), "Billing");
    }
}
