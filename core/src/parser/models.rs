//! # Data Models
//!
//! The already parsed API interface description: info properties, service
//! groups with routes, and named record types.

use crate::oas::models::ParameterIn;
use crate::parser::attributes::{parse_tags, Tag};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Free-form string properties (`info`, annotations, `@doc` blocks).
pub type Properties = IndexMap<String, String>;

/// All record types of a description, by name.
pub type TypeTable = IndexMap<String, RecordType>;

/// The marker that flags a type or member as deprecated in its doc lines.
pub const DEPRECATED_MARKER: &str = "Deprecated:";

/// A complete interface description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSpec {
    /// Document level properties (`title`, `version`, `servers`, ...).
    pub info: Properties,
    /// The service and its route groups.
    pub service: Service,
    /// Named record types.
    pub types: Vec<RecordType>,
}

impl ApiSpec {
    /// Indexes the record types by name. Later duplicates win.
    pub fn type_table(&self) -> TypeTable {
        self.types
            .iter()
            .map(|t| (t.name.clone(), t.clone()))
            .collect()
    }

    /// Reads an unquoted info property.
    pub fn property(&self, key: &str) -> Option<String> {
        property(&self.info, key)
    }
}

/// A service: a name and its route groups.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Service name, used as the default operation tag.
    pub name: String,
    /// Route groups.
    pub groups: Vec<Group>,
}

/// A group of routes sharing annotations (`group`, `prefix`, `jwt`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    /// Group annotations.
    pub annotation: Properties,
    /// Routes of the group.
    pub routes: Vec<Route>,
}

impl Group {
    /// Reads a non-empty annotation value.
    pub fn annotation(&self, key: &str) -> Option<String> {
        property(&self.annotation, key)
    }
}

/// A single route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    /// HTTP method, any case.
    pub method: String,
    /// Route path, with `:name` path variables.
    pub path: String,
    /// Handler name, used as the operation id.
    pub handler: String,
    /// Request record type name.
    pub request_type: Option<String>,
    /// Response type descriptor.
    pub response_type: Option<String>,
    /// Doc lines.
    pub docs: Vec<String>,
    /// The `@doc` block.
    pub at_doc: AtDoc,
}

impl Route {
    /// The request type, if one is declared.
    pub fn request_type(&self) -> Option<&str> {
        non_empty(self.request_type.as_deref())
    }

    /// The response type, if one is declared.
    pub fn response_type(&self) -> Option<&str> {
        non_empty(self.response_type.as_deref())
    }
}

/// The `@doc` block of a route: free text plus properties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtDoc {
    /// Free text (`@doc "..."`).
    pub text: String,
    /// Properties (`summary`, `description`, `tags`, `externalDocs`).
    pub properties: Properties,
}

impl AtDoc {
    /// Reads an unquoted property.
    pub fn property(&self, key: &str) -> Option<String> {
        property(&self.properties, key)
    }
}

/// A named record type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordType {
    /// Type name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Doc lines.
    pub docs: Vec<String>,
}

impl RecordType {
    /// Creates an empty record type.
    pub fn new(name: impl Into<String>) -> Self {
        RecordType {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a member.
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Appends a doc line.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    /// Doc lines joined with spaces, `None` when there are none.
    pub fn description(&self) -> Option<String> {
        join_docs(&self.docs)
    }

    /// Whether a doc line starts with `Deprecated:`.
    pub fn is_deprecated(&self) -> bool {
        check_deprecated(&self.docs)
    }
}

/// A member of a record type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    /// Declared name; empty for embedded members.
    pub name: String,
    /// Type descriptor.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declaration tags, parsed from the raw tag string.
    #[serde(rename = "tag", deserialize_with = "deserialize_tags")]
    pub tags: Vec<Tag>,
    /// Doc lines.
    pub docs: Vec<String>,
    /// Trailing comment.
    pub comment: String,
}

impl Member {
    /// Creates a named member.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    /// Creates an embedded (anonymous) member of the given record type.
    pub fn embedded(ty: impl Into<String>) -> Self {
        Member::new("", ty)
    }

    /// Appends the tags parsed from a raw tag string.
    pub fn tag(mut self, raw: &str) -> Self {
        self.tags.extend(parse_tags(raw));
        self
    }

    /// Appends a doc line.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    /// Sets the trailing comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Whether the member is embedded.
    pub fn is_anonymous(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// The output name: the first transport tag's name, unless it is empty
    /// or `-`, else the declared identifier.
    pub fn field_name(&self) -> String {
        self.tags
            .iter()
            .find(|t| t.key.is_transport())
            .map(|t| t.name.as_str())
            .filter(|n| !n.is_empty() && *n != "-")
            .unwrap_or(self.name.as_str())
            .to_string()
    }

    /// The location selected by the first location tag; `None` means body.
    pub fn location(&self) -> Option<ParameterIn> {
        self.tags.iter().find_map(|t| t.key.location())
    }

    /// The explicit comment, else the doc lines joined with spaces.
    pub fn description(&self) -> Option<String> {
        match self.comment.trim() {
            "" => join_docs(&self.docs),
            comment => Some(comment.to_string()),
        }
    }

    /// Whether a doc line starts with `Deprecated:`.
    pub fn is_deprecated(&self) -> bool {
        check_deprecated(&self.docs)
    }
}

/// Whether any doc line starts with the `Deprecated:` marker.
pub fn check_deprecated(docs: &[String]) -> bool {
    docs.iter()
        .any(|d| d.trim_start().starts_with(DEPRECATED_MARKER))
}

fn join_docs(docs: &[String]) -> Option<String> {
    let joined = docs
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reads a property, stripping one level of double quotes.
///
/// Properties are often written as quoted literals (`title: "\"User API\""`).
pub(crate) fn property(properties: &Properties, key: &str) -> Option<String> {
    let raw = properties.get(key)?.trim();
    let value = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw[1..raw.len() - 1].to_string())
    } else {
        raw.to_string()
    };
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_tags).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_resolution() {
        let tagged = Member::new("UserId", "int64").tag(r#"json:"user_id""#);
        assert_eq!(tagged.field_name(), "user_id");

        let dashed = Member::new("Secret", "string").tag(r#"json:"-""#);
        assert_eq!(dashed.field_name(), "Secret");

        let untagged = Member::new("Plain", "string").tag(r#"validate:"required""#);
        assert_eq!(untagged.field_name(), "Plain");

        let header = Member::new("Token", "string").tag(r#"header:"Authorization""#);
        assert_eq!(header.field_name(), "Authorization");
    }

    #[test]
    fn test_location_uses_first_location_tag() {
        let m = Member::new("Id", "int").tag(r#"json:"id" path:"id" form:"id""#);
        assert_eq!(m.location(), Some(ParameterIn::Path));
        let body = Member::new("Name", "string").tag(r#"json:"name""#);
        assert_eq!(body.location(), None);
    }

    #[test]
    fn test_description_and_deprecation() {
        let m = Member::new("Age", "int")
            .doc("Age in years.")
            .doc("Deprecated: use birthday.");
        assert_eq!(
            m.description().as_deref(),
            Some("Age in years. Deprecated: use birthday.")
        );
        assert!(m.is_deprecated());

        let commented = Member::new("Age", "int").doc("ignored").comment("years");
        assert_eq!(commented.description().as_deref(), Some("years"));
        assert!(!commented.is_deprecated());
    }

    #[test]
    fn test_deserialize_spec_with_tags() {
        let yaml = r#"
info:
  title: '"User API"'
  version: "1.0"
service:
  name: user-api
  groups:
    - annotation: { group: user }
      routes:
        - method: get
          path: /users/:id
          handler: GetUser
          requestType: GetUserReq
types:
  - name: GetUserReq
    members:
      - name: Id
        type: int64
        tag: '`path:"id"`'
"#;
        let spec: ApiSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.property("title").as_deref(), Some("User API"));
        assert_eq!(spec.property("missing"), None);
        let table = spec.type_table();
        let member = &table["GetUserReq"].members[0];
        assert_eq!(member.field_name(), "id");
        assert_eq!(member.location(), Some(ParameterIn::Path));
        let route = &spec.service.groups[0].routes[0];
        assert_eq!(route.request_type(), Some("GetUserReq"));
        assert_eq!(route.response_type(), None);
        assert_eq!(spec.service.groups[0].annotation("group").as_deref(), Some("user"));
    }
}
