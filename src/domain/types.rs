//! Shared domain types.
//!
//! These mirror the JSON shapes of the partnerships API so they can be decoded
//! directly from responses, plus the normalized option types used by selection
//! controls.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Normalized `{id, label}` pair used for every selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueLabel {
    pub id: String,
    pub label: String,
}

impl ValueLabel {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// An option as it appears in a lookup list: either a bare string or an
/// already-normalized `{id, label}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedOption {
    Plain(String),
    Labeled(ValueLabel),
}

impl From<ValueLabel> for NamedOption {
    fn from(value: ValueLabel) -> Self {
        NamedOption::Labeled(value)
    }
}

impl From<&str> for NamedOption {
    fn from(value: &str) -> Self {
        NamedOption::Plain(value.to_string())
    }
}

/// One node of the server-provided configuration tree.
///
/// Lists in the configuration mix bare strings (cities, fundings) with records
/// (continents, countries, entities). Records may nest further lists under any
/// field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    Leaf(String),
    Record(ConfigRecord),
}

impl ConfigNode {
    pub fn leaf(value: impl Into<String>) -> Self {
        ConfigNode::Leaf(value.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ConfigNode::Leaf(_) => None,
            ConfigNode::Record(record) => record.name.as_deref(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ConfigNode::Leaf(_) => None,
            ConfigNode::Record(record) => record.label.as_deref(),
        }
    }

    pub fn iso_code(&self) -> Option<&str> {
        match self {
            ConfigNode::Leaf(_) => None,
            ConfigNode::Record(record) => record.iso_code.as_deref(),
        }
    }

    /// Nested list stored under `field`, if this node is a record holding one.
    pub fn children(&self, field: &str) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Leaf(_) => None,
            ConfigNode::Record(record) => record.children(field),
        }
    }
}

/// A configuration record with the well-known option keys pulled out.
///
/// `id`, `iso_code` and `value` may be numbers on the wire; they are kept as
/// strings here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, ConfigField>,
}

impl ConfigRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_iso_code(mut self, iso_code: impl Into<String>) -> Self {
        self.iso_code = Some(iso_code.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_children(mut self, field: impl Into<String>, nodes: Vec<ConfigNode>) -> Self {
        self.fields.insert(field.into(), ConfigField::Nodes(nodes));
        self
    }

    pub fn children(&self, field: &str) -> Option<&[ConfigNode]> {
        match self.fields.get(field)? {
            ConfigField::Nodes(nodes) => Some(nodes),
            ConfigField::Other(_) => None,
        }
    }
}

impl From<ConfigRecord> for ConfigNode {
    fn from(record: ConfigRecord) -> Self {
        ConfigNode::Record(record)
    }
}

/// Any non-option field of a configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigField {
    Nodes(Vec<ConfigNode>),
    Other(serde_json::Value),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Reference data served by the configuration endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub continents: Vec<ConfigNode>,
    #[serde(default)]
    pub fundings: Vec<String>,
    #[serde(default)]
    pub education_fields: Vec<ConfigNode>,
    #[serde(default)]
    pub partners: Vec<ConfigNode>,
    #[serde(default)]
    pub ucl_universities: Vec<ConfigNode>,
}

/// A partner institution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub erasmus_code: Option<String>,
    #[serde(default)]
    pub partner_type: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Mobility indicator flags of a partnership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilityFlags {
    /// Student mobility for studies.
    #[serde(default)]
    pub is_sms: bool,
    /// Student mobility for training.
    #[serde(default)]
    pub is_smp: bool,
    /// Short-term student mobility.
    #[serde(default)]
    pub is_smst: bool,
    /// Staff mobility for teaching.
    #[serde(default)]
    pub is_sta: bool,
    /// Staff mobility for training.
    #[serde(default)]
    pub is_stt: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipStatus {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub last_valid: bool,
}

/// A person to contact about one side of a partnership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    /// `title first last`, skipping missing parts.
    pub fn full_name(&self) -> String {
        [&self.title, &self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Funding programme attached to a mobility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A partnership between a UCL entity and a partner institution.
///
/// `out_*` fields describe outgoing student mobility, `in_*` incoming
/// mobility and `staff_*` staff mobility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    #[serde(default)]
    pub partner: Partner,
    #[serde(default)]
    pub education_field: Option<String>,
    #[serde(default)]
    pub ucl_university: Option<String>,
    #[serde(default)]
    pub ucl_university_labo: Option<String>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub status: Option<PartnershipStatus>,
    #[serde(flatten)]
    pub mobility: MobilityFlags,

    #[serde(default)]
    pub out_education_level: Option<String>,
    #[serde(default)]
    pub out_entity: Option<String>,
    #[serde(default)]
    pub out_university_offer: Option<String>,
    #[serde(default)]
    pub out_contact: Option<Contact>,
    #[serde(default)]
    pub out_portal: Option<String>,
    #[serde(default)]
    pub out_funding: Option<Funding>,
    #[serde(default)]
    pub out_partner_contact: Option<Contact>,

    #[serde(default)]
    pub in_contact: Option<Contact>,
    #[serde(default)]
    pub in_portal: Option<String>,

    #[serde(default)]
    pub staff_contact_name: Option<String>,
    /// UCL-side staff contact.
    #[serde(default, rename = "UCL")]
    pub ucl_contact: Option<Contact>,
    #[serde(default)]
    pub staff_partner_contact: Option<Contact>,
    #[serde(default)]
    pub staff_funding: Option<Funding>,
}

impl Partnership {
    /// Human-readable mobility classification, computed on demand.
    pub fn mobility_type(&self) -> String {
        crate::mobility::mobility_type(&self.mobility)
    }
}

/// Paginated response envelope of the search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
