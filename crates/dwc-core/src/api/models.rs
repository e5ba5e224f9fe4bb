use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One gateway record: field key to value, in the order the gateway sent them.
pub type Record = serde_json::Map<String, Value>;

/// A window of query results as returned by the `records` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultPage {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<Record>,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Response of the gateway root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySummary {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "numRecords")]
    pub num_records: u64,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<String>,
    #[serde(rename = "currentTime", default)]
    pub current_time: Option<String>,
}

/// Response of `fields/<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub distinct: Option<u64>,
    #[serde(default)]
    pub stored: Option<bool>,
}

/// One entry of `fields/<name>/values`, sent on the wire as `[value, count]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValueCount(pub Value, pub u64);

impl FieldValueCount {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn count(&self) -> u64 {
        self.1
    }
}

/// Metadata the gateway publishes for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldMeta {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// Ordered field metadata from the `fields` endpoint.
///
/// Older gateways answer with a bare list of keys, newer ones with a mapping
/// of key to metadata; both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    pub fields: IndexMap<String, FieldMeta>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogShape {
    Keys(Vec<String>),
    Map(IndexMap<String, Option<FieldMeta>>),
}

impl<'de> Deserialize<'de> for FieldCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = match CatalogShape::deserialize(deserializer)? {
            CatalogShape::Keys(keys) => keys
                .into_iter()
                .map(|k| (k, FieldMeta::default()))
                .collect(),
            CatalogShape::Map(map) => map
                .into_iter()
                .map(|(k, meta)| (k, meta.unwrap_or_default()))
                .collect(),
        };
        Ok(FieldCatalog { fields })
    }
}

impl FieldCatalog {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Label for `key`, falling back to the key itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.fields
            .get(key)
            .and_then(|m| m.label.as_deref())
            .unwrap_or(key)
    }
}

impl FromIterator<(String, FieldMeta)> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = (String, FieldMeta)>>(iter: I) -> Self {
        FieldCatalog {
            fields: iter.into_iter().collect(),
        }
    }
}
