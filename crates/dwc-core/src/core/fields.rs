//! Field (column) configuration for the records table.

use crate::error::TableError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weight given to fields without an explicit one, so they sort last.
pub const DEFAULT_DISPLAY_WEIGHT: i64 = 10_000;
/// Spacing between renumbered weights.
pub const WEIGHT_STEP: i64 = 10;

/// Configuration of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_displayed")]
    pub displayed: bool,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, rename = "weight", skip_serializing_if = "Option::is_none")]
    pub display_weight: Option<i64>,
    /// Cells of this field report activation to the embedding application.
    #[serde(default)]
    pub clickable: bool,
}

fn default_displayed() -> bool {
    true
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>) -> Self {
        FieldDescriptor {
            key: key.into(),
            label: None,
            displayed: true,
            default_value: None,
            display_weight: None,
            clickable: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.display_weight = Some(weight);
        self
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Overlay the settings present in `other`; anything `other` leaves unset
    /// keeps its current value.
    pub fn merge(&mut self, other: FieldDescriptor) {
        if other.label.is_some() {
            self.label = other.label;
        }
        if other.default_value.is_some() {
            self.default_value = other.default_value;
        }
        if other.display_weight.is_some() {
            self.display_weight = other.display_weight;
        }
        self.clickable |= other.clickable;
        self.displayed = other.displayed;
    }
}

/// The fields a table knows about, in configuration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldDescriptor>,
}

impl FieldSet {
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Result<Self, TableError> {
        let mut fields = IndexMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if fields.contains_key(&descriptor.key) {
                return Err(TableError::DuplicateField(descriptor.key));
            }
            fields.insert(descriptor.key.clone(), descriptor);
        }
        Ok(FieldSet { fields })
    }

    /// The columns shown by default: id, species, longitude, latitude.
    pub fn darwin_core_defaults() -> Self {
        let fields = [
            FieldDescriptor::new("id").with_label("ID"),
            FieldDescriptor::new("sciName_s").with_label("Species"),
            FieldDescriptor::new("lng").with_label("Longitude"),
            FieldDescriptor::new("lat").with_label("Latitude"),
        ]
        .into_iter()
        .map(|f| (f.key.clone(), f))
        .collect();
        FieldSet { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.get(key)
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

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn is_displayed(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|f| f.displayed)
    }

    /// Displayed fields in configuration order.
    pub fn displayed(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values().filter(|f| f.displayed)
    }

    /// Displayed fields in column order (resolved display weight, ties kept
    /// in configuration order).
    pub fn display_order(&self) -> Vec<&FieldDescriptor> {
        let weights = resolve_display_weights(self);
        let mut ordered: Vec<_> = self.displayed().collect();
        ordered.sort_by_key(|f| weights.get(&f.key).copied().unwrap_or(DEFAULT_DISPLAY_WEIGHT));
        ordered
    }

    /// Merge `descriptor` into an existing entry, or append it.
    pub fn upsert(&mut self, descriptor: FieldDescriptor) {
        match self.fields.get_mut(&descriptor.key) {
            Some(existing) => existing.merge(descriptor),
            None => {
                self.fields.insert(descriptor.key.clone(), descriptor);
            }
        }
    }

    pub fn set_displayed(&mut self, key: &str, displayed: bool) -> Result<(), TableError> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| TableError::UnknownField(key.to_string()))?;
        field.displayed = displayed;
        Ok(())
    }

    /// Write the resolved weights back so later insertions can slot between.
    pub fn normalize_weights(&mut self) {
        let weights = resolve_display_weights(self);
        for (key, weight) in weights {
            if let Some(field) = self.fields.get_mut(&key) {
                field.display_weight = Some(weight);
            }
        }
    }
}

/// Comma-joined keys of the displayed fields, in configuration order.
pub fn build_fields_parameter(fields: &FieldSet) -> String {
    fields
        .displayed()
        .map(|f| f.key.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Effective weight of every field, in ascending order.
///
/// Fields take their explicit weight or [`DEFAULT_DISPLAY_WEIGHT`]. A weight
/// already taken by an earlier field is bumped to the next free integer. The
/// result is then renumbered `10, 20, 30, ...`.
pub fn resolve_display_weights(fields: &FieldSet) -> IndexMap<String, i64> {
    let mut taken = std::collections::HashSet::new();
    let mut weighted: Vec<(&str, i64)> = Vec::with_capacity(fields.len());

    for field in fields.iter() {
        let mut weight = field.display_weight.unwrap_or(DEFAULT_DISPLAY_WEIGHT);
        while !taken.insert(weight) {
            weight += 1;
        }
        weighted.push((field.key.as_str(), weight));
    }

    weighted.sort_by_key(|(_, weight)| *weight);
    weighted
        .into_iter()
        .enumerate()
        .map(|(i, (key, _))| (key.to_string(), (i as i64 + 1) * WEIGHT_STEP))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(fields: &[&FieldDescriptor]) -> Vec<String> {
        fields.iter().map(|f| f.key.clone()).collect()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = FieldSet::new(vec![FieldDescriptor::new("id"), FieldDescriptor::new("id")]);
        assert_eq!(result, Err(TableError::DuplicateField("id".to_string())));
    }

    #[test]
    fn test_label_falls_back_to_key() {
        assert_eq!(FieldDescriptor::new("lat").label(), "lat");
        assert_eq!(FieldDescriptor::new("lat").with_label("Latitude").label(), "Latitude");
    }

    #[test]
    fn test_build_fields_parameter_skips_hidden() {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new("id"),
            FieldDescriptor::new("genus_s").hidden(),
            FieldDescriptor::new("lat").with_weight(1),
            FieldDescriptor::new("lng"),
        ])
        .unwrap();
        // Configuration order, not display order.
        assert_eq!(build_fields_parameter(&fields), "id,lat,lng");
    }

    #[test]
    fn test_build_fields_parameter_empty() {
        let fields = FieldSet::new(vec![FieldDescriptor::new("id").hidden()]).unwrap();
        assert_eq!(build_fields_parameter(&fields), "");
    }

    #[test]
    fn test_resolve_weights_unweighted_last() {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new("id"),
            FieldDescriptor::new("lat").with_weight(5),
            FieldDescriptor::new("lng").with_weight(3),
        ])
        .unwrap();
        let weights = resolve_display_weights(&fields);
        assert_eq!(weights.keys().collect::<Vec<_>>(), vec!["lng", "lat", "id"]);
        assert_eq!(weights.values().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    fn test_resolve_weights_collisions() {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new("a").with_weight(2),
            FieldDescriptor::new("b").with_weight(2),
            FieldDescriptor::new("c").with_weight(3),
            FieldDescriptor::new("d"),
            FieldDescriptor::new("e"),
        ])
        .unwrap();
        // b bumps to 3, c bumps to 4; d and e keep configuration order.
        let weights = resolve_display_weights(&fields);
        assert_eq!(weights.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_display_order_and_normalize() {
        let mut fields = FieldSet::new(vec![
            FieldDescriptor::new("id"),
            FieldDescriptor::new("sciName_s").with_weight(1),
            FieldDescriptor::new("lat").hidden().with_weight(2),
        ])
        .unwrap();
        assert_eq!(keys(&fields.display_order()), vec!["sciName_s", "id"]);

        fields.normalize_weights();
        assert_eq!(fields.get("sciName_s").unwrap().display_weight, Some(10));
        assert_eq!(fields.get("lat").unwrap().display_weight, Some(20));
        assert_eq!(fields.get("id").unwrap().display_weight, Some(30));

        // A new field can now slot between existing columns.
        fields.upsert(FieldDescriptor::new("lng").with_weight(15));
        fields.set_displayed("lat", true).unwrap();
        assert_eq!(keys(&fields.display_order()), vec!["sciName_s", "lng", "lat", "id"]);
    }

    #[test]
    fn test_merge_keeps_unset_settings() {
        let mut fields = FieldSet::new(vec![
            FieldDescriptor::new("lat")
                .with_label("Latitude")
                .with_default(json!(0))
                .clickable(),
        ])
        .unwrap();
        fields.set_displayed("lat", false).unwrap();
        fields.upsert(FieldDescriptor::new("lat"));

        let lat = fields.get("lat").unwrap();
        assert!(lat.displayed);
        assert_eq!(lat.label(), "Latitude");
        assert_eq!(lat.default_value, Some(json!(0)));
        assert!(lat.clickable);
    }

    #[test]
    fn test_set_displayed_unknown_field() {
        let mut fields = FieldSet::darwin_core_defaults();
        assert_eq!(
            fields.set_displayed("nope", false),
            Err(TableError::UnknownField("nope".to_string()))
        );
        assert_eq!(build_fields_parameter(&fields), "id,sciName_s,lng,lat");
    }

    #[test]
    fn test_descriptor_from_toml() {
        let field: FieldDescriptor = toml::from_str(
            r#"
            key = "sciName_s"
            label = "Species"
            default = "unknown"
            weight = 20
            "#,
        )
        .unwrap();
        assert!(field.displayed);
        assert_eq!(field.default_value, Some(json!("unknown")));
        assert_eq!(field.display_weight, Some(20));
    }
}
