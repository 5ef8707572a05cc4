//! Record types cached by the offline store.
//!
//! Reference records ([`Building`], [`InspectionTemplate`],
//! [`InterventionPlan`]) come from the server as JSON documents. Only the
//! fields the offline layer itself needs are modeled; everything else the
//! server sends is preserved verbatim in a flattened `extra` map so that
//! cached records round-trip without losing data when the backend adds
//! fields.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// A partition of the reference cache.
///
/// Each partition holds one collection of server records for the active
/// tenant. The string form is the storage key and is stable across versions.
///
/// # Examples
///
/// ```
/// use firehall_types::ReferencePartition;
///
/// assert_eq!(ReferencePartition::Buildings.as_str(), "buildings");
/// assert_eq!(
///     ReferencePartition::InspectionTemplates.to_string(),
///     "inspection_templates"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePartition {
    /// Buildings the department covers. Mandatory for offline readiness.
    Buildings,
    /// Inspection form templates. Mandatory for offline readiness.
    InspectionTemplates,
    /// Intervention plans. Optional; a snapshot succeeds without them.
    InterventionPlans,
}

impl ReferencePartition {
    /// All partitions, in snapshot-load order.
    pub const ALL: [ReferencePartition; 3] = [
        ReferencePartition::Buildings,
        ReferencePartition::InspectionTemplates,
        ReferencePartition::InterventionPlans,
    ];

    /// Storage key for this partition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReferencePartition::Buildings => "buildings",
            ReferencePartition::InspectionTemplates => "inspection_templates",
            ReferencePartition::InterventionPlans => "intervention_plans",
        }
    }

    /// Whether a snapshot must load this partition for the cache to be
    /// usable offline.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        !matches!(self, ReferencePartition::InterventionPlans)
    }
}

impl fmt::Display for ReferencePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server record type that lives in a fixed reference partition.
///
/// Implemented by [`Building`], [`InspectionTemplate`], and
/// [`InterventionPlan`]; the store uses it to key typed reads and writes so
/// a record type can only ever touch its own partition.
pub trait ReferenceRecord {
    /// The partition this record type is cached under.
    const PARTITION: ReferencePartition;

    /// Server-assigned identifier for this record.
    fn id(&self) -> &str;
}

/// Deserialize helpers for server ids, which arrive either as JSON strings
/// or as bare numbers depending on the endpoint. Ids are always stored and
/// re-serialized as strings.
mod id_string {
    use core::fmt;

    use serde::de::{self, Deserializer, Visitor};

    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }

    pub fn option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionVisitor;

        impl<'de> Visitor<'de> for OptionVisitor {
            type Value = Option<String>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer id, or null")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
            where
                D2: Deserializer<'de>,
            {
                deserialize(deserializer).map(Some)
            }
        }

        deserializer.deserialize_option(OptionVisitor)
    }
}

/// A building the department covers, as cached for offline inspections.
///
/// Only `id`, `name`, and `address` are interpreted locally; all other
/// server fields ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Building {
    /// Server-assigned building id.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub id: String,
    /// Display name, if the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Street address, if the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// All other server fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for Building {
    const PARTITION: ReferencePartition = ReferencePartition::Buildings;

    fn id(&self) -> &str {
        &self.id
    }
}

/// An inspection form template, as cached for offline use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InspectionTemplate {
    /// Server-assigned template id.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub id: String,
    /// Template name, if the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// All other server fields (sections, questions, ...), preserved
    /// verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for InspectionTemplate {
    const PARTITION: ReferencePartition = ReferencePartition::InspectionTemplates;

    fn id(&self) -> &str {
        &self.id
    }
}

/// An intervention plan attached to a building.
///
/// Plans are the optional collection: a snapshot that cannot fetch them
/// still succeeds and the partition is simply empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterventionPlan {
    /// Server-assigned plan id.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub id: String,
    /// Id of the building this plan belongs to, if known.
    #[serde(
        default,
        rename = "buildingId",
        deserialize_with = "id_string::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub building_id: Option<String>,
    /// All other server fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for InterventionPlan {
    const PARTITION: ReferencePartition = ReferencePartition::InterventionPlans;

    fn id(&self) -> &str {
        &self.id
    }
}

/// An inspection captured in the field, exactly as the form produced it.
///
/// The draft is an opaque JSON object: the offline layer never interprets
/// its fields, it only stores the draft and later uploads it unchanged.
/// Queue bookkeeping (local id, sync flag, timestamps) is kept outside the
/// draft so the uploaded body is always the server-shaped payload.
///
/// # Examples
///
/// ```
/// use firehall_types::InspectionDraft;
/// use serde_json::json;
///
/// let draft = InspectionDraft::from_value(json!({
///     "buildingId": "17",
///     "templateId": "3",
///     "answers": [],
/// }))?;
/// assert_eq!(draft.get("buildingId"), Some(&json!("17")));
///
/// assert!(InspectionDraft::from_value(json!([1, 2, 3])).is_err());
/// # Ok::<(), firehall_types::RecordError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionDraft(Map<String, Value>);

impl InspectionDraft {
    /// Create an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a draft from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] if `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    /// The draft as a JSON value, ready for upload.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the draft has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for InspectionDraft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for InspectionDraft {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Human-readable kind of a JSON value, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
