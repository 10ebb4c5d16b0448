//! Shared value types for the emergency-case core.
//!
//! These are the small records that travel through the case store unchanged:
//! validated display text, staff records appended to a case, and the vital-signs
//! snapshot captured at triage.

use serde::{Deserialize, Serialize};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-blank content.
///
/// Input is trimmed on construction. Used for roster identifiers and names, where a
/// blank value would make the record unaddressable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NonEmptyText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NonEmptyText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A member of staff attached to a case during a status update.
///
/// Staff records are append-only on a case; they are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: NonEmptyText,
    #[serde(default)]
    pub role: String,
}

impl StaffRecord {
    pub fn new(name: impl AsRef<str>, role: impl Into<String>) -> Result<Self, TextError> {
        Ok(Self {
            id: None,
            name: NonEmptyText::new(name)?,
            role: role.into(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Vital signs recorded with a case.
///
/// The core never interprets these values; they are stored and echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    /// Free text such as `"120/80"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Dr. Sarah Smith ").unwrap();
        assert_eq!(text.as_str(), "Dr. Sarah Smith");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_staff_record_requires_name() {
        assert!(StaffRecord::new(" ", "Nurse").is_err());

        let staff = StaffRecord::new("Jo Bloggs", "Nurse").unwrap().with_id("ST01");
        assert_eq!(staff.id.as_deref(), Some("ST01"));
        assert_eq!(staff.role, "Nurse");
    }

    #[test]
    fn test_vital_signs_use_camel_case_keys() {
        let vitals = VitalSigns {
            heart_rate: Some(112),
            blood_pressure: Some("90/60".into()),
            temperature: None,
            oxygen_saturation: Some(93),
        };
        let json = serde_json::to_value(&vitals).unwrap();
        assert_eq!(json["heartRate"], 112);
        assert_eq!(json["bloodPressure"], "90/60");
        assert_eq!(json["oxygenSaturation"], 93);
        assert!(json.get("temperature").is_none());
    }
}
