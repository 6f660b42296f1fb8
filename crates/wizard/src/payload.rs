//! Request bodies sent to the interaction backend.

use serde::{Deserialize, Serialize};

/// One medicine or several.
///
/// Serializes untagged: a bare JSON string for `Single`, an array otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicineList {
    Single(String),
    Multiple(Vec<String>),
}

impl MedicineList {
    /// `Single` for exactly one token, `Multiple` for any other count.
    pub fn from_tokens(mut tokens: Vec<String>) -> Self {
        match tokens.len() {
            1 => Self::Single(tokens.remove(0)),
            _ => Self::Multiple(tokens),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderMedicationPayload {
    pub medicine: MedicineList,
    pub foods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotUnderMedicationPayload {
    pub food_items: Vec<String>,
    pub cooking_method: String,
}

/// Body of the outbound POST, discriminated by `choice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice")]
pub enum OutboundPayload {
    #[serde(rename = "a")]
    UnderMedication(UnderMedicationPayload),
    #[serde(rename = "b")]
    NotUnderMedication(NotUnderMedicationPayload),
}

impl OutboundPayload {
    /// The wire value of `choice`.
    pub fn choice(&self) -> &'static str {
        match self {
            Self::UnderMedication(_) => "a",
            Self::NotUnderMedication(_) => "b",
        }
    }
}

impl From<UnderMedicationPayload> for OutboundPayload {
    fn from(p: UnderMedicationPayload) -> Self {
        Self::UnderMedication(p)
    }
}

impl From<NotUnderMedicationPayload> for OutboundPayload {
    fn from(p: NotUnderMedicationPayload) -> Self {
        Self::NotUnderMedication(p)
    }
}

/// Split comma-separated free text into trimmed, non-empty tokens, in order.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
