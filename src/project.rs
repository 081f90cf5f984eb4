//! Project records and the two fixed-length rating vectors.
//!
//! Both vectors are 9-dimensional and their category order is semantically
//! fixed; serde round-trips them as plain integer arrays so existing
//! `projects.json` data loads unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{DssError, DssResult};
use crate::software::SoftwareApp;

/// Dimensionality of both the constraint and attribute vectors.
pub const VECTOR_DIMS: usize = 9;

/// Highest ordinal rating on the constraint scale.
pub const CONSTRAINT_MAX: u8 = 2;

/// Highest rating on the attribute scale.
pub const ATTRIBUTE_MAX: u8 = 10;

/// Constraint categories, in storage order. Never reindex.
pub const CONSTRAINT_LABELS: [&str; VECTOR_DIMS] = [
    "Bureaucracy",
    "Site logistics",
    "Resource planning",
    "4D BIM knowledge",
    "Stakeholder involvement",
    "Transparency",
    "Return on investment",
    "Cost estimation",
    "Cost control",
];

/// Attribute categories, in storage order. Never reindex.
pub const ATTRIBUTE_LABELS: [&str; VECTOR_DIMS] = [
    "Clash detection",
    "Visualisation",
    "Discrete event simulation",
    "Ease of use",
    "Collaboration",
    "Asset management",
    "Payment structure",
    "Resource management",
    "Schedule vs actual WIP",
];

/// 9-dimensional ordinal profile of a project's organizational and
/// contextual restrictions, each component in `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ConstraintVector([u8; VECTOR_DIMS]);

impl ConstraintVector {
    pub fn new(values: [u8; VECTOR_DIMS]) -> DssResult<Self> {
        if let Some(v) = values.iter().find(|v| **v > CONSTRAINT_MAX) {
            return Err(DssError::invalid_input(
                "cm_restrictions",
                format!("rating {v} exceeds ordinal scale 0..={CONSTRAINT_MAX}"),
            ));
        }
        Ok(Self(values))
    }

    pub fn zeroed() -> Self {
        Self([0; VECTOR_DIMS])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for ConstraintVector {
    type Error = DssError;

    fn try_from(values: Vec<u8>) -> DssResult<Self> {
        let arr: [u8; VECTOR_DIMS] = values.try_into().map_err(|v: Vec<u8>| {
            DssError::invalid_input(
                "cm_restrictions",
                format!("expected {VECTOR_DIMS} elements, got {}", v.len()),
            )
        })?;
        Self::new(arr)
    }
}

impl From<ConstraintVector> for Vec<u8> {
    fn from(v: ConstraintVector) -> Vec<u8> {
        v.0.to_vec()
    }
}

/// 9-dimensional capability rating of a software application for a given
/// project, each component in `0..=10`. Assigned by Experts; stored for
/// reporting, never consumed by the matching algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct AttributeVector([u8; VECTOR_DIMS]);

impl AttributeVector {
    pub fn new(values: [u8; VECTOR_DIMS]) -> DssResult<Self> {
        if let Some(v) = values.iter().find(|v| **v > ATTRIBUTE_MAX) {
            return Err(DssError::invalid_input(
                "attribute_ratings",
                format!("rating {v} exceeds scale 0..={ATTRIBUTE_MAX}"),
            ));
        }
        Ok(Self(values))
    }

    pub fn zeroed() -> Self {
        Self([0; VECTOR_DIMS])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for AttributeVector {
    type Error = DssError;

    fn try_from(values: Vec<u8>) -> DssResult<Self> {
        let arr: [u8; VECTOR_DIMS] = values.try_into().map_err(|v: Vec<u8>| {
            DssError::invalid_input(
                "attribute_ratings",
                format!("expected {VECTOR_DIMS} elements, got {}", v.len()),
            )
        })?;
        Self::new(arr)
    }
}

impl From<AttributeVector> for Vec<u8> {
    fn from(v: AttributeVector) -> Vec<u8> {
        v.0.to_vec()
    }
}

/// A submitted construction project and its workflow state.
///
/// `accepted` gates the Expert scoring list; `history` marks an
/// admin-approved reference case eligible for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: u32,
    pub email: String,
    pub title: String,
    pub involvement: String,
    pub application: SoftwareApp,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub local_authority: String,
    pub version: String,
    pub date_of_project: NaiveDate,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default)]
    pub history: bool,
    pub cm_restrictions: ConstraintVector,
    pub attribute_ratings: AttributeVector,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl ProjectRecord {
    /// Whether this record participates as a neighbour / exact-match
    /// candidate.
    pub fn is_reference(&self) -> bool {
        self.history
    }
}
