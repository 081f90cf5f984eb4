use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DssError, DssResult};

/// Number of applications the recommender can choose between.
pub const SOFTWARE_COUNT: usize = 3;

/// The fixed set of 4D scheduling applications under evaluation.
///
/// Stored and scored zero-based everywhere; the variant order is the
/// accumulator slot order in [`crate::matcher::software_scores`] and must
/// not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SoftwareApp {
    SynchroPro,
    AstaPowerProject,
    NavisworksManage,
}

impl SoftwareApp {
    pub const ALL: [SoftwareApp; SOFTWARE_COUNT] = [
        SoftwareApp::SynchroPro,
        SoftwareApp::AstaPowerProject,
        SoftwareApp::NavisworksManage,
    ];

    /// Zero-based accumulator index.
    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> DssResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| {
                DssError::invalid_input(
                    "application",
                    format!("software index {index} out of range 0..{SOFTWARE_COUNT}"),
                )
            })
    }

    /// Product name shown to users.
    pub fn name(self) -> &'static str {
        match self {
            SoftwareApp::SynchroPro => "Synchro Pro",
            SoftwareApp::AstaPowerProject => "Asta PowerProject",
            SoftwareApp::NavisworksManage => "Navisworks Manage",
        }
    }
}

impl fmt::Display for SoftwareApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for SoftwareApp {
    type Error = DssError;

    fn try_from(value: u8) -> DssResult<Self> {
        Self::from_index(value as usize)
    }
}

impl From<SoftwareApp> for u8 {
    fn from(app: SoftwareApp) -> u8 {
        app.as_index() as u8
    }
}
