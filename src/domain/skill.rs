//! Skill areas and difficulty levels.
//!
//! A [`SkillArea`] is one named Excel competency dimension. The fixed,
//! ordered set of areas assessed in a session is the [`SkillTaxonomy`];
//! its ordering doubles as the priority used for tie-breaking in the
//! decision policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named Excel competency dimension (e.g. "Pivot Tables and Data Analysis").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillArea(String);

impl SkillArea {
    /// Creates a skill area from its display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the skill area name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SkillArea {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Ordered, fixed set of skill areas assessed in one session.
///
/// Position in the taxonomy is the area's priority: lower index means it is
/// probed first when untested and wins ties between equally-weak areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTaxonomy {
    areas: Vec<SkillArea>,
}

impl SkillTaxonomy {
    /// Creates a taxonomy from an ordered list of areas. Duplicates are kept
    /// out so priority stays well-defined.
    pub fn new(areas: impl IntoIterator<Item = SkillArea>) -> Self {
        let mut unique = Vec::new();
        for area in areas {
            if !unique.contains(&area) {
                unique.push(area);
            }
        }
        Self { areas: unique }
    }

    /// The core Excel skill categories assessed by default.
    pub fn default_excel() -> Self {
        Self::new(
            [
                "Basic Formulas and Functions",
                "Data Manipulation and Cleaning",
                "Lookup Functions (VLOOKUP, INDEX/MATCH)",
                "Pivot Tables and Data Analysis",
                "Data Visualization and Charts",
                "Conditional Logic and IF Statements",
                "Text Functions and String Manipulation",
                "Advanced Functions and Array Formulas",
            ]
            .map(SkillArea::from),
        )
    }

    /// Returns true if the area belongs to this taxonomy.
    pub fn contains(&self, area: &SkillArea) -> bool {
        self.areas.contains(area)
    }

    /// Returns the priority (taxonomy index) of an area, if known.
    pub fn priority(&self, area: &SkillArea) -> Option<usize> {
        self.areas.iter().position(|a| a == area)
    }

    /// Areas in priority order.
    pub fn areas(&self) -> &[SkillArea] {
        &self.areas
    }

    /// Number of areas in the taxonomy.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Returns true if the taxonomy has no areas.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Ordinal question difficulty.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// The next harder level, saturating at [`Difficulty::Hard`].
    pub fn raised(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// The next easier level, saturating at [`Difficulty::Easy`].
    pub fn lowered(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", label)
    }
}
