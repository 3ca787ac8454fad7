//! Interview questions and their synthetic supporting datasets.
//!
//! Both types are immutable once generated; a dataset is scoped to the
//! lifetime of the single question that references it.

use serde::{Deserialize, Serialize};

use super::ids::QuestionId;
use super::skill::{Difficulty, SkillArea};

/// A generated interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier.
    pub id: QuestionId,
    /// Skill area this question probes.
    pub skill_area: SkillArea,
    /// Difficulty the question was generated at.
    pub difficulty: Difficulty,
    /// Business scenario text presented to the candidate.
    pub scenario: String,
    /// Supporting dataset, when the scenario calls for one.
    pub dataset: Option<Dataset>,
}

impl Question {
    /// Creates a question without a dataset.
    pub fn new(
        skill_area: SkillArea,
        difficulty: Difficulty,
        scenario: impl Into<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            skill_area,
            difficulty,
            scenario: scenario.into(),
            dataset: None,
        }
    }

    /// Attaches a supporting dataset.
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }
}

/// Tabular synthetic data backing one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column names, in display order.
    pub columns: Vec<String>,
    /// Rows of cell values; each row has one cell per column. Empty cells
    /// represent intentionally missing values.
    pub rows: Vec<Vec<String>>,
    /// Quality issues deliberately baked into the data.
    pub issues: Vec<DataIssue>,
}

impl Dataset {
    /// Creates a dataset with no declared issues.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            issues: Vec::new(),
        }
    }

    /// Declares an intentional quality issue.
    pub fn with_issue(mut self, issue: DataIssue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An intentional data quality issue that makes the Excel challenge meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIssue {
    /// Column the issue was injected into.
    pub column: String,
    /// Kind of defect.
    pub kind: DataIssueKind,
}

/// Kinds of deliberately injected data defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataIssueKind {
    /// Blank cells scattered through the column.
    MissingValues,
    /// Mixed formatting within one column (casing, date styles, units).
    InconsistentFormat,
    /// Repeated records.
    Duplicates,
}
