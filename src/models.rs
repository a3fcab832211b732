use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidTypeError, RecordError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Homework,
    Exam,
    Project,
    Quiz,
    Other,
}

impl AssignmentType {
    pub const ALL: [AssignmentType; 5] = [
        AssignmentType::Homework,
        AssignmentType::Exam,
        AssignmentType::Project,
        AssignmentType::Quiz,
        AssignmentType::Other,
    ];

    pub const fn weight(self) -> f64 {
        match self {
            AssignmentType::Exam => 3.0,
            AssignmentType::Project => 2.5,
            AssignmentType::Quiz => 1.5,
            AssignmentType::Homework => 1.0,
            AssignmentType::Other => 1.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AssignmentType::Homework => "homework",
            AssignmentType::Exam => "exam",
            AssignmentType::Project => "project",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Other => "other",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = InvalidTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignmentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidTypeError {
                token: s.to_string(),
            })
    }
}

/// Only constructible through [`Assignment::new`], which keeps `due_date`
/// within years 1 through 9999 so week arithmetic on it cannot overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    name: String,
    course: String,
    due_date: NaiveDate,
    assignment_type: AssignmentType,
}

impl Assignment {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        due_date: NaiveDate,
        assignment_type: AssignmentType,
    ) -> Result<Self, RecordError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }
        if !(1..=9999).contains(&due_date.year()) {
            return Err(RecordError::DueDateOutOfRange(due_date));
        }

        Ok(Self {
            name,
            course: course.into(),
            due_date,
            assignment_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn assignment_type(&self) -> AssignmentType {
        self.assignment_type
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyWorkload {
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub assignment_count: usize,
    pub intensity_score: f64,
    pub assignments_by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssignment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignment_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSummary {
    pub assignment_type: AssignmentType,
    pub count: usize,
    pub total_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    pub source: String,
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
    pub weekly_workload: Vec<WeeklyWorkload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedRecord>,
}
