use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dates::normalize_date;
use crate::error::{ExtractError, RecordError};
use crate::models::{Assignment, AssignmentType, DroppedRecord, RawAssignment};

/// One decoded element of a source document. A malformed element stays in
/// place so the rest of the document still goes through.
pub type ExtractedRecord = Result<RawAssignment, RecordError>;

pub fn clean_response(content: &str) -> &str {
    let mut content = content.trim();
    if let Some(rest) = content.strip_prefix("```json") {
        content = rest;
    } else if let Some(rest) = content.strip_prefix("```") {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}

pub fn parse_response(content: &str) -> Result<Vec<ExtractedRecord>, ExtractError> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(clean_response(content))?;

    Ok(elements
        .into_iter()
        .map(|element| {
            serde_json::from_value::<RawAssignment>(element)
                .map_err(|err| RecordError::Malformed(err.to_string()))
        })
        .collect())
}

pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<ExtractedRecord>, ExtractError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    reader.headers()?;

    let records = reader
        .deserialize::<RawAssignment>()
        .map(|result| result.map_err(|err| RecordError::Malformed(err.to_string())))
        .collect();

    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<ExtractedRecord>, ExtractError> {
    let io_error = |source: std::io::Error| ExtractError::Io {
        path: path.display().to_string(),
        source,
    };

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let records = if is_csv {
        let file = std::fs::File::open(path).map_err(io_error)?;
        read_csv_records(file)?
    } else {
        let content = std::fs::read_to_string(path).map_err(io_error)?;
        parse_response(&content)?
    };

    debug!(path = %path.display(), count = records.len(), "loaded extraction records");
    Ok(records)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A caller-supplied course always wins over the course the extractor
/// inferred.
pub fn resolve_record(
    raw: &RawAssignment,
    course_override: Option<&str>,
    reference: NaiveDate,
) -> Result<Assignment, RecordError> {
    let name = present(&raw.name).ok_or(RecordError::MissingField("name"))?;
    let course = course_override
        .filter(|c| !c.trim().is_empty())
        .or_else(|| present(&raw.course))
        .ok_or(RecordError::MissingField("course"))?;
    let due_token = raw
        .due_date
        .as_deref()
        .ok_or(RecordError::MissingField("due_date"))?;
    let type_token = raw
        .assignment_type
        .as_deref()
        .ok_or(RecordError::MissingField("assignment_type"))?;

    let due_date = normalize_date(due_token, reference)?;
    let assignment_type: AssignmentType = type_token.parse()?;

    Assignment::new(name, course, due_date, assignment_type)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBatch {
    pub assignments: Vec<Assignment>,
    pub dropped: Vec<DroppedRecord>,
}

pub fn resolve_records(
    source: &str,
    records: &[ExtractedRecord],
    course_override: Option<&str>,
    reference: NaiveDate,
) -> ResolvedBatch {
    let mut batch = ResolvedBatch::default();

    for (index, record) in records.iter().enumerate() {
        let resolved = match record {
            Ok(raw) => resolve_record(raw, course_override, reference),
            Err(err) => Err(err.clone()),
        };

        match resolved {
            Ok(assignment) => batch.assignments.push(assignment),
            Err(err) => {
                warn!(source, index, error = %err, "dropping extracted record");
                batch.dropped.push(DroppedRecord {
                    source: source.to_string(),
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    debug!(
        source,
        kept = batch.assignments.len(),
        dropped = batch.dropped.len(),
        "resolved extraction records"
    );
    batch
}
