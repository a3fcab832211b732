use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::extract::ResolvedBatch;
use crate::models::{Assignment, Plan, WeeklyWorkload};

pub fn get_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn compute_weekly_workload(assignments: &[Assignment]) -> Vec<WeeklyWorkload> {
    let mut weeks: BTreeMap<NaiveDate, Vec<&Assignment>> = BTreeMap::new();

    for assignment in assignments {
        weeks
            .entry(get_week_start(assignment.due_date()))
            .or_default()
            .push(assignment);
    }

    weeks
        .into_iter()
        .map(|(week_start, bucket)| {
            let mut assignments_by_type: BTreeMap<String, usize> = BTreeMap::new();
            let mut intensity_score = 0.0;

            for assignment in &bucket {
                let kind = assignment.assignment_type();
                intensity_score += kind.weight();
                *assignments_by_type.entry(kind.to_string()).or_insert(0) += 1;
            }

            WeeklyWorkload {
                week_start_date: week_start,
                week_end_date: week_start + Duration::days(6),
                assignment_count: bucket.len(),
                intensity_score,
                assignments_by_type,
            }
        })
        .collect()
}

/// Stable sort by due date; same-day assignments keep their input order.
pub fn sort_chronologically(assignments: &mut [Assignment]) {
    assignments.sort_by_key(Assignment::due_date);
}

pub fn merge_sources<I>(sources: I) -> Vec<Assignment>
where
    I: IntoIterator<Item = Vec<Assignment>>,
{
    let mut merged: Vec<Assignment> = sources.into_iter().flatten().collect();
    sort_chronologically(&mut merged);
    merged
}

pub fn build_plan<I>(batches: I) -> Plan
where
    I: IntoIterator<Item = ResolvedBatch>,
{
    let mut sources = Vec::new();
    let mut dropped = Vec::new();

    for batch in batches {
        sources.push(batch.assignments);
        dropped.extend(batch.dropped);
    }

    let assignments = merge_sources(sources);
    let weekly_workload = compute_weekly_workload(&assignments);
    debug!(
        assignments = assignments.len(),
        weeks = weekly_workload.len(),
        dropped = dropped.len(),
        "built workload plan"
    );

    Plan {
        assignments,
        weekly_workload,
        dropped,
    }
}

/// Weeks ordered heaviest first; ties go to the earlier week.
pub fn heaviest_weeks(weeks: &[WeeklyWorkload]) -> Vec<&WeeklyWorkload> {
    let mut ranked: Vec<&WeeklyWorkload> = weeks.iter().collect();
    ranked.sort_by(|a, b| {
        b.intensity_score
            .partial_cmp(&a.intensity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
