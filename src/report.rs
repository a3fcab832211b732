use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Assignment, AssignmentType, Plan, TypeSummary, WeeklyWorkload};
use crate::workload;

pub fn summarize_by_type(assignments: &[Assignment]) -> Vec<TypeSummary> {
    let mut counts: BTreeMap<AssignmentType, usize> = BTreeMap::new();

    for assignment in assignments {
        *counts.entry(assignment.assignment_type()).or_insert(0) += 1;
    }

    let mut summaries: Vec<TypeSummary> = counts
        .into_iter()
        .map(|(assignment_type, count)| TypeSummary {
            assignment_type,
            count,
            total_weight: assignment_type.weight() * count as f64,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

fn type_breakdown(week: &WeeklyWorkload) -> String {
    week.assignments_by_type
        .iter()
        .map(|(kind, count)| format!("{kind} {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_report(course: Option<&str>, reference: NaiveDate, plan: &Plan) -> String {
    let mut output = String::new();
    let course_label = course.unwrap_or("all courses");

    let _ = writeln!(output, "# Workload Forecast");
    let _ = writeln!(
        output,
        "Generated for {} (reference date {})",
        course_label, reference
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Workload");

    if plan.weekly_workload.is_empty() {
        let _ = writeln!(output, "No dated assignments found.");
    } else {
        for week in plan.weekly_workload.iter() {
            let _ = writeln!(
                output,
                "- Week of {} to {}: {} assignments, intensity {:.1} ({})",
                week.week_start_date,
                week.week_end_date,
                week.assignment_count,
                week.intensity_score,
                type_breakdown(week)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Heaviest Weeks");

    let ranked = workload::heaviest_weeks(&plan.weekly_workload);
    if ranked.is_empty() {
        let _ = writeln!(output, "No dated assignments found.");
    } else {
        for week in ranked.iter().take(3) {
            let _ = writeln!(
                output,
                "- Week of {}: intensity {:.1} across {} assignments",
                week.week_start_date, week.intensity_score, week.assignment_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Assignment Mix");

    let summaries = summarize_by_type(&plan.assignments);
    if summaries.is_empty() {
        let _ = writeln!(output, "No dated assignments found.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} assignments (weight {:.1})",
                summary.assignment_type, summary.count, summary.total_weight
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Assignments");

    if plan.assignments.is_empty() {
        let _ = writeln!(output, "No dated assignments found.");
    } else {
        for assignment in plan.assignments.iter() {
            let _ = writeln!(
                output,
                "- {} {} ({}, {})",
                assignment.due_date(),
                assignment.name(),
                assignment.course(),
                assignment.assignment_type()
            );
        }
    }

    if !plan.dropped.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Skipped Records");
        for dropped in plan.dropped.iter() {
            let _ = writeln!(
                output,
                "- {} #{}: {}",
                dropped.source, dropped.index, dropped.reason
            );
        }
    }

    output
}

pub fn render_json(plan: &Plan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DroppedRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_plan() -> Plan {
        let assignments = vec![
            Assignment::new("HW 1", "CSE 374", date(2024, 10, 15), AssignmentType::Homework)
                .unwrap(),
            Assignment::new("Proposal", "CSE 374", date(2024, 10, 22), AssignmentType::Project)
                .unwrap(),
            Assignment::new("HW 2", "CSE 374", date(2024, 10, 24), AssignmentType::Homework)
                .unwrap(),
        ];
        let weekly_workload = workload::compute_weekly_workload(&assignments);
        Plan {
            assignments,
            weekly_workload,
            dropped: vec![DroppedRecord {
                source: "cse374.json".to_string(),
                index: 3,
                reason: "missing field `due_date`".to_string(),
            }],
        }
    }

    #[test]
    fn summaries_sort_by_count() {
        let plan = sample_plan();
        let summaries = summarize_by_type(&plan.assignments);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].assignment_type, AssignmentType::Homework);
        assert_eq!(summaries[0].count, 2);
        assert!((summaries[1].total_weight - 2.5).abs() < 0.001);
    }

    #[test]
    fn report_lists_weeks_and_assignments() {
        let report = build_report(Some("CSE 374"), date(2024, 9, 1), &sample_plan());
        assert!(report.starts_with("# Workload Forecast\n"));
        assert!(report.contains("Generated for CSE 374 (reference date 2024-09-01)"));
        assert!(report.contains(
            "- Week of 2024-10-14 to 2024-10-20: 1 assignments, intensity 1.0 (homework 1)"
        ));
        assert!(report.contains(
            "- Week of 2024-10-21 to 2024-10-27: 2 assignments, intensity 3.5 (homework 1, project 1)"
        ));
        assert!(report.contains("- 2024-10-22 Proposal (CSE 374, project)"));
        assert!(report.contains("- cse374.json #3: missing field `due_date`"));

        let heaviest = report.find("## Heaviest Weeks").unwrap();
        let first = report[heaviest..].find("- Week of 2024-10-21").unwrap();
        let second = report[heaviest..].find("- Week of 2024-10-14").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_plan_report() {
        let plan = Plan {
            assignments: Vec::new(),
            weekly_workload: Vec::new(),
            dropped: Vec::new(),
        };
        let report = build_report(None, date(2024, 9, 1), &plan);
        assert!(report.contains("all courses"));
        assert!(report.contains("No dated assignments found."));
        assert!(!report.contains("## Skipped Records"));
    }

    #[test]
    fn json_keeps_response_shape() {
        let json = render_json(&sample_plan()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["assignments"].as_array().unwrap().len(), 3);
        let week = &value["weekly_workload"][1];
        assert_eq!(week["week_start_date"], "2024-10-21");
        assert_eq!(week["week_end_date"], "2024-10-27");
        assert_eq!(week["assignment_count"], 2);
        assert_eq!(week["intensity_score"], 3.5);
        assert_eq!(week["assignments_by_type"]["project"], 1);
        assert_eq!(value["dropped"][0]["index"], 3);
    }
}
