use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::model::Schedule;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to read schedule: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schedule payload must be a JSON object")]
    NotAnObject,
    #[error("schedule payload must include '{0}'")]
    MissingKey(&'static str),
}

/// Load a schedule payload (`{"machines": [...], "items": [...]}`) from disk.
pub fn load_schedule(path: &Path) -> Result<Schedule, ScheduleError> {
    let json = std::fs::read_to_string(path)?;
    let schedule = parse_schedule(&json)?;
    tracing::info!(
        path = %path.display(),
        machines = schedule.machines.len(),
        items = schedule.items.len(),
        "schedule loaded"
    );
    Ok(schedule)
}

pub fn parse_schedule(json: &str) -> Result<Schedule, ScheduleError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(ScheduleError::NotAnObject)?;
    for key in ["machines", "items"] {
        if !object.contains_key(key) {
            return Err(ScheduleError::MissingKey(key));
        }
    }
    let schedule: Schedule = serde_json::from_value(value)?;
    report_degraded_input(&schedule);
    Ok(schedule)
}

fn report_degraded_input(schedule: &Schedule) {
    let machines: HashSet<&str> = schedule.machines.iter().map(|m| m.id.as_str()).collect();
    let unscheduled = schedule
        .items
        .iter()
        .filter(|item| item.span_ms().is_none())
        .count();
    let orphaned = schedule
        .items
        .iter()
        .filter(|item| !machines.contains(item.resource_id.as_str()))
        .count();
    if unscheduled > 0 {
        tracing::warn!(count = unscheduled, "items without a valid start/end are not drawn");
    }
    if orphaned > 0 {
        tracing::warn!(count = orphaned, "items reference unknown machines and are not drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemStatus;

    #[test]
    fn rejects_non_objects_and_missing_keys() {
        assert!(matches!(parse_schedule("[]"), Err(ScheduleError::NotAnObject)));
        assert!(matches!(
            parse_schedule(r#"{"items": []}"#),
            Err(ScheduleError::MissingKey("machines"))
        ));
        assert!(matches!(
            parse_schedule(r#"{"machines": []}"#),
            Err(ScheduleError::MissingKey("items"))
        ));
        assert!(matches!(parse_schedule("{"), Err(ScheduleError::Json(_))));
    }

    #[test]
    fn parses_payload() {
        let json = r#"{
            "machines": ["M1", "M2"],
            "items": [
                {"id": "J1", "resourceId": "M1", "start": "2025-01-01T00:00:00Z",
                 "end": "2025-01-01T02:00:00Z", "status": "current", "workOrder": "WO1",
                 "salesOrder": "SO1", "label": "Op 10"},
                {"id": "J2", "resourceId": "M2", "start": null, "end": null}
            ],
            "generatedAt": "ignored"
        }"#;
        let schedule = parse_schedule(json).unwrap();
        assert_eq!(schedule.machines.len(), 2);
        assert_eq!(schedule.items[0].display_label(), "Op 10");
        assert_eq!(schedule.items[1].display_label(), "J2");
        assert!(schedule.items[1].span_ms().is_none());
    }

    #[test]
    fn non_string_status_reads_as_actual() {
        let json = r#"{
            "machines": ["M1"],
            "items": [
                {"id": "J1", "resourceId": "M1", "start": "2025-01-01T00:00:00Z",
                 "end": "2025-01-01T02:00:00Z", "status": null},
                {"id": "J2", "resourceId": "M1", "start": "2025-01-01T03:00:00Z",
                 "end": "2025-01-01T04:00:00Z", "status": 3},
                {"id": "J3", "resourceId": "M1", "status": "frozen"}
            ]
        }"#;
        let schedule = parse_schedule(json).unwrap();
        let statuses: Vec<ItemStatus> = schedule.items.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![ItemStatus::Actual, ItemStatus::Actual, ItemStatus::Frozen]
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_schedule(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
        assert!(err.to_string().starts_with("failed to read schedule"));
    }
}
