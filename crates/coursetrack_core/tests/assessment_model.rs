use chrono::{NaiveDate, TimeZone, Utc};
use coursetrack_core::{start_of_day_utc, ApplicationStart, Assessment, AssessmentKey, Course, Mark};

#[test]
fn application_start_parses_hydration_document() {
    let value = serde_json::json!({
        "courses": [{
            "code": "CS101",
            "assessments": [
                { "name": "A1", "weight": 40, "mark": -1, "deadline": "2024-02-15T23:59:00Z", "reminder": "" },
                { "name": "A2", "weight": 30, "mark": 85, "deadline": "2024-03-01" },
                { "name": "A3", "weight": 10, "mark": null }
            ],
            "currentMark": 30,
            "expectedMark": 30
        }],
        "notification": "email"
    });

    let start: ApplicationStart = serde_json::from_value(value).unwrap();
    assert_eq!(start.notification, "email");
    let course = &start.courses[0];
    assert_eq!(course.code, "CS101");
    assert_eq!(course.assessments[0].mark, Mark::Ungraded);
    assert_eq!(course.assessments[0].reminder, None);
    assert_eq!(
        course.assessments[0].deadline,
        Some(Utc.with_ymd_and_hms(2024, 2, 15, 23, 59, 0).unwrap())
    );
    assert_eq!(course.assessments[1].mark, Mark::Graded(85.0));
    assert_eq!(
        course.assessments[1].deadline,
        Some(start_of_day_utc(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
    );
    assert_eq!(course.assessments[2].mark, Mark::Ungraded);
}

#[test]
fn ungraded_serializes_back_to_sentinel() {
    let assessment = Assessment::new("Essay", 20.0);
    let json = serde_json::to_value(&assessment).unwrap();

    assert_eq!(json["name"], "Essay");
    assert_eq!(json["mark"], -1.0);
    assert_eq!(json["deadline"], serde_json::Value::Null);

    let decoded: Assessment = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, assessment);
}

#[test]
fn course_uses_camel_case_derived_fields() {
    let mut course = Course::new("CS101");
    course.current_mark = 30.0;
    let json = serde_json::to_value(&course).unwrap();

    assert_eq!(json["currentMark"], 30.0);
    assert_eq!(json["expectedMark"], 0.0);
}

#[test]
fn malformed_date_is_rejected() {
    let value = serde_json::json!({ "name": "A1", "weight": 10, "deadline": "next tuesday" });
    let err = serde_json::from_value::<Assessment>(value).unwrap_err();
    assert!(err.to_string().contains("invalid date"), "unexpected error: {err}");
}

#[test]
fn composite_key_does_not_collide_on_separator() {
    let left = AssessmentKey::new("CS-101", "A1");
    let right = AssessmentKey::new("CS", "101-A1");
    assert_ne!(left, right);
}

#[test]
fn equality_covers_every_field() {
    let base = Assessment::new("A1", 40.0);
    assert_eq!(base, Assessment::new("A1", 40.0));
    assert_ne!(base, Assessment::new("A1", 40.0).with_mark(0.0));
    assert_ne!(
        base,
        Assessment::new("A1", 40.0).with_reminder(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
}
