use coursetrack_core::{
    add_assessment, delete_assessment, edit_assessment, validate, Assessment, AssessmentPatch,
    Course, Mark, MutationError, ValidationIssue,
};

fn cs101() -> Course {
    let mut course = Course::new("CS101");
    course.assessments.push(Assessment::new("A1", 40.0));
    course
        .assessments
        .push(Assessment::new("A2", 30.0).with_mark(85.0));
    course
}

fn names(course: &Course) -> Vec<&str> {
    course
        .assessments
        .iter()
        .map(|item| item.name.as_str())
        .collect()
}

#[test]
fn add_over_budget_is_rejected_and_course_unchanged() {
    let course = cs101();
    let before = course.clone();

    let err = add_assessment(&course, Assessment::new("A3", 40.0)).unwrap_err();
    match err {
        MutationError::Invalid(report) => {
            assert!(report.exceeds_weight_budget());
            assert!(!report.has_duplicate_name());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(course, before);
    assert_eq!(names(&course), vec!["A1", "A2"]);
}

#[test]
fn duplicate_name_is_rejected_regardless_of_weight() {
    let course = cs101();
    for weight in [1.0, 30.0, 90.0] {
        let err = add_assessment(&course, Assessment::new("A1", weight)).unwrap_err();
        assert!(
            matches!(&err, MutationError::Invalid(report) if report.has_duplicate_name()),
            "weight {weight}: {err}"
        );
    }
}

#[test]
fn add_then_delete_restores_prior_state() {
    let course = cs101();
    let added = add_assessment(&course, Assessment::new("Quiz", 5.0).with_mark(60.0)).unwrap();
    assert_eq!(added.assessments.len(), 3);

    let restored = delete_assessment(&added, "Quiz");
    let mut expected = course.clone();
    coursetrack_core::refresh_marks(&mut expected);
    assert_eq!(restored, expected);
}

#[test]
fn mark_only_edit_succeeds_on_a_full_budget() {
    let mut course = cs101();
    course.assessments.push(Assessment::new("Final", 30.0));
    assert_eq!(course.total_weight(), 100.0);

    let edited =
        edit_assessment(&course, "Final", &AssessmentPatch::mark(Mark::Graded(77.0))).unwrap();
    assert_eq!(edited.find("Final").unwrap().mark, Mark::Graded(77.0));
    assert_eq!(edited.total_weight(), 100.0);
    assert_eq!(edited.current_mark, 60.0);
}

#[test]
fn edit_weight_is_checked_against_other_assessments_only() {
    let course = cs101();
    let edited = edit_assessment(&course, "A1", &AssessmentPatch::weight(70.0)).unwrap();
    assert_eq!(edited.total_weight(), 100.0);

    let err = edit_assessment(&course, "A1", &AssessmentPatch::weight(70.5)).unwrap_err();
    assert!(matches!(err, MutationError::Invalid(report) if report.exceeds_weight_budget()));
}

#[test]
fn rename_must_be_unique_against_others() {
    let course = cs101();
    let err = edit_assessment(&course, "A1", &AssessmentPatch::rename("A2")).unwrap_err();
    assert!(matches!(err, MutationError::Invalid(report) if report.has_duplicate_name()));

    let same = edit_assessment(&course, "A1", &AssessmentPatch::rename("A1")).unwrap();
    assert_eq!(names(&same), vec!["A1", "A2"]);
}

#[test]
fn rejected_edit_applies_no_fields() {
    let course = cs101();
    let patch = AssessmentPatch {
        name: Some("A2".to_string()),
        mark: Some(Mark::Graded(99.0)),
        ..AssessmentPatch::default()
    };

    assert!(edit_assessment(&course, "A1", &patch).is_err());
    assert_eq!(course.find("A1").unwrap().mark, Mark::Ungraded);
}

#[test]
fn later_edit_overwrites_only_fields_it_names() {
    let course = cs101();
    let first = edit_assessment(&course, "A1", &AssessmentPatch::weight(20.0)).unwrap();
    let second = edit_assessment(&first, "A1", &AssessmentPatch::mark(Mark::Graded(64.0))).unwrap();

    let item = second.find("A1").unwrap();
    assert_eq!(item.weight, 20.0);
    assert_eq!(item.mark, Mark::Graded(64.0));
}

#[test]
fn delete_twice_is_idempotent() {
    let course = cs101();
    let once = delete_assessment(&course, "A2");
    let twice = delete_assessment(&once, "A2");
    assert_eq!(once, twice);
    assert_eq!(names(&twice), vec!["A1"]);
}

#[test]
fn invariants_hold_across_a_mutation_sequence() {
    let mut course = Course::new("MATH200");
    let proposals = [
        ("Q1", 25.0),
        ("Q2", 25.0),
        ("Q1", 10.0),
        ("Mid", 40.0),
        ("Final", 20.0),
        ("Lab", 10.0),
    ];
    for (name, weight) in proposals {
        if let Ok(next) = add_assessment(&course, Assessment::new(name, weight)) {
            course = next;
        }
        assert!(course.total_weight() <= 100.0);
        let mut seen = std::collections::HashSet::new();
        assert!(course.assessments.iter().all(|item| seen.insert(item.name.clone())));
    }
    assert_eq!(names(&course), vec!["Q1", "Q2", "Mid", "Lab"]);
}

#[test]
fn field_errors_are_reported_with_their_field() {
    let report = validate(&cs101(), &Assessment::new("", -5.0), None);
    assert!(matches!(report.issues()[0], ValidationIssue::InvalidField(_)));
    assert_eq!(report.fields(), vec!["name", "weight"]);
}
