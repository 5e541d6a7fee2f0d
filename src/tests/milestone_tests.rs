use crate::models::{Milestone, MilestoneData};
use chrono::NaiveDate;

fn data(progress: u8) -> MilestoneData {
    MilestoneData {
        title: "Ship the prototype".to_string(),
        description: "First demo-ready build".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        progress,
    }
}

#[test]
fn completed_is_derived_from_progress_on_create() {
    for progress in 0..=100u8 {
        let milestone = Milestone::new(None, "user".to_string(), &data(progress)).unwrap();
        assert_eq!(milestone.completed, progress == 100, "progress={}", progress);
    }
}

#[test]
fn completed_flips_both_ways_on_update() {
    let mut milestone = Milestone::new(None, "user".to_string(), &data(50)).unwrap();
    assert!(!milestone.completed);

    milestone.update(&data(100)).unwrap();
    assert!(milestone.completed);

    // Editing back below 100 clears the flag again
    milestone.update(&data(80)).unwrap();
    assert!(!milestone.completed);
    assert_eq!(milestone.progress, 80);
}

#[test]
fn mark_complete_forces_progress_to_100() {
    let mut milestone = Milestone::new(None, "user".to_string(), &data(30)).unwrap();
    milestone.mark_complete();

    assert_eq!(milestone.progress, 100);
    assert!(milestone.completed);
}

#[test]
fn end_date_before_start_date_is_a_field_error() {
    let mut bad = data(10);
    bad.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let errors = Milestone::new(None, "user".to_string(), &bad).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "end_date");
    assert_eq!(errors[0].reason, "End date cannot be before start date.");
}

#[test]
fn invalid_update_does_not_change_the_milestone() {
    let mut milestone = Milestone::new(None, "user".to_string(), &data(40)).unwrap();

    let mut bad = data(60);
    bad.end_date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert!(milestone.update(&bad).is_err());

    // The failed edit left everything as it was
    assert_eq!(milestone.progress, 40);
    assert_eq!(
        milestone.end_date,
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    );
}

#[test]
fn empty_title_and_bad_dates_are_reported_together() {
    let mut bad = data(10);
    bad.title = "   ".to_string();
    bad.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let errors = bad.validate().unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"end_date"));
}

#[test]
fn same_day_milestone_is_valid() {
    let mut same_day = data(0);
    same_day.end_date = same_day.start_date;
    assert!(same_day.validate().is_ok());
}
