use crate::models::{Availability, AvailabilityData};
use crate::utils::availability_storage;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

fn slot_data() -> AvailabilityData {
    AvailabilityData {
        date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
    }
}

#[test]
fn same_slot_matches_on_the_full_tuple() {
    let user = Uuid::new_v4().to_string();
    let team = Uuid::new_v4().to_string();
    let slot = Availability::new(user.clone(), team.clone(), &slot_data());

    assert!(slot.same_slot(&slot_data(), &user, &team));

    // Any differing component makes it a different slot
    assert!(!slot.same_slot(&slot_data(), &user, "other-team"));
    assert!(!slot.same_slot(&slot_data(), "other-user", &team));

    let mut shifted = slot_data();
    shifted.start_time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    assert!(!slot.same_slot(&shifted, &user, &team));
}

#[test]
fn duplicate_tuple_is_not_stored_twice() {
    let user = Uuid::new_v4().to_string();
    let team = Uuid::new_v4().to_string();

    assert!(availability_storage::add_availability(&user, &team, &slot_data())
        .unwrap()
        .is_some());
    assert!(availability_storage::add_availability(&user, &team, &slot_data())
        .unwrap()
        .is_none());

    let slots = availability_storage::availability_for_team(&team).unwrap();
    assert_eq!(slots.len(), 1);
}

#[test]
fn same_times_in_another_team_are_a_different_slot() {
    let user = Uuid::new_v4().to_string();
    let team_a = Uuid::new_v4().to_string();
    let team_b = Uuid::new_v4().to_string();

    assert!(availability_storage::add_availability(&user, &team_a, &slot_data())
        .unwrap()
        .is_some());

    // The identical times for the same user belong to each team separately
    assert!(availability_storage::add_availability(&user, &team_b, &slot_data())
        .unwrap()
        .is_some());

    assert_eq!(
        availability_storage::availability_for_team(&team_a)
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        availability_storage::availability_for_team(&team_b)
            .unwrap()
            .len(),
        1
    );
}
