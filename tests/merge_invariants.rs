use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use lead_reports::filters::{filter_frequent, frequency_threshold};
use lead_reports::{LeadRecord, merge_duplicates, normalize_value};

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 10, minute, 0).unwrap()
}

fn random_records(rng: &mut StdRng, count: usize) -> Vec<LeadRecord> {
    let emails = ["a@x.com", "b@x.com", ""];
    let phones = ["5511", "5522", ""];
    (0..count)
        .map(|idx| {
            let mut record = LeadRecord::new(format!("doc-{idx}"));
            record.email = emails[rng.random_range(0..emails.len())].to_string();
            record.phone = phones[rng.random_range(0..phones.len())].to_string();
            record.visit_count = rng.random_range(1..6);
            record.total_minutes = if rng.random_bool(0.3) {
                None
            } else {
                Some(f64::from(rng.random_range(0..90u32)))
            };
            record.last_visit = if rng.random_bool(0.2) {
                None
            } else {
                Some(at(rng.random_range(0..59)))
            };
            record.visit_history = (0..rng.random_range(0..3))
                .map(|visit| json!({ "doc": idx, "visit": visit }))
                .collect();
            record
        })
        .collect()
}

#[test]
fn two_visit_scenario_merges_counters_and_latest_visit() {
    let mut first = LeadRecord::new("1");
    first.email = "a@x.com".into();
    first.visit_count = 1;
    first.total_minutes = Some(10.0);
    first.last_visit = Some(at(1));
    let mut second = LeadRecord::new("2");
    second.email = "a@x.com".into();
    second.visit_count = 2;
    second.total_minutes = Some(5.0);
    second.last_visit = Some(at(2));

    let merged = merge_duplicates(&[first, second]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].visit_count, 3);
    assert_eq!(merged[0].total_minutes, Some(15.0));
    assert_eq!(merged[0].last_visit, Some(at(2)));
}

#[test]
fn merging_twice_equals_merging_once() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let records = random_records(&mut rng, 30);
        let once = merge_duplicates(&records);
        let twice = merge_duplicates(&once);
        assert_eq!(once, twice);
    }
}

#[test]
fn merged_sums_do_not_depend_on_group_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let records = random_records(&mut rng, 40);
    let baseline = merge_duplicates(&records);

    for _ in 0..10 {
        let mut shuffled = records.clone();
        shuffled.shuffle(&mut rng);
        let merged = merge_duplicates(&shuffled);
        assert_eq!(merged.len(), baseline.len());
        for expected in &baseline {
            let key = expected.identity_key();
            let actual = if key == expected.id {
                merged.iter().find(|record| record.id == expected.id)
            } else {
                merged.iter().find(|record| record.identity_key() == key)
            }
            .expect("group present after shuffle");
            assert_eq!(actual.visit_count, expected.visit_count);
            assert_eq!(actual.visit_history.len(), expected.visit_history.len());
            let lhs = actual.total_minutes.unwrap_or(0.0);
            let rhs = expected.total_minutes.unwrap_or(0.0);
            assert!((lhs - rhs).abs() < 1e-9);
            assert_eq!(actual.last_visit_millis(), expected.last_visit_millis());
        }
    }
}

#[test]
fn merged_visit_count_is_sum_of_constituents() {
    let mut rng = StdRng::seed_from_u64(3);
    let records = random_records(&mut rng, 50);
    let merged = merge_duplicates(&records);
    let before: u32 = records.iter().map(|record| record.visit_count).sum();
    let after: u32 = merged.iter().map(|record| record.visit_count).sum();
    assert_eq!(before, after);
}

#[test]
fn normalizer_never_yields_zero_visits() {
    let samples = [
        json!({}),
        json!({"visitCount": 0}),
        json!({"visitCount": -2}),
        json!({"visitCount": null}),
        json!({"visitCount": "9"}),
        json!({"visitHistory": []}),
        json!({"visitHistory": [1]}),
        json!(null),
        json!("text"),
    ];
    for (idx, data) in samples.iter().enumerate() {
        let record = normalize_value(&format!("doc-{idx}"), data);
        assert!(record.visit_count >= 1, "doc-{idx} produced {}", record.visit_count);
    }
}

#[test]
fn frequency_floor_holds_for_small_thresholds() {
    for raw in ["-10", "-1", "0", "1", "", "x"] {
        assert_eq!(frequency_threshold(Some(raw)), 2, "input {raw:?}");
    }
    let mut single = LeadRecord::new("single");
    single.visit_count = 1;
    for threshold in [0, 1] {
        assert!(filter_frequent(vec![single.clone()], threshold).is_empty());
    }
}
