//! Aggregate invariants checked over generated report collections

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_log::test;

use crate::common::fixtures::rows;
use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use uni_social::reports::{coerce_number, ReportId, ReportRow, ReportSpec};

/// Small deterministic generator so failures are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Score as the backend might send it: number, numeric string, junk or missing
    fn score(&mut self) -> Option<Value> {
        let raw = (self.next() % 10_000) as f64 / 10.0;
        match self.next() % 5 {
            0 => Some(json!(raw)),
            1 => Some(json!(raw.to_string())),
            2 => Some(json!(-(raw as i64))),
            3 => Some(json!("n/d")),
            _ => None,
        }
    }
}

fn generated(seed: u64, len: usize) -> Vec<ReportRow> {
    let mut rng = Lcg(seed);
    let items: Vec<Value> = (0..len)
        .map(|i| {
            let mut row = json!({ "referente": format!("R{}", i), "correo": format!("r{}@x.edu", i) });
            if let Some(score) = rng.score() {
                row["score_autoridad"] = score;
            }
            row
        })
        .collect();
    rows(Value::Array(items))
}

#[test]
fn test_count_max_average_invariants() {
    init_test_logging();
    log_test_step("Checking summary invariants over generated collections");

    let spec = ReportSpec::authority_ranking();
    for seed in 1..40u64 {
        let len = (seed % 13) as usize + 1;
        let data = generated(seed, len);
        let summary = spec.summarize(&data);

        assert_eq!(summary.count, len);

        let values: Vec<f64> = data
            .iter()
            .map(|r| coerce_number(r.get("score_autoridad")))
            .collect();
        assert!(values.iter().all(|v| summary.max >= *v));
        assert!(values.iter().any(|v| *v == summary.max));

        let (whole, decimals) = summary
            .average
            .rsplit_once('.')
            .expect("average always carries a decimal point");
        assert_eq!(decimals.len(), 1, "average {}", summary.average);
        assert!(whole.trim_start_matches('-').chars().all(|c| c.is_ascii_digit()));

        let average: f64 = summary.average.parse().unwrap();
        let sum: f64 = values.iter().sum();
        assert!(
            (average * len as f64 - sum).abs() <= 0.05 * len as f64 + 1e-9,
            "average {} x {} too far from sum {}",
            average,
            len,
            sum
        );
        assert_eq!(summary.top, "R0");
    }
}

#[test]
fn test_empty_collection_defaults_for_every_report() {
    for id in ReportId::ALL {
        let summary = id.spec().summarize(&[]);
        log_test_data("empty summary", &summary);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.max, 0.0);
        assert_eq!(summary.average, "0");
        assert_eq!(summary.top, "N/A");
        assert_eq!(summary.metrics[0].value, "0");
    }
}

#[test]
fn test_mixed_string_and_number_example() {
    let spec = ReportSpec::authority_ranking();
    let data = rows(json!([
        { "referente": "Ana", "correo": "a@x.edu", "score_autoridad": "50" },
        { "referente": "Bo", "correo": "b@x.edu", "score_autoridad": 80 }
    ]));

    let summary = spec.summarize(&data);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.max, 80.0);
    assert_eq!(summary.average, "65.0");
    assert_eq!(summary.top, "Ana");
}

#[test]
fn test_unparseable_scores_count_as_zero() {
    let spec = ReportSpec::authority_ranking();
    let data = rows(json!([
        { "referente": "Ana", "score_autoridad": "alto" },
        { "referente": "Bo", "score_autoridad": null },
        { "referente": "Cy" }
    ]));

    let summary = spec.summarize(&data);
    assert_eq!(summary.max, 0.0);
    assert_eq!(summary.average, "0.0");
}
