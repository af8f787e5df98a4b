use rstest::rstest;

use crate::prelude::{reduce, SensorObservation, Solver, SolveOutcome, SolverOpts};
use crate::tests::{init_logger, synthetic_observations, BASE_TIMESTAMP_NS, SENSORS, TARGET};

const WINDOW_NS: i64 = 2_000_000_000;

fn solve(observations: &[SensorObservation]) -> SolveOutcome {
    let solver = Solver::new(SolverOpts::default());
    let reduced = reduce(observations, WINDOW_NS);
    solver.solve("4840D6", &reduced, 3)
}

#[test]
fn geometric_round_trip() {
    init_logger();

    let observations = synthetic_observations("4840D6", TARGET, &SENSORS, BASE_TIMESTAMP_NS);

    match solve(&observations) {
        SolveOutcome::Solved(estimate) => {
            assert!(
                (estimate.latitude_deg - TARGET.0).abs() < 0.01,
                "latitude off: {}",
                estimate.latitude_deg,
            );
            assert!(
                (estimate.longitude_deg - TARGET.1).abs() < 0.01,
                "longitude off: {}",
                estimate.longitude_deg,
            );
            assert!(
                estimate.confidence > 95.0,
                "confidence too low: {}",
                estimate.confidence,
            );
            assert_eq!(estimate.sensor_count, 4);
            assert_eq!(estimate.method.to_string(), "TDOA");
            assert!(estimate.latitude_deg.is_finite() && estimate.longitude_deg.is_finite());
        },
        other => panic!("expected a solved fix, got {other:?}"),
    }
}

#[test]
fn three_sensors_suffice() {
    init_logger();

    let observations =
        synthetic_observations("4840D6", TARGET, &SENSORS[..3], BASE_TIMESTAMP_NS);

    match solve(&observations) {
        SolveOutcome::Solved(estimate) => {
            assert!((estimate.latitude_deg - TARGET.0).abs() < 0.01);
            assert!((estimate.longitude_deg - TARGET.1).abs() < 0.01);
            assert_eq!(estimate.sensor_count, 3);
        },
        other => panic!("expected a solved fix, got {other:?}"),
    }
}

#[test]
fn confidence_strictly_drops_under_perturbation() {
    init_logger();

    let clean = synthetic_observations("4840D6", TARGET, &SENSORS, BASE_TIMESTAMP_NS);
    let mut perturbed = clean.clone();
    perturbed[0].timestamp_ns += 1_000; // +1 µs on one sensor

    let clean_confidence = match solve(&clean) {
        SolveOutcome::Solved(estimate) => estimate.confidence,
        other => panic!("clean set must solve, got {other:?}"),
    };
    let perturbed_confidence = match solve(&perturbed) {
        SolveOutcome::Solved(estimate) => estimate.confidence,
        other => panic!("perturbed set must still solve, got {other:?}"),
    };

    assert!(
        perturbed_confidence < clean_confidence,
        "{perturbed_confidence} not below {clean_confidence}",
    );
}

#[test]
fn gross_perturbation_never_yields_a_position() {
    init_logger();

    // +50 ms cannot be absorbed by any position: the fit must refuse
    // rather than return a far away garbage estimate
    let mut observations = synthetic_observations("4840D6", TARGET, &SENSORS, BASE_TIMESTAMP_NS);
    observations[0].timestamp_ns += 50_000_000;

    // widen the window so the perturbed timestamp stays in play
    let solver = Solver::new(SolverOpts::default());
    let reduced = reduce(&observations, 60_000_000_000);
    assert_eq!(
        solver.solve("4840D6", &reduced, 3),
        SolveOutcome::DidNotConverge,
    );
}

#[rstest]
#[case::none(0)]
#[case::one(1)]
#[case::two(2)]
fn below_hard_minimum_never_solves(#[case] count: usize) {
    init_logger();

    let observations =
        synthetic_observations("4840D6", TARGET, &SENSORS[..count.max(1)], BASE_TIMESTAMP_NS);
    let observations = &observations[..count];

    match solve(observations) {
        SolveOutcome::InsufficientSensors { found, required } => {
            assert_eq!(found, count);
            assert_eq!(required, 3);
        },
        other => panic!("expected InsufficientSensors, got {other:?}"),
    }
}

#[test]
fn window_starvation_is_its_own_variant() {
    init_logger();

    // 3 distinct sensors overall, but one reported far outside the
    // window: retryable with a wider window
    let mut observations =
        synthetic_observations("4840D6", TARGET, &SENSORS[..3], BASE_TIMESTAMP_NS);
    observations[0].timestamp_ns -= 10_000_000_000;

    match solve(&observations) {
        SolveOutcome::InsufficientInWindow { found, required } => {
            assert_eq!(found, 2);
            assert_eq!(required, 3);
        },
        other => panic!("expected InsufficientInWindow, got {other:?}"),
    }
}

#[test]
fn coincident_sensors_do_not_converge() {
    init_logger();

    let observations = (0..3_i64)
        .map(|index| {
            SensorObservation::new(
                &format!("s{index}"),
                "4840D6",
                47.0,
                8.0,
                BASE_TIMESTAMP_NS + index * 1_000,
            )
            .unwrap()
        })
        .collect::<Vec<_>>();

    assert_eq!(solve(&observations), SolveOutcome::DidNotConverge);
}

#[test]
fn solve_is_deterministic() {
    init_logger();

    let observations = synthetic_observations("4840D6", TARGET, &SENSORS, BASE_TIMESTAMP_NS);
    let (first, second) = (solve(&observations), solve(&observations));

    match (first, second) {
        (SolveOutcome::Solved(a), SolveOutcome::Solved(b)) => {
            assert_eq!(a.latitude_deg.to_bits(), b.latitude_deg.to_bits());
            assert_eq!(a.longitude_deg.to_bits(), b.longitude_deg.to_bits());
            assert_eq!(a.confidence, b.confidence);
        },
        other => panic!("expected two solved fixes, got {other:?}"),
    }
}
