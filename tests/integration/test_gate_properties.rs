//! Behavioral properties of the gate over a fixture vocabulary.

use crate::common::{TestVectors, engine_with_policy, fixture_engine};
use std::collections::HashMap;
use std::sync::Arc;
use thinklink::gate::cosine_similarity;
use thinklink::vector::VectorDimension;
use thinklink::{
    Decision, DecisionEngine, GateError, GateResult, StoreError, ThresholdPolicy, Token,
    VectorStore, WordVectors,
};

/// Store that hands out whatever vectors it was given, unchecked.
struct RawVectors {
    vectors: HashMap<String, Vec<f32>>,
}

impl VectorStore for RawVectors {
    fn lookup(&self, token: &Token) -> GateResult<&[f32]> {
        self.vectors
            .get(token.as_str())
            .map(Vec::as_slice)
            .ok_or_else(|| GateError::UnknownToken {
                token: token.to_string(),
            })
    }

    fn dimension(&self) -> VectorDimension {
        VectorDimension::new(2).unwrap()
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

const CORRUPT_GLOVE: &str = "ocean 1.0 0.0\nsea NaN 0.8\nriver inf 1.0\n";

#[test]
fn identity_is_rejected_at_any_score() {
    let engine = fixture_engine();
    for score in [0.0, 250.0, 1000.0, 1e9] {
        assert_eq!(engine.decide("ocean", "ocean", score), Decision::rejected());
        assert_eq!(engine.decide("Ocean", "  OCEAN ", score), Decision::rejected());
    }
}

#[test]
fn containment_is_rejected_both_ways() {
    let engine = fixture_engine();
    assert_eq!(engine.decide("cat", "cats", 0.0), Decision::rejected());
    assert_eq!(engine.decide("cats", "cat", 0.0), Decision::rejected());
    // Rejected before lookup: "seashore" is not in the vocabulary
    assert_eq!(engine.evaluate("sea", "seashore", 0.0), Ok(Decision::rejected()));
}

#[test]
fn empty_input_is_rejected_without_error() {
    let engine = fixture_engine();
    assert_eq!(engine.evaluate("", "ocean", 0.0), Ok(Decision::rejected()));
    assert_eq!(engine.evaluate("ocean", "   ", 0.0), Ok(Decision::rejected()));
}

#[test]
fn unknown_word_is_a_silent_non_match() {
    let engine = fixture_engine();
    assert_eq!(
        engine.decide("ocean", "zzqxplorb123", 0.0),
        Decision::rejected()
    );
    assert!(matches!(
        engine.evaluate("ocean", "zzqxplorb123", 0.0),
        Err(GateError::UnknownToken { .. })
    ));
}

#[test]
fn ocean_and_sea_are_accepted_for_a_new_player() {
    let decision = fixture_engine().decide("ocean", "sea", 0.0);
    assert!(decision.accepted);
    assert!((decision.score - 0.6).abs() < 1e-6);
    assert_eq!(decision.points(), 60);
}

#[test]
fn unrelated_words_are_rejected() {
    let decision = fixture_engine().decide("ocean", "cat", 0.0);
    assert!(!decision.accepted);
    assert_eq!(decision.score, 0.0);
}

#[test]
fn score_equal_to_threshold_is_rejected() {
    // cos(north, south) is exactly 0.5, the saturated threshold
    let engine = fixture_engine();
    let early = engine.decide("north", "south", 0.0);
    assert!(early.accepted);
    assert_eq!(early.score, 0.5);

    let late = engine.decide("north", "south", 1000.0);
    assert!(!late.accepted);
    assert_eq!(late.score, 0.5);

    let flat = engine_with_policy(ThresholdPolicy::new(0.5, 0.5, 1000.0).unwrap());
    assert!(!flat.decide("north", "south", 0.0).accepted);
}

#[test]
fn acceptance_never_grows_with_score() {
    let engine = fixture_engine();
    let pairs = [
        ("ocean", "sea"),
        ("north", "south"),
        ("cat", "kitten"),
        ("ocean", "cat"),
    ];
    let scores = [-50.0, 0.0, 100.0, 400.0, 999.0, 1000.0, 1500.0];

    for (target, candidate) in pairs {
        let mut previous = true;
        for score in scores {
            let accepted = engine.decide(target, candidate, score).accepted;
            assert!(
                previous || !accepted,
                "{target}/{candidate} accepted at {score} after a rejection"
            );
            previous = accepted;
        }
    }
}

#[test]
fn threshold_is_monotone_and_bounded() {
    let policy = ThresholdPolicy::default();
    let mut previous = policy.threshold(f64::MIN);
    assert_eq!(previous, 0.3);

    for step in 0..=30 {
        let score = -500.0 + f64::from(step) * 100.0;
        let threshold = policy.threshold(score);
        assert!(threshold >= previous);
        assert!((0.3..=0.5).contains(&threshold));
        previous = threshold;
    }
    assert_eq!(policy.threshold(f64::INFINITY), 0.5);
    assert_eq!(policy.threshold(f64::NAN), 0.3);
}

#[test]
fn similarity_is_symmetric() {
    let engine = fixture_engine();
    let words = ["ocean", "sea", "north", "south", "kitten", "cat"];

    for a in words {
        for b in words {
            let left = engine.store().get(a).unwrap();
            let right = engine.store().get(b).unwrap();
            let ab = cosine_similarity(left, right).unwrap();
            let ba = cosine_similarity(right, left).unwrap();
            assert_eq!(ab, ba, "{a}/{b}");
            assert!((-1.0..=1.0).contains(&ab));
        }
    }
}

#[test]
fn engine_is_shared_across_threads() {
    let engine = fixture_engine();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.decide("ocean", "sea", f64::from(i) * 300.0))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().accepted);
    }
    assert_eq!(engine.store().len(), 7);
}

#[test]
fn corrupt_vector_file_fails_to_load() {
    let vectors = TestVectors::new();
    let path = vectors.add_file("corrupt.txt", CORRUPT_GLOVE);

    let err = WordVectors::open(&path, None).unwrap_err();
    // Lines parse in parallel, so either corrupt line may be reported
    assert!(matches!(err, StoreError::Parse { line: 2 | 3, .. }));
    assert_eq!(err.status_code(), "PARSE_ERROR");
}

#[test]
fn non_finite_vectors_fold_into_a_non_match() {
    let vectors = HashMap::from([
        ("ocean".to_string(), vec![1.0, 0.0]),
        ("sea".to_string(), vec![f32::NAN, 0.8]),
        ("river".to_string(), vec![f32::INFINITY, 1.0]),
    ]);
    let store: Arc<dyn VectorStore> = Arc::new(RawVectors { vectors });
    let engine = DecisionEngine::with_default_policy(store);

    assert_eq!(engine.decide("ocean", "sea", 0.0), Decision::rejected());
    assert_eq!(engine.decide("river", "ocean", 0.0), Decision::rejected());
    assert_eq!(
        engine.evaluate("ocean", "sea", 0.0),
        Err(GateError::DegenerateVector {
            token: "sea".to_string()
        })
    );
    assert_eq!(
        engine.evaluate("river", "ocean", 0.0),
        Err(GateError::DegenerateVector {
            token: "river".to_string()
        })
    );

    // The rejected answer still serializes with a numeric score
    let json = serde_json::to_value(engine.decide("ocean", "sea", 0.0)).unwrap();
    assert_eq!(json["score"], 0.0);
}
