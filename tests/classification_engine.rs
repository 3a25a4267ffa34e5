mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::{category, fixture_bytes, gid, vertical};
use taxowalk::classify::{Classifier, ClassifierConfig, ClassifyError};
use taxowalk::oracle::{Oracle, OracleError};
use taxowalk::taxonomy::{decode, Taxonomy};
use taxowalk::types::{OracleChoice, OracleRequest, Usage};

/// Replays canned answers in order and records every request.
#[derive(Default)]
struct ScriptedOracle {
    answers: Mutex<VecDeque<Result<OracleChoice, OracleError>>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    fn new(answers: Vec<Result<OracleChoice, OracleError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn choose_option(&self, request: &OracleRequest) -> Result<OracleChoice, OracleError> {
        self.requests.lock().unwrap().push(request.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Other("script exhausted".into())))
    }
}

/// Never answers.
struct StalledOracle;

#[async_trait]
impl Oracle for StalledOracle {
    async fn choose_option(&self, _request: &OracleRequest) -> Result<OracleChoice, OracleError> {
        std::future::pending().await
    }
}

fn answer(choice: &str, prompt: u64, completion: u64) -> Result<OracleChoice, OracleError> {
    Ok(OracleChoice {
        choice: choice.to_string(),
        usage: Usage::new(prompt, completion, prompt + completion),
    })
}

fn fixture() -> Arc<Taxonomy> {
    Arc::new(decode(&fixture_bytes()).unwrap())
}

#[tokio::test]
async fn none_of_these_first_turn_returns_no_category() {
    let oracle = ScriptedOracle::new(vec![answer("None of these", 10, 1)]);
    let mut classifier = Classifier::new(oracle.clone(), fixture()).unwrap();

    let result = classifier.classify("a mystery object").await.unwrap();

    assert_eq!(result.category, None);
    assert_eq!(result.turns, 1);
    assert_eq!(oracle.requests().len(), 1);
    assert_eq!(classifier.usage(), Usage::new(10, 1, 11));
}

#[tokio::test]
async fn walks_to_a_leaf() {
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel & Accessories", 100, 5),
        answer("Apparel & Accessories", 90, 4),
        answer("Clothing", 80, 3),
        answer("Tops", 70, 2),
        answer("T-Shirts", 60, 1),
    ]);
    let mut classifier = Classifier::new(oracle.clone(), fixture()).unwrap();

    let result = classifier.classify("Cotton crew-neck tee").await.unwrap();
    let category = result.category.expect("leaf category");

    assert_eq!(category.id, gid("aa-1-13-8"));
    assert_eq!(category.full_name, "Apparel & Accessories > Clothing > Tops > T-Shirts");
    assert_eq!(
        category.path,
        vec!["Apparel & Accessories", "Apparel & Accessories", "Clothing", "Tops", "T-Shirts"]
    );
    // The leaf has no children, so no sixth call is made.
    assert_eq!(result.turns, 5);
    assert_eq!(oracle.requests().len(), 5);
}

#[tokio::test]
async fn usage_is_the_sum_of_every_turn() {
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel & Accessories", 100, 5),
        answer("Apparel & Accessories", 90, 4),
        answer("none of these", 80, 3),
    ]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let result = classifier.classify("something to wear").await.unwrap();

    assert_eq!(result.usage, Usage::new(270, 12, 282));
    assert_eq!(classifier.usage(), result.usage);
    assert_eq!(result.category.unwrap().id, gid("aa"));
}

#[tokio::test]
async fn usage_resets_between_runs() {
    let oracle = ScriptedOracle::new(vec![answer("none of these", 10, 1), answer("none of these", 3, 1)]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    classifier.classify("first").await.unwrap();
    classifier.classify("second").await.unwrap();

    assert_eq!(classifier.usage(), Usage::new(3, 1, 4));
}

#[tokio::test]
async fn requests_carry_description_path_and_ordered_candidates() {
    let oracle = ScriptedOracle::new(vec![
        answer("Vehicles & Parts", 1, 1),
        answer("Vehicles & Parts", 1, 1),
        answer("none of these", 1, 1),
    ]);
    let mut classifier = Classifier::new(oracle.clone(), fixture()).unwrap();

    classifier.classify("brake pads").await.unwrap();
    let requests = oracle.requests();

    assert_eq!(requests[0].description, "brake pads");
    assert!(requests[0].path.is_empty());
    let root_names: Vec<&str> = requests[0].candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(root_names, vec!["Apparel & Accessories", "Vehicles & Parts"]);

    assert_eq!(requests[1].path, vec!["Vehicles & Parts"]);
    assert_eq!(requests[2].path, vec!["Vehicles & Parts", "Vehicles & Parts"]);
    assert_eq!(requests[2].candidates.len(), 1);
    assert_eq!(requests[2].candidates[0].id, gid("vp-99"));
    assert_eq!(requests[2].candidates[0].full_name, "Vehicles & Parts > Vehicle Parts");
}

#[tokio::test]
async fn only_the_next_generation_is_offered() {
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel & Accessories", 1, 1),
        answer("Apparel & Accessories", 1, 1),
        answer("Clothing", 1, 1),
        answer("none of these", 1, 1),
    ]);
    let mut classifier = Classifier::new(oracle.clone(), fixture()).unwrap();

    let result = classifier.classify("flannel pyjamas").await.unwrap();
    let offered: Vec<String> = oracle.requests()[3]
        .candidates
        .iter()
        .map(|c| c.id.clone())
        .collect();

    // Pajamas (aa-1-4-2) leaked into Clothing's children and is filtered out.
    assert_eq!(offered, vec![gid("aa-1-13"), gid("aa-1-4")]);
    assert_eq!(result.category.unwrap().id, gid("aa-1"));
}

#[tokio::test]
async fn filter_skips_gaps_to_the_shallowest_deeper_generation() {
    let taxonomy = Arc::new(Taxonomy::new(
        "t",
        vec![vertical(
            "Apparel",
            vec![
                category("aa-1-2", "Grandchild", vec![]),
                category("aa-1-2-3", "Great-grandchild", vec![]),
                category("aa-1-5", "Other grandchild", vec![]),
            ],
        )],
    ));
    let oracle = ScriptedOracle::new(vec![answer("Apparel", 1, 1), answer("none of these", 1, 1)]);
    let mut classifier = Classifier::new(oracle.clone(), taxonomy).unwrap();

    classifier.classify("x").await.unwrap();
    let offered: Vec<String> = oracle.requests()[1]
        .candidates
        .iter()
        .map(|c| c.name.clone())
        .collect();

    assert_eq!(offered, vec!["Grandchild", "Other grandchild"]);
}

#[tokio::test]
async fn unfiltered_when_no_candidate_is_deeper() {
    // Children that are not deeper than their parent are all offered.
    let taxonomy = Arc::new(Taxonomy::new(
        "t",
        vec![vertical(
            "Apparel",
            vec![category(
                "aa-1",
                "Clothing",
                vec![category("aa-2", "Sibling", vec![]), category("aa", "Parent", vec![])],
            )],
        )],
    ));
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel", 1, 1),
        answer("Clothing", 1, 1),
        answer("none of these", 1, 1),
    ]);
    let mut classifier = Classifier::new(oracle.clone(), taxonomy).unwrap();

    classifier.classify("x").await.unwrap();

    assert_eq!(oracle.requests()[2].candidates.len(), 2);
}

#[tokio::test]
async fn choice_may_echo_the_id_hint_or_use_full_name_or_id() {
    let oracle = ScriptedOracle::new(vec![
        answer("  apparel & accessories  ", 1, 1),
        answer(&format!("Apparel & Accessories (ID: {})", gid("aa")), 1, 1),
        answer("APPAREL & ACCESSORIES > CLOTHING", 1, 1),
        answer(&gid("aa-1-13"), 1, 1),
        answer("none of these", 1, 1),
    ]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let result = classifier.classify("polo shirt").await.unwrap();

    assert_eq!(result.category.unwrap().id, gid("aa-1-13"));
}

#[tokio::test]
async fn unmatched_choice_keeps_the_last_confirmed_node() {
    let oracle = ScriptedOracle::new(vec![
        answer("Vehicles & Parts", 5, 1),
        answer("Spaceships", 5, 1),
    ]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let err = classifier.classify("rocket").await.unwrap_err();

    match &err {
        ClassifyError::UnmatchedChoice {
            choice,
            last_confirmed,
        } => {
            assert_eq!(choice, "Spaceships");
            let node = last_confirmed.as_ref().expect("first turn was confirmed");
            assert_eq!(node.name, "Vehicles & Parts");
            assert_eq!(node.id, "");
            assert_eq!(node.path, vec!["Vehicles & Parts"]);
        }
        other => panic!("expected unmatched choice, got {other:?}"),
    }
    assert_eq!(err.last_confirmed().unwrap().name, "Vehicles & Parts");
    assert_eq!(classifier.usage(), Usage::new(10, 2, 12));
}

#[tokio::test]
async fn unmatched_first_turn_has_no_partial_result() {
    let oracle = ScriptedOracle::new(vec![answer("Groceries", 1, 1)]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let err = classifier.classify("milk").await.unwrap_err();

    assert!(matches!(err, ClassifyError::UnmatchedChoice { .. }));
    assert!(err.last_confirmed().is_none());
}

#[tokio::test]
async fn empty_answer_never_selects_a_synthetic_root() {
    let oracle = ScriptedOracle::new(vec![answer("   ", 1, 1)]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let err = classifier.classify("milk").await.unwrap_err();

    assert!(matches!(err, ClassifyError::UnmatchedChoice { .. }));
}

#[tokio::test]
async fn oracle_error_aborts_with_the_last_confirmed_node() {
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel & Accessories", 7, 1),
        answer("Apparel & Accessories", 7, 1),
        Err(OracleError::Api {
            status: 429,
            body: "rate limited".into(),
        }),
    ]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let err = classifier.classify("scarf").await.unwrap_err();

    match &err {
        ClassifyError::Oracle {
            source: OracleError::Api { status, .. },
            last_confirmed,
        } => {
            assert_eq!(*status, 429);
            assert_eq!(last_confirmed.as_ref().unwrap().id, gid("aa"));
        }
        other => panic!("expected oracle error, got {other:?}"),
    }
    assert_eq!(classifier.usage(), Usage::new(14, 2, 16));
}

#[tokio::test]
async fn blank_description_is_rejected_before_any_call() {
    let oracle = ScriptedOracle::new(vec![]);
    let mut classifier = Classifier::new(oracle.clone(), fixture()).unwrap();

    for description in ["", "   ", "\n\t"] {
        let err = classifier.classify(description).await.unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput));
    }
    assert!(oracle.requests().is_empty());
}

#[test]
fn empty_taxonomy_is_rejected_at_construction() {
    let oracle = ScriptedOracle::new(vec![]);
    let result = Classifier::new(oracle, Arc::new(Taxonomy::new("t", vec![])));
    assert!(matches!(result, Err(ClassifyError::EmptyTaxonomy)));
}

#[tokio::test(start_paused = true)]
async fn turn_timeout_surfaces_cancellation() {
    let config = ClassifierConfig {
        turn_timeout_secs: Some(5),
    };
    let mut classifier = Classifier::with_config(StalledOracle, fixture(), config).unwrap();

    let err = classifier.classify("anything").await.unwrap_err();

    assert!(matches!(err, ClassifyError::Cancelled { after_secs: 5, .. }));
    assert!(err.last_confirmed().is_none());
}

#[tokio::test]
async fn caller_timeout_drops_the_in_flight_call() {
    let mut classifier = Classifier::new(StalledOracle, fixture()).unwrap();

    let outcome = tokio::time::timeout(Duration::from_millis(20), classifier.classify("anything")).await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn classifiers_share_one_taxonomy_concurrently() {
    let taxonomy = fixture();
    let mut handles = Vec::new();
    for pick in ["Apparel & Accessories", "Vehicles & Parts"] {
        let taxonomy = Arc::clone(&taxonomy);
        handles.push(tokio::spawn(async move {
            let oracle = ScriptedOracle::new(vec![answer(pick, 1, 1), answer("none of these", 1, 1)]);
            let mut classifier = Classifier::new(oracle, taxonomy).unwrap();
            classifier.classify("x").await.unwrap()
        }));
    }

    let mut names = Vec::new();
    for handle in handles {
        names.push(handle.await.unwrap().category.unwrap().name);
    }
    assert_eq!(names, vec!["Apparel & Accessories", "Vehicles & Parts"]);
}

#[tokio::test]
async fn oversized_usage_reports_saturate_instead_of_overflowing() {
    let oracle = ScriptedOracle::new(vec![
        answer("Apparel & Accessories", u64::MAX - 1, 1),
        answer("none of these", 5, 1),
    ]);
    let mut classifier = Classifier::new(oracle, fixture()).unwrap();

    let result = classifier.classify("a very chatty oracle").await.unwrap();

    assert_eq!(result.usage, Usage::new(u64::MAX, 2, u64::MAX));
    assert_eq!(classifier.usage(), result.usage);

    let mut total = Usage::new(u64::MAX, u64::MAX, u64::MAX);
    total += Usage::new(1, 1, 1);
    assert_eq!(total, Usage::new(u64::MAX, u64::MAX, u64::MAX));
}
