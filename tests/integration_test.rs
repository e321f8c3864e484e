// Integration tests for casebase
use casebase::dataset::{self, DatasetOptions};
use casebase::presets::{income_sample_query, income_weights};
use casebase::{
    AttributeValue, Case, CaseBase, CaseId, CaseSimilarity, Classifier, DegenerateNumericPolicy,
    Error, Explanation, LeaveOneOut, RetrievalStats, Retriever, SimilarityConfig, WeightTable,
};
use std::io::Write;

const ADULT: &str = "\
age,workclass,fnlwgt,education,education_num,marital_status,occupation,relationship,race,sex,capital_gain,capital_loss,hours_per_week,native_country,income
39,State-gov,77516,Bachelors,13,Never-married,Adm-clerical,Not-in-family,White,Male,2174,0,40,United-States,<=50K
50,Self-emp-not-inc,83311,Bachelors,13,Married-civ-spouse,Exec-managerial,Husband,White,Male,0,0,13,United-States,<=50K
38,Private,215646,HS-grad,9,Divorced,Handlers-cleaners,Not-in-family,White,Male,0,0,40,United-States,<=50K
53,Private,234721,11th,7,Married-civ-spouse,Handlers-cleaners,Husband,Black,Male,0,0,40,United-States,<=50K
28,Private,338409,Bachelors,13,Married-civ-spouse,Prof-specialty,Wife,Black,Female,0,0,40,Cuba,<=50K
37,Private,284582,Masters,14,Married-civ-spouse,Exec-managerial,Wife,White,Female,0,0,40,United-States,<=50K
49,Private,160187,9th,5,Married-spouse-absent,Other-service,Not-in-family,Black,Female,0,0,16,Jamaica,<=50K
52,Self-emp-not-inc,209642,HS-grad,9,Married-civ-spouse,Exec-managerial,Husband,White,Male,0,0,45,United-States,>50K
31,Private,45781,Masters,14,Never-married,Prof-specialty,Not-in-family,White,Female,14084,0,50,United-States,>50K
42,Private,159449,Bachelors,13,Married-civ-spouse,Exec-managerial,Husband,White,Male,5178,0,40,United-States,>50K
37,Private,280464,Some-college,10,Married-civ-spouse,Exec-managerial,Husband,Black,Male,0,0,80,United-States,>50K
30,State-gov,141297,Bachelors,13,Married-civ-spouse,Prof-specialty,Husband,Asian-Pac-Islander,Male,0,0,40,India,>50K
23,Private,122272,Bachelors,13,Never-married,Adm-clerical,Own-child,White,Female,0,0,30,United-States,<=50K
32,Private,205019,Assoc-acdm,12,Never-married,Sales,Not-in-family,Black,Male,0,0,50,United-States,<=50K
40,Private,121772,Assoc-voc,11,Married-civ-spouse,Craft-repair,Husband,Asian-Pac-Islander,Male,0,0,40,?,>50K
34,Private,245487,7th-8th,4,Married-civ-spouse,Transport-moving,Husband,Amer-Indian-Eskimo,Male,0,0,45,Mexico,<=50K
";

fn adult() -> CaseBase {
    dataset::load_reader(ADULT.as_bytes(), &DatasetOptions::default()).unwrap()
}

#[test]
fn test_load_income_dataset() {
    let casebase = adult();

    // One row carries a missing native_country
    assert_eq!(casebase.len(), 15);
    assert!(!casebase.contains(&CaseId::from(14u64)));
    assert_eq!(casebase.attributes().len(), 10);
    assert!(!casebase.attributes().iter().any(|a| a == "fnlwgt" || a == "income"));
}

#[test]
fn test_sample_query_classification() {
    let casebase = adult();
    let similarity =
        CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(income_weights())).unwrap();

    let result = Classifier::new(&similarity, 1)
        .unwrap()
        .classify(casebase.view(), &income_sample_query())
        .unwrap()
        .unwrap();

    assert!(casebase.contains(&result.case_id));
    assert!(result.score > 0.0 && result.score <= 1.0);
    assert_eq!(result.breakdown.len(), 10);
    let best = casebase.get(&result.case_id).unwrap();
    assert_eq!(Some(&result.prediction), best.get("income"));
}

#[test]
fn test_weighted_and_unweighted_scores_differ() {
    let casebase = adult();
    let plain = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
    let weighted =
        CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(income_weights())).unwrap();

    let query = income_sample_query();
    let case = casebase.get(&CaseId::from(5u64)).unwrap();
    let a = plain.score(&query, case).unwrap();
    let b = weighted.score(&query, case).unwrap();

    // Same local similarities, different aggregation
    assert_eq!(a.breakdown, b.breakdown);
    let mean = a.breakdown.values().sum::<f64>() / a.breakdown.len() as f64;
    assert!((a.score - mean).abs() < 1e-12);
    assert!((a.score - b.score).abs() > 1e-6);
}

#[test]
fn test_retrieval_is_ordered_and_explained() {
    let casebase = adult();
    let similarity =
        CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(income_weights())).unwrap();
    let retrieval = Retriever::new(&similarity, 5)
        .unwrap()
        .retrieve(casebase.view(), &income_sample_query())
        .unwrap();

    assert_eq!(retrieval.len(), 5);
    assert_eq!(retrieval.candidates(), 15);
    for pair in retrieval.matches().windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let stats = RetrievalStats::compute(&retrieval, &similarity);
    assert_eq!(stats.best_score, retrieval.best().unwrap().score);
    assert!(stats.top_contributing_attribute.is_some());

    for explained in Explanation::from_retrieval(&retrieval, &similarity, false) {
        let total: f64 = explained.attributes.values().map(|c| c.contribution).sum();
        assert!((total - explained.score).abs() < 1e-9);
    }
}

#[test]
fn test_leave_one_out_end_to_end() {
    let casebase = adult();
    let similarity =
        CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(income_weights())).unwrap();

    let report = LeaveOneOut::new(10, 3)
        .unwrap()
        .with_threads(2)
        .unwrap()
        .evaluate(&casebase, &similarity)
        .unwrap();

    assert_eq!(report.tested, 10);
    assert_eq!(report.k, 3);
    assert_eq!(report.collection_size, 15);
    assert!((report.accuracy - report.correct as f64 / 10.0).abs() < 1e-12);

    // The collection is untouched by hold-outs
    assert_eq!(casebase.len(), 15);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tested"], 10);
    assert!(json.get("outcomes").is_none());
}

#[test]
fn test_three_case_hold_out() {
    let casebase = CaseBase::from_cases(
        "income",
        vec![
            ("id1", Case::new().with("education", "Masters").with("income", ">50K")),
            ("id2", Case::new().with("education", "Masters").with("income", ">50K")),
            ("id3", Case::new().with("education", "HS-grad").with("income", "<=50K")),
        ],
    )
    .unwrap();
    let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();

    let report = LeaveOneOut::new(3, 2).unwrap().evaluate(&casebase, &similarity).unwrap();
    assert_eq!(report.correct, 2);
    assert!(!report.outcomes[2].is_correct());
    assert_eq!(report.outcomes[2].predicted, Some(AttributeValue::from(">50K")));
}

#[test]
fn test_query_with_unknown_attribute() {
    let casebase = adult();
    let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();

    let mut query = income_sample_query();
    query.insert("zodiac", "Leo");
    let err = Retriever::new(&similarity, 1)
        .unwrap()
        .retrieve(casebase.view(), &query)
        .unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
    assert_eq!(err.attribute(), Some("zodiac"));
}

#[test]
fn test_weight_for_unknown_attribute() {
    let casebase = adult();
    let weights = income_weights().with("fnlwgt", 2.0);
    let err = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(weights)).unwrap_err();
    assert_eq!(err.attribute(), Some("fnlwgt"));
}

#[test]
fn test_degenerate_numeric_column() {
    let casebase = CaseBase::from_cases(
        "income",
        vec![
            ("a", Case::new().with("capital_loss", 0).with("sex", "Male").with("income", ">50K")),
            ("b", Case::new().with("capital_loss", 0).with("sex", "Female").with("income", "<=50K")),
        ],
    )
    .unwrap();

    let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
    let query = Case::new().with("capital_loss", 0).with("sex", "Female");
    let best = Retriever::new(&similarity, 1)
        .unwrap()
        .retrieve(casebase.view(), &query)
        .unwrap();
    assert_eq!(best.best().unwrap().id, &CaseId::from("b"));

    let strict = SimilarityConfig::unweighted().with_degenerate_numeric(DegenerateNumericPolicy::Reject);
    let err = CaseSimilarity::from_casebase(&casebase, &strict).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(err.attribute(), Some("capital_loss"));
}

#[test]
fn test_weights_from_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"education": 3.0, "age": 0.5}}"#).unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    let weights: WeightTable = serde_json::from_str(&raw).unwrap();
    assert_eq!(weights.get("education"), Some(3.0));

    let casebase = adult();
    let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(weights)).unwrap();
    // Unlisted attributes weigh 1.0
    assert!((similarity.total_weight() - (3.0 + 0.5 + 8.0)).abs() < 1e-12);
}

#[test]
fn test_query_from_json() {
    let query: Case = serde_json::from_str(
        r#"{"age": 20, "workclass": "Private", "education": "Masters", "marital_status": "Married-civ-spouse",
            "occupation": "Prof-specialty", "relationship": "Husband", "race": "Black", "sex": "Female",
            "hours_per_week": 1, "native_country": "United-States"}"#,
    )
    .unwrap();
    assert_eq!(query, income_sample_query());
}

#[test]
fn test_seeded_sample_from_csv_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ADULT.as_bytes()).unwrap();

    let options = DatasetOptions {
        sample_rows: Some(8),
        ..DatasetOptions::default()
    };
    let first = dataset::load_path(file.path(), &options).unwrap();
    let second = dataset::load_path(file.path(), &options).unwrap();
    assert_eq!(first.len(), 8);
    assert_eq!(first.ids(), second.ids());
}

#[test]
fn test_all_rows_missing_gives_empty_collection() {
    let data = "age,workclass,income\n39,?,<=50K\n";
    let casebase = dataset::load_reader(data.as_bytes(), &DatasetOptions::default()).unwrap();
    assert!(casebase.is_empty());

    let err = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(income_weights())).unwrap_err();
    assert_eq!(err, Error::EmptyCaseBase);
    assert_eq!(err.attribute(), None);
}
