//! Built-in configuration for the Adult income dataset

use casebase_core::Case;
use casebase_similarity::WeightTable;

/// Label column of the income dataset
pub const INCOME_LABEL: &str = "income";

/// Columns removed before building the income collection
pub const INCOME_DROPPED_COLUMNS: [&str; 4] = ["fnlwgt", "education_num", "capital_gain", "capital_loss"];

/// Rows kept from the cleaned income dataset
pub const INCOME_SAMPLE_ROWS: usize = 5000;

/// Per-attribute weights tuned for income prediction
pub fn income_weights() -> WeightTable {
    WeightTable::new()
        .with("education", 1.8)
        .with("occupation", 1.6)
        .with("age", 1.4)
        .with("hours_per_week", 1.4)
        .with("workclass", 1.2)
        .with("marital_status", 1.0)
        .with("relationship", 1.0)
        .with("sex", 0.8)
        .with("race", 0.6)
        .with("native_country", 0.6)
}

/// Demonstration query used when `classify` gets no query file
pub fn income_sample_query() -> Case {
    Case::new()
        .with("age", 20)
        .with("workclass", "Private")
        .with("education", "Masters")
        .with("marital_status", "Married-civ-spouse")
        .with("occupation", "Prof-specialty")
        .with("relationship", "Husband")
        .with("race", "Black")
        .with("sex", "Female")
        .with("hours_per_week", 1)
        .with("native_country", "United-States")
}
