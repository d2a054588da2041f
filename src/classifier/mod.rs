//! 自然语言分类（Natural Language Classifier）：训练分类器并对短文本分类。
//!
//! Train classifiers from CSV data and classify short phrases against them.

mod client;
mod types;

pub use client::NaturalLanguageClassifier;
pub use types::{ClassScore, Classification, Classifier, ClassifierStatus, TrainingMetadata};
