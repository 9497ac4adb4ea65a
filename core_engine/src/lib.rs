//! Offline half of the next-word assistant: the static pattern dictionary,
//! the rule-based fallback list and the merge that puts a model's guess in
//! front of it.

pub mod baseline;
pub mod input;

pub use baseline::{
    clean_completion, merge_suggestions, rule_based_suggestions, WordContext, MAX_SUGGESTIONS,
};
pub use input::replace_last_word;
