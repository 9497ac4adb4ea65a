mod context;
mod mixing;
mod patterns;

pub use context::WordContext;
pub use mixing::{clean_completion, merge_suggestions, MAX_SUGGESTIONS};
pub use patterns::{Candidates, PATTERN_WIDTH, PHRASE_PATTERNS, WORD_PATTERNS};

use patterns::{
    INTERROGATIVE, LONG_CLAUSE, MEDIUM_CLAUSE, QUESTION_WORDS, SHORT_CLAUSE, SINGLE_TOKEN,
};

/// Dictionary and heuristic suggestions for `text`, independent of any model.
///
/// Precedence, first hit wins: last three words as a phrase key, last two
/// words as a phrase key, last word as a word key, question heuristics, then
/// a list picked by token count. Blank text yields an empty list; any other
/// text yields exactly [`PATTERN_WIDTH`] words.
pub fn rule_based_suggestions(text: &str) -> &'static [&'static str] {
    let ctx = WordContext::from_text(text);
    if ctx.is_empty() {
        return &[];
    }

    if let Some(list) = PHRASE_PATTERNS.get(ctx.last_three.as_str()) {
        return list;
    }
    if let Some(list) = PHRASE_PATTERNS.get(ctx.last_two.as_str()) {
        return list;
    }
    if let Some(list) = WORD_PATTERNS.get(ctx.last_word.as_str()) {
        return list;
    }

    if is_question(text, &ctx) {
        return &INTERROGATIVE;
    }

    match ctx.token_count() {
        1 => &SINGLE_TOKEN,
        2..=3 => &SHORT_CLAUSE,
        4..=7 => &MEDIUM_CLAUSE,
        _ => &LONG_CLAUSE,
    }
}

fn is_question(text: &str, ctx: &WordContext) -> bool {
    text.contains('?')
        || ctx
            .words
            .iter()
            .any(|word| QUESTION_WORDS.contains(&word.as_str()))
}
