/// Replaces the final space-separated segment of `text` with `word` and
/// appends one trailing space.
///
/// Splitting is on single `' '` characters, so a text that already ends in a
/// space has an empty final segment and the word is appended after it:
/// `"hello wor"` becomes `"hello world "`, `"hello "` becomes `"hello world "`.
pub fn replace_last_word(text: &str, word: &str) -> String {
    let mut segments: Vec<&str> = text.split(' ').collect();
    if let Some(last) = segments.last_mut() {
        *last = word;
    }
    let mut rewritten = segments.join(" ");
    rewritten.push(' ');
    rewritten
}
