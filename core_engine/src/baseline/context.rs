/// Trailing words of the input, lowercased, used as dictionary keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordContext {
    pub words: Vec<String>,
    pub last_word: String,
    pub last_two: String,
    pub last_three: String,
}

impl WordContext {
    pub fn from_text(text: &str) -> Self {
        let words: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let tail = |n: usize| words[words.len().saturating_sub(n)..].join(" ");
        let last_word = tail(1);
        let last_two = tail(2);
        let last_three = tail(3);

        Self {
            words,
            last_word,
            last_two,
            last_three,
        }
    }

    pub fn token_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
