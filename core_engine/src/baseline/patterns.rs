use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Every dictionary entry proposes exactly this many words.
pub const PATTERN_WIDTH: usize = 5;

pub type Candidates = [&'static str; PATTERN_WIDTH];

/// Two- and three-word context keys. Multi-word keys are consulted before
/// [`WORD_PATTERNS`].
pub static PHRASE_PATTERNS: Lazy<HashMap<&'static str, Candidates>> = Lazy::new(|| {
    HashMap::from([
        ("i am", ["going", "feeling", "thinking", "working", "studying"]),
        ("i will", ["be", "go", "make", "call", "send"]),
        ("you are", ["going", "welcome", "right", "amazing", "invited"]),
        ("this is", ["a", "the", "my", "our", "very"]),
        ("that was", ["amazing", "great", "wonderful", "terrible", "unexpected"]),
        ("how are", ["you", "things", "they", "we", "the"]),
        ("what is", ["the", "your", "this", "that", "happening"]),
        ("where is", ["the", "my", "your", "he", "she"]),
        ("when will", ["you", "we", "they", "it", "the"]),
        ("good morning", ["everyone", "sir", "madam", "to", "and"]),
        ("thank you", ["very", "so", "for", "again", "all"]),
        ("how do", ["you", "I", "we", "they", "people"]),
        ("what do", ["you", "I", "we", "they", "people"]),
        ("i want", ["to", "a", "the", "you", "some"]),
        ("i need", ["to", "a", "the", "you", "some"]),
        ("i have", ["a", "the", "to", "been", "never"]),
        ("we are", ["going", "working", "learning", "building", "creating"]),
        ("they are", ["going", "working", "learning", "building", "coming"]),
        ("it is", ["a", "the", "very", "really", "not"]),
        ("there are", ["many", "some", "a", "no", "several"]),
        ("there is", ["a", "the", "no", "something", "nothing"]),
        ("in the", ["morning", "afternoon", "evening", "future", "past"]),
        ("on the", ["table", "ground", "way", "other", "phone"]),
        ("at the", ["same", "end", "beginning", "moment", "time"]),
        ("for the", ["first", "last", "next", "same", "best"]),
        ("with the", ["help", "same", "new", "old", "right"]),
        ("of the", ["world", "year", "day", "time", "people"]),
        ("to the", ["right", "left", "top", "bottom", "end"]),
        ("from the", ["beginning", "start", "end", "top", "bottom"]),
    ])
});

/// Single last-word keys.
pub static WORD_PATTERNS: Lazy<HashMap<&'static str, Candidates>> = Lazy::new(|| {
    HashMap::from([
        ("the", ["best", "first", "last", "next", "most"]),
        ("a", ["great", "good", "new", "big", "small"]),
        ("an", ["amazing", "excellent", "important", "interesting", "incredible"]),
        ("i", ["am", "will", "can", "want", "think"]),
        ("you", ["are", "can", "will", "should", "might"]),
        ("we", ["are", "will", "can", "should", "have"]),
        ("they", ["are", "will", "can", "have", "were"]),
        ("he", ["is", "was", "will", "can", "has"]),
        ("she", ["is", "was", "will", "can", "has"]),
        ("it", ["is", "was", "will", "can", "has"]),
        ("and", ["the", "I", "we", "they", "it"]),
        ("or", ["the", "a", "maybe", "perhaps", "not"]),
        ("but", ["I", "we", "they", "it", "the"]),
        ("so", ["I", "we", "they", "it", "the"]),
        ("if", ["you", "I", "we", "they", "it"]),
        ("when", ["I", "you", "we", "they", "it"]),
        ("where", ["I", "you", "we", "they", "it"]),
        ("why", ["I", "you", "we", "they", "it"]),
        ("how", ["I", "you", "we", "they", "it"]),
        ("what", ["I", "you", "we", "they", "it"]),
        ("who", ["I", "you", "we", "they", "it"]),
        ("to", ["the", "be", "go", "see", "make"]),
        ("in", ["the", "a", "my", "this", "order"]),
        ("for", ["the", "a", "me", "you", "us"]),
        ("with", ["the", "a", "my", "you", "me"]),
        ("on", ["the", "a", "my", "this", "top"]),
        ("at", ["the", "a", "my", "this", "least"]),
        ("by", ["the", "a", "my", "this", "me"]),
        ("from", ["the", "a", "my", "this", "here"]),
        ("up", ["to", "the", "and", "with", "on"]),
        ("out", ["of", "to", "and", "with", "on"]),
        ("down", ["to", "the", "and", "with", "on"]),
        ("off", ["to", "the", "and", "with", "of"]),
        ("over", ["the", "and", "to", "here", "there"]),
        ("under", ["the", "and", "to", "here", "there"]),
        ("again", ["and", "to", "for", "with", "in"]),
        ("further", ["and", "to", "for", "with", "in"]),
        ("then", ["I", "you", "we", "they", "it"]),
        ("once", ["I", "you", "we", "they", "it"]),
        ("here", ["is", "are", "and", "to", "with"]),
        ("there", ["is", "are", "and", "to", "with"]),
        ("now", ["I", "you", "we", "they", "it"]),
        ("very", ["good", "bad", "important", "interesting", "nice"]),
        ("really", ["good", "bad", "important", "interesting", "nice"]),
        ("quite", ["good", "bad", "important", "interesting", "nice"]),
        ("just", ["a", "the", "like", "about", "now"]),
        ("only", ["a", "the", "one", "two", "few"]),
        ("also", ["a", "the", "very", "really", "quite"]),
        ("still", ["a", "the", "very", "really", "quite"]),
        ("more", ["than", "and", "or", "of", "to"]),
        ("most", ["of", "people", "important", "likely", "recent"]),
        ("good", ["morning", "evening", "night", "day", "luck"]),
        ("bad", ["news", "weather", "day", "luck", "idea"]),
        ("great", ["job", "day", "idea", "news", "work"]),
        ("small", ["business", "house", "car", "dog", "town"]),
        ("big", ["house", "car", "dog", "city", "problem"]),
        ("new", ["car", "house", "job", "idea", "project"]),
        ("old", ["car", "house", "man", "woman", "friend"]),
        ("first", ["time", "day", "step", "thing", "person"]),
        ("last", ["time", "day", "week", "month", "year"]),
        ("next", ["time", "day", "week", "month", "year"]),
        ("right", ["now", "here", "there", "way", "time"]),
        ("wrong", ["way", "time", "place", "person", "answer"]),
        ("best", ["way", "time", "place", "person", "thing"]),
        ("worst", ["way", "time", "place", "person", "thing"]),
    ])
});

/// Question words that switch the fallback to [`INTERROGATIVE`].
pub const QUESTION_WORDS: [&str; 6] = ["what", "where", "when", "why", "how", "who"];

pub const INTERROGATIVE: Candidates = ["is", "are", "do", "does", "will"];
pub const SINGLE_TOKEN: Candidates = ["am", "will", "can", "want", "think"];
pub const SHORT_CLAUSE: Candidates = ["the", "a", "an", "my", "your"];
pub const MEDIUM_CLAUSE: Candidates = ["and", "but", "so", "then", "now"];
pub const LONG_CLAUSE: Candidates = ["that", "which", "where", "when", "because"];
