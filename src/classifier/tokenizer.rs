//! Text tokenization for the TF-IDF vectorizer

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// English stop words dropped before n-grams are formed
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static token pattern is valid"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Word tokenizer producing the n-gram terms the vectorizer counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tokenizer {
    pub lowercase: bool,
    pub remove_stop_words: bool,
    /// Inclusive n-gram range (min_n, max_n)
    pub ngram_range: (usize, usize),
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stop_words: true,
            ngram_range: (1, 2),
        }
    }
}

impl Tokenizer {
    /// Split text into word tokens of two or more word characters
    pub fn words(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        token_pattern()
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|w| !self.remove_stop_words || !stop_words().contains(w))
            .map(str::to_string)
            .collect()
    }

    /// Produce all n-gram terms for the configured range, in document order
    pub fn terms(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        let (min_n, max_n) = self.ngram_range;
        let min_n = min_n.max(1);
        let mut terms = Vec::new();

        for n in min_n..=max_n {
            if n > words.len() {
                break;
            }
            terms.extend(words.windows(n).map(|w| w.join(" ")));
        }

        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_lowercase_and_stop_words() {
        let tokenizer = Tokenizer::default();
        let words = tokenizer.words("I feel SAD and I am Tired all the time");
        assert_eq!(words, vec!["feel", "sad", "tired", "time"]);
    }

    #[test]
    fn test_single_characters_are_dropped() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.words("a b c panic"), vec!["panic"]);
    }

    #[test]
    fn test_terms_include_bigrams() {
        let tokenizer = Tokenizer::default();
        let terms = tokenizer.terms("racing heart sweating");
        assert_eq!(
            terms,
            vec![
                "racing",
                "heart",
                "sweating",
                "racing heart",
                "heart sweating"
            ]
        );
    }

    #[test]
    fn test_unigram_only_range() {
        let tokenizer = Tokenizer {
            ngram_range: (1, 1),
            ..Tokenizer::default()
        };
        assert_eq!(tokenizer.terms("constant worry"), vec!["constant", "worry"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(Tokenizer::default().terms("").is_empty());
    }
}
