use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{BTreeMap, HashSet};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[a-zA-Z]+").expect("valid regex");
    static ref DEFAULT_TOKENIZER: Tokenizer = Tokenizer::new();
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","also","am","among","an","and","any","are","aren","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","could","couldn",
            "d","did","didn","do","does","doesn","doing","don","down","during",
            "each","either","else","ever","every",
            "few","for","from","further",
            "had","hadn","has","hasn","have","haven","having","he","her","here","hers","herself","him","himself","his","how","however",
            "i","if","in","into","is","isn","it","its","itself",
            "just","ll","m","ma","may","me","might","mightn","more","most","must","mustn","my","myself",
            "needn","neither","no","nor","not","now",
            "o","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "re","s","same","shall","shan","she","should","shouldn","since","so","some","such",
            "t","than","that","the","their","theirs","them","themselves","then","there","therefore","these","they","this","those","though","through","thus","to","too",
            "under","until","up","upon","us",
            "ve","very","via",
            "was","wasn","we","were","weren","what","when","where","whether","which","while","who","whom","why","will","with","within","without","won","would","wouldn",
            "y","yet","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Reduces a lowercase word to its indexing stem.
pub trait Stem: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Snowball (Porter2) English stemmer.
pub struct SnowballStemmer(Stemmer);

impl SnowballStemmer {
    pub fn english() -> Self { Self(Stemmer::create(Algorithm::English)) }
}

impl Default for SnowballStemmer {
    fn default() -> Self { Self::english() }
}

impl Stem for SnowballStemmer {
    fn stem(&self, word: &str) -> String { self.0.stem(word).into_owned() }
}

/// Leaves words untouched; useful when terms must stay readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStemmer;

impl Stem for IdentityStemmer {
    fn stem(&self, word: &str) -> String { word.to_string() }
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

pub fn stopword_count() -> usize { STOPWORDS.len() }

/// Splits text into ASCII letter runs, lowercases, drops stopwords and stems.
pub struct Tokenizer {
    stemmer: Box<dyn Stem>,
}

impl Tokenizer {
    pub fn new() -> Self { Self::with_stemmer(SnowballStemmer::english()) }

    pub fn with_stemmer<S: Stem + 'static>(stemmer: S) -> Self {
        Self { stemmer: Box::new(stemmer) }
    }

    /// Stems in left-to-right order, duplicates retained.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        WORD.find_iter(text)
            .map(|m| m.as_str().to_ascii_lowercase())
            .filter(|word| !is_stopword(word))
            .map(|word| self.stemmer.stem(&word))
            .collect()
    }

    /// Folds the normalized stems into raw counts.
    pub fn term_frequencies(&self, text: &str) -> BTreeMap<String, u32> {
        let mut freqs = BTreeMap::new();
        for term in self.normalize(text) {
            *freqs.entry(term).or_insert(0) += 1;
        }
        freqs
    }
}

impl Default for Tokenizer {
    fn default() -> Self { Self::new() }
}

/// Normalize with the default Snowball English tokenizer.
pub fn normalize(text: &str) -> Vec<String> { DEFAULT_TOKENIZER.normalize(text) }
