//! Keyword extraction from free text.
//!
//! Turns an unstructured job posting into a bounded [`KeywordSet`] that the
//! retriever uses as its query.
//!
//! # Algorithm
//!
//! 1. Lower-case the text.
//! 2. Collect every vocabulary term that occurs as a substring, in
//!    vocabulary order.
//! 3. Split the text into alphabetic words of at least
//!    [`MIN_WORD_LEN`] characters, drop stop words, and keep the first
//!    `max_generic` unique survivors in text order.
//! 4. Concatenate (2) and (3), deduplicate, and cap at `max_keywords`
//!    (never more than [`KeywordSet::MAX_LEN`]).
//!
//! # Example
//!
//! ```rust
//! use folio_core::keywords::extract_keywords;
//!
//! let set = extract_keywords("Senior Python engineer, FastAPI and Docker on AWS");
//! assert!(set.contains("python"));
//! assert!(set.contains("fastapi"));
//! assert!(set.len() <= 20);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::Serialize;

/// Minimum character length of a generic (non-vocabulary) keyword.
pub const MIN_WORD_LEN: usize = 3;

/// Default bound on generic words kept after stop-word filtering.
pub const DEFAULT_MAX_GENERIC: usize = 15;

/// Keywords substituted by callers when extraction finds nothing.
pub const FALLBACK_KEYWORDS: [&str; 3] = ["general", "software", "development"];

/// Built-in domain vocabulary, matched as substrings of the lower-cased text.
pub static DEFAULT_VOCABULARY: &[&str] = &[
    // languages
    "python",
    "javascript",
    "typescript",
    "java",
    "kotlin",
    "swift",
    "rust",
    "golang",
    "c++",
    "c#",
    "ruby",
    "php",
    "scala",
    "sql",
    // web and mobile
    "react native",
    "react",
    "angular",
    "vue",
    "next.js",
    "node.js",
    "nodejs",
    "django",
    "flask",
    "fastapi",
    "spring",
    "rails",
    "laravel",
    ".net",
    "graphql",
    "rest api",
    "flutter",
    "android",
    "ios",
    "html",
    "css",
    "tailwind",
    // data and ml
    "machine learning",
    "deep learning",
    "data science",
    "data engineering",
    "nlp",
    "computer vision",
    "llm",
    "pytorch",
    "tensorflow",
    "scikit-learn",
    "pandas",
    "spark",
    "airflow",
    "kafka",
    // storage
    "postgresql",
    "postgres",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "dynamodb",
    "snowflake",
    // cloud and ops
    "aws",
    "azure",
    "gcp",
    "google cloud",
    "docker",
    "kubernetes",
    "terraform",
    "ansible",
    "jenkins",
    "ci/cd",
    "devops",
    "microservices",
    "serverless",
    "linux",
    // practice
    "agile",
    "scrum",
    "kanban",
    "tdd",
    "blockchain",
    "magento",
    "shopify",
    "wordpress",
    "salesforce",
];

static STOP_WORDS_LIST: &[&str] = &[
    // English function words
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cannot", "could", "did", "didn", "do", "does", "doesn", "doing",
    "don", "down", "during", "each", "either", "else", "etc", "ever", "every", "few", "for",
    "from", "further", "get", "gets", "getting", "got", "had", "has", "have", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "isn", "it", "its", "itself", "just", "let", "like", "made", "make", "many",
    "may", "me", "might", "more", "most", "much", "must", "my", "myself", "need", "needs", "no",
    "nor", "not", "now", "of", "off", "often", "on", "once", "one", "only", "or", "other", "our",
    "ours", "ourselves", "out", "over", "own", "per", "plus", "same", "shall", "she", "should",
    "since", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "thus", "to",
    "too", "under", "until", "up", "upon", "us", "use", "used", "using", "very", "via", "was",
    "wasn", "we", "well", "were", "weren", "what", "when", "where", "whether", "which", "while",
    "who", "whom", "whose", "why", "will", "with", "within", "without", "won", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
    // job-posting boilerplate
    "ability", "able", "apply", "applicant", "applicants", "application", "benefits", "best",
    "candidate", "candidates", "career", "careers", "closely", "company", "competitive",
    "consider", "day", "days", "degree", "demonstrated", "description", "desired", "equal",
    "employer", "employment", "environment", "excellent", "experience", "experienced",
    "familiarity", "fast", "full", "global", "good", "great", "help", "highly", "ideal", "join",
    "job", "key", "knowledge", "least", "level", "looking", "minimum", "new", "offer", "offers",
    "opportunity", "paced", "plus", "position", "preferred", "proficiency", "proficient",
    "qualifications", "related", "required", "requirement", "requirements", "responsibilities",
    "responsible", "role", "salary", "seeking", "senior", "skills", "solid", "strong", "team",
    "teams", "time", "understanding", "want", "way", "work", "working", "world", "year",
    "years",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS_LIST.iter().copied().collect());

/// Returns `true` if `word` (already lower-cased) is a built-in stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Ordered, deduplicated, lower-case keyword list, at most
/// [`KeywordSet::MAX_LEN`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub const MAX_LEN: usize = 20;

    /// Build a set from arbitrary terms, normalizing each one.
    ///
    /// Terms are trimmed and lower-cased; empty terms and repeats are
    /// dropped and the result is capped at [`Self::MAX_LEN`].
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for term in terms {
            if set.0.len() >= Self::MAX_LEN {
                break;
            }
            set.push(term.as_ref().trim().to_lowercase());
        }
        set
    }

    /// The generic set callers substitute when extraction yields nothing.
    pub fn fallback() -> Self {
        Self::from_terms(FALLBACK_KEYWORDS)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.iter().any(|t| t == term)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Single query string: the keywords joined by spaces.
    pub fn to_query_string(&self) -> String {
        self.0.join(" ")
    }

    fn push(&mut self, term: String) -> bool {
        if term.is_empty() || self.0.contains(&term) {
            return false;
        }
        self.0.push(term);
        true
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Configurable keyword extractor.
///
/// [`KeywordExtractor::default`] uses [`DEFAULT_VOCABULARY`], the built-in
/// stop words, [`DEFAULT_MAX_GENERIC`], and a cap of [`KeywordSet::MAX_LEN`].
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    vocabulary: Vec<String>,
    max_generic: usize,
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|t| t.to_string()).collect(),
            max_generic: DEFAULT_MAX_GENERIC,
            max_keywords: KeywordSet::MAX_LEN,
        }
    }
}

impl KeywordExtractor {
    /// Build an extractor with extra vocabulary terms appended to the defaults.
    ///
    /// `max_keywords` is clamped to [`KeywordSet::MAX_LEN`].
    pub fn new<I, S>(extra_vocabulary: I, max_generic: usize, max_keywords: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extractor = Self::default();
        for term in extra_vocabulary {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !extractor.vocabulary.contains(&term) {
                extractor.vocabulary.push(term);
            }
        }
        extractor.max_generic = max_generic;
        extractor.max_keywords = max_keywords.min(KeywordSet::MAX_LEN);
        extractor
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Extract keywords from `text`. Empty or blank text yields an empty set.
    pub fn extract(&self, text: &str) -> KeywordSet {
        let lowered = text.to_lowercase();
        if lowered.trim().is_empty() {
            return KeywordSet::default();
        }

        let mut set = KeywordSet::default();

        for term in &self.vocabulary {
            if set.len() >= self.max_keywords {
                return set;
            }
            if lowered.contains(term.as_str()) {
                set.push(term.clone());
            }
        }

        // only words that actually join the set count toward max_generic
        let mut generic = 0;
        for word in lowered.split(|c: char| !c.is_alphabetic()) {
            if set.len() >= self.max_keywords || generic >= self.max_generic {
                break;
            }
            if word.chars().count() < MIN_WORD_LEN || is_stop_word(word) {
                continue;
            }
            if set.push(word.to_string()) {
                generic += 1;
            }
        }

        set
    }

    /// Like [`extract`](Self::extract), but substitutes
    /// [`KeywordSet::fallback`] when nothing is found.
    ///
    /// The returned flag is `true` when the fallback set was used.
    pub fn extract_or_fallback(&self, text: &str) -> (KeywordSet, bool) {
        let set = self.extract(text);
        if set.is_empty() {
            (KeywordSet::fallback(), true)
        } else {
            (set, false)
        }
    }
}

/// Extract keywords with the default extractor.
pub fn extract_keywords(text: &str) -> KeywordSet {
    static DEFAULT: LazyLock<KeywordExtractor> = LazyLock::new(KeywordExtractor::default);
    DEFAULT.extract(text)
}
