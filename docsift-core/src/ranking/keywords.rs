use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LONG_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{4,}\b").unwrap());

/// Common English function words
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "must", "can", "shall", "need", "this",
    "that", "these", "those", "it", "its", "as", "if", "then", "than", "so", "such", "no", "not",
    "only", "own", "same", "too", "very", "just", "also", "now", "here", "there", "when", "where",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "any",
    "into", "through", "during", "before", "after", "above", "below", "up", "down", "out", "off",
    "over", "under", "again", "further", "once", "he", "she", "they", "we", "you", "i", "me", "my",
    "your", "his", "her", "him", "their", "them", "our", "which", "who", "whom", "what", "whose",
    "about", "while", "between", "among", "without", "within", "against", "upon", "like", "even",
    "many", "much", "use", "used", "using", "get", "got", "let", "lets", "see",
];

/// Words that describe document structure rather than content
pub const STRUCTURAL_WORDS: &[&str] = &[
    "page", "pages", "section", "table", "figure", "figures", "appendix", "chapter", "introduction",
    "summary", "conclusion", "background", "abstract", "overview", "results", "discussion",
    "references", "acknowledgements", "contents", "history", "version", "document", "title",
];

const TECHNICAL: &[&str] = &["implementation", "architecture", "system", "design", "requirements"];
const BUSINESS: &[&str] = &["strategy", "market", "revenue", "growth", "opportunity"];
const TOURISM: &[&str] = &[
    "attractions",
    "accommodation",
    "activities",
    "travel",
    "experience",
    "food",
    "local",
    "culture",
];
const EDUCATION: &[&str] = &["learning", "curriculum", "students", "teaching", "assessment"];

/// Shortest task token kept
const MIN_TASK_TERM_CHARS: usize = 3;

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

fn is_structural(word: &str) -> bool {
    STRUCTURAL_WORDS.contains(&word)
}

/// Most frequent content words of four or more characters.
///
/// Returns at most `top_n` words by descending frequency (ties keep first
/// occurrence order), followed by each `extra` term not already listed.
/// Extra terms are never filtered as stopwords.
pub fn extract_keywords(text: &str, top_n: usize, extra: &[String]) -> Vec<String> {
    let lowered = text.to_lowercase();
    let extra_lower: Vec<String> = extra.iter().map(|e| e.to_lowercase()).collect();

    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for word in LONG_WORD.find_iter(&lowered).map(|m| m.as_str()) {
        let exempt = extra_lower.iter().any(|e| e == word);
        if !exempt && (is_stopword(word) || is_structural(word)) {
            continue;
        }
        match index.get(word) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(word.to_string(), order.len());
                order.push((word.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    let mut keywords: Vec<String> = order.into_iter().take(top_n).map(|(w, _)| w).collect();
    for term in extra_lower {
        if !keywords.contains(&term) {
            keywords.push(term);
        }
    }
    keywords
}

/// Content terms of the task description
pub fn task_keywords(task: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in task.to_lowercase().split_whitespace() {
        let term = token.trim_matches(|c: char| !c.is_alphanumeric());
        if term.chars().count() < MIN_TASK_TERM_CHARS || is_stopword(term) {
            continue;
        }
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Fixed vocabulary for a known domain; unknown domains contribute nothing
pub fn domain_keywords(domain: &str) -> Vec<String> {
    let terms: &[&str] = match domain.trim().to_lowercase().as_str() {
        "technical" => TECHNICAL,
        "business" => BUSINESS,
        "tourism" => TOURISM,
        "education" => EDUCATION,
        _ => &[],
    };
    terms.iter().map(|t| t.to_string()).collect()
}

/// Read-only term set shared by every section during one ranking run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Task terms first, then domain terms, then document keywords; duplicates dropped
    pub fn build(task: &str, domain: Option<&str>, document_keywords: &[String]) -> Self {
        let mut set = Self::default();
        set.extend(task_keywords(task));
        if let Some(domain) = domain {
            set.extend(domain_keywords(domain));
        }
        set.extend(document_keywords.iter().cloned());
        set
    }

    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.extend(terms.into_iter().map(Into::into));
        set
    }

    fn extend(&mut self, terms: impl IntoIterator<Item = String>) {
        for term in terms {
            let term = term.to_lowercase();
            if !term.is_empty() && !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_order_with_first_seen_ties() {
        let text = "Harbor tours. Harbor cruises. Castle tours and castle gardens, harbor views.";
        let keywords = extract_keywords(text, 3, &[]);
        assert_eq!(keywords, vec!["harbor", "tours", "castle"]);
    }

    #[test]
    fn drops_short_and_stop_words() {
        let keywords = extract_keywords("This page is about the city and its bay", 10, &[]);
        assert_eq!(keywords, vec!["city"]);
    }

    #[test]
    fn extra_terms_are_appended_and_exempt() {
        let extra = vec!["summary".to_string(), "Budget".to_string()];
        let keywords = extract_keywords("summary summary museum", 1, &extra);
        assert_eq!(keywords, vec!["summary", "budget"]);
    }

    #[test]
    fn task_terms_are_cleaned() {
        let terms = task_keywords("Plan a trip of 4 days for a group of 10 college friends.");
        assert_eq!(terms, vec!["plan", "trip", "days", "group", "college", "friends"]);
    }

    #[test]
    fn domain_lists() {
        assert!(domain_keywords("Tourism").contains(&"culture".to_string()));
        assert_eq!(domain_keywords("business").len(), 5);
        assert!(domain_keywords("astrology").is_empty());
    }

    #[test]
    fn keyword_set_deduplicates_in_order() {
        let set = KeywordSet::build("Find local food", Some("tourism"), &["food".to_string(), "harbor".to_string()]);
        assert_eq!(&set.terms()[..3], &["find", "local", "food"]);
        assert_eq!(set.terms().iter().filter(|t| *t == "food").count(), 1);
        assert_eq!(set.terms().last().map(String::as_str), Some("harbor"));
    }
}
