use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::history::HistoryQuerySpec;

/// Ordered rule tables for query classification. Deliberately shallow:
/// substring containment over fixed keyword lists, no scoring.
const HISTORY_KEYWORDS: &[&str] = &[
    "browser history",
    "visited sites",
    "recent tabs",
    "history",
    "my history",
    "what did i visit",
];

const SAD_WORDS: &[&str] = &["sad", "depressed", "tired", "stressed", "lonely"];
const HAPPY_WORDS: &[&str] = &["happy", "excited", "great", "fun", "love"];
const ANGRY_WORDS: &[&str] = &["angry", "frustrated", "annoyed", "upset"];

const COMPARE_KEYWORDS: &[&str] = &["compare", "vs", "difference between", "pros and cons"];
const EXAMPLE_KEYWORDS: &[&str] = &["example", "analogy", "illustrate"];
const CONNECTION_KEYWORDS: &[&str] = &["connect", "relation", "linked", "association"];

const DEEP_ANSWER_TRIGGERS: &[&str] = &[
    "explain",
    "how",
    "why",
    "step",
    "details",
    "example",
    "in-depth",
    "deep",
    "more info",
    "what is",
    "elaborate",
    "tell me more",
    "go deeper",
    "walk me through",
    "full explanation",
    "detailed",
    "clarify",
    "expand on",
    "break it down",
    "overview",
    "help me understand",
    "simplify",
    "teach me",
    "fundamentals of",
    "meaning of",
    "from scratch",
    "what do you mean",
    "how does it work",
];

const KEYWORD_MARKERS: &[&str] = &["about ", "containing ", "mentioning "];
const DATE_MARKER_WORDS: &[&str] = &["today", "yesterday", "since", "after", "last"];

pub fn is_history_query(query: &str) -> bool {
    let lowered = query.to_lowercase();
    let matched = HISTORY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword));
    debug!(matched, "classified query for history-relatedness");
    matched
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Sad,
    Happy,
    Angry,
    Neutral,
}

impl Sentiment {
    pub fn tone(self) -> &'static str {
        match self {
            Self::Sad => "empathetic and kind",
            Self::Happy => "excited and cheerful",
            Self::Angry => "calm and understanding",
            Self::Neutral => "friendly and informative",
        }
    }
}

pub fn detect_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    if SAD_WORDS.iter().any(|word| lowered.contains(word)) {
        Sentiment::Sad
    } else if HAPPY_WORDS.iter().any(|word| lowered.contains(word)) {
        Sentiment::Happy
    } else if ANGRY_WORDS.iter().any(|word| lowered.contains(word)) {
        Sentiment::Angry
    } else {
        Sentiment::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Compare,
    Examples,
    Connections,
    Explore,
    Friendly,
}

pub fn detect_intent(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    if COMPARE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        Intent::Compare
    } else if EXAMPLE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        Intent::Examples
    } else if CONNECTION_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        Intent::Connections
    } else if DEEP_ANSWER_TRIGGERS.iter().any(|kw| lowered.contains(kw)) {
        Intent::Explore
    } else {
        Intent::Friendly
    }
}

pub fn needs_deep_answer(query: &str) -> bool {
    let lowered = query.to_lowercase();
    DEEP_ANSWER_TRIGGERS.iter().any(|kw| lowered.contains(kw))
}

/// Builds the per-request history filters from free-form query text: a
/// quoted phrase or a "about X" tail becomes the keyword, and a handful of
/// relative date phrases become the since-date bound.
pub fn parse_history_query_spec(query: &str, today: NaiveDate) -> HistoryQuerySpec {
    HistoryQuerySpec {
        keyword: extract_keyword(query),
        since: extract_since(query, today),
    }
}

fn extract_keyword(query: &str) -> Option<String> {
    if let Some(quoted) = extract_quoted_phrase(query) {
        return Some(quoted);
    }

    let lowered = query.to_lowercase();
    for marker in KEYWORD_MARKERS {
        if let Some(index) = lowered.find(marker) {
            let tail = &query[index + marker.len()..];
            let keyword = tail
                .split_whitespace()
                .take_while(|word| {
                    let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                    !DATE_MARKER_WORDS.contains(&word.to_lowercase().as_str())
                })
                .collect::<Vec<_>>()
                .join(" ");
            let keyword = keyword.trim_end_matches(['?', '.', '!']).trim();
            if !keyword.is_empty() {
                return Some(keyword.to_string());
            }
        }
    }

    None
}

fn extract_quoted_phrase(query: &str) -> Option<String> {
    let start = query.find('"')?;
    let rest = &query[start + 1..];
    let end = rest.find('"')?;
    let phrase = rest[..end].trim();
    if phrase.is_empty() {
        None
    } else {
        Some(phrase.to_string())
    }
}

fn extract_since(query: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lowered = query.to_lowercase();

    for marker in ["since ", "after "] {
        if let Some(index) = lowered.find(marker) {
            let tail = &lowered[index + marker.len()..];
            if let Some(date_token) = tail.split_whitespace().next()
                && let Ok(date) =
                    NaiveDate::parse_from_str(date_token.trim_end_matches(['?', '.']), "%Y-%m-%d")
            {
                return Some(date);
            }
        }
    }

    if lowered.contains("yesterday") {
        return today.checked_sub_days(Days::new(1));
    }
    if lowered.contains("last week") {
        return today.checked_sub_days(Days::new(7));
    }
    if lowered.contains("today") {
        return Some(today);
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        Intent, Sentiment, detect_intent, detect_sentiment, is_history_query,
        parse_history_query_spec,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn general_knowledge_queries_are_not_history_related() {
        assert!(!is_history_query("What is the capital of France?"));
        assert!(!is_history_query("Tell me a joke"));
    }

    #[test]
    fn history_keywords_match_case_insensitively() {
        assert!(is_history_query("Show my Browser History"));
        assert!(is_history_query("what did I visit yesterday?"));
        assert!(is_history_query("list my recent tabs"));
    }

    #[test]
    fn keyword_filter_comes_from_about_tail_or_quotes() {
        let spec = parse_history_query_spec("show my history about rust", today());
        assert_eq!(spec.keyword.as_deref(), Some("rust"));

        let spec = parse_history_query_spec("search my history for \"type systems\"", today());
        assert_eq!(spec.keyword.as_deref(), Some("type systems"));

        let spec = parse_history_query_spec("show my browser history", today());
        assert_eq!(spec.keyword, None);
    }

    #[test]
    fn date_filters_parse_relative_and_absolute_forms() {
        let spec = parse_history_query_spec("what did i visit yesterday", today());
        assert_eq!(spec.since, NaiveDate::from_ymd_opt(2024, 5, 9));

        let spec = parse_history_query_spec("my history since 2024-05-01", today());
        assert_eq!(spec.since, NaiveDate::from_ymd_opt(2024, 5, 1));

        let spec = parse_history_query_spec("show my browser history", today());
        assert_eq!(spec.since, None);
    }

    #[test]
    fn keyword_stops_before_date_words() {
        let spec = parse_history_query_spec("my history about rust yesterday", today());
        assert_eq!(spec.keyword.as_deref(), Some("rust"));
        assert_eq!(spec.since, NaiveDate::from_ymd_opt(2024, 5, 9));
    }

    #[test]
    fn sentiment_rules_are_ordered() {
        assert_eq!(detect_sentiment("I'm so stressed out"), Sentiment::Sad);
        assert_eq!(detect_sentiment("this is great fun"), Sentiment::Happy);
        assert_eq!(detect_sentiment("I'm really annoyed"), Sentiment::Angry);
        assert_eq!(detect_sentiment("what time is it"), Sentiment::Neutral);
        assert_eq!(detect_sentiment("").tone(), "friendly and informative");
    }

    #[test]
    fn intent_falls_back_to_friendly() {
        assert_eq!(detect_intent("compare rust vs go"), Intent::Compare);
        assert_eq!(detect_intent("give me an example"), Intent::Examples);
        assert_eq!(detect_intent("explain lifetimes"), Intent::Explore);
        assert_eq!(detect_intent("hi there"), Intent::Friendly);
    }
}
