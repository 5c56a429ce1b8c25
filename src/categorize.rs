//! Keyword-driven headline classification.
//!
//! Categories are tried in display order (fallback excluded) and, within a
//! category, keywords are tried in table order. The first hit wins.
//!
//! Two matching rules apply depending on the keyword's script:
//!
//! - ASCII keywords must stand as whole space-delimited words (or phrases) in
//!   the lower-cased title, so `ai` does not fire inside `detail`.
//! - Keywords containing any non-ASCII character are plain substring tests on
//!   the original title; ideographic scripts have no spaces between words.

use crate::config::KeywordTable;
use crate::models::Category;

/// A compiled keyword table. Cheap to share by reference across the run.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(Category, Vec<Keyword>)>,
}

#[derive(Debug, Clone)]
enum Keyword {
    /// Lower-cased ASCII word or phrase, matched on word boundaries.
    Word(String),
    /// Matched verbatim as a substring.
    Glyphs(String),
}

impl Keyword {
    fn compile(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.is_ascii() {
            Some(Keyword::Word(raw.to_ascii_lowercase()))
        } else {
            Some(Keyword::Glyphs(raw.to_string()))
        }
    }

    fn matches(&self, title: &Title<'_>) -> bool {
        match self {
            Keyword::Word(word) => {
                title.padded.contains(&format!(" {word} "))
                    || title.lowered.starts_with(&format!("{word} "))
                    || title.lowered.ends_with(&format!(" {word}"))
            }
            Keyword::Glyphs(glyphs) => title.raw.contains(glyphs.as_str()),
        }
    }
}

/// The forms of a title that keyword matching needs, computed once.
struct Title<'a> {
    raw: &'a str,
    lowered: String,
    padded: String,
}

impl<'a> Title<'a> {
    fn new(raw: &'a str) -> Self {
        let lowered = raw.to_lowercase();
        let padded = format!(" {lowered} ");
        Self {
            raw,
            lowered,
            padded,
        }
    }
}

impl Categorizer {
    pub fn new(table: &KeywordTable) -> Self {
        let rules = Category::prioritized()
            .map(|category| {
                let keywords: Vec<Keyword> = table
                    .get(&category)
                    .map(|words| words.iter().filter_map(|w| Keyword::compile(w)).collect())
                    .unwrap_or_default();
                (category, keywords)
            })
            .collect();
        Self { rules }
    }

    /// Classify a headline. Never fails; unmatched titles fall back to
    /// [`Category::Other`].
    pub fn categorize(&self, title: &str) -> Category {
        let title = Title::new(title);
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| k.matches(&title)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn table(entries: &[(Category, &[&str])]) -> KeywordTable {
        entries
            .iter()
            .map(|(c, words)| (*c, words.iter().map(|w| w.to_string()).collect()))
            .collect()
    }

    fn default_categorizer() -> Categorizer {
        Categorizer::new(&AppConfig::default().keywords)
    }

    #[test]
    fn test_ideographic_keyword_matches_anywhere() {
        let c = default_categorizer();
        assert_eq!(c.categorize("人工智能改变世界格局"), Category::Ai);
        assert_eq!(c.categorize("世界格局因人工智能改变"), Category::Ai);
        assert_eq!(c.categorize("今日股市大幅上涨"), Category::Finance);
        assert_eq!(c.categorize("国家队足球比赛结果"), Category::Sports);
    }

    #[test]
    fn test_ascii_keyword_needs_word_boundary() {
        let c = Categorizer::new(&table(&[(Category::Ai, &["AI"])]));
        assert_eq!(c.categorize("MORE DETAIL EMERGES"), Category::Other);
        assert_eq!(c.categorize("Email servers restored"), Category::Other);
        assert_eq!(c.categorize("Why AI matters now"), Category::Ai);
        assert_eq!(c.categorize("AI takes over the newsroom"), Category::Ai);
        assert_eq!(c.categorize("Regulators look hard at AI"), Category::Ai);
    }

    #[test]
    fn test_ascii_matching_ignores_case() {
        let c = Categorizer::new(&table(&[(Category::Tech, &["Technology"])]));
        assert_eq!(c.categorize("new TECHNOLOGY summit opens"), Category::Tech);
    }

    #[test]
    fn test_multi_word_ascii_keyword() {
        let c = default_categorizer();
        assert_eq!(
            c.categorize("Breakthrough in machine learning research"),
            Category::Ai
        );
        assert_eq!(c.categorize("Tariffs spark fresh trade war fears"), Category::International);
    }

    #[test]
    fn test_earlier_category_wins() {
        let c = default_categorizer();
        // "stock" is Finance, "election" is International; Finance is earlier.
        assert_eq!(c.categorize("Stock prices wobble before election"), Category::Finance);
        // "AI" beats "startup".
        assert_eq!(c.categorize("AI startup raises money"), Category::Ai);
    }

    #[test]
    fn test_priority_follows_category_order_not_table_position() {
        let c = Categorizer::new(&table(&[
            (Category::Sports, &["final"]),
            (Category::Tech, &["robot"]),
        ]));
        assert_eq!(c.categorize("robot wins the final"), Category::Tech);
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let c = default_categorizer();
        assert_eq!(c.categorize("Local bakery wins regional prize"), Category::Other);
        assert_eq!(c.categorize(""), Category::Other);
    }

    #[test]
    fn test_non_ascii_keyword_is_case_sensitive() {
        let c = Categorizer::new(&table(&[(Category::Ai, &["AI智能"])]));
        assert_eq!(c.categorize("新一代AI智能手机"), Category::Ai);
        assert_eq!(c.categorize("新一代ai智能手机"), Category::Other);
    }

    #[test]
    fn test_empty_table_always_falls_back() {
        let c = Categorizer::new(&KeywordTable::new());
        assert_eq!(c.categorize("AI stock election football"), Category::Other);
    }
}
