use crate::config::PronunciationRule;

/// Built-in corrections, applied in this order
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("Palantir", "팔란티어"),
    ("palantir", "팔란티어"),
    // common mis-rendering from the script model
    ("팔란터", "팔란티어"),
    ("AI", "에이아이"),
    ("GPT", "지피티"),
    ("LLM", "엘엘엠"),
];

/// Rewrites terms the speech model mispronounces into Hangul.
///
/// Rules are plain substring replacements run once each, in declaration order, so a later
/// rule sees the output of the earlier ones. Matches inside longer words are replaced too.
#[derive(Debug, Clone, PartialEq)]
pub struct PronunciationNormalizer {
    rules: Vec<(String, String)>,
}

impl PronunciationNormalizer {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(term, replacement)| (term.to_string(), replacement.to_string()))
                .collect(),
        }
    }

    /// Built-in table followed by `extra` rules
    pub fn with_rules(extra: &[PronunciationRule]) -> Self {
        let mut normalizer = Self::new();
        normalizer.rules.extend(
            extra
                .iter()
                .filter(|rule| !rule.term.is_empty())
                .map(|rule| (rule.term.clone(), rule.replacement.clone())),
        );
        normalizer
    }

    pub fn normalize(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (term, replacement)| {
                acc.replace(term.as_str(), replacement)
            })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PronunciationNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
