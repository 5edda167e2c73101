//! Boilerplate lead-in phrases the completion model likes to put in front of
//! its keyword list ("Keywords:", "Answer:", ...).
//!
//! Patterns are data. Defaults cover the phrasings seen so far; deployments add
//! new ones through `KEYWORD_LEAD_INS` without touching the cleanup code.

/// Matched case-sensitively, in this order, against the start of the text.
pub const DEFAULT_LEAD_INS: &[&str] = &[
    "Two-Word Keywords:",
    "Two Word Keywords:",
    "Two-word keywords:",
    "Two word keywords:",
    "two-word keywords:",
    "Two-Words Keywords:",
    "Two Words Keywords:",
    "Two-words keywords:",
    "Two words keywords:",
    "two-words keywords:",
    "Keywords:",
    "Answer:",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadInPatterns {
    patterns: Vec<String>,
}

impl Default for LeadInPatterns {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_LEAD_INS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl LeadInPatterns {
    /// Defaults plus `extra`. Blank and duplicate entries are ignored.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || set.patterns.iter().any(|p| p == pattern) {
                continue;
            }
            set.patterns.push(pattern.to_string());
        }
        set
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Removes lead-ins (and the whitespace around them) from the front of
    /// `text` until none matches.
    pub fn strip_leading<'a>(&self, text: &'a str) -> &'a str {
        let mut rest = text.trim_start();
        loop {
            let stripped = self
                .patterns
                .iter()
                .find_map(|p| rest.strip_prefix(p.as_str()));
            match stripped {
                Some(s) => rest = s.trim_start(),
                None => return rest,
            }
        }
    }
}
