//! Cosmetic keyword highlighting for code snippets.
//!
//! This is a best-effort whole-word pass, not a tokenizer. It knows nothing
//! about strings or comments and will happily wrap keyword-shaped text inside
//! either. Documented limitation, kept as-is.

use regex::Regex;

/// Languages the highlighter carries a keyword list for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
}

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "class", "import",
    "export", "async", "await",
];

const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "class",
    "interface", "type", "import", "export", "async", "await",
];

impl Language {
    /// Resolves a language marker of the `language-…` class convention.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "javascript" => Some(Self::JavaScript),
            "typescript" => Some(Self::TypeScript),
            "jsx" => Some(Self::Jsx),
            _ => None,
        }
    }

    /// The fixed keyword list for this language.
    #[must_use]
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            // JSX shares the plain JavaScript list.
            Self::JavaScript | Self::Jsx => JAVASCRIPT_KEYWORDS,
            Self::TypeScript => TYPESCRIPT_KEYWORDS,
        }
    }

    fn keyword_pattern(&self) -> String {
        format!(r"\b(?:{})\b", self.keywords().join("|"))
    }
}

/// Wraps every whole-word keyword occurrence in a highlight marker span.
///
/// The whole list is matched in a single pass so inserted markers are never
/// themselves re-scanned.
#[must_use]
pub fn highlight_keywords(source: &str, language: Language) -> String {
    let Ok(pattern) = Regex::new(&language.keyword_pattern()) else {
        return source.to_string();
    };
    pattern
        .replace_all(source, "<span class=\"keyword\">$0</span>")
        .into_owned()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
