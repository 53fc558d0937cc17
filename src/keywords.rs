//! Keyword table for the Jolly dialect
//!
//! Every dialect keyword is described by one declarative row:
//! - the JavaScript text it is rewritten to
//! - its kind: plain, block opener, or dependent on an enclosing opener
//! - an optional context pattern anchored at the start of the code segment
//!
//! The table is built once, owns every compiled pattern the validator and the
//! transformer need, and is never mutated afterwards. Row order matters: the
//! validator tries context patterns in declaration order.

use std::collections::HashMap;

use regex_lite::Regex;
use thiserror::Error;

use crate::error_msg::MisuseKind;
use crate::helpers::is_valid_identifier;

//===========================================================================
// RULES
//===========================================================================

/// Placement class of a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordKind {
    /// Usable anywhere a statement or value is expected
    Plain,
    /// Opens a block; its label is pushed on the block context stack
    Opener,
    /// Only legal while `parent` is the innermost open block
    Dependent { parent: String },
}

/// One row of a keyword table, before its pattern is compiled
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keyword: String,
    pub equivalent: String,
    pub kind: KeywordKind,
    pub pattern: Option<String>,
}

impl KeywordRule {
    pub fn plain(keyword: &str, equivalent: &str) -> Self {
        KeywordRule {
            keyword: keyword.to_string(),
            equivalent: equivalent.to_string(),
            kind: KeywordKind::Plain,
            pattern: None,
        }
    }

    pub fn opener(keyword: &str, equivalent: &str, pattern: &str) -> Self {
        KeywordRule {
            keyword: keyword.to_string(),
            equivalent: equivalent.to_string(),
            kind: KeywordKind::Opener,
            pattern: Some(pattern.to_string()),
        }
    }

    pub fn dependent(keyword: &str, equivalent: &str, parent: &str, pattern: &str) -> Self {
        KeywordRule {
            keyword: keyword.to_string(),
            equivalent: equivalent.to_string(),
            kind: KeywordKind::Dependent { parent: parent.to_string() },
            pattern: Some(pattern.to_string()),
        }
    }
}

/// The built-in Jolly → JavaScript rules, in validation order
pub fn jolly_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::plain("fun", "function"),
        KeywordRule::plain("lock", "const"),
        KeywordRule::plain("free", "let"),
        KeywordRule::plain("fam", "class"),
        KeywordRule::opener("loopy", "for", r"^\s*loopy\s*\("),
        KeywordRule::opener("aslong", "while", r"^\s*aslong\s*\("),
        KeywordRule::opener("when", "if", r"^\s*when\s*\("),
        KeywordRule::dependent("maybe", "else if", "when", r"^\s*(?:\}\s*)?maybe\s*\("),
        KeywordRule::dependent("meh", "else", "when", r"^\s*(?:\}\s*)?meh\s*\{"),
        KeywordRule::plain("yay", "return"),
        KeywordRule::plain("pls", "await"),
        KeywordRule::plain("call", "new"),
        KeywordRule::opener("pick", "switch", r"^\s*pick\s*\("),
        KeywordRule::dependent("option", "case", "pick", r"^\s*option\s+"),
        KeywordRule::dependent("fallback", "default", "pick", r"^\s*fallback\s*:"),
        KeywordRule::plain("bail", "break"),
        KeywordRule::plain("skip", "continue"),
    ]
}

//===========================================================================
// TABLE ERRORS
//===========================================================================

#[derive(Debug, Error)]
pub enum TableError {
    #[error("keyword \"{0}\" is not a valid identifier")]
    InvalidKeyword(String),

    #[error("keyword \"{0}\" is defined more than once")]
    Duplicate(String),

    #[error("keyword \"{keyword}\" requires a context pattern")]
    MissingPattern { keyword: String },

    #[error("keyword \"{keyword}\" depends on \"{parent}\", which is not a block opener in this table")]
    UnknownParent { keyword: String, parent: String },

    #[error("invalid pattern for keyword \"{keyword}\": {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex_lite::Error,
    },
}

//===========================================================================
// KEYWORD SPEC
//===========================================================================

/// Compiled, immutable description of one keyword
#[derive(Debug, Clone)]
pub struct KeywordSpec {
    equivalent: String,
    kind: KeywordKind,
    context: Option<Regex>,
}

impl KeywordSpec {
    pub fn equivalent(&self) -> &str {
        &self.equivalent
    }

    pub fn kind(&self) -> &KeywordKind {
        &self.kind
    }

    pub fn is_block_opener(&self) -> bool {
        self.kind == KeywordKind::Opener
    }

    pub fn dependent_on(&self) -> Option<&str> {
        match &self.kind {
            KeywordKind::Dependent { parent } => Some(parent),
            _ => None,
        }
    }

    pub fn has_context_pattern(&self) -> bool {
        self.context.is_some()
    }

    /// True when the line starts the way this keyword's placement rule expects
    pub fn matches_context(&self, code: &str) -> bool {
        self.context.as_ref().is_some_and(|re| re.is_match(code))
    }
}

//===========================================================================
// KEYWORD TABLE
//===========================================================================

#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(String, KeywordSpec)>,
    index: HashMap<String, usize>,
    /// `\b(kw|kw|...)\b`, used for single-pass substitution. `\b` does not
    /// know about `$`, so callers reject matches that fail `stands_alone`.
    word_pattern: Regex,
    /// Reserved-identifier misuse patterns, in check order. Same `$` caveat.
    misuse_patterns: Vec<(MisuseKind, Regex)>,
}

impl KeywordTable {
    /// Build a table from declarative rules
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self, TableError> {
        let mut entries = Vec::with_capacity(rules.len());
        let mut index = HashMap::new();

        for rule in &rules {
            if !is_valid_identifier(&rule.keyword) {
                return Err(TableError::InvalidKeyword(rule.keyword.clone()));
            }
            if index.insert(rule.keyword.clone(), entries.len()).is_some() {
                return Err(TableError::Duplicate(rule.keyword.clone()));
            }

            let context = match (&rule.kind, &rule.pattern) {
                (KeywordKind::Plain, None) => None,
                (_, None) => {
                    return Err(TableError::MissingPattern { keyword: rule.keyword.clone() });
                }
                (_, Some(pattern)) => Some(Regex::new(pattern).map_err(|source| {
                    TableError::Pattern { keyword: rule.keyword.clone(), source }
                })?),
            };

            entries.push((
                rule.keyword.clone(),
                KeywordSpec {
                    equivalent: rule.equivalent.clone(),
                    kind: rule.kind.clone(),
                    context,
                },
            ));
        }

        // Parents are checked once every row is known, so order of declaration is free
        for rule in &rules {
            if let KeywordKind::Dependent { parent } = &rule.kind {
                let parent_is_opener = index
                    .get(parent)
                    .is_some_and(|&i| entries[i].1.is_block_opener());
                if !parent_is_opener {
                    return Err(TableError::UnknownParent {
                        keyword: rule.keyword.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        // Longest first so the alternation never prefers a shorter keyword
        let mut words: Vec<&str> = entries.iter().map(|(kw, _)| kw.as_str()).collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = words
            .iter()
            .map(|w| regex_lite::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|source| TableError::Pattern {
                keyword: alternation.clone(),
                source,
            })
        };

        let word_pattern = compile(format!(r"\b(?:{})\b", alternation))?;
        let misuse_patterns = vec![
            (MisuseKind::VariableName, compile(format!(r"\b({})\b\s*=", alternation))?),
            (MisuseKind::FunctionName, compile(format!(r"\b({})\b\s*\(", alternation))?),
            (MisuseKind::PropertyKey, compile(format!(r"\b({})\b\s*:", alternation))?),
        ];

        Ok(KeywordTable {
            entries,
            index,
            word_pattern,
            misuse_patterns,
        })
    }

    /// The built-in Jolly table
    pub fn jolly() -> Self {
        Self::new(jolly_rules()).expect("built-in Jolly rules are well-formed")
    }

    pub fn lookup(&self, keyword: &str) -> Option<&KeywordSpec> {
        self.index.get(keyword).map(|&i| &self.entries[i].1)
    }

    pub fn all_keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(kw, _)| kw.as_str())
    }

    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Rows in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordSpec)> {
        self.entries.iter().map(|(kw, spec)| (kw.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn word_pattern(&self) -> &Regex {
        &self.word_pattern
    }

    pub(crate) fn misuse_patterns(&self) -> &[(MisuseKind, Regex)] {
        &self.misuse_patterns
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::jolly()
    }
}
