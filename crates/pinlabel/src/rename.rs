//! Regex rename rules applied to resolved labels.
//!
//! Replacement templates accept both backslash references (`\1`,
//! `\g<name>`) and the `regex` crate's own `$1` / `${name}` syntax.

use std::borrow::Cow;

use log::{debug, trace};
use pinlabel_core::pin::PinRecord;
use regex::Regex;

use crate::{PinlabelError, config::RenameConfig};

/// A compiled pattern plus its replacement template.
#[derive(Debug, Clone)]
pub struct RenameRule {
    regex: Regex,
    pattern: String,
    template: String,
}

impl RenameRule {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Rule`] if the pattern is not a valid regex or
    /// the template has a malformed `\g<...>` reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlabel::rename::RenameRule;
    ///
    /// let rule = RenameRule::new("^IO([0-9])", "D\\1").unwrap();
    /// assert_eq!(rule.apply("IO3"), "D3");
    /// assert_eq!(rule.apply("A0"), "A0");
    /// ```
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, PinlabelError> {
        let regex = Regex::new(pattern).map_err(|err| PinlabelError::Rule {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        let template = convert_template(replacement).map_err(|message| PinlabelError::Rule {
            pattern: pattern.to_string(),
            message,
        })?;
        Ok(Self {
            regex,
            pattern: pattern.to_string(),
            template,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The template in `regex` syntax.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Replaces the first match in `label`. A label without a match is
    /// returned unchanged.
    pub fn apply<'a>(&self, label: &'a str) -> Cow<'a, str> {
        self.regex.replacen(label, 1, self.template.as_str())
    }
}

/// Rules applied in order, each to the output of the previous one.
#[derive(Debug, Clone, Default)]
pub struct RenameRules {
    rules: Vec<RenameRule>,
}

impl RenameRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles configured rules followed by `(pattern, replacement)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails to compile.
    pub fn from_sources<'a>(
        configured: &'a [RenameConfig],
        extra: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PinlabelError> {
        let configured = configured
            .iter()
            .map(|rule| (rule.pattern(), rule.replacement()));
        let rules = configured
            .chain(extra)
            .map(|(pattern, replacement)| RenameRule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rules = rules.len(); "Rename rules compiled");
        Ok(Self { rules })
    }

    pub fn push(&mut self, rule: RenameRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenameRule> {
        self.rules.iter()
    }

    /// Runs every rule over `label`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlabel::rename::{RenameRule, RenameRules};
    ///
    /// let mut rules = RenameRules::new();
    /// rules.push(RenameRule::new("^D", "IO").unwrap());
    /// rules.push(RenameRule::new("^IO", "GPIO").unwrap());
    /// assert_eq!(rules.apply("D5"), "GPIO5");
    /// ```
    pub fn apply(&self, label: &str) -> String {
        self.rules.iter().fold(label.to_string(), |current, rule| {
            let next = rule.apply(&current).into_owned();
            if next != current {
                trace!(pattern = rule.pattern(), from = current.as_str(), to = next.as_str(); "Label renamed");
            }
            next
        })
    }

    /// Applies the rules to a record's base label and stores the result as
    /// its display label.
    pub fn relabel(&self, record: PinRecord) -> PinRecord {
        let renamed = self.apply(record.base_label());
        record.with_display_label(renamed)
    }
}

/// Rewrites backslash group references into `regex` template syntax.
///
/// `\N` and `\g<N>` become `${N}`, `\g<name>` becomes `${name}`, `\\`
/// becomes a literal backslash. Other escapes pass through unchanged.
fn convert_template(template: &str) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(d) if d.is_ascii_digit() => {
                let mut group = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    group.push(d);
                    chars.next();
                }
                out.push_str(&format!("${{{group}}}"));
            }
            Some('g') => {
                chars.next();
                if chars.next() != Some('<') {
                    return Err("expected `<` after `\\g`".to_string());
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(n) if n.is_ascii_alphanumeric() || n == '_' => name.push(n),
                        _ => return Err("unterminated or invalid `\\g<...>` reference".to_string()),
                    }
                }
                if name.is_empty() {
                    return Err("empty `\\g<>` reference".to_string());
                }
                out.push_str(&format!("${{{name}}}"));
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            _ => out.push('\\'),
        }
    }
    Ok(out)
}
