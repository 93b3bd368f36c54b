//! Message synthesis: field aliases and per-rule templates.

use crate::{FieldRef, RawViolation, RuleKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Display labels for fields, used in validation messages.
///
/// Keys are field names. A composite label is keyed by the ordered field
/// names joined with `,` (e.g. `"first,last"`). Fields without an entry are
/// shown by their raw name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap(BTreeMap<String, String>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label for a single field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.0.insert(field.into(), label.into());
        self
    }

    /// Adds a label for an ordered group of fields.
    #[must_use]
    pub fn with_composite(mut self, fields: &[&str], label: impl Into<String>) -> Self {
        self.0.insert(fields.join(","), label.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, label: impl Into<String>) {
        self.0.insert(field.into(), label.into());
    }

    /// The label for `field`, or the field name itself.
    pub fn alias<'a>(&'a self, field: &'a str) -> &'a str {
        self.0.get(field).map_or(field, String::as_str)
    }

    /// Display name for a violation's field reference.
    ///
    /// Composite references use their own label if one is configured,
    /// otherwise each field's alias joined by a space.
    pub fn display_name(&self, field: &FieldRef) -> String {
        match field {
            FieldRef::Single(name) => self.alias(name).to_string(),
            FieldRef::Composite(names) => {
                if let Some(label) = self.0.get(&names.join(",")) {
                    return label.clone();
                }
                names
                    .iter()
                    .map(|n| self.alias(n))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-rule message templates, keyed by rule name (`required`, `minLength`, ...).
///
/// Templates may use `{field}`, `{value}`, `{constraint}` and `{article}`
/// (the indefinite article for the constraint). Rules without an override
/// use the built-in English template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog(BTreeMap<String, String>);

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the template for one rule.
    #[must_use]
    pub fn with(mut self, rule: RuleKind, template: impl Into<String>) -> Self {
        self.0.insert(rule.name().to_string(), template.into());
        self
    }

    /// The active template for `rule`.
    pub fn template(&self, rule: RuleKind) -> &str {
        self.0
            .get(rule.name())
            .map_or_else(|| Self::default_template(rule), String::as_str)
    }

    /// Override keys that do not name a known rule.
    pub fn unknown_rules(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|key| !RuleKind::ALL.iter().any(|rule| rule.name() == key.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The built-in English template for `rule`.
    pub const fn default_template(rule: RuleKind) -> &'static str {
        match rule {
            RuleKind::Required => "{field} is required.",
            RuleKind::Number => "{field} must be a number.",
            RuleKind::MinLength => "{field} must be at least {constraint} characters long.",
            RuleKind::MaxLength => "{field} must be no longer than {constraint} characters.",
            RuleKind::Length => "{field} must be exactly {constraint} characters long.",
            RuleKind::Pattern => "{field} does not match the expected pattern.",
            RuleKind::Format => "{field} must be a valid {constraint}.",
            RuleKind::Type => "{field} must be {article} {constraint}.",
            RuleKind::Minimum => "{field} must be at least {constraint}.",
            RuleKind::Maximum => "{field} must be no greater than {constraint}.",
            RuleKind::Enum => "{field} must be one of: {constraint}.",
        }
    }
}

/// Renders violations into messages using an alias map and a catalog.
///
/// This is the `messages` option handed to schema evaluators.
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter<'a> {
    aliases: &'a AliasMap,
    catalog: &'a MessageCatalog,
}

impl<'a> MessageFormatter<'a> {
    pub fn new(aliases: &'a AliasMap, catalog: &'a MessageCatalog) -> Self {
        Self { aliases, catalog }
    }

    /// Human-readable message for one violation.
    pub fn format(&self, violation: &RawViolation) -> String {
        let field = self.aliases.display_name(&violation.field);
        let value = render(&violation.value);
        let constraint = render(&violation.constraint);
        let article = indefinite_article(&constraint);
        fill(self.catalog.template(violation.rule), |name| match name {
            "field" => Some(field.as_str()),
            "value" => Some(value.as_str()),
            "constraint" => Some(constraint.as_str()),
            "article" => Some(article),
            _ => None,
        })
    }
}

/// Substitutes `{name}` tokens in a single left-to-right pass.
///
/// Substituted text is copied verbatim and never scanned again. Unknown
/// tokens and unmatched braces are kept as written.
fn fill<'v>(template: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token = after
            .find('}')
            .and_then(|close| lookup(&after[..close]).map(|text| (close, text)));
        match token {
            Some((close, text)) => {
                out.push_str(text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `"an"` if `word` starts with a vowel (a, e, i, o, u; any case), else `"a"`.
pub fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_flattens_arrays_and_strings() {
        assert_eq!(render(&json!(["a", 1, true])), "a, 1, true");
        assert_eq!(render(&json!("x")), "x");
        assert_eq!(render(&Value::Null), "");
    }

    #[test]
    fn fill_does_not_rescan_substitutions() {
        let lookup = |name: &str| match name {
            "field" => Some("{value}"),
            "value" => Some("{field}"),
            _ => None,
        };
        assert_eq!(fill("{field} / {value}", lookup), "{value} / {field}");
    }

    #[test]
    fn fill_keeps_unknown_tokens_and_stray_braces() {
        let lookup = |name: &str| (name == "field").then_some("Name");
        assert_eq!(fill("{other} {field}", lookup), "{other} Name");
        assert_eq!(fill("{{field}} {", lookup), "{Name} {");
        assert_eq!(fill("no tokens", lookup), "no tokens");
    }

    #[test]
    fn article_ignores_case() {
        assert_eq!(indefinite_article("Object"), "an");
        assert_eq!(indefinite_article("Url"), "an");
        assert_eq!(indefinite_article(""), "a");
    }
}
