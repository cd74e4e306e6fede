//! Generic rule engine
//!
//! A rule expression such as `"required,min=3,max=40"` is parsed once into a
//! [`RuleSet`]. Each segment names a built-in rule or a registered custom
//! predicate, optionally followed by `=param`. Evaluating a rule set against a
//! value stops at the first failing rule and reports it as a [`FieldError`].
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::structval::value::{FieldKind, FieldValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
});
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("static regex"));
static ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("static regex"));
static ALPHANUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("static regex"));

/// What a predicate sees of the field under validation
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    value: &'a FieldValue,
    param: &'a str,
    field: &'a str,
}

impl<'a> FieldLevel<'a> {
    pub fn new(value: &'a FieldValue, param: &'a str, field: &'a str) -> Self {
        Self { value, param, field }
    }

    pub fn value(&self) -> &'a FieldValue {
        self.value
    }

    /// Text after `=` in the rule expression, empty when absent
    pub fn param(&self) -> &'a str {
        self.param
    }

    /// Resolved (wire) name of the field
    pub fn field(&self) -> &'a str {
        self.field
    }
}

/// Custom rule predicate
pub type RuleFn = dyn Fn(&FieldLevel<'_>) -> bool + Send + Sync;

/// A single rule violation as reported by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Rule name, e.g. `min` or `mz_phone`
    pub tag: String,
    /// Rule parameter, empty when the rule takes none
    pub param: String,
    /// Offending value
    pub value: FieldValue,
    /// Resolved field name
    pub field: String,
    /// Shape of the offending value
    pub kind: FieldKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "field '{}' failed rule '{}'", self.field, self.tag)
        } else {
            write!(f, "field '{}' failed rule '{}={}'", self.field, self.tag, self.param)
        }
    }
}

/// Rules implemented by the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Required,
    OmitEmpty,
    Min,
    Max,
    Len,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    OneOf,
    Email,
    Url,
    Numeric,
    Alpha,
    Alphanum,
}

impl Builtin {
    pub const ALL: [Builtin; 17] = [
        Builtin::Required,
        Builtin::OmitEmpty,
        Builtin::Min,
        Builtin::Max,
        Builtin::Len,
        Builtin::Eq,
        Builtin::Ne,
        Builtin::Gt,
        Builtin::Gte,
        Builtin::Lt,
        Builtin::Lte,
        Builtin::OneOf,
        Builtin::Email,
        Builtin::Url,
        Builtin::Numeric,
        Builtin::Alpha,
        Builtin::Alphanum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Required => "required",
            Builtin::OmitEmpty => "omitempty",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Len => "len",
            Builtin::Eq => "eq",
            Builtin::Ne => "ne",
            Builtin::Gt => "gt",
            Builtin::Gte => "gte",
            Builtin::Lt => "lt",
            Builtin::Lte => "lte",
            Builtin::OneOf => "oneof",
            Builtin::Email => "email",
            Builtin::Url => "url",
            Builtin::Numeric => "numeric",
            Builtin::Alpha => "alpha",
            Builtin::Alphanum => "alphanum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }

    fn takes_param(&self) -> bool {
        matches!(
            self,
            Builtin::Min
                | Builtin::Max
                | Builtin::Len
                | Builtin::Eq
                | Builtin::Ne
                | Builtin::Gt
                | Builtin::Gte
                | Builtin::Lt
                | Builtin::Lte
                | Builtin::OneOf
        )
    }

    fn numeric_param(&self) -> bool {
        matches!(
            self,
            Builtin::Min
                | Builtin::Max
                | Builtin::Len
                | Builtin::Gt
                | Builtin::Gte
                | Builtin::Lt
                | Builtin::Lte
        )
    }

    /// `omitempty` always passes here; [`RuleSet::check`] acts on it
    fn check(&self, value: &FieldValue, param: &str) -> bool {
        match self {
            Builtin::Required => !value.is_empty(),
            Builtin::OmitEmpty => true,
            Builtin::Min => compare(value, param).is_some_and(|o| o != Ordering::Less),
            Builtin::Max => compare(value, param).is_some_and(|o| o != Ordering::Greater),
            Builtin::Len => compare(value, param) == Some(Ordering::Equal),
            Builtin::Gt => compare(value, param) == Some(Ordering::Greater),
            Builtin::Gte => compare(value, param).is_some_and(|o| o != Ordering::Less),
            Builtin::Lt => compare(value, param) == Some(Ordering::Less),
            Builtin::Lte => compare(value, param).is_some_and(|o| o != Ordering::Greater),
            Builtin::Eq => equals(value, param).unwrap_or(false),
            Builtin::Ne => equals(value, param).map(|eq| !eq).unwrap_or(false),
            Builtin::OneOf => one_of(value, param),
            Builtin::Email => value.as_str().is_some_and(|s| EMAIL.is_match(s)),
            Builtin::Url => value.as_str().is_some_and(is_absolute_url),
            Builtin::Numeric => match value {
                FieldValue::Text(s) => NUMERIC.is_match(s),
                FieldValue::Number(_) => true,
                _ => false,
            },
            Builtin::Alpha => value.as_str().is_some_and(|s| ALPHA.is_match(s)),
            Builtin::Alphanum => value.as_str().is_some_and(|s| ALPHANUM.is_match(s)),
        }
    }
}

/// Length of text (in characters) and lists, numeric value of numbers
fn compare(value: &FieldValue, param: &str) -> Option<Ordering> {
    match value {
        FieldValue::Text(s) => compare_len(s.chars().count(), param),
        FieldValue::List(items) => compare_len(items.len(), param),
        FieldValue::Number(n) => n.compare_param(param),
        _ => None,
    }
}

fn compare_len(len: usize, param: &str) -> Option<Ordering> {
    let param = param.trim();
    if let Ok(n) = param.parse::<usize>() {
        return Some(len.cmp(&n));
    }
    (len as f64).partial_cmp(&param.parse::<f64>().ok()?)
}

fn equals(value: &FieldValue, param: &str) -> Option<bool> {
    match value {
        FieldValue::Text(s) => Some(s == param),
        FieldValue::Number(n) => n.compare_param(param).map(|o| o == Ordering::Equal),
        FieldValue::Bool(b) => param.trim().parse::<bool>().ok().map(|p| p == *b),
        FieldValue::List(items) => compare_len(items.len(), param).map(|o| o == Ordering::Equal),
        _ => None,
    }
}

fn one_of(value: &FieldValue, param: &str) -> bool {
    let mut options = param.split_whitespace();
    match value {
        FieldValue::Text(s) => options.any(|o| o == s),
        FieldValue::Number(n) if n.is_integer() => {
            options.any(|o| n.compare_param(o) == Some(Ordering::Equal))
        }
        _ => false,
    }
}

fn is_absolute_url(s: &str) -> bool {
    url::Url::parse(s).is_ok_and(|u| !u.scheme().is_empty())
}

#[derive(Clone)]
enum RuleKind {
    Builtin(Builtin),
    Custom(Arc<RuleFn>),
}

#[derive(Clone)]
struct RuleCall {
    name: String,
    param: String,
    kind: RuleKind,
}

impl fmt::Debug for RuleCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCall")
            .field("name", &self.name)
            .field("param", &self.param)
            .field("custom", &matches!(self.kind, RuleKind::Custom(_)))
            .finish()
    }
}

/// A parsed rule expression, ready to evaluate
#[derive(Debug, Clone)]
pub struct RuleSet {
    expression: String,
    rules: Vec<RuleCall>,
}

impl RuleSet {
    /// Source expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Rule names in evaluation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the rules against `value`, returning the first failure
    ///
    /// `omitempty` on an empty value ends evaluation successfully. Custom
    /// predicates are skipped for absent values; presence is the job of
    /// `required`.
    pub fn check(&self, field: &str, value: &FieldValue) -> Option<FieldError> {
        for rule in &self.rules {
            let passed = match &rule.kind {
                RuleKind::Builtin(Builtin::OmitEmpty) => {
                    if value.is_empty() {
                        return None;
                    }
                    true
                }
                RuleKind::Builtin(builtin) => builtin.check(value, &rule.param),
                RuleKind::Custom(_) if value.is_absent() => true,
                RuleKind::Custom(predicate) => {
                    predicate(&FieldLevel::new(value, &rule.param, field))
                }
            };

            if !passed {
                return Some(FieldError {
                    tag: rule.name.clone(),
                    param: rule.param.clone(),
                    value: value.clone(),
                    field: field.to_string(),
                    kind: value.kind(),
                });
            }
        }
        None
    }
}

/// True if `name` can appear as a rule name in an expression
pub fn is_valid_rule_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rule table: built-ins plus named custom predicates
#[derive(Clone, Default)]
pub struct Engine {
    custom: HashMap<String, Arc<RuleFn>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("Engine").field("custom", &names).finish()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for built-ins and registered custom rules
    pub fn has_rule(&self, name: &str) -> bool {
        Builtin::from_name(name).is_some() || self.custom.contains_key(name)
    }

    /// Names of the registered custom rules, sorted
    pub fn custom_rules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add a custom predicate under `name`
    pub fn register(&mut self, name: &str, predicate: Arc<RuleFn>) -> Result<()> {
        if !is_valid_rule_name(name) {
            return Err(Error::InvalidRuleName { name: name.to_string() });
        }
        if self.has_rule(name) {
            return Err(Error::RuleAlreadyRegistered { name: name.to_string() });
        }
        self.insert(name, predicate);
        Ok(())
    }

    /// Unchecked insert for rule tables known to be well-formed
    pub(crate) fn insert(&mut self, name: &str, predicate: Arc<RuleFn>) {
        self.custom.insert(name.to_string(), predicate);
    }

    /// Parse a rule expression against this engine's rule table
    ///
    /// A blank expression yields an empty rule set. Empty segments, unknown
    /// rules, missing or malformed parameters and `|` alternation are errors.
    pub fn parse(&self, expression: &str) -> Result<RuleSet> {
        let mut rules = Vec::new();

        if !expression.trim().is_empty() {
            for segment in expression.split(',') {
                rules.push(self.parse_segment(expression, segment.trim())?);
            }
        }

        Ok(RuleSet {
            expression: expression.to_string(),
            rules,
        })
    }

    fn parse_segment(&self, expression: &str, segment: &str) -> Result<RuleCall> {
        if segment.is_empty() {
            return Err(Error::rule_expression(expression, "empty rule"));
        }

        let (name, param) = match segment.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (segment, None),
        };

        if name.contains('|') {
            return Err(Error::rule_expression(expression, "'|' alternation is not supported"));
        }
        if !is_valid_rule_name(name) {
            return Err(Error::rule_expression(expression, format!("invalid rule name '{}'", name)));
        }

        let kind = match Builtin::from_name(name) {
            Some(builtin) => {
                check_builtin_param(expression, builtin, param)?;
                RuleKind::Builtin(builtin)
            }
            None => match self.custom.get(name) {
                Some(predicate) => RuleKind::Custom(Arc::clone(predicate)),
                None => return Err(Error::UnknownRule { rule: name.to_string() }),
            },
        };

        Ok(RuleCall {
            name: name.to_string(),
            param: param.unwrap_or_default().to_string(),
            kind,
        })
    }
}

fn check_builtin_param(expression: &str, builtin: Builtin, param: Option<&str>) -> Result<()> {
    match (builtin.takes_param(), param) {
        (true, None) | (true, Some("")) => Err(Error::rule_expression(
            expression,
            format!("rule '{}' requires a parameter", builtin.name()),
        )),
        (false, Some(_)) => Err(Error::rule_expression(
            expression,
            format!("rule '{}' does not take a parameter", builtin.name()),
        )),
        (true, Some(p)) if builtin.numeric_param() && p.parse::<f64>().is_err() => {
            Err(Error::rule_expression(
                expression,
                format!("rule '{}' needs a numeric parameter, got '{}'", builtin.name(), p),
            ))
        }
        _ => Ok(()),
    }
}
