//! Declarative struct validation
//!
//! Records describe their fields once through a [`Schema`]; a [`Validator`]
//! evaluates it and reports failures as [`ValidationErrors`] keyed by each
//! field's wire name.
//!
//! Rule expressions are comma-separated lists such as
//! `"required,min=2,max=100"`. Besides the general-purpose built-ins, every
//! validator understands the Txova rules `mz_phone`, `mz_plate`,
//! `mz_location`, `txova_pin`, `txova_money`, `txova_rating` and
//! `txova_vehicle_year`.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

pub mod engine;
pub mod naming;
pub mod registry;
pub mod schema;
pub mod translate;
pub mod value;

pub use engine::{Builtin, Engine, FieldError, FieldLevel, RuleFn, RuleSet};
pub use naming::{wire_or_structural, FieldName, NameResolverFn};
pub use registry::{register_rule, validate, validate_var, validator};
pub use schema::{Accessor, FieldSpec, Schema, SchemaBuilder, Validate};
pub use value::{FieldKind, FieldValue, LatLon, LocationShape, Numeric, ToFieldValue};

use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::validation::{ErrorCode, ValidationError, ValidationErrors};
use std::fmt;
use std::sync::Arc;

/// Field name used by [`Validator::validate_var`]
pub const VAR_FIELD: &str = "value";

/// Rule table, configuration and naming policy in one place
///
/// Cheap to share; validation only reads from it.
pub struct Validator {
    engine: Engine,
    config: ValidatorConfig,
    name_resolver: Box<NameResolverFn>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Validator with the default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let mut engine = Engine::new();
        for (name, rule) in registry::txova_rules(&config) {
            engine.insert(name, rule);
        }

        Self {
            engine,
            config,
            name_resolver: Box::new(wire_or_structural),
        }
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Start a schema for `T`
    pub fn schema<T: 'static>() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.engine.has_rule(name)
    }

    /// Display name for a field under this validator's naming policy
    pub fn resolve_name(&self, name: &FieldName<'_>) -> String {
        naming::resolve(self.name_resolver.as_ref(), name)
    }

    pub fn parse_rules(&self, expression: &str) -> Result<RuleSet> {
        self.engine.parse(expression)
    }

    pub(crate) fn register_arc(&mut self, name: &str, rule: Arc<RuleFn>) -> Result<()> {
        self.engine.register(name, rule)
    }

    /// Validate a record against its own schema
    ///
    /// Returns `None` when every field passes.
    pub fn validate<T: Validate>(&self, record: &T) -> Option<ValidationErrors> {
        self.validate_with(record, T::schema())
    }

    /// Validate a record against an explicit schema
    ///
    /// The schema's rules were bound when it was built, so failures are
    /// formatted with [`Schema::config`] rather than this validator's
    /// configuration.
    pub fn validate_with<T>(&self, record: &T, schema: &Schema<T>) -> Option<ValidationErrors> {
        let errors = schema.errors(record);
        if errors.is_empty() {
            return None;
        }

        tracing::trace!(
            failed = errors.len(),
            fields = schema.len(),
            "struct validation failed"
        );
        Some(errors)
    }

    /// Validate a single value against a rule expression
    ///
    /// Failures are reported under the field name `value`. A malformed
    /// expression is reported the same way rather than as an [`Error`].
    ///
    /// [`Error`]: crate::Error
    pub fn validate_var<V: ToFieldValue + ?Sized>(
        &self,
        value: &V,
        rules: &str,
    ) -> Option<ValidationErrors> {
        let rule_set = match self.parse_rules(rules) {
            Ok(rule_set) => rule_set,
            Err(e) => {
                tracing::debug!(expression = rules, error = %e, "invalid rule expression");
                let error =
                    ValidationError::new(VAR_FIELD, ErrorCode::InvalidFormat, e.to_string());
                return std::iter::once(error).collect::<ValidationErrors>().into_option();
            }
        };

        rule_set
            .check(VAR_FIELD, &value.to_field_value())
            .map(|failure| translate::translate_all([&failure], &self.config))
    }
}

/// Builder for validators with custom rules or naming
#[derive(Default)]
pub struct ValidatorBuilder {
    config: Option<ValidatorConfig>,
    rules: Vec<(String, Arc<RuleFn>)>,
    name_resolver: Option<Box<NameResolverFn>>,
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ValidatorBuilder")
            .field("config", &self.config)
            .field("rules", &rules)
            .field("custom_names", &self.name_resolver.is_some())
            .finish()
    }
}

impl ValidatorBuilder {
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Add a custom rule; name clashes are reported by [`ValidatorBuilder::build`]
    pub fn rule<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Arc::new(predicate)));
        self
    }

    /// Replace the field-naming policy
    pub fn name_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&FieldName<'_>) -> String + Send + Sync + 'static,
    {
        self.name_resolver = Some(Box::new(resolver));
        self
    }

    pub fn build(self) -> Result<Validator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut validator = Validator::with_config(config);
        for (name, rule) in self.rules {
            validator.register_arc(&name, rule)?;
        }
        if let Some(resolver) = self.name_resolver {
            validator.name_resolver = resolver;
        }

        Ok(validator)
    }
}
