//! Declarative record schemas
//!
//! A schema lists a record's fields with their rule expressions and an
//! accessor that turns the field into a [`FieldValue`]. Building the schema
//! resolves display names and parses every rule expression once, so a typo
//! in a rule surfaces at startup rather than on the first request.
//!
//! A schema also keeps the configuration of the validator that built it.
//! Failure messages are formatted from that configuration, so the ranges
//! they name are the ones the bound rules checked.
//!
//! ```
//! use once_cell::sync::Lazy;
//! use txova_validation::structval::{self, FieldSpec, Schema, ToFieldValue, Validate, Validator};
//!
//! struct Signup {
//!     phone: String,
//!     pin: String,
//! }
//!
//! impl Validate for Signup {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<Signup>> = Lazy::new(|| {
//!             Validator::schema::<Signup>()
//!                 .field(
//!                     FieldSpec::new("Phone", "required,mz_phone", |s: &Signup| {
//!                         s.phone.to_field_value()
//!                     })
//!                     .wire("phone"),
//!                 )
//!                 .field(
//!                     FieldSpec::new("Pin", "required,txova_pin", |s: &Signup| {
//!                         s.pin.to_field_value()
//!                     })
//!                     .wire("pin"),
//!                 )
//!                 .build(structval::validator())
//!                 .expect("signup rules")
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let signup = Signup {
//!     phone: "841234567".into(),
//!     pin: "1234".into(),
//! };
//! let errors = structval::validate(&signup).unwrap();
//! assert_eq!(errors.fields(), vec!["pin"]);
//! ```
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::structval::engine::{FieldError, RuleSet};
use crate::structval::naming::FieldName;
use crate::structval::translate;
use crate::structval::value::FieldValue;
use crate::structval::Validator;
use crate::validation::ValidationErrors;
use std::fmt;

/// Reads one field out of a record
pub type Accessor<T> = fn(&T) -> FieldValue;

type NestedCheck<T> = Box<dyn Fn(&T, &mut Vec<FieldError>) + Send + Sync>;
type NestedReport<T> = Box<dyn Fn(&T, &mut ValidationErrors) + Send + Sync>;

/// Types that carry their own validation schema
pub trait Validate: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// One field declaration
pub struct FieldSpec<T> {
    structural: String,
    wire: Option<String>,
    rules: String,
    accessor: Accessor<T>,
}

impl<T> FieldSpec<T> {
    pub fn new(
        structural: impl Into<String>,
        rules: impl Into<String>,
        accessor: Accessor<T>,
    ) -> Self {
        Self {
            structural: structural.into(),
            wire: None,
            rules: rules.into(),
            accessor,
        }
    }

    /// Declare the field's wire name; `"-"` keeps the structural name
    pub fn wire(mut self, name: impl Into<String>) -> Self {
        self.wire = Some(name.into());
        self
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("structural", &self.structural)
            .field("wire", &self.wire)
            .field("rules", &self.rules)
            .finish()
    }
}

enum Declared<T> {
    Field(FieldSpec<T>),
    Nested {
        structural: String,
        check: NestedCheck<T>,
        report: NestedReport<T>,
    },
}

/// Collects field declarations for a [`Schema`]
pub struct SchemaBuilder<T> {
    declared: Vec<Declared<T>>,
}

impl<T: 'static> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> SchemaBuilder<T> {
    pub fn new() -> Self {
        Self { declared: Vec::new() }
    }

    pub fn field(mut self, spec: FieldSpec<T>) -> Self {
        self.declared.push(Declared::Field(spec));
        self
    }

    /// Validate a nested record with its own schema
    ///
    /// Failures inside the nested record are reported under its field names
    /// and formatted with the nested schema's own configuration.
    pub fn nested<U: Validate>(
        mut self,
        structural: impl Into<String>,
        project: fn(&T) -> &U,
    ) -> Self {
        let check: NestedCheck<T> = Box::new(move |record: &T, out: &mut Vec<FieldError>| {
            U::schema().collect(project(record), out)
        });
        let report: NestedReport<T> = Box::new(move |record: &T, out: &mut ValidationErrors| {
            U::schema().report(project(record), out)
        });
        self.declared.push(Declared::Nested {
            structural: structural.into(),
            check,
            report,
        });
        self
    }

    /// Resolve names and parse every rule expression against `validator`
    pub fn build(self, validator: &Validator) -> Result<Schema<T>> {
        let mut entries = Vec::with_capacity(self.declared.len());

        for declared in self.declared {
            let entry = match declared {
                Declared::Field(spec) => {
                    let field = FieldName::new(&spec.structural, spec.wire.as_deref());
                    let name = validator.resolve_name(&field);
                    let rules = validator.parse_rules(&spec.rules)?;
                    Entry::Field {
                        name,
                        rules,
                        accessor: spec.accessor,
                    }
                }
                Declared::Nested {
                    structural,
                    check,
                    report,
                } => Entry::Nested {
                    name: structural,
                    check,
                    report,
                },
            };
            entries.push(entry);
        }

        Ok(Schema {
            entries,
            config: validator.config().clone(),
        })
    }
}

enum Entry<T> {
    Field {
        name: String,
        rules: RuleSet,
        accessor: Accessor<T>,
    },
    Nested {
        name: String,
        check: NestedCheck<T>,
        report: NestedReport<T>,
    },
}

/// A compiled schema for records of type `T`
pub struct Schema<T> {
    entries: Vec<Entry<T>>,
    config: ValidatorConfig,
}

impl<T> Schema<T> {
    /// Resolved names of the top-level entries, in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Field { name, .. } | Entry::Nested { name, .. } => name.as_str(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configuration of the validator this schema was built with
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Evaluate every field, appending one failure per failing field
    pub fn collect(&self, record: &T, out: &mut Vec<FieldError>) {
        for entry in &self.entries {
            match entry {
                Entry::Field { name, rules, accessor } => {
                    if let Some(err) = rules.check(name, &accessor(record)) {
                        out.push(err);
                    }
                }
                Entry::Nested { check, .. } => check(record, out),
            }
        }
    }

    /// Convenience wrapper around [`Schema::collect`]
    pub fn check(&self, record: &T) -> Vec<FieldError> {
        let mut out = Vec::new();
        self.collect(record, &mut out);
        out
    }

    /// Evaluate every field and append the translated failures
    pub fn report(&self, record: &T, out: &mut ValidationErrors) {
        for entry in &self.entries {
            match entry {
                Entry::Field { name, rules, accessor } => {
                    if let Some(err) = rules.check(name, &accessor(record)) {
                        out.add(translate::translate(&err, &self.config));
                    }
                }
                Entry::Nested { report, .. } => report(record, out),
            }
        }
    }

    /// Translated failures for `record`, empty when every field passes
    pub fn errors(&self, record: &T) -> ValidationErrors {
        let mut out = ValidationErrors::new();
        self.report(record, &mut out);
        out
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.field_names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structval::value::ToFieldValue;

    struct Driver {
        name: String,
        plate: String,
    }

    fn driver_schema(validator: &Validator) -> Schema<Driver> {
        SchemaBuilder::new()
            .field(
                FieldSpec::new("Name", "required,min=2", |d: &Driver| d.name.to_field_value())
                    .wire("name"),
            )
            .field(
                FieldSpec::new("Plate", "required,mz_plate", |d: &Driver| d.plate.to_field_value())
                    .wire("-"),
            )
            .build(validator)
            .unwrap()
    }

    #[test]
    fn test_names_resolved_at_build() {
        let schema = driver_schema(&Validator::new());
        assert_eq!(schema.field_names(), vec!["name", "Plate"]);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_every_field_evaluated() {
        let schema = driver_schema(&Validator::new());
        let failures = schema.check(&Driver {
            name: String::new(),
            plate: "nope".to_string(),
        });
        let tags: Vec<_> = failures.iter().map(|f| (f.field.as_str(), f.tag.as_str())).collect();
        assert_eq!(tags, vec![("name", "required"), ("Plate", "mz_plate")]);
    }

    #[test]
    fn test_build_fails_fast() {
        let result = SchemaBuilder::<Driver>::new()
            .field(FieldSpec::new("Name", "required,no_such_rule", |d: &Driver| {
                d.name.to_field_value()
            }))
            .build(&Validator::new());
        assert!(result.is_err());
    }
}
