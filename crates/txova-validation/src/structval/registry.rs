//! Txova rule predicates and the process-wide validator
//!
//! Every Txova predicate passes on an absent value, and the string-based
//! ones also pass on `""`, so `required` alone decides presence. Numeric
//! rules are not vacuous at zero: `txova_money` and `txova_rating` reject `0`
//! and are made optional with `omitempty`.
//!
//! The global validator is built on first use. Rules registered with
//! [`register_rule`] before that are folded in; afterwards the registry is
//! frozen.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::config::ValidatorConfig;
use crate::error::{Error, Result};
use crate::geo::BoundingBox;
use crate::structval::engine::{is_valid_rule_name, Builtin, FieldLevel, RuleFn};
use crate::structval::schema::Validate;
use crate::structval::value::{FieldValue, LocationShape, Numeric, ToFieldValue};
use crate::structval::Validator;
use crate::validation::ValidationErrors;
use crate::{phone, ride, vehicle};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, PoisonError};

pub const MZ_PHONE: &str = "mz_phone";
pub const MZ_PLATE: &str = "mz_plate";
pub const MZ_LOCATION: &str = "mz_location";
pub const TXOVA_PIN: &str = "txova_pin";
pub const TXOVA_MONEY: &str = "txova_money";
pub const TXOVA_RATING: &str = "txova_rating";
pub const TXOVA_VEHICLE_YEAR: &str = "txova_vehicle_year";

/// Names of every Txova rule
pub const TXOVA_RULES: [&str; 7] = [
    MZ_PHONE,
    MZ_PLATE,
    MZ_LOCATION,
    TXOVA_PIN,
    TXOVA_MONEY,
    TXOVA_RATING,
    TXOVA_VEHICLE_YEAR,
];

/// Apply `check` to text; absent and empty text pass, other kinds fail
fn text_rule(value: &FieldValue, check: impl FnOnce(&str) -> bool) -> bool {
    match value {
        FieldValue::Absent => true,
        FieldValue::Text(s) if s.is_empty() => true,
        FieldValue::Text(s) => check(s),
        _ => false,
    }
}

pub fn mz_phone(fl: &FieldLevel<'_>) -> bool {
    text_rule(fl.value(), phone::is_valid)
}

pub fn mz_plate(fl: &FieldLevel<'_>) -> bool {
    text_rule(fl.value(), vehicle::is_valid_plate)
}

pub fn txova_pin(fl: &FieldLevel<'_>) -> bool {
    text_rule(fl.value(), ride::is_valid_pin)
}

/// True iff the location lies inside `bounds`; a bad shape fails
pub fn mz_location_in(bounds: &BoundingBox, fl: &FieldLevel<'_>) -> bool {
    match fl.value() {
        FieldValue::Absent => true,
        value => LocationShape::classify(value, bounds).is_valid(),
    }
}

/// Positive amount in any numeric representation
pub fn txova_money(fl: &FieldLevel<'_>) -> bool {
    match fl.value() {
        FieldValue::Absent => true,
        FieldValue::Number(n) => n.is_positive(),
        _ => false,
    }
}

/// Integer rating within 1..=5, compared without narrowing
pub fn txova_rating(fl: &FieldLevel<'_>) -> bool {
    match fl.value() {
        FieldValue::Absent => true,
        FieldValue::Number(Numeric::Signed(v)) => (1..=5).contains(v),
        FieldValue::Number(Numeric::Unsigned(v)) => (1..=5).contains(v),
        _ => false,
    }
}

/// Integer model year within `min_year..=current + 1`
pub fn txova_vehicle_year_from(min_year: i32, fl: &FieldLevel<'_>) -> bool {
    let year = match fl.value() {
        FieldValue::Absent => return true,
        FieldValue::Number(n) => n.as_i128().and_then(|v| i32::try_from(v).ok()),
        _ => None,
    };
    let current = vehicle::current_year();
    year.is_some_and(|y| vehicle::validate_year_between(y, min_year, current).is_ok())
}

/// The Txova rule table for one configuration
pub fn txova_rules(config: &ValidatorConfig) -> Vec<(&'static str, Arc<RuleFn>)> {
    let bounds = config.country_bounds;
    let min_year = config.min_vehicle_year;

    vec![
        (MZ_PHONE, Arc::new(mz_phone) as Arc<RuleFn>),
        (MZ_PLATE, Arc::new(mz_plate)),
        (MZ_LOCATION, Arc::new(move |fl: &FieldLevel<'_>| mz_location_in(&bounds, fl))),
        (TXOVA_PIN, Arc::new(txova_pin)),
        (TXOVA_MONEY, Arc::new(txova_money)),
        (TXOVA_RATING, Arc::new(txova_rating)),
        (
            TXOVA_VEHICLE_YEAR,
            Arc::new(move |fl: &FieldLevel<'_>| txova_vehicle_year_from(min_year, fl)),
        ),
    ]
}

struct Pending {
    frozen: bool,
    rules: Vec<(String, Arc<RuleFn>)>,
}

static GLOBAL: OnceCell<Validator> = OnceCell::new();

static PENDING: Mutex<Pending> = Mutex::new(Pending {
    frozen: false,
    rules: Vec::new(),
});

fn lock_pending() -> std::sync::MutexGuard<'static, Pending> {
    PENDING.lock().unwrap_or_else(PoisonError::into_inner)
}

fn global_config() -> ValidatorConfig {
    ValidatorConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load validator configuration, using defaults");
        ValidatorConfig::default()
    })
}

fn init_global() -> Validator {
    // Freezing under the lock orders every registration strictly before or
    // after initialisation.
    let mut pending = lock_pending();
    pending.frozen = true;
    let rules = std::mem::take(&mut pending.rules);

    let mut validator = Validator::with_config(global_config());
    let count = rules.len();
    for (name, rule) in rules {
        if let Err(e) = validator.register_arc(&name, rule) {
            tracing::warn!(rule = %name, error = %e, "skipping custom validation rule");
        }
    }

    tracing::debug!(custom_rules = count, "initialized global validator");
    validator
}

/// The process-wide validator, built on first call
pub fn validator() -> &'static Validator {
    GLOBAL.get_or_init(init_global)
}

/// Register a custom rule with the global validator
///
/// Must happen before the first validation through the global validator;
/// later calls return [`Error::RegistryFrozen`].
pub fn register_rule<F>(name: &str, predicate: F) -> Result<()>
where
    F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
{
    let mut pending = lock_pending();

    if pending.frozen {
        return Err(Error::RegistryFrozen { name: name.to_string() });
    }
    if !is_valid_rule_name(name) {
        return Err(Error::InvalidRuleName { name: name.to_string() });
    }
    let taken = Builtin::from_name(name).is_some()
        || TXOVA_RULES.contains(&name)
        || pending.rules.iter().any(|(existing, _)| existing == name);
    if taken {
        return Err(Error::RuleAlreadyRegistered { name: name.to_string() });
    }

    pending.rules.push((name.to_string(), Arc::new(predicate)));
    tracing::info!(rule = name, "registered custom validation rule");
    Ok(())
}

/// Validate a record with the global validator
pub fn validate<T: Validate>(record: &T) -> Option<ValidationErrors> {
    validator().validate(record)
}

/// Validate one value against a rule expression with the global validator
pub fn validate_var<V: ToFieldValue + ?Sized>(value: &V, rules: &str) -> Option<ValidationErrors> {
    validator().validate_var(value, rules)
}
