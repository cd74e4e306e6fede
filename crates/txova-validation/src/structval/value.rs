//! Field value model
//!
//! Record fields are handed to the rule engine as [`FieldValue`]s, a closed
//! sum type over the shapes a rule can meaningfully inspect. Numbers keep
//! their signedness in [`Numeric`] so range checks never narrow a wide
//! integer into a small type.
//!
//! Copyright (c) 2025 Txova Team
//! Licensed under the Apache-2.0 license

use crate::geo::{BoundingBox, Location};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A number in one of three canonical representations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Numeric {
    pub fn is_zero(&self) -> bool {
        match *self {
            Numeric::Signed(v) => v == 0,
            Numeric::Unsigned(v) => v == 0,
            Numeric::Float(v) => v == 0.0,
        }
    }

    /// Strictly greater than zero; NaN is not positive
    pub fn is_positive(&self) -> bool {
        match *self {
            Numeric::Signed(v) => v > 0,
            Numeric::Unsigned(v) => v > 0,
            Numeric::Float(v) => v > 0.0,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Numeric::Float(_))
    }

    /// Lossless integer view; `None` for floats
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Numeric::Signed(v) => Some(i128::from(v)),
            Numeric::Unsigned(v) => Some(i128::from(v)),
            Numeric::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Signed(v) => v as f64,
            Numeric::Unsigned(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }

    /// Compare against a decimal parameter such as `"18"` or `"0.5"`
    ///
    /// Integers compare exactly against integer parameters. Anything involving
    /// a float goes through `f64`. Unparseable parameters and NaN yield `None`.
    pub fn compare_param(&self, param: &str) -> Option<Ordering> {
        let param = param.trim();
        if let (Some(lhs), Ok(rhs)) = (self.as_i128(), param.parse::<i128>()) {
            return Some(lhs.cmp(&rhs));
        }
        let rhs = param.parse::<f64>().ok()?;
        self.as_f64().partial_cmp(&rhs)
    }

    pub fn to_json(&self) -> Value {
        match *self {
            Numeric::Signed(v) => Value::from(v),
            Numeric::Unsigned(v) => Value::from(v),
            Numeric::Float(v) => serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Signed(v) => write!(f, "{}", v),
            Numeric::Unsigned(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! numeric_from {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Numeric {
                fn from(v: $t) -> Self {
                    Numeric::$variant(v as $wide)
                }
            }
        )*
    };
}

numeric_from!(Signed, i64: i8, i16, i32, i64, isize);
numeric_from!(Unsigned, u64: u8, u16, u32, u64, usize);
numeric_from!(Float, f64: f32, f64);

/// Broad shape of a field value, as reported on rule failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Absent,
    Bool,
    Text,
    Int,
    Uint,
    Float,
    List,
    Record,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Int | FieldKind::Uint | FieldKind::Float)
    }
}

/// A value as seen by the rule engine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Missing optional value
    #[default]
    Absent,
    Bool(bool),
    Text(String),
    Number(Numeric),
    List(Vec<FieldValue>),
    /// Named sub-fields in declaration order
    Record(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Build a record from name/value pairs
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        FieldValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Absent => FieldKind::Absent,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(Numeric::Signed(_)) => FieldKind::Int,
            FieldValue::Number(Numeric::Unsigned(_)) => FieldKind::Uint,
            FieldValue::Number(Numeric::Float(_)) => FieldKind::Float,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Record(_) => FieldKind::Record,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Zero value test used by `required` and `omitempty`
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_zero(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Record(fields) => fields.iter().all(|(_, v)| v.is_empty()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a record field by exact name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Record(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// JSON form of the value; `None` when absent
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Bool(b) => Some(Value::Bool(*b)),
            FieldValue::Text(s) => Some(Value::String(s.clone())),
            FieldValue::Number(n) => Some(n.to_json()),
            FieldValue::List(items) => Some(Value::Array(
                items.iter().map(|v| v.to_json().unwrap_or(Value::Null)).collect(),
            )),
            FieldValue::Record(fields) => Some(Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json().unwrap_or(Value::Null)))
                    .collect(),
            )),
        }
    }
}

impl From<Numeric> for FieldValue {
    fn from(n: Numeric) -> Self {
        FieldValue::Number(n)
    }
}

/// Conversion into the engine's value model
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl ToFieldValue for char {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

macro_rules! numeric_field_value {
    ($($t:ty),*) => {
        $(
            impl ToFieldValue for $t {
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Number(Numeric::from(*self))
                }
            }
        )*
    };
}

numeric_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Absent,
        }
    }
}

impl<T: ToFieldValue> ToFieldValue for [T] {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.iter().map(ToFieldValue::to_field_value).collect())
    }
}

impl<T: ToFieldValue, const N: usize> ToFieldValue for [T; N] {
    fn to_field_value(&self) -> FieldValue {
        self.as_slice().to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_slice().to_field_value()
    }
}

impl ToFieldValue for (f64, f64) {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(vec![
            FieldValue::Number(Numeric::Float(self.0)),
            FieldValue::Number(Numeric::Float(self.1)),
        ])
    }
}

impl ToFieldValue for Location {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::record([
            ("lat", FieldValue::Number(Numeric::Float(self.lat))),
            ("lon", FieldValue::Number(Numeric::Float(self.lon))),
        ])
    }
}

/// Latitude field names, highest priority first
pub const LATITUDE_FIELDS: [&str; 4] = ["Lat", "Latitude", "lat", "latitude"];
/// Longitude field names, highest priority first
pub const LONGITUDE_FIELDS: [&str; 6] = ["Lon", "Lng", "Longitude", "lon", "lng", "longitude"];

/// Anything that can be read as a latitude/longitude pair
pub trait LatLon {
    fn as_lat_lon(&self) -> Option<(f64, f64)>;
}

impl LatLon for Location {
    fn as_lat_lon(&self) -> Option<(f64, f64)> {
        Some((self.lat, self.lon))
    }
}

impl LatLon for (f64, f64) {
    fn as_lat_lon(&self) -> Option<(f64, f64)> {
        Some(*self)
    }
}

fn float_of(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(Numeric::Float(v)) => Some(*v),
        _ => None,
    }
}

fn first_float(value: &FieldValue, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| value.get(name).and_then(float_of))
}

impl LatLon for FieldValue {
    /// A record resolves each coordinate from the first listed name holding a
    /// float. A list needs at least two elements, the first two being floats.
    fn as_lat_lon(&self) -> Option<(f64, f64)> {
        match self {
            FieldValue::Record(_) => {
                let lat = first_float(self, &LATITUDE_FIELDS)?;
                let lon = first_float(self, &LONGITUDE_FIELDS)?;
                Some((lat, lon))
            }
            FieldValue::List(items) if items.len() >= 2 => {
                Some((float_of(&items[0])?, float_of(&items[1])?))
            }
            _ => None,
        }
    }
}

/// Three-way location outcome for callers that must tell a bad shape from a
/// point outside the bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationShape {
    Valid,
    OutOfBounds,
    Malformed,
}

impl LocationShape {
    pub fn classify<L: LatLon + ?Sized>(value: &L, bounds: &BoundingBox) -> Self {
        match value.as_lat_lon() {
            None => LocationShape::Malformed,
            Some((lat, lon)) if crate::geo::validate_in_bounds(lat, lon, bounds).is_ok() => {
                LocationShape::Valid
            }
            Some(_) => LocationShape::OutOfBounds,
        }
    }

    pub fn is_valid(&self) -> bool {
        *self == LocationShape::Valid
    }
}
