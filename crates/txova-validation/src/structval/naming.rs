//! Field-name resolution
//!
//! Failures are reported under a field's external (wire) name so API clients
//! see the keys they sent. The resolver runs once per field when a schema is
//! built, never per validation call.

/// Wire name that opts a field out of renaming
pub const WIRE_NAME_OPT_OUT: &str = "-";

/// Both names a schema field can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName<'a> {
    /// Identifier of the field in the Rust type
    pub structural: &'a str,
    /// Declared wire name, possibly followed by `,option` suffixes
    pub wire: Option<&'a str>,
}

impl<'a> FieldName<'a> {
    pub fn new(structural: &'a str, wire: Option<&'a str>) -> Self {
        Self { structural, wire }
    }
}

/// Signature of a pluggable resolver
pub type NameResolverFn = dyn Fn(&FieldName<'_>) -> String + Send + Sync;

/// Default policy: the wire name unless it is missing, empty or `"-"`
///
/// Only the part before the first comma counts, so `"phone,omitempty"`
/// resolves to `phone`.
pub fn wire_or_structural(name: &FieldName<'_>) -> String {
    let wire = name
        .wire
        .map(|w| w.split(',').next().unwrap_or_default().trim());

    match wire {
        Some(w) if !w.is_empty() && w != WIRE_NAME_OPT_OUT => w.to_string(),
        _ => name.structural.to_string(),
    }
}

/// Run `resolver`, falling back to the structural name if it returns nothing
pub(crate) fn resolve(resolver: &NameResolverFn, name: &FieldName<'_>) -> String {
    let resolved = resolver(name);
    if resolved.is_empty() {
        name.structural.to_string()
    } else {
        resolved
    }
}
