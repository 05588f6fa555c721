// Per-field projection rules

use crate::core::errors::CampError;

/// One mutable field's mapping contract
///
/// - `forward`: entity -> view
/// - `reverse`: view -> entity, may reject the incoming value
/// - `is_default`: true when the view carries the "not supplied" sentinel,
///   in which case a partial update leaves the entity field alone
pub struct FieldRule<E, V> {
    pub name: &'static str,
    pub forward: fn(&E, &mut V),
    pub reverse: fn(&V, &mut E) -> Result<(), CampError>,
    pub is_default: fn(&V) -> bool,
}

/// Run every forward rule
pub fn project<E, V>(rules: &[FieldRule<E, V>], entity: &E, view: &mut V) {
    for rule in rules {
        (rule.forward)(entity, view);
    }
}

/// Run every reverse rule, sentinels included
pub fn apply_all<E, V>(rules: &[FieldRule<E, V>], view: &V, entity: &mut E) -> Result<(), CampError> {
    for rule in rules {
        (rule.reverse)(view, entity)?;
    }
    Ok(())
}

/// Run reverse rules for supplied fields only
///
/// Rules run in table order, so later rules observe earlier writes.
pub fn apply_supplied<E, V>(rules: &[FieldRule<E, V>], view: &V, entity: &mut E) -> Result<(), CampError> {
    for rule in rules {
        if (rule.is_default)(view) {
            continue;
        }
        (rule.reverse)(view, entity)?;
    }
    Ok(())
}

/// Builds a rule for a `String` field copied verbatim, empty meaning "keep"
macro_rules! text_rule {
    ($name:literal, $($entity:ident).+ => $view:ident) => {
        $crate::mapping::rules::FieldRule {
            name: $name,
            forward: |entity, view| view.$view = entity.$($entity).+.clone(),
            reverse: |view, entity| {
                entity.$($entity).+ = view.$view.clone();
                Ok(())
            },
            is_default: |view| view.$view.is_empty(),
        }
    };
}

pub(crate) use text_rule;
