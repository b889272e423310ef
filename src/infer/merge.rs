//! Unification of two type nodes observed at the same position
//!
//! `merge_types` consumes both operands and returns the generalization. The
//! left operand is treated as the accumulator: compound nodes are updated in
//! place inside it, and anything seen for the first time in the right
//! operand is ordered after what the left already holds.

use crate::error::{Error, Result};
use crate::types::{ArrayDef, ObjectDef, OneOfDef, Position, ScalarDef, ScalarKind, TypeDef};
use std::mem;
use tracing::trace;

/// Produce one node that soundly covers both `a` and `b`
pub fn merge_types(a: TypeDef, b: TypeDef) -> Result<TypeDef> {
    check_positions(&a, &b)?;

    match (a, b) {
        (TypeDef::Never, other) | (other, TypeDef::Never) => Ok(other),
        (TypeDef::String(mut left), TypeDef::String(right)) => {
            left.merge(right);
            Ok(TypeDef::String(left))
        }
        (TypeDef::Scalar(left), TypeDef::Scalar(right)) => Ok(merge_scalars(left, right)),
        (left @ TypeDef::Scalar(_), right @ TypeDef::String(_))
        | (left @ TypeDef::String(_), right @ TypeDef::Scalar(_)) => {
            Ok(TypeDef::OneOf(union_of(left, right)))
        }
        (TypeDef::OneOf(union), other) if !other.is_one_of() => {
            absorb(union, other).map(TypeDef::OneOf)
        }
        (other, TypeDef::OneOf(union)) if !other.is_one_of() => {
            // Keep the older operand first, then fold the union in.
            let seed = OneOfDef {
                position: union.position.clone(),
                items: vec![other],
            };
            merge_unions(seed, union).map(TypeDef::OneOf)
        }
        (left, right) if left.is_object() != right.is_object() || is_nullable_array(&left, &right) => {
            Ok(TypeDef::OneOf(union_of(left, right)))
        }
        (TypeDef::Array(left), TypeDef::Array(right)) => merge_arrays(left, right).map(TypeDef::Array),
        (TypeDef::Object(left), TypeDef::Object(right)) => {
            merge_objects(left, right).map(TypeDef::Object)
        }
        (TypeDef::OneOf(left), TypeDef::OneOf(right)) => {
            merge_unions(left, right).map(TypeDef::OneOf)
        }
        (left, right) => Err(Error::IncompatibleMerge {
            left: left.type_enum(),
            right: right.type_enum(),
        }),
    }
}

fn check_positions(a: &TypeDef, b: &TypeDef) -> Result<()> {
    if let (Some(left), Some(right)) = (a.position(), b.position()) {
        if left != right {
            return Err(Error::PositionMismatch {
                left: left.clone(),
                right: right.clone(),
            });
        }
    }
    Ok(())
}

fn merge_scalars(left: ScalarDef, right: ScalarDef) -> TypeDef {
    match (left.kind, right.kind) {
        (a, b) if a == b => TypeDef::Scalar(ScalarDef {
            position: left.position,
            kind: a,
        }),
        (ScalarKind::Int, ScalarKind::Float) | (ScalarKind::Float, ScalarKind::Int) => {
            TypeDef::Scalar(ScalarDef {
                position: left.position,
                kind: ScalarKind::Float,
            })
        }
        _ => TypeDef::OneOf(union_of(TypeDef::Scalar(left), TypeDef::Scalar(right))),
    }
}

fn union_of(left: TypeDef, right: TypeDef) -> OneOfDef {
    trace!(left = %left.type_enum(), right = %right.type_enum(), "escalating to union");
    // Never is resolved before any union is built, so the left has a position.
    let position = left.position().cloned().unwrap_or_else(Position::root);
    OneOfDef {
        position,
        items: vec![left, right],
    }
}

/// An array paired with `None`; arrays with any other leaf stay incompatible
fn is_nullable_array(a: &TypeDef, b: &TypeDef) -> bool {
    match (a, b) {
        (TypeDef::Array(_), other) | (other, TypeDef::Array(_)) => other.is_none(),
        _ => false,
    }
}

/// Whether `incoming` belongs in the existing alternative `item`
fn absorbs(item: &TypeDef, incoming: &TypeDef) -> bool {
    match (item, incoming) {
        (TypeDef::Scalar(a), TypeDef::Scalar(b)) => a.kind == b.kind,
        (TypeDef::String(_), TypeDef::String(_))
        | (TypeDef::Object(_), TypeDef::Object(_))
        | (TypeDef::Array(_), TypeDef::Array(_)) => true,
        _ => false,
    }
}

/// Fold one non-union node into a union
fn absorb(mut union: OneOfDef, incoming: TypeDef) -> Result<OneOfDef> {
    match union.items.iter().position(|item| absorbs(item, &incoming)) {
        Some(index) => {
            let existing = mem::replace(&mut union.items[index], TypeDef::Never);
            union.items[index] = merge_types(existing, incoming)?;
        }
        None => union.items.push(incoming),
    }
    Ok(union)
}

fn merge_unions(left: OneOfDef, right: OneOfDef) -> Result<OneOfDef> {
    right.items.into_iter().try_fold(left, absorb)
}

fn merge_arrays(left: ArrayDef, right: ArrayDef) -> Result<ArrayDef> {
    Ok(ArrayDef {
        position: left.position,
        items: Box::new(merge_types(*left.items, *right.items)?),
    })
}

fn merge_objects(mut left: ObjectDef, right: ObjectDef) -> Result<ObjectDef> {
    for (key, count) in right.keys_statistic {
        *left.keys_statistic.entry(key).or_insert(0) += count;
    }
    left.merge_count += right.merge_count + 1;

    for key in left.properties.keys() {
        if !right.properties.contains_key(key) {
            left.not_required.insert(key.clone());
        }
    }
    left.not_required.extend(right.not_required);

    for (key, right_child) in right.properties {
        match left.properties.get_mut(&key) {
            Some(slot) => {
                let left_child = mem::replace(slot, TypeDef::Never);
                *slot = merge_types(left_child, right_child)?;
            }
            None => {
                left.not_required.insert(key.clone());
                left.properties.insert(key, right_child);
            }
        }
    }

    Ok(left)
}
