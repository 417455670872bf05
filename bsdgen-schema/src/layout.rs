//! Layout planning for derived fields.
//!
//! A struct's wire layout and its public surface differ: length
//! determinants and switch masks are written on the wire but computed from
//! the fields they describe. The planner assigns every field a
//! [`FieldRole`] once, so the emitter never rediscovers these links.

use crate::builtins::BuiltinType;
use crate::error::SchemaError;
use crate::resolver::{ResolvedRef, ResolvedSchema};
use crate::types::{FieldId, StructType, TypeDeclaration};
use std::collections::BTreeSet;

/// Role of a field in the wire layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// Ordinary field, public and encoded as-is.
    Plain,
    /// Element count of the array at `array`.
    LengthDeterminant {
        /// The described array field.
        array: FieldId,
        /// Integer type of the count.
        builtin: BuiltinType,
    },
    /// Presence bits of optional fields.
    SwitchMask {
        /// Controlled fields and their bit indexes, in field order.
        bits: Vec<(FieldId, u32)>,
        /// Unsigned integer type of the mask.
        builtin: BuiltinType,
    },
    /// Array whose count lives in the field at `length`.
    Array {
        /// The length determinant field.
        length: FieldId,
    },
    /// Optional field, present if `bit` is set in the mask at `mask`.
    SwitchControlled {
        /// The switch mask field.
        mask: FieldId,
        /// Bit index within the mask.
        bit: u32,
    },
}

impl FieldRole {
    /// Returns true for fields computed from other fields.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(
            self,
            Self::LengthDeterminant { .. } | Self::SwitchMask { .. }
        )
    }
}

/// Planned layout of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field role.
    pub role: FieldRole,
}

/// Planned layout of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    /// Per-field layout, in schema (wire) order.
    pub fields: Vec<FieldLayout>,
    /// Fields on the public surface, in schema order.
    pub public_fields: Vec<FieldId>,
}

impl StructLayout {
    /// Returns the role of a field.
    #[must_use]
    pub fn role(&self, field: FieldId) -> &FieldRole {
        &self.fields[field].role
    }

    /// Returns true if the struct has nothing on the wire.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Plans the layout of one struct.
///
/// # Arguments
/// * `def` - Struct declaration
/// * `refs` - Resolved field types, parallel to `def.fields`
///
/// # Errors
/// Returns `SchemaError::Layout` if the length and switch attributes are
/// inconsistent.
pub fn plan_struct(def: &StructType, refs: &[ResolvedRef]) -> Result<StructLayout, SchemaError> {
    let error = |field: FieldId, reason: &str| {
        SchemaError::layout(def.name.clone(), def.fields[field].name.clone(), reason)
    };
    let target_of = |field: FieldId, target: &str| {
        def.field_index(target).ok_or_else(|| {
            error(field, &format!("references unknown field '{target}'"))
        })
    };
    let integer_of = |field: FieldId| {
        refs.get(field)
            .and_then(ResolvedRef::builtin)
            .filter(BuiltinType::is_integer)
    };

    let mut roles: Vec<Option<FieldRole>> = vec![None; def.fields.len()];

    // Length determinants and arrays.
    for (id, field) in def.fields.iter().enumerate() {
        let Some(length) = &field.length_field else {
            continue;
        };
        let length = target_of(id, length)?;

        if field.switch.is_some() {
            return Err(error(id, "a field cannot be both an array and optional"));
        }
        if length >= id {
            return Err(error(
                id,
                "length field must be declared before the array it describes",
            ));
        }
        if roles[length].is_some() {
            return Err(error(length, "field already has a derived role"));
        }
        let builtin = integer_of(length)
            .ok_or_else(|| error(length, "length field must be a built-in integer"))?;

        roles[length] = Some(FieldRole::LengthDeterminant { array: id, builtin });
        roles[id] = Some(FieldRole::Array { length });
    }

    // Switch masks and optional fields.
    let mut masks: Vec<Option<MaskPlan>> = vec![None; def.fields.len()];

    for (id, field) in def.fields.iter().enumerate() {
        let Some(switch) = &field.switch else {
            continue;
        };
        let mask = target_of(id, &switch.field)?;

        if roles[id].as_ref().is_some_and(FieldRole::is_derived) {
            return Err(error(
                id,
                "a length or switch field cannot itself be an array or optional",
            ));
        }
        if mask >= id {
            return Err(error(
                id,
                "switch field must be declared before the field it controls",
            ));
        }
        if roles[mask].is_some() && masks[mask].is_none() {
            return Err(error(mask, "field already has a derived role"));
        }
        let builtin = integer_of(mask)
            .filter(BuiltinType::is_unsigned)
            .ok_or_else(|| error(mask, "switch field must be a built-in unsigned integer"))?;

        let plan = masks[mask].get_or_insert_with(|| MaskPlan::new(builtin));
        if let Some(bit) = switch.bit {
            if bit >= plan.width {
                return Err(error(
                    id,
                    &format!("switch bit {bit} exceeds the {}-bit mask", plan.width),
                ));
            }
            if !plan.used.insert(bit) {
                return Err(error(id, &format!("switch bit {bit} is already in use")));
            }
        }
        plan.controlled.push((id, switch.bit));
        roles[mask] = Some(FieldRole::SwitchMask {
            bits: Vec::new(),
            builtin,
        });
    }

    // Fields without an explicit bit take the next unused one.
    for (mask, plan) in masks.into_iter().enumerate() {
        let Some(mut plan) = plan else { continue };
        let mut bits = Vec::with_capacity(plan.controlled.len());

        for (id, bit) in std::mem::take(&mut plan.controlled) {
            let bit = match bit {
                Some(bit) => bit,
                None => plan
                    .next_free()
                    .ok_or_else(|| error(id, "no free bit left in the switch mask"))?,
            };
            roles[id] = Some(FieldRole::SwitchControlled { mask, bit });
            bits.push((id, bit));
        }

        roles[mask] = Some(FieldRole::SwitchMask {
            bits,
            builtin: plan.builtin,
        });
    }

    // A derived field must itself be a plain scalar.
    for (id, field) in def.fields.iter().enumerate() {
        let derived = roles[id].as_ref().is_some_and(FieldRole::is_derived);
        if derived && (field.length_field.is_some() || field.switch.is_some()) {
            return Err(error(
                id,
                "a length or switch field cannot itself be an array or optional",
            ));
        }
    }

    let fields: Vec<FieldLayout> = roles
        .into_iter()
        .map(|role| FieldLayout {
            role: role.unwrap_or(FieldRole::Plain),
        })
        .collect();
    let public_fields = fields
        .iter()
        .enumerate()
        .filter(|(_, layout)| !layout.role.is_derived())
        .map(|(id, _)| id)
        .collect();

    Ok(StructLayout {
        fields,
        public_fields,
    })
}

/// Plans every struct in a resolved schema.
///
/// Returns one entry per type in emission order; non-struct types get `None`.
///
/// # Errors
/// Returns the first `SchemaError::Layout` encountered.
pub fn plan(schema: &ResolvedSchema) -> Result<Vec<Option<StructLayout>>, SchemaError> {
    schema
        .types
        .iter()
        .map(|resolved| match &resolved.declaration {
            TypeDeclaration::Struct(def) => plan_struct(def, &resolved.field_refs).map(Some),
            _ => Ok(None),
        })
        .collect()
}

/// Working state for one switch mask.
#[derive(Debug, Clone)]
struct MaskPlan {
    builtin: BuiltinType,
    width: u32,
    used: BTreeSet<u32>,
    controlled: Vec<(FieldId, Option<u32>)>,
}

impl MaskPlan {
    fn new(builtin: BuiltinType) -> Self {
        Self {
            builtin,
            width: builtin.bit_width().unwrap_or(0),
            used: BTreeSet::new(),
            controlled: Vec::new(),
        }
    }

    /// Claims the lowest unused bit.
    fn next_free(&mut self) -> Option<u32> {
        let bit = (0..self.width).find(|b| !self.used.contains(b))?;
        self.used.insert(bit);
        Some(bit)
    }
}
