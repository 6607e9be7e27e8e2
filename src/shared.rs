//! Code shared between the frontend and the code generator.

pub mod typed_ids;
pub mod meta;
pub mod error;

use crate::shared::typed_ids::{TypeId, BindingId};
use crate::shared::meta::{Type, Binding};

/// A container holding type id to type mappings.
pub trait TypeContainer {
    /// Returns a reference to the type.
    fn type_by_id(self: &Self, type_id: TypeId) -> &Type;
    /// Returns a mutable reference to the type.
    fn type_by_id_mut(self: &mut Self, type_id: TypeId) -> &mut Type;
    /// Returns the total size of the type in bytes, None for sizeless types
    /// and structs whose fields have not been filled in yet.
    fn type_size(self: &Self, type_id: TypeId) -> Option<u32> {
        match self.type_by_id(type_id) {
            Type::Struct(struct_) => {
                if struct_.fields.is_empty() {
                    None
                } else {
                    let mut total = 0;
                    for field in &struct_.fields {
                        total += self.type_size(field.type_id)?;
                    }
                    Some(total)
                }
            }
            ty => ty.primitive_size(),
        }
    }
    /// Returns whether given_type_id is acceptable to a binding of the accepted_type_id,
    /// e.g. null is acceptable to a pointer binding, but not the inverse.
    fn type_accepted_for(self: &Self, given_type_id: TypeId, accepted_type_id: TypeId) -> bool {
        if given_type_id == accepted_type_id {
            true
        } else if self.type_by_id(given_type_id).is_void() {
            // void is acceptable everywhere
            true
        } else {
            match (self.type_by_id(accepted_type_id), self.type_by_id(given_type_id)) {
                (Type::Pointer(_), Type::Null) => true,
                // a void pointer of depth one accepts any pointer
                (Type::Pointer(accepted), Type::Pointer(_)) if accepted.base_type_id == TypeId::VOID && accepted.depth == 1 => true,
                (Type::Pointer(accepted), Type::Pointer(given)) => {
                    accepted.depth == given.depth && self.type_accepted_for(given.base_type_id, accepted.base_type_id)
                }
                (Type::Function(_), Type::Null) => true,
                // function values are interchangeable regardless of signature
                (Type::Function(_), Type::Function(_)) => true,
                _ => false,
            }
        }
    }
    /// Returns the recursively resolved type name.
    fn type_name(self: &Self, type_id: TypeId) -> String {
        match self.type_by_id(type_id) {
            Type::Pointer(pointer) => {
                format!("{}{}", self.type_name(pointer.base_type_id), "*".repeat(pointer.depth as usize))
            }
            Type::Function(function) => {
                let args: Vec<String> = function.arg_type_ids.iter().map(|&arg| self.type_name(arg)).collect();
                format!("{}({})", self.type_name(function.ret_type_id), args.join(", "))
            }
            ty => ty.to_string(),
        }
    }
}

/// A container holding binding id to Binding mappings.
pub trait BindingContainer {
    /// Returns a reference to the binding.
    fn binding_by_id(self: &Self, binding_id: BindingId) -> &Binding;
    /// Returns a mutable reference to the binding.
    fn binding_by_id_mut(self: &mut Self, binding_id: BindingId) -> &mut Binding;
}
