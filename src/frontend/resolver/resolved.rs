//! Resolved type and binding information, produced by the resolver and
//! consumed by the code generator.

use crate::prelude::*;
use crate::shared::{TypeContainer, BindingContainer};
use crate::shared::typed_ids::{TypeId, ScopeId, BindingId};
use crate::shared::meta::{Type, Binding};

/// The resolved type and binding tables of a program.
pub struct Resolved {
    types: Vec<Type>,
    bindings: Vec<Binding>,
    frame_sizes: UnorderedMap<ScopeId, u32>,
}

impl Resolved {
    pub(crate) fn new(types: Vec<Type>, bindings: Vec<Binding>, frame_sizes: UnorderedMap<ScopeId, u32>) -> Self {
        Self { types, bindings, frame_sizes }
    }
    /// Returns the stack frame size of the frame owned by the given scope.
    pub fn frame_size(self: &Self, scope_id: ScopeId) -> u32 {
        self.frame_sizes.get(&scope_id).copied().unwrap_or(0)
    }
}

impl TypeContainer for Resolved {
    fn type_by_id(self: &Self, type_id: TypeId) -> &Type {
        &self.types[Into::<usize>::into(type_id)]
    }
    fn type_by_id_mut(self: &mut Self, type_id: TypeId) -> &mut Type {
        &mut self.types[Into::<usize>::into(type_id)]
    }
}

impl BindingContainer for Resolved {
    fn binding_by_id(self: &Self, binding_id: BindingId) -> &Binding {
        &self.bindings[Into::<usize>::into(binding_id)]
    }
    fn binding_by_id_mut(self: &mut Self, binding_id: BindingId) -> &mut Binding {
        &mut self.bindings[Into::<usize>::into(binding_id)]
    }
}
