//! Scope tree and type/binding storage used during resolution.

mod repository;

use crate::prelude::*;
use crate::shared::{TypeContainer, BindingContainer};
use crate::shared::typed_ids::{TypeId, ScopeId, BindingId};
use crate::shared::meta::{Type, Pointer, Binding};
use crate::frontend::resolver::resolved::Resolved;
use repository::Repository;

/// Flat lists of types and bindings and a scope hierarchy describing their
/// scopes of validity for name lookups.
pub(crate) struct Scopes {
    /// Type repository. Types are interned, pointer types are created on demand.
    types: Repository<String, TypeId, Type>,
    /// Binding repository.
    bindings: Repository<String, BindingId, Binding>,
    /// Maps scope ids to their parent scope id. The root scope is its own parent.
    parent_map: Vec<ScopeId>,
    /// Maps scope ids to the id of the scope that owns their stack frame.
    frame_map: Vec<ScopeId>,
    /// Final frame sizes, computed when a frame scope is closed.
    frame_sizes: UnorderedMap<ScopeId, u32>,
}

impl Scopes {
    /// Creates a new scope tree with a root scope containing the primitive types.
    pub fn new() -> Self {
        let root = ScopeId::ROOT;
        let mut types = Repository::new();
        let void_id = types.insert(root, Some("void".to_string()), Type::void);
        let dyn_id = types.insert(root, Some("dyn".to_string()), Type::Dyn);
        let null_id = types.insert(root, None, Type::Null);
        let int_id = types.insert(root, Some("int".to_string()), Type::int);
        types.insert(root, Some("uint".to_string()), Type::uint);
        types.insert(root, Some("i8".to_string()), Type::i8);
        types.insert(root, Some("u8".to_string()), Type::u8);
        types.insert(root, Some("i16".to_string()), Type::i16);
        types.insert(root, Some("u16".to_string()), Type::u16);
        types.insert(root, Some("i32".to_string()), Type::i32);
        types.insert(root, Some("u32".to_string()), Type::u32);
        debug_assert!(void_id == TypeId::VOID);
        debug_assert!(dyn_id == TypeId::DYN);
        debug_assert!(null_id == TypeId::NULL);
        debug_assert!(int_id == TypeId::INT);
        Scopes {
            types,
            bindings: Repository::new(),
            parent_map: vec![ root ],
            frame_map: vec![ root ],
            frame_sizes: UnorderedMap::new(),
        }
    }

    /// Creates a new scope within the given parent scope. A scope either owns its
    /// own stack frame (functions, the root) or shares the frame of its parent.
    pub fn create_scope(self: &mut Self, parent: ScopeId, owns_frame: bool) -> ScopeId {
        let scope_id = ScopeId::from(self.parent_map.len());
        self.parent_map.push(parent);
        let frame_id = if owns_frame { scope_id } else { self.frame_map[Into::<usize>::into(parent)] };
        self.frame_map.push(frame_id);
        scope_id
    }

    /// Returns the parent of the given scope. The root scope is its own parent.
    pub fn parent_id(self: &Self, scope_id: ScopeId) -> ScopeId {
        self.parent_map[Into::<usize>::into(scope_id)]
    }

    /// Returns the id of the scope owning the stack frame the given scope lives in.
    pub fn frame_scope_id(self: &Self, scope_id: ScopeId) -> ScopeId {
        self.frame_map[Into::<usize>::into(scope_id)]
    }

    // types

    /// Inserts a named type into the given scope and returns its id.
    pub fn insert_type(self: &mut Self, scope_id: ScopeId, name: &str, ty: Type) -> TypeId {
        self.types.insert(scope_id, Some(name.to_string()), ty)
    }

    /// Interns an anonymous type (pointers, function signatures) and returns its id.
    /// Just returns the existing id if an equal type was interned before.
    pub fn insert_anonymous_type(self: &mut Self, ty: Type) -> TypeId {
        match self.types.id_by_value(&ty) {
            Some(type_id) => type_id,
            None => self.types.insert(ScopeId::ROOT, None, ty),
        }
    }

    /// Looks up a type by name in the given scope only.
    pub fn local_type_id(self: &Self, scope_id: ScopeId, name: &str) -> Option<TypeId> {
        self.types.id_by_name(scope_id, name.to_string())
    }

    /// Looks up a type by name in the given scope or any of its parents.
    pub fn lookup_type_id(self: &Self, mut scope_id: ScopeId, name: &str) -> Option<TypeId> {
        loop {
            if let Some(type_id) = self.local_type_id(scope_id, name) {
                return Some(type_id);
            }
            let parent = self.parent_id(scope_id);
            if parent == scope_id {
                return None;
            }
            scope_id = parent;
        }
    }

    /// Returns the id of a pointer type pointing at the given type.
    pub fn pointer_to(self: &mut Self, type_id: TypeId) -> TypeId {
        let pointer = match self.type_by_id(type_id) {
            Type::Pointer(pointer) => Pointer { base_type_id: pointer.base_type_id, depth: pointer.depth + 1 },
            _ => Pointer { base_type_id: type_id, depth: 1 },
        };
        self.insert_anonymous_type(Type::Pointer(pointer))
    }

    /// Returns the id of the type the given pointer type points at, or None if
    /// the given type is not a pointer.
    pub fn pointee(self: &mut Self, type_id: TypeId) -> Option<TypeId> {
        let pointer = match self.type_by_id(type_id) {
            Type::Pointer(pointer) => pointer.clone(),
            _ => return None,
        };
        if pointer.depth > 1 {
            Some(self.insert_anonymous_type(Type::Pointer(Pointer { base_type_id: pointer.base_type_id, depth: pointer.depth - 1 })))
        } else {
            Some(pointer.base_type_id)
        }
    }

    // bindings

    /// Inserts a binding into the given scope and returns its id.
    pub fn insert_binding(self: &mut Self, scope_id: ScopeId, name: &str, binding: Binding) -> BindingId {
        self.bindings.insert(scope_id, Some(name.to_string()), binding)
    }

    /// Looks up a binding by name in the given scope only.
    pub fn local_binding_id(self: &Self, scope_id: ScopeId, name: &str) -> Option<BindingId> {
        self.bindings.id_by_name(scope_id, name.to_string())
    }

    /// Looks up a binding by name in the given scope or any of its parents.
    pub fn lookup_binding_id(self: &Self, mut scope_id: ScopeId, name: &str) -> Option<BindingId> {
        loop {
            if let Some(binding_id) = self.local_binding_id(scope_id, name) {
                return Some(binding_id);
            }
            let parent = self.parent_id(scope_id);
            if parent == scope_id {
                return None;
            }
            scope_id = parent;
        }
    }

    // frame layout

    /// Assigns frame offsets to all stack allocated bindings within the frame owned by
    /// the given scope and records the total frame size. Returns the frame size, or
    /// None if a binding has an unsized type.
    pub fn close_frame(self: &mut Self, scope_id: ScopeId) -> Option<u32> {
        let binding_ids: Vec<BindingId> = self.bindings.ids()
            .filter(|binding_id| self.frame_scope_id(self.bindings.scope_by_id(*binding_id)) == scope_id)
            .collect();
        let mut offset = 0;
        for binding_id in binding_ids {
            let binding = self.binding_by_id(binding_id);
            if !binding.is_stack_allocated {
                continue;
            }
            let type_id = binding.type_id;
            let size = self.type_size(type_id)?;
            self.binding_by_id_mut(binding_id).offset = Some(offset);
            offset += size;
        }
        self.frame_sizes.insert(scope_id, offset);
        Some(offset)
    }
}

impl TypeContainer for Scopes {
    fn type_by_id(self: &Self, type_id: TypeId) -> &Type {
        self.types.value_by_id(type_id)
    }
    fn type_by_id_mut(self: &mut Self, type_id: TypeId) -> &mut Type {
        self.types.value_by_id_mut(type_id)
    }
}

impl BindingContainer for Scopes {
    fn binding_by_id(self: &Self, binding_id: BindingId) -> &Binding {
        self.bindings.value_by_id(binding_id)
    }
    fn binding_by_id_mut(self: &mut Self, binding_id: BindingId) -> &mut Binding {
        self.bindings.value_by_id_mut(binding_id)
    }
}

impl Into<Resolved> for Scopes {
    /// Discards the name lookup structures and returns the flat type and binding
    /// lists along with the computed frame sizes.
    fn into(self: Self) -> Resolved {
        Resolved::new(self.types.into(), self.bindings.into(), self.frame_sizes)
    }
}
