use crate::prelude::*;
use crate::shared::typed_ids::TypeId;

/// Binding meta information.
#[derive(Clone, Debug)]
pub struct Binding {
    pub type_id: TypeId,
    /// Byte offset into the owning stack frame. Assigned when the frame scope is closed,
    /// None for bindings held in plain target variables.
    pub offset: Option<u32>,
    pub is_parameter: bool,
    /// Whether the binding lives in linear memory rather than a plain target variable.
    /// Settled during type checking, only read afterwards.
    pub is_stack_allocated: bool,
}

/// A single struct field with its resolved type and byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub type_id: TypeId,
    pub offset: u32,
}

/// Information about a struct in a resolved program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Struct {
    pub name: String,
    /// Fields in declaration order, offsets assigned contiguously starting at 0.
    pub fields: Vec<Field>,
}

impl Struct {
    /// Returns the named field, if it exists.
    pub fn field(self: &Self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Information about a pointer type. The base type is never itself a pointer,
/// nesting is expressed through the depth instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub base_type_id: TypeId,
    pub depth: u32,
}

/// Information about a function signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Function {
    pub ret_type_id: TypeId,
    pub arg_type_ids: Vec<TypeId>,
}

/// Information about a data type in a resolved program.
#[allow(non_camel_case_types)]
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Type {
    void,
    /// Dynamically typed escape hatch, exempt from type checking.
    Dyn,
    /// Type of the null literal.
    Null,
    int,
    uint,
    i8,
    u8,
    i16,
    u16,
    i32,
    u32,
    Struct(Struct),
    Pointer(Pointer),
    Function(Function),
}

impl Debug for Type {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Struct(v) => write!(f, "{:?}", v),
            Type::Pointer(v) => write!(f, "{:?}", v),
            Type::Function(v) => write!(f, "{:?}", v),
            ty => write!(f, "{}", ty),
        }
    }
}

impl Display for Type {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::void => write!(f, "void"),
            Type::Dyn => write!(f, "dyn"),
            Type::Null => write!(f, "null"),
            Type::int => write!(f, "int"),
            Type::uint => write!(f, "uint"),
            Type::i8 => write!(f, "i8"),
            Type::u8 => write!(f, "u8"),
            Type::i16 => write!(f, "i16"),
            Type::u16 => write!(f, "u16"),
            Type::i32 => write!(f, "i32"),
            Type::u32 => write!(f, "u32"),
            Type::Struct(v) => write!(f, "{}", v.name),
            Type::Pointer(_) => write!(f, "pointer"),
            Type::Function(_) => write!(f, "function"),
        }
    }
}

impl Type {
    /// Size of the type in bytes, None for sizeless types and structs.
    /// Struct sizes depend on their fields and are computed by `TypeContainer::type_size`.
    pub const fn primitive_size(self: &Self) -> Option<u32> {
        match self {
            Type::void | Type::Dyn | Type::Null | Type::Struct(_) => None,
            Type::i8 | Type::u8 => Some(1),
            Type::i16 | Type::u16 => Some(2),
            Type::int | Type::uint | Type::i32 | Type::u32 => Some(4),
            Type::Pointer(_) | Type::Function(_) => Some(4),
        }
    }
    /// Whether the type is void.
    pub const fn is_void(self: &Self) -> bool {
        match self {
            Type::void => true,
            _ => false,
        }
    }
    /// Whether the type is the dynamically typed escape hatch.
    pub const fn is_dyn(self: &Self) -> bool {
        match self {
            Type::Dyn => true,
            _ => false,
        }
    }
    /// Whether the type is a signed integer.
    pub const fn is_signed(self: &Self) -> bool {
        match self {
            Type::int | Type::i8 | Type::i16 | Type::i32 => true,
            _ => false,
        }
    }
    /// Whether the type is an unsigned integer.
    pub const fn is_unsigned(self: &Self) -> bool {
        match self {
            Type::uint | Type::u8 | Type::u16 | Type::u32 => true,
            _ => false,
        }
    }
    /// Returns the type as a struct.
    pub const fn as_struct(self: &Self) -> Option<&Struct> {
        match self {
            Type::Struct(struct_) => Some(struct_),
            _ => None,
        }
    }
    /// Returns the type as a mutable struct.
    pub fn as_struct_mut(self: &mut Self) -> Option<&mut Struct> {
        match self {
            Type::Struct(struct_) => Some(struct_),
            _ => None,
        }
    }
    /// Returns the type as a pointer.
    pub const fn as_pointer(self: &Self) -> Option<&Pointer> {
        match self {
            Type::Pointer(pointer) => Some(pointer),
            _ => None,
        }
    }
    /// Returns the type as a function signature.
    pub const fn as_function(self: &Self) -> Option<&Function> {
        match self {
            Type::Function(function) => Some(function),
            _ => None,
        }
    }
}
