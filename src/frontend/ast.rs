//! AST representation of a parsed program.

use crate::prelude::*;
use crate::shared::typed_ids::{TypeId, ScopeId, BindingId};

/// A position in the source text, stored as the length of the remaining input.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Position(pub u32);

impl Position {
    /// Computes the 1-based line/column number from the original input.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        let offset = input.len().saturating_sub(self.0 as usize);
        let mut line = 1;
        let mut line_start = 0;
        for (index, c) in input[..offset].char_indices() {
            if c == '\n' {
                line += 1;
                line_start = index + 1;
            }
        }
        (line, (offset - line_start + 1) as u32)
    }
}

/// Implemented by AST nodes that have a position in the source text.
pub trait Positioned {
    /// Position of the node in the source text.
    fn position(self: &Self) -> Position;
}

macro_rules! impl_positioned {
    ($($node:ident),+) => { $(
        impl Positioned for $node {
            fn position(self: &Self) -> Position {
                self.position
            }
        }
    )+ };
}

impl_positioned!(
    Ident, TypeName, StructDecl, StructField, FunctionDecl, Param, VarDecl, VarDeclarator,
    IfStatement, WhileLoop, ForLoop, Block, Return,
    Literal, Variable, Call, Member, UnaryOp, PostfixOp, BinaryOp, Conditional, Assignment, SizeOf, New
);

/// A name in the source code.
#[derive(Clone, Debug)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

/// A type reference as written in the source, a base type name followed by pointer stars.
#[derive(Debug)]
pub struct TypeName {
    pub ident: Ident,
    pub pointers: u32,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub enum Statement {
    StructDecl(StructDecl),
    FunctionDecl(FunctionDecl),
    VarDecl(VarDecl),
    If(IfStatement),
    While(WhileLoop),
    For(Box<ForLoop>),
    Block(Block),
    Return(Return),
    Expression(Expression),
}

#[derive(Debug)]
pub struct StructDecl {
    pub ident: Ident,
    pub fields: Vec<StructField>,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub struct StructField {
    pub ty: TypeName,
    pub ident: Ident,
    pub position: Position,
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub ret: TypeName,
    pub ident: Ident,
    pub params: Vec<Param>,
    pub block: Block,
    pub type_id: Option<TypeId>,
    pub binding_id: Option<BindingId>,
    pub scope_id: Option<ScopeId>,
    pub position: Position,
}

#[derive(Debug)]
pub struct Param {
    pub ty: TypeName,
    pub ident: Ident,
    pub binding_id: Option<BindingId>,
    pub position: Position,
}

/// A variable declaration statement, e.g. `int a, *b = null;`.
#[derive(Debug)]
pub struct VarDecl {
    pub type_name: Ident,
    pub decls: Vec<VarDeclarator>,
    pub position: Position,
}

#[derive(Debug)]
pub struct VarDeclarator {
    pub pointers: u32,
    pub ident: Ident,
    pub init: Option<Initializer>,
    pub type_id: Option<TypeId>,
    pub binding_id: Option<BindingId>,
    pub position: Position,
}

#[derive(Debug)]
pub enum Initializer {
    Expression(Expression),
    /// Brace initializer listing one expression per struct field.
    Struct(Vec<Expression>),
}

#[derive(Debug)]
pub struct IfStatement {
    pub cond: Expression,
    pub if_block: Block,
    pub else_block: Option<Else>,
    pub position: Position,
}

#[derive(Debug)]
pub enum Else {
    Block(Block),
    If(Box<IfStatement>),
}

#[derive(Debug)]
pub struct WhileLoop {
    pub cond: Expression,
    pub block: Block,
    pub is_do_while: bool,
    pub position: Position,
}

#[derive(Debug)]
pub struct ForLoop {
    pub init: Option<ForInit>,
    pub cond: Option<Expression>,
    pub step: Option<Expression>,
    pub block: Block,
    pub scope_id: Option<ScopeId>,
    pub position: Position,
}

#[derive(Debug)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expression(Expression),
}

#[derive(Debug)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub scope_id: Option<ScopeId>,
    pub position: Position,
}

#[derive(Debug)]
pub struct Return {
    pub expr: Option<Expression>,
    pub position: Position,
}

#[derive(Debug)]
pub enum Expression {
    Literal(Literal),
    Variable(Variable),
    Call(Box<Call>),
    Member(Box<Member>),
    UnaryOp(Box<UnaryOp>),
    PostfixOp(Box<PostfixOp>),
    BinaryOp(Box<BinaryOp>),
    Conditional(Box<Conditional>),
    Assignment(Box<Assignment>),
    SizeOf(SizeOf),
    New(New),
}

impl Expression {
    /// The resolved type of the expression, None until the resolver has run.
    pub fn type_id(self: &Self) -> Option<TypeId> {
        match self {
            Expression::Literal(v) => v.type_id,
            Expression::Variable(v) => v.type_id,
            Expression::Call(v) => v.type_id,
            Expression::Member(v) => v.type_id,
            Expression::UnaryOp(v) => v.type_id,
            Expression::PostfixOp(v) => v.type_id,
            Expression::BinaryOp(v) => v.type_id,
            Expression::Conditional(v) => v.type_id,
            Expression::Assignment(v) => v.type_id,
            Expression::SizeOf(v) => v.type_id,
            Expression::New(v) => v.type_id,
        }
    }
}

impl Positioned for Expression {
    fn position(self: &Self) -> Position {
        match self {
            Expression::Literal(v) => v.position,
            Expression::Variable(v) => v.position,
            Expression::Call(v) => v.position,
            Expression::Member(v) => v.position,
            Expression::UnaryOp(v) => v.position,
            Expression::PostfixOp(v) => v.position,
            Expression::BinaryOp(v) => v.position,
            Expression::Conditional(v) => v.position,
            Expression::Assignment(v) => v.position,
            Expression::SizeOf(v) => v.position,
            Expression::New(v) => v.position,
        }
    }
}

#[derive(Debug)]
pub struct Literal {
    pub value: LiteralValue,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub enum LiteralValue {
    Numeric(i64),
    Bool(bool),
    Null,
    String(String),
}

#[derive(Debug)]
pub struct Variable {
    pub ident: Ident,
    pub binding_id: Option<BindingId>,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub struct Call {
    pub callee: Expression,
    pub args: Vec<Expression>,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

/// A member access: a dot or arrow field access or a pointer index.
#[derive(Debug)]
pub struct Member {
    pub expr: Expression,
    pub access: Access,
    /// Byte offset of the accessed field, None for index and dynamically typed accesses.
    pub field_offset: Option<u32>,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub enum Access {
    Dot(Ident),
    Arrow(Ident),
    Index(Expression),
}

#[derive(Debug)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub expr: Expression,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum UnaryOperator {
    AddressOf,
    Deref,
    Minus,
    Not,
    BitNot,
}

impl Display for UnaryOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            UnaryOperator::AddressOf => "&",
            UnaryOperator::Deref => "*",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
        })
    }
}

#[derive(Debug)]
pub struct PostfixOp {
    pub op: PostfixOperator,
    pub expr: Expression,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PostfixOperator {
    Inc,
    Dec,
}

impl Display for PostfixOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            PostfixOperator::Inc => "++",
            PostfixOperator::Dec => "--",
        })
    }
}

#[derive(Debug)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum BinaryOperator {
    Mul, Div, Rem,
    Add, Sub,
    Shl, Shr,
    Less, Greater, LessEq, GreaterEq,
    Eq, NotEq,
    BitAnd, BitXor, BitOr,
    And, Or,
}

impl BinaryOperator {
    /// Returns the operator for its source representation.
    pub fn from_string(op: &str) -> Self {
        match op {
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Div,
            "%" => BinaryOperator::Rem,
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "<<" => BinaryOperator::Shl,
            ">>" => BinaryOperator::Shr,
            "<" => BinaryOperator::Less,
            ">" => BinaryOperator::Greater,
            "<=" => BinaryOperator::LessEq,
            ">=" => BinaryOperator::GreaterEq,
            "==" => BinaryOperator::Eq,
            "!=" => BinaryOperator::NotEq,
            "&" => BinaryOperator::BitAnd,
            "^" => BinaryOperator::BitXor,
            "|" => BinaryOperator::BitOr,
            "&&" => BinaryOperator::And,
            "||" => BinaryOperator::Or,
            _ => panic!("Invalid binary operator {}", op),
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEq => "<=",
            BinaryOperator::GreaterEq => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitOr => "|",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        })
    }
}

#[derive(Debug)]
pub struct Conditional {
    pub cond: Expression,
    pub true_expr: Expression,
    pub false_expr: Expression,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Debug)]
pub struct Assignment {
    pub op: AssignOperator,
    pub left: Expression,
    pub right: Expression,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum AssignOperator {
    Assign,
    AddAssign, SubAssign, MulAssign, DivAssign, RemAssign,
    AndAssign, OrAssign, XorAssign,
    ShlAssign, ShrAssign,
}

impl AssignOperator {
    /// Returns the operator for its source representation.
    pub fn from_string(op: &str) -> Self {
        match op {
            "=" => AssignOperator::Assign,
            "+=" => AssignOperator::AddAssign,
            "-=" => AssignOperator::SubAssign,
            "*=" => AssignOperator::MulAssign,
            "/=" => AssignOperator::DivAssign,
            "%=" => AssignOperator::RemAssign,
            "&=" => AssignOperator::AndAssign,
            "|=" => AssignOperator::OrAssign,
            "^=" => AssignOperator::XorAssign,
            "<<=" => AssignOperator::ShlAssign,
            ">>=" => AssignOperator::ShrAssign,
            _ => panic!("Invalid assignment operator {}", op),
        }
    }
}

impl Display for AssignOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            AssignOperator::Assign => "=",
            AssignOperator::AddAssign => "+=",
            AssignOperator::SubAssign => "-=",
            AssignOperator::MulAssign => "*=",
            AssignOperator::DivAssign => "/=",
            AssignOperator::RemAssign => "%=",
            AssignOperator::AndAssign => "&=",
            AssignOperator::OrAssign => "|=",
            AssignOperator::XorAssign => "^=",
            AssignOperator::ShlAssign => "<<=",
            AssignOperator::ShrAssign => ">>=",
        })
    }
}

#[derive(Debug)]
pub struct SizeOf {
    pub ty: TypeName,
    pub type_id: Option<TypeId>,
    pub position: Position,
}

/// A `new T()` allocation of exactly the size of `T`.
#[derive(Debug)]
pub struct New {
    pub ident: Ident,
    /// Resolved result type, a pointer to the allocated type.
    pub type_id: Option<TypeId>,
    pub position: Position,
}
