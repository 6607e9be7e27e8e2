//! AST type checker and resolver.
//!
//! Walks the parsed AST in two stages per declaration block. Declarations are
//! hoisted first (struct names and function signatures) so that declarations
//! within the same block can reference each other regardless of textual order.
//! The main walk then fills in struct fields, checks all statements and
//! expressions and annotates the AST with type and binding ids.

pub mod error;
mod scopes;
mod resolved;

pub use resolved::Resolved;

use crate::shared::{TypeContainer, BindingContainer};
use crate::shared::typed_ids::{TypeId, ScopeId};
use crate::shared::meta::{Type, Struct, Field, Binding};
use crate::frontend::Program;
use crate::frontend::ast::*;
use error::{ResolveError, ResolveErrorKind, ResolveResult, SomeOrResolveError, ice};
use scopes::Scopes;

/// A resolved program, the input to code generation.
pub struct ResolvedProgram {
    /// The annotated program AST.
    pub ast: Program,
    /// Resolved type and binding information.
    pub resolved: Resolved,
}

/// The function enclosing the currently resolved statement.
struct FunctionContext {
    /// Declared return type of the function.
    ret_type_id: TypeId,
    /// Whether at least one return statement was seen in the function body.
    returns: bool,
}

/// Resolves and type-checks the given program.
///
/// The returned [ResolvedProgram] contains the annotated AST along with type
/// and binding tables and the computed stack frame sizes.
pub fn resolve(mut program: Program) -> ResolveResult<ResolvedProgram> {
    let mut scopes = Scopes::new();
    // ambient values are reachable through this binding without type checking
    scopes.insert_binding(ScopeId::ROOT, "extern", Binding {
        type_id: TypeId::DYN,
        offset: None,
        is_parameter: false,
        is_stack_allocated: false,
    });
    let mut resolver = Resolver { scopes, scope_id: ScopeId::ROOT };
    resolver.resolve_declarations(&mut program)?;
    for statement in program.iter_mut() {
        resolver.resolve_statement(statement, None)?;
    }
    resolver.scopes.close_frame(ScopeId::ROOT).unwrap_or_ice("failed to close the root frame")?;
    Ok(ResolvedProgram { ast: program, resolved: resolver.scopes.into() })
}

/// Temporary state of the resolver.
struct Resolver {
    scopes: Scopes,
    /// Scope of the statement currently being resolved.
    scope_id: ScopeId,
}

impl Resolver {

    // declarations

    /// Hoists struct names and function signatures of a declaration block so
    /// that bodies can reference declarations regardless of textual order.
    /// Struct fields are not filled in here, see [Self::resolve_struct_decl].
    fn resolve_declarations(self: &mut Self, statements: &mut [Statement]) -> ResolveResult {
        for statement in statements.iter_mut() {
            if let Statement::StructDecl(decl) = statement {
                self.declare_struct(decl)?;
            }
        }
        for statement in statements.iter_mut() {
            if let Statement::FunctionDecl(decl) = statement {
                self.declare_function(decl)?;
            }
        }
        Ok(())
    }

    /// Registers an empty struct type under the declared name.
    fn declare_struct(self: &mut Self, item: &mut StructDecl) -> ResolveResult<TypeId> {
        if self.scopes.local_type_id(self.scope_id, &item.ident.name).is_some() {
            return Err(ResolveError::new(&item.ident, ResolveErrorKind::DuplicateDefinition(item.ident.name.clone())));
        }
        let type_id = self.scopes.insert_type(self.scope_id, &item.ident.name, Type::Struct(Struct {
            name: item.ident.name.clone(),
            fields: Vec::new(),
        }));
        item.type_id = Some(type_id);
        Ok(type_id)
    }

    /// Resolves a function signature and registers a Function-typed binding for it.
    fn declare_function(self: &mut Self, item: &mut FunctionDecl) -> ResolveResult {
        let ret_type_id = self.resolve_type_name(&mut item.ret)?;
        let mut arg_type_ids = Vec::new();
        for param in &mut item.params {
            arg_type_ids.push(self.resolve_type_name(&mut param.ty)?);
        }
        if self.scopes.local_binding_id(self.scope_id, &item.ident.name).is_some() {
            return Err(ResolveError::new(&item.ident, ResolveErrorKind::DuplicateDefinition(item.ident.name.clone())));
        }
        let type_id = self.scopes.insert_anonymous_type(Type::Function(crate::shared::meta::Function { ret_type_id, arg_type_ids }));
        item.type_id = Some(type_id);
        item.binding_id = Some(self.scopes.insert_binding(self.scope_id, &item.ident.name, Binding {
            type_id,
            offset: None,
            is_parameter: false,
            is_stack_allocated: false,
        }));
        Ok(())
    }

    /// Resolves a source type name with its pointer suffixes to a type id.
    fn resolve_type_name(self: &mut Self, item: &mut TypeName) -> ResolveResult<TypeId> {
        let mut type_id = self.scopes.lookup_type_id(self.scope_id, &item.ident.name)
            .unwrap_or_err(Some(&item.ident), ResolveErrorKind::UndefinedType(item.ident.name.clone()))?;
        for _ in 0..item.pointers {
            type_id = self.scopes.pointer_to(type_id);
        }
        item.type_id = Some(type_id);
        Ok(type_id)
    }

    // statements

    fn resolve_statement(self: &mut Self, item: &mut Statement, ctx: Option<&mut FunctionContext>) -> ResolveResult {
        match item {
            Statement::StructDecl(decl) => self.resolve_struct_decl(decl),
            Statement::FunctionDecl(decl) => self.resolve_function_decl(decl),
            Statement::VarDecl(decl) => self.resolve_var_decl(decl),
            Statement::If(statement) => self.resolve_if_statement(statement, ctx),
            Statement::While(statement) => self.resolve_while_loop(statement, ctx),
            Statement::For(statement) => self.resolve_for_loop(statement, ctx),
            Statement::Block(block) => self.resolve_child_block(block, ctx),
            Statement::Return(statement) => self.resolve_return(statement, ctx),
            Statement::Expression(expression) => self.resolve_expression(expression).map(|_| ()),
        }
    }

    /// Fills in the fields of a previously hoisted struct declaration.
    fn resolve_struct_decl(self: &mut Self, item: &mut StructDecl) -> ResolveResult {
        let type_id = match item.type_id {
            Some(type_id) => type_id,
            // not hoisted, the declaration appears in a nested block
            None => self.declare_struct(item)?,
        };
        if item.fields.is_empty() {
            return Err(ResolveError::new(item, ResolveErrorKind::EmptyStruct(item.ident.name.clone())));
        }
        let mut fields: Vec<Field> = Vec::new();
        let mut offset = 0;
        for field in &mut item.fields {
            let field_type_id = self.resolve_type_name(&mut field.ty)?;
            if fields.iter().any(|f| f.name == field.ident.name) {
                return Err(ResolveError::new(&field.ident, ResolveErrorKind::DuplicateDefinition(field.ident.name.clone())));
            }
            let size = match self.scopes.type_size(field_type_id) {
                Some(size) => size,
                None => return Err(ResolveError::new(&field.ty, ResolveErrorKind::UnsizedType(self.scopes.type_name(field_type_id)))),
            };
            fields.push(Field { name: field.ident.name.clone(), type_id: field_type_id, offset });
            offset += size;
        }
        match self.scopes.type_by_id_mut(type_id).as_struct_mut() {
            Some(struct_) => struct_.fields = fields,
            None => return ice("struct declaration hoisted to a non-struct type"),
        }
        Ok(())
    }

    /// Resolves a function body within a new frame-owning scope.
    fn resolve_function_decl(self: &mut Self, item: &mut FunctionDecl) -> ResolveResult {
        if item.binding_id.is_none() {
            // not hoisted, the declaration appears in a nested block
            self.declare_function(item)?;
        }
        let ret_type_id = item.ret.type_id.unwrap_or_ice("unresolved function return type")?;
        let parent_scope_id = self.scope_id;
        let scope_id = self.scopes.create_scope(parent_scope_id, true);
        item.scope_id = Some(scope_id);
        // the body block shares the function scope so that parameters are visible in it
        item.block.scope_id = Some(scope_id);
        self.scope_id = scope_id;
        for param in &mut item.params {
            let type_id = param.ty.type_id.unwrap_or_ice("unresolved parameter type")?;
            if self.scopes.local_binding_id(scope_id, &param.ident.name).is_some() {
                return Err(ResolveError::new(param, ResolveErrorKind::DuplicateDefinition(param.ident.name.clone())));
            }
            let is_struct = self.scopes.type_by_id(type_id).as_struct().is_some();
            param.binding_id = Some(self.scopes.insert_binding(scope_id, &param.ident.name, Binding {
                type_id,
                offset: None,
                is_parameter: true,
                is_stack_allocated: is_struct,
            }));
        }
        self.resolve_declarations(&mut item.block.statements)?;
        let mut ctx = FunctionContext { ret_type_id, returns: false };
        for statement in &mut item.block.statements {
            self.resolve_statement(statement, Some(&mut ctx))?;
        }
        // all address-of sites in the body have been seen, the frame is final
        self.scopes.close_frame(scope_id).unwrap_or_ice("function frame contains an unsized binding")?;
        self.scope_id = parent_scope_id;
        if !ctx.returns && !self.scopes.type_by_id(ret_type_id).is_void() {
            return Err(ResolveError::new(item, ResolveErrorKind::MissingReturn(item.ident.name.clone())));
        }
        Ok(())
    }

    fn resolve_var_decl(self: &mut Self, item: &mut VarDecl) -> ResolveResult {
        let base_type_id = self.scopes.lookup_type_id(self.scope_id, &item.type_name.name)
            .unwrap_or_err(Some(&item.type_name), ResolveErrorKind::UndefinedType(item.type_name.name.clone()))?;
        for decl in &mut item.decls {
            let mut type_id = base_type_id;
            for _ in 0..decl.pointers {
                type_id = self.scopes.pointer_to(type_id);
            }
            if self.scopes.local_binding_id(self.scope_id, &decl.ident.name).is_some() {
                return Err(ResolveError::new(&decl.ident, ResolveErrorKind::DuplicateDefinition(decl.ident.name.clone())));
            }
            if self.scopes.type_size(type_id).is_none() {
                return Err(ResolveError::new(&decl.ident, ResolveErrorKind::UnsizedType(self.scopes.type_name(type_id))));
            }
            // the initializer is resolved before the binding is inserted so that
            // the declared name is not visible within its own initializer
            match &mut decl.init {
                Some(Initializer::Expression(expression)) => {
                    let given = self.resolve_expression(expression)?;
                    self.check_assignable(given, type_id, expression)?;
                }
                Some(Initializer::Struct(expressions)) => {
                    let field_type_ids: Vec<TypeId> = match self.scopes.type_by_id(type_id).as_struct() {
                        Some(struct_) => struct_.fields.iter().map(|field| field.type_id).collect(),
                        None => return Err(ResolveError::new(&decl.ident, ResolveErrorKind::NotAStruct(self.scopes.type_name(type_id)))),
                    };
                    if field_type_ids.len() != expressions.len() {
                        return Err(ResolveError::new(&decl.ident, ResolveErrorKind::NumberOfInitializers(
                            self.scopes.type_name(type_id), field_type_ids.len(), expressions.len(),
                        )));
                    }
                    for (expression, field_type_id) in expressions.iter_mut().zip(field_type_ids) {
                        let given = self.resolve_expression(expression)?;
                        self.check_assignable(given, field_type_id, expression)?;
                    }
                }
                None => { }
            }
            let is_struct = self.scopes.type_by_id(type_id).as_struct().is_some();
            decl.type_id = Some(type_id);
            decl.binding_id = Some(self.scopes.insert_binding(self.scope_id, &decl.ident.name, Binding {
                type_id,
                offset: None,
                is_parameter: false,
                is_stack_allocated: is_struct,
            }));
        }
        Ok(())
    }

    fn resolve_if_statement(self: &mut Self, item: &mut IfStatement, mut ctx: Option<&mut FunctionContext>) -> ResolveResult {
        self.resolve_expression(&mut item.cond)?;
        self.resolve_child_block(&mut item.if_block, ctx.as_deref_mut())?;
        match &mut item.else_block {
            Some(Else::Block(block)) => self.resolve_child_block(block, ctx),
            Some(Else::If(nested)) => self.resolve_if_statement(nested, ctx),
            None => Ok(()),
        }
    }

    fn resolve_while_loop(self: &mut Self, item: &mut WhileLoop, ctx: Option<&mut FunctionContext>) -> ResolveResult {
        self.resolve_expression(&mut item.cond)?;
        self.resolve_child_block(&mut item.block, ctx)
    }

    /// Resolves a for loop. The loop gets its own child scope so that a
    /// declaration in the initializer is scoped to the loop.
    fn resolve_for_loop(self: &mut Self, item: &mut ForLoop, mut ctx: Option<&mut FunctionContext>) -> ResolveResult {
        let parent_scope_id = self.scope_id;
        let scope_id = self.scopes.create_scope(parent_scope_id, false);
        item.scope_id = Some(scope_id);
        self.scope_id = scope_id;
        match &mut item.init {
            Some(ForInit::VarDecl(decl)) => self.resolve_var_decl(decl)?,
            Some(ForInit::Expression(expression)) => { self.resolve_expression(expression)?; }
            None => { }
        }
        if let Some(cond) = &mut item.cond {
            self.resolve_expression(cond)?;
        }
        if let Some(step) = &mut item.step {
            self.resolve_expression(step)?;
        }
        // the body shares the loop scope
        item.block.scope_id = Some(scope_id);
        for statement in &mut item.block.statements {
            self.resolve_statement(statement, ctx.as_deref_mut())?;
        }
        self.scope_id = parent_scope_id;
        Ok(())
    }

    fn resolve_child_block(self: &mut Self, item: &mut Block, mut ctx: Option<&mut FunctionContext>) -> ResolveResult {
        let parent_scope_id = self.scope_id;
        let scope_id = self.scopes.create_scope(parent_scope_id, false);
        item.scope_id = Some(scope_id);
        self.scope_id = scope_id;
        for statement in &mut item.statements {
            self.resolve_statement(statement, ctx.as_deref_mut())?;
        }
        self.scope_id = parent_scope_id;
        Ok(())
    }

    fn resolve_return(self: &mut Self, item: &mut Return, ctx: Option<&mut FunctionContext>) -> ResolveResult {
        let ctx = match ctx {
            Some(ctx) => ctx,
            None => return Err(ResolveError::new(item, ResolveErrorKind::IllegalReturn)),
        };
        ctx.returns = true;
        match &mut item.expr {
            Some(expression) => {
                let given = self.resolve_expression(expression)?;
                self.check_assignable(given, ctx.ret_type_id, expression)
            }
            None => {
                if self.scopes.type_by_id(ctx.ret_type_id).is_void() {
                    Ok(())
                } else {
                    Err(ResolveError::new(item, ResolveErrorKind::TypeMismatch(
                        "void".to_string(), self.scopes.type_name(ctx.ret_type_id),
                    )))
                }
            }
        }
    }

    // expressions

    fn resolve_expression(self: &mut Self, item: &mut Expression) -> ResolveResult<TypeId> {
        match item {
            Expression::Literal(literal) => {
                let type_id = match &literal.value {
                    LiteralValue::Numeric(_) | LiteralValue::Bool(_) => TypeId::INT,
                    LiteralValue::Null => TypeId::NULL,
                    LiteralValue::String(_) => TypeId::DYN,
                };
                literal.type_id = Some(type_id);
                Ok(type_id)
            }
            Expression::Variable(variable) => self.resolve_variable(variable),
            Expression::Call(call) => self.resolve_call(call),
            Expression::Member(member) => self.resolve_member(member),
            Expression::UnaryOp(unary_op) => self.resolve_unary_op(unary_op),
            Expression::PostfixOp(postfix_op) => {
                let type_id = self.resolve_expression(&mut postfix_op.expr)?;
                postfix_op.type_id = Some(type_id);
                Ok(type_id)
            }
            Expression::BinaryOp(binary_op) => {
                // operands are checked for existence, the result type is taken from the left
                let type_id = self.resolve_expression(&mut binary_op.left)?;
                self.resolve_expression(&mut binary_op.right)?;
                binary_op.type_id = Some(type_id);
                Ok(type_id)
            }
            Expression::Conditional(conditional) => {
                self.resolve_expression(&mut conditional.cond)?;
                let type_id = self.resolve_expression(&mut conditional.true_expr)?;
                self.resolve_expression(&mut conditional.false_expr)?;
                conditional.type_id = Some(type_id);
                Ok(type_id)
            }
            Expression::Assignment(assignment) => self.resolve_assignment(assignment),
            Expression::SizeOf(size_of) => {
                self.resolve_type_name(&mut size_of.ty)?;
                size_of.type_id = Some(TypeId::INT);
                Ok(TypeId::INT)
            }
            Expression::New(new) => self.resolve_new(new),
        }
    }

    fn resolve_variable(self: &mut Self, item: &mut Variable) -> ResolveResult<TypeId> {
        let binding_id = self.scopes.lookup_binding_id(self.scope_id, &item.ident.name)
            .unwrap_or_err(Some(&item.ident), ResolveErrorKind::UndefinedVariable(item.ident.name.clone()))?;
        let type_id = self.scopes.binding_by_id(binding_id).type_id;
        item.binding_id = Some(binding_id);
        item.type_id = Some(type_id);
        Ok(type_id)
    }

    fn resolve_unary_op(self: &mut Self, item: &mut UnaryOp) -> ResolveResult<TypeId> {
        let operand_type_id = self.resolve_expression(&mut item.expr)?;
        let type_id = match item.op {
            UnaryOperator::AddressOf => {
                // the operand must be an addressable variable, taking its address
                // forces it into the stack frame
                let binding_id = match &item.expr {
                    Expression::Variable(variable) => variable.binding_id,
                    _ => None,
                };
                let binding_id = binding_id.unwrap_or_err(Some(&item.expr), ResolveErrorKind::NotAddressable)?;
                self.scopes.binding_by_id_mut(binding_id).is_stack_allocated = true;
                self.scopes.pointer_to(operand_type_id)
            }
            UnaryOperator::Deref => {
                match self.scopes.pointee(operand_type_id) {
                    Some(pointee) => pointee,
                    None => return Err(ResolveError::new(&item.expr, ResolveErrorKind::NotAPointer(self.scopes.type_name(operand_type_id)))),
                }
            }
            UnaryOperator::Minus | UnaryOperator::Not | UnaryOperator::BitNot => operand_type_id,
        };
        item.type_id = Some(type_id);
        Ok(type_id)
    }

    fn resolve_assignment(self: &mut Self, item: &mut Assignment) -> ResolveResult<TypeId> {
        let left_type_id = self.resolve_expression(&mut item.left)?;
        self.resolve_expression(&mut item.right)?;
        if self.scopes.type_by_id(left_type_id).as_struct().is_some() && item.op != AssignOperator::Assign {
            return Err(ResolveError::new(item, ResolveErrorKind::IllegalStructOperation));
        }
        item.type_id = Some(left_type_id);
        Ok(left_type_id)
    }

    fn resolve_call(self: &mut Self, item: &mut Call) -> ResolveResult<TypeId> {
        let callee_type_id = self.resolve_expression(&mut item.callee)?;
        if self.scopes.type_by_id(callee_type_id).is_dyn() {
            // calls into the untyped boundary are opaque, no arity or type checks
            for arg in &mut item.args {
                self.resolve_expression(arg)?;
            }
            item.type_id = Some(TypeId::DYN);
            return Ok(TypeId::DYN);
        }
        let function = match self.scopes.type_by_id(callee_type_id).as_function() {
            Some(function) => function.clone(),
            None => return Err(ResolveError::new(&item.callee, ResolveErrorKind::NotAFunction(self.scopes.type_name(callee_type_id)))),
        };
        if function.arg_type_ids.len() != item.args.len() {
            let name = match &item.callee {
                Expression::Variable(variable) => variable.ident.name.clone(),
                _ => self.scopes.type_name(callee_type_id),
            };
            return Err(ResolveError::new(item, ResolveErrorKind::NumberOfArguments(
                name, function.arg_type_ids.len(), item.args.len(),
            )));
        }
        for (arg, &param_type_id) in item.args.iter_mut().zip(&function.arg_type_ids) {
            let given = self.resolve_expression(arg)?;
            self.check_assignable(given, param_type_id, arg)?;
        }
        item.type_id = Some(function.ret_type_id);
        Ok(function.ret_type_id)
    }

    fn resolve_member(self: &mut Self, item: &mut Member) -> ResolveResult<TypeId> {
        let base_type_id = self.resolve_expression(&mut item.expr)?;
        let (type_id, field_offset) = match &mut item.access {
            Access::Dot(field_ident) => {
                if self.scopes.type_by_id(base_type_id).is_dyn() {
                    // opaque named reference into the untyped boundary
                    (TypeId::DYN, None)
                } else if self.scopes.type_by_id(base_type_id).as_pointer().is_some() {
                    return Err(ResolveError::new(field_ident, ResolveErrorKind::InvalidMemberAccess(
                        ".".to_string(), self.scopes.type_name(base_type_id),
                    )));
                } else {
                    let (field_type_id, offset) = self.lookup_field(base_type_id, field_ident)?;
                    (field_type_id, Some(offset))
                }
            }
            Access::Arrow(field_ident) => {
                let struct_type_id = match self.scopes.type_by_id(base_type_id) {
                    Type::Pointer(pointer) if pointer.depth == 1 => pointer.base_type_id,
                    _ => return Err(ResolveError::new(field_ident, ResolveErrorKind::InvalidMemberAccess(
                        "->".to_string(), self.scopes.type_name(base_type_id),
                    ))),
                };
                let (field_type_id, offset) = self.lookup_field(struct_type_id, field_ident)?;
                (field_type_id, Some(offset))
            }
            Access::Index(index) => {
                self.resolve_expression(index)?;
                match self.scopes.pointee(base_type_id) {
                    Some(pointee) => (pointee, None),
                    None => return Err(ResolveError::new(&item.expr, ResolveErrorKind::NotAPointer(self.scopes.type_name(base_type_id)))),
                }
            }
        };
        item.field_offset = field_offset;
        item.type_id = Some(type_id);
        Ok(type_id)
    }

    fn resolve_new(self: &mut Self, item: &mut New) -> ResolveResult<TypeId> {
        let type_id = self.scopes.lookup_type_id(self.scope_id, &item.ident.name)
            .unwrap_or_err(Some(&item.ident), ResolveErrorKind::UndefinedType(item.ident.name.clone()))?;
        if self.scopes.type_size(type_id).is_none() {
            return Err(ResolveError::new(&item.ident, ResolveErrorKind::UnsizedType(self.scopes.type_name(type_id))));
        }
        let pointer_type_id = self.scopes.pointer_to(type_id);
        item.type_id = Some(pointer_type_id);
        Ok(pointer_type_id)
    }

    // helpers

    /// Looks up a field on a struct type, returning its type and byte offset.
    fn lookup_field(self: &Self, struct_type_id: TypeId, field_ident: &Ident) -> ResolveResult<(TypeId, u32)> {
        let struct_ = match self.scopes.type_by_id(struct_type_id).as_struct() {
            Some(struct_) => struct_,
            None => return Err(ResolveError::new(field_ident, ResolveErrorKind::NotAStruct(self.scopes.type_name(struct_type_id)))),
        };
        match struct_.field(&field_ident.name) {
            Some(field) => Ok((field.type_id, field.offset)),
            None => Err(ResolveError::new(field_ident, ResolveErrorKind::UndefinedMember(field_ident.name.clone()))),
        }
    }

    /// Checks that the given type is acceptable where the accepted type is expected.
    fn check_assignable(self: &Self, given: TypeId, accepted: TypeId, item: &impl Positioned) -> ResolveResult {
        if self.scopes.type_accepted_for(given, accepted) {
            Ok(())
        } else {
            Err(ResolveError::new(item, ResolveErrorKind::TypeMismatch(
                self.scopes.type_name(given), self.scopes.type_name(accepted),
            )))
        }
    }
}
