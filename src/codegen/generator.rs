//! Output generation for resolved programs.
//!
//! Walks the resolved AST and emits target code against a small runtime ABI:
//! a stack pointer `$SP`, a signed and an unsigned typed view of the linear
//! memory (`$I`, `$U`), an allocator `ma(size)` and the memory primitives
//! `mc(dst, src, size)` and `mz(dst, size)`.

use crate::shared::{TypeContainer, BindingContainer};
use crate::shared::typed_ids::{TypeId, ScopeId};
use crate::shared::meta::Type;
use crate::frontend::ast::*;
use crate::frontend::resolver::{Resolved, ResolvedProgram};
use crate::codegen::error::{GenerateResult, SomeOrGenerateError, ice};
use crate::codegen::writer::Writer;

/// Stack pointer of the emitted code.
const STACK_POINTER: &'static str = "$SP";
/// Signed view of the linear memory.
const SIGNED_VIEW: &'static str = "$I";
/// Unsigned view of the linear memory.
const UNSIGNED_VIEW: &'static str = "$U";
/// Temporary holding a return value across frame teardown.
const RETURN_TEMP: &'static str = "$T";

/// Generates output text for the given resolved program.
pub fn generate(program: &ResolvedProgram) -> GenerateResult<String> {
    let mut generator = Generator {
        resolved: &program.resolved,
        writer: Writer::new(),
        frame_size: 0,
    };
    let root_frame_size = program.resolved.frame_size(ScopeId::ROOT);
    if root_frame_size > 0 {
        generator.writer.write_line(&format!("{} -= {};", STACK_POINTER, root_frame_size));
    }
    for statement in &program.ast {
        generator.generate_statement(statement)?;
    }
    Ok(generator.writer.into_output())
}

/// Temporary state of the generator.
struct Generator<'a> {
    resolved: &'a Resolved,
    writer: Writer,
    /// Frame size of the enclosing function, 0 outside of functions. Read by
    /// return statements to tear down the frame before returning.
    frame_size: u32,
}

impl<'a> Generator<'a> {

    // statements

    fn generate_statement(self: &mut Self, item: &Statement) -> GenerateResult {
        match item {
            // structs have no output of their own, they only shape memory accesses
            Statement::StructDecl(_) => Ok(()),
            Statement::FunctionDecl(decl) => self.generate_function_decl(decl),
            Statement::VarDecl(decl) => self.generate_var_decl(decl),
            Statement::If(statement) => self.generate_if_statement(statement),
            Statement::While(statement) => self.generate_while_loop(statement),
            Statement::For(statement) => self.generate_for_loop(statement),
            Statement::Block(block) => {
                self.writer.enter_block("{");
                self.generate_block(block)?;
                self.writer.leave_block("}");
                Ok(())
            }
            Statement::Return(statement) => self.generate_return(statement),
            Statement::Expression(expression) => {
                let code = self.generate_expression(expression)?;
                self.writer.write_line(&format!("{};", code));
                Ok(())
            }
        }
    }

    fn generate_block(self: &mut Self, item: &Block) -> GenerateResult {
        for statement in &item.statements {
            self.generate_statement(statement)?;
        }
        Ok(())
    }

    fn generate_function_decl(self: &mut Self, item: &FunctionDecl) -> GenerateResult {
        let scope_id = item.scope_id.unwrap_or_ice("unresolved function scope")?;
        let frame_size = self.resolved.frame_size(scope_id);
        let params: Vec<&str> = item.params.iter().map(|param| param.ident.name.as_str()).collect();
        self.writer.enter_block(&format!("function {}({}) {{", item.ident.name, params.join(", ")));
        let parent_frame_size = self.frame_size;
        self.frame_size = frame_size;
        if frame_size > 0 {
            self.writer.write_line(&format!("{} -= {};", STACK_POINTER, frame_size));
            // copy stack allocated parameters into the frame
            for param in &item.params {
                let binding_id = param.binding_id.unwrap_or_ice("unresolved parameter binding")?;
                let binding = self.resolved.binding_by_id(binding_id);
                if binding.is_stack_allocated {
                    let offset = binding.offset.unwrap_or_ice("parameter binding without frame offset")?;
                    if self.resolved.type_by_id(binding.type_id).as_struct().is_some() {
                        let size = self.resolved.type_size(binding.type_id).unwrap_or_ice("unsized struct parameter")?;
                        self.writer.write_line(&format!("mc({} + {}, {}, {});", STACK_POINTER, offset, param.ident.name, size));
                    } else {
                        let target = self.access_memory(&format!("{} + {}", STACK_POINTER, offset), binding.type_id, None)?;
                        self.writer.write_line(&format!("{} = {};", target, param.ident.name));
                    }
                }
            }
        }
        self.generate_block(&item.block)?;
        // return statements tear down the frame themselves
        let ends_in_return = matches!(item.block.statements.last(), Some(Statement::Return(_)));
        if frame_size > 0 && !ends_in_return {
            self.writer.write_line(&format!("{} += {};", STACK_POINTER, frame_size));
        }
        self.frame_size = parent_frame_size;
        self.writer.leave_block("}");
        Ok(())
    }

    fn generate_var_decl(self: &mut Self, item: &VarDecl) -> GenerateResult {
        for decl in &item.decls {
            if let Some(fragment) = self.generate_var_declarator(decl)? {
                self.writer.write_line(&format!("var {};", fragment));
            }
        }
        Ok(())
    }

    /// Generates code for a single declarator. Declarators backed by frame
    /// memory write their initialization lines directly and return None, plain
    /// named values return a `name = value` fragment for the caller to place
    /// in a var statement or a for loop header.
    fn generate_var_declarator(self: &mut Self, item: &VarDeclarator) -> GenerateResult<Option<String>> {
        let binding_id = item.binding_id.unwrap_or_ice("unresolved variable binding")?;
        let binding = self.resolved.binding_by_id(binding_id);
        let type_id = binding.type_id;
        if self.resolved.type_by_id(type_id).as_struct().is_some() {
            let offset = binding.offset.unwrap_or_ice("struct binding without frame offset")?;
            let size = self.resolved.type_size(type_id).unwrap_or_ice("unsized struct variable")?;
            match &item.init {
                Some(Initializer::Expression(expression)) => {
                    let source = self.generate_expression(expression)?;
                    self.writer.write_line(&format!("mc({} + {}, {}, {});", STACK_POINTER, offset, source, size));
                }
                Some(Initializer::Struct(expressions)) => {
                    let fields: Vec<(TypeId, u32)> = match self.resolved.type_by_id(type_id).as_struct() {
                        Some(struct_) => struct_.fields.iter().map(|field| (field.type_id, field.offset)).collect(),
                        None => return ice("struct binding resolved to a non-struct type"),
                    };
                    for (expression, (field_type_id, field_offset)) in expressions.iter().zip(fields) {
                        let value = self.generate_expression(expression)?;
                        if self.resolved.type_by_id(field_type_id).as_struct().is_some() {
                            let field_size = self.resolved.type_size(field_type_id).unwrap_or_ice("unsized struct field")?;
                            self.writer.write_line(&format!("mc({} + {}, {}, {});", STACK_POINTER, offset + field_offset, value, field_size));
                        } else {
                            let target = self.access_memory(&format!("{} + {}", STACK_POINTER, offset), field_type_id, Some(field_offset))?;
                            self.writer.write_line(&format!("{} = {};", target, value));
                        }
                    }
                }
                None => {
                    self.writer.write_line(&format!("mz({} + {}, {});", STACK_POINTER, offset, size));
                }
            }
            Ok(None)
        } else if binding.is_stack_allocated {
            let offset = binding.offset.unwrap_or_ice("stack allocated binding without frame offset")?;
            let value = match &item.init {
                Some(Initializer::Expression(expression)) => self.generate_expression(expression)?,
                Some(Initializer::Struct(_)) => return ice("brace initializer on a non-struct variable"),
                None => "0".to_string(),
            };
            let target = self.access_memory(&format!("{} + {}", STACK_POINTER, offset), type_id, None)?;
            self.writer.write_line(&format!("{} = {};", target, value));
            Ok(None)
        } else {
            let value = match &item.init {
                Some(Initializer::Expression(expression)) => self.generate_expression(expression)?,
                Some(Initializer::Struct(_)) => return ice("brace initializer on a non-struct variable"),
                None => "0".to_string(),
            };
            Ok(Some(format!("{} = {}", item.ident.name, value)))
        }
    }

    fn generate_if_statement(self: &mut Self, item: &IfStatement) -> GenerateResult {
        let cond = self.generate_expression(&item.cond)?;
        self.writer.enter_block(&format!("if ({}) {{", cond));
        self.generate_block(&item.if_block)?;
        let mut current_else = &item.else_block;
        loop {
            match current_else {
                Some(Else::Block(block)) => {
                    self.writer.leave_and_enter_block("} else {");
                    self.generate_block(block)?;
                    break;
                }
                Some(Else::If(nested)) => {
                    let cond = self.generate_expression(&nested.cond)?;
                    self.writer.leave_and_enter_block(&format!("}} else if ({}) {{", cond));
                    self.generate_block(&nested.if_block)?;
                    current_else = &nested.else_block;
                }
                None => break,
            }
        }
        self.writer.leave_block("}");
        Ok(())
    }

    fn generate_while_loop(self: &mut Self, item: &WhileLoop) -> GenerateResult {
        let cond = self.generate_expression(&item.cond)?;
        if item.is_do_while {
            self.writer.enter_block("do {");
            self.generate_block(&item.block)?;
            self.writer.leave_block(&format!("}} while ({});", cond));
        } else {
            self.writer.enter_block(&format!("while ({}) {{", cond));
            self.generate_block(&item.block)?;
            self.writer.leave_block("}");
        }
        Ok(())
    }

    fn generate_for_loop(self: &mut Self, item: &ForLoop) -> GenerateResult {
        // memory backed declarations write their initialization lines ahead of
        // the loop header, plain named values go into the header itself
        let init = match &item.init {
            Some(ForInit::VarDecl(decl)) => {
                let mut fragments = Vec::new();
                for declarator in &decl.decls {
                    if let Some(fragment) = self.generate_var_declarator(declarator)? {
                        fragments.push(fragment);
                    }
                }
                if fragments.is_empty() { String::new() } else { format!("var {}", fragments.join(", ")) }
            }
            Some(ForInit::Expression(expression)) => self.generate_expression(expression)?,
            None => String::new(),
        };
        let cond = match &item.cond {
            Some(expression) => self.generate_expression(expression)?,
            None => String::new(),
        };
        let step = match &item.step {
            Some(expression) => self.generate_expression(expression)?,
            None => String::new(),
        };
        self.writer.enter_block(&format!("for ({}; {}; {}) {{", init, cond, step));
        self.generate_block(&item.block)?;
        self.writer.leave_block("}");
        Ok(())
    }

    fn generate_return(self: &mut Self, item: &Return) -> GenerateResult {
        match &item.expr {
            Some(expression) => {
                let value = self.generate_expression(expression)?;
                if self.frame_size > 0 {
                    // evaluate into a temporary before the frame is torn down,
                    // the value may be computed from data living in the frame
                    self.writer.write_line(&format!("var {} = {};", RETURN_TEMP, value));
                    self.writer.write_line(&format!("{} += {};", STACK_POINTER, self.frame_size));
                    self.writer.write_line(&format!("return {};", RETURN_TEMP));
                } else {
                    self.writer.write_line(&format!("return {};", value));
                }
            }
            None => {
                if self.frame_size > 0 {
                    self.writer.write_line(&format!("{} += {};", STACK_POINTER, self.frame_size));
                }
                self.writer.write_line("return;");
            }
        }
        Ok(())
    }

    // expressions

    fn generate_expression(self: &Self, item: &Expression) -> GenerateResult<String> {
        match item {
            Expression::Literal(literal) => Ok(match &literal.value {
                LiteralValue::Numeric(value) => value.to_string(),
                LiteralValue::Bool(value) => value.to_string(),
                LiteralValue::Null => "null".to_string(),
                LiteralValue::String(value) => format!("\"{}\"", value),
            }),
            Expression::Variable(variable) => self.generate_variable(variable),
            Expression::Call(call) => {
                let callee = self.generate_expression(&call.callee)?;
                let mut args = Vec::new();
                for arg in &call.args {
                    args.push(self.generate_expression(arg)?);
                }
                Ok(format!("{}({})", callee, args.join(", ")))
            }
            Expression::Member(member) => self.generate_member(member),
            Expression::UnaryOp(unary_op) => self.generate_unary_op(unary_op),
            Expression::PostfixOp(postfix_op) => {
                let expression = self.generate_expression(&postfix_op.expr)?;
                Ok(format!("{}{}", expression, postfix_op.op))
            }
            Expression::BinaryOp(binary_op) => {
                let left = self.generate_expression(&binary_op.left)?;
                let right = self.generate_expression(&binary_op.right)?;
                Ok(format!("({} {} {})", left, binary_op.op, right))
            }
            Expression::Conditional(conditional) => {
                let cond = self.generate_expression(&conditional.cond)?;
                let true_expr = self.generate_expression(&conditional.true_expr)?;
                let false_expr = self.generate_expression(&conditional.false_expr)?;
                Ok(format!("({} ? {} : {})", cond, true_expr, false_expr))
            }
            Expression::Assignment(assignment) => self.generate_assignment(assignment),
            Expression::SizeOf(size_of) => {
                let type_id = size_of.ty.type_id.unwrap_or_ice("unresolved sizeof operand")?;
                let size = self.resolved.type_size(type_id).unwrap_or_ice("sizeof of an unsized type")?;
                Ok(size.to_string())
            }
            Expression::New(new) => {
                let type_id = new.type_id.unwrap_or_ice("unresolved new expression")?;
                let base_type_id = match self.resolved.type_by_id(type_id) {
                    Type::Pointer(pointer) if pointer.depth == 1 => pointer.base_type_id,
                    _ => return ice("new expression resolved to a non-pointer type"),
                };
                let size = self.resolved.type_size(base_type_id).unwrap_or_ice("new of an unsized type")?;
                Ok(format!("ma({})", size))
            }
        }
    }

    fn generate_variable(self: &Self, item: &Variable) -> GenerateResult<String> {
        let binding_id = item.binding_id.unwrap_or_ice("unresolved variable binding")?;
        let binding = self.resolved.binding_by_id(binding_id);
        if self.resolved.type_by_id(binding.type_id).as_struct().is_some() {
            // a struct value is represented by its frame address
            let offset = binding.offset.unwrap_or_ice("struct binding without frame offset")?;
            Ok(format!("{} + {}", STACK_POINTER, offset))
        } else if binding.is_stack_allocated {
            let offset = binding.offset.unwrap_or_ice("stack allocated binding without frame offset")?;
            self.access_memory(&format!("{} + {}", STACK_POINTER, offset), binding.type_id, None)
        } else {
            Ok(item.ident.name.clone())
        }
    }

    fn generate_unary_op(self: &Self, item: &UnaryOp) -> GenerateResult<String> {
        match item.op {
            UnaryOperator::AddressOf => {
                let binding_id = match &item.expr {
                    Expression::Variable(variable) => variable.binding_id,
                    _ => None,
                };
                let binding_id = binding_id.unwrap_or_ice("address-of target is not a resolved variable")?;
                let offset = self.resolved.binding_by_id(binding_id).offset
                    .unwrap_or_ice("address-of target without frame offset")?;
                Ok(format!("{} + {}", STACK_POINTER, offset))
            }
            UnaryOperator::Deref => {
                let pointee_type_id = item.type_id.unwrap_or_ice("unresolved dereference")?;
                let expression = self.generate_expression(&item.expr)?;
                if self.resolved.type_by_id(pointee_type_id).as_struct().is_some() {
                    // the pointer value is already the struct address
                    Ok(expression)
                } else {
                    self.access_memory(&expression, pointee_type_id, None)
                }
            }
            UnaryOperator::Minus | UnaryOperator::Not | UnaryOperator::BitNot => {
                let expression = self.generate_expression(&item.expr)?;
                Ok(format!("{} {}", item.op, expression))
            }
        }
    }

    fn generate_assignment(self: &Self, item: &Assignment) -> GenerateResult<String> {
        let type_id = item.type_id.unwrap_or_ice("unresolved assignment")?;
        let left = self.generate_expression(&item.left)?;
        let right = self.generate_expression(&item.right)?;
        if self.resolved.type_by_id(type_id).as_struct().is_some() {
            let size = self.resolved.type_size(type_id).unwrap_or_ice("unsized struct assignment")?;
            Ok(format!("mc({}, {}, {})", left, right, size))
        } else {
            Ok(format!("{} {} {}", left, item.op, right))
        }
    }

    fn generate_member(self: &Self, item: &Member) -> GenerateResult<String> {
        let base = self.generate_expression(&item.expr)?;
        let type_id = item.type_id.unwrap_or_ice("unresolved member access")?;
        match &item.access {
            Access::Dot(field_ident) => {
                match item.field_offset {
                    // opaque named reference into the untyped boundary
                    None => Ok(format!("{}.{}", base, field_ident.name)),
                    Some(field_offset) => self.field_access(&base, type_id, field_offset),
                }
            }
            Access::Arrow(_) => {
                let field_offset = item.field_offset.unwrap_or_ice("unresolved field offset")?;
                self.field_access(&base, type_id, field_offset)
            }
            Access::Index(index) => {
                let index_code = self.generate_expression(index)?;
                let size = self.resolved.type_size(type_id).unwrap_or_ice("indexing into an unsized type")?;
                let address = format!("{} + {} * {}", base, index_code, size);
                if self.resolved.type_by_id(type_id).as_struct().is_some() {
                    Ok(format!("({})", address))
                } else {
                    self.access_memory(&address, type_id, None)
                }
            }
        }
    }

    /// Generates an access to a struct field at the given base address.
    fn field_access(self: &Self, base: &str, field_type_id: TypeId, field_offset: u32) -> GenerateResult<String> {
        if self.resolved.type_by_id(field_type_id).as_struct().is_some() {
            // a struct field is itself addressed, not loaded
            if field_offset > 0 {
                Ok(format!("({} + {})", base, field_offset))
            } else {
                Ok(format!("({})", base))
            }
        } else {
            self.access_memory(base, field_type_id, Some(field_offset))
        }
    }

    /// Generates a typed memory access at the given address expression, adding
    /// an optional byte offset. Signed integer types read through the signed
    /// view, unsigned integers, pointers and functions through the unsigned view.
    fn access_memory(self: &Self, address: &str, type_id: TypeId, offset: Option<u32>) -> GenerateResult<String> {
        let ty = self.resolved.type_by_id(type_id);
        let view = if ty.is_signed() {
            SIGNED_VIEW
        } else if ty.is_unsigned() || ty.as_pointer().is_some() || ty.as_function().is_some() {
            UNSIGNED_VIEW
        } else {
            return ice("memory access on a type without a memory view");
        };
        let size = ty.primitive_size().unwrap_or_ice("memory access on an unsized type")?;
        let shift = match size {
            1 => 0,
            2 => 1,
            4 => 2,
            _ => return ice("unsupported memory access size"),
        };
        Ok(match offset {
            Some(offset) if offset > 0 => format!("{}[{} + {} >> {}]", view, address, offset, shift),
            _ => format!("{}[{} >> {}]", view, address, shift),
        })
    }
}
