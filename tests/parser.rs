mod util;
use util::*;
use minic::frontend::ast::*;

#[test]
fn line_comment() {
    parse("// test\n").unwrap();
}

#[test]
fn unterminated_line_comment() {
    parse("// test").unwrap();
}

#[test]
fn block_comment() {
    parse("/* test */").unwrap();
}

#[test]
fn multi_line_block_comment() {
    parse("/*
    test
    */").unwrap();
}

#[test]
fn comments_in_expression() {
    parse("int x = 1 + /* ml */ 2; // sl").unwrap();
}

#[test]
fn comments_without_whitespace() {
    parse("int/*ml*/x;//sl").unwrap();
}

#[test]
fn empty_input() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("  \n  ").unwrap().is_empty());
}

#[test]
fn precedence() {
    let program = parse("int x = 1 + 2 * 3;").unwrap();
    let decl = match &program[0] {
        Statement::VarDecl(decl) => decl,
        other => panic!("Expected variable declaration, got {:?}", other),
    };
    let init = match &decl.decls[0].init {
        Some(Initializer::Expression(Expression::BinaryOp(op))) => op,
        other => panic!("Expected binary initializer, got {:?}", other),
    };
    assert!(init.op == BinaryOperator::Add);
    match &init.right {
        Expression::BinaryOp(right) => assert!(right.op == BinaryOperator::Mul),
        other => panic!("Expected multiplication on the right, got {:?}", other),
    }
}

#[test]
fn declaration_not_expression() {
    // a C-like grammar reads this as a declaration of pointer b, not a multiplication
    let program = parse("a * b;").unwrap();
    let decl = match &program[0] {
        Statement::VarDecl(decl) => decl,
        other => panic!("Expected variable declaration, got {:?}", other),
    };
    assert!(decl.type_name.name == "a");
    assert!(decl.decls[0].pointers == 1);
    assert!(decl.decls[0].ident.name == "b");
}

#[test]
fn multi_declarator() {
    let program = parse("int a, *b, c = 1;").unwrap();
    match &program[0] {
        Statement::VarDecl(decl) => assert!(decl.decls.len() == 3),
        other => panic!("Expected variable declaration, got {:?}", other),
    }
}

#[test]
fn do_while() {
    let program = parse("do { x = 1; } while (x < 10);").unwrap();
    match &program[0] {
        Statement::While(statement) => assert!(statement.is_do_while),
        other => panic!("Expected while loop, got {:?}", other),
    }
}

#[test]
fn else_if_chain() {
    let program = parse("if (a) { x = 1; } else if (b) { } else if (c) { } else { }").unwrap();
    let statement = match &program[0] {
        Statement::If(statement) => statement,
        other => panic!("Expected if statement, got {:?}", other),
    };
    assert!(statement.if_block.statements.len() == 1);
    let nested = match &statement.else_block {
        Some(Else::If(nested)) => nested,
        other => panic!("Expected nested if, got {:?}", other),
    };
    assert!(matches!(&nested.else_block, Some(Else::If(_))));
}

#[test]
fn for_variants() {
    parse("for (int i = 0; i < 10; i++) { }").unwrap();
    parse("for (i = 0; i < 10; i = i + 1) { }").unwrap();
    parse("for (;;) { }").unwrap();
}

#[test]
fn pointer_declarations() {
    parse("int **p = null;").unwrap();
    parse("void f(int **p, u8 b) { }").unwrap();
}

#[test]
fn unary_operators() {
    parse("int x = - 1; int y = ! x; int z = ~ y; int *p = &x; int w = *p;").unwrap();
}

#[test]
fn compound_assignments() {
    parse("x += 1; x -= 1; x *= 2; x /= 2; x %= 2; x <<= 1; x >>= 1; x &= 1; x |= 1; x ^= 1;").unwrap();
}

#[test]
fn new_arguments_are_ignored() {
    let program = parse("p = new Point(1, 2);").unwrap();
    let assignment = match &program[0] {
        Statement::Expression(Expression::Assignment(assignment)) => assignment,
        other => panic!("Expected assignment, got {:?}", other),
    };
    match &assignment.right {
        Expression::New(new) => assert!(new.ident.name == "Point"),
        other => panic!("Expected new expression, got {:?}", other),
    }
}

#[test]
fn string_literal() {
    parse("extern.log(\"hi there\");").unwrap();
}

#[test]
fn keyword_not_identifier() {
    assert!(parse("int return = 5;").is_err());
    assert!(parse("int while;").is_err());
}

#[test]
fn missing_semicolon() {
    assert!(parse("int a = 5").is_err());
}

#[test]
fn numeric_overflow() {
    let err = parse("int x = 99999999999999999999;").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidNumerical));
}

#[test]
fn error_location() {
    let source = "int a = 5;\nint b = ;";
    let err = parse(source).unwrap_err();
    let (line, _) = err.loc(source);
    assert!(line == 2, "Expected error on line 2, got line {}", line);
}
