mod util;
use util::*;

#[test]
fn duplicate_variable() {
    let kind = resolve_err("int a; int a;");
    assert!(matches!(kind, ResolveErrorKind::DuplicateDefinition(name) if name == "a"));
}

#[test]
fn duplicate_function() {
    let kind = resolve_err("int f() { return 0; } int f() { return 0; }");
    assert!(matches!(kind, ResolveErrorKind::DuplicateDefinition(name) if name == "f"));
}

#[test]
fn duplicate_struct_field() {
    let kind = resolve_err("struct P { int x; int x; };");
    assert!(matches!(kind, ResolveErrorKind::DuplicateDefinition(name) if name == "x"));
}

#[test]
fn shadowing_allowed() {
    compile_ok("int a = 1; { int a = 2; }");
    compile_ok("int a = 1; void f(int a) { a = 2; }");
}

#[test]
fn undefined_variable() {
    let kind = resolve_err("a = 1;");
    assert!(matches!(kind, ResolveErrorKind::UndefinedVariable(name) if name == "a"));
}

#[test]
fn undefined_type() {
    let kind = resolve_err("Foo a;");
    assert!(matches!(kind, ResolveErrorKind::UndefinedType(name) if name == "Foo"));
}

#[test]
fn variable_not_visible_in_initializer() {
    let kind = resolve_err("int a = a;");
    assert!(matches!(kind, ResolveErrorKind::UndefinedVariable(_)));
}

#[test]
fn pointer_rejects_int() {
    let kind = resolve_err("int *p = 5;");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(_, _)));
}

#[test]
fn void_is_accepted_everywhere() {
    compile_ok("void f() { } int x = f();");
    compile_ok("struct P { int x; }; void f() { } P p = f();");
    compile_ok("void f() { } int *p = f();");
}

#[test]
fn scalar_types_are_not_promoted() {
    // int literals are only identity-assignable, there is no implicit widening
    let kind = resolve_err("u16 a = 2;");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(given, accepted) if given == "int" && accepted == "u16"));
}

#[test]
fn pointer_accepts_null() {
    compile_ok("int *p = null;");
}

#[test]
fn void_pointer_accepts_any_pointer() {
    compile_ok("int *p = null; void *q = p;");
}

#[test]
fn pointer_depth_must_match() {
    let kind = resolve_err("int *p = null; int **q = p;");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(_, _)));
}

#[test]
fn struct_types_are_distinct() {
    let kind = resolve_err("struct A { int x; }; struct B { int x; }; A a; B b = a;");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(_, _)));
}

#[test]
fn argument_count() {
    let kind = resolve_err("int f(int a) { return a; } int x = f();");
    assert!(matches!(kind, ResolveErrorKind::NumberOfArguments(name, 1, 0) if name == "f"));
}

#[test]
fn argument_type() {
    let kind = resolve_err("int f(int *p) { return 0; } int x = f(1);");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(_, _)));
}

#[test]
fn call_requires_function() {
    let kind = resolve_err("int a; a();");
    assert!(matches!(kind, ResolveErrorKind::NotAFunction(_)));
}

#[test]
fn extern_calls_are_unchecked() {
    compile_ok("extern.log(1, 2, 3);");
}

#[test]
fn dot_on_pointer() {
    let kind = resolve_err("struct P { int x; }; P *p = null; int y = p.x;");
    assert!(matches!(kind, ResolveErrorKind::InvalidMemberAccess(op, _) if op == "."));
}

#[test]
fn arrow_on_pointer_to_pointer() {
    let kind = resolve_err("struct P { int x; }; P **p = null; int y = p->x;");
    assert!(matches!(kind, ResolveErrorKind::InvalidMemberAccess(op, _) if op == "->"));
}

#[test]
fn undefined_member() {
    let kind = resolve_err("struct P { int x; }; P a; int y = a.z;");
    assert!(matches!(kind, ResolveErrorKind::UndefinedMember(name) if name == "z"));
}

#[test]
fn deref_requires_pointer() {
    let kind = resolve_err("int a; int b = *a;");
    assert!(matches!(kind, ResolveErrorKind::NotAPointer(_)));
}

#[test]
fn index_requires_pointer() {
    let kind = resolve_err("int a; int b = a[0];");
    assert!(matches!(kind, ResolveErrorKind::NotAPointer(_)));
}

#[test]
fn address_of_requires_variable() {
    let kind = resolve_err("int *p = &5;");
    assert!(matches!(kind, ResolveErrorKind::NotAddressable));
}

#[test]
fn missing_return() {
    let kind = resolve_err("int f() { int a = 1; }");
    assert!(matches!(kind, ResolveErrorKind::MissingReturn(name) if name == "f"));
}

#[test]
fn void_function_needs_no_return() {
    compile_ok("void f() { int a = 1; }");
}

#[test]
fn bare_return_requires_void() {
    let kind = resolve_err("int f() { return; }");
    assert!(matches!(kind, ResolveErrorKind::TypeMismatch(given, _) if given == "void"));
}

#[test]
fn return_outside_function() {
    let kind = resolve_err("return 1;");
    assert!(matches!(kind, ResolveErrorKind::IllegalReturn));
}

#[test]
fn empty_struct() {
    let kind = resolve_err("struct E { };");
    assert!(matches!(kind, ResolveErrorKind::EmptyStruct(name) if name == "E"));
}

#[test]
fn initializer_count() {
    let kind = resolve_err("struct P { int x; int y; }; P p = { 1 };");
    assert!(matches!(kind, ResolveErrorKind::NumberOfInitializers(_, 2, 1)));
}

#[test]
fn compound_assignment_to_struct() {
    let kind = resolve_err("struct P { int x; }; P a; P b; a += b;");
    assert!(matches!(kind, ResolveErrorKind::IllegalStructOperation));
}

#[test]
fn plain_assignment_to_struct() {
    compile_ok("struct P { int x; }; P a; P b; a = b;");
}

#[test]
fn forward_function_reference() {
    compile_ok("int x = f(); int f() { return 1; }");
}

#[test]
fn mutual_recursion() {
    compile_ok("
        int odd(int n) { return even(n); }
        int even(int n) { return odd(n); }
    ");
}

#[test]
fn struct_by_value_field_requires_complete_type() {
    let kind = resolve_err("struct A { B b; }; struct B { int x; };");
    assert!(matches!(kind, ResolveErrorKind::UnsizedType(_)));
}

#[test]
fn mutual_struct_reference_through_pointers() {
    compile_ok("struct A { B *b; }; struct B { A *a; };");
}

#[test]
fn unsized_variable() {
    let kind = resolve_err("void v;");
    assert!(matches!(kind, ResolveErrorKind::UnsizedType(_)));
}

#[test]
fn deref_of_unassigned_pointer_typechecks() {
    compile_ok("int *p = null; *p = 5;");
}
