mod util;
use util::*;

#[test]
fn struct_parameter() {
    let output = compile_ok("
        struct Point { int x; int y; };
        int sum(Point p) {
            return p.x + p.y;
        }
    ");
    assert_eq!(output, "\
function sum(p) {
  $SP -= 8;
  mc($SP + 0, p, 8);
  var $T = ($I[$SP + 0 >> 2] + $I[$SP + 0 + 4 >> 2]);
  $SP += 8;
  return $T;
}
");
}

#[test]
fn struct_argument_passes_address() {
    let output = compile_ok("
        struct Point { int x; int y; };
        int sum(Point p) {
            return p.x + p.y;
        }
        Point q = { 1, 2 };
        int r = sum(q);
    ");
    assert_eq!(output, "\
$SP -= 8;
function sum(p) {
  $SP -= 8;
  mc($SP + 0, p, 8);
  var $T = ($I[$SP + 0 >> 2] + $I[$SP + 0 + 4 >> 2]);
  $SP += 8;
  return $T;
}
$I[$SP + 0 >> 2] = 1;
$I[$SP + 0 + 4 >> 2] = 2;
var r = sum($SP + 0);
");
}

#[test]
fn address_of_and_deref() {
    let output = compile_ok("
        int a = 1;
        int *p = &a;
        *p = 5;
    ");
    assert_eq!(output, "\
$SP -= 4;
$I[$SP + 0 >> 2] = 1;
var p = $SP + 0;
$I[p >> 2] = 5;
");
}

#[test]
fn brace_initializer() {
    let output = compile_ok("
        struct Point { int x; int y; };
        Point p = { 1, 2 };
        p.x = 3;
    ");
    assert_eq!(output, "\
$SP -= 8;
$I[$SP + 0 >> 2] = 1;
$I[$SP + 0 + 4 >> 2] = 2;
$I[$SP + 0 >> 2] = 3;
");
}

#[test]
fn uninitialized_struct_is_zeroed() {
    let output = compile_ok("
        struct Point { int x; int y; };
        Point a;
        Point b;
        a = b;
    ");
    assert_eq!(output, "\
$SP -= 16;
mz($SP + 0, 8);
mz($SP + 8, 8);
mc($SP + 0, $SP + 8, 8);
");
}

#[test]
fn unsigned_view_and_small_sizes() {
    let output = compile_ok("
        u16 a;
        u16 *p = &a;
        p[1] = 3;
    ");
    assert_eq!(output, "\
$SP -= 2;
$U[$SP + 0 >> 1] = 0;
var p = $SP + 0;
$U[p + 1 * 2 >> 1] = 3;
");
}

#[test]
fn new_and_sizeof() {
    let output = compile_ok("
        struct Point { int x; int y; };
        Point *p = new Point();
        p->y = sizeof(Point);
    ");
    assert_eq!(output, "\
var p = ma(8);
$I[p + 4 >> 2] = 8;
");
}

#[test]
fn plain_scalars_stay_named() {
    let output = compile_ok("int a = 1, b;");
    assert_eq!(output, "var a = 1;\nvar b = 0;\n");
}

#[test]
fn dyn_member_is_textual() {
    let output = compile_ok("extern.log(\"hi\");");
    assert_eq!(output, "extern.log(\"hi\");\n");
}

#[test]
fn control_flow() {
    let output = compile_ok("
        int main() {
            int i;
            for (i = 0; i < 10; i++) {
                extern.log(i);
            }
            if (i > 5) {
                i = 0;
            } else if (i > 2) {
                i = 1;
            } else {
                i = 2;
            }
            while (i < 3) {
                i = i + 1;
            }
            do {
                i--;
            } while (i > 0);
            return i;
        }
    ");
    assert_eq!(output, "\
function main() {
  var i = 0;
  for (i = 0; (i < 10); i++) {
    extern.log(i);
  }
  if ((i > 5)) {
    i = 0;
  } else if ((i > 2)) {
    i = 1;
  } else {
    i = 2;
  }
  while ((i < 3)) {
    i = (i + 1);
  }
  do {
    i--;
  } while ((i > 0));
  return i;
}
");
}

#[test]
fn loop_scoped_stack_variable() {
    let output = compile_ok("
        void f() {
            for (int i = 0; i < 3; i++) {
                int *q = &i;
            }
        }
    ");
    assert_eq!(output, "\
function f() {
  $SP -= 4;
  $I[$SP + 0 >> 2] = 0;
  for (; ($I[$SP + 0 >> 2] < 3); $I[$SP + 0 >> 2]++) {
    var q = $SP + 0;
  }
  $SP += 4;
}
");
}

#[test]
fn void_return_tears_down_frame() {
    let output = compile_ok("
        void f(int a) {
            int *p = &a;
            return;
        }
    ");
    assert_eq!(output, "\
function f(a) {
  $SP -= 4;
  $I[$SP + 0 >> 2] = a;
  var p = $SP + 0;
  $SP += 4;
  return;
}
");
}

#[test]
fn function_call() {
    let output = compile_ok("
        int add(int a, int b) {
            return a + b;
        }
        int x = add(1, 2);
    ");
    assert_eq!(output, "\
function add(a, b) {
  return (a + b);
}
var x = add(1, 2);
");
}

#[test]
fn conditional_expression() {
    let output = compile_ok("int x = 1 ? 2 : 3;");
    assert_eq!(output, "var x = (1 ? 2 : 3);\n");
}

#[test]
fn struct_returned_by_pointer() {
    let output = compile_ok("
        struct Point { int x; int y; };
        Point *make() {
            Point *p = new Point();
            p->x = 1;
            return p;
        }
    ");
    assert_eq!(output, "\
function make() {
  var p = ma(8);
  $I[p >> 2] = 1;
  return p;
}
");
}
