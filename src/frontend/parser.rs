//! Nom parsers used to generate the AST.

pub mod error;

use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::{escaped, is_not, tag, take_until, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace1, none_of, one_of};
use nom::combinator::{all_consuming, map, not, opt, recognize, verify};
use nom::multi::{many0, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use crate::frontend::Program;
use crate::frontend::ast::*;
use error::{ParseError, ParseErrorKind, ParseResult};

type Input<'a> = &'a str;
type Output<'a, O> = nom::IResult<Input<'a>, O>;

/// Words that cannot be used as identifiers.
const KEYWORDS: &[&str] = &[
    "struct", "return", "if", "else", "while", "do", "for", "sizeof", "new", "true", "false", "null",
];

/// Position of the remaining input, captured after leading whitespace has been skipped.
fn position(i: Input<'_>) -> Position {
    Position(i.len() as u32)
}

// whitespace and comments

fn line_comment(i: Input<'_>) -> Output<'_, Input<'_>> {
    recognize(pair(tag("//"), opt(is_not("\n"))))(i)
}

fn block_comment(i: Input<'_>) -> Output<'_, Input<'_>> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(i)
}

fn space(i: Input<'_>) -> Output<'_, Input<'_>> {
    recognize(many0(alt((multispace1, line_comment, block_comment))))(i)
}

/// Skips whitespace and comments before the given parser.
fn ws<'a, O, P>(parser: P) -> impl FnMut(Input<'a>) -> Output<'a, O>
where P: Parser<Input<'a>, O, nom::error::Error<Input<'a>>> {
    preceded(space, parser)
}

/// Matches the given word not followed by an identifier character.
fn keyword<'a>(word: &'static str) -> impl FnMut(Input<'a>) -> Output<'a, Input<'a>> {
    ws(terminated(tag(word), not(take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'))))
}

// identifier ([a-z_][a-z0-9_]*)

fn label(i: Input<'_>) -> Output<'_, &str> {
    verify(
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
        |l: &str| !KEYWORDS.contains(&l),
    )(i)
}

fn ident(i: Input<'_>) -> Output<'_, Ident> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(label, move |name: &str| Ident { name: name.to_string(), position })(i)
}

// type name with pointer stars (int, Point**)

fn type_name(i: Input<'_>) -> Output<'_, TypeName> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        pair(ident, many0(ws(char('*')))),
        move |(ident, stars)| TypeName { ident, pointers: stars.len() as u32, type_id: None, position },
    )(i)
}

// literals (123, true, null, "hello")

fn numerical(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (remaining, digits) = digit1(i)?;
    match str::parse::<i64>(digits) {
        Ok(value) => Ok((remaining, Expression::Literal(Literal {
            value: LiteralValue::Numeric(value),
            type_id: None,
            position,
        }))),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(i, nom::error::ErrorKind::Digit))),
    }
}

fn boolean(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(alt((keyword("true"), keyword("false"))), move |value: Input<'_>| {
        Expression::Literal(Literal { value: LiteralValue::Bool(value == "true"), type_id: None, position })
    })(i)
}

fn null_literal(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(keyword("null"), move |_| {
        Expression::Literal(Literal { value: LiteralValue::Null, type_id: None, position })
    })(i)
}

fn string(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    alt((
        map(tag("\"\""), move |_| {
            Expression::Literal(Literal { value: LiteralValue::String("".to_string()), type_id: None, position })
        }),
        map(
            delimited(char('"'), escaped(none_of("\\\""), '\\', one_of("\"nrt\\")), char('"')),
            move |value: Input<'_>| {
                Expression::Literal(Literal { value: LiteralValue::String(value.to_string()), type_id: None, position })
            },
        ),
    ))(i)
}

fn literal(i: Input<'_>) -> Output<'_, Expression> {
    alt((boolean, null_literal, string, numerical))(i)
}

// primary expressions

fn variable(i: Input<'_>) -> Output<'_, Expression> {
    map(ident, |ident| {
        let position = ident.position;
        Expression::Variable(Variable { ident, binding_id: None, type_id: None, position })
    })(i)
}

fn new_expression(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    // allocation takes no constructor arguments, an argument list is accepted and ignored
    map(
        preceded(keyword("new"), pair(ident, opt(delimited(ws(char('(')), separated_list0(ws(char(',')), expression), ws(char(')')))))),
        move |(ident, _)| Expression::New(New { ident, type_id: None, position }),
    )(i)
}

fn size_of(i: Input<'_>) -> Output<'_, Expression> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        preceded(keyword("sizeof"), delimited(ws(char('(')), type_name, ws(char(')')))),
        move |ty| Expression::SizeOf(SizeOf { ty, type_id: None, position }),
    )(i)
}

fn parenthesized(i: Input<'_>) -> Output<'_, Expression> {
    delimited(ws(char('(')), expression, ws(char(')')))(i)
}

fn primary(i: Input<'_>) -> Output<'_, Expression> {
    alt((literal, new_expression, variable, parenthesized))(i)
}

// postfix expressions (calls, member access, indexing, increment/decrement)

fn postfix(i: Input<'_>) -> Output<'_, Expression> {
    enum Suffix {
        Call(Vec<Expression>),
        Dot(Ident),
        Arrow(Ident),
        Index(Expression),
        Postfix(PostfixOperator),
    }
    let (i, first) = primary(i)?;
    let position = first.position();
    let (i, suffixes) = many0(alt((
        map(delimited(ws(char('(')), separated_list0(ws(char(',')), expression), ws(char(')'))), Suffix::Call),
        map(preceded(ws(tag("->")), ident), Suffix::Arrow),
        map(preceded(ws(char('.')), ident), Suffix::Dot),
        map(delimited(ws(char('[')), expression, ws(char(']'))), Suffix::Index),
        map(ws(tag("++")), |_| Suffix::Postfix(PostfixOperator::Inc)),
        map(ws(tag("--")), |_| Suffix::Postfix(PostfixOperator::Dec)),
    )))(i)?;
    Ok((i, suffixes.into_iter().fold(first, |expr, suffix| match suffix {
        Suffix::Call(args) => Expression::Call(Box::new(Call { callee: expr, args, type_id: None, position })),
        Suffix::Dot(ident) => Expression::Member(Box::new(Member { expr, access: Access::Dot(ident), field_offset: None, type_id: None, position })),
        Suffix::Arrow(ident) => Expression::Member(Box::new(Member { expr, access: Access::Arrow(ident), field_offset: None, type_id: None, position })),
        Suffix::Index(index) => Expression::Member(Box::new(Member { expr, access: Access::Index(index), field_offset: None, type_id: None, position })),
        Suffix::Postfix(op) => Expression::PostfixOp(Box::new(PostfixOp { op, expr, type_id: None, position })),
    })))
}

// unary expressions

fn unary(i: Input<'_>) -> Output<'_, Expression> {
    fn prefixed<'a>(op: UnaryOperator, parser: impl FnMut(Input<'a>) -> Output<'a, Input<'a>>) -> impl FnMut(Input<'a>) -> Output<'a, Expression> {
        let mut parser = preceded(parser, unary);
        move |i: Input<'a>| {
            let (i, _) = space(i)?;
            let position = position(i);
            let (i, expr) = parser.parse(i)?;
            Ok((i, Expression::UnaryOp(Box::new(UnaryOp { op, expr, type_id: None, position }))))
        }
    }
    alt((
        prefixed(UnaryOperator::AddressOf, recognize(terminated(char('&'), not(char('&'))))),
        prefixed(UnaryOperator::Deref, recognize(char('*'))),
        prefixed(UnaryOperator::Minus, recognize(terminated(char('-'), not(one_of("-="))))),
        prefixed(UnaryOperator::Not, recognize(terminated(char('!'), not(char('='))))),
        prefixed(UnaryOperator::BitNot, recognize(char('~'))),
        size_of,
        postfix,
    ))(i)
}

// binary expressions, one parser per precedence level

fn binary_level<'a>(
    operator: fn(Input<'a>) -> Output<'a, BinaryOperator>,
    next: fn(Input<'a>) -> Output<'a, Expression>,
) -> impl FnMut(Input<'a>) -> Output<'a, Expression> {
    move |i: Input<'a>| {
        let (i, first) = next(i)?;
        let (i, rest) = many0(pair(ws(operator), next))(i)?;
        Ok((i, rest.into_iter().fold(first, |left, (op, right)| {
            let position = left.position();
            Expression::BinaryOp(Box::new(BinaryOp { op, left, right, type_id: None, position }))
        })))
    }
}

fn multiplicative_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(alt((
        terminated(tag("*"), not(char('='))),
        terminated(tag("/"), not(one_of("=/*"))),
        terminated(tag("%"), not(char('='))),
    )), BinaryOperator::from_string)(i)
}

fn additive_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(alt((
        terminated(tag("+"), not(one_of("+="))),
        terminated(tag("-"), not(one_of("-=>"))),
    )), BinaryOperator::from_string)(i)
}

fn shift_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(alt((
        terminated(tag("<<"), not(char('='))),
        terminated(tag(">>"), not(char('='))),
    )), BinaryOperator::from_string)(i)
}

fn relational_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(alt((
        tag("<="),
        tag(">="),
        terminated(tag("<"), not(one_of("<="))),
        terminated(tag(">"), not(one_of(">="))),
    )), BinaryOperator::from_string)(i)
}

fn equality_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(alt((tag("=="), tag("!="))), BinaryOperator::from_string)(i)
}

fn bit_and_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(terminated(tag("&"), not(one_of("&="))), BinaryOperator::from_string)(i)
}

fn bit_xor_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(terminated(tag("^"), not(char('='))), BinaryOperator::from_string)(i)
}

fn bit_or_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(terminated(tag("|"), not(one_of("|="))), BinaryOperator::from_string)(i)
}

fn logical_and_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(tag("&&"), BinaryOperator::from_string)(i)
}

fn logical_or_operator(i: Input<'_>) -> Output<'_, BinaryOperator> {
    map(tag("||"), BinaryOperator::from_string)(i)
}

fn multiplicative(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(multiplicative_operator, unary)(i)
}

fn additive(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(additive_operator, multiplicative)(i)
}

fn shift(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(shift_operator, additive)(i)
}

fn relational(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(relational_operator, shift)(i)
}

fn equality(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(equality_operator, relational)(i)
}

fn bit_and(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(bit_and_operator, equality)(i)
}

fn bit_xor(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(bit_xor_operator, bit_and)(i)
}

fn bit_or(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(bit_or_operator, bit_xor)(i)
}

fn logical_and(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(logical_and_operator, bit_or)(i)
}

fn logical_or(i: Input<'_>) -> Output<'_, Expression> {
    binary_level(logical_or_operator, logical_and)(i)
}

// conditional (a ? b : c)

fn conditional(i: Input<'_>) -> Output<'_, Expression> {
    let (i, cond) = logical_or(i)?;
    let (i, rest) = opt(tuple((ws(char('?')), expression, ws(char(':')), expression)))(i)?;
    Ok((i, match rest {
        Some((_, true_expr, _, false_expr)) => {
            let position = cond.position();
            Expression::Conditional(Box::new(Conditional { cond, true_expr, false_expr, type_id: None, position }))
        }
        None => cond,
    }))
}

// assignment, right associative

fn assignment_operator(i: Input<'_>) -> Output<'_, AssignOperator> {
    map(alt((
        terminated(tag("="), not(char('='))),
        tag("+="), tag("-="), tag("*="), tag("/="), tag("%="),
        tag("<<="), tag(">>="), tag("&="), tag("|="), tag("^="),
    )), AssignOperator::from_string)(i)
}

fn expression(i: Input<'_>) -> Output<'_, Expression> {
    let (i, left) = conditional(i)?;
    let (i, rest) = opt(pair(ws(assignment_operator), expression))(i)?;
    Ok((i, match rest {
        Some((op, right)) => {
            let position = left.position();
            Expression::Assignment(Box::new(Assignment { op, left, right, type_id: None, position }))
        }
        None => left,
    }))
}

// statements

fn struct_field(i: Input<'_>) -> Output<'_, StructField> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        tuple((type_name, ident, ws(char(';')))),
        move |(ty, ident, _)| StructField { ty, ident, position },
    )(i)
}

fn struct_decl(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        tuple((keyword("struct"), ident, ws(char('{')), many0(struct_field), ws(char('}')), opt(ws(char(';'))))),
        move |(_, ident, _, fields, _, _)| Statement::StructDecl(StructDecl { ident, fields, type_id: None, position }),
    )(i)
}

fn param(i: Input<'_>) -> Output<'_, Param> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(pair(type_name, ident), move |(ty, ident)| Param { ty, ident, binding_id: None, position })(i)
}

fn function_decl(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (i, ret) = type_name(i)?;
    let (i, ident) = ident(i)?;
    let (i, params) = delimited(ws(char('(')), separated_list0(ws(char(',')), param), ws(char(')')))(i)?;
    let (i, block) = block(i)?;
    Ok((i, Statement::FunctionDecl(FunctionDecl {
        ret, ident, params, block,
        type_id: None, binding_id: None, scope_id: None, position,
    })))
}

fn initializer(i: Input<'_>) -> Output<'_, Initializer> {
    alt((
        map(
            delimited(ws(char('{')), separated_list0(ws(char(',')), expression), ws(char('}'))),
            Initializer::Struct,
        ),
        map(expression, Initializer::Expression),
    ))(i)
}

fn var_declarator(i: Input<'_>) -> Output<'_, VarDeclarator> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (i, stars) = many0(ws(char('*')))(i)?;
    let (i, ident) = ident(i)?;
    let (i, init) = opt(preceded(ws(terminated(char('='), not(char('=')))), initializer))(i)?;
    Ok((i, VarDeclarator {
        pointers: stars.len() as u32,
        ident, init,
        type_id: None, binding_id: None, position,
    }))
}

fn var_decl(i: Input<'_>) -> Output<'_, VarDecl> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (i, type_name) = ident(i)?;
    let (i, decls) = separated_list1(ws(char(',')), var_declarator)(i)?;
    Ok((i, VarDecl { type_name, decls, position }))
}

fn var_statement(i: Input<'_>) -> Output<'_, Statement> {
    map(terminated(var_decl, ws(char(';'))), Statement::VarDecl)(i)
}

fn block(i: Input<'_>) -> Output<'_, Block> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        delimited(ws(char('{')), many0(statement), ws(char('}'))),
        move |statements| Block { statements, scope_id: None, position },
    )(i)
}

fn if_block(i: Input<'_>) -> Output<'_, IfStatement> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (i, _) = keyword("if")(i)?;
    let (i, cond) = delimited(ws(char('(')), expression, ws(char(')')))(i)?;
    let (i, body) = block(i)?;
    let (i, else_block) = opt(preceded(keyword("else"), alt((
        map(if_block, |nested| Else::If(Box::new(nested))),
        map(block, Else::Block),
    ))))(i)?;
    Ok((i, IfStatement { cond, if_block: body, else_block, position }))
}

fn if_statement(i: Input<'_>) -> Output<'_, Statement> {
    map(if_block, Statement::If)(i)
}

fn while_statement(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        tuple((keyword("while"), delimited(ws(char('(')), expression, ws(char(')'))), block)),
        move |(_, cond, block)| Statement::While(WhileLoop { cond, block, is_do_while: false, position }),
    )(i)
}

fn do_while_statement(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        tuple((keyword("do"), block, keyword("while"), delimited(ws(char('(')), expression, ws(char(')'))), ws(char(';')))),
        move |(_, block, _, cond, _)| Statement::While(WhileLoop { cond, block, is_do_while: true, position }),
    )(i)
}

fn for_statement(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    let (i, _) = keyword("for")(i)?;
    let (i, _) = ws(char('('))(i)?;
    let (i, init) = opt(alt((
        map(var_decl, ForInit::VarDecl),
        map(expression, ForInit::Expression),
    )))(i)?;
    let (i, _) = ws(char(';'))(i)?;
    let (i, cond) = opt(expression)(i)?;
    let (i, _) = ws(char(';'))(i)?;
    let (i, step) = opt(expression)(i)?;
    let (i, _) = ws(char(')'))(i)?;
    let (i, block) = block(i)?;
    Ok((i, Statement::For(Box::new(ForLoop { init, cond, step, block, scope_id: None, position }))))
}

fn return_statement(i: Input<'_>) -> Output<'_, Statement> {
    let (i, _) = space(i)?;
    let position = position(i);
    map(
        tuple((keyword("return"), opt(expression), ws(char(';')))),
        move |(_, expr, _)| Statement::Return(Return { expr, position }),
    )(i)
}

fn expression_statement(i: Input<'_>) -> Output<'_, Statement> {
    map(terminated(expression, ws(char(';'))), Statement::Expression)(i)
}

fn statement(i: Input<'_>) -> Output<'_, Statement> {
    alt((
        struct_decl,
        if_statement,
        while_statement,
        do_while_statement,
        for_statement,
        return_statement,
        map(block, Statement::Block),
        function_decl,
        var_statement,
        expression_statement,
    ))(i)
}

/// Parses the given source into a program AST.
pub fn parse(input: &str) -> ParseResult<Program> {
    match all_consuming(terminated(many0(statement), space))(input) {
        Ok((_, statements)) => Ok(statements),
        Err(nom::Err::Failure(e)) if e.code == nom::error::ErrorKind::Digit => {
            Err(ParseError::new(ParseErrorKind::InvalidNumerical, Position(e.input.len() as u32)))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(ParseError::new(ParseErrorKind::SyntaxError, Position(e.input.len() as u32)))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(ParseErrorKind::SyntaxError, Position(0))),
    }
}
