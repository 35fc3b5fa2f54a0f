use super::*;

fn num(n: i64) -> ScriptValue {
    ScriptValue::Number(n)
}

fn var(id: &str) -> ScriptValue {
    ScriptValue::variable(id)
}

#[test]
fn parses_global_with_leading_zeros() {
    assert_eq!(
        parse_expression("$00$ + 8"),
        ScriptValue::binary(BinaryOp::Add, var("0"), num(8))
    );
}

#[test]
fn parses_local_and_explicit_global() {
    assert_eq!(
        parse_expression("$L0$ + 8"),
        ScriptValue::binary(BinaryOp::Add, var("L0"), num(8))
    );
    assert_eq!(
        parse_expression("$V0$ + 8"),
        ScriptValue::binary(BinaryOp::Add, var("V0"), num(8))
    );
}

#[test]
fn keeps_nested_logical_not() {
    let once = ScriptValue::unary(UnaryOp::Not, var("V0"));
    let twice = ScriptValue::unary(UnaryOp::Not, once.clone());
    assert_eq!(parse_expression("!($V0$)"), once);
    assert_eq!(parse_expression("!!($V0$)"), twice);
    assert_eq!(parse_expression("!(!($V0$))"), twice);
}

#[test]
fn keeps_nested_bitwise_not() {
    let once = ScriptValue::unary(UnaryOp::BNot, var("V0"));
    assert_eq!(parse_expression("~($V0$)"), once);
    assert_eq!(
        parse_expression("~~($V0$)"),
        ScriptValue::unary(UnaryOp::BNot, once)
    );
}

#[test]
fn parses_function_calls() {
    assert_eq!(
        parse_expression("min($L0$, 10)"),
        ScriptValue::binary(BinaryOp::Min, var("L0"), num(10))
    );
    assert_eq!(
        parse_expression("max($L0$, 10)"),
        ScriptValue::binary(BinaryOp::Max, var("L0"), num(10))
    );
    assert_eq!(
        parse_expression("atan2($L0$, 10)"),
        ScriptValue::binary(BinaryOp::Atan2, var("L0"), num(10))
    );
    assert_eq!(
        parse_expression("abs($L0$)"),
        ScriptValue::unary(UnaryOp::Abs, var("L0"))
    );
    assert_eq!(
        parse_expression("rnd($L0$)"),
        ScriptValue::unary(UnaryOp::Rnd, var("L0"))
    );
    assert_eq!(
        parse_expression("isqrt($L0$)"),
        ScriptValue::unary(UnaryOp::Isqrt, var("L0"))
    );
}

#[test]
fn negation_is_subtraction_from_zero() {
    assert_eq!(
        parse_expression("-5"),
        ScriptValue::binary(BinaryOp::Sub, num(0), num(5))
    );
    assert_eq!(
        parse_expression("10-5"),
        ScriptValue::binary(BinaryOp::Sub, num(10), num(5))
    );
    assert_eq!(
        parse_expression("10+(-5)"),
        ScriptValue::binary(
            BinaryOp::Add,
            num(10),
            ScriptValue::binary(BinaryOp::Sub, num(0), num(5))
        )
    );
}

#[test]
fn booleans_become_numbers() {
    assert_eq!(
        parse_expression("true || false"),
        ScriptValue::binary(BinaryOp::Or, num(1), num(0))
    );
}

#[test]
fn respects_precedence_and_left_associativity() {
    // 1 + 2 * 3 == 7 && 8 - 4 - 2 > 1
    let lhs = ScriptValue::binary(
        BinaryOp::Eq,
        ScriptValue::binary(
            BinaryOp::Add,
            num(1),
            ScriptValue::binary(BinaryOp::Mul, num(2), num(3)),
        ),
        num(7),
    );
    let rhs = ScriptValue::binary(
        BinaryOp::Gt,
        ScriptValue::binary(
            BinaryOp::Sub,
            ScriptValue::binary(BinaryOp::Sub, num(8), num(4)),
            num(2),
        ),
        num(1),
    );
    assert_eq!(
        parse_expression("1 + 2 * 3 == 7 && 8 - 4 - 2 > 1"),
        ScriptValue::binary(BinaryOp::And, lhs, rhs)
    );
}

#[test]
fn bitwise_operators_bind_looser_than_comparison() {
    assert_eq!(
        parse_expression("$V1$ & 4 == 4 | 1 << 2 ^ 3"),
        ScriptValue::binary(
            BinaryOp::BOr,
            ScriptValue::binary(
                BinaryOp::BAnd,
                var("V1"),
                ScriptValue::binary(BinaryOp::Eq, num(4), num(4)),
            ),
            ScriptValue::binary(
                BinaryOp::BXor,
                ScriptValue::binary(BinaryOp::Shl, num(1), num(2)),
                num(3),
            ),
        )
    );
}

#[test]
fn relational_operators_map_to_kinds() {
    for (src, op) in [
        ("1 < 2", BinaryOp::Lt),
        ("1 <= 2", BinaryOp::Lte),
        ("1 > 2", BinaryOp::Gt),
        ("1 >= 2", BinaryOp::Gte),
        ("1 != 2", BinaryOp::Ne),
        ("1 % 2", BinaryOp::Mod),
        ("1 / 2", BinaryOp::Div),
        ("1 >> 2", BinaryOp::Shr),
    ] {
        assert_eq!(
            parse_expression(src),
            ScriptValue::binary(op, num(1), num(2)),
            "{src}"
        );
    }
}

#[test]
fn malformed_input_degrades_to_zero() {
    for src in [
        "* 8",
        "min(5,)",
        "($00$ + 8",
        "",
        "1 +",
        "foo(1)",
        "abs(1, 2)",
        "min(1)",
        "1 2",
        "$V$",
        "max",
    ] {
        assert_eq!(parse_expression(src), num(0), "{src:?}");
    }
}

#[test]
fn strict_parse_reports_offset() {
    let err = try_parse_expression("1 + * 2").unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("parse error:"), "{msg}");
    assert!(msg.contains("at byte 4"), "{msg}");
    assert!(try_parse_expression("($L0$)").is_ok());
}

#[test]
fn deep_nesting_degrades_to_zero() {
    assert_eq!(parse_expression(&"(".repeat(10_000)), num(0));
    let parens = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(parse_expression(&parens), num(0));
    assert_eq!(parse_expression(&format!("{}1", "!".repeat(10_000))), num(0));
    assert_eq!(parse_expression(&format!("{}1", "-".repeat(10_000))), num(0));
    let calls = format!("{}1{}", "abs(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(parse_expression(&calls), num(0));

    let err = try_parse_expression(&"~".repeat(10_000)).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"), "{err}");
}

#[test]
fn moderate_nesting_still_parses() {
    let src = format!("{}$V0${}", "(".repeat(60), ")".repeat(60));
    assert_eq!(parse_expression(&src), ScriptValue::variable("V0"));
    let src = format!("{}1", "!".repeat(100));
    assert_eq!(
        try_parse_expression(&src).unwrap().walk().count(),
        101
    );
}
