use crate::nth::NthOccurrence;

use super::*;

fn second_occurrence() -> Expr {
    NthOccurrence::for_property("string_property", "()").build(1)
}

#[test]
fn h2_uses_three_argument_locate_with_pattern_first() {
    let rendered = render(&second_occurrence(), Dialect::H2, 64).expect("render");
    assert_eq!(
        rendered.sql,
        r#"LOCATE(?, "string_property", (LOCATE(?, "string_property") + 1))"#
    );
    assert_eq!(
        rendered.params,
        vec![Value::from("()"), Value::from("()")]
    );
}

#[test]
fn oracle_numbers_placeholders_in_bind_order() {
    let rendered = render(&second_occurrence(), Dialect::Oracle, 64).expect("render");
    assert_eq!(
        rendered.sql,
        r#"INSTR("string_property", :1, (INSTR("string_property", :2) + 1))"#
    );
    assert_eq!(rendered.params.len(), 2);
}

#[test]
fn sqlite_plain_locate_is_instr() {
    let expr = NthOccurrence::for_property("string_property", "()").build(0);
    let rendered = render(&expr, Dialect::Sqlite, 64).expect("render");
    assert_eq!(rendered.sql, r#"instr("string_property", ?)"#);
}

#[test]
fn sqlite_start_offset_uses_registered_locate() {
    let rendered = render(&second_occurrence(), Dialect::Sqlite, 64).expect("render");
    assert_eq!(
        rendered.sql,
        r#"locate(?, "string_property", (instr("string_property", ?) + 1))"#
    );
    assert_eq!(rendered.params.len(), 2);
}

#[test]
fn literals_bind_in_visit_order() {
    let expr = Expr::locate_from(
        Expr::literal("abc"),
        Expr::literal("b"),
        Expr::literal(Value::Null),
    );
    let rendered = render(&expr, Dialect::Oracle, 64).expect("render");
    assert_eq!(rendered.sql, "INSTR(:1, :2, :3)");
    assert_eq!(
        rendered.params,
        vec![Value::from("abc"), Value::from("b"), Value::Null]
    );
}

#[test]
fn add_renders_parenthesized() {
    let expr = Expr::add(Expr::property("id"), -3);
    let rendered = render(&expr, Dialect::H2, 64).expect("render");
    assert_eq!(rendered.sql, r#"("id" + -3)"#);
    assert!(rendered.params.is_empty());
}

#[test]
fn invalid_property_name_is_rejected() {
    let expr = Expr::locate(Expr::property("body; DROP TABLE t"), Expr::literal("x"));
    let err = render(&expr, Dialect::H2, 64).expect_err("must reject");
    assert!(matches!(err, LocateError::Validation(_)));
}

#[test]
fn depth_over_limit_is_rejected() {
    let expr = NthOccurrence::for_property("string_property", "()").build(5);
    let err = render(&expr, Dialect::Oracle, 4).expect_err("must reject");
    assert!(err.to_string().contains("depth 5"));
    assert!(render(&expr, Dialect::Oracle, 5).is_ok());
}

#[test]
fn render_select_wraps_projection() {
    let rendered = render_select(&second_occurrence(), Dialect::H2, "text_record", 64)
        .expect("render");
    assert!(rendered.sql.starts_with("SELECT LOCATE("));
    assert!(rendered.sql.ends_with(r#" FROM "text_record""#));
}

#[test]
fn dialect_parses_case_insensitively() {
    assert_eq!("Oracle".parse::<Dialect>().expect("parse"), Dialect::Oracle);
    assert_eq!(" sqlite ".parse::<Dialect>().expect("parse"), Dialect::Sqlite);
    let err = "postgres".parse::<Dialect>().expect_err("reject");
    assert!(err.to_string().contains("expected sqlite|h2|oracle"), "{err}");
    for dialect in Dialect::ALL {
        assert_eq!(dialect.as_str().parse::<Dialect>().expect("round"), dialect);
    }
}
