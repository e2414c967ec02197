//! Property-based tests for the Simple evaluator.
//!
//! Generated scripts are parsed and run end to end; the printed output is
//! compared with what Rust computes for the same operands.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use simple_eval::{Evaluator, Value};
use simple_parser::parse;
use simple_types::SourceFile;

fn run(source: &str) -> String {
    let sf = SourceFile::new("prop.ss", source);
    let program = parse(&sf).expect("generated script parses");
    let mut eval = Evaluator::new(Vec::new());
    eval.eval_program(&program).expect("generated script runs");
    String::from_utf8(eval.into_output()).expect("utf-8 output")
}

// -- Strategies --

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,12}")
        .expect("valid regex")
        .prop_filter("not reserved", |s| {
            !matches!(
                s.as_str(),
                "if" | "else" | "while" | "until" | "true" | "false" | "null" | "write"
            )
        })
}

/// Literal text paired with the value it denotes.
fn literal_strategy() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        (0i64..1_000_000).prop_map(|n| (n.to_string(), Value::Integer(n))),
        "[a-z ]{0,8}".prop_map(|s| (format!("\"{s}\""), Value::String(s))),
        any::<bool>().prop_map(|b| (b.to_string(), Value::Bool(b))),
        Just(("null".to_string(), Value::Null)),
    ]
}

// -- Properties --

proptest! {
    #[test]
    fn integer_arithmetic_matches_native(a in 0i64..=i32::MAX as i64, b in 0i64..=i32::MAX as i64) {
        let out = run(&format!("write({a} + {b}, {a} - {b}, {a} * {b});"));
        prop_assert_eq!(out, format!("{}\n{}\n{}\n", a + b, a - b, a * b));
    }

    #[test]
    fn multiplication_binds_tighter(a in 0i64..10_000, b in 0i64..10_000, c in 0i64..10_000) {
        let out = run(&format!("write({a} + {b} * {c}, ({a} + {b}) * {c});"));
        prop_assert_eq!(out, format!("{}\n{}\n", a + b * c, (a + b) * c));
    }

    #[test]
    fn comparisons_match_native(a in 0i64..1_000, b in 0i64..1_000) {
        let out = run(&format!("write({a} < {b}, {a} > {b}, {a} == {b}, {a} != {b});"));
        prop_assert_eq!(out, format!("{}\n{}\n{}\n{}\n", a < b, a > b, a == b, a != b));
    }

    #[test]
    fn assignment_round_trips(name in identifier_strategy(), (text, value) in literal_strategy()) {
        let out = run(&format!("{name} = {text}; write({name}, {name} == {text});"));
        prop_assert_eq!(out, format!("{value}\ntrue\n"));
    }

    #[test]
    fn concatenation_renders_both_sides(s in "[a-z]{0,8}", (text, value) in literal_strategy()) {
        let out = run(&format!("write(\"{s}\" + {text});"));
        prop_assert_eq!(out, format!("{s}{value}\n"));
    }

    #[test]
    fn loop_counts_to_bound(n in 0i64..50) {
        let out = run(&format!("i = 0; while i < {n} {{ i = i + 1; }} write(i);"));
        prop_assert_eq!(out, format!("{n}\n"));
    }
}
