//! Fuzz target for deferred-expression flattening.
//!
//! Goal: `flatten` is documented as total. It should **never panic** on any
//! expression graph, however deeply nested or malformed.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_flatten
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stackguard_tree::{Expr, flatten};

/// Mirror of `Expr` that libFuzzer can generate structurally.
#[derive(Arbitrary, Debug)]
enum FuzzExpr {
    Literal(String),
    Undefined,
    Ref(Box<FuzzExpr>),
    GetAtt(Box<FuzzExpr>, Box<FuzzExpr>),
    Join(String, Vec<FuzzExpr>),
    Sub(Box<FuzzExpr>),
    Import(Box<FuzzExpr>),
    OtherString(String),
    OtherNumber(u64),
    OtherList(Vec<String>),
}

fn convert(fuzz: FuzzExpr, depth: usize) -> Expr {
    // Cap recursion so conversion itself cannot overflow the stack.
    if depth > 32 {
        return Expr::Undefined;
    }
    match fuzz {
        FuzzExpr::Literal(s) => Expr::Literal(s),
        FuzzExpr::Undefined => Expr::Undefined,
        FuzzExpr::Ref(t) => Expr::reference(convert(*t, depth + 1)),
        FuzzExpr::GetAtt(t, a) => Expr::get_att(convert(*t, depth + 1), convert(*a, depth + 1)),
        FuzzExpr::Join(delimiter, items) => Expr::join(
            delimiter,
            items
                .into_iter()
                .take(16)
                .map(|i| convert(i, depth + 1))
                .collect(),
        ),
        FuzzExpr::Sub(b) => Expr::sub(convert(*b, depth + 1)),
        FuzzExpr::Import(n) => Expr::import(convert(*n, depth + 1)),
        FuzzExpr::OtherString(s) => Expr::Other(serde_json::Value::String(s)),
        FuzzExpr::OtherNumber(n) => Expr::Other(serde_json::json!(n)),
        FuzzExpr::OtherList(items) => Expr::Other(serde_json::json!(items)),
    }
}

fuzz_target!(|input: FuzzExpr| {
    let expr = convert(input, 0);

    // Total and deterministic: never panics, same output twice.
    let first = flatten(&expr);
    let second = flatten(&expr);
    assert_eq!(first, second);
});
