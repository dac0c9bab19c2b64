use crate::expr::Expr;

/// Flatten a deferred-reference graph into a canonical, marker-free string
/// so identity can be tested with substring or regex matching instead of
/// structural comparison.
///
/// Total and deterministic: never panics, including on unrecognized shapes
/// (those fall back to their JSON serialization).
pub fn flatten(expr: &Expr) -> String {
    match expr {
        Expr::Literal(s) => rewrite_markers(s),
        Expr::Undefined => String::new(),
        Expr::Ref(target) => format!("<{}>", flatten(target)),
        Expr::GetAtt { target, attribute } => {
            format!("<{}.{}>", flatten(target), flatten(attribute))
        }
        Expr::Join { delimiter, items } => items
            .iter()
            .map(flatten)
            .collect::<Vec<_>>()
            .join(delimiter),
        Expr::Sub(body) => flatten(body),
        Expr::Import(name) => flatten(name),
        Expr::Other(value) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Rewrite `${...}` substitution markers to `<...>` so flattened output is
/// directly regex-matchable.
///
/// `${` and `}` are substituted independently, so nested and unterminated
/// markers still come out marker-free.
fn rewrite_markers(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('<');
            }
            '}' => out.push('>'),
            _ => out.push(c),
        }
    }
    out
}
