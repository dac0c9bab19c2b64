use serde_json::Value as JsonValue;

/// A value on a resource declaration that may not be a literal at evaluation
/// time: a graph of deferred references resolved later by the host framework.
///
/// The five reference shapes here are the ones rules need to compare for
/// identity; anything else arrives as [`Expr::Other`] and is handled by the
/// serialization fallback in [`crate::flatten`].
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A plain string, possibly containing `${...}` substitution markers.
    Literal(String),
    /// An absent value.
    Undefined,
    /// A direct reference to another declaration.
    Ref(Box<Expr>),
    /// A reference to one attribute of another declaration.
    GetAtt { target: Box<Expr>, attribute: Box<Expr> },
    /// Items concatenated with a delimiter.
    Join { delimiter: String, items: Vec<Expr> },
    /// A template body whose `${...}` markers are substituted at deploy time.
    Sub(Box<Expr>),
    /// A named value exported by another template unit.
    Import(Box<Expr>),
    /// Any unrecognized shape, carried verbatim.
    Other(JsonValue),
}

impl Expr {
    pub fn literal<S: Into<String>>(s: S) -> Expr {
        Expr::Literal(s.into())
    }

    pub fn reference(target: Expr) -> Expr {
        Expr::Ref(Box::new(target))
    }

    pub fn get_att(target: Expr, attribute: Expr) -> Expr {
        Expr::GetAtt {
            target: Box::new(target),
            attribute: Box::new(attribute),
        }
    }

    pub fn join<S: Into<String>>(delimiter: S, items: Vec<Expr>) -> Expr {
        Expr::Join {
            delimiter: delimiter.into(),
            items,
        }
    }

    pub fn sub(body: Expr) -> Expr {
        Expr::Sub(Box::new(body))
    }

    pub fn import(name: Expr) -> Expr {
        Expr::Import(Box::new(name))
    }
}
