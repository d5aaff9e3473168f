//! Expression AST definitions.
//!
//! Expressions are immutable trees built by the caller. The evaluation core never
//! rewrites them; it reads them to compile evaluators and uses them as keys of
//! its registration tables, which is why `Expr` hashes and compares structurally.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use sift_core::Value;

/// Reference to a queried source or to a field of its elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Path {
    /// A queried source, e.g. the `cat` in `from cat`.
    Root(String),
    /// A positional field of the elements of `root`.
    Field {
        root: String,
        name: String,
        index: usize,
    },
}

impl Path {
    /// Creates a root path.
    pub fn root(name: impl Into<String>) -> Self {
        Path::Root(name.into())
    }

    /// Creates a field path rooted at `root`.
    pub fn field(root: impl Into<String>, name: impl Into<String>, index: usize) -> Self {
        Path::Field {
            root: root.into(),
            name: name.into(),
            index,
        }
    }

    /// Returns the name of the source this path is rooted at.
    pub fn root_name(&self) -> &str {
        match self {
            Path::Root(name) => name,
            Path::Field { root, .. } => root,
        }
    }

    /// Returns the root path this path is rooted at.
    pub fn to_root(&self) -> Path {
        Path::Root(self.root_name().into())
    }

    /// Returns true if this path denotes a source rather than a field.
    pub fn is_root(&self) -> bool {
        matches!(self, Path::Root(_))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root(name) => f.write_str(name),
            Path::Field { root, name, .. } => write!(f, "{}.{}", root, name),
        }
    }
}

/// Operators of operation nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    Not,
    // Null tests
    IsNull,
    IsNotNull,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Set membership: first argument against the rest
    In,
}

impl Operator {
    /// Returns the smallest number of arguments the operator accepts.
    pub fn min_args(&self) -> usize {
        match self {
            Operator::Not | Operator::IsNull | Operator::IsNotNull => 1,
            Operator::And | Operator::Or | Operator::In => 1,
            _ => 2,
        }
    }

    /// Returns the largest number of arguments, or None for variadic operators.
    pub fn max_args(&self) -> Option<usize> {
        match self {
            Operator::And | Operator::Or | Operator::In => None,
            Operator::Not | Operator::IsNull | Operator::IsNotNull => Some(1),
            _ => Some(2),
        }
    }

    /// Returns true if `n` arguments are acceptable.
    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min_args() && self.max_args().map_or(true, |max| n <= max)
    }

    /// Returns the operator's textual symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::In => "IN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression AST node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Source or field reference.
    Path(Path),
    /// Literal value.
    Constant(Value),
    /// Named query parameter, supplied through the binding vector.
    Param(String),
    /// Operator applied to sub-expressions.
    Operation { op: Operator, args: Vec<Expr> },
}

impl Expr {
    /// Creates a root path expression.
    pub fn root(name: impl Into<String>) -> Self {
        Expr::Path(Path::root(name))
    }

    /// Creates a field path expression.
    pub fn field(root: impl Into<String>, name: impl Into<String>, index: usize) -> Self {
        Expr::Path(Path::field(root, name, index))
    }

    /// Creates a constant expression.
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    /// Creates a parameter expression.
    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(name.into())
    }

    /// Creates an operation node.
    pub fn op(op: Operator, args: Vec<Expr>) -> Self {
        Expr::Operation { op, args }
    }

    fn binary(op: Operator, left: Expr, right: Expr) -> Self {
        Expr::Operation {
            op,
            args: vec![left, right],
        }
    }

    fn unary(op: Operator, expr: Expr) -> Self {
        Expr::Operation {
            op,
            args: vec![expr],
        }
    }

    /// Creates an equality expression.
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Eq, left, right)
    }

    /// Creates a not-equal expression.
    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Ne, left, right)
    }

    /// Creates a less-than expression.
    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Lt, left, right)
    }

    /// Creates a less-than-or-equal expression.
    pub fn le(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Le, left, right)
    }

    /// Creates a greater-than expression.
    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Gt, left, right)
    }

    /// Creates a greater-than-or-equal expression.
    pub fn ge(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Ge, left, right)
    }

    /// Creates an AND expression.
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::And, left, right)
    }

    /// Creates an OR expression.
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Or, left, right)
    }

    /// Creates a conjunction of all given conditions.
    pub fn all(conditions: Vec<Expr>) -> Self {
        Expr::op(Operator::And, conditions)
    }

    /// Creates a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Self::unary(Operator::Not, expr)
    }

    /// Creates an IS NULL expression.
    pub fn is_null(expr: Expr) -> Self {
        Self::unary(Operator::IsNull, expr)
    }

    /// Creates an IS NOT NULL expression.
    pub fn is_not_null(expr: Expr) -> Self {
        Self::unary(Operator::IsNotNull, expr)
    }

    /// Creates an addition expression.
    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Add, left, right)
    }

    /// Creates a subtraction expression.
    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Sub, left, right)
    }

    /// Creates a multiplication expression.
    pub fn mul(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Mul, left, right)
    }

    /// Creates a division expression.
    pub fn div(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Div, left, right)
    }

    /// Creates a modulo expression.
    pub fn modulo(left: Expr, right: Expr) -> Self {
        Self::binary(Operator::Mod, left, right)
    }

    /// Creates an IN expression.
    pub fn in_list(expr: Expr, list: Vec<Expr>) -> Self {
        let mut args = Vec::with_capacity(list.len() + 1);
        args.push(expr);
        args.extend(list);
        Expr::op(Operator::In, args)
    }

    /// Returns the path if this is a path expression.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Expr::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Calls `visit` for every leaf (path, constant or parameter) of the tree, left to right.
    pub fn visit_leaves<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        match self {
            Expr::Operation { args, .. } => {
                for arg in args {
                    arg.visit_leaves(visit);
                }
            }
            leaf => visit(leaf),
        }
    }

    /// Returns the distinct root names referenced by paths in this expression.
    pub fn referenced_roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = Vec::new();
        self.visit_leaves(&mut |leaf| {
            if let Expr::Path(path) = leaf {
                let name = path.root_name();
                if !roots.contains(&name) {
                    roots.push(name);
                }
            }
        });
        roots
    }
}

impl From<Path> for Expr {
    fn from(path: Path) -> Self {
        Expr::Path(path)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Path(path) => write!(f, "{}", path),
            Expr::Constant(value) => write!(f, "{}", value),
            Expr::Param(name) => write!(f, "?{}", name),
            Expr::Operation { op, args } => match (op, args.as_slice()) {
                (Operator::Not, [arg]) => write!(f, "!{}", arg),
                (Operator::IsNull | Operator::IsNotNull, [arg]) => write!(f, "{} {}", arg, op),
                (Operator::In, [first, rest @ ..]) => {
                    write!(f, "{} IN (", first)?;
                    write_joined(f, rest, ", ")?;
                    f.write_str(")")
                }
                _ => {
                    f.write_str("(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " {} ", op)?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_path_roots() {
        let field = Path::field("cat", "name", 0);
        assert_eq!(field.root_name(), "cat");
        assert_eq!(field.to_root(), Path::root("cat"));
        assert!(!field.is_root());
        assert!(Path::root("cat").is_root());
    }

    #[test]
    fn test_structural_equality() {
        let a = Expr::eq(Expr::field("cat", "name", 0), Expr::constant("Bob"));
        let b = Expr::eq(Expr::field("cat", "name", 0), Expr::constant("Bob"));
        let c = Expr::eq(Expr::field("cat", "name", 0), Expr::constant("Tom"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_operator_arity() {
        assert!(Operator::Eq.accepts(2));
        assert!(!Operator::Eq.accepts(3));
        assert!(Operator::Not.accepts(1));
        assert!(!Operator::Not.accepts(2));
        assert!(Operator::And.accepts(5));
        assert!(!Operator::And.accepts(0));
        assert!(Operator::In.accepts(1));
    }

    #[test]
    fn test_display() {
        let expr = Expr::and(
            Expr::eq(Expr::field("cat", "name", 0), Expr::constant("Bob")),
            Expr::not(Expr::is_null(Expr::param("x"))),
        );
        assert_eq!(expr.to_string(), "((cat.name == \"Bob\") && !?x IS NULL)");

        let expr = Expr::in_list(
            Expr::field("cat", "val", 1),
            vec![Expr::constant(1i64), Expr::constant(2i64)],
        );
        assert_eq!(expr.to_string(), "cat.val IN (1, 2)");
    }

    #[test]
    fn test_referenced_roots() {
        let expr = Expr::and(
            Expr::eq(Expr::field("cat", "name", 0), Expr::field("kitten", "name", 0)),
            Expr::gt(Expr::field("cat", "val", 1), Expr::param("min")),
        );
        assert_eq!(expr.referenced_roots(), vec!["cat", "kitten"]);
        assert!(Expr::constant(1i64).referenced_roots().is_empty());
    }

    #[test]
    fn test_visit_leaves_order() {
        let expr = Expr::add(Expr::constant(1i64), Expr::param("p"));
        let mut leaves = Vec::new();
        expr.visit_leaves(&mut |leaf| leaves.push(leaf.clone()));
        assert_eq!(leaves, vec![Expr::constant(1i64), Expr::param("p")]);
    }
}
