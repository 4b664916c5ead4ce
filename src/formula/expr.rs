//! Formula AST and its FEEL rendering.
//!
//! Literals keep the exact text they were formatted with so the rendered
//! formula embeds figures the same way plain output cells do (`1276.00`,
//! `504000.00`, `52`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal, stored as its rendered text.
    Literal(String),
    /// Variable resolved by the rule engine (`user.numberOfDependants`).
    Var(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        /// Render with a space either side of the operator.
        spaced: bool,
    },
    /// Explicit parentheses.
    Group(Box<Expr>),
}

impl Expr {
    pub fn lit(text: impl Into<String>) -> Self {
        Expr::Literal(text.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(value.to_string())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn group(inner: Expr) -> Self {
        Expr::Group(Box::new(inner))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            spaced: false,
        }
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Add, lhs, rhs)
    }

    /// `lhs + rhs`, keeping the spaces published tables carry.
    pub fn add_spaced(lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op: BinOp::Add,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            spaced: true,
        }
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Div, lhs, rhs)
    }

    /// Render as engine text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Evaluate with `lookup` resolving variables. `None` when a variable is
    /// unknown or a literal is not numeric.
    #[cfg(test)]
    pub fn eval(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Option<f64> {
        match self {
            Expr::Literal(text) => text.parse::<f64>().ok(),
            Expr::Var(name) => lookup(name),
            Expr::Group(inner) => inner.eval(lookup),
            Expr::Binary { op, lhs, rhs, .. } => {
                let a = lhs.eval(lookup)?;
                let b = rhs.eval(lookup)?;
                Some(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                })
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Literal(_) | Expr::Var(_) | Expr::Group(_) => 3,
        }
    }

    fn is_negative_literal(&self) -> bool {
        matches!(self, Expr::Literal(t) if t.starts_with('-'))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Expr::Literal(text) => out.push_str(text),
            Expr::Var(name) => out.push_str(name),
            Expr::Group(inner) => {
                out.push('(');
                inner.write_to(out);
                out.push(')');
            }
            Expr::Binary { op, lhs, rhs, spaced } => {
                let p = op.precedence();
                write_operand(out, lhs, lhs.precedence() < p);

                if *spaced {
                    out.push(' ');
                    out.push(op.symbol());
                    out.push(' ');
                } else {
                    out.push(op.symbol());
                }

                // Left-associative: `a-(b-c)` and `a/(b*c)` keep their parens.
                let rhs_paren = rhs.precedence() < p
                    || (rhs.precedence() == p && matches!(op, BinOp::Sub | BinOp::Div))
                    || rhs.is_negative_literal();
                write_operand(out, rhs, rhs_paren);
            }
        }
    }
}

fn write_operand(out: &mut String, e: &Expr, paren: bool) {
    if paren {
        out.push('(');
        e.write_to(out);
        out.push(')');
    } else {
        e.write_to(out);
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars(_: &str) -> Option<f64> {
        None
    }

    #[test]
    fn renders_without_redundant_parens() {
        let e = Expr::add(
            Expr::mul(Expr::int(52), Expr::group(Expr::sub(Expr::var("n"), Expr::int(3)))),
            Expr::int(1276),
        );
        assert_eq!(e.render(), "52*(n-3)+1276");
    }

    #[test]
    fn spaced_addition_keeps_its_spaces_when_nested() {
        let step = Expr::add_spaced(
            Expr::mul(Expr::int(52), Expr::group(Expr::sub(Expr::var("n"), Expr::int(3)))),
            Expr::int(1276),
        );
        assert_eq!(step.render(), "52*(n-3) + 1276");

        let e = Expr::sub(Expr::group(step.clone()), Expr::int(1));
        assert_eq!(e.render(), "(52*(n-3) + 1276)-1");
        assert_eq!(e.eval(&|name| (name == "n").then_some(4.0)), Some(1327.0));
    }

    #[test]
    fn inserts_parens_required_by_precedence() {
        let e = Expr::mul(Expr::add(Expr::int(1), Expr::int(2)), Expr::int(3));
        assert_eq!(e.render(), "(1+2)*3");
        assert_eq!(e.eval(&no_vars), Some(9.0));

        let e = Expr::sub(Expr::int(10), Expr::sub(Expr::int(4), Expr::int(1)));
        assert_eq!(e.render(), "10-(4-1)");
        assert_eq!(e.eval(&no_vars), Some(7.0));

        let e = Expr::sub(Expr::int(10), Expr::int(-4));
        assert_eq!(e.render(), "10-(-4)");
        assert_eq!(e.eval(&no_vars), Some(14.0));
    }

    #[test]
    fn evaluates_variables() {
        let e = Expr::div(Expr::mul(Expr::var("x"), Expr::lit("12")), Expr::lit("6.00"));
        assert_eq!(e.render(), "x*12/6.00");
        let v = e.eval(&|name| (name == "x").then_some(2.0));
        assert_eq!(v, Some(4.0));
        assert_eq!(e.eval(&no_vars), None);
    }
}
