//! Boolean rules as expression trees

use crate::*;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A Boolean expression tree.
///
/// Internal nodes carry a [connective](Connective) or a negation, leaves are
/// variables. The `&`, `|`, `^` and `!` operators are overloaded to build
/// expressions as readable Rust statements; the remaining connectives are
/// available as methods.
///
/// ```
/// use stakit::{Expr, Variable};
///
/// let a = Variable::from(0);
/// let b = Variable::from(1);
/// let c = Variable::from(2);
///
/// let expr = Expr::from(a).equiv(b & !c);
/// assert_eq!(format!("{}", expr), "_0_ = _1_ && !_2_");
/// ```
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    /// A single variable
    Var(Variable),
    /// The negation of a sub-expression
    Not(Box<Expr>),
    /// Two sub-expressions joined by a binary connective
    Bin(Connective, Box<Expr>, Box<Expr>),
}

/// The binary connectives, from loosest to tightest binding.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Connective {
    /// Both sides take the same value
    Equiv,
    /// If the left side holds, so does the right one
    Implies,
    /// If the right side holds, so does the left one
    ImpliedBy,
    /// Exactly one side holds
    Xor,
    /// At least one side holds
    Or,
    /// Both sides hold
    And,
}

impl Connective {
    /// Binding priority, controlling parenthesization when formatting
    pub fn priority(self) -> u8 {
        match self {
            Connective::Equiv => 1,
            Connective::Implies => 2,
            Connective::ImpliedBy => 3,
            Connective::Xor => 4,
            Connective::Or => 5,
            Connective::And => 6,
        }
    }

    /// The operator token in the rule grammar
    pub fn token(self) -> &'static str {
        match self {
            Connective::Equiv => "=",
            Connective::Implies => "=>",
            Connective::ImpliedBy => "<=",
            Connective::Xor => "^^",
            Connective::Or => "||",
            Connective::And => "&&",
        }
    }
}

impl Expr {
    /// Join two expressions with a binary connective
    pub fn bin(op: Connective, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Expr::Bin(op, Box::new(left.into()), Box::new(right.into()))
    }

    /// The implication of `rhs` by this expression
    pub fn implies(self, rhs: impl Into<Expr>) -> Self {
        Expr::bin(Connective::Implies, self, rhs)
    }

    /// The implication of this expression by `rhs`
    pub fn implied_by(self, rhs: impl Into<Expr>) -> Self {
        Expr::bin(Connective::ImpliedBy, self, rhs)
    }

    /// The equivalence of this expression and `rhs`
    pub fn equiv(self, rhs: impl Into<Expr>) -> Self {
        Expr::bin(Connective::Equiv, self, rhs)
    }

    fn fmt_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        space: Option<&VarSpace>,
        parent: u8,
    ) -> fmt::Result {
        match self {
            Expr::Var(var) => match space {
                None => write!(f, "{}", var),
                Some(space) => space.format_variable(f, *var),
            },
            Expr::Not(e) => {
                write!(f, "!")?;
                match e.as_ref() {
                    Expr::Bin(_, _, _) => {
                        write!(f, "(")?;
                        e.fmt_with(f, space, 0)?;
                        write!(f, ")")
                    }
                    _ => e.fmt_with(f, space, u8::MAX),
                }
            }
            Expr::Bin(op, left, right) => {
                let prio = op.priority();
                let parens = prio <= parent;
                if parens {
                    write!(f, "(")?;
                }
                left.fmt_with(f, space, prio - 1)?;
                write!(f, " {} ", op.token())?;
                right.fmt_with(f, space, prio)?;
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Expr::Var(var)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, None, 0)
    }
}

impl NamedFmt for Expr {
    fn fmt_named(&self, f: &mut fmt::Formatter<'_>, space: &VarSpace) -> fmt::Result {
        self.fmt_with(f, Some(space), 0)
    }
}

impl Not for Expr {
    type Output = Expr;
    fn not(self) -> Self::Output {
        match self {
            // double negations are eliminated on the fly
            Expr::Not(e) => *e,
            e => Expr::Not(Box::new(e)),
        }
    }
}

impl Not for Variable {
    type Output = Expr;
    fn not(self) -> Self::Output {
        Expr::Not(Box::new(Expr::Var(self)))
    }
}

impl<T: Into<Expr>> BitAnd<T> for Expr {
    type Output = Expr;
    fn bitand(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::And, self, rhs)
    }
}

impl<T: Into<Expr>> BitAnd<T> for Variable {
    type Output = Expr;
    fn bitand(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::And, Expr::from(self), rhs)
    }
}

impl<T: Into<Expr>> BitOr<T> for Expr {
    type Output = Expr;
    fn bitor(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::Or, self, rhs)
    }
}

impl<T: Into<Expr>> BitOr<T> for Variable {
    type Output = Expr;
    fn bitor(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::Or, Expr::from(self), rhs)
    }
}

impl<T: Into<Expr>> BitXor<T> for Expr {
    type Output = Expr;
    fn bitxor(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::Xor, self, rhs)
    }
}

impl<T: Into<Expr>> BitXor<T> for Variable {
    type Output = Expr;
    fn bitxor(self, rhs: T) -> Self::Output {
        Expr::bin(Connective::Xor, Expr::from(self), rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn construct_and_display() {
        let a = Variable::from(0);
        let b = Variable::from(1);
        let c = Variable::from(2);

        let e = a & (b | !c);
        assert_eq!(format!("{}", e), "_0_ && (_1_ || !_2_)");

        let e = (a & b) | c;
        assert_eq!(format!("{}", e), "_0_ && _1_ || _2_");

        let e = !(a | b);
        assert_eq!(format!("{}", e), "!(_0_ || _1_)");

        let e = Expr::from(a).implies(b ^ c);
        assert_eq!(format!("{}", e), "_0_ => _1_ ^^ _2_");

        let e = Expr::from(a).equiv(Expr::from(b).implied_by(c));
        assert_eq!(format!("{}", e), "_0_ = _1_ <= _2_");
    }

    #[test]
    fn double_negation() {
        let a = Variable::from(0);
        let e = !!Expr::from(a);
        assert_eq!(e, Expr::Var(a));
    }
}
