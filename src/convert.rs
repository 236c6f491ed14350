//! Conversion of expression trees into state vectors

use crate::*;

impl From<&Expr> for StateVector {
    /// Build the vector of all states satisfying the expression.
    ///
    /// The conversion is compositional and threads a polarity flag through
    /// the tree, so the complement of a sub-expression is obtained by
    /// converting it negatively (De Morgan at the connectives, a flipped
    /// literal at the leaves) and never by enumerating states.
    fn from(expr: &Expr) -> Self {
        let mut sv = satisfying(expr, true);
        sv.simplify();
        sv
    }
}

impl From<Expr> for StateVector {
    fn from(expr: Expr) -> Self {
        Self::from(&expr)
    }
}

/// The states satisfying `expr` (or its negation, when `positive` is false)
fn satisfying(expr: &Expr, positive: bool) -> StateVector {
    match expr {
        Expr::Var(var) => StateVector::from(TObject::pinned(*var, positive)),
        Expr::Not(e) => satisfying(e, !positive),
        Expr::Bin(op, l, r) => match (op, positive) {
            (Connective::And, true) | (Connective::Or, false) => {
                satisfying(l, positive).multiply(&satisfying(r, positive))
            }
            (Connective::Or, true) | (Connective::And, false) => {
                satisfying(l, positive).union(&satisfying(r, positive))
            }
            (Connective::Xor, true) | (Connective::Equiv, false) => satisfying(l, true)
                .multiply(&satisfying(r, false))
                .union(&satisfying(l, false).multiply(&satisfying(r, true))),
            (Connective::Equiv, true) | (Connective::Xor, false) => satisfying(l, true)
                .multiply(&satisfying(r, true))
                .union(&satisfying(l, false).multiply(&satisfying(r, false))),
            (Connective::Implies, true) => satisfying(l, false).union(&satisfying(r, true)),
            (Connective::Implies, false) => satisfying(l, true).multiply(&satisfying(r, false)),
            (Connective::ImpliedBy, true) => satisfying(l, true).union(&satisfying(r, false)),
            (Connective::ImpliedBy, false) => satisfying(l, false).multiply(&satisfying(r, true)),
        },
    }
}
