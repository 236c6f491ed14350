//! Parser for rule strings

use crate::{Connective, Expr, StakitError, VarSpace};
use pest::{iterators, Parser};

#[derive(Parser)]
#[grammar_inline = r####"
input  = _{ SOI ~ expr ~ EOI }
expr   = _{ equiv }
equiv  =  { imply ~ ( "=" ~ !">" ~ imply )* }
imply  =  { rimply ~ ( "=>" ~ rimply )* }
rimply =  { xor ~ ( "<=" ~ xor )* }
xor    =  { disj ~ ( "^^" ~ disj )* }
disj   =  { conj ~ ( "||" ~ conj )* }
conj   =  { term ~ ( "&&" ~ term )* }
term   = _{ neg | grp }
neg    =  { "!" ~ term }
grp    = _{ lit | "(" ~ expr ~ ")" }
lit    = @{ (ASCII_ALPHA | "_") ~ (ASCII_ALPHANUMERIC | "_")* }

WHITESPACE = _{ " " | "\t" }
"####]
struct RuleParser;

/// Parse a rule string, resolving variable names through the given space.
///
/// The connectives bind from loosest to tightest: `=`, `=>`, `<=`, `^^`,
/// `||`, `&&`, with `!` tightest and parentheses grouping. Chains at the
/// same level fold to the left.
pub(crate) fn parse_rule(space: &VarSpace, s: &str) -> Result<Expr, StakitError> {
    let parsed = RuleParser::parse(Rule::input, s);
    match parsed {
        Err(_) => Err(StakitError::ParseError(s.to_string())),
        Ok(mut pairs) => load_expr(space, pairs.next().unwrap()),
    }
}

fn load_expr(space: &VarSpace, pair: iterators::Pair<Rule>) -> Result<Expr, StakitError> {
    let rule = pair.as_rule();
    match rule {
        Rule::lit => space.get_or_err(pair.as_str()).map(Expr::from),
        Rule::neg => {
            let inner = pair.into_inner().next().unwrap();
            Ok(!load_expr(space, inner)?)
        }
        Rule::equiv | Rule::imply | Rule::rimply | Rule::xor | Rule::disj | Rule::conj => {
            let op = match rule {
                Rule::equiv => Connective::Equiv,
                Rule::imply => Connective::Implies,
                Rule::rimply => Connective::ImpliedBy,
                Rule::xor => Connective::Xor,
                Rule::disj => Connective::Or,
                _ => Connective::And,
            };
            let mut inner = pair.into_inner();
            let mut expr = load_expr(space, inner.next().unwrap())?;
            for next in inner {
                expr = Expr::bin(op, expr, load_expr(space, next)?);
            }
            Ok(expr)
        }
        _ => Err(StakitError::ParseError(pair.as_str().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::parse_rule;
    use crate::*;

    fn space() -> VarSpace {
        VarSpace::with_variables(["a", "b", "c", "d"]).unwrap()
    }

    #[test]
    fn atoms_and_negation() -> Result<(), StakitError> {
        let vs = space();
        let a = vs.get_or_err("a")?;
        let b = vs.get_or_err("b")?;

        assert_eq!(parse_rule(&vs, "a")?, Expr::Var(a));
        assert_eq!(parse_rule(&vs, "!a")?, !a);
        assert_eq!(parse_rule(&vs, "!!a")?, Expr::Var(a));
        assert_eq!(parse_rule(&vs, "!(a && b)")?, !(a & b));
        Ok(())
    }

    #[test]
    fn precedence() -> Result<(), StakitError> {
        let vs = space();
        let a = vs.get_or_err("a")?;
        let b = vs.get_or_err("b")?;
        let c = vs.get_or_err("c")?;
        let d = vs.get_or_err("d")?;

        // && binds tighter than ||, which binds tighter than ^^
        assert_eq!(parse_rule(&vs, "a || b && c")?, a | (b & c));
        assert_eq!(parse_rule(&vs, "a ^^ b || c")?, a ^ (b | c));

        // = is the loosest and => looser than <=
        assert_eq!(
            parse_rule(&vs, "a = b => c")?,
            Expr::from(a).equiv(Expr::from(b).implies(c))
        );
        assert_eq!(
            parse_rule(&vs, "a => b <= c")?,
            Expr::from(a).implies(Expr::from(b).implied_by(c))
        );

        // parentheses override
        assert_eq!(parse_rule(&vs, "(a || b) && c")?, (a | b) & c);

        // chains fold to the left
        assert_eq!(parse_rule(&vs, "a && b && c && d")?, ((a & b) & c) & d);
        Ok(())
    }

    #[test]
    fn whitespace_is_insignificant() -> Result<(), StakitError> {
        let vs = space();
        assert_eq!(parse_rule(&vs, "a&&b")?, parse_rule(&vs, "  a  &&\tb ")?);
        Ok(())
    }

    #[test]
    fn rejects_malformed_input() {
        let vs = space();
        for bad in ["", "a &&", "&& a", "a b", "(a", "a)", "a = = b", "a ^ b"] {
            assert!(
                matches!(parse_rule(&vs, bad), Err(StakitError::ParseError(_))),
                "expected a parse error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn rejects_unknown_variables() {
        let vs = space();
        assert!(matches!(
            parse_rule(&vs, "a && nope"),
            Err(StakitError::UnknownVariable(name)) if name == "nope"
        ));
    }
}
