//! Collections of named variables

use crate::*;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

static RE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());

/// The ordered collection of named variables declared for an engine.
///
/// The collection is fixed at construction: each name receives the
/// [Variable] UID matching its position in the declaration order, and both
/// directions of the association can be queried afterwards. Names must be
/// valid identifiers (a letter or underscore followed by letters, digits or
/// underscores) and must be pairwise distinct.
///
/// ```
/// use stakit::VarSpace;
/// # use stakit::StakitError;
/// # fn main() -> Result<(), StakitError> {
///
/// let space = VarSpace::with_variables(["rain", "umbrella"])?;
/// let rain = space.get_or_err("rain")?;
///
/// assert_eq!(rain.uid(), 0);
/// assert_eq!(space.name(rain), Some("rain"));
///
/// // parse a rule over the declared names
/// let expr = space.parse_expression("rain => umbrella")?;
/// assert_eq!(format!("{}", space.named(&expr)), "rain => umbrella");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, Debug)]
pub struct VarSpace {
    names: Vec<String>,
    index: HashMap<String, Variable>,
}

/// Render a value with the variable names of a collection.
///
/// Implemented by expressions, ternary objects and state vectors; obtained
/// through [VarSpace::named].
pub trait NamedFmt {
    fn fmt_named(&self, f: &mut fmt::Formatter<'_>, space: &VarSpace) -> fmt::Result;
}

/// Associate a value with a variable collection for display
struct Named<'a> {
    space: &'a VarSpace,
    rule: &'a dyn NamedFmt,
}

impl VarSpace {
    /// Build a collection from an ordered list of names.
    ///
    /// Fails with [InvalidName](StakitError::InvalidName) on a malformed name
    /// and with [DuplicateVariable](StakitError::DuplicateVariable) when the
    /// same name appears twice.
    pub fn with_variables<I, S>(names: I) -> Result<Self, StakitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut space = Self::default();
        for name in names {
            let name = name.into();
            if !RE_NAME.is_match(&name) {
                return Err(StakitError::InvalidName(name));
            }
            if space.index.contains_key(&name) {
                return Err(StakitError::DuplicateVariable(name));
            }
            let var = Variable(space.names.len());
            space.index.insert(name.clone(), var);
            space.names.push(name);
        }
        Ok(space)
    }

    /// The number of declared variables
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Return whether no variable is declared
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if a name is part of the collection
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Search a variable with the given name
    pub fn get(&self, name: &str) -> Option<Variable> {
        self.index.get(name).copied()
    }

    /// Search a variable with the given name, failing on foreign names
    pub fn get_or_err(&self, name: &str) -> Result<Variable, StakitError> {
        self.get(name)
            .ok_or_else(|| StakitError::UnknownVariable(name.to_string()))
    }

    /// The name associated with a variable of this collection
    pub fn name(&self, var: Variable) -> Option<&str> {
        self.names.get(var.uid()).map(String::as_str)
    }

    /// Iterate over the variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        (0..self.names.len()).map(Variable)
    }

    /// Iterate over the names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Parse a rule string over the declared names
    pub fn parse_expression(&self, s: &str) -> Result<Expr, StakitError> {
        parse::parse_rule(self, s)
    }

    /// Apply the names of this collection to a value for display.
    ///
    /// Values carrying variables outside the collection fall back to the
    /// generic UID-based rendering for those variables.
    pub fn named<'a>(&'a self, rule: &'a impl NamedFmt) -> impl fmt::Display + 'a {
        Named { space: self, rule }
    }

    /// Insert the name of a variable during a display operation
    pub fn format_variable(&self, f: &mut fmt::Formatter<'_>, var: Variable) -> fmt::Result {
        match self.name(var) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", var),
        }
    }
}

impl fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rule.fmt_named(f, self.space)
    }
}
