//! Ternary values and ternary assignments over the declared variables

use crate::*;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The value of a single variable in a ternary assignment.
///
/// `Free` is the "don't-care" value: the variable is unconstrained and the
/// assignment stands for both of its Boolean completions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ternary {
    /// The variable is fixed to false
    False,
    /// The variable is fixed to true
    True,
    /// The variable is unconstrained
    Free,
}

impl Ternary {
    /// Return the Boolean value if the variable is fixed
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Ternary::False => Some(false),
            Ternary::True => Some(true),
            Ternary::Free => None,
        }
    }

    /// Return true unless the value is `Free`
    pub fn is_fixed(self) -> bool {
        !matches!(self, Ternary::Free)
    }
}

impl From<bool> for Ternary {
    fn from(b: bool) -> Self {
        match b {
            true => Ternary::True,
            false => Ternary::False,
        }
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ternary::False => write!(f, "0"),
            Ternary::True => write!(f, "1"),
            Ternary::Free => write!(f, "-"),
        }
    }
}

/// A ternary assignment over all declared variables.
///
/// It is represented as a pair of [VarSet]s for the variables fixed to true
/// and to false; all other variables are implicitly free. The assignment
/// stands for the set of Boolean states obtained by expanding every free
/// variable to both values: the object with no fixed variable covers the
/// whole state space, an object fixing every variable covers a single state.
///
/// In a well-formed object the two sets are disjoint. The only operation
/// which can run into a conflicting position is [multiplication](Self::multiply),
/// and it reports the conflict by returning `None` (the empty intersection).
///
/// A TObject can be parsed from a string where the position of a character
/// selects the variable UID and the character its value: `-` for free,
/// `0` for false, `1` for true. Spaces and tabs are ignored, so
/// `"1-0-"` and `"1 - 0 -"` are equivalent.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct TObject {
    pub(crate) positive: VarSet,
    pub(crate) negative: VarSet,
}

impl TObject {
    /// Create an assignment with every variable free
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assignment fixing a single variable
    pub fn pinned(var: Variable, value: bool) -> Self {
        let mut t = Self::default();
        t.set(var, value);
        t
    }

    /// Fix a variable to a specific value.
    ///
    /// An existing constraint on the same variable is replaced.
    pub fn set(&mut self, var: Variable, value: bool) {
        if value {
            self.negative.remove(var);
            self.positive.insert(var);
        } else {
            self.positive.remove(var);
            self.negative.insert(var);
        }
    }

    /// Remove any constraint on the given variable
    pub fn free(&mut self, var: Variable) {
        self.positive.remove(var);
        self.negative.remove(var);
    }

    /// Read the value of a single variable
    pub fn value(&self, var: Variable) -> Ternary {
        if self.positive.contains(var) {
            Ternary::True
        } else if self.negative.contains(var) {
            Ternary::False
        } else {
            Ternary::Free
        }
    }

    /// Check if all variables are free in this assignment
    pub fn is_free(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    /// The set of fixed variables
    pub fn defined(&self) -> VarSet {
        let mut d = self.positive.clone();
        d.union_with(&self.negative);
        d
    }

    /// Test if every state of `other` is also a state of `self`.
    ///
    /// This holds exactly when every fixed variable of `self` is fixed to
    /// the same value in `other`.
    pub fn covers(&self, other: &Self) -> bool {
        self.positive.is_subset(&other.positive) && self.negative.is_subset(&other.negative)
    }

    /// Find the unique position at which two assignments with the same
    /// fixed variables take opposite values.
    ///
    /// Such a pair can be merged by freeing the returned variable; any other
    /// relation (different fixed sets, equal values, several differences)
    /// yields `None`.
    pub fn adjacent(&self, other: &Self) -> Option<Variable> {
        let mut pos_diff = self.positive.clone();
        pos_diff.symmetric_difference_with(&other.positive);
        if pos_diff.len() != 1 {
            return None;
        }
        let mut neg_diff = self.negative.clone();
        neg_diff.symmetric_difference_with(&other.negative);
        if pos_diff != neg_diff {
            return None;
        }
        pos_diff.iter().next()
    }

    /// Merge two adjacent assignments into one freeing the differing variable
    pub fn reduce(&self, other: &Self) -> Option<Self> {
        let var = self.adjacent(other)?;
        let mut merged = self.clone();
        merged.free(var);
        Some(merged)
    }

    /// Conjunction of two assignments.
    ///
    /// Each position combines pairwise: a free value takes the other side's
    /// value, equal fixed values are kept, and opposite fixed values make
    /// the whole product empty (`None`).
    pub fn multiply(&self, other: &Self) -> Option<Self> {
        if !self.positive.is_disjoint(&other.negative) || !self.negative.is_disjoint(&other.positive)
        {
            return None;
        }
        let mut positive = self.positive.clone();
        positive.union_with(&other.positive);
        let mut negative = self.negative.clone();
        negative.union_with(&other.negative);
        Some(Self { positive, negative })
    }

    /// Iterate over the fixed variables and their values
    pub fn iter_fixed(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.positive
            .iter()
            .map(|v| (v, true))
            .chain(self.negative.iter().map(|v| (v, false)))
    }
}

impl Hash for TObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.positive.to_uids().hash(state);
        self.negative.to_uids().hash(state);
    }
}

impl FromStr for TObject {
    type Err = StakitError;

    fn from_str(descr: &str) -> Result<TObject, StakitError> {
        let mut t = TObject::default();
        let mut uid = 0;
        for c in descr.chars() {
            match c {
                ' ' | '\t' => (),
                '-' => uid += 1,
                '0' => {
                    t.negative.insert(Variable(uid));
                    uid += 1;
                }
                '1' => {
                    t.positive.insert(Variable(uid));
                    uid += 1;
                }
                _ => return Err(StakitError::ParseError(descr.to_string())),
            };
        }
        Ok(t)
    }
}

impl fmt::Display for TObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = vec![];
        for (v, b) in self.iter_fixed() {
            if result.len() <= v.uid() {
                result.resize(v.uid() + 1, '-');
            }
            result[v.uid()] = if b { '1' } else { '0' };
        }
        let s: String = result.iter().collect();
        write!(f, "{}", &s)
    }
}

impl NamedFmt for TObject {
    fn fmt_named(&self, f: &mut fmt::Formatter<'_>, space: &VarSpace) -> fmt::Result {
        let mut first = true;
        for var in space.variables() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}", self.value(var))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::str::FromStr;

    #[test]
    fn construct_and_display() -> Result<(), StakitError> {
        let t = TObject::from_str("-0--01-11--0-1")?;
        assert_eq!(format!("{}", t), "-0--01-11--0-1");

        let mut t = TObject::default();
        t.set(Variable(1), true);
        t.set(Variable(3), false);
        assert_eq!(format!("{}", t), "-1-0");
        assert_eq!(t.value(Variable(1)), Ternary::True);
        assert_eq!(t.value(Variable(3)), Ternary::False);
        assert_eq!(t.value(Variable(0)), Ternary::Free);

        t.set(Variable(1), false);
        assert_eq!(t.value(Variable(1)), Ternary::False);
        t.free(Variable(1));
        assert!(t.value(Variable(1)) == Ternary::Free);

        Ok(())
    }

    #[test]
    fn covering() -> Result<(), StakitError> {
        let general = TObject::from_str("1-0")?;
        let specific = TObject::from_str("110")?;

        assert!(general.covers(&specific));
        assert!(!specific.covers(&general));
        assert!(general.covers(&general));
        assert!(TObject::default().covers(&specific));

        let sideways = TObject::from_str("10-")?;
        assert!(!general.covers(&sideways));
        assert!(!sideways.covers(&general));

        Ok(())
    }

    #[test]
    fn adjacency() -> Result<(), StakitError> {
        let a = TObject::from_str("10-1")?;
        let b = TObject::from_str("11-1")?;
        assert_eq!(a.adjacent(&b), Some(Variable(1)));
        assert_eq!(format!("{}", a.reduce(&b).unwrap()), "1--1");

        // equal objects are not adjacent
        assert_eq!(a.adjacent(&a), None);

        // two differences
        let c = TObject::from_str("01-1")?;
        assert_eq!(a.adjacent(&c), None);

        // different fixed sets
        let d = TObject::from_str("1--1")?;
        assert_eq!(a.adjacent(&d), None);

        Ok(())
    }

    #[test]
    fn products() -> Result<(), StakitError> {
        let a = TObject::from_str("1-0")?;
        let b = TObject::from_str("-10")?;
        let ab = a.multiply(&b).unwrap();
        assert_eq!(format!("{}", ab), "110");

        // conflicting position
        let c = TObject::from_str("0--")?;
        assert!(a.multiply(&c).is_none());

        // the free object is the identity
        assert_eq!(a.multiply(&TObject::default()), Some(a.clone()));

        Ok(())
    }
}
