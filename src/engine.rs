//! The inference engine: variables, rules, evidence, compilation, queries

use crate::*;
use std::collections::HashMap;
use std::fmt;

/// A rule accepted by the engine: its source text, its parsed form and the
/// vector of states satisfying it.
#[derive(Clone, Debug)]
pub struct Rule {
    text: String,
    expr: Expr,
    states: StateVector,
}

impl Rule {
    /// The rule as it was written
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed expression
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The satisfying set of the rule
    pub fn states(&self) -> &StateVector {
        &self.states
    }
}

/// A knowledge base over a fixed set of named variables.
///
/// Rules and evidence accumulate as state vectors; [compile](Self::compile)
/// multiplies them into the *valid set*, the vector of all states permitted
/// by the whole knowledge base. Queries then read consolidated values from
/// the valid set, and [predict](Self::predict) restricts it with additional
/// evidence.
///
/// ```
/// use stakit::{Engine, Ternary};
/// # use stakit::StakitError;
/// # fn main() -> Result<(), StakitError> {
///
/// let mut engine = Engine::new(["x1", "x2", "x3"])?;
/// engine.add_rule("x1 => x2")?;
/// engine.add_rule("x2 => x3")?;
/// engine.compile();
///
/// let result = engine.predict([("x1", true)])?;
/// assert_eq!(result.get_value("x3")?, Ternary::True);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Engine {
    space: VarSpace,
    name: Option<String>,
    rules: Vec<Rule>,
    extra: Vec<(&'static str, StateVector)>,
    valid: Option<StateVector>,
    options: CompileOptions,
}

impl Engine {
    /// Create an engine over an ordered list of variable names.
    ///
    /// Fails with [InvalidName](StakitError::InvalidName) or
    /// [DuplicateVariable](StakitError::DuplicateVariable); the declaration
    /// order defines the variable UIDs.
    pub fn new<I, S>(variables: I) -> Result<Self, StakitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            space: VarSpace::with_variables(variables)?,
            ..Self::default()
        })
    }

    /// Set a display name for the engine
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Emit scheduler progress records at `info` level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    /// Adjust the predator threshold of the scheduler
    pub fn max_predator_size(mut self, size: usize) -> Self {
        self.options.max_predator_size = size;
        self
    }

    /// Adjust the preferred intermediate size cap of the scheduler
    pub fn max_cluster_size(mut self, size: usize) -> Self {
        self.options.max_cluster_size = size;
        self
    }

    /// The declared variable collection
    pub fn space(&self) -> &VarSpace {
        &self.space
    }

    /// The accepted rules, in insertion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Parse a rule string and store its satisfying set.
    ///
    /// Any compiled valid set is invalidated. On error the engine is left
    /// unchanged.
    pub fn add_rule(&mut self, text: &str) -> Result<(), StakitError> {
        let expr = self.space.parse_expression(text)?;
        let states = StateVector::from(&expr);
        self.rules.push(Rule {
            text: text.to_string(),
            expr,
            states,
        });
        self.valid = None;
        Ok(())
    }

    /// Pin a set of variables to known values.
    ///
    /// The bindings become a single-member state vector multiplied into the
    /// knowledge base at the next compilation. A name outside the declared
    /// variables or a variable bound to both values in the same call is an
    /// error, and the engine is left unchanged.
    pub fn add_evidence<I, S>(&mut self, bindings: I) -> Result<(), StakitError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let states = self.evidence_vector(bindings)?;
        self.extra.push(("evidence", states));
        self.valid = None;
        Ok(())
    }

    /// Inject a pre-built state vector as an additional constraint
    pub fn add_state_vector(&mut self, states: StateVector) {
        self.extra.push(("state vector", states));
        self.valid = None;
    }

    /// Multiply all rules and evidence into the valid set.
    ///
    /// The product is recomputed from scratch, so calling it again is
    /// idempotent. An empty product is kept as-is: the contradiction is
    /// latched and observable through [is_contradiction](Self::is_contradiction).
    pub fn compile(&mut self) {
        let vectors = self.constraint_vectors(None);
        self.valid = Some(schedule::combine(vectors, &self.options));
    }

    /// Return whether a valid set is available
    pub fn is_compiled(&self) -> bool {
        self.valid.is_some()
    }

    /// The compiled valid set, if any
    pub fn valid_set(&self) -> Option<&StateVector> {
        self.valid.as_ref()
    }

    /// Return whether compilation proved the knowledge base unsatisfiable
    pub fn is_contradiction(&self) -> bool {
        matches!(&self.valid, Some(v) if v.is_empty())
    }

    /// Restrict the knowledge base with additional evidence.
    ///
    /// On a compiled engine this is a single multiplication against the
    /// valid set. On an uncompiled engine the full product is computed on
    /// the fly and nothing is persisted; both paths yield the same result.
    pub fn predict<I, S>(&self, bindings: I) -> Result<InferenceResult<'_>, StakitError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let evidence = self.evidence_vector(bindings)?;
        let states = match &self.valid {
            Some(valid) => valid.multiply(&evidence),
            None => schedule::combine(self.constraint_vectors(Some(evidence)), &self.options),
        };
        Ok(InferenceResult {
            space: &self.space,
            states,
        })
    }

    /// The consolidated value of a variable in the compiled valid set.
    ///
    /// Fails with [NotCompiled](StakitError::NotCompiled) before
    /// [compile](Self::compile) and with
    /// [UnknownVariable](StakitError::UnknownVariable) on foreign names.
    pub fn get_variable_value(&self, name: &str) -> Result<Ternary, StakitError> {
        let var = self.space.get_or_err(name)?;
        let valid = self.valid.as_ref().ok_or(StakitError::NotCompiled)?;
        Ok(valid.get_value(var))
    }

    /// Enumerate the concrete states of the compiled valid set as
    /// name-to-value mappings.
    ///
    /// The sequence is finite and each call restarts it from the beginning.
    pub fn valid_set_iter_dicts(
        &self,
    ) -> Result<impl Iterator<Item = HashMap<String, bool>> + '_, StakitError> {
        let valid = self.valid.as_ref().ok_or(StakitError::NotCompiled)?;
        Ok(iter_dicts(&self.space, valid))
    }

    /// Build the evidence vector for a set of bindings
    fn evidence_vector<I, S>(&self, bindings: I) -> Result<StateVector, StakitError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut t = TObject::default();
        for (name, value) in bindings {
            let var = self.space.get_or_err(name.as_ref())?;
            match t.value(var).as_bool() {
                None => t.set(var, value),
                Some(prev) if prev != value => {
                    return Err(StakitError::ConflictingEvidence(name.as_ref().to_string()))
                }
                Some(_) => (),
            }
        }
        Ok(StateVector::from(t))
    }

    /// Clone all stored constraints, optionally appending one more vector
    fn constraint_vectors(&self, extra: Option<StateVector>) -> Vec<StateVector> {
        self.rules
            .iter()
            .map(|r| r.states.clone())
            .chain(self.extra.iter().map(|(_, sv)| sv.clone()))
            .chain(extra)
            .collect()
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => writeln!(f, "====== Engine: {} ======", name)?,
            None => writeln!(f, "====== Engine ======")?,
        }
        write!(f, "Variables:")?;
        for name in self.space.names() {
            write!(f, " {}", name)?;
        }
        writeln!(f)?;
        let mut count = 0;
        for rule in &self.rules {
            count += 1;
            writeln!(f, "{}. Rule: {}", count, self.space.named(&rule.expr))?;
            writeln!(f, "{}", self.space.named(&rule.states))?;
        }
        for (label, states) in &self.extra {
            count += 1;
            writeln!(f, "{}. {}:", count, label)?;
            writeln!(f, "{}", self.space.named(states))?;
        }
        match &self.valid {
            None => writeln!(f, "Not compiled"),
            Some(valid) => writeln!(f, "Valid set:\n{}", self.space.named(valid)),
        }
    }
}

/// The outcome of a prediction: the states compatible with the knowledge
/// base and the supplied evidence.
///
/// An empty result means the evidence contradicts the knowledge base.
pub struct InferenceResult<'a> {
    space: &'a VarSpace,
    states: StateVector,
}

impl InferenceResult<'_> {
    /// The underlying state vector
    pub fn state_vector(&self) -> &StateVector {
        &self.states
    }

    /// Return whether the evidence contradicts the knowledge base
    pub fn is_contradiction(&self) -> bool {
        self.states.is_empty()
    }

    /// The consolidated value of a variable across the compatible states
    pub fn get_value(&self, name: &str) -> Result<Ternary, StakitError> {
        Ok(self.states.get_value(self.space.get_or_err(name)?))
    }

    /// Enumerate the compatible states as name-to-value mappings
    pub fn iter_dicts(&self) -> impl Iterator<Item = HashMap<String, bool>> + '_ {
        iter_dicts(self.space, &self.states)
    }
}

impl fmt::Display for InferenceResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.space.named(&self.states))
    }
}

fn iter_dicts<'a>(
    space: &'a VarSpace,
    states: &'a StateVector,
) -> impl Iterator<Item = HashMap<String, bool>> + 'a {
    states.expansions(space.len()).map(move |values| {
        space
            .names()
            .map(str::to_string)
            .zip(values.into_iter())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn sv(s: &str) -> StateVector {
        StateVector::from_str(s).unwrap()
    }

    #[test]
    fn construction() -> Result<(), StakitError> {
        let engine = Engine::new(["x1", "x2", "x3"])?.named("test engine");
        assert_eq!(engine.space().len(), 3);
        assert!(engine.rules().is_empty());
        assert!(!engine.is_compiled());

        assert!(matches!(
            Engine::new(["a", "1b"]),
            Err(StakitError::InvalidName(_))
        ));
        assert!(matches!(
            Engine::new(["a", "b", "a"]),
            Err(StakitError::DuplicateVariable(_))
        ));
        Ok(())
    }

    #[test]
    fn adding_rules() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_rule("x1 || x2")?;
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(engine.rules()[0].text(), "x1 || x2");
        assert_eq!(engine.rules()[0].states(), &sv("1 ; -1"));
        {
            let named = engine.space().named(engine.rules()[0].expr());
            assert_eq!(format!("{}", named), "x1 || x2");
        }

        engine.add_rule("(x1 && x2) => x3")?;
        assert_eq!(engine.rules()[1].states(), &sv("0 ; -0 ; --1"));

        // failed additions leave the engine unchanged
        assert!(engine.add_rule("x1 &&").is_err());
        assert!(matches!(
            engine.add_rule("x1 && x9"),
            Err(StakitError::UnknownVariable(_))
        ));
        assert_eq!(engine.rules().len(), 2);
        Ok(())
    }

    #[test]
    fn adding_evidence() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_evidence([("x1", true), ("x3", false)])?;

        assert!(matches!(
            engine.add_evidence([("x9", true)]),
            Err(StakitError::UnknownVariable(_))
        ));
        assert!(matches!(
            engine.add_evidence([("x2", true), ("x2", false)]),
            Err(StakitError::ConflictingEvidence(_))
        ));
        // binding the same value twice is redundant but consistent
        engine.add_evidence([("x2", true), ("x2", true)])?;

        engine.compile();
        assert_eq!(engine.valid_set(), Some(&sv("110")));
        Ok(())
    }

    #[test]
    fn compile_lifecycle() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        assert!(!engine.is_compiled());
        assert!(matches!(
            engine.get_variable_value("x1"),
            Err(StakitError::NotCompiled)
        ));

        engine.add_rule("x1 => x2")?;
        engine.compile();
        assert!(engine.is_compiled());
        assert_eq!(engine.valid_set(), Some(&sv("0 ; -1")));

        // a new rule invalidates the compiled set
        engine.add_rule("x2 => x3")?;
        assert!(!engine.is_compiled());

        engine.compile();
        assert_eq!(engine.valid_set(), Some(&sv("00 ; 0-1 ; -11")));

        // compiling again recomputes the same set
        engine.compile();
        assert_eq!(engine.valid_set(), Some(&sv("00 ; 0-1 ; -11")));

        let result = engine.predict([("x1", true)])?;
        assert_eq!(result.get_value("x3")?, Ternary::True);
        Ok(())
    }

    #[test]
    fn workflow_queries() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_rule("x1 => x2")?;
        engine.add_rule("x2 => x3")?;
        engine.compile();

        // without evidence every variable stays undetermined
        assert_eq!(engine.get_variable_value("x1")?, Ternary::Free);
        assert_eq!(engine.get_variable_value("x2")?, Ternary::Free);
        assert_eq!(engine.get_variable_value("x3")?, Ternary::Free);

        let result = engine.predict([("x1", true)])?;
        assert_eq!(result.state_vector(), &sv("111"));
        assert_eq!(result.get_value("x3")?, Ternary::True);

        let result = engine.predict([("x3", false)])?;
        assert_eq!(result.get_value("x1")?, Ternary::False);

        // incompatible evidence is reported as a contradiction
        let result = engine.predict([("x2", true), ("x3", false)])?;
        assert!(result.is_contradiction());
        Ok(())
    }

    #[test]
    fn predict_agrees_before_and_after_compilation() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_rule("x1 => x2")?;
        engine.add_rule("x2 => x3")?;

        let before = engine.predict([("x1", true)])?.state_vector().clone();
        assert!(!engine.is_compiled());

        engine.compile();
        let after = engine.predict([("x1", true)])?.state_vector().clone();

        assert_eq!(before, sv("111"));
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn injected_vectors() -> Result<(), StakitError> {
        let mut reference = Engine::new(["x1", "x2", "x3"])?;
        reference.add_rule("x1 => x2")?;
        reference.compile();

        // a trivial vector does not change the product
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_rule("x1 => x2")?;
        engine.add_state_vector(StateVector::top());
        engine.compile();
        assert_eq!(engine.valid_set(), reference.valid_set());

        // an empty vector makes it a contradiction
        let mut engine = Engine::new(["x1", "x2", "x3"])?;
        engine.add_rule("x1 => x2")?;
        engine.add_state_vector(StateVector::new());
        engine.compile();
        assert!(engine.is_contradiction());
        Ok(())
    }

    // knowledge base shared by the end-to-end scenarios below:
    // x1 is equivalent to (x2 && x3), and x2 or (x3 && x4) must hold
    fn scenario_engine() -> Engine {
        let mut engine = Engine::new(["x1", "x2", "x3", "x4"]).unwrap();
        engine.add_rule("x1 = (x2 && x3)").unwrap();
        engine.add_rule("x2 <= (!x3 || !x4)").unwrap();
        engine.add_evidence([("x4", false)]).unwrap();
        engine.compile();
        engine
    }

    #[test]
    fn scenario_compiled_values() -> Result<(), StakitError> {
        let engine = scenario_engine();
        assert!(!engine.is_contradiction());
        assert_eq!(engine.valid_set(), Some(&sv("1110 ; 0100")));

        assert_eq!(engine.get_variable_value("x1")?, Ternary::Free);
        // x4 is pinned false, so the reverse implication forces x2
        assert_eq!(engine.get_variable_value("x2")?, Ternary::True);
        assert_eq!(engine.get_variable_value("x3")?, Ternary::Free);
        assert_eq!(engine.get_variable_value("x4")?, Ternary::False);
        Ok(())
    }

    #[test]
    fn scenario_predictions() -> Result<(), StakitError> {
        let engine = scenario_engine();

        let result = engine.predict([("x1", false), ("x2", true)])?;
        assert!(!result.is_contradiction());
        assert_eq!(result.get_value("x3")?, Ternary::False);

        let result = engine.predict([("x1", true)])?;
        assert!(!result.is_contradiction());
        assert_eq!(result.get_value("x3")?, Ternary::True);

        // x3 cannot hold when x1 does not: x2 is forced, hence x1 = x3
        let result = engine.predict([("x1", false), ("x3", true)])?;
        assert!(result.is_contradiction());
        Ok(())
    }

    #[test]
    fn scenario_contradiction() -> Result<(), StakitError> {
        let mut engine = Engine::new(["a", "b"])?;
        engine.add_rule("a = b")?;
        engine.add_rule("a = !b")?;
        engine.compile();

        assert!(engine.is_contradiction());
        assert_eq!(engine.valid_set(), Some(&StateVector::new()));
        assert!(engine.predict([("a", true)])?.is_contradiction());
        Ok(())
    }

    #[test]
    fn scenario_tautology() -> Result<(), StakitError> {
        let mut engine = Engine::new(["a"])?;
        engine.add_rule("a || !a")?;
        engine.compile();

        let valid = engine.valid_set().unwrap();
        assert!(valid.is_trivial());
        assert_eq!(engine.get_variable_value("a")?, Ternary::Free);
        Ok(())
    }

    #[test]
    fn scenario_xor_expansion() -> Result<(), StakitError> {
        let mut engine = Engine::new(["a", "b", "c"])?;
        engine.add_rule("a = (b ^^ c)")?;
        engine.compile();

        let keys = |dict: &std::collections::HashMap<String, bool>| {
            (dict["a"], dict["b"], dict["c"])
        };
        let states: HashSet<_> = engine.valid_set_iter_dicts()?.map(|d| keys(&d)).collect();
        let expected: HashSet<_> = [
            (false, false, false),
            (true, false, true),
            (true, true, false),
            (false, true, true),
        ]
        .into_iter()
        .collect();
        assert_eq!(states, expected);

        // restarting the iteration yields the same sequence
        let first: Vec<_> = engine.valid_set_iter_dicts()?.map(|d| keys(&d)).collect();
        let second: Vec<_> = engine.valid_set_iter_dicts()?.map(|d| keys(&d)).collect();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn display_summary() -> Result<(), StakitError> {
        let mut engine = Engine::new(["x1", "x2", "x3"])?.named("test engine");
        engine.add_rule("x1 => x2")?;
        engine.add_evidence([("x3", true)])?;

        let output = format!("{}", engine);
        assert!(output.contains("====== Engine: test engine ======"));
        assert!(output.contains("Variables: x1 x2 x3"));
        assert!(output.contains("1. Rule: x1 => x2"));
        assert!(output.contains("2. evidence:"));
        assert!(output.contains("- - 1"));
        assert!(output.contains("Not compiled"));

        engine.compile();
        assert!(format!("{}", engine).contains("Valid set:"));
        Ok(())
    }
}
