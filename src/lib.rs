//! Define Boolean knowledge bases over ternary state vectors and query them.
//!
//! A knowledge base over a fixed set of [variables](Variable) is represented
//! as a collection of [state vectors](StateVector): sets of
//! [ternary assignments](TObject) where each variable is true, false or
//! free ("don't care"). A state vector covers the union of the Boolean
//! states of its members, so it encodes a constraint in disjunctive form.
//! Two operations drive everything else: *multiplication* intersects the
//! state sets of two vectors, and *simplification* reduces a vector to a
//! compact canonical form by removing covered members and merging adjacent
//! ones.
//!
//! ```
//! use stakit::{StateVector, TObject};
//! # use stakit::StakitError;
//! # fn main() -> Result<(), StakitError> {
//!
//! // assignments are written positionally: 1, 0 or - per variable
//! let general: TObject = "1--0".parse()?;
//! let specific: TObject = "110 0".parse()?;
//! assert!(general.covers(&specific));
//!
//! // adjacent members merge during simplification
//! let mut vector: StateVector = "100 ; 101".parse()?;
//! vector.simplify();
//! let reduced: StateVector = "10".parse()?;
//! assert_eq!(vector, reduced);
//! # Ok(())
//! # }
//! ```
//!
//! # Rules and conversion
//!
//! Rules are Boolean [expressions](Expr) over named variables, parsed from
//! strings (`=`, `=>`, `<=`, `^^`, `||`, `&&`, `!` from loosest to tightest
//! binding) or built with the overloaded operators. An expression converts
//! into the state vector of its satisfying assignments; the complement
//! needed by the richer connectives is computed structurally through the
//! tree, never by enumerating states.
//!
//! ```
//! use stakit::{StateVector, VarSpace};
//! # use stakit::StakitError;
//! # fn main() -> Result<(), StakitError> {
//!
//! let space = VarSpace::with_variables(["a", "b"])?;
//! let expr = space.parse_expression("a ^^ b")?;
//!
//! let states = StateVector::from(&expr);
//! let expected: StateVector = "10 ; 01".parse()?;
//! assert_eq!(states, expected);
//! # Ok(())
//! # }
//! ```
//!
//! # Compilation and inference
//!
//! The [Engine] accumulates rules and evidence and compiles them into the
//! *valid set*, the vector of all states the knowledge base permits. The
//! pairwise multiplication order is chosen heuristically (small vectors
//! first, then highest support overlap) to keep intermediate products
//! small. Queries read consolidated values from the valid set and
//! [predictions](Engine::predict) restrict it with fresh evidence; an empty
//! result is a contradiction.
//!
//! ```
//! use stakit::{Engine, Ternary};
//! # use stakit::StakitError;
//! # fn main() -> Result<(), StakitError> {
//!
//! let mut engine = Engine::new(["rain", "umbrella", "wet"])?;
//! engine.add_rule("rain => umbrella")?;
//! engine.add_rule("rain => wet")?;
//! engine.compile();
//!
//! let result = engine.predict([("rain", true)])?;
//! assert_eq!(result.get_value("umbrella")?, Ternary::True);
//!
//! let result = engine.predict([("rain", true), ("umbrella", false)])?;
//! assert!(result.is_contradiction());
//! # Ok(())
//! # }
//! ```

mod convert;
mod engine;
mod error;
mod expr;
mod parse;
mod schedule;
mod space;
mod states;
mod ternary;
mod variable;

#[macro_use]
extern crate pest_derive;

// Export public structures and API
pub use engine::{Engine, InferenceResult, Rule};
pub use error::StakitError;
pub use expr::{Connective, Expr};
pub use schedule::{combine, CompileOptions};
pub use space::{NamedFmt, VarSpace};
pub use states::{Expansions, StateVector};
pub use ternary::{TObject, Ternary};
pub use variable::{VarSet, Variable};
