//! # Complex number stack calculator
//!
//! The computational core of an interactive calculator working over complex
//! numbers. The view layer (window, buttons, key wiring) stays outside this
//! crate: it forwards raw text and symbolic commands to
//! [`engine::CalculatorEngine`] and renders the returned
//! [`engine::RenderState`], holding no calculation state of its own.
//!
//! What the core provides:
//! * complex literals in the form `3+4i`, `-1.5-2j` (`i` and `j` are
//!   interchangeable, an empty imaginary magnitude means coefficient 1)
//! * infix expressions with `+ - * /` and brackets, converted to postfix
//!   with the shunting-yard algorithm and evaluated in a single pass:
//!   `3+5*2` is `13`, `(3+5)*2` is `16`
//! * a Forth-style operand stack with `swap`, `drop`, `dup`, and `over`,
//!   plus square root and sign inversion of the top value
//! * single-letter variables: `>x` saves the composed value into `x` (a
//!   variable is assigned once), `<x` loads it back, `+x`/`-x` add the
//!   composed value to it or subtract
//! * a bounded history of the 12 most recent results, newest first, that
//!   backs the stack display
//!
//! Every failure is a recoverable [`errors::CalcError`]; a failed operation
//! leaves the operand stack, the variables, and the history untouched.
//!
//! ```
//! use rpcalc_lib::engine::{CalculatorEngine, Command};
//!
//! let mut engine = CalculatorEngine::new();
//! engine.submit_input("3+4i");
//! engine.submit_input("1+1i");
//! let state = engine.submit_input("+");
//! assert_eq!(state.stack_snapshot[0], "4.0 + 5.0i");
//!
//! engine.submit_input("3+5*2");
//! let state = engine.submit_command(Command::Equals);
//! assert_eq!(state.display_text, "13.0 + 0.0i");
//! ```

#[macro_use]
extern crate pest_derive;

pub mod engine;
pub mod errors;
pub mod postfix;
pub mod stack;
pub mod token;
pub mod value;
pub mod vars;
