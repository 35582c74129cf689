use std::fmt;

/// Any failure the calculator core can report. All of them are recoverable:
/// the engine maps each one to a user-facing message and leaves the operand
/// stack, variables, and history exactly as they were before the failed call.
#[derive(Clone, PartialEq)]
pub enum CalcError {
    /// The string does not match the complex literal grammar
    InvalidComplexLiteral(String),
    /// Tokenization or number parsing failed
    InvalidExpression(String),
    /// An operator token the evaluator has no rule for
    InvalidOperator(char),
    /// A closing bracket without a matching opening one, or vice versa
    UnbalancedParentheses,
    /// A stack or evaluator operation found fewer values than it needs
    InsufficientOperands,
    /// Division by a value with zero modulus
    DividedByZero(String),
    /// Postfix evaluation finished with zero or more than one value left
    MalformedExpression,
    /// Commit requested while nothing is composed
    EmptyExpression,
    /// `save` on a name that is already bound
    VariableAlreadyExists(char),
    /// `load`/`accumulate`/`decrement` on an unbound name
    VariableNotFound(char),
    /// Variable name outside 'a'..='z'
    InvalidVariableName(char),
    /// A variable command was issued with an empty entry buffer
    NoValueForVariable(char),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::InvalidComplexLiteral(s) => write!(f, "Failed to parse '{}' as a complex number", s),
            CalcError::InvalidExpression(s) => write!(f, "Invalid input '{}'", s),
            CalcError::InvalidOperator(c) => write!(f, "Invalid operator '{}'", c),
            CalcError::UnbalancedParentheses => write!(f, "Mismatched brackets"),
            CalcError::InsufficientOperands => write!(f, "Not enough operands"),
            CalcError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),
            CalcError::MalformedExpression => write!(f, "Malformed expression"),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::VariableAlreadyExists(c) => write!(f, "Variable '{}' already exists", c),
            CalcError::VariableNotFound(c) => write!(f, "Variable '{}' not found", c),
            CalcError::InvalidVariableName(c) => write!(f, "Invalid variable name '{}'", c),
            CalcError::NoValueForVariable(c) => write!(f, "No value to store into variable '{}'", c),
        }
    }
}

impl fmt::Debug for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
