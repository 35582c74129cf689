use pest::Parser;

use crate::errors::*;
use crate::value::Value;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// One atomic piece of an infix expression
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Token {
    /// A numeric literal, already parsed
    Number(Value),
    /// One of `+ - * /` (other symbols may be injected by callers and get
    /// precedence 0 in the converter)
    Operator(char),
    OpenBracket,
    CloseBracket,
    /// An isolated lowercase letter, a variable reference
    Identifier(char),
}

/// How a raw input string should be routed by the engine
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputKind {
    /// Matches the complex literal grammar: `3+4i`, `-1.5-2j`
    ComplexLiteral,
    /// A plain real number: `12`, `3.5`
    RealLiteral,
    /// Anything else made of recognized characters: operators, commands,
    /// expressions under composition
    CommandOrOperator,
}

/// Decides which grammar a raw input string matches. Whitespace is ignored,
/// the way the literal parser ignores it.
pub fn classify(input: &str) -> InputKind {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if CalcParser::parse(Rule::literal, &compact).is_ok() {
        InputKind::ComplexLiteral
    } else if Value::from_str_real(&compact).is_ok() {
        InputKind::RealLiteral
    } else {
        InputKind::CommandOrOperator
    }
}

/// Splits an expression string into tokens, order-preserving and lossless:
/// runs of digits and decimal points become `Number`, each of `+ - * / ( )`
/// becomes its own token, isolated lowercase letters become `Identifier`.
/// Any character outside that set fails the whole call with
/// `InvalidExpression`.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, CalcError> {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(..) => return Err(CalcError::InvalidExpression(expr.to_string())),
    };

    let mut tokens = Vec::new();
    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str();
        match rule {
            Rule::number => {
                let v = Value::from_str_real(val)?;
                tokens.push(Token::Number(v));
            }
            Rule::operator => {
                // the grammar guarantees a single-char match
                let c = val.chars().next().unwrap_or(' ');
                tokens.push(Token::Operator(c));
            }
            Rule::open_b => tokens.push(Token::OpenBracket),
            Rule::close_b => tokens.push(Token::CloseBracket),
            Rule::ident => {
                let c = val.chars().next().unwrap_or(' ');
                tokens.push(Token::Identifier(c));
            }
            _ => return Err(CalcError::InvalidExpression(expr.to_string())),
        }
    }
    Ok(tokens)
}
