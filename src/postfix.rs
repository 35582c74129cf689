use crate::errors::*;
use crate::token::Token;
use crate::value::{apply_operator, CalcErrorResult, CalcResult, Value};

// + and - bind weaker than * and /; anything else gets 0 but still obeys
// the same stack discipline
fn priority(op: char) -> i32 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 0,
    }
}

/// Incremental infix-to-postfix converter: feed tokens in infix order with
/// [`Converter::push`], collect the postfix sequence with
/// [`Converter::finish`]. Operators are left-associative: an incoming
/// operator sends every queued operator of equal or greater priority to the
/// output before taking its place on the queue.
pub struct Converter {
    queue: Vec<Token>,
    output: Vec<Token>,
}

impl Default for Converter {
    fn default() -> Converter {
        Converter {
            queue: Vec::new(),
            output: Vec::new(),
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Default::default()
    }

    // move operators from the queue to the output while the queue top has
    // equal or greater priority
    fn pop_while_priority(&mut self, pri: i32) {
        while let Some(top) = self.queue.pop() {
            match top {
                Token::Operator(op) if priority(op) >= pri => self.output.push(top),
                _ => {
                    self.queue.push(top);
                    return;
                }
            }
        }
    }

    // move operators to the output until the matching opening bracket,
    // which is discarded
    fn pop_until_bracket(&mut self) -> CalcErrorResult {
        loop {
            match self.queue.pop() {
                Some(Token::OpenBracket) => return Ok(()),
                Some(t) => self.output.push(t),
                None => return Err(CalcError::UnbalancedParentheses),
            }
        }
    }

    pub fn push(&mut self, token: Token) -> CalcErrorResult {
        match token {
            Token::Number(..) | Token::Identifier(..) => self.output.push(token),
            Token::OpenBracket => self.queue.push(token),
            Token::CloseBracket => return self.pop_until_bracket(),
            Token::Operator(op) => {
                self.pop_while_priority(priority(op));
                self.queue.push(token);
            }
        }
        Ok(())
    }

    /// Drains the operator queue and returns the postfix token sequence.
    /// A leftover opening bracket means the expression never closed it.
    pub fn finish(mut self) -> Result<Vec<Token>, CalcError> {
        while let Some(t) = self.queue.pop() {
            match t {
                Token::OpenBracket => return Err(CalcError::UnbalancedParentheses),
                _ => self.output.push(t),
            }
        }
        Ok(self.output)
    }
}

/// Converts a token sequence from infix to postfix (Reverse Polish) order:
/// `3 + 5 * 2` becomes `3 5 2 * +`, `(3 + 5) * 2` becomes `3 5 + 2 *`.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut conv = Converter::new();
    for t in tokens {
        conv.push(t)?;
    }
    conv.finish()
}

/// Evaluates a postfix token sequence in a single left-to-right pass.
/// Numbers push onto a local stack, identifiers are no-op placeholders
/// (the caller substitutes them beforehand), an operator pops the right
/// operand first and the left one second. Exactly one value must remain.
pub fn evaluate(postfix: &[Token]) -> CalcResult {
    let mut values: Vec<Value> = Vec::new();
    for token in postfix {
        match *token {
            Token::Number(v) => values.push(v),
            Token::Identifier(..) => {}
            Token::Operator(op) => {
                if values.len() < 2 {
                    return Err(CalcError::InsufficientOperands);
                }
                // len checked above, both pops succeed
                let rhs = values.pop().unwrap();
                let lhs = values.pop().unwrap();
                let v = apply_operator(op, lhs, rhs)?;
                values.push(v);
            }
            Token::OpenBracket | Token::CloseBracket => {
                return Err(CalcError::MalformedExpression);
            }
        }
    }
    match (values.pop(), values.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(CalcError::MalformedExpression),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(f: f64) -> Token {
        Token::Number(Value::from_real(f))
    }

    #[test]
    fn test_priority_order() {
        // 3 + 5 * 2  ->  3 5 2 * +
        let postfix = to_postfix(vec![num(3.0), Token::Operator('+'), num(5.0), Token::Operator('*'), num(2.0)]).unwrap();
        assert_eq!(
            postfix,
            vec![num(3.0), num(5.0), num(2.0), Token::Operator('*'), Token::Operator('+')]
        );
    }

    #[test]
    fn test_bracket_order() {
        // (3 + 5) * 2  ->  3 5 + 2 *
        let postfix = to_postfix(vec![
            Token::OpenBracket,
            num(3.0),
            Token::Operator('+'),
            num(5.0),
            Token::CloseBracket,
            Token::Operator('*'),
            num(2.0),
        ])
        .unwrap();
        assert_eq!(
            postfix,
            vec![num(3.0), num(5.0), Token::Operator('+'), num(2.0), Token::Operator('*')]
        );
    }

    #[test]
    fn test_equal_priority_is_left_associative() {
        // 8 - 3 - 2  ->  8 3 - 2 -  -> 3
        let postfix = to_postfix(vec![num(8.0), Token::Operator('-'), num(3.0), Token::Operator('-'), num(2.0)]).unwrap();
        assert_eq!(
            postfix,
            vec![num(8.0), num(3.0), Token::Operator('-'), num(2.0), Token::Operator('-')]
        );
        assert_eq!(evaluate(&postfix), Ok(Value::from_real(3.0)));
    }

    #[test]
    fn test_unbalanced_brackets() {
        let r = to_postfix(vec![num(3.0), Token::CloseBracket]);
        assert_eq!(r, Err(CalcError::UnbalancedParentheses));
        let r = to_postfix(vec![Token::OpenBracket, num(3.0)]);
        assert_eq!(r, Err(CalcError::UnbalancedParentheses));
    }

    #[test]
    fn test_evaluate() {
        let postfix = to_postfix(vec![num(3.0), Token::Operator('+'), num(5.0), Token::Operator('*'), num(2.0)]).unwrap();
        assert_eq!(evaluate(&postfix), Ok(Value::from_real(13.0)));
        let postfix = to_postfix(vec![
            Token::OpenBracket,
            num(3.0),
            Token::Operator('+'),
            num(5.0),
            Token::CloseBracket,
            Token::Operator('*'),
            num(2.0),
        ])
        .unwrap();
        assert_eq!(evaluate(&postfix), Ok(Value::from_real(16.0)));
    }

    #[test]
    fn test_evaluate_operand_order() {
        // 10 2 /  ->  10 / 2, not 2 / 10
        let v = evaluate(&[num(10.0), num(2.0), Token::Operator('/')]);
        assert_eq!(v, Ok(Value::from_real(5.0)));
        let v = evaluate(&[num(10.0), num(2.0), Token::Operator('-')]);
        assert_eq!(v, Ok(Value::from_real(8.0)));
    }

    #[test]
    fn test_evaluate_identifier_is_noop() {
        let v = evaluate(&[num(4.0), Token::Identifier('a'), num(2.0), Token::Operator('*')]);
        assert_eq!(v, Ok(Value::from_real(8.0)));
    }

    #[test]
    fn test_evaluate_insufficient() {
        let v = evaluate(&[num(4.0), Token::Operator('+')]);
        assert_eq!(v, Err(CalcError::InsufficientOperands));
    }

    #[test]
    fn test_evaluate_malformed() {
        // two values left over
        let v = evaluate(&[num(4.0), num(2.0)]);
        assert_eq!(v, Err(CalcError::MalformedExpression));
        // nothing at all
        let v = evaluate(&[]);
        assert_eq!(v, Err(CalcError::MalformedExpression));
    }

    #[test]
    fn test_unknown_operator_low_priority() {
        // '%' has priority 0 and still follows stack discipline
        let postfix = to_postfix(vec![num(3.0), Token::Operator('%'), num(5.0), Token::Operator('+'), num(2.0)]).unwrap();
        assert_eq!(
            postfix,
            vec![num(3.0), num(5.0), num(2.0), Token::Operator('+'), Token::Operator('%')]
        );
        assert_eq!(evaluate(&postfix), Err(CalcError::InvalidOperator('%')));
    }
}
