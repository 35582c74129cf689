use log::{debug, warn};

use crate::errors::*;
use crate::postfix;
use crate::stack::OperandStack;
use crate::token::{self, classify, InputKind, Token};
use crate::value::{apply_operator, format_f64, CalcErrorResult, Value};
use crate::vars::VariableStore;

/// A symbolic command from the view's button panel. A closed set, so every
/// dispatch is an exhaustive match.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    Clear,
    SquareRoot,
    InvertSign,
    Swap,
    Drop,
    Dup,
    Over,
    Equals,
    /// Appends `<` to the entry buffer (variable load composition)
    Less,
    /// Appends `>` to the entry buffer (variable save composition)
    Greater,
}

/// Everything the view needs to redraw after one input event. The view
/// renders `error_message` verbatim and interprets nothing.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderState {
    pub display_text: String,
    /// Recent results, newest first, at most 12 entries
    pub stack_snapshot: Vec<String>,
    pub error_message: Option<String>,
}

/// The calculator orchestrator. Owns all mutable state: the entry buffer
/// being composed, the operand stack with its display history, and the
/// variable store. One engine is one session; independent sessions get
/// independent engines.
///
/// Processing is strictly one event at a time: `submit_input` and
/// `submit_command` run to completion before the next event is accepted,
/// and any failure leaves the operand stack, variables, and history exactly
/// as they were.
pub struct CalculatorEngine {
    entry: String,
    display: String,
    stack: OperandStack,
    vars: VariableStore,
}

// characters the entry buffer accepts while composing
fn is_entry_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_ascii_lowercase()
        || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')' | '<' | '>' | ' ')
}

// a two-character variable command: `>x` save, `<x` load, `+x` accumulate,
// `-x` decrement
fn as_variable_command(text: &str) -> Option<(char, char)> {
    let mut it = text.chars();
    match (it.next(), it.next(), it.next()) {
        (Some(op), Some(name), None) if matches!(op, '>' | '<' | '+' | '-') && name.is_ascii_lowercase() => {
            Some((op, name))
        }
        _ => None,
    }
}

// a composed buffer ending in a save/load suffix, e.g. `5>x` or `<a`;
// `+x`/`-x` are excluded here because they collide with infix arithmetic
fn split_variable_suffix(buffer: &str) -> Option<(char, char, &str)> {
    let mut rev = buffer.chars().rev();
    match (rev.next(), rev.next()) {
        (Some(name), Some(op)) if name.is_ascii_lowercase() && matches!(op, '>' | '<') => {
            Some((op, name, &buffer[..buffer.len() - 2]))
        }
        _ => None,
    }
}

impl Default for CalculatorEngine {
    fn default() -> CalculatorEngine {
        CalculatorEngine {
            entry: String::new(),
            display: String::new(),
            stack: OperandStack::new(),
            vars: VariableStore::new(),
        }
    }
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn variables(&self) -> &VariableStore {
        &self.vars
    }

    /// True while the entry buffer holds an unfinished composition
    pub fn is_composing(&self) -> bool {
        !self.entry.is_empty()
    }

    /// The single entry point for literals, expressions, and textual
    /// commands. Routing:
    /// * a lone `+ - * /` applies the binary operation to the operand stack
    /// * a complex literal is parsed and pushed
    /// * `>x` `<x` `+x` `-x` run the variable command for `x`
    /// * anything else made of recognized characters extends the entry buffer
    pub fn submit_input(&mut self, text: &str) -> RenderState {
        let text = text.trim();
        debug!("input event: '{}'", text);
        let res = self.dispatch_input(text);
        self.render(res)
    }

    /// Entry point for the view's symbolic buttons
    pub fn submit_command(&mut self, cmd: Command) -> RenderState {
        debug!("command event: {:?}", cmd);
        let res = self.dispatch_command(cmd);
        self.render(res)
    }

    fn dispatch_input(&mut self, text: &str) -> CalcErrorResult {
        if text.is_empty() {
            return Ok(());
        }

        if text.len() == 1 {
            if let Some(op) = text.chars().next().filter(|c| matches!(*c, '+' | '-' | '*' | '/')) {
                return self.binary_operation(op);
            }
        }

        if classify(text) == InputKind::ComplexLiteral {
            let v = Value::from_str_complex(text)?;
            self.stack.push(v);
            self.display = format!("{}", v);
            self.entry.clear();
            return Ok(());
        }

        if let Some((op, name)) = as_variable_command(text) {
            return self.variable_command(op, name);
        }

        if let Some(bad) = text.chars().find(|c| !is_entry_char(*c)) {
            warn!("rejected entry character '{}'", bad);
            return Err(CalcError::InvalidExpression(text.to_string()));
        }
        self.entry.push_str(text);
        self.display = self.entry.clone();
        Ok(())
    }

    fn dispatch_command(&mut self, cmd: Command) -> CalcErrorResult {
        match cmd {
            Command::Clear => {
                self.entry.clear();
                self.display.clear();
                Ok(())
            }
            Command::Equals => self.commit_equals(),
            Command::SquareRoot => {
                let v = self.stack.apply_unary(|v| v.sqrt())?;
                self.display = format!("{}", v);
                Ok(())
            }
            Command::InvertSign => {
                let v = self.stack.apply_unary(|v| v.negate())?;
                self.display = format!("{}", v);
                Ok(())
            }
            Command::Swap => {
                self.stack.swap()?;
                self.show_top();
                Ok(())
            }
            Command::Drop => {
                self.stack.drop()?;
                self.show_top();
                Ok(())
            }
            Command::Dup => {
                self.stack.dup()?;
                self.show_top();
                Ok(())
            }
            Command::Over => {
                self.stack.over()?;
                self.show_top();
                Ok(())
            }
            Command::Less => {
                self.entry.push('<');
                self.display = self.entry.clone();
                Ok(())
            }
            Command::Greater => {
                self.entry.push('>');
                self.display = self.entry.clone();
                Ok(())
            }
        }
    }

    // pops two operands, applies `second <op> top`, pushes the result;
    // commits the pending composition by discarding it
    fn binary_operation(&mut self, op: char) -> CalcErrorResult {
        let v = self.stack.apply_binary(|lhs, rhs| apply_operator(op, lhs, rhs))?;
        self.display = format!("{}", v);
        self.entry.clear();
        Ok(())
    }

    // `=`: run the full infix pipeline over the entry buffer, or commit a
    // composed variable suffix. The buffer is consumed either way.
    fn commit_equals(&mut self) -> CalcErrorResult {
        let buffer = std::mem::take(&mut self.entry);
        let buffer = buffer.trim().to_string();
        if buffer.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        if let Some((op, name, prefix)) = split_variable_suffix(&buffer) {
            return match op {
                '>' => {
                    if prefix.is_empty() {
                        return Err(CalcError::NoValueForVariable(name));
                    }
                    let v = Value::from_str_real(prefix)?;
                    self.vars.save(name, v.real())?;
                    self.display = format!("{} = {}", name, format_f64(v.real()));
                    Ok(())
                }
                '<' => {
                    if !prefix.is_empty() {
                        return Err(CalcError::InvalidExpression(buffer.clone()));
                    }
                    let v = self.vars.load(name)?;
                    self.entry = format_f64(v);
                    self.display = self.entry.clone();
                    Ok(())
                }
                _ => Err(CalcError::InvalidExpression(buffer.clone())),
            };
        }

        let tokens = token::tokenize(&buffer)?;
        let tokens = self.resolve_identifiers(tokens)?;
        let rpn = postfix::to_postfix(tokens)?;
        let v = postfix::evaluate(&rpn)?;
        self.display = format!("{}", v);
        Ok(())
    }

    // identifiers are resolved from the variable store before evaluation
    fn resolve_identifiers(&self, tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
        tokens
            .into_iter()
            .map(|t| match t {
                Token::Identifier(name) => {
                    let v = self.vars.load(name)?;
                    Ok(Token::Number(Value::from_real(v)))
                }
                _ => Ok(t),
            })
            .collect()
    }

    fn variable_command(&mut self, op: char, name: char) -> CalcErrorResult {
        if op == '<' {
            // load appends, so the value can take part in further composition
            let v = self.vars.load(name)?;
            self.entry.push_str(&format_f64(v));
            self.display = self.entry.clone();
            return Ok(());
        }

        // save/accumulate/decrement consume the composed value; the buffer
        // clears whether they succeed or not
        let composed = std::mem::take(&mut self.entry);
        let composed = composed.trim().to_string();
        if composed.is_empty() {
            return Err(CalcError::NoValueForVariable(name));
        }
        let value = Value::from_str_real(&composed)?.real();
        match op {
            '>' => self.vars.save(name, value)?,
            '+' => self.vars.accumulate(name, value)?,
            '-' => self.vars.decrement(name, value)?,
            _ => return Err(CalcError::InvalidOperator(op)),
        }
        // the command succeeded, the name is bound
        let current = self.vars.load(name)?;
        self.display = format!("{} = {}", name, format_f64(current));
        Ok(())
    }

    fn show_top(&mut self) {
        self.display = match self.stack.peek() {
            Ok(v) => format!("{}", v),
            Err(..) => String::new(),
        };
    }

    fn render(&self, res: CalcErrorResult) -> RenderState {
        let error_message = res.err().map(|e| {
            let msg = format!("{}", e);
            warn!("{}", msg);
            msg
        });
        RenderState {
            display_text: self.display.clone(),
            stack_snapshot: self.stack.history().iter().map(|v| format!("{}", v)).collect(),
            error_message,
        }
    }
}
