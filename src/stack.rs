use std::collections::VecDeque;

use crate::errors::*;
use crate::value::{CalcErrorResult, CalcResult, Value};

/// How many recent values the display history keeps
pub const HISTORY_CAPACITY: usize = 12;

/// Bounded most-recent-N buffer that backs the stack display, newest first.
/// It is a read-only projection: nothing ever feeds back from it into a
/// calculation.
pub struct HistoryRing {
    items: VecDeque<Value>,
}

impl HistoryRing {
    fn new() -> Self {
        HistoryRing {
            items: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    fn record(&mut self, v: Value) {
        self.items.push_front(v);
        while self.items.len() > HISTORY_CAPACITY {
            self.items.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Newest-first iteration over the recorded values
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

/// LIFO stack of complex values with the Forth manipulation words. Every
/// successful mutating call records into the history ring: pushes record the
/// new value, `pop` and `drop` record the removed one, `swap` records the
/// new top. A failed call records nothing and changes nothing.
pub struct OperandStack {
    values: Vec<Value>,
    history: HistoryRing,
}

impl Default for OperandStack {
    fn default() -> OperandStack {
        OperandStack {
            values: Vec::new(),
            history: HistoryRing::new(),
        }
    }
}

impl OperandStack {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn push(&mut self, v: Value) {
        self.values.push(v);
        self.history.record(v);
    }

    pub fn pop(&mut self) -> CalcResult {
        match self.values.pop() {
            Some(v) => {
                self.history.record(v);
                Ok(v)
            }
            None => Err(CalcError::InsufficientOperands),
        }
    }

    /// Non-destructive look at the top value
    pub fn peek(&self) -> CalcResult {
        match self.values.last() {
            Some(v) => Ok(*v),
            None => Err(CalcError::InsufficientOperands),
        }
    }

    /// Exchanges the top two values
    pub fn swap(&mut self) -> CalcErrorResult {
        let n = self.values.len();
        if n < 2 {
            return Err(CalcError::InsufficientOperands);
        }
        self.values.swap(n - 1, n - 2);
        self.history.record(self.values[n - 1]);
        Ok(())
    }

    /// Pushes a copy of the top value
    pub fn dup(&mut self) -> CalcErrorResult {
        match self.values.last() {
            Some(v) => {
                let v = *v;
                self.push(v);
                Ok(())
            }
            None => Err(CalcError::InsufficientOperands),
        }
    }

    /// Removes the top value
    pub fn drop(&mut self) -> CalcErrorResult {
        match self.values.pop() {
            Some(v) => {
                self.history.record(v);
                Ok(())
            }
            None => Err(CalcError::InsufficientOperands),
        }
    }

    /// Pushes a copy of the second-from-top value: `[5, 10]` becomes
    /// `[5, 10, 5]`
    pub fn over(&mut self) -> CalcErrorResult {
        let n = self.values.len();
        if n < 2 {
            return Err(CalcError::InsufficientOperands);
        }
        let v = self.values[n - 2];
        self.push(v);
        Ok(())
    }

    /// Replaces the top value with `f(top)`. Nothing moves unless `f`
    /// succeeds.
    pub fn apply_unary<F>(&mut self, f: F) -> CalcResult
    where
        F: FnOnce(Value) -> CalcResult,
    {
        let top = self.peek()?;
        let result = f(top)?;
        // the computation is done, mutation cannot fail anymore
        self.pop()?;
        self.push(result);
        Ok(result)
    }

    /// Replaces the top two values with `f(second, top)`: the left operand
    /// is the deeper of the two. Nothing moves unless `f` succeeds.
    pub fn apply_binary<F>(&mut self, f: F) -> CalcResult
    where
        F: FnOnce(Value, Value) -> CalcResult,
    {
        let n = self.values.len();
        if n < 2 {
            return Err(CalcError::InsufficientOperands);
        }
        let lhs = self.values[n - 2];
        let rhs = self.values[n - 1];
        let result = f(lhs, rhs)?;
        self.pop()?;
        self.pop()?;
        self.push(result);
        Ok(result)
    }
}
