use std::collections::HashMap;

use crate::errors::*;
use crate::value::CalcErrorResult;

/// Mapping from a single lowercase letter to a stored real value. Variables
/// are single-assignment: `save` refuses to overwrite an existing binding,
/// the stored value only changes through `accumulate` and `decrement`.
pub struct VariableStore {
    vars: HashMap<char, f64>,
}

impl Default for VariableStore {
    fn default() -> VariableStore {
        VariableStore { vars: HashMap::new() }
    }
}

impl VariableStore {
    pub fn new() -> Self {
        Default::default()
    }

    fn check_name(name: char) -> CalcErrorResult {
        if name.is_ascii_lowercase() {
            Ok(())
        } else {
            Err(CalcError::InvalidVariableName(name))
        }
    }

    /// Binds `name` to `value`. Fails if the name is already bound.
    pub fn save(&mut self, name: char, value: f64) -> CalcErrorResult {
        VariableStore::check_name(name)?;
        if self.vars.contains_key(&name) {
            return Err(CalcError::VariableAlreadyExists(name));
        }
        self.vars.insert(name, value);
        Ok(())
    }

    pub fn load(&self, name: char) -> Result<f64, CalcError> {
        match self.vars.get(&name) {
            Some(v) => Ok(*v),
            None => Err(CalcError::VariableNotFound(name)),
        }
    }

    /// Adds `delta` to the bound value. Fails if the name is unbound.
    pub fn accumulate(&mut self, name: char, delta: f64) -> CalcErrorResult {
        match self.vars.get_mut(&name) {
            Some(v) => {
                *v += delta;
                Ok(())
            }
            None => Err(CalcError::VariableNotFound(name)),
        }
    }

    /// Subtracts `delta` from the bound value. Fails if the name is unbound.
    pub fn decrement(&mut self, name: char, delta: f64) -> CalcErrorResult {
        match self.vars.get_mut(&name) {
            Some(v) => {
                *v -= delta;
                Ok(())
            }
            None => Err(CalcError::VariableNotFound(name)),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_is_single_assignment() {
        let mut vars = VariableStore::new();
        assert_eq!(vars.save('x', 5.0), Ok(()));
        assert_eq!(vars.save('x', 7.0), Err(CalcError::VariableAlreadyExists('x')));
        assert_eq!(vars.load('x'), Ok(5.0));
    }

    #[test]
    fn test_load_missing() {
        let vars = VariableStore::new();
        assert_eq!(vars.load('y'), Err(CalcError::VariableNotFound('y')));
    }

    #[test]
    fn test_accumulate_and_decrement() {
        let mut vars = VariableStore::new();
        assert_eq!(vars.accumulate('a', 1.0), Err(CalcError::VariableNotFound('a')));
        assert_eq!(vars.decrement('a', 1.0), Err(CalcError::VariableNotFound('a')));
        vars.save('a', 10.0).unwrap();
        assert_eq!(vars.accumulate('a', 2.5), Ok(()));
        assert_eq!(vars.load('a'), Ok(12.5));
        assert_eq!(vars.decrement('a', 0.5), Ok(()));
        assert_eq!(vars.load('a'), Ok(12.0));
    }

    #[test]
    fn test_name_validation() {
        let mut vars = VariableStore::new();
        assert_eq!(vars.save('X', 1.0), Err(CalcError::InvalidVariableName('X')));
        assert_eq!(vars.save('1', 1.0), Err(CalcError::InvalidVariableName('1')));
        assert!(vars.is_empty());
    }
}
