//! Global environment
//!
//! Holds the bindings of global variables, shared by every frame, and the
//! function-name table used for call dispatch. Functions are stored as
//! indices into [`Program::functions`]; when a name has both a prototype and
//! a definition, the definition wins.

use crate::memory::value::Value;
use crate::parser::ast::{DeclId, Program};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct GlobalEnvironment {
    values: FxHashMap<DeclId, Value>,
    functions: FxHashMap<String, usize>,
    entry: Option<usize>,
}

impl GlobalEnvironment {
    /// Build the function table of `program` and look up `entry_point`
    pub fn new(program: &Program, entry_point: &str) -> Self {
        let mut functions: FxHashMap<String, usize> = FxHashMap::default();

        for (index, function) in program.functions.iter().enumerate() {
            match functions.get(&function.name) {
                Some(&existing) if program.functions[existing].body.is_some() => {}
                _ => {
                    functions.insert(function.name.clone(), index);
                }
            }
        }

        let entry = functions.get(entry_point).copied();
        GlobalEnvironment {
            values: FxHashMap::default(),
            functions,
            entry,
        }
    }

    pub fn bind(&mut self, decl: DeclId, value: Value) {
        self.values.insert(decl, value);
    }

    pub fn lookup(&self, decl: DeclId) -> Option<Value> {
        self.values.get(&decl).copied()
    }

    /// Overwrite an existing global. Returns false if `decl` is not bound.
    pub fn assign(&mut self, decl: DeclId, value: Value) -> bool {
        match self.values.get_mut(&decl) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Index of the function named `name` in the program
    pub fn function(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    /// Index of the entry function, if the program has one
    pub fn entry(&self) -> Option<usize> {
        self.entry
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn program(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn test_definition_preferred_over_prototype() {
        let program = program("int f(int a); int main() { return 0; } int f(int a) { return a; }");
        let globals = GlobalEnvironment::new(&program, "main");

        assert_eq!(globals.function("f"), Some(2));
        assert_eq!(globals.entry(), Some(1));
        assert_eq!(globals.function("g"), None);
    }

    #[test]
    fn test_missing_entry() {
        let program = program("int helper() { return 1; }");
        let globals = GlobalEnvironment::new(&program, "main");

        assert_eq!(globals.entry(), None);
    }

    #[test]
    fn test_bindings() {
        let mut globals = GlobalEnvironment::default();

        assert!(!globals.assign(0, Value::Integer(3)));
        globals.bind(0, Value::Uninitialized);
        assert!(globals.assign(0, Value::Integer(3)));
        assert_eq!(globals.lookup(0), Some(Value::Integer(3)));
        assert_eq!(globals.len(), 1);
    }
}
