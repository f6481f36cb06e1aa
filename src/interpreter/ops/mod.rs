pub mod assign;
pub mod binary;
pub mod unary;

// Operators are implemented as `impl Interpreter` blocks; the pure parts
// (`apply_binary`) are shared with assignment.
