// Constants for the interpreter

/// Size of `int` in bytes
pub const INT_SIZE: usize = 4;

/// Size of `char` in bytes
pub const CHAR_SIZE: usize = 1;

/// Size of any pointer in bytes
pub const POINTER_SIZE: usize = 8;

/// Element size used for `void *` arithmetic
pub const VOID_ELEMENT_SIZE: usize = 1;

/// Default limit on bytes held by heap blocks and arrays together (16 MiB)
pub const DEFAULT_HEAP_LIMIT: usize = 16 * 1024 * 1024;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Function invoked to start a run
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Name of the root frame that evaluates global initializers
pub const GLOBAL_FRAME_NAME: &str = "<global>";
