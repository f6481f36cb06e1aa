// AST (Abstract Syntax Tree) definitions for the interpreter

use rustc_hash::FxHashMap;

/// Unique identifier for expression nodes, used as the key of a frame's value cache
pub type NodeId = usize;

/// Unique identifier for variable and parameter declarations, used as a binding key
pub type DeclId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Base types supported by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Char,
    Void,
}

/// Type representation: a base type, a pointer depth and an optional array length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub base: BaseType,
    pub pointer_depth: usize,        // 0 = not pointer, 1 = *, 2 = **, etc.
    pub array_len: Option<usize>,    // Some(n) for `T name[n]`
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            pointer_depth: 0,
            array_len: None,
        }
    }

    pub fn int() -> Self {
        Type::new(BaseType::Int)
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn with_array(mut self, len: usize) -> Self {
        self.array_len = Some(len);
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0 && self.array_len.is_none()
    }

    pub fn is_array(&self) -> bool {
        self.array_len.is_some()
    }

    pub fn is_char(&self) -> bool {
        self.base == BaseType::Char && self.pointer_depth == 0 && self.array_len.is_none()
    }

    /// The type an expression naming a value of this type has: arrays decay to
    /// a pointer to their first element.
    pub fn decayed(&self) -> Type {
        match self.array_len {
            Some(_) => Type {
                base: self.base,
                pointer_depth: self.pointer_depth + 1,
                array_len: None,
            },
            None => self.clone(),
        }
    }

    /// Element type for arrays, pointee type for pointers
    pub fn pointee(&self) -> Option<Type> {
        if self.array_len.is_some() {
            return Some(Type {
                base: self.base,
                pointer_depth: self.pointer_depth,
                array_len: None,
            });
        }
        if self.pointer_depth == 0 {
            return None;
        }
        Some(Type {
            base: self.base,
            pointer_depth: self.pointer_depth - 1,
            array_len: None,
        })
    }
}

/// Binary operators, assignment included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl BinOp {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinOp::Assign
                | BinOp::AddAssign
                | BinOp::SubAssign
                | BinOp::MulAssign
                | BinOp::DivAssign
                | BinOp::ModAssign
        )
    }

    /// The arithmetic operator a compound assignment applies
    pub fn compound_base(self) -> Option<BinOp> {
        match self {
            BinOp::AddAssign => Some(BinOp::Add),
            BinOp::SubAssign => Some(BinOp::Sub),
            BinOp::MulAssign => Some(BinOp::Mul),
            BinOp::DivAssign => Some(BinOp::Div),
            BinOp::ModAssign => Some(BinOp::Mod),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitShl => "<<",
            BinOp::BitShr => ">>",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::ModAssign => "%=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
    Deref,   // *x
    AddrOf,  // &x
}

/// Built-in functions intercepted before ordinary call dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Get,
    Print,
    Malloc,
    Free,
}

impl Intrinsic {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GET" => Some(Intrinsic::Get),
            "PRINT" => Some(Intrinsic::Print),
            "MALLOC" => Some(Intrinsic::Malloc),
            "FREE" => Some(Intrinsic::Free),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Get => "GET",
            Intrinsic::Print => "PRINT",
            Intrinsic::Malloc => "MALLOC",
            Intrinsic::Free => "FREE",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Intrinsic::Get => 0,
            Intrinsic::Print | Intrinsic::Malloc | Intrinsic::Free => 1,
        }
    }

    pub fn return_type(self) -> Type {
        match self {
            Intrinsic::Get => Type::int(),
            Intrinsic::Malloc => Type::new(BaseType::Void).with_pointer(),
            Intrinsic::Print | Intrinsic::Free => Type::new(BaseType::Void),
        }
    }
}

/// An expression node. `id` is unique across the whole program.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i64),
    CharLiteral(i8),
    StringLiteral(String),
    /// Reference to a variable; `decl` is filled in by the resolver
    Name {
        name: String,
        decl: Option<DeclId>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Cast {
        target: Type,
        expr: Box<Expr>,
    },
    SizeofType(Type),
}

/// Variable declaration (local or global)
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: DeclId,
    pub name: String,
    pub var_type: Type,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub id: DeclId,
    pub name: String,
    pub param_type: Type,
}

/// Function definition or prototype
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    /// `None` for prototypes such as `extern int GET();`
    pub body: Option<Stmt>,
    /// Set by the resolver for prototypes of built-in functions
    pub intrinsic: Option<Intrinsic>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    Declaration {
        decls: Vec<VarDecl>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Declaration { location, .. }
            | Stmt::Expression { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::DoWhile { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Empty { location } => *location,
        }
    }
}

/// What the declaration table knows about one variable or parameter
#[derive(Debug, Clone)]
pub struct DeclInfo {
    pub name: String,
    pub var_type: Type,
    pub is_global: bool,
}

/// Declaration table handed to the engine alongside the tree
#[derive(Debug, Clone, Default)]
pub struct DeclTable {
    vars: Vec<DeclInfo>,
    expr_types: FxHashMap<NodeId, Type>,
}

impl DeclTable {
    /// Register a declaration and return its id
    pub fn declare(&mut self, name: &str, var_type: Type, is_global: bool) -> DeclId {
        self.vars.push(DeclInfo {
            name: name.to_string(),
            var_type,
            is_global,
        });
        self.vars.len() - 1
    }

    pub fn get(&self, id: DeclId) -> Option<&DeclInfo> {
        self.vars.get(id)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn set_type(&mut self, node: NodeId, ty: Type) {
        self.expr_types.insert(node, ty);
    }

    /// Static type of an expression, as recorded by the resolver
    pub fn type_of(&self, node: NodeId) -> Option<&Type> {
        self.expr_types.get(&node)
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub globals: Vec<VarDecl>, // In source order
    pub functions: Vec<FunctionDecl>,
    pub decls: DeclTable,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_decays_to_pointer() {
        let arr = Type::int().with_array(4);
        let decayed = arr.decayed();
        assert!(decayed.is_pointer());
        assert_eq!(decayed.pointee(), Some(Type::int()));
        assert_eq!(arr.pointee(), Some(Type::int()));
    }

    #[test]
    fn test_compound_base() {
        assert_eq!(BinOp::AddAssign.compound_base(), Some(BinOp::Add));
        assert_eq!(BinOp::Assign.compound_base(), None);
        assert!(BinOp::ModAssign.is_assignment());
        assert!(!BinOp::Le.is_assignment());
    }

    #[test]
    fn test_intrinsic_names() {
        assert_eq!(Intrinsic::from_name("MALLOC"), Some(Intrinsic::Malloc));
        assert_eq!(Intrinsic::from_name("malloc"), None);
        assert_eq!(Intrinsic::Print.arity(), 1);
        assert_eq!(Intrinsic::Get.arity(), 0);
    }
}
