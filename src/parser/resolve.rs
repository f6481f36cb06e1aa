//! Name and type resolution
//!
//! Runs once over a parsed [`Program`] before it is handed to the engine:
//!
//! - links every [`ExprKind::Name`] to the [`DeclId`] it refers to, looking in
//!   the enclosing function's flat scope first and then in the globals
//! - tags body-less prototypes of `GET`, `PRINT`, `MALLOC` and `FREE` as
//!   [`Intrinsic`]s
//! - records the static type of every expression in the program's
//!   [`DeclTable`], which the engine uses for pointer strides and
//!   type-directed stores
//!
//! Names that cannot be linked are left as `None`; using one is a runtime
//! error, not a resolution error.

use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// Resolve names and record static types in place
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(program: &mut Program) {
    for function in &mut program.functions {
        if function.body.is_none() {
            function.intrinsic = Intrinsic::from_name(&function.name);
        }
    }

    let mut return_types = FxHashMap::default();
    for function in &program.functions {
        return_types
            .entry(function.name.clone())
            .or_insert_with(|| function.return_type.clone());
    }

    let mut resolver = Resolver {
        decls: std::mem::take(&mut program.decls),
        globals: FxHashMap::default(),
        locals: FxHashMap::default(),
        return_types,
        unresolved: 0,
    };

    // Global initializers only see globals declared before them
    for global in &mut program.globals {
        if let Some(init) = &mut global.init {
            resolver.resolve_expr(init);
        }
        resolver.globals.insert(global.name.clone(), global.id);
    }

    for function in &mut program.functions {
        resolver.locals.clear();
        for param in &function.params {
            if !param.name.is_empty() {
                resolver.locals.insert(param.name.clone(), param.id);
            }
        }
        if let Some(body) = &mut function.body {
            resolver.resolve_stmt(body);
        }
    }

    if resolver.unresolved > 0 {
        tracing::debug!(count = resolver.unresolved, "names left unresolved");
    }
    program.decls = resolver.decls;
}

struct Resolver {
    decls: DeclTable,
    globals: FxHashMap<String, DeclId>,
    locals: FxHashMap<String, DeclId>,
    return_types: FxHashMap<String, Type>,
    unresolved: usize,
}

impl Resolver {
    fn lookup(&self, name: &str) -> Option<DeclId> {
        self.locals
            .get(name)
            .or_else(|| self.globals.get(name))
            .copied()
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Declaration { decls, .. } => {
                for decl in decls {
                    if let Some(init) = &mut decl.init {
                        self.resolve_expr(init);
                    }
                    // A later declaration of the same name replaces the earlier one
                    self.locals.insert(decl.name.clone(), decl.id);
                }
            }
            Stmt::Expression { expr, .. } => {
                self.resolve_expr(expr);
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While {
                condition, body, ..
            }
            | Stmt::DoWhile {
                body, condition, ..
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(condition) = condition {
                    self.resolve_expr(condition);
                }
                if let Some(increment) = increment {
                    self.resolve_expr(increment);
                }
                self.resolve_stmt(body);
            }
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.resolve_expr(expr);
                }
            }
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    self.resolve_stmt(statement);
                }
            }
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty { .. } => {}
        }
    }

    /// Link names below `expr`, record its static type and return it
    fn resolve_expr(&mut self, expr: &mut Expr) -> Type {
        let ty = match &mut expr.kind {
            ExprKind::IntLiteral(_) => Type::int(),
            ExprKind::CharLiteral(_) => Type::new(BaseType::Char),
            ExprKind::StringLiteral(_) => Type::new(BaseType::Char).with_pointer(),
            ExprKind::Name { name, decl } => {
                *decl = self.lookup(name);
                match decl.and_then(|id| self.decls.get(id)) {
                    Some(info) => info.var_type.decayed(),
                    None => {
                        self.unresolved += 1;
                        Type::int()
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let op = *op;
                let left_ty = self.resolve_expr(left);
                let right_ty = self.resolve_expr(right);
                binary_type(op, left_ty, right_ty)
            }
            ExprKind::Unary { op, operand } => {
                let op = *op;
                let operand_ty = self.resolve_expr(operand);
                match op {
                    UnOp::Deref => operand_ty.pointee().unwrap_or_else(Type::int),
                    UnOp::AddrOf => operand_ty.with_pointer(),
                    UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => operand_ty,
                    UnOp::Neg | UnOp::Not | UnOp::BitNot => Type::int(),
                }
            }
            ExprKind::Call { callee, args } => {
                for arg in args.iter_mut() {
                    self.resolve_expr(arg);
                }
                self.return_types
                    .get(callee.as_str())
                    .cloned()
                    .or_else(|| Intrinsic::from_name(callee).map(Intrinsic::return_type))
                    .unwrap_or_else(Type::int)
            }
            ExprKind::Subscript { base, index } => {
                let base_ty = self.resolve_expr(base);
                self.resolve_expr(index);
                base_ty.pointee().unwrap_or_else(Type::int)
            }
            ExprKind::Cast { target, expr } => {
                let target = target.clone();
                self.resolve_expr(expr);
                target
            }
            ExprKind::SizeofType(_) => Type::int(),
        };

        self.decls.set_type(expr.id, ty.clone());
        ty
    }
}

fn binary_type(op: BinOp, left: Type, right: Type) -> Type {
    match op {
        BinOp::Add => {
            if left.is_pointer() {
                left
            } else if right.is_pointer() {
                right
            } else {
                Type::int()
            }
        }
        BinOp::Sub => {
            if left.is_pointer() && !right.is_pointer() {
                left
            } else {
                Type::int()
            }
        }
        BinOp::Assign
        | BinOp::AddAssign
        | BinOp::SubAssign
        | BinOp::MulAssign
        | BinOp::DivAssign
        | BinOp::ModAssign => left,
        _ => Type::int(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn resolved(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        let mut program = parser.parse_program().unwrap();
        resolve(&mut program);
        program
    }

    fn body(program: &Program, name: &str) -> Vec<Stmt> {
        let function = program.functions.iter().find(|f| f.name == name && f.body.is_some());
        match &function.unwrap().body {
            Some(Stmt::Block { statements, .. }) => statements.clone(),
            other => panic!("Expected block, got {:?}", other),
        }
    }

    fn return_expr(stmt: &Stmt) -> &Expr {
        match stmt {
            Stmt::Return { expr: Some(expr), .. } => expr,
            other => panic!("Expected return, got {:?}", other),
        }
    }

    #[test]
    fn test_locals_shadow_globals() {
        let program = resolved("int x = 1; int main() { int x = 2; return x; }");
        let statements = body(&program, "main");

        let ExprKind::Name { decl, .. } = &return_expr(&statements[1]).kind else {
            panic!("Expected name");
        };
        let info = program.decls.get(decl.unwrap()).unwrap();
        assert!(!info.is_global);
    }

    #[test]
    fn test_globals_visible_in_functions() {
        let program = resolved("int g; int main() { return g; }");
        let statements = body(&program, "main");

        let ExprKind::Name { decl, .. } = &return_expr(&statements[0]).kind else {
            panic!("Expected name");
        };
        assert_eq!(*decl, Some(program.globals[0].id));
    }

    #[test]
    fn test_unknown_name_stays_unlinked() {
        let program = resolved("int main() { return missing; }");
        let statements = body(&program, "main");

        assert!(matches!(
            return_expr(&statements[0]).kind,
            ExprKind::Name { decl: None, .. }
        ));
    }

    #[test]
    fn test_intrinsic_prototypes_tagged() {
        let program = resolved("extern int GET(); extern void helper(); int main() { return 0; }");

        assert_eq!(program.functions[0].intrinsic, Some(Intrinsic::Get));
        assert_eq!(program.functions[1].intrinsic, None);
        assert_eq!(program.functions[2].intrinsic, None);
    }

    #[test]
    fn test_pointer_arithmetic_types() {
        let program = resolved(
            "int main() { int arr[4]; int *p; int n; n = p - arr; return *(arr + 1) + p[2]; }",
        );
        let statements = body(&program, "main");

        let Stmt::Expression { expr, .. } = &statements[3] else {
            panic!("Expected expression statement");
        };
        let ExprKind::Binary { right, .. } = &expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(program.decls.type_of(right.id), Some(&Type::int()));

        let ret = return_expr(&statements[4]);
        let ExprKind::Binary { left, right, .. } = &ret.kind else {
            panic!("Expected addition");
        };
        let ExprKind::Unary { operand, .. } = &left.kind else {
            panic!("Expected dereference");
        };
        assert_eq!(
            program.decls.type_of(operand.id),
            Some(&Type::int().with_pointer())
        );
        assert_eq!(program.decls.type_of(left.id), Some(&Type::int()));
        assert_eq!(program.decls.type_of(right.id), Some(&Type::int()));
    }

    #[test]
    fn test_cast_sets_type() {
        let program = resolved("int main() { char *s; s = (char *)MALLOC(4); return 0; }");
        let statements = body(&program, "main");

        let Stmt::Expression { expr, .. } = &statements[1] else {
            panic!("Expected expression statement");
        };
        let ExprKind::Binary { right, .. } = &expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(
            program.decls.type_of(right.id),
            Some(&Type::new(BaseType::Char).with_pointer())
        );
    }
}
