//! faxc-sem - Type rules and scope checking
//!
//! Owns `TypeInfo`, the `type_of` expression walk, and duplicate-declaration
//! rejection. Does not build or own the stack frame itself - that is
//! `faxc-lir`'s `StackInfo`/`StackEntry` - but mirrors its shape here so the
//! type-of walk can be unit-tested without a full IR generator.

use faxc_par::{Expr, Item, Stmt};
use faxc_util::FxHashMap;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegralCategory {
    String,
    Bool,
    Int,
    UInt,
    Float,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub name: String,
    pub integral_category: IntegralCategory,
    pub size_bytes: u32,
}

impl TypeInfo {
    fn new(name: &str, category: IntegralCategory, size_bytes: u32) -> Self {
        Self {
            name: name.to_string(),
            integral_category: category,
            size_bytes,
        }
    }

    /// Total function over the fixed table of known type names.
    pub fn for_name(name: &str) -> SemaResult<TypeInfo> {
        use IntegralCategory::*;
        let info = match name {
            "int8" => Self::new("int8", Int, 1),
            "int16" => Self::new("int16", Int, 2),
            "int32" => Self::new("int32", Int, 4),
            "int64" => Self::new("int64", Int, 8),
            "uint8" => Self::new("uint8", UInt, 1),
            "uint16" => Self::new("uint16", UInt, 2),
            "uint32" => Self::new("uint32", UInt, 4),
            "uint64" => Self::new("uint64", UInt, 8),
            "float8" => Self::new("float8", Float, 1),
            "float16" => Self::new("float16", Float, 2),
            "float32" => Self::new("float32", Float, 4),
            "float64" => Self::new("float64", Float, 8),
            "bool" => Self::new("bool", Bool, 1),
            "string" => Self::new("string", String_, 8),
            _ => return Err(SemaError::UnknownType { name: name.to_string() }),
        };
        Ok(info)
    }

    fn bits(&self) -> u32 {
        self.size_bytes * 8
    }
}

// `String_` avoids shadowing std::string::String in the match arms above
// while keeping the category name spelled as the spec names it elsewhere.
#[allow(non_upper_case_globals)]
const String_: IntegralCategory = IntegralCategory::String;

#[derive(Debug, Error)]
pub enum SemaError {
    #[error("unknown type '{name}'")]
    UnknownType { name: String },
    #[error("'{name}' is not declared or inaccessible")]
    NotDeclared { name: String },
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: String,
        op: String,
        right: String,
    },
    #[error("'{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("call to undeclared function '{name}'")]
    UndeclaredFunction { name: String },
}

pub type SemaResult<T> = Result<T, SemaError>;

/// Minimal local-variable frame used by `type_of` to resolve `VariableCall`.
/// Mirrors `faxc_lir::StackInfo` closely enough for standalone testing but
/// is not the frame actually emitted to - `faxc-mir` owns that.
#[derive(Clone, Debug, Default)]
pub struct TypeFrame {
    pub locals: FxHashMap<String, TypeInfo>,
    pub args: FxHashMap<String, TypeInfo>,
    pub functions: FxHashMap<String, TypeInfo>,
}

impl TypeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_local(&mut self, name: &str, ty: TypeInfo) {
        self.locals.insert(name.to_string(), ty);
    }

    pub fn declare_arg(&mut self, name: &str, ty: TypeInfo) {
        self.args.insert(name.to_string(), ty);
    }

    pub fn declare_function(&mut self, name: &str, ret_type: TypeInfo) {
        self.functions.insert(name.to_string(), ret_type);
    }

    fn lookup_var(&self, name: &str) -> Option<&TypeInfo> {
        self.locals.get(name).or_else(|| self.args.get(name))
    }
}

/// Walks `expr`, returning its `TypeInfo` per §4.3's promotion rules.
pub fn type_of(expr: &Expr, frame: &TypeFrame) -> SemaResult<TypeInfo> {
    match expr {
        Expr::IntegerLiteral(_) => TypeInfo::for_name("int32"),
        Expr::FloatLiteral(_) => TypeInfo::for_name("float32"),
        Expr::BooleanLiteral(_) => TypeInfo::for_name("bool"),
        Expr::StringLiteral(_) => TypeInfo::for_name("string"),
        Expr::VariableCall(name) => frame
            .lookup_var(name)
            .cloned()
            .ok_or_else(|| SemaError::NotDeclared { name: name.clone() }),
        Expr::FunctionCall(name, args) => {
            let mut mangled = name.clone();
            for arg in args {
                mangled.push_str(&type_of(arg, frame)?.name);
            }
            frame
                .functions
                .get(name)
                .or_else(|| frame.functions.get(&mangled))
                .cloned()
                .ok_or_else(|| SemaError::UndeclaredFunction { name: name.clone() })
        }
        Expr::UnaryOperation(_, operand) => type_of(operand, frame),
        Expr::CastOperation(_, target) => TypeInfo::for_name(target),
        Expr::BinaryOperation(left, op, right) => {
            let lt = type_of(left, frame)?;
            let rt = type_of(right, frame)?;
            binary_result_type(&lt, op, &rt)
        }
    }
}

fn binary_result_type(left: &TypeInfo, op: &str, right: &TypeInfo) -> SemaResult<TypeInfo> {
    use IntegralCategory::*;

    if matches!(op, "==" | "!=" | "<" | "<=" | ">" | ">=") {
        return TypeInfo::for_name("bool");
    }

    match (left.integral_category, right.integral_category) {
        (String_, String_) => TypeInfo::for_name("string"),
        (Float, _) | (_, Float) => Ok(left.clone()),
        (Int, Int) | (Int, UInt) => {
            let bits = left.bits().max(right.bits());
            TypeInfo::for_name(&format!("int{bits}"))
        }
        (UInt, UInt) => {
            let bits = left.bits().max(right.bits());
            TypeInfo::for_name(&format!("uint{bits}"))
        }
        (UInt, Int) => {
            let bits = left.bits().max(right.bits());
            TypeInfo::for_name(&format!("int{bits}"))
        }
        _ => Err(SemaError::TypeMismatch {
            left: left.name.clone(),
            op: op.to_string(),
            right: right.name.clone(),
        }),
    }
}

/// Rejects re-declaration of a name already bound in the *current* scope.
/// Nested `ScopeDeclaration`s get their own set, so shadowing across scopes
/// is legal (§4.4 Scope lowering).
pub fn check_duplicate_declarations(body: &Stmt) -> SemaResult<()> {
    check_scope(body, &mut HashSet::new())
}

fn check_scope(stmt: &Stmt, seen: &mut HashSet<String>) -> SemaResult<()> {
    match stmt {
        Stmt::VariableDeclaration(_, id, _) => {
            if !seen.insert(id.clone()) {
                return Err(SemaError::DuplicateDeclaration { name: id.clone() });
            }
            Ok(())
        }
        Stmt::ScopeDeclaration(children) => {
            let mut inner = HashSet::new();
            for child in children {
                check_scope(child, &mut inner)?;
            }
            Ok(())
        }
        Stmt::ConditionalStatement(_, pass, fail) => {
            check_duplicate_declarations(pass)?;
            if let Some(fail) = fail {
                check_duplicate_declarations(fail)?;
            }
            Ok(())
        }
        Stmt::WhileLoopStatement(_, body) => check_duplicate_declarations(body),
        Stmt::VariableAssignment(..)
        | Stmt::ExpressionStatement(_)
        | Stmt::ReturnStatement(_)
        | Stmt::EmptyStatement => Ok(()),
    }
}

/// Walks every `FunctionDeclaration` (recursing into modules/classes) and
/// checks duplicate declarations within its body.
pub fn check_items(items: &[Item]) -> SemaResult<()> {
    for item in items {
        check_item(item)?;
    }
    Ok(())
}

fn check_item(item: &Item) -> SemaResult<()> {
    match item {
        Item::FunctionDeclaration { body, .. } => check_duplicate_declarations(body),
        Item::ClassDeclaration { body, .. } => check_items(body),
        Item::ClassMember { inner, .. } => check_item(inner),
        Item::Module { body, .. } => check_items(body),
        Item::Extern { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literal_is_int32() {
        let frame = TypeFrame::new();
        let ty = type_of(&Expr::IntegerLiteral("5".into()), &frame).unwrap();
        assert_eq!(ty.name, "int32");
    }

    #[test]
    fn comparison_yields_bool() {
        let frame = TypeFrame::new();
        let expr = Expr::BinaryOperation(
            Box::new(Expr::IntegerLiteral("1".into())),
            "==".into(),
            Box::new(Expr::IntegerLiteral("2".into())),
        );
        assert_eq!(type_of(&expr, &frame).unwrap().name, "bool");
    }

    #[test]
    fn int_plus_uint_widens_to_int() {
        let mut frame = TypeFrame::new();
        frame.declare_local("a", TypeInfo::for_name("int32").unwrap());
        frame.declare_local("b", TypeInfo::for_name("uint64").unwrap());
        let expr = Expr::BinaryOperation(
            Box::new(Expr::VariableCall("a".into())),
            "+".into(),
            Box::new(Expr::VariableCall("b".into())),
        );
        let ty = type_of(&expr, &frame).unwrap();
        assert_eq!(ty.name, "int64");
        assert_eq!(ty.integral_category, IntegralCategory::Int);
    }

    #[test]
    fn uint_plus_uint_stays_uint() {
        let mut frame = TypeFrame::new();
        frame.declare_local("a", TypeInfo::for_name("uint8").unwrap());
        frame.declare_local("b", TypeInfo::for_name("uint32").unwrap());
        let expr = Expr::BinaryOperation(
            Box::new(Expr::VariableCall("a".into())),
            "+".into(),
            Box::new(Expr::VariableCall("b".into())),
        );
        assert_eq!(type_of(&expr, &frame).unwrap().name, "uint32");
    }

    #[test]
    fn undeclared_variable_fails() {
        let frame = TypeFrame::new();
        let err = type_of(&Expr::VariableCall("missing".into()), &frame).unwrap_err();
        assert!(matches!(err, SemaError::NotDeclared { .. }));
    }

    #[test]
    fn bool_plus_string_is_type_mismatch() {
        let mut frame = TypeFrame::new();
        frame.declare_local("a", TypeInfo::for_name("bool").unwrap());
        frame.declare_local("b", TypeInfo::for_name("string").unwrap());
        let expr = Expr::BinaryOperation(
            Box::new(Expr::VariableCall("a".into())),
            "+".into(),
            Box::new(Expr::VariableCall("b".into())),
        );
        assert!(matches!(
            type_of(&expr, &frame),
            Err(SemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn cast_operation_yields_target_type() {
        let frame = TypeFrame::new();
        let expr = Expr::CastOperation(Box::new(Expr::IntegerLiteral("1".into())), "int64".into());
        assert_eq!(type_of(&expr, &frame).unwrap().name, "int64");
    }

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let body = Stmt::ScopeDeclaration(vec![
            Stmt::VariableDeclaration("int32".into(), "x".into(), None),
            Stmt::VariableDeclaration("int32".into(), "x".into(), None),
        ]);
        assert!(matches!(
            check_duplicate_declarations(&body),
            Err(SemaError::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn shadowing_across_nested_scopes_is_allowed() {
        let body = Stmt::ScopeDeclaration(vec![
            Stmt::VariableDeclaration("int32".into(), "x".into(), None),
            Stmt::ScopeDeclaration(vec![Stmt::VariableDeclaration(
                "int32".into(),
                "x".into(),
                None,
            )]),
        ]);
        assert!(check_duplicate_declarations(&body).is_ok());
    }

    #[test]
    fn unknown_type_name_fails() {
        assert!(matches!(
            TypeInfo::for_name("nope"),
            Err(SemaError::UnknownType { .. })
        ));
    }
}
