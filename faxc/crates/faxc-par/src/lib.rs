//! faxc-par - Recursive-descent parser
//!
//! Consumes the token vector produced by `faxc-lex` and produces a vector
//! of top-level [`Item`]s. No error recovery: the first unexpected token
//! aborts the file, matching a single-pass AOT compiler with no LSP use
//! case.

use faxc_lex::{Token, TokenCategory};
use faxc_util::diagnostic::{DiagnosticCode, Handler};
use faxc_util::Span;
use thiserror::Error;

/// Binary/unary operator spelling, kept as the literal operator string
/// rather than a closed enum so `faxc-mir` can dispatch on it directly
/// against the operator set in §6.1.
pub type Op = String;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    IntegerLiteral(String),
    FloatLiteral(String),
    BooleanLiteral(bool),
    StringLiteral(String),
    VariableCall(String),
    UnaryOperation(Op, Box<Expr>),
    BinaryOperation(Box<Expr>, Op, Box<Expr>),
    CastOperation(Box<Expr>, String),
    FunctionCall(String, Vec<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VariableDeclaration(String, String, Option<Expr>),
    VariableAssignment(String, Expr),
    ExpressionStatement(Expr),
    ReturnStatement(Option<Expr>),
    ConditionalStatement(Expr, Box<Stmt>, Option<Box<Stmt>>),
    WhileLoopStatement(Expr, Box<Stmt>),
    ScopeDeclaration(Vec<Stmt>),
    EmptyStatement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    FunctionDeclaration {
        ret_type: String,
        id: String,
        arg_types: Vec<String>,
        arg_ids: Vec<String>,
        body: Stmt,
    },
    ClassDeclaration {
        id: String,
        body: Vec<Item>,
    },
    ClassMember {
        access: Access,
        inner: Box<Item>,
    },
    Module {
        id: String,
        body: Vec<Item>,
    },
    Extern {
        path: String,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token '{found}' on line {line}")]
    UnexpectedToken { found: String, line: u32 },
    #[error("expected '{expected}' but found '{found}' on line {line}")]
    ExpectedToken {
        expected: String,
        found: String,
        line: u32,
    },
    #[error("unexpected end of file")]
    UnexpectedEof,
}

pub type ParseResult<T> = Result<T, ParseError>;

const ACCESS_QUALIFIERS: &[&str] = &["public", "protected", "private"];
const ASSIGN_OPERATORS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%="];

pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a Handler,
    mod_prefix: String,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
            mod_prefix: String::new(),
        }
    }

    pub fn parse(&mut self) -> ParseResult<Vec<Item>> {
        let mut items = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.category == TokenCategory::Keyword && tok.value == "use" {
                items.push(self.parse_extern()?);
            } else {
                break;
            }
        }
        while self.peek().is_some() {
            items.push(self.parse_item()?);
        }
        Ok(items)
    }

    // ---- token-stream primitives ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.position).cloned();
        if tok.is_some() {
            self.position += 1;
        }
        tok
    }

    fn current_line(&self) -> u32 {
        self.peek().map(|t| t.line).unwrap_or(0)
    }

    fn check_value(&self, value: &str) -> bool {
        self.peek().is_some_and(|t| t.value == value)
    }

    fn match_value(&mut self, values: &[&str]) -> Option<Token> {
        if self.peek().is_some_and(|t| values.contains(&t.value.as_str())) {
            self.advance()
        } else {
            None
        }
    }

    fn consume(&mut self, value: &str) -> ParseResult<Token> {
        if self.check_value(value) {
            Ok(self.advance().expect("checked by check_value"))
        } else {
            let line = self.current_line();
            let found = self
                .peek()
                .map(|t| t.value.clone())
                .unwrap_or_else(|| "<eof>".to_string());
            self.report(
                DiagnosticCode::E_PARSER_EXPECTED_TOKEN,
                line,
                format!("expected '{value}' but found '{found}'"),
            );
            Err(ParseError::ExpectedToken {
                expected: value.to_string(),
                found,
                line,
            })
        }
    }

    fn consume_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(t) if t.category == TokenCategory::Identifier => {
                Ok(self.advance().unwrap().value)
            }
            Some(t) => {
                let line = t.line;
                let found = t.value.clone();
                self.report(
                    DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN,
                    line,
                    format!("expected identifier but found '{found}'"),
                );
                Err(ParseError::UnexpectedToken { found, line })
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn report(&self, code: DiagnosticCode, line: u32, message: impl Into<String>) {
        self.handler
            .build_error(Span::point(line, 0), message.into())
            .code(code)
            .emit(self.handler);
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(t) => {
                let line = t.line;
                let found = t.value.clone();
                self.report(
                    DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN,
                    line,
                    format!("unexpected token '{found}'"),
                );
                ParseError::UnexpectedToken { found, line }
            }
            None => ParseError::UnexpectedEof,
        }
    }

    // ---- top-level ----

    fn parse_extern(&mut self) -> ParseResult<Item> {
        self.consume("use")?;
        let mut path = self.consume_identifier()?;
        while self.match_value(&["."]).is_some() {
            path.push('.');
            path.push_str(&self.consume_identifier()?);
        }
        self.consume(";")?;
        Ok(Item::Extern { path })
    }

    fn parse_item(&mut self) -> ParseResult<Item> {
        if self.check_value("module") {
            return self.parse_module();
        }
        if self.check_value("class") {
            return self.parse_class();
        }
        if ACCESS_QUALIFIERS.contains(&self.peek().map(|t| t.value.as_str()).unwrap_or("")) {
            let access = self.parse_access()?;
            let inner = self.parse_item()?;
            return Ok(Item::ClassMember {
                access,
                inner: Box::new(inner),
            });
        }
        self.parse_function_declaration()
    }

    fn parse_access(&mut self) -> ParseResult<Access> {
        let tok = self.advance().expect("checked by caller");
        Ok(match tok.value.as_str() {
            "public" => Access::Public,
            "protected" => Access::Protected,
            _ => Access::Private,
        })
    }

    fn parse_module(&mut self) -> ParseResult<Item> {
        self.consume("module")?;
        let id = self.consume_identifier()?;
        let saved_prefix = std::mem::replace(&mut self.mod_prefix, id.clone());
        let body = if self.check_value("{") {
            self.advance();
            let mut items = Vec::new();
            while !self.check_value("}") {
                items.push(self.parse_item()?);
            }
            self.consume("}")?;
            items
        } else {
            vec![self.parse_item()?]
        };
        // Open Question #1: prefix resets after every top-level module.
        self.mod_prefix = saved_prefix;
        Ok(Item::Module { id, body })
    }

    fn parse_class(&mut self) -> ParseResult<Item> {
        self.consume("class")?;
        let id = self.consume_identifier()?;
        self.consume("{")?;
        let mut body = Vec::new();
        while !self.check_value("}") {
            body.push(self.parse_class_member()?);
        }
        self.consume("}")?;
        Ok(Item::ClassDeclaration { id, body })
    }

    fn parse_class_member(&mut self) -> ParseResult<Item> {
        let access = if ACCESS_QUALIFIERS.contains(&self.peek().map(|t| t.value.as_str()).unwrap_or(""))
        {
            self.parse_access()?
        } else {
            Access::Private
        };
        let inner = self.parse_class_inner_item()?;
        Ok(Item::ClassMember {
            access,
            inner: Box::new(inner),
        })
    }

    fn parse_class_inner_item(&mut self) -> ParseResult<Item> {
        if self.check_value("constructor") || self.check_value("destructor") {
            let kind = self.advance().unwrap().value;
            self.consume("(")?;
            let (arg_types, arg_ids) = self.parse_param_list()?;
            self.consume(")")?;
            let body = self.parse_statement()?;
            return Ok(Item::FunctionDeclaration {
                ret_type: "void".to_string(),
                id: kind,
                arg_types,
                arg_ids,
                body,
            });
        }
        self.parse_function_or_field()
    }

    /// `type id (` is a method; `type id ;`/`type id = expr ;` is a field,
    /// reusing the variable-declaration statement grammar.
    fn parse_function_or_field(&mut self) -> ParseResult<Item> {
        if self.looks_like_function_declaration() {
            return self.parse_function_declaration();
        }
        let ty = self.consume_identifier()?;
        let id = self.consume_identifier()?;
        let init = if self.match_value(&["="]).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(";")?;
        Ok(Item::FunctionDeclaration {
            ret_type: "void".to_string(),
            id: format!("field:{id}"),
            arg_types: Vec::new(),
            arg_ids: Vec::new(),
            body: Stmt::VariableDeclaration(ty, id, init),
        })
    }

    fn looks_like_function_declaration(&self) -> bool {
        let t0 = self.peek();
        let t1 = self.peek_at(1);
        let t2 = self.peek_at(2);
        matches!(
            (t0, t1, t2),
            (Some(a), Some(b), Some(c))
                if a.category == TokenCategory::Identifier
                    && b.category == TokenCategory::Identifier
                    && c.value == "("
        )
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Item> {
        let ret_type = self.consume_identifier()?;
        let lexeme = self.consume_identifier()?;
        let id = if self.mod_prefix.is_empty() {
            lexeme
        } else {
            format!("{}.{}", self.mod_prefix, lexeme)
        };
        self.consume("(")?;
        let (arg_types, arg_ids) = self.parse_param_list()?;
        self.consume(")")?;
        let body = self.parse_statement()?;
        Ok(Item::FunctionDeclaration {
            ret_type,
            id,
            arg_types,
            arg_ids,
            body,
        })
    }

    fn parse_param_list(&mut self) -> ParseResult<(Vec<String>, Vec<String>)> {
        let mut types = Vec::new();
        let mut ids = Vec::new();
        if !self.check_value(")") {
            loop {
                types.push(self.consume_identifier()?);
                ids.push(self.consume_identifier()?);
                if self.match_value(&[","]).is_none() {
                    break;
                }
            }
        }
        Ok((types, ids))
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.match_value(&["{"]).is_some() {
            let mut children = Vec::new();
            while !self.check_value("}") {
                children.push(self.parse_statement()?);
            }
            self.consume("}")?;
            return Ok(Stmt::ScopeDeclaration(children));
        }
        if self.match_value(&["if"]).is_some() {
            self.consume("(")?;
            let cond = self.parse_expression()?;
            self.consume(")")?;
            let pass = Box::new(self.parse_statement()?);
            let fail = if self.match_value(&["else"]).is_some() {
                Some(Box::new(self.parse_statement()?))
            } else {
                None
            };
            return Ok(Stmt::ConditionalStatement(cond, pass, fail));
        }
        if self.match_value(&["while"]).is_some() {
            self.consume("(")?;
            let cond = self.parse_expression()?;
            self.consume(")")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Stmt::WhileLoopStatement(cond, body));
        }
        if self.match_value(&["return"]).is_some() {
            let expr = if self.check_value(";") {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.consume(";")?;
            return Ok(Stmt::ReturnStatement(expr));
        }
        if self.match_value(&[";"]).is_some() {
            return Ok(Stmt::EmptyStatement);
        }
        if self.peek().is_some_and(|t| t.category == TokenCategory::Identifier) {
            return self.parse_modular_statement();
        }
        let expr = self.parse_expression()?;
        self.consume(";")?;
        if let Expr::FunctionCall(..) = expr {
            return Ok(Stmt::ExpressionStatement(expr));
        }
        Ok(Stmt::EmptyStatement)
    }

    /// `id (. id)*` then dispatch on what follows.
    fn parse_modular_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.position;
        let mut id = self.consume_identifier()?;
        while self.check_value(".") && self.peek_at(1).is_some_and(|t| t.category == TokenCategory::Identifier) {
            self.advance();
            id.push('.');
            id.push_str(&self.consume_identifier()?);
        }

        if let Some(op_tok) = self.match_value(ASSIGN_OPERATORS) {
            let rhs = self.parse_expression()?;
            self.consume(";")?;
            return Ok(self.desugar_assignment(id, op_tok.value, rhs));
        }

        if self.check_value("(") {
            self.advance();
            let args = self.parse_argument_list()?;
            self.consume(")")?;
            self.consume(";")?;
            return Ok(Stmt::ExpressionStatement(Expr::FunctionCall(id, args)));
        }

        if self.peek().is_some_and(|t| t.category == TokenCategory::Identifier) {
            let var_id = self.consume_identifier()?;
            let init = if self.match_value(&["="]).is_some() {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.consume(";")?;
            return Ok(Stmt::VariableDeclaration(id, var_id, init));
        }

        // Fall back to treating the accumulated identifier as the start of
        // an expression statement (e.g. a bare variable reference).
        self.position = start;
        let _ = self.parse_expression()?;
        self.consume(";")?;
        Ok(Stmt::EmptyStatement)
    }

    fn desugar_assignment(&self, id: String, op: String, rhs: Expr) -> Stmt {
        if op == "=" {
            return Stmt::VariableAssignment(id, rhs);
        }
        let bare_op = op.trim_end_matches('=').to_string();
        Stmt::VariableAssignment(
            id.clone(),
            Expr::BinaryOperation(Box::new(Expr::VariableCall(id)), bare_op, Box::new(rhs)),
        )
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check_value(")") {
            loop {
                args.push(self.parse_expression()?);
                if self.match_value(&[","]).is_none() {
                    break;
                }
            }
        }
        Ok(args)
    }

    // ---- expressions (precedence climb, low to high) ----

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_value(&["==", "!="]) {
            let right = self.parse_comparison()?;
            left = Expr::BinaryOperation(Box::new(left), op.value, Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_cast()?;
        while let Some(op) = self.match_value(&["<", "<=", ">", ">="]) {
            let right = self.parse_cast()?;
            left = Expr::BinaryOperation(Box::new(left), op.value, Box::new(right));
        }
        Ok(left)
    }

    fn parse_cast(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;
        while self.match_value(&["as"]).is_some() {
            let target = self.consume_identifier()?;
            expr = Expr::CastOperation(Box::new(expr), target);
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_factor()?;
        while let Some(op) = self.match_value(&["+", "-"]) {
            let right = self.parse_factor()?;
            left = Expr::BinaryOperation(Box::new(left), op.value, Box::new(right));
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_remainder()?;
        while let Some(op) = self.match_value(&["*", "/"]) {
            let right = self.parse_remainder()?;
            left = Expr::BinaryOperation(Box::new(left), op.value, Box::new(right));
        }
        Ok(left)
    }

    fn parse_remainder(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_value(&["%"]) {
            let right = self.parse_unary()?;
            left = Expr::BinaryOperation(Box::new(left), op.value, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if let Some(op) = self.match_value(&["-", "!"]) {
            let operand = self.parse_unary()?;
            return Ok(Expr::UnaryOperation(op.value, Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let tok = self.peek().cloned().ok_or(ParseError::UnexpectedEof)?;
        match tok.category {
            TokenCategory::IntegerLiteral => {
                self.advance();
                Ok(Expr::IntegerLiteral(tok.value))
            }
            TokenCategory::FloatLiteral => {
                self.advance();
                Ok(Expr::FloatLiteral(tok.value))
            }
            TokenCategory::BooleanLiteral => {
                self.advance();
                Ok(Expr::BooleanLiteral(tok.value == "true"))
            }
            TokenCategory::StringLiteral => {
                self.advance();
                Ok(Expr::StringLiteral(tok.value))
            }
            TokenCategory::Identifier => {
                let id = self.consume_identifier()?;
                if self.match_value(&["("]).is_some() {
                    let args = self.parse_argument_list()?;
                    self.consume(")")?;
                    return Ok(Expr::FunctionCall(id, args));
                }
                Ok(Expr::VariableCall(id))
            }
            TokenCategory::Punctuator if tok.value == "(" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(")")?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lex::Lexer;

    fn parse(src: &str) -> ParseResult<Vec<Item>> {
        let handler = Handler::new();
        let tokens = Lexer::new(src, &handler).tokenize().expect("lex failed");
        Parser::new(tokens, &handler).parse()
    }

    #[test]
    fn parses_extern_directive() {
        let items = parse("use std.io;").unwrap();
        assert_eq!(items, vec![Item::Extern { path: "std.io".to_string() }]);
    }

    #[test]
    fn parses_main_function_with_return() {
        let items = parse("int32 main() { return 0; }").unwrap();
        match &items[0] {
            Item::FunctionDeclaration { id, ret_type, .. } => {
                assert_eq!(id, "main");
                assert_eq!(ret_type, "int32");
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn parses_function_with_params() {
        let items = parse("int32 add(int32 a, int32 b) { return a + b; }").unwrap();
        match &items[0] {
            Item::FunctionDeclaration {
                arg_types, arg_ids, ..
            } => {
                assert_eq!(arg_types, &vec!["int32".to_string(), "int32".to_string()]);
                assert_eq!(arg_ids, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn desugars_compound_assignment() {
        let items = parse("int32 main() { int32 x = 1; x += 2; return x; }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert_eq!(
            stmts[1],
            Stmt::VariableAssignment(
                "x".to_string(),
                Expr::BinaryOperation(
                    Box::new(Expr::VariableCall("x".to_string())),
                    "+".to_string(),
                    Box::new(Expr::IntegerLiteral("2".to_string())),
                )
            )
        );
    }

    #[test]
    fn respects_expression_precedence() {
        let items = parse("int32 main() { return 1 + 2 * 3; }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert_eq!(
            stmts[0],
            Stmt::ReturnStatement(Some(Expr::BinaryOperation(
                Box::new(Expr::IntegerLiteral("1".to_string())),
                "+".to_string(),
                Box::new(Expr::BinaryOperation(
                    Box::new(Expr::IntegerLiteral("2".to_string())),
                    "*".to_string(),
                    Box::new(Expr::IntegerLiteral("3".to_string())),
                )),
            )))
        );
    }

    #[test]
    fn parses_if_else() {
        let items = parse("int32 main() { if (1 == 1) { return 1; } else { return 0; } }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert!(matches!(stmts[0], Stmt::ConditionalStatement(_, _, Some(_))));
    }

    #[test]
    fn parses_while_loop() {
        let items = parse("int32 main() { while (1 == 1) { return 0; } }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert!(matches!(stmts[0], Stmt::WhileLoopStatement(..)));
    }

    #[test]
    fn parses_bare_call_statement_as_expression_statement() {
        let items = parse("int32 main() { println(1); return 0; }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert_eq!(
            stmts[0],
            Stmt::ExpressionStatement(Expr::FunctionCall(
                "println".to_string(),
                vec![Expr::IntegerLiteral("1".to_string())],
            ))
        );
    }

    #[test]
    fn parses_cast_expression() {
        let items = parse("int32 main() { return 1 as int64; }").unwrap();
        let Item::FunctionDeclaration { body, .. } = &items[0] else {
            panic!("expected function")
        };
        let Stmt::ScopeDeclaration(stmts) = body else {
            panic!("expected scope")
        };
        assert_eq!(
            stmts[0],
            Stmt::ReturnStatement(Some(Expr::CastOperation(
                Box::new(Expr::IntegerLiteral("1".to_string())),
                "int64".to_string(),
            )))
        );
    }

    #[test]
    fn parses_module_with_prefixed_function() {
        let items = parse("module math { int32 square(int32 n) { return n * n; } }").unwrap();
        let Item::Module { id, body } = &items[0] else {
            panic!("expected module")
        };
        assert_eq!(id, "math");
        match &body[0] {
            Item::FunctionDeclaration { id, .. } => assert_eq!(id, "math.square"),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn resets_mod_prefix_after_top_level_module() {
        let items = parse(
            "module math { int32 square(int32 n) { return n * n; } } int32 unrelated() { return 0; }",
        )
        .unwrap();
        match &items[1] {
            Item::FunctionDeclaration { id, .. } => assert_eq!(id, "unrelated"),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn parses_class_with_access_qualifiers() {
        let items = parse("class Point { public int32 x; private int32 y; }").unwrap();
        match &items[0] {
            Item::ClassDeclaration { id, body } => {
                assert_eq!(id, "Point");
                assert_eq!(body.len(), 2);
                assert!(matches!(
                    body[0],
                    Item::ClassMember {
                        access: Access::Public,
                        ..
                    }
                ));
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn unexpected_token_reports_diagnostic() {
        let handler = Handler::new();
        let tokens = Lexer::new("int32 main( { }", &handler).tokenize().unwrap();
        let result = Parser::new(tokens, &handler).parse();
        assert!(result.is_err());
        assert!(handler.has_errors());
    }
}
