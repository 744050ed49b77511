//! `IrGenerator`: walks the parsed tree and lowers it into [`Segments`].

use crate::mir::{mangle_data, mangle_function, Declaration, Entry, Instruction, Segments};
use faxc_lir::{Address, Operand, PhysicalRegister, RegisterWidth, StackInfo, WindowsX64Abi};
use faxc_par::{Expr, Item, Stmt};
use faxc_sem::{type_of, IntegralCategory, SemaError, TypeFrame, TypeInfo};
use faxc_util::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrError {
    #[error(transparent)]
    Sema(#[from] SemaError),
    #[error("call to undeclared function '{name}'")]
    UndeclaredFunction { name: String },
    #[error("floating-point codegen is not supported")]
    UnsupportedFloatCodegen,
    #[error("operator '{op}' is not implemented for codegen")]
    UnsupportedOperator { op: String },
    #[error("cast to '{target}' is not implemented for codegen")]
    UnsupportedCast { target: String },
}

pub type IrResult<T> = Result<T, IrError>;

use PhysicalRegister::*;
use RegisterWidth::*;

pub struct IrGenerator {
    segments: Segments,
    label_counter: u32,
    /// mangled name -> return type, populated by a signature pass before
    /// any body is lowered so forward references resolve. Used to resolve
    /// the actual callee at a call site.
    declared: FxHashMap<String, TypeInfo>,
    /// plain (unmangled) id -> return type. `faxc_sem::type_of` resolves a
    /// `FunctionCall` subexpression's type by plain id, not by full
    /// mangled signature, so overload resolution there is last-write-wins.
    declared_by_name: FxHashMap<String, TypeInfo>,
}

impl IrGenerator {
    pub fn new() -> Self {
        Self {
            segments: Segments::new(),
            label_counter: 0,
            declared: FxHashMap::default(),
            declared_by_name: FxHashMap::default(),
        }
    }

    pub fn generate(items: &[Item]) -> IrResult<Segments> {
        let mut gen = Self::new();
        gen.collect_signatures(items)?;
        gen.lower_items(items)?;
        Ok(gen.segments)
    }

    fn next_label(&mut self) -> u32 {
        self.label_counter += 1;
        self.label_counter
    }

    // ---- signature pass ----

    fn collect_signatures(&mut self, items: &[Item]) -> IrResult<()> {
        for item in items {
            self.collect_signature(item)?;
        }
        Ok(())
    }

    fn collect_signature(&mut self, item: &Item) -> IrResult<()> {
        match item {
            Item::FunctionDeclaration {
                ret_type,
                id,
                arg_types,
                ..
            } => {
                let ret = type_info_for(ret_type)?;
                let mangled = mangle_function(id, arg_types);
                self.declared.insert(mangled, ret.clone());
                self.declared_by_name.insert(id.clone(), ret);
                Ok(())
            }
            Item::Module { body, .. } => self.collect_signatures(body),
            // Classes have no instantiation path; member signatures are not
            // reachable from any call site, so they are not registered.
            Item::ClassDeclaration { .. } | Item::ClassMember { .. } | Item::Extern { .. } => {
                Ok(())
            }
        }
    }

    // ---- item lowering ----

    fn lower_items(&mut self, items: &[Item]) -> IrResult<()> {
        for item in items {
            self.lower_item(item)?;
        }
        Ok(())
    }

    fn lower_item(&mut self, item: &Item) -> IrResult<()> {
        match item {
            Item::FunctionDeclaration { .. } => self.lower_function(item),
            Item::Module { body, .. } => self.lower_items(body),
            Item::ClassDeclaration { .. } | Item::ClassMember { .. } | Item::Extern { .. } => {
                Ok(())
            }
        }
    }

    fn lower_function(&mut self, item: &Item) -> IrResult<()> {
        let Item::FunctionDeclaration {
            ret_type,
            id,
            arg_types,
            arg_ids,
            body,
        } = item
        else {
            unreachable!("caller guarantees FunctionDeclaration")
        };

        let ret = type_info_for(ret_type)?;
        let arg_type_infos: Vec<TypeInfo> = arg_types
            .iter()
            .map(|t| TypeInfo::for_name(t))
            .collect::<SemaResult<_>>()?;
        let mangled = mangle_function(id, arg_types);
        let args_stack = StackInfo::seed_args(arg_ids, &arg_type_infos);

        let mut entry = Entry::new(mangled.clone(), ret_type.clone(), args_stack.clone());
        entry.instructions.push(Instruction::Push(reg(RBP, W64)));
        entry
            .instructions
            .push(Instruction::Mov(reg(RBP, W64), reg(RSP, W64)));

        let sub_rsp_index = entry.instructions.len();
        entry
            .instructions
            .push(Instruction::Sub(reg(RSP, W64), Operand::Imm(0)));

        let mut locals = StackInfo::new();
        let mut type_frame = TypeFrame::new();
        for (name, ty) in arg_ids.iter().zip(arg_type_infos.iter()) {
            type_frame.declare_arg(name, ty.clone());
        }
        for (name, ret_ty) in &self.declared_by_name {
            type_frame.declare_function(name, ret_ty.clone());
        }

        let mut body_instructions = Vec::new();
        self.lower_function_body(
            body,
            &mut body_instructions,
            &mut locals,
            &args_stack,
            &mut type_frame,
            &ret,
        )?;
        entry.instructions.extend(body_instructions);

        let frame_size = WindowsX64Abi::aligned_frame_size(locals.bottom().max(0) as u32);
        entry.instructions[sub_rsp_index] =
            Instruction::Sub(reg(RSP, W64), Operand::Imm(frame_size as i64));

        if id == "main" {
            entry.instructions.push(Instruction::Xor(reg(RAX, W64), reg(RAX, W64)));
        }
        entry.instructions.push(Instruction::Jmp("exit".to_string()));

        self.segments.text.push(entry);
        Ok(())
    }

    /// The function's own top-level scope shares `locals` directly rather
    /// than spawning a child frame, so its declarations count toward the
    /// frame size patched into the deferred `sub rsp`.
    fn lower_function_body(
        &mut self,
        body: &Stmt,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        ret_type: &TypeInfo,
    ) -> IrResult<()> {
        match body {
            Stmt::ScopeDeclaration(children) => {
                for child in children {
                    self.lower_stmt(child, out, locals, args, types, ret_type)?;
                }
                Ok(())
            }
            other => self.lower_stmt(other, out, locals, args, types, ret_type),
        }
    }

    // ---- statement lowering ----

    fn lower_stmt(
        &mut self,
        stmt: &Stmt,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        ret_type: &TypeInfo,
    ) -> IrResult<()> {
        match stmt {
            Stmt::EmptyStatement => Ok(()),
            Stmt::ScopeDeclaration(children) => {
                let mut child_locals = locals.child();
                let mut child_types = types.clone();
                for child in children {
                    self.lower_stmt(
                        child,
                        out,
                        &mut child_locals,
                        args,
                        &mut child_types,
                        ret_type,
                    )?;
                }
                Ok(())
            }
            Stmt::VariableDeclaration(ty_name, id, init) => {
                let ty = TypeInfo::for_name(ty_name)?;
                let offset = locals.push(id, ty.clone()).map_err(|_| {
                    IrError::Sema(SemaError::DuplicateDeclaration { name: id.clone() })
                })?;
                types.declare_local(id, ty.clone());
                let width = RegisterWidth::for_size(ty.size_bytes);
                let target = Operand::Reg(RDX, width);
                match init {
                    Some(expr) => {
                        self.lower_expr(expr, out, locals, args, types, target.clone())?;
                    }
                    None if ty.integral_category == IntegralCategory::String => {
                        let label = mangle_data("", "0");
                        self.segments
                            .push_unique_data(label.clone(), "\"\"".to_string(), "0".to_string());
                        out.push(Instruction::Lea(
                            target.clone(),
                            Operand::Mem(Address::Global(faxc_util::Symbol::intern(&label))),
                        ));
                    }
                    None => out.push(Instruction::Mov(target.clone(), Operand::Imm(0))),
                }
                out.push(Instruction::Mov(
                    Operand::Mem(Address::StackRelative { offset: -offset }),
                    target,
                ));
                Ok(())
            }
            Stmt::VariableAssignment(id, expr) => {
                let (offset, width, is_arg) = self.resolve_var(id, locals, args)?;
                let target = Operand::Reg(RDX, width);
                self.lower_expr(expr, out, locals, args, types, target.clone())?;
                let mem_offset = if is_arg { offset } else { -offset };
                out.push(Instruction::Mov(
                    Operand::Mem(Address::StackRelative { offset: mem_offset }),
                    target,
                ));
                Ok(())
            }
            Stmt::ExpressionStatement(expr) => {
                self.lower_expr(expr, out, locals, args, types, reg(RAX, W64))?;
                Ok(())
            }
            Stmt::ReturnStatement(expr) => {
                if let Some(expr) = expr {
                    let width = RegisterWidth::for_size(ret_type.size_bytes);
                    self.lower_expr(expr, out, locals, args, types, reg(RAX, width))?;
                }
                out.push(Instruction::Jmp("exit".to_string()));
                Ok(())
            }
            Stmt::ConditionalStatement(cond, pass, fail) => {
                self.lower_conditional(cond, pass, fail.as_deref(), out, locals, args, types, ret_type)
            }
            Stmt::WhileLoopStatement(cond, body) => {
                self.lower_while(cond, body, out, locals, args, types, ret_type)
            }
        }
    }

    fn lower_conditional(
        &mut self,
        cond: &Expr,
        pass: &Stmt,
        fail: Option<&Stmt>,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        ret_type: &TypeInfo,
    ) -> IrResult<()> {
        let n = self.next_label();
        let cndm_then = format!(".cndm{n}");
        let cnde = format!(".cnde{n}");

        self.lower_expr(cond, out, locals, args, types, reg(RCX, W16))?;
        out.push(Instruction::Cmp(reg(RCX, W16), Operand::Imm(1)));
        out.push(Instruction::Je(cndm_then.clone()));

        let cndm_else = if fail.is_some() {
            let m = self.next_label();
            let label = format!(".cndm{m}");
            out.push(Instruction::Jne(label.clone()));
            Some(label)
        } else {
            None
        };
        out.push(Instruction::Jmp(cnde.clone()));
        out.push(Instruction::Label(cnde.clone()));

        let mut then_instructions = Vec::new();
        let mut then_locals = locals.child();
        let mut then_types = types.clone();
        self.lower_stmt(
            pass,
            &mut then_instructions,
            &mut then_locals,
            args,
            &mut then_types,
            ret_type,
        )?;
        then_instructions.push(Instruction::Jmp(cnde.clone()));
        self.segments.labels.push(Entry {
            id: cndm_then,
            return_type: "void".to_string(),
            args_stack: args.clone(),
            instructions: then_instructions,
        });

        if let (Some(fail_stmt), Some(cndm_else)) = (fail, cndm_else) {
            let mut else_instructions = Vec::new();
            let mut else_locals = locals.child();
            let mut else_types = types.clone();
            self.lower_stmt(
                fail_stmt,
                &mut else_instructions,
                &mut else_locals,
                args,
                &mut else_types,
                ret_type,
            )?;
            else_instructions.push(Instruction::Jmp(cnde));
            self.segments.labels.push(Entry {
                id: cndm_else,
                return_type: "void".to_string(),
                args_stack: args.clone(),
                instructions: else_instructions,
            });
        }

        Ok(())
    }

    fn lower_while(
        &mut self,
        cond: &Expr,
        body: &Stmt,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        ret_type: &TypeInfo,
    ) -> IrResult<()> {
        let n = self.next_label();
        let label_cond = format!(".wlc{n}");
        let label_body = format!(".wlm{n}");
        let label_exit = format!(".wle{n}");

        out.push(Instruction::Jmp(label_cond.clone()));
        out.push(Instruction::Label(label_exit.clone()));

        let mut cond_instructions = Vec::new();
        self.lower_expr(cond, &mut cond_instructions, locals, args, types, reg(RCX, W16))?;
        cond_instructions.push(Instruction::Cmp(reg(RCX, W16), Operand::Imm(1)));
        cond_instructions.push(Instruction::Je(label_body.clone()));
        cond_instructions.push(Instruction::Jne(label_exit.clone()));
        self.segments.labels.push(Entry {
            id: label_cond.clone(),
            return_type: "void".to_string(),
            args_stack: args.clone(),
            instructions: cond_instructions,
        });

        let mut body_instructions = Vec::new();
        let mut body_locals = locals.child();
        let mut body_types = types.clone();
        self.lower_stmt(
            body,
            &mut body_instructions,
            &mut body_locals,
            args,
            &mut body_types,
            ret_type,
        )?;
        body_instructions.push(Instruction::Jmp(label_cond));
        self.segments.labels.push(Entry {
            id: label_body,
            return_type: "void".to_string(),
            args_stack: args.clone(),
            instructions: body_instructions,
        });

        Ok(())
    }

    /// Resolves a name to `(offset, width, is_arg)`. Locals are addressed
    /// `[rbp - offset]`, arguments `[rbp + offset]`.
    fn resolve_var(
        &self,
        name: &str,
        locals: &StackInfo,
        args: &StackInfo,
    ) -> IrResult<(i32, RegisterWidth, bool)> {
        if let Some(entry) = locals.get(name) {
            return Ok((entry.offset, RegisterWidth::for_size(entry.ty.size_bytes), false));
        }
        if let Some(entry) = args.get(name) {
            return Ok((entry.offset, RegisterWidth::for_size(entry.ty.size_bytes), true));
        }
        Err(IrError::Sema(SemaError::NotDeclared {
            name: name.to_string(),
        }))
    }

    // ---- expression lowering ----

    fn lower_expr(
        &mut self,
        expr: &Expr,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        target: Operand,
    ) -> IrResult<TypeInfo> {
        match expr {
            Expr::IntegerLiteral(text) => {
                let value: i64 = text.parse().unwrap_or(0);
                out.push(Instruction::Mov(target, Operand::Imm(value)));
                TypeInfo::for_name("int32").map_err(IrError::from)
            }
            Expr::FloatLiteral(_) => Err(IrError::UnsupportedFloatCodegen),
            Expr::BooleanLiteral(value) => {
                out.push(Instruction::Mov(target, Operand::Imm(if *value { 1 } else { 0 })));
                TypeInfo::for_name("bool").map_err(IrError::from)
            }
            Expr::StringLiteral(text) => {
                let label = mangle_data(text, "0");
                self.segments
                    .push_unique_data(label.clone(), format!("\"{text}\""), "0".to_string());
                out.push(Instruction::Lea(
                    target,
                    Operand::Mem(Address::Global(faxc_util::Symbol::intern(&label))),
                ));
                TypeInfo::for_name("string").map_err(IrError::from)
            }
            Expr::VariableCall(name) => {
                let (offset, width, is_arg) = self.resolve_var(name, locals, args)?;
                let mem_offset = if is_arg { offset } else { -offset };
                out.push(Instruction::Mov(
                    operand_at_width(&target, width),
                    Operand::Mem(Address::StackRelative { offset: mem_offset }),
                ));
                type_of(&Expr::VariableCall(name.clone()), types).map_err(IrError::from)
            }
            Expr::UnaryOperation(op, operand) => {
                let ty = self.lower_expr(operand, out, locals, args, types, target.clone())?;
                match op.as_str() {
                    "-" => {
                        out.push(Instruction::Neg(target));
                        Ok(ty)
                    }
                    _ => Err(IrError::UnsupportedOperator { op: op.clone() }),
                }
            }
            Expr::CastOperation(inner, target_name) => {
                self.lower_cast(inner, target_name, out, locals, args, types, target)
            }
            Expr::BinaryOperation(left, op, right) => {
                self.lower_binary(left, op, right, out, locals, args, types, target)
            }
            Expr::FunctionCall(name, call_args) => {
                self.lower_call(name, call_args, out, locals, args, types, target)
            }
        }
    }

    fn lower_binary(
        &mut self,
        left: &Expr,
        op: &str,
        right: &Expr,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        target: Operand,
    ) -> IrResult<TypeInfo> {
        let left_ty = type_of(left, types)?;
        if left_ty.integral_category == faxc_sem::IntegralCategory::Float {
            return Err(IrError::UnsupportedFloatCodegen);
        }
        let left_width = RegisterWidth::for_size(left_ty.size_bytes);

        self.lower_expr(left, out, locals, args, types, reg(RAX, left_width))?;

        let preserve_in_rcx = matches!(right, Expr::BinaryOperation(..));
        if preserve_in_rcx {
            out.push(Instruction::Mov(reg(RCX, left_width), reg(RAX, left_width)));
        }

        let right_ty = type_of(right, types)?;
        let right_width = RegisterWidth::for_size(right_ty.size_bytes);
        self.lower_expr(right, out, locals, args, types, reg(RBX, right_width))?;

        let effective_left = if preserve_in_rcx { RCX } else { RAX };
        let result_ty = faxc_sem_binary_result(&left_ty, op, &right_ty)?;

        match op {
            "+" => out.push(Instruction::Add(reg(effective_left, left_width), reg(RBX, right_width))),
            "-" => out.push(Instruction::Sub(reg(effective_left, left_width), reg(RBX, right_width))),
            "*" => out.push(Instruction::Imul(reg(effective_left, left_width), reg(RBX, right_width))),
            "/" => {
                out.push(Instruction::Mov(reg(RAX, left_width), reg(effective_left, left_width)));
                out.push(Instruction::Xor(reg(RDX, W64), reg(RDX, W64)));
                out.push(Instruction::Idiv(reg(RBX, right_width)));
            }
            "%" => {
                out.push(Instruction::Mov(reg(RAX, left_width), reg(effective_left, left_width)));
                out.push(Instruction::Xor(reg(RDX, W64), reg(RDX, W64)));
                out.push(Instruction::Idiv(reg(RBX, right_width)));
                out.push(Instruction::Mov(reg(effective_left, left_width), reg(RDX, left_width)));
            }
            "==" | "!=" | ">" | ">=" | "<" | "<=" => {
                out.push(Instruction::Cmp(reg(effective_left, left_width), reg(RBX, right_width)));
                let byte = reg(effective_left, W8);
                out.push(match op {
                    "==" => Instruction::Sete(byte),
                    "!=" => Instruction::Setne(byte),
                    ">" => Instruction::Setg(byte),
                    ">=" => Instruction::Setge(byte),
                    "<" => Instruction::Setl(byte),
                    _ => Instruction::Setle(byte),
                });
            }
            other => return Err(IrError::UnsupportedOperator { op: other.to_string() }),
        }

        let result_reg = if matches!(op, "/") {
            reg(RAX, left_width)
        } else if matches!(op, "==" | "!=" | ">" | ">=" | "<" | "<=") {
            reg(effective_left, W8)
        } else {
            reg(effective_left, left_width)
        };
        if result_reg != target {
            out.push(Instruction::Mov(target, result_reg));
        }

        Ok(result_ty)
    }

    fn lower_cast(
        &mut self,
        inner: &Expr,
        target_name: &str,
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        target: Operand,
    ) -> IrResult<TypeInfo> {
        let target_ty = TypeInfo::for_name(target_name)?;
        let inner_ty = type_of(inner, types)?;

        if target_ty.integral_category == faxc_sem::IntegralCategory::Float
            || inner_ty.integral_category == faxc_sem::IntegralCategory::Float
        {
            return Err(IrError::UnsupportedFloatCodegen);
        }

        if target_ty.integral_category != faxc_sem::IntegralCategory::String {
            // Numeric-to-numeric casts pass the value through; width
            // adjustment is the caller's responsibility.
            self.lower_expr(inner, out, locals, args, types, target)?;
            return Ok(target_ty);
        }

        match inner_ty.integral_category {
            faxc_sem::IntegralCategory::Bool => {
                let true_label = mangle_data("true", "0");
                let false_label = mangle_data("false", "0");
                self.segments.push_unique_data(
                    true_label.clone(),
                    "\"true\"".to_string(),
                    "0".to_string(),
                );
                self.segments.push_unique_data(
                    false_label.clone(),
                    "\"false\"".to_string(),
                    "0".to_string(),
                );
                let (value_reg, true_addr_reg) = scratch_pair_avoiding(&target);
                self.lower_expr(inner, out, locals, args, types, reg(value_reg, W8))?;
                out.push(Instruction::Lea(
                    target.clone(),
                    Operand::Mem(Address::Global(faxc_util::Symbol::intern(&false_label))),
                ));
                out.push(Instruction::Lea(
                    reg(true_addr_reg, W64),
                    Operand::Mem(Address::Global(faxc_util::Symbol::intern(&true_label))),
                ));
                out.push(Instruction::Cmp(reg(value_reg, W8), Operand::Imm(1)));
                out.push(Instruction::Cmove(target, reg(true_addr_reg, W64)));
                Ok(target_ty)
            }
            faxc_sem::IntegralCategory::Int | faxc_sem::IntegralCategory::UInt => {
                let format = if inner_ty.integral_category == faxc_sem::IntegralCategory::UInt {
                    if inner_ty.size_bytes > 4 { "%llu" } else { "%u" }
                } else if inner_ty.size_bytes > 4 {
                    "%lld"
                } else {
                    "%d"
                };
                let label = mangle_data(format, "0");
                self.segments.push_unique_data(
                    label.clone(),
                    format!("\"{format}\""),
                    "0".to_string(),
                );
                let (value_reg, _) = scratch_pair_avoiding(&target);
                let target_is_rdx = matches!(target_register(&target), Some(RDX));
                self.lower_expr(
                    inner,
                    out,
                    locals,
                    args,
                    types,
                    reg(value_reg, RegisterWidth::for_size(inner_ty.size_bytes)),
                )?;
                out.push(Instruction::Lea(
                    target,
                    Operand::Mem(Address::Global(faxc_util::Symbol::intern(&label))),
                ));
                if value_reg != RDX && !target_is_rdx {
                    out.push(Instruction::Mov(
                        reg(RDX, RegisterWidth::for_size(inner_ty.size_bytes)),
                        reg(value_reg, RegisterWidth::for_size(inner_ty.size_bytes)),
                    ));
                }
                Ok(target_ty)
            }
            _ => Err(IrError::UnsupportedCast {
                target: target_name.to_string(),
            }),
        }
    }

    fn lower_call(
        &mut self,
        name: &str,
        call_args: &[Expr],
        out: &mut Vec<Instruction>,
        locals: &mut StackInfo,
        args: &StackInfo,
        types: &mut TypeFrame,
        target: Operand,
    ) -> IrResult<TypeInfo> {
        self.segments.push_ext_lib("printf");

        if name == "printf" {
            for arg in call_args {
                self.lower_expr(arg, out, locals, args, types, reg(RCX, W64))?;
                out.push(Instruction::Call("printf".to_string()));
            }
            let newline_label = mangle_data("\\r\\n", "0");
            self.segments
                .push_unique_data(newline_label.clone(), "0x0d, 0x0a".to_string(), "0".to_string());
            out.push(Instruction::Lea(
                reg(RCX, W64),
                Operand::Mem(Address::Global(faxc_util::Symbol::intern(&newline_label))),
            ));
            out.push(Instruction::Call("printf".to_string()));
            return Ok(void_type());
        }

        let mut arg_type_names = Vec::with_capacity(call_args.len());
        let mut running_offset: i32 = 0;
        let mut stores = Vec::new();
        for arg in call_args {
            let ty = type_of(arg, types)?;
            let width = RegisterWidth::for_size(ty.size_bytes);
            self.lower_expr(arg, out, locals, args, types, reg(RSI, width))?;
            stores.push(Instruction::Mov(
                Operand::Mem(Address::CallArg {
                    offset: running_offset,
                }),
                reg(RSI, width),
            ));
            running_offset += ty.size_bytes as i32;
            arg_type_names.push(ty.name);
        }

        let mangled = mangle_function(name, &arg_type_names);
        let ret_ty = self
            .declared
            .get(&mangled)
            .cloned()
            .ok_or_else(|| IrError::UndeclaredFunction { name: name.to_string() })?;

        if running_offset > 0 {
            let aligned = (running_offset + 15) & !15;
            out.push(Instruction::Sub(reg(RSP, W64), Operand::Imm(aligned as i64)));
            out.extend(stores);
            out.push(Instruction::Call(mangled));
            out.push(Instruction::Add(reg(RSP, W64), Operand::Imm(aligned as i64)));
        } else {
            out.push(Instruction::Call(mangled));
        }

        if ret_ty.name != "void" {
            let width = RegisterWidth::for_size(ret_ty.size_bytes);
            let result = reg(RAX, width);
            if result != target {
                out.push(Instruction::Mov(target, result));
            }
        }

        Ok(ret_ty)
    }
}

impl Default for IrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn reg(r: PhysicalRegister, w: RegisterWidth) -> Operand {
    Operand::Reg(r, w)
}

fn operand_at_width(target: &Operand, width: RegisterWidth) -> Operand {
    match target {
        Operand::Reg(r, _) => Operand::Reg(*r, width),
        other => other.clone(),
    }
}

/// `void` has no entry in `TypeInfo::for_name`'s table (it names a real
/// storage class, not the absence of one); functions and `printf` calls
/// that return nothing use this sentinel instead.
fn void_type() -> TypeInfo {
    TypeInfo {
        name: "void".to_string(),
        integral_category: faxc_sem::IntegralCategory::Unknown,
        size_bytes: 0,
    }
}

fn type_info_for(name: &str) -> IrResult<TypeInfo> {
    if name == "void" {
        Ok(void_type())
    } else {
        TypeInfo::for_name(name).map_err(IrError::from)
    }
}

fn target_register(target: &Operand) -> Option<PhysicalRegister> {
    match target {
        Operand::Reg(r, _) => Some(*r),
        _ => None,
    }
}

/// Picks two scratch registers distinct from each other and from whatever
/// register `target` already occupies, so a cast can hold a source value
/// and a second label address without clobbering the destination.
fn scratch_pair_avoiding(target: &Operand) -> (PhysicalRegister, PhysicalRegister) {
    match target_register(target) {
        Some(RAX) => (RDX, RCX),
        Some(RDX) => (RAX, RCX),
        _ => (RAX, RDX),
    }
}

type SemaResult<T> = Result<T, SemaError>;

/// `faxc-sem`'s promotion table (`binary_result_type`) is private to that
/// crate; reached here through `type_of` over two synthetic bindings rather
/// than duplicating the rule set.
fn faxc_sem_binary_result(left: &TypeInfo, op: &str, right: &TypeInfo) -> IrResult<TypeInfo> {
    let mut frame = TypeFrame::new();
    frame.declare_local("__lhs", left.clone());
    frame.declare_local("__rhs", right.clone());
    let expr = Expr::BinaryOperation(
        Box::new(Expr::VariableCall("__lhs".to_string())),
        op.to_string(),
        Box::new(Expr::VariableCall("__rhs".to_string())),
    );
    type_of(&expr, &frame).map_err(IrError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lex::Lexer;
    use faxc_par::Parser;
    use faxc_util::diagnostic::Handler;

    fn generate(src: &str) -> Segments {
        let handler = Handler::new();
        let tokens = Lexer::new(src, &handler).tokenize().expect("lex failed");
        let items = Parser::new(tokens, &handler).parse().expect("parse failed");
        IrGenerator::generate(&items).expect("ir generation failed")
    }

    #[test]
    fn main_gets_prologue_shared_epilogue_and_xor_rax() {
        let segments = generate("int32 main() { return 0; }");
        let entry = &segments.text[0];
        assert_eq!(entry.id, "main");
        assert!(matches!(entry.instructions[0], Instruction::Push(_)));
        assert!(matches!(entry.instructions[1], Instruction::Mov(..)));
        assert!(matches!(entry.instructions[2], Instruction::Sub(..)));
        assert!(entry.instructions.iter().any(|i| matches!(i, Instruction::Xor(..))));
        assert!(matches!(entry.instructions.last(), Some(Instruction::Jmp(label)) if label == "exit"));
    }

    #[test]
    fn non_main_function_is_mangled_and_skips_xor() {
        let segments = generate("int32 add(int32 a, int32 b) { return a + b; }");
        let entry = &segments.text[0];
        assert_ne!(entry.id, "add");
        assert!(entry.id.starts_with('f'));
        assert!(!entry.instructions.iter().any(|i| matches!(i, Instruction::Xor(..))));
    }

    #[test]
    fn variable_declaration_stores_initializer_to_stack() {
        let segments = generate("int32 main() { int32 x = 5; return x; }");
        let entry = &segments.text[0];
        let has_store = entry.instructions.iter().any(|i| {
            matches!(i, Instruction::Mov(Operand::Mem(Address::StackRelative { .. }), Operand::Reg(..)))
        });
        assert!(has_store);
    }

    #[test]
    fn binary_addition_preserves_left_through_nested_right() {
        let segments = generate("int32 main() { return 1 + (2 + 3); }");
        let entry = &segments.text[0];
        assert!(entry
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Mov(Operand::Reg(PhysicalRegister::RCX, _), Operand::Reg(PhysicalRegister::RAX, _)))));
        assert!(entry.instructions.iter().any(|i| matches!(i, Instruction::Add(..))));
    }

    #[test]
    fn division_zeroes_rdx_before_idiv() {
        let segments = generate("int32 main() { return 10 / 2; }");
        let entry = &segments.text[0];
        let idx = entry
            .instructions
            .iter()
            .position(|i| matches!(i, Instruction::Idiv(_)))
            .expect("idiv present");
        assert!(matches!(entry.instructions[idx - 1], Instruction::Xor(..)));
    }

    #[test]
    fn if_else_emits_two_label_blocks() {
        let segments = generate("int32 main() { if (1 == 1) { return 1; } else { return 0; } }");
        assert_eq!(segments.labels.len(), 2);
        assert!(segments.labels[0].id.starts_with(".cndm"));
        assert!(segments.labels[1].id.starts_with(".cndm"));
    }

    #[test]
    fn while_loop_emits_condition_and_body_blocks() {
        let segments = generate("int32 main() { while (1 == 1) { return 0; } }");
        assert_eq!(segments.labels.len(), 2);
        assert!(segments.labels[0].id.starts_with(".wlc"));
        assert!(segments.labels[1].id.starts_with(".wlm"));
        assert!(matches!(segments.labels[1].instructions.last(), Some(Instruction::Jmp(l)) if l.starts_with(".wlc")));
    }

    #[test]
    fn undeclared_function_call_is_an_error() {
        let handler = Handler::new();
        let tokens = Lexer::new("int32 main() { return missing(); }", &handler)
            .tokenize()
            .unwrap();
        let items = Parser::new(tokens, &handler).parse().unwrap();
        assert!(matches!(
            IrGenerator::generate(&items),
            Err(IrError::UndeclaredFunction { .. })
        ));
    }

    #[test]
    fn uninitialized_string_declaration_gets_a_placeholder_not_a_zero() {
        let segments = generate("int32 main() { string s; return 0; }");
        let entry = &segments.text[0];
        assert!(entry.instructions.iter().any(|i| matches!(i, Instruction::Lea(..))));
        assert!(!entry
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Mov(Operand::Reg(PhysicalRegister::RDX, _), Operand::Imm(0)))));
        assert!(segments
            .data
            .iter()
            .any(|d| matches!(d, Declaration::Db { value, .. } if value == "\"\"")));
    }

    #[test]
    fn uninitialized_integral_declaration_still_gets_a_zero() {
        let segments = generate("int32 main() { int32 x; return x; }");
        let entry = &segments.text[0];
        assert!(entry
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Mov(Operand::Reg(PhysicalRegister::RDX, _), Operand::Imm(0)))));
    }

    #[test]
    fn bare_call_statement_lowers_as_expression_statement() {
        let segments = generate("int32 main() { printf(\"hi\"); return 0; }");
        let entry = &segments.text[0];
        assert!(entry
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Call(name) if name == "printf")));
    }

    #[test]
    fn string_cast_of_bool_materializes_true_false_labels() {
        let segments =
            generate("int32 main() { bool b = true; string s = b as string; return 0; }");
        assert!(segments
            .data
            .iter()
            .any(|d| matches!(d, Declaration::Db { value, .. } if value == "\"true\"")));
        assert!(segments
            .data
            .iter()
            .any(|d| matches!(d, Declaration::Db { value, .. } if value == "\"false\"")));
    }
}
