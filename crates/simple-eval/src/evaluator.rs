//! Core expression and statement evaluator.

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::operators;
use crate::value::Value;
use simple_types::ast::*;
use simple_types::Span;
use std::io::{self, Write};

/// Default for [`EvaluatorOptions::max_depth`].
///
/// Any tree the parser accepts stays well below it.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Evaluator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of statements and expressions to visit before the run
    /// is aborted. `None` means no limit.
    pub max_steps: Option<u64>,
    /// Maximum nesting of statements and expressions being evaluated at
    /// once. Exceeding it fails with `StackOverflow`.
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluatorOptions {
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Run a program against a fresh environment, writing to stdout.
pub fn evaluate(program: &Program) -> EvalResult<()> {
    Evaluator::new(io::stdout()).eval_program(program)
}

/// The core evaluator: walks AST nodes and produces Values.
///
/// Owns the global [`Environment`] and the output sink used by `write`.
/// Separate evaluators never share state.
pub struct Evaluator<W: Write> {
    env: Environment,
    out: W,
    options: EvaluatorOptions,
    /// Nodes visited so far, checked against `options.max_steps`.
    steps: u64,
    /// Nodes currently being evaluated, checked against `options.max_depth`.
    depth: usize,
    /// Innermost node of the last failure.
    error_span: Option<Span>,
}

impl<W: Write> Evaluator<W> {
    /// Create an evaluator with the builtins bound and no step limit.
    pub fn new(out: W) -> Self {
        Self::with_options(out, EvaluatorOptions::default())
    }

    pub fn with_options(out: W, options: EvaluatorOptions) -> Self {
        Self {
            env: Environment::with_builtins(),
            out,
            options,
            steps: 0,
            depth: 0,
            error_span: None,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Mutable access to the environment, for hosts that bind their own
    /// natives before running a program.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Where the last failed run went wrong: the innermost statement or
    /// expression whose evaluation produced the error.
    pub fn error_span(&self) -> Option<Span> {
        self.error_span
    }

    /// Count one visited node. Returns error if the budget is exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        match self.options.max_steps {
            Some(limit) if self.steps > limit => Err(EvalError::StepLimitExceeded(limit)),
            _ => Ok(()),
        }
    }

    /// Run `eval` one nesting level deeper, tagging any error with `span`.
    fn nested<T>(
        &mut self,
        span: Span,
        eval: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let result = if self.depth >= self.options.max_depth {
            Err(EvalError::StackOverflow(self.options.max_depth))
        } else {
            self.depth += 1;
            let result = self.tick().and_then(|()| eval(self));
            self.depth -= 1;
            result
        };
        result.map_err(|e| self.locate(e, span))
    }

    /// Remember `span` unless a deeper node already claimed the error.
    fn locate(&mut self, error: EvalError, span: Span) -> EvalError {
        self.error_span.get_or_insert(span);
        error
    }

    // ══════════════════════════════════════════════════════════════════════
    // Block & Statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute every top-level statement in order.
    pub fn eval_program(&mut self, program: &Program) -> EvalResult<()> {
        tracing::debug!(statements = program.stmts.len(), "evaluating program");
        self.error_span = None;
        let result = self.eval_stmts(&program.stmts);
        // Whatever `write` produced before a failure still reaches the sink.
        let flushed = self.out.flush();
        let result = result.and_then(|()| flushed.map_err(EvalError::from));
        match &result {
            Ok(()) => tracing::debug!(steps = self.steps, "program finished"),
            Err(e) => tracing::debug!(steps = self.steps, error = %e, "program aborted"),
        }
        result
    }

    pub fn eval_block(&mut self, block: &Block) -> EvalResult<()> {
        self.eval_stmts(&block.stmts)
    }

    fn eval_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    /// Execute a single statement. Only a call can produce a value.
    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Option<Value>> {
        self.nested(stmt.span(), |this| this.eval_stmt_kind(stmt))
    }

    fn eval_stmt_kind(&mut self, stmt: &Stmt) -> EvalResult<Option<Value>> {
        match stmt {
            Stmt::Assignment(assign) => {
                self.eval_assignment(assign)?;
                Ok(None)
            }
            Stmt::Call(call) => self.eval_call(call),
            Stmt::While(while_block) => {
                self.eval_while(while_block)?;
                Ok(None)
            }
            Stmt::If(if_block) => {
                self.eval_if(if_block)?;
                Ok(None)
            }
        }
    }

    fn eval_assignment(&mut self, assign: &Assignment) -> EvalResult<()> {
        let value = self.eval_expr(&assign.value)?;
        tracing::trace!(name = %assign.target.name, value = %value, "assign");
        self.env.assign(&assign.target.name, value);
        Ok(())
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    /// Run a `while`/`until` loop.
    ///
    /// The condition is evaluated exactly once per check. If the first check
    /// fails the else-branch runs once instead of the body.
    fn eval_while(&mut self, while_block: &WhileBlock) -> EvalResult<()> {
        let keyword = while_block.kind.keyword();
        let mut continues = while_block
            .kind
            .continues(self.eval_condition(&while_block.condition, keyword)?);

        if !continues {
            if let Some(else_branch) = &while_block.else_branch {
                self.eval_else(else_branch)?;
            }
            return Ok(());
        }

        let mut iterations: u64 = 0;
        while continues {
            self.eval_block(&while_block.body)?;
            iterations += 1;
            continues = while_block
                .kind
                .continues(self.eval_condition(&while_block.condition, keyword)?);
        }
        tracing::trace!(keyword, iterations, "loop finished");
        Ok(())
    }

    fn eval_if(&mut self, if_block: &IfBlock) -> EvalResult<()> {
        if self.eval_condition(&if_block.condition, "if")? {
            self.eval_block(&if_block.then_block)
        } else if let Some(else_branch) = &if_block.else_branch {
            self.eval_else(else_branch)
        } else {
            Ok(())
        }
    }

    fn eval_else(&mut self, else_branch: &ElseIfBlock) -> EvalResult<()> {
        match else_branch {
            ElseIfBlock::Block(block) => self.eval_block(block),
            ElseIfBlock::If(if_block) => self.eval_if(if_block),
        }
    }

    /// Evaluate a condition that must produce a boolean.
    fn eval_condition(&mut self, condition: &Expr, keyword: &str) -> EvalResult<bool> {
        let value = self.eval_expr(condition)?;
        value.as_bool().map_err(|e| {
            let e = match e {
                EvalError::NotBoolean(msg) => {
                    EvalError::NotBoolean(format!("`{keyword}` condition: {msg}"))
                }
                other => other,
            };
            self.locate(e, condition.span)
        })
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    ///
    /// A call that returns nothing yields `null` in expression position.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.nested(expr.span, |this| this.eval_expr_kind(expr))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Constant(lit) => Value::from_literal(lit),
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Call(call) => Ok(self.eval_call(call)?.unwrap_or(Value::Null)),
            ExprKind::Additive { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                operators::arithmetic(*op, &lv, &rv)
            }
            ExprKind::Comparison { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                operators::comparison(*op, &lv, &rv)
            }
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    // ── Identifiers & Calls ──────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// Evaluate `name(args...)`.
    ///
    /// The target is resolved before any argument is evaluated, so a call
    /// to an unbound or non-callable name has no argument side effects.
    fn eval_call(&mut self, call: &FunctionCall) -> EvalResult<Option<Value>> {
        let name = &call.name.name;
        let native = match self.env.get(name) {
            Some(Value::Native(native)) => native.clone(),
            Some(other) => {
                return Err(EvalError::NotCallable(format!(
                    "'{name}' is {}, not a function",
                    other.type_name()
                )))
            }
            None => return Err(EvalError::UndefinedVariable(name.clone())),
        };

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg)?);
        }
        tracing::trace!(function = %name, args = args.len(), "call");
        native.call(&mut self.out, args)
    }
}
