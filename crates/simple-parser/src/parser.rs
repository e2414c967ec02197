//! Pest-backed parser: turns pest pairs into the typed AST.

use lazy_static::lazy_static;
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser as _;
use pest_derive::Parser;
use simple_types::ast::*;
use simple_types::{ParseError, SourceFile, Span};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        .op(
            Op::infix(Rule::eq, Assoc::Left)
                | Op::infix(Rule::neq, Assoc::Left)
                | Op::infix(Rule::gt, Assoc::Left)
                | Op::infix(Rule::lt, Assoc::Left)
        )                                               // `==`, `!=`, `>`, `<`
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left)) // `+`, `-`
        .op(Op::infix(Rule::mul, Assoc::Left));         // `*`
}

#[derive(Parser)]
#[grammar = "simple.pest"]
pub struct SimpleParser;

/// Parse a whole source file into a [`Program`].
pub fn parse(source: &SourceFile) -> Result<Program, ParseError> {
    check_nesting(source)?;
    let mut pairs = SimpleParser::parse(Rule::program, &source.source)
        .map_err(|e| convert_error(source, e))?;
    let builder = Builder { source };
    let root = builder.next(&mut pairs, "program", Span::point(1, 1))?;
    let program = builder.program(root)?;
    tracing::debug!(
        file = %source.name,
        statements = program.stmts.len(),
        "parsed program"
    );
    Ok(program)
}

/// Deepest bracket nesting, `(` and `{` combined, accepted in a script.
pub const MAX_NESTING: usize = 64;

/// Tallest expression tree accepted. Every operator, parenthesis and call
/// adds one level.
pub const MAX_EXPR_DEPTH: usize = 256;

/// Reject over-nested brackets before pest descends into them.
///
/// String literals and `//` comments are skipped; unbalanced brackets are
/// left for the grammar to report.
fn check_nesting(source: &SourceFile) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut chars = source.source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '/') if chars.peek().map(|&(_, next)| next) == Some('/') => {
                while chars.next_if(|&(_, next)| next != '\n').is_some() {}
            }
            (None, '(' | '{') => {
                depth += 1;
                if depth > MAX_NESTING {
                    let (line, col) = source.position(offset);
                    return Err(ParseError::new(
                        source,
                        format!("brackets nest deeper than {MAX_NESTING} levels"),
                        Span::point(line, col),
                    ));
                }
            }
            (None, ')' | '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn rule_name(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of input".into(),
        Rule::expression => "expression".into(),
        Rule::identifier => "identifier".into(),
        Rule::block => "block".into(),
        Rule::constant => "literal".into(),
        Rule::function_call => "function call".into(),
        Rule::assignment => "assignment".into(),
        Rule::if_block => "if block".into(),
        Rule::while_block => "while block".into(),
        Rule::while_kw => "`while` or `until`".into(),
        Rule::kw_else => "`else`".into(),
        Rule::eq | Rule::neq | Rule::gt | Rule::lt | Rule::add | Rule::sub | Rule::mul => {
            "operator".into()
        }
        other => format!("{other:?}"),
    }
}

fn convert_error(source: &SourceFile, err: pest::error::Error<Rule>) -> ParseError {
    let err = err.renamed_rules(rule_name);
    let span = match &err.line_col {
        LineColLocation::Pos((line, col)) => Span::point(*line as u32, *col as u32),
        LineColLocation::Span((sl, sc), (el, ec)) => {
            Span::new(*sl as u32, *sc as u32, *el as u32, *ec as u32)
        }
    };
    let message = match &err.variant {
        ErrorVariant::ParsingError { .. } => err.variant.message().into_owned(),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    ParseError::new(source, message, span)
}

/// Walks pest pairs and builds AST nodes.
///
/// The grammar already guarantees node shape; a missing child can only mean
/// the grammar and this builder disagree, which is reported as a parse error
/// rather than a panic.
struct Builder<'src> {
    source: &'src SourceFile,
}

impl<'src> Builder<'src> {
    fn next<'i>(
        &self,
        pairs: &mut impl Iterator<Item = Pair<'i, Rule>>,
        expected: &str,
        at: Span,
    ) -> Result<Pair<'i, Rule>, ParseError> {
        pairs.next().ok_or_else(|| self.malformed(expected, at))
    }

    /// Convert a pest pair's byte range into a line/column [`Span`].
    fn span_of(&self, pair: &Pair<'_, Rule>) -> Span {
        let span = pair.as_span();
        self.source.span(span.start(), span.end())
    }

    fn malformed(&self, expected: &str, at: Span) -> ParseError {
        ParseError::new(self.source, format!("malformed syntax tree: missing {expected}"), at)
    }

    fn unexpected(&self, pair: &Pair<'_, Rule>) -> ParseError {
        ParseError::new(
            self.source,
            format!("malformed syntax tree: unexpected {:?}", pair.as_rule()),
            self.span_of(pair),
        )
    }

    // ── Statements ───────────────────────────────────────────────────────────

    fn program(&self, pair: Pair<'_, Rule>) -> Result<Program, ParseError> {
        let span = self.span_of(&pair);
        let stmts = self.lines(pair.into_inner())?;
        Ok(Program { stmts, span })
    }

    fn block(&self, pair: Pair<'_, Rule>) -> Result<Block, ParseError> {
        let span = self.span_of(&pair);
        let stmts = self.lines(pair.into_inner())?;
        Ok(Block { stmts, span })
    }

    fn lines(&self, pairs: Pairs<'_, Rule>) -> Result<Vec<Stmt>, ParseError> {
        pairs
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| self.stmt(p))
            .collect()
    }

    fn stmt(&self, pair: Pair<'_, Rule>) -> Result<Stmt, ParseError> {
        match pair.as_rule() {
            Rule::assignment => self.assignment(pair).map(Stmt::Assignment),
            Rule::function_call => self.function_call(pair).map(Stmt::Call),
            Rule::if_block => self.if_block(pair).map(Stmt::If),
            Rule::while_block => self.while_block(pair).map(Stmt::While),
            _ => Err(self.unexpected(&pair)),
        }
    }

    fn assignment(&self, pair: Pair<'_, Rule>) -> Result<Assignment, ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner();
        let target = self.ident(self.next(&mut inner, "assignment target", span)?);
        let value = self.expr(self.next(&mut inner, "assigned expression", span)?)?;
        Ok(Assignment {
            target,
            value,
            span,
        })
    }

    fn function_call(&self, pair: Pair<'_, Rule>) -> Result<FunctionCall, ParseError> {
        self.call(pair).map(|(call, _)| call)
    }

    /// A call and the depth of its deepest argument.
    fn call(&self, pair: Pair<'_, Rule>) -> Result<(FunctionCall, usize), ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner();
        let name = self.ident(self.next(&mut inner, "function name", span)?);
        let mut args = Vec::new();
        let mut depth = 0;
        for arg in inner {
            let (arg, arg_depth) = self.expr_depth(arg)?;
            depth = depth.max(arg_depth);
            args.push(arg);
        }
        Ok((FunctionCall { name, args, span }, depth))
    }

    fn if_block(&self, pair: Pair<'_, Rule>) -> Result<IfBlock, ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner().filter(|p| !is_keyword(p));
        let condition = self.expr(self.next(&mut inner, "condition", span)?)?;
        let then_block = self.block(self.next(&mut inner, "block", span)?)?;
        let else_branch = inner.next().map(|p| self.else_if_block(p)).transpose()?;
        Ok(IfBlock {
            condition,
            then_block,
            else_branch,
            span,
        })
    }

    fn while_block(&self, pair: Pair<'_, Rule>) -> Result<WhileBlock, ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_else);
        let keyword = self.next(&mut inner, "loop keyword", span)?;
        let kind = match keyword.as_str() {
            "until" => LoopKind::Until,
            _ => LoopKind::While,
        };
        let condition = self.expr(self.next(&mut inner, "condition", span)?)?;
        let body = self.block(self.next(&mut inner, "loop body", span)?)?;
        let else_branch = inner.next().map(|p| self.else_if_block(p)).transpose()?;
        Ok(WhileBlock {
            kind,
            condition,
            body,
            else_branch,
            span,
        })
    }

    fn else_if_block(&self, pair: Pair<'_, Rule>) -> Result<ElseIfBlock, ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner();
        let alternative = self.next(&mut inner, "else branch", span)?;
        match alternative.as_rule() {
            Rule::block => self.block(alternative).map(ElseIfBlock::Block),
            Rule::if_block => self
                .if_block(alternative)
                .map(|b| ElseIfBlock::If(Box::new(b))),
            _ => Err(self.unexpected(&alternative)),
        }
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    fn expr(&self, pair: Pair<'_, Rule>) -> Result<Expr, ParseError> {
        self.expr_depth(pair).map(|(expr, _)| expr)
    }

    /// Build an expression and report the height of its tree.
    fn expr_depth(&self, pair: Pair<'_, Rule>) -> Result<(Expr, usize), ParseError> {
        match pair.as_rule() {
            Rule::expression => PRATT_PARSER
                .map_primary(|primary| self.expr_depth(primary))
                .map_infix(|lhs, op, rhs| {
                    let ((left, left_depth), (right, right_depth)) = (lhs?, rhs?);
                    let span = left.span.merge(right.span);
                    let depth = self.deeper(left_depth.max(right_depth), span)?;
                    let (left, right) = (Box::new(left), Box::new(right));
                    let kind = match op.as_rule() {
                        Rule::add => ExprKind::Additive { left, op: BinOp::Add, right },
                        Rule::sub => ExprKind::Additive { left, op: BinOp::Sub, right },
                        Rule::mul => ExprKind::Additive { left, op: BinOp::Mul, right },
                        Rule::eq => ExprKind::Comparison { left, op: BinOp::Eq, right },
                        Rule::neq => ExprKind::Comparison { left, op: BinOp::NotEq, right },
                        Rule::gt => ExprKind::Comparison { left, op: BinOp::Greater, right },
                        Rule::lt => ExprKind::Comparison { left, op: BinOp::Less, right },
                        _ => return Err(self.unexpected(&op)),
                    };
                    Ok((Expr::new(kind, span), depth))
                })
                .parse(pair.into_inner()),
            Rule::constant => Ok((self.constant(pair)?, 1)),
            Rule::identifier => {
                let span = self.span_of(&pair);
                let name = pair.as_str().to_string();
                Ok((Expr::new(ExprKind::Identifier(name), span), 1))
            }
            Rule::function_call => {
                let span = self.span_of(&pair);
                let (call, depth) = self.call(pair)?;
                let depth = self.deeper(depth, span)?;
                Ok((Expr::new(ExprKind::Call(call), span), depth))
            }
            Rule::paren => {
                let span = self.span_of(&pair);
                let mut inner = pair.into_inner();
                let inner = self.next(&mut inner, "expression", span)?;
                let (expr, depth) = self.expr_depth(inner)?;
                let depth = self.deeper(depth, span)?;
                Ok((Expr::new(ExprKind::Paren(Box::new(expr)), span), depth))
            }
            _ => Err(self.unexpected(&pair)),
        }
    }

    /// One level above `depth`, or an error past [`MAX_EXPR_DEPTH`].
    fn deeper(&self, depth: usize, span: Span) -> Result<usize, ParseError> {
        if depth >= MAX_EXPR_DEPTH {
            return Err(ParseError::new(
                self.source,
                format!("expression nests deeper than {MAX_EXPR_DEPTH} levels"),
                span,
            ));
        }
        Ok(depth + 1)
    }

    fn constant(&self, pair: Pair<'_, Rule>) -> Result<Expr, ParseError> {
        let span = self.span_of(&pair);
        let mut inner = pair.into_inner();
        let token = self.next(&mut inner, "literal", span)?;
        let kind = match token.as_rule() {
            Rule::integer => LiteralKind::Integer,
            Rule::float => LiteralKind::Float,
            Rule::string => LiteralKind::String,
            Rule::bool => LiteralKind::Bool,
            Rule::null => LiteralKind::Null,
            _ => return Err(self.unexpected(&token)),
        };
        Ok(Expr::new(
            ExprKind::Constant(Literal::new(kind, token.as_str())),
            span,
        ))
    }

    fn ident(&self, pair: Pair<'_, Rule>) -> Ident {
        Ident::new(pair.as_str(), self.span_of(&pair))
    }
}

fn is_keyword(pair: &Pair<'_, Rule>) -> bool {
    matches!(pair.as_rule(), Rule::kw_if | Rule::kw_else)
}
