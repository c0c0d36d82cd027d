//! # parser.rs
//!
//! This module turns template text into a [`Tree`] of literal text and
//! actions.
//!
//! It supports:
//! - Literal operands: integers, floats, double-quoted strings, `true`,
//!   `false` and `nil`
//! - The data dot `.` and field chains `.A.B`
//! - Function calls `name arg ...`, bare identifiers as zero-argument calls,
//!   and parenthesized pipelines as arguments
//! - Pipelines `a | b | c`, where each stage receives the previous result as
//!   its final argument
//!
//! Every function name is resolved while parsing against the registration
//! scope of the template set and then the builtins, so a template that calls
//! an unknown function never makes it into a tree.
//!
//! # Notes
//! - Resolution at parse time only checks that a name exists. The executor
//!   resolves again, because execution may inject functions of its own.

use std::collections::VecDeque;

use crate::error::{ParseError, Position};
use crate::lexer::{self, LexKind, Lexeme, Lexemes};
use crate::options::Options;
use crate::resolver;
use crate::scope::Scope;
use crate::value::Value;

/// A parsed template.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub(crate) name: String,
    pub(crate) nodes: Vec<Node>,
}

impl Tree {
    /// The template's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Pipeline {
    pub commands: Vec<Command>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Call(Call),
    Operand(Operand),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Call {
    pub name: String,
    pub args: Vec<Operand>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Operand {
    Literal(Value),
    Dot,
    Field { path: Vec<String>, pos: Position },
    Call(Call),
    Pipeline(Box<Pipeline>),
}

macro_rules! lexeme_name_with_pos {
    ($parser: expr, $lexeme: expr) => {
        format!("{:?} at {}", $lexeme.text(), $parser.position($lexeme.start()))
    };
}

struct Parser<'a> {
    name: &'a str,
    source: &'a str,
    lexemes: VecDeque<Lexeme>,
    /// Registration scope to check calls against; `None` skips the check.
    funcs: Option<&'a Scope>,
}

/// Parses `source` into a tree named `name`.
///
/// # Arguments
///
/// * `name` - The template name used in diagnostics.
/// * `source` - The template text.
/// * `options` - Delimiters and the function-check switch.
/// * `funcs` - The template set's registration scope.
pub(crate) fn parse(name: &str, source: &str, options: &Options, funcs: &Scope) -> Result<Tree, ParseError>
{
    let lexemes: Lexemes = lexer::from(source, &options.left_delim, &options.right_delim)
        .map_err(|err| {
            let pos = Position::locate(source, err.offset);
            if err.unclosed {
                ParseError::UnclosedAction { template: name.to_string(), pos }
            } else {
                ParseError::Syntax { template: name.to_string(), message: err.message, pos }
            }
        })?;

    let mut parser = Parser {
        name,
        source,
        lexemes: lexemes.into(),
        funcs: (!options.skip_func_check).then_some(funcs),
    };
    let nodes = parser.nodes()?;
    Ok(Tree { name: name.to_string(), nodes })
}

impl<'a> Parser<'a> {
    fn position(&self, offset: usize) -> Position {
        Position::locate(self.source, offset)
    }

    fn syntax(&self, offset: usize, message: String) -> ParseError {
        ParseError::Syntax {
            template: self.name.to_string(),
            message,
            pos: self.position(offset),
        }
    }

    /// Offset used for errors at the end of input.
    fn end_offset(&self) -> usize {
        self.source.len()
    }

    fn peek_kind(&self) -> Option<LexKind> {
        self.lexemes.front().map(Lexeme::kind)
    }

    fn nodes(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while let Some(lexeme) = self.lexemes.front() {
            if lexeme.kind() == LexKind::Text {
                let text = lexeme.text().to_string();
                self.lexemes.pop_front();
                nodes.push(Node::Text(text));
                continue;
            }

            let pipeline = self.pipeline(LexKind::ActionEnd)?;
            nodes.push(Node::Action(pipeline));
        }
        Ok(nodes)
    }

    /// Parses `command ('|' command)*` up to and including `end`.
    fn pipeline(&mut self, end: LexKind) -> Result<Pipeline, ParseError> {
        let start = self.lexemes.front().map_or(self.end_offset(), Lexeme::start);
        let pos = self.position(start);
        let mut commands = Vec::new();

        loop {
            match self.lexemes.front() {
                None => return Err(self.syntax(self.end_offset(), "unexpected end of input in action".into())),
                Some(lexeme) if lexeme.kind() == end || lexeme.kind() == LexKind::Pipe => {
                    let lexeme = lexeme.clone();
                    if commands.is_empty() || (lexeme.kind() == LexKind::Pipe && self.pipe_is_dangling()) {
                        return Err(self.syntax(lexeme.start(), "missing value for command".into()));
                    }
                    self.lexemes.pop_front();
                    if lexeme.kind() == end {
                        return Ok(Pipeline { commands, pos });
                    }
                },
                Some(_) => {
                    let command = self.command(end)?;
                    if !commands.is_empty() && !matches!(command, Command::Call(_)) {
                        return Err(self.syntax(start, "non-function in pipeline stage".into()));
                    }
                    commands.push(command);
                },
            }
        }
    }

    /// Reports whether the pipe at the front is followed by nothing usable.
    fn pipe_is_dangling(&self) -> bool {
        matches!(
            self.lexemes.get(1).map(Lexeme::kind),
            None | Some(LexKind::Pipe) | Some(LexKind::ActionEnd) | Some(LexKind::RParen)
        )
    }

    fn at_command_end(&self, end: LexKind) -> bool {
        match self.peek_kind() {
            None => true,
            Some(kind) => kind == end || kind == LexKind::Pipe,
        }
    }

    fn command(&mut self, end: LexKind) -> Result<Command, ParseError> {
        let Some(first) = self.lexemes.pop_front() else {
            return Err(self.syntax(self.end_offset(), "missing command".into()));
        };

        if first.kind() == LexKind::Ident && !is_keyword(first.text()) {
            let mut call = self.call(&first)?;
            while !self.at_command_end(end) {
                let operand = self.operand()?;
                call.args.push(operand);
            }
            return Ok(Command::Call(call));
        }

        let operand = self.operand_from(first.clone())?;
        if !self.at_command_end(end) {
            return Err(self.syntax(first.start(), format!("can't give argument to non-function {}", first.text())));
        }
        Ok(Command::Operand(operand))
    }

    /// Starts a call to the identifier `lexeme`, resolving its name.
    fn call(&self, lexeme: &Lexeme) -> Result<Call, ParseError> {
        let name = lexeme.text();
        let pos = self.position(lexeme.start());

        if let Some(funcs) = self.funcs {
            if resolver::resolve(name, &[funcs]).is_none() {
                log::debug!("parse {}: undefined function {}", self.name, lexeme_name_with_pos!(self, lexeme));
                return Err(ParseError::UndefinedFunction {
                    template: self.name.to_string(),
                    name: name.to_string(),
                    pos,
                });
            }
        }

        Ok(Call { name: name.to_string(), args: Vec::new(), pos })
    }

    fn operand(&mut self) -> Result<Operand, ParseError> {
        match self.lexemes.pop_front() {
            Some(lexeme) => self.operand_from(lexeme),
            None => Err(self.syntax(self.end_offset(), "missing operand".into())),
        }
    }

    fn operand_from(&mut self, lexeme: Lexeme) -> Result<Operand, ParseError> {
        let text = lexeme.text();
        match lexeme.kind() {
            LexKind::Number => parse_number(text)
                .map(Operand::Literal)
                .ok_or_else(|| self.syntax(lexeme.start(), format!("bad number syntax: {text:?}"))),
            LexKind::Str => unquote(text)
                .map(|s| Operand::Literal(Value::Str(s)))
                .map_err(|msg| self.syntax(lexeme.start(), msg)),
            LexKind::Dot => Ok(Operand::Dot),
            LexKind::Field => Ok(Operand::Field {
                path: text.split('.').filter(|part| !part.is_empty()).map(str::to_string).collect(),
                pos: self.position(lexeme.start()),
            }),
            LexKind::Ident => match text {
                "true" => Ok(Operand::Literal(Value::Bool(true))),
                "false" => Ok(Operand::Literal(Value::Bool(false))),
                "nil" => Ok(Operand::Literal(Value::Nil)),
                _ => self.call(&lexeme).map(Operand::Call),
            },
            LexKind::LParen => {
                let pipeline = self.pipeline(LexKind::RParen)?;
                Ok(Operand::Pipeline(Box::new(pipeline)))
            },
            _ => Err(self.syntax(lexeme.start(), format!("unexpected {}", lexeme_name_with_pos!(self, lexeme)))),
        }
    }
}

fn is_keyword(text: &str) -> bool
{
    matches!(text, "true" | "false" | "nil")
}

/// Parses an integer or float literal.
fn parse_number(text: &str) -> Option<Value>
{
    let digits = text.replace('_', "");
    if digits.contains(['.', 'e', 'E']) {
        digits.parse::<f64>().ok().map(Value::Float)
    } else {
        digits.parse::<i64>().ok().map(Value::Int)
            .or_else(|| digits.parse::<u64>().ok().map(Value::Uint))
    }
}

/// Removes the quotes of a string literal and resolves its escapes.
fn unquote(text: &str) -> Result<String, String>
{
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| format!("malformed string {text}"))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(format!("unknown escape sequence \\{other}")),
            None => return Err("unterminated escape sequence".into()),
        }
    }
    Ok(out)
}
