//! # exec.rs
//!
//! Evaluation of a parsed [`Tree`] against a data value.
//!
//! Each call site resolves its name again at execution time through the
//! chain `[execution scope, registration scope]` and then the builtins, so
//! functions injected for one execution take effect without reparsing.

use std::collections::HashMap;
use std::fmt::Write;

use smallvec::SmallVec;

use crate::error::{ExecError, Position};
use crate::options::{MissingKey, Options};
use crate::parser::{Call, Command, Node, Operand, Pipeline, Tree};
use crate::resolver::ScopeChain;
use crate::value::Value;

/// Arguments up to this count are collected without allocating.
const ARITY_THRESH: usize = 4;

static NIL: Value = Value::Nil;

/// Per-execution state visible to state-aware functions.
///
/// A fresh state is created for every execution and dropped when it ends;
/// it is never shared between executions.
#[derive(Debug)]
pub struct ExecState<'a> {
    template: &'a str,
    data: &'a Value,
    locals: HashMap<String, Value>,
}

impl<'a> ExecState<'a> {
    pub(crate) fn new(template: &'a str, data: &'a Value) -> Self {
        Self {
            template,
            data,
            locals: HashMap::new(),
        }
    }

    /// A state for calls made outside any template.
    pub(crate) fn detached() -> ExecState<'static> {
        ExecState::new("", &NIL)
    }

    /// Name of the template being executed.
    pub fn template(&self) -> &str {
        self.template
    }

    /// The data value the template was executed with.
    pub fn data(&self) -> &Value {
        self.data
    }

    /// Reads a request-local value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.locals.get(key)
    }

    /// Stores a request-local value, returning the previous one.
    pub fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        self.locals.insert(key.to_string(), value)
    }
}

struct Executor<'a> {
    tree: &'a Tree,
    chain: ScopeChain<'a>,
    options: &'a Options,
}

/// Renders `tree` with `data` into `out`.
pub(crate) fn execute<'a>(
    tree: &'a Tree,
    chain: ScopeChain<'a>,
    options: &'a Options,
    data: &Value,
    out: &mut String,
) -> Result<(), ExecError>
{
    let exec = Executor { tree, chain, options };
    let mut state = ExecState::new(&tree.name, data);

    for node in &tree.nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(pipeline) => {
                let value = exec.pipeline(&mut state, pipeline)?;
                let _ = write!(out, "{value}");
            },
        }
    }
    Ok(())
}

impl<'a> Executor<'a> {
    fn template(&self) -> String {
        self.tree.name.clone()
    }

    fn pipeline(&self, state: &mut ExecState<'_>, pipeline: &Pipeline) -> Result<Value, ExecError> {
        let mut value: Option<Value> = None;
        for command in &pipeline.commands {
            value = Some(self.command(state, command, value.take(), pipeline.pos)?);
        }
        Ok(value.unwrap_or_default())
    }

    fn command(
        &self,
        state: &mut ExecState<'_>,
        command: &Command,
        piped: Option<Value>,
        pos: Position,
    ) -> Result<Value, ExecError> {
        match (command, piped) {
            (Command::Call(call), piped) => self.call(state, call, piped),
            (Command::Operand(operand), None) => self.operand(state, operand),
            (Command::Operand(_), Some(_)) => Err(ExecError::Other {
                template: self.template(),
                message: "can't give argument to non-function".into(),
                pos,
            }),
        }
    }

    fn call(&self, state: &mut ExecState<'_>, call: &Call, piped: Option<Value>) -> Result<Value, ExecError> {
        let Some(resolved) = self.chain.resolve(&call.name) else {
            return Err(ExecError::UndefinedFunction {
                template: self.template(),
                name: call.name.clone(),
                pos: call.pos,
            });
        };

        let mut args: SmallVec<[Value; ARITY_THRESH]> = SmallVec::with_capacity(call.args.len() + 1);
        for operand in &call.args {
            args.push(self.operand(state, operand)?);
        }
        args.extend(piped);

        resolved.function.call(state, &args).map_err(|source| ExecError::Call {
            template: self.template(),
            name: call.name.clone(),
            pos: call.pos,
            source,
        })
    }

    fn operand(&self, state: &mut ExecState<'_>, operand: &Operand) -> Result<Value, ExecError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Dot => Ok(state.data().clone()),
            Operand::Field { path, pos } => self.field(state.data(), path, *pos),
            Operand::Call(call) => self.call(state, call, None),
            Operand::Pipeline(pipeline) => self.pipeline(state, pipeline),
        }
    }

    /// Walks a field chain from `data`. Fields of `Nil` are `Nil`.
    fn field(&self, data: &Value, path: &[String], pos: Position) -> Result<Value, ExecError> {
        let mut current = data;
        for name in path {
            current = match current {
                Value::Map(map) => match map.get(name) {
                    Some(value) => value,
                    None if self.options.missing_key == MissingKey::Error => {
                        return Err(ExecError::MissingKey {
                            template: self.template(),
                            key: name.clone(),
                            pos,
                        });
                    },
                    None => &NIL,
                },
                Value::Nil => &NIL,
                other => {
                    return Err(ExecError::Field {
                        template: self.template(),
                        field: name.clone(),
                        kind: other.kind(),
                        pos,
                    });
                },
            };
        }
        Ok(current.clone())
    }
}

#[cfg(test)]
mod exec_tests {
    use super::*;
    use crate::error::FuncError;
    use crate::function::{Arity, Function};
    use crate::parser;
    use crate::scope::Scope;
    use crate::value::Kind;

    fn run_with(source: &str, data: &Value, set: &Scope, exec: Option<&Scope>, options: &Options) -> Result<String, ExecError> {
        let tree = parser::parse("t", source, options, set).unwrap();
        let chain = ScopeChain::new().with_optional(exec).with(set);
        let mut out = String::new();
        execute(&tree, chain, options, data, &mut out)?;
        Ok(out)
    }

    fn run(source: &str, data: &Value) -> Result<String, ExecError> {
        run_with(source, data, &Scope::registration("set"), None, &Options::default())
    }

    #[test]
    fn test_text_and_literals() {
        assert_eq!(run("a {{1}} {{\"b\"}} {{true}} {{nil}}", &Value::Nil).unwrap(), "a 1 b true <no value>");
    }

    #[test]
    fn test_builtin_calls() {
        assert_eq!(run("{{eq 3 3}}", &Value::Nil).unwrap(), "true");
        assert_eq!(run("{{len \"abc\"}}", &Value::Nil).unwrap(), "3");
        assert_eq!(run("{{printf \"%s-%d\" \"x\" 4}}", &Value::Nil).unwrap(), "x-4");
    }

    #[test]
    fn test_fields() {
        let data = Value::map([("User", Value::map([("Name", "Ann")]))]);
        assert_eq!(run("{{.User.Name}}", &data).unwrap(), "Ann");
        assert_eq!(run("{{.User.Missing}}", &data).unwrap(), "<no value>");
        assert_eq!(run("{{.Nope.Deeper}}", &data).unwrap(), "<no value>");
    }

    #[test]
    fn test_field_on_non_map() {
        let data = Value::map([("N", 1)]);
        let err = run("{{.N.X}}", &data).unwrap_err();
        assert!(matches!(err, ExecError::Field { ref field, kind: Kind::Int, .. } if field == "X"));
    }

    #[test]
    fn test_missing_key_error() {
        let options = Options { missing_key: MissingKey::Error, ..Options::default() };
        let err = run_with("{{.Gone}}", &Value::map([("A", 1)]), &Scope::registration("set"), None, &options)
            .unwrap_err();
        assert!(matches!(err, ExecError::MissingKey { ref key, .. } if key == "Gone"));
    }

    #[test]
    fn test_pipeline_appends_previous_result() {
        let data = Value::map([("Name", "<Ann>")]);
        assert_eq!(run("{{.Name | html}}", &data).unwrap(), "&lt;Ann&gt;");
        assert_eq!(run("{{\"b\" | printf \"%s%s\" \"a\"}}", &Value::Nil).unwrap(), "ab");
        assert_eq!(run("{{(len \"abcd\") | lt 3}}", &Value::Nil).unwrap(), "true");
    }

    #[test]
    fn test_builtin_failure_is_call_error() {
        let err = run("x\n {{eq 3 \"3\"}}", &Value::Nil).unwrap_err();
        assert_eq!(err, ExecError::Call {
            template: "t".into(),
            name: "eq".into(),
            pos: Position { line: 2, col: 4 },
            source: FuncError::IncompatibleTypes(Kind::Int, Kind::Str),
        });
    }

    #[test]
    fn test_wrong_arg_count() {
        let err = run("{{not 1 2}}", &Value::Nil).unwrap_err();
        assert!(matches!(err, ExecError::Call { source: FuncError::WrongArgCount { got: 2, .. }, .. }));
    }

    #[test]
    fn test_execution_scope_shadows() {
        let mut set = Scope::registration("set");
        set.register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("set"))).unwrap();
        set.freeze();
        let mut exec = Scope::execution("exec");
        exec.register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("exec"))).unwrap();
        exec.register("eq", Function::infallible(Arity::AtLeast(0), |_| Value::from("mine"))).unwrap();

        let options = Options::default();
        let out = run_with("{{greet}} {{eq 1 \"x\"}}", &Value::Nil, &set, Some(&exec), &options).unwrap();
        assert_eq!(out, "exec mine");
        let out = run_with("{{greet}} {{eq 1 1}}", &Value::Nil, &set, None, &options).unwrap();
        assert_eq!(out, "set true");
    }

    #[test]
    fn test_undefined_at_execution() {
        let options = Options { skip_func_check: true, ..Options::default() };
        let err = run_with("{{later}}", &Value::Nil, &Scope::registration("set"), None, &options).unwrap_err();
        assert!(matches!(err, ExecError::UndefinedFunction { ref name, .. } if name == "later"));

        let mut exec = Scope::execution("exec");
        exec.register("later", Function::infallible(Arity::Exact(0), |_| Value::from("now"))).unwrap();
        let out = run_with("{{later}}", &Value::Nil, &Scope::registration("set"), Some(&exec), &options).unwrap();
        assert_eq!(out, "now");
    }

    #[test]
    fn test_state_is_per_execution() {
        let mut set = Scope::registration("set");
        set.register("counter", Function::stateful(Arity::Exact(0), |state, _| {
            let n = state.get("n").and_then(Value::as_index).unwrap_or(0) + 1;
            state.set("n", Value::from(n));
            Ok(Value::from(format!("{}:{n}", state.template())))
        })).unwrap();

        let options = Options::default();
        let out = run_with("{{counter}} {{counter}}", &Value::Nil, &set, None, &options).unwrap();
        assert_eq!(out, "t:1 t:2");
        let out = run_with("{{counter}}", &Value::Nil, &set, None, &options).unwrap();
        assert_eq!(out, "t:1");
    }

    #[test]
    fn test_call_builtin_with_function_value() {
        let add = Function::new(Arity::Exact(2), |args| match (&args[0], &args[1]) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            _ => Err(FuncError::BadArgument("ints only".into())),
        });
        let data = Value::map([("Add", Value::Func(add))]);
        assert_eq!(run("{{call .Add 2 3}}", &data).unwrap(), "5");
        assert!(run("{{call .Add 2 \"x\"}}", &data).is_err());
    }
}
