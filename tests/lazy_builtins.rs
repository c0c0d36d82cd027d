//! The builtin scope must not exist until a lookup falls through to it.
//!
//! This lives in its own test binary so that no other test in the process
//! can have constructed the builtins first.

use tmplfunc::resolver::Origin;
use tmplfunc::{cache, resolve, Arity, Function, Scope, TemplateSet, Value};

#[test]
fn test_builtins_built_only_on_fallthrough() {
    let mut set = TemplateSet::new("lazy");
    set.register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("hi")))
        .unwrap();
    set.register("shout", Function::infallible(Arity::Exact(1), |args| {
        Value::from(args[0].to_string().to_uppercase())
    }))
    .unwrap();
    set.parse("page", "{{ greet }} {{ .Name | shout }}").unwrap();

    let data = Value::map([("Name", "ann")]);
    assert_eq!(set.execute("page", &data).unwrap(), "hi ANN");

    let mut request = Scope::execution("request");
    request
        .register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("hello")))
        .unwrap();
    assert_eq!(set.execute_with("page", &data, request).unwrap(), "hello ANN");

    let found = resolve("greet", &[set.funcs()]).unwrap();
    assert_eq!(found.origin, Origin::Scope { index: 0, name: "lazy" });
    assert!(!cache::is_initialized(), "builtins constructed without a fall-through");

    let eq = resolve("eq", &[set.funcs()]).unwrap();
    assert_eq!(eq.origin, Origin::Builtin);
    assert!(cache::is_initialized());
    assert!(std::ptr::eq(cache::builtins(), cache::builtins()));
}
