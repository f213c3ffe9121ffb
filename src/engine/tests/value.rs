use crate::engine::*;

fn kind_of(isolate: &Isolate, source: &str) -> ValueKind {
    isolate.compile(source, "kind.js").unwrap().run().unwrap().kind()
}

#[test]
fn value_kinds() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();

    assert_eq!(ValueKind::Undefined, kind_of(&isolate, "undefined"));
    assert_eq!(ValueKind::Undefined, kind_of(&isolate, "var declared = 1;"));
    assert_eq!(ValueKind::Null, kind_of(&isolate, "null"));
    assert_eq!(ValueKind::Boolean, kind_of(&isolate, "1 < 2"));
    assert_eq!(ValueKind::Number, kind_of(&isolate, "1.5"));
    assert_eq!(ValueKind::BigInt, kind_of(&isolate, "10n"));
    assert_eq!(ValueKind::String, kind_of(&isolate, "'abc'"));
    assert_eq!(ValueKind::Symbol, kind_of(&isolate, "Symbol('s')"));
    assert_eq!(ValueKind::Function, kind_of(&isolate, "(() => 1)"));
    assert_eq!(ValueKind::Array, kind_of(&isolate, "[1, 2]"));
    assert_eq!(ValueKind::Promise, kind_of(&isolate, "Promise.resolve(1)"));
    assert_eq!(ValueKind::Object, kind_of(&isolate, "({})"));
    assert_eq!("bigint", ValueKind::BigInt.to_string());
}

#[test]
fn coerce_boolean() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();
    let eval = |source: &str| {
        isolate
            .compile(source, "bool.js")
            .unwrap()
            .run()
            .unwrap()
            .coerce_boolean()
            .unwrap()
    };

    assert!(!eval("undefined"));
    assert!(!eval("null"));
    assert!(!eval("0"));
    assert!(!eval("''"));
    assert!(eval("1"));
    assert!(eval("'a'"));
    assert!(eval("({})"));
}

#[test]
fn coerce_number() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();
    let eval = |source: &str| {
        isolate
            .compile(source, "number.js")
            .unwrap()
            .run()
            .unwrap()
            .coerce_number()
            .unwrap()
    };

    assert!(eval("undefined").is_nan());
    assert_eq!(0.0, eval("null"));
    assert_eq!(12.0, eval("'12'"));
    assert_eq!(1.0, eval("true"));
    assert!(eval("({})").is_nan());
    assert_eq!(7.0, eval("({ valueOf() { return 7; } })"));
}

#[test]
fn coerce_string() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();
    let eval = |source: &str| {
        isolate
            .compile(source, "string.js")
            .unwrap()
            .run()
            .unwrap()
            .coerce_string()
            .unwrap()
    };

    assert_eq!("undefined", eval("undefined"));
    assert_eq!("null", eval("null"));
    assert_eq!("123", eval("123"));
    assert_eq!("abc", eval("'abc'"));
    assert_eq!("1,2", eval("[1, 2]"));
    assert_eq!("[object Object]", eval("({})"));
}

#[test]
fn coercion_exceptions_are_runtime_errors() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();

    let value = isolate
        .compile("({ valueOf() { throw new Error('nope'); } })", "throwing.js")
        .unwrap()
        .run()
        .unwrap();
    let err = value.coerce_number().unwrap_err();
    assert!(err.is_runtime(), "unexpected error: {:?}", err);
    assert!(err.to_string().contains("nope"), "{}", err);

    let symbol = isolate
        .compile("Symbol('s')", "symbol.js")
        .unwrap()
        .run()
        .unwrap();
    let err = symbol.coerce_string().unwrap_err();
    assert!(err.is_runtime(), "unexpected error: {:?}", err);
    assert!(err.to_string().contains("Symbol"), "{}", err);

    // the isolate is still usable after a failed coercion
    let value = isolate.compile("1 + 2", "after.js").unwrap().run().unwrap();
    assert_eq!(3.0, value.coerce_number().unwrap());
}

#[test]
fn into_function() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();

    let value = isolate
        .compile("(function named(y) { return y; })", "func.js")
        .unwrap()
        .run()
        .unwrap();
    assert!(value.is_function());
    let function = value.into_function().unwrap();
    assert_eq!("named", function.name().unwrap());
    function.dispose();

    let anonymous = isolate
        .compile("(() => {})", "arrow.js")
        .unwrap()
        .run()
        .unwrap()
        .into_function()
        .unwrap();
    assert_eq!("", anonymous.name().unwrap());
}

#[test]
fn into_function_rejects_non_callables() {
    let instance = Instance::new().unwrap();
    let isolate = instance.new_isolate().unwrap();

    let value = isolate.compile("5", "five.js").unwrap().run().unwrap();
    assert!(!value.is_function());
    match value.into_function() {
        Err(EngineError::FromJsConversionError { from, to }) => {
            assert_eq!("number", from);
            assert_eq!("function", to);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let value = isolate.compile("[1, 2]", "array.js").unwrap().run().unwrap();
    assert_eq!(ValueKind::Array, value.kind());
    assert!(value.into_function().is_err());
}
