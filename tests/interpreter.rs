use mirror::{
    Capabilities, DiagnosticKind, Host, HostConfig, Interpreter, MirrorError, SourceSpan, Value,
};

fn interpreter(capabilities: Capabilities) -> Interpreter<Vec<u8>> {
    let config = HostConfig::new("Demo v1.0", "(c) 2025");
    Interpreter::with_host(Host::new(config, capabilities, Vec::new()))
}

fn eval(source: &str) -> Value {
    interpreter(Capabilities::console())
        .eval_source(source)
        .expect("evaluation should succeed")
}

fn eval_error(source: &str) -> MirrorError {
    match interpreter(Capabilities::console()).eval_source(source) {
        Ok(value) => panic!("expected error, received value {value:?}"),
        Err(err) => err,
    }
}

fn expect_int(value: &Value) -> i64 {
    match value.as_int() {
        Some(n) => n,
        None => panic!("expected Integer, found {}", value.type_name()),
    }
}

fn output_of(interpreter: Interpreter<Vec<u8>>) -> String {
    String::from_utf8(interpreter.into_host().into_output()).expect("utf-8 output")
}

#[test]
fn evaluates_host_arithmetic() {
    assert_eq!(expect_int(&eval("21 * 2")), 42);
}

#[test]
fn respects_precedence_and_grouping() {
    assert_eq!(expect_int(&eval("2 + 4 * 10")), 42);
    assert_eq!(expect_int(&eval("(2 + 4) * 7")), 42);
    assert_eq!(expect_int(&eval("-(-42)")), 42);
}

#[test]
fn integer_division_floors() {
    assert_eq!(expect_int(&eval("-7 / 2")), -4);
    assert_eq!(expect_int(&eval("-7 % 3")), 2);
}

#[test]
fn returns_last_statement_value() {
    let value = eval(
        r#"
        # leading comment
        1 + 1
        40 + 2
        "#,
    );
    assert_eq!(expect_int(&value), 42);
}

#[test]
fn empty_source_is_nil() {
    assert_eq!(eval("  \n# nothing\n"), Value::nil());
}

#[test]
fn concatenates_strings() {
    assert_eq!(eval(r#""Demo" + " " + "v1.0""#), Value::string("Demo v1.0"));
}

#[test]
fn host_constants_are_visible() {
    assert_eq!(eval("DESCRIPTION"), Value::string("Demo v1.0"));
    assert_eq!(eval("COPYRIGHT"), Value::string("(c) 2025"));
}

#[test]
fn puts_writes_through_the_host() {
    let mut interpreter = interpreter(Capabilities::console());
    let value = interpreter
        .eval_source("puts DESCRIPTION\nputs COPYRIGHT; puts\nputs 21 * 2\n42")
        .expect("evaluation should succeed");
    assert_eq!(expect_int(&value), 42);
    assert_eq!(output_of(interpreter), "Demo v1.0\n(c) 2025\n\n42\n");
}

#[test]
fn puts_statement_evaluates_to_nil() {
    assert_eq!(eval("puts 1"), Value::nil());
}

#[test]
fn puts_is_undefined_without_output_capability() {
    let mut interpreter = interpreter(Capabilities::sandboxed());
    let err = interpreter
        .eval_source("1\nputs DESCRIPTION")
        .expect_err("puts must fail");
    let diag = err.diagnostic().expect("diagnostic");
    assert_eq!(diag.kind, DiagnosticKind::Runtime);
    assert!(diag.message.contains("puts"));
    assert_eq!(diag.span, Some(SourceSpan::new(2, 18)));
    assert!(output_of(interpreter).is_empty());
}

#[test]
fn sandboxed_host_still_evaluates() {
    let mut interpreter = interpreter(Capabilities::sandboxed());
    let value = interpreter.eval_source("21 * 2").expect("evaluation");
    assert_eq!(expect_int(&value), 42);
}

#[test]
fn unknown_constant_is_reported() {
    let err = eval_error("MRUBY_VERSION");
    let diag = err.diagnostic().expect("diagnostic");
    assert_eq!(diag.message, "uninitialized constant MRUBY_VERSION");
    assert_eq!(diag.span, Some(SourceSpan::new(0, 13)));
    assert!(diag.notes[0].contains("DESCRIPTION"));
}

#[test]
fn lowercase_names_are_undefined() {
    let err = eval_error("answer");
    assert!(err.to_string().contains("undefined local variable or method 'answer'"));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let err = eval_error("1 / 0");
    let diag = err.diagnostic().expect("diagnostic");
    assert_eq!(diag.kind, DiagnosticKind::Runtime);
    assert_eq!(diag.message, "divided by 0");
}

#[test]
fn overflow_is_a_runtime_error() {
    let err = eval_error("9223372036854775807 + 1");
    assert!(err.to_string().contains("integer overflow"));
}

#[test]
fn mixed_operands_are_rejected() {
    let err = eval_error(r#""a" * 2"#);
    assert!(err.to_string().contains("undefined method '*' for String and Integer"));
}

#[test]
fn syntax_errors_carry_parser_kind() {
    let err = eval_error("21 *");
    assert_eq!(err.diagnostic().map(|d| d.kind.clone()), Some(DiagnosticKind::Parser));
}

#[test]
fn unterminated_string_carries_lexer_kind() {
    let err = eval_error("puts \"open");
    assert_eq!(err.diagnostic().map(|d| d.kind.clone()), Some(DiagnosticKind::Lexer));
}

#[test]
fn deep_nesting_is_a_parser_error() {
    let source = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    let err = eval_error(&source);
    let diag = err.diagnostic().expect("diagnostic");
    assert_eq!(diag.kind, DiagnosticKind::Parser);
    assert_eq!(diag.message, "expression nested too deeply");
}

#[test]
fn repeated_negation_counts_toward_nesting() {
    let source = format!("{}(1)", "-".repeat(10_000));
    let err = eval_error(&source);
    assert_eq!(err.diagnostic().map(|d| d.kind.clone()), Some(DiagnosticKind::Parser));
}

#[test]
fn moderate_nesting_still_evaluates() {
    let source = format!("{}42{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(expect_int(&eval(&source)), 42);
}

#[test]
fn long_operator_chains_are_bounded() {
    let accepted = vec!["1"; 500].join(" + ");
    assert_eq!(expect_int(&eval(&accepted)), 500);

    let rejected = vec!["1"; 5_000].join(" + ");
    let err = eval_error(&rejected);
    let diag = err.diagnostic().expect("diagnostic");
    assert_eq!(diag.kind, DiagnosticKind::Parser);
    assert_eq!(diag.message, "expression has too many operators");
}

#[test]
fn operator_budget_resets_per_statement() {
    let line = vec!["1"; 600].join(" + ");
    let source = format!("{line}\n{line}");
    assert_eq!(expect_int(&eval(&source)), 600);
}

#[test]
fn puts_does_not_double_a_trailing_newline() {
    let mut interpreter = interpreter(Capabilities::console());
    interpreter
        .eval_source("puts \"a\\n\"\nputs \"b\"")
        .expect("evaluation should succeed");
    assert_eq!(output_of(interpreter), "a\nb\n");
}

#[test]
fn interpreter_keeps_host_between_evaluations() {
    let mut interpreter = interpreter(Capabilities::console());
    interpreter.eval_source("puts 1").expect("first");
    interpreter.eval_source("puts 2").expect("second");
    assert!(interpreter.host().can_output());
    assert_eq!(output_of(interpreter), "1\n2\n");
}
