//! Transform dispatch: lookup, shape validation and invocation.

use rowbind_map::{
    ConfigError, FieldBinding, FieldError, MappingEngine, Method, MethodTable, Record, Signature,
    TypeTag, dispatch,
};

#[derive(Debug, Default)]
struct Calculation {
    operation: String,
    error_return: String,
    unexported: String,
    no_return: String,
    not_error_return: String,
    not_string_arg: i64,
    not_one_arg: String,
}

impl Calculation {
    fn parse_operation(&mut self, raw: &str) -> anyhow::Result<()> {
        self.operation = match raw {
            "-" => "minus",
            "*" => "multiply",
            "/" => "divide",
            _ => "add",
        }
        .to_string();
        Ok(())
    }

    fn parse_error_return(&mut self, _raw: &str) -> anyhow::Result<()> {
        anyhow::bail!("error")
    }

    fn parse_unexported(&mut self, raw: &str) -> anyhow::Result<()> {
        self.unexported = raw.to_string();
        Ok(())
    }
}

impl Record for Calculation {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            FieldBinding::transform("operation", "operation", "ParseOperation"),
            FieldBinding::transform("error_return", "error_return", "ParseErrorReturn"),
            FieldBinding::transform("unexported", "unexported", "parseUnexported"),
            FieldBinding::transform("no_return", "no_return", "ParseNoReturn"),
            FieldBinding::transform("not_error_return", "not_error_return", "ParseNotErrorReturn"),
            FieldBinding::transform("not_string_arg", "not_string_arg", "ParseNotStringArg"),
            FieldBinding::transform("not_one_arg", "not_one_arg", "ParseNotOneArg"),
            FieldBinding::transform("missing", "missing", "ParseMissing"),
        ]
    }

    fn methods() -> MethodTable<Self> {
        MethodTable::new()
            .with(Method::transform("ParseOperation", Self::parse_operation))
            .with(Method::transform("ParseErrorReturn", Self::parse_error_return))
            .with(Method::transform("parseUnexported", Self::parse_unexported).private())
            .with(Method::declare(
                "ParseNoReturn",
                Signature::new().param(TypeTag::Str),
            ))
            .with(Method::declare(
                "ParseNotErrorReturn",
                Signature::new().param(TypeTag::Str).returns(TypeTag::Str),
            ))
            .with(Method::declare(
                "ParseNotStringArg",
                Signature::new().param(TypeTag::Int).returns(TypeTag::Error),
            ))
            .with(Method::declare(
                "ParseNotOneArg",
                Signature::new()
                    .param(TypeTag::Str)
                    .param(TypeTag::Str)
                    .returns(TypeTag::Error),
            ))
    }
}

fn engine_error(column: &str) -> ConfigError {
    MappingEngine::<Calculation>::from_headers(&[column]).unwrap_err()
}

#[test]
fn transform_mutates_record() {
    let engine = MappingEngine::<Calculation>::from_headers(&["operation"]).unwrap();
    let calc = engine.decode_new(&["*"]).unwrap();
    assert_eq!(calc.operation, "multiply");

    let mut calc = Calculation::default();
    dispatch(&mut calc, "ParseOperation", "+").unwrap();
    assert_eq!(calc.operation, "add");
}

#[test]
fn transform_failure_is_reported() {
    let engine = MappingEngine::<Calculation>::from_headers(&["error_return"]).unwrap();
    let err = engine.decode_new(&["+"]).unwrap_err();
    assert_eq!(err.transform_error().unwrap().to_string(), "error");

    let mut calc = Calculation::default();
    let err = dispatch(&mut calc, "ParseErrorReturn", "+").unwrap_err();
    assert!(matches!(err, FieldError::Transform(_)));
}

#[test]
fn private_transform_is_not_found() {
    let err = engine_error("unexported");
    insta::assert_snapshot!(err.to_string(), @r#"cannot find "parseUnexported" method"#);
    assert!(matches!(err, ConfigError::TransformNotFound { .. }));
}

#[test]
fn missing_transform_is_not_found() {
    assert_eq!(
        engine_error("missing"),
        ConfigError::TransformNotFound {
            name: "ParseMissing".to_string()
        }
    );
}

#[test]
fn transform_without_result_is_rejected() {
    let err = engine_error("no_return");
    insta::assert_snapshot!(
        err.to_string(),
        @r#"method "ParseNoReturn" should return only one value, found 0"#
    );
    assert!(matches!(err, ConfigError::WrongReturnCount { count: 0, .. }));
}

#[test]
fn transform_with_infallible_result_is_rejected() {
    let err = engine_error("not_error_return");
    insta::assert_snapshot!(
        err.to_string(),
        @r#"method "ParseNotErrorReturn" should return only error type, found &str"#
    );
    assert!(matches!(err, ConfigError::WrongReturnType { .. }));
}

#[test]
fn transform_with_non_string_argument_is_rejected() {
    let err = engine_error("not_string_arg");
    insta::assert_snapshot!(
        err.to_string(),
        @r#"method "ParseNotStringArg" should accept only string type argument, found int"#
    );
    assert!(matches!(err, ConfigError::WrongArgType { .. }));
}

#[test]
fn transform_with_two_arguments_is_rejected() {
    let err = engine_error("not_one_arg");
    insta::assert_snapshot!(
        err.to_string(),
        @r#"method "ParseNotOneArg" should accept only one argument, found 2"#
    );
    assert!(matches!(err, ConfigError::WrongArity { arity: 2, .. }));
}

#[test]
fn shape_errors_are_distinct() {
    let errors = [
        engine_error("no_return"),
        engine_error("not_error_return"),
        engine_error("not_string_arg"),
        engine_error("not_one_arg"),
    ];
    assert!(errors.iter().all(ConfigError::is_transform_shape));
    let kinds: Vec<_> = errors.iter().map(std::mem::discriminant).collect();
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(!engine_error("unexported").is_transform_shape());
}

#[test]
fn dispatch_reports_shape_errors() {
    let mut calc = Calculation::default();
    let err = dispatch(&mut calc, "ParseNotOneArg", "x").unwrap_err();
    assert!(matches!(
        err,
        FieldError::Config(ConfigError::WrongArity { .. })
    ));
    assert_eq!(calc.not_one_arg, "");
    assert_eq!(calc.not_string_arg, 0);
    assert_eq!(calc.no_return, "");
    assert_eq!(calc.not_error_return, "");
    assert_eq!(calc.error_return, "");
}
