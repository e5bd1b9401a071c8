use super::*;
use assert_matches::assert_matches;

struct TestAppInfo;
impl AppInfoProvider for TestAppInfo {}

struct CustomAppInfo;

impl AppInfoProvider for CustomAppInfo {
    fn app_name(&self) -> Cow<'static, str> {
        "test".into()
    }
}

#[test]
fn test_log() {
    let err = Error::Io(std::io::Error::other("test"));
    let mut buf = Vec::new();
    err.log_to(&mut buf, &TestAppInfo).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "\u{1b}[1m\u{1b}[91merror:\u{1b}[39m\u{1b}[0m test\n"
    );
}

#[test]
fn test_tips() {
    let err = Error::Template(TemplateError::Unknown {
        name: "test".to_string(),
        suggestions: Suggestions::new("test", vec!["test1", "test2"]),
    });
    assert_eq!(
        err.tips(&TestAppInfo).to_string(),
        "\u{1b}[1m\u{1b}[32m  tip:\u{1b}[39m\u{1b}[0m did you mean \u{1b}[33m\"test1\"\u{1b}[0m or \u{1b}[33m\"test2\"\u{1b}[0m?\n",
    );

    let mut buf = Vec::new();
    err.log_to(&mut buf, &TestAppInfo).unwrap();
    assert!(!buf.is_empty());

    let err = Error::Template(TemplateError::Unknown {
        name: "test".to_string(),
        suggestions: Suggestions::none(),
    });
    assert_eq!(err.tips(&TestAppInfo).to_string(), "");

    let err = Error::FileNotFound {
        filename: "missing.json".to_string(),
    };
    assert_eq!(
        err.tips(&CustomAppInfo).to_string(),
        "\u{1b}[1m\u{1b}[32m  tip:\u{1b}[39m\u{1b}[0m run \u{1b}[1mtest --help\u{1b}[0m to see usage\n",
    );
}

#[test]
fn test_field_tips() {
    let err = Error::Parse(ParseError::Syntax {
        offset: 0,
        expected: "field name or comparison".into(),
    });
    let tips = err.tips(&TestAppInfo).to_string();
    for name in Field::names() {
        assert!(tips.contains(&format!("\u{1b}[33m{}\u{1b}[0m", name)), "{tips}");
    }

    let err = Error::Parse(ParseError::Syntax {
        offset: 3,
        expected: "end of input".into(),
    });
    assert_eq!(err.tips(&TestAppInfo).to_string(), "");
}

#[test]
fn test_file_not_found() {
    let err = Error::FileNotFound {
        filename: "missing.json".to_string(),
    };
    assert_eq!(err.to_string(), "file \u{1b}[33m\"missing.json\"\u{1b}[0m not found");
}

#[test]
fn test_parse_error() {
    let err = ParseError::Syntax {
        offset: 6,
        expected: "quoted regular expression".into(),
    };
    assert_eq!(err.offset(), 6);
    assert_eq!(err.to_string(), "expected quoted regular expression at offset 6");

    let err = crate::query::parse(r#"title ~ "(""#).unwrap_err();
    assert_eq!(err.offset(), 9);
    assert!(err.to_string().starts_with("invalid regular expression \u{1b}[33m\"(\"\u{1b}[0m at offset 9: "));

    let err: Error = err.into();
    assert_matches!(err, Error::Parse(ParseError::InvalidRegex { .. }));
    assert!(err.to_string().starts_with("failed to parse query: invalid regular expression"));

    let err = ParseError::Aborted {
        offset: 4100,
        message: "stack limit reached".into(),
    };
    assert_eq!(err.offset(), 4100);
    assert_eq!(err.to_string(), "parser gave up at offset 4100: stack limit reached");
    assert_eq!(err.map_offset(|x| x - 100).offset(), 4000);
}

#[test]
fn test_evaluation_error() {
    let err = EvaluationError::FieldUnavailable { field: Field::Caption };
    assert_eq!(err.to_string(), "field \u{1b}[33m\"caption\"\u{1b}[0m is not available");

    assert_eq!(EvaluationError::TypeUnavailable.to_string(), "item type is not available");
}

#[test]
fn test_template_error() {
    let err = TemplateError::Cycle {
        chain: vec!["a".into(), "b".into(), "a".into()],
    };
    assert_eq!(err.to_string(), "cyclic template reference a -> b -> a");

    let err = TemplateError::Unterminated { offset: 4 };
    assert_eq!(err.to_string(), "unterminated template reference at offset 4");

    let err: Error = TemplateError::Duplicate { name: "x".into() }.into();
    assert_eq!(err.to_string(), "template \u{1b}[33m\"x\"\u{1b}[0m is defined more than once");
}
