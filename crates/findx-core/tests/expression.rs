//! Integration tests for glob expansion and expression parsing through the
//! public API.

use findx_core::cursor::ArgCursor;
use findx_core::expr::{distribute_option, ExprParser};
use findx_core::{expand_glob, parse_expression, ErrorCode, FindxError};

fn words(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

#[test]
fn plain_strings_expand_to_themselves() {
    for glob in ["", "a", "*.rs", "src/main.rs", "x?y*z", "[ch]"] {
        assert_eq!(expand_glob(glob), vec![glob.to_string()], "glob {glob:?}");
    }
}

#[test]
fn documented_glob_vectors() {
    assert_eq!(expand_glob("a|b"), ["a", "b"]);
    assert_eq!(expand_glob("a,b"), ["a", "b"]);
    assert_eq!(expand_glob("a[,]b"), ["a[,]b"]);
    assert_eq!(expand_glob("{a,b}{c,d}"), ["ac", "ad", "bc", "bd"]);
    assert_eq!(expand_glob("a{b,c[}]d"), ["a{b", "c[}]d"]);
    assert_eq!(expand_glob("a{b{c|d}e}f"), ["a{bce}f", "a{bde}f"]);
}

#[test]
fn documented_expression_vectors() {
    let parsed = parse_expression(words("-type f -a -print0")).unwrap();
    assert_eq!(parsed.expression, words("( -type f -a -print0 )"));
    assert!(parsed.remaining.is_empty());
    assert!(parsed.saw_action);

    assert_eq!(
        parse_expression(["*.c"]).unwrap().expression,
        words("( -name *.c )")
    );
    assert_eq!(
        parse_expression(["*/*.c"]).unwrap().expression,
        words("( -path */*.c )")
    );

    assert_eq!(
        distribute_option("-type", &["f", "d"]),
        words("( -type f -o -type d )")
    );
    assert_eq!(distribute_option("-type", &["f"]), words("-type f"));
}

#[test]
fn glob_tests_mix_with_operators() {
    let parsed = parse_expression(words("-iname *.{jpg,png} -o ( -type fl -size +1M ) -ls")).unwrap();
    assert_eq!(
        parsed.expression,
        words(
            "( ( -iname *.jpg -o -iname *.png ) -o \
             ( ( -type f -o -type l ) -size +1M ) -ls )"
        )
    );
}

#[test]
fn exec_arguments_are_not_rewritten() {
    let parsed = parse_expression(words("-exec grep -l *.c,x {} + -print")).unwrap();
    assert_eq!(
        parsed.expression,
        words("( -exec grep -l *.c,x {} + -print )")
    );
    assert!(parsed.saw_print);
}

#[test]
fn parser_flags_accumulate_across_fragments() {
    let mut parser = ExprParser::new(ArgCursor::new(words("-print0 src -empty")));
    assert_eq!(parser.expression().unwrap(), words("-print0"));
    assert_eq!(parser.cursor_mut().pop().unwrap(), "src");
    assert_eq!(parser.expression().unwrap(), words("-empty"));
    assert!(parser.saw_action());
    assert!(!parser.saw_print());
}

#[test]
fn parse_errors_are_syntax_errors() {
    for input in ["", "-name", "( -empty", "-o", "-empty -a )"] {
        let err = parse_expression(words(input)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Syntax, "input {input:?}: {err}");
    }
    assert!(matches!(
        parse_expression(words("( -empty -print0 ] )")),
        Err(FindxError::UnexpectedArgument { .. })
    ));
}
