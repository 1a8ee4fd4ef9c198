// tests/lexer_tests.rs

use hcl_read::ast::Token;
use hcl_read::lexer::{LexError, Lexer};
use rust_decimal::Decimal;
use std::str::FromStr;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("%", Token::Percent),
        ("?", Token::Question),
        (":", Token::Colon),
        ("=", Token::Equal),
        ("!", Token::Bang),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (".", Token::Dot),
        (",", Token::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_multi_char_tokens() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
        ("=>", Token::FatArrow),
        ("...", Token::Ellipsis),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_lone_ampersand_is_invalid() {
    let mut lexer = Lexer::new("&");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedCharacter { ch: '&', position: 0 })
    );
}

// ============================================================================
// Identifiers and numbers
// ============================================================================

#[test]
fn test_identifiers_allow_dashes() {
    assert_eq!(
        tokens("google-beta node_pool_2"),
        vec![ident("google-beta"), ident("node_pool_2")]
    );
}

#[test]
fn test_numbers() {
    let test_cases = vec![
        ("42", "42"),
        ("3.14", "3.14"),
        ("1.50", "1.5"),
        ("1e3", "1000"),
        ("2.5e-1", "0.25"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            tokens(input),
            vec![Token::Number(Decimal::from_str(expected).unwrap())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_numbers_outside_decimal_range_keep_their_text() {
    let test_cases = vec!["1e30", "1e-30", "123456789012345678901234567890"];

    for input in test_cases {
        assert_eq!(
            tokens(input),
            vec![Token::RawNumber(input.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_number_followed_by_attribute_access() {
    // `1.foo` is a number then an attribute access, not a float
    assert_eq!(
        tokens("1.foo"),
        vec![Token::Number(Decimal::from(1)), Token::Dot, ident("foo")]
    );
}

// ============================================================================
// Strings and heredocs
// ============================================================================

#[test]
fn test_quoted_template_is_raw() {
    assert_eq!(
        tokens(r#""us-${var.region}-1\n""#),
        vec![Token::QuotedTemplate(r"us-${var.region}-1\n".to_string())]
    );
}

#[test]
fn test_interpolation_may_contain_quotes_and_braces() {
    assert_eq!(
        tokens(r#""${ {a = "}"}.a }""#),
        vec![Token::QuotedTemplate(r#"${ {a = "}"}.a }"#.to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("\"abc\n\"");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { start: 0 })
    );
}

#[test]
fn test_heredoc() {
    assert_eq!(
        tokens("<<EOT\nhello\nworld\nEOT\n"),
        vec![
            Token::Heredoc {
                content: "hello\nworld\n".to_string(),
                strip_indent: false,
            },
            Token::Newline,
        ]
    );
}

#[test]
fn test_indented_heredoc() {
    assert_eq!(
        tokens("<<-EOT\n    a\n      b\n    EOT"),
        vec![Token::Heredoc {
            content: "a\n  b\n".to_string(),
            strip_indent: true,
        }]
    );
}

#[test]
fn test_unterminated_heredoc() {
    let mut lexer = Lexer::new("<<EOT\nhello\n");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::UnterminatedHeredoc { ref marker, start: 0 }) if marker == "EOT"
    ));
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    let input = "a = 1 # hash\nb = 2 // slashes\n/* block\ncomment */ c = 3";
    assert_eq!(
        tokens(input),
        vec![
            ident("a"),
            Token::Equal,
            Token::Number(Decimal::from(1)),
            Token::Newline,
            ident("b"),
            Token::Equal,
            Token::Number(Decimal::from(2)),
            Token::Newline,
            ident("c"),
            Token::Equal,
            Token::Number(Decimal::from(3)),
        ]
    );
}

#[test]
fn test_unterminated_block_comment() {
    let mut lexer = Lexer::new("a /* never closed");
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedComment { start: 2 })
    );
}
