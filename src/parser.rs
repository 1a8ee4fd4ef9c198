use std::mem;

use thiserror::Error;

use crate::{
    ast::{
        Attribute, BinOp, Block, Body, Expr, ForExpr, ObjectItem, ObjectKey, Span, Structure,
        TemplatePart, Token, Traversal, UnaryOp,
    },
    lexer::{LexError, Lexer, interpolation_len},
};

/// Errors raised while building a syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, got {found:?} at byte {position}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        position: usize,
    },

    #[error("invalid escape sequence '\\{sequence}' in quoted string")]
    InvalidEscape { sequence: String },

    #[error("invalid template directive '%{{{0}}}'")]
    InvalidDirective(String),

    #[error("unexpected template directive '{found}', expected {expected}")]
    UnexpectedDirective {
        found: &'static str,
        expected: &'static str,
    },

    #[error("template directive '{0}' is never closed")]
    UnclosedDirective(&'static str),

    #[error("attribute '{name}' is defined more than once")]
    DuplicateAttribute { name: String },
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    current_span: Span,
    /// End of the most recently consumed token
    last_end: usize,
    /// Inside parentheses, brackets and calls line breaks are insignificant
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, ParseError> {
        let (current_token, current_span) = lexer.next_spanned()?;
        Ok(Parser {
            lexer,
            current_token,
            current_span,
            last_end: 0,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.last_end = self.current_span.end;
        loop {
            let (token, span) = self.lexer.next_spanned()?;
            if token == Token::Newline && self.nesting > 0 {
                continue;
            }
            self.current_token = token;
            self.current_span = span;
            return Ok(());
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: self.current_token.clone(),
            position: self.current_span.start,
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(format!("{:?}", expected)));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current_token, Token::Identifier(name) if name == keyword)
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current_token {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        while self.check(&Token::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    /// Attributes and blocks end at a line break, at the end of input, or at
    /// the brace closing a single-line block.
    fn expect_end_of_item(&self) -> Result<(), ParseError> {
        match self.current_token {
            Token::Newline | Token::Eof | Token::RBrace => Ok(()),
            _ => Err(self.unexpected("newline")),
        }
    }
}

// ============================================================================
// Bodies
// ============================================================================

impl Parser<'_> {
    /// Parse a complete configuration file (or fragment) into its body.
    pub fn parse_config(&mut self) -> Result<Body, ParseError> {
        let body = self.parse_body(&Token::Eof)?;
        self.expect(Token::Eof)?;
        Ok(body)
    }

    fn parse_body(&mut self, terminator: &Token) -> Result<Body, ParseError> {
        let mut body = Body::default();

        loop {
            if self.check(&Token::Newline) {
                self.advance()?;
                continue;
            }
            if self.check(terminator) || self.check(&Token::Eof) {
                break;
            }
            if !matches!(self.current_token, Token::Identifier(_)) {
                return Err(self.unexpected("attribute or block"));
            }

            let structure = self.parse_structure()?;
            if let Structure::Attribute(attr) = &structure
                && body.attribute(&attr.name).is_some()
            {
                return Err(ParseError::DuplicateAttribute {
                    name: attr.name.clone(),
                });
            }
            body.structures.push(structure);
        }

        Ok(body)
    }

    fn parse_structure(&mut self) -> Result<Structure, ParseError> {
        let name = self.expect_identifier()?;

        if self.check(&Token::Equal) {
            self.advance()?;
            let expr_start = self.current_span.start;
            let expr = self.parse_expression()?;
            let expr_span = Span::new(expr_start, self.last_end);
            self.expect_end_of_item()?;

            return Ok(Structure::Attribute(Attribute {
                name,
                expr,
                expr_span,
            }));
        }

        let mut labels = vec![];
        loop {
            match &self.current_token {
                Token::Identifier(label) => {
                    labels.push(label.clone());
                    self.advance()?;
                }
                Token::QuotedTemplate(raw) => {
                    let label = match parse_template(raw, true)?.as_slice() {
                        [] => String::new(),
                        [TemplatePart::Literal(text)] => text.clone(),
                        _ => return Err(self.unexpected("literal block label")),
                    };
                    labels.push(label);
                    self.advance()?;
                }
                _ => break,
            }
        }

        self.expect(Token::LBrace)?;
        let body = self.parse_body(&Token::RBrace)?;
        self.expect(Token::RBrace)?;
        self.expect_end_of_item()?;

        Ok(Structure::Block(Block {
            block_type: name,
            labels,
            body,
        }))
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl Parser<'_> {
    /// Parse a standalone expression spanning the whole input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.skip_newlines()?;
        let expr = self.parse_expression()?;
        self.skip_newlines()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_or()?;
        if !self.check(&Token::Question) {
            return Ok(condition);
        }

        self.advance()?;
        let true_result = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let false_result = self.parse_expression()?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            true_result: Box::new(true_result),
            false_result: Box::new(false_result),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance()?;
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.check(&Token::AndAnd) {
            self.advance()?;
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match &self.current_token {
                Token::EqEq => BinOp::Equal,
                Token::NotEq => BinOp::NotEqual,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match &self.current_token {
                Token::Lt => BinOp::LessThan,
                Token::Gt => BinOp::GreaterThan,
                Token::LtEq => BinOp::LessEqual,
                Token::GtEq => BinOp::GreaterEqual,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                Token::Percent => BinOp::Modulo,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current_token {
            Token::Minus => UnaryOp::Negate,
            Token::Bang => UnaryOp::Not,
            _ => return self.parse_access(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parse a primary expression followed by any `.name`, `.0`, `[key]`,
    /// `.*` or `[*]` accessors.
    fn parse_access(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.advance()?; // consume '.'

                match self.current_token.clone() {
                    Token::Identifier(name) => {
                        self.advance()?;
                        expr = Expr::GetAttr {
                            object: Box::new(expr),
                            name,
                        };
                    }
                    Token::Number(n) => {
                        self.advance()?;
                        expr = Expr::Index {
                            object: Box::new(expr),
                            key: Box::new(Expr::Number(n)),
                        };
                    }
                    Token::Star => {
                        self.advance()?;
                        let each = self.parse_splat_traversal(false)?;
                        expr = Expr::Splat {
                            source: Box::new(expr),
                            each,
                        };
                    }
                    _ => return Err(self.unexpected("attribute name after '.'")),
                }
            } else if self.check(&Token::LBracket) {
                self.nesting += 1;
                self.advance()?; // consume '['

                if self.check(&Token::Star) {
                    self.advance()?;
                    self.nesting -= 1;
                    self.expect(Token::RBracket)?;
                    let each = self.parse_splat_traversal(true)?;
                    expr = Expr::Splat {
                        source: Box::new(expr),
                        each,
                    };
                } else {
                    let key = self.parse_expression()?;
                    self.nesting -= 1;
                    self.expect(Token::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        key: Box::new(key),
                    };
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Traversal applied to each element of a splat. Attribute splats (`.*`)
    /// only continue with `.name` steps; full splats (`[*]`) also take `[key]`.
    fn parse_splat_traversal(&mut self, full: bool) -> Result<Vec<Traversal>, ParseError> {
        let mut each = vec![];

        loop {
            if self.check(&Token::Dot) {
                self.advance()?;
                match self.current_token.clone() {
                    Token::Identifier(name) => each.push(Traversal::Attr(name)),
                    Token::Number(n) => each.push(Traversal::Index(Expr::Number(n))),
                    _ => return Err(self.unexpected("attribute name after '.'")),
                }
                self.advance()?;
            } else if full && self.check(&Token::LBracket) {
                self.nesting += 1;
                self.advance()?;
                let key = self.parse_expression()?;
                self.nesting -= 1;
                self.expect(Token::RBracket)?;
                each.push(Traversal::Index(key));
            } else {
                break;
            }
        }
        Ok(each)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current_token.clone() {
            // Literals
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::RawNumber(text) => {
                self.advance()?;
                Ok(Expr::RawNumber(text))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Expr::Boolean(b))
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::Null)
            }
            Token::QuotedTemplate(raw) => {
                let parts = parse_template(&raw, true)?;
                self.advance()?;
                Ok(Expr::Template(parts))
            }
            Token::Heredoc { content, .. } => {
                let parts = parse_template(&content, false)?;
                self.advance()?;
                Ok(Expr::Template(parts))
            }

            // References and calls
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.parse_call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }

            Token::LParen => {
                self.nesting += 1;
                self.advance()?;
                let expr = self.parse_expression()?;
                self.nesting -= 1;
                self.expect(Token::RParen)?;
                Ok(Expr::Parens(Box::new(expr)))
            }

            // Collection constructors
            Token::LBracket => self.parse_tuple(),
            Token::LBrace => self.parse_object(),

            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.nesting += 1;
        self.advance()?; // consume '('

        let mut args = vec![];
        let mut expand_final = false;
        while !self.check(&Token::RParen) {
            args.push(self.parse_expression()?);

            if self.check(&Token::Ellipsis) {
                self.advance()?;
                expand_final = true;
                break;
            }
            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }

        self.nesting -= 1;
        self.expect(Token::RParen)?;
        Ok(Expr::FunctionCall {
            name,
            args,
            expand_final,
        })
    }

    fn parse_tuple(&mut self) -> Result<Expr, ParseError> {
        self.nesting += 1;
        self.advance()?; // consume '['

        if self.check_keyword("for") {
            let for_expr = self.parse_for(false)?;
            self.nesting -= 1;
            self.expect(Token::RBracket)?;
            return Ok(Expr::For(Box::new(for_expr)));
        }

        let mut elements = vec![];
        while !self.check(&Token::RBracket) {
            elements.push(self.parse_expression()?);

            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }

        self.nesting -= 1;
        self.expect(Token::RBracket)?;
        Ok(Expr::Tuple(elements))
    }

    /// Object constructors are line-sensitive: items are separated by commas
    /// or line breaks, whatever the surrounding nesting.
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let saved_nesting = mem::replace(&mut self.nesting, 0);
        self.advance()?; // consume '{'
        self.skip_newlines()?;

        if self.check_keyword("for") {
            self.nesting = 1;
            let for_expr = self.parse_for(true)?;
            self.nesting = saved_nesting;
            self.expect(Token::RBrace)?;
            return Ok(Expr::For(Box::new(for_expr)));
        }

        let mut items = vec![];
        loop {
            self.skip_newlines()?;
            if self.check(&Token::RBrace) {
                break;
            }

            // Bare keywords name themselves, like any other identifier key
            let key = match self.parse_expression()? {
                Expr::Variable(name) => ObjectKey::Ident(name),
                Expr::Null => ObjectKey::Ident("null".to_string()),
                Expr::Boolean(b) => ObjectKey::Ident(b.to_string()),
                other => ObjectKey::Expr(other),
            };

            if !(self.check(&Token::Equal) || self.check(&Token::Colon)) {
                return Err(self.unexpected("'=' or ':' after object key"));
            }
            self.advance()?;

            let value_start = self.current_span.start;
            let value = self.parse_expression()?;
            let value_span = Span::new(value_start, self.last_end);
            items.push(ObjectItem {
                key,
                value,
                value_span,
            });

            match self.current_token {
                Token::Comma | Token::Newline => self.advance()?,
                Token::RBrace => {}
                _ => return Err(self.unexpected("',' or newline after object item")),
            }
        }

        self.nesting = saved_nesting;
        self.expect(Token::RBrace)?;
        Ok(Expr::Object(items))
    }

    /// Parse the inside of a `for` expression, up to but excluding the
    /// closing bracket or brace.
    fn parse_for(&mut self, object: bool) -> Result<ForExpr, ParseError> {
        self.advance()?; // consume 'for'

        let (key_var, value_var, collection) = self.parse_for_header()?;
        self.expect(Token::Colon)?;

        let (key_expr, value_expr) = if object {
            let key = self.parse_expression()?;
            self.expect(Token::FatArrow)?;
            (Some(key), self.parse_expression()?)
        } else {
            (None, self.parse_expression()?)
        };

        let group = object && self.check(&Token::Ellipsis);
        if group {
            self.advance()?;
        }

        let condition = if self.check_keyword("if") {
            self.advance()?;
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(ForExpr {
            key_var,
            value_var,
            collection,
            key_expr,
            value_expr,
            condition,
            group,
        })
    }

    /// `k, v in collection` or `v in collection`, as used by both `for`
    /// expressions and `%{ for }` directives.
    fn parse_for_header(&mut self) -> Result<(Option<String>, String, Expr), ParseError> {
        let first = self.expect_identifier()?;
        let (key_var, value_var) = if self.check(&Token::Comma) {
            self.advance()?;
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };

        if !self.check_keyword("in") {
            return Err(self.unexpected("'in'"));
        }
        self.advance()?;

        Ok((key_var, value_var, self.parse_expression()?))
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Split raw template text into literal, interpolation and directive parts.
///
/// Backslash escapes are only processed for quoted strings; heredocs keep
/// backslashes verbatim.
pub fn parse_template(raw: &str, unescape: bool) -> Result<Vec<TemplatePart>, ParseError> {
    let mut segments = split_template(raw, unescape)?.into_iter();
    match nest_segments(&mut segments)? {
        (parts, None) => Ok(parts),
        (_, Some(closer)) => Err(ParseError::UnexpectedDirective {
            found: closer.keyword(),
            expected: "end of template",
        }),
    }
}

/// A flat template piece, before `if` and `for` directives are nested.
enum Segment {
    Part(TemplatePart),
    If(Expr),
    Else,
    EndIf,
    For {
        key_var: Option<String>,
        value_var: String,
        collection: Expr,
    },
    EndFor,
}

impl Segment {
    fn keyword(&self) -> &'static str {
        match self {
            Segment::Part(_) => "",
            Segment::If(_) => "if",
            Segment::Else => "else",
            Segment::EndIf => "endif",
            Segment::For { .. } => "for",
            Segment::EndFor => "endfor",
        }
    }
}

fn split_template(raw: &str, unescape: bool) -> Result<Vec<Segment>, ParseError> {
    let mut segments = vec![];
    let mut literal = String::new();
    let mut i = 0;

    while i < raw.len() {
        let rest = &raw[i..];

        if rest.starts_with("$${") {
            literal.push_str("${");
            i += 3;
            continue;
        }
        if rest.starts_with("%%{") {
            literal.push_str("%{");
            i += 3;
            continue;
        }
        let directive = rest.starts_with("%{");
        if directive || rest.starts_with("${") {
            let len = interpolation_len(&rest[2..])
                .ok_or(LexError::UnterminatedInterpolation { start: i })?;
            let mut inner = &rest[2..2 + len - 1];

            // `~` strip markers trim the neighbouring literal whitespace
            if let Some(stripped) = inner.strip_prefix('~') {
                inner = stripped;
                literal.truncate(literal.trim_end().len());
            }
            let strip_right = match inner.strip_suffix('~') {
                Some(stripped) => {
                    inner = stripped;
                    true
                }
                None => false,
            };

            if !literal.is_empty() {
                segments.push(Segment::Part(TemplatePart::Literal(mem::take(&mut literal))));
            }
            segments.push(if directive {
                parse_directive(inner)?
            } else {
                Segment::Part(TemplatePart::Interpolation(parse_interpolation(inner)?))
            });
            i += 2 + len;

            if strip_right {
                i = raw.len() - raw[i..].trim_start().len();
            }
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if unescape && ch == '\\' {
            let (decoded, consumed) = decode_escape(&rest[1..])?;
            literal.push(decoded);
            i += 1 + consumed;
            continue;
        }
        literal.push(ch);
        i += ch.len_utf8();
    }

    if !literal.is_empty() {
        segments.push(Segment::Part(TemplatePart::Literal(literal)));
    }
    Ok(segments)
}

/// Nest segments into parts until the stream ends or an `else`, `endif` or
/// `endfor` closes the current level. The closer is handed back.
fn nest_segments<I>(segments: &mut I) -> Result<(Vec<TemplatePart>, Option<Segment>), ParseError>
where
    I: Iterator<Item = Segment>,
{
    let mut parts = vec![];

    while let Some(segment) = segments.next() {
        match segment {
            Segment::Part(part) => parts.push(part),
            Segment::If(condition) => {
                let (then_parts, closer) = nest_segments(segments)?;
                let else_parts = match closer {
                    Some(Segment::EndIf) => vec![],
                    Some(Segment::Else) => {
                        let (else_parts, closer) = nest_segments(segments)?;
                        if !matches!(closer, Some(Segment::EndIf)) {
                            return Err(mismatched_directive(closer, "if", "'endif'"));
                        }
                        else_parts
                    }
                    other => return Err(mismatched_directive(other, "if", "'else' or 'endif'")),
                };
                parts.push(TemplatePart::If {
                    condition,
                    then_parts,
                    else_parts,
                });
            }
            Segment::For {
                key_var,
                value_var,
                collection,
            } => {
                let (body, closer) = nest_segments(segments)?;
                if !matches!(closer, Some(Segment::EndFor)) {
                    return Err(mismatched_directive(closer, "for", "'endfor'"));
                }
                parts.push(TemplatePart::For {
                    key_var,
                    value_var,
                    collection,
                    body,
                });
            }
            closer => return Ok((parts, Some(closer))),
        }
    }

    Ok((parts, None))
}

fn mismatched_directive(
    found: Option<Segment>,
    opener: &'static str,
    expected: &'static str,
) -> ParseError {
    match found {
        Some(segment) => ParseError::UnexpectedDirective {
            found: segment.keyword(),
            expected,
        },
        None => ParseError::UnclosedDirective(opener),
    }
}

fn parse_interpolation(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(Lexer::new(source))?;
    parser.nesting = 1;
    parser.parse()
}

fn parse_directive(source: &str) -> Result<Segment, ParseError> {
    let invalid = || ParseError::InvalidDirective(source.to_string());
    let mut parser = Parser::new(Lexer::new(source))?;
    parser.nesting = 1;
    parser.skip_newlines()?;

    let keyword = match &parser.current_token {
        Token::Identifier(keyword) => keyword.clone(),
        _ => return Err(invalid()),
    };
    parser.advance()?;

    let segment = match keyword.as_str() {
        "if" => Segment::If(parser.parse_expression()?),
        "else" => Segment::Else,
        "endif" => Segment::EndIf,
        "for" => {
            let (key_var, value_var, collection) = parser.parse_for_header()?;
            Segment::For {
                key_var,
                value_var,
                collection,
            }
        }
        "endfor" => Segment::EndFor,
        _ => return Err(invalid()),
    };
    parser.expect(Token::Eof)?;
    Ok(segment)
}

/// Decode the escape following a backslash, returning the character and the
/// number of bytes consumed.
fn decode_escape(rest: &str) -> Result<(char, usize), ParseError> {
    match rest.chars().next() {
        Some('n') => Ok(('\n', 1)),
        Some('r') => Ok(('\r', 1)),
        Some('t') => Ok(('\t', 1)),
        Some('"') => Ok(('"', 1)),
        Some('\\') => Ok(('\\', 1)),
        Some('u') => decode_unicode(rest, 4),
        Some('U') => decode_unicode(rest, 8),
        Some(other) => Err(ParseError::InvalidEscape {
            sequence: other.to_string(),
        }),
        None => Err(ParseError::InvalidEscape {
            sequence: String::new(),
        }),
    }
}

fn decode_unicode(rest: &str, digits: usize) -> Result<(char, usize), ParseError> {
    let invalid = || ParseError::InvalidEscape {
        sequence: rest.chars().take(digits + 1).collect(),
    };
    let hex = rest.get(1..1 + digits).ok_or_else(invalid)?;
    let code = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    let ch = char::from_u32(code).ok_or_else(invalid)?;
    Ok((ch, 1 + digits))
}
