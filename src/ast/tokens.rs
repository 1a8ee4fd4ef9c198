use rust_decimal::Decimal;

/// Byte range of a token or syntax node within its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Slice the covered text out of `source`, or an empty string if the span
    /// does not belong to it.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, kept at full decimal precision
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 1e3
    /// ```
    Number(Decimal),

    /// Well-formed numeric literal too large or too small for a decimal
    RawNumber(String),

    /// Double-quoted template, carrying the raw text between the quotes.
    ///
    /// Escapes and `${...}` interpolations are left untouched; the parser
    /// splits them into template parts.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "us-${region}-1"
    /// ```
    QuotedTemplate(String),

    /// Heredoc template (`<<EOF` or the indent-stripping `<<-EOF`)
    ///
    /// # Examples
    /// ```text
    /// <<EOT
    /// line one
    /// EOT
    /// ```
    Heredoc { content: String, strip_indent: bool },

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    /// Attribute names, block types, variables and function names.
    ///
    /// Must start with a letter or underscore; may contain letters, digits,
    /// underscores and dashes.
    ///
    /// # Examples
    /// ```text
    /// machine_type
    /// google-beta
    /// ```
    Identifier(String),

    // Arithmetic
    /// Addition (`+`)
    Plus,

    /// Subtraction or negation (`-`)
    Minus,

    /// Multiplication, or splat inside `[*]` and `.*`
    Star,

    /// Division (`/`)
    Slash,

    /// Modulo (`%`)
    Percent,

    // Comparison
    /// Equality (`==`)
    EqEq,

    /// Inequality (`!=`)
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical NOT (`!`)
    Bang,

    // Structure
    /// Conditional operator (`?`)
    Question,

    /// Conditional separator, object key separator, `for` body separator
    Colon,

    /// Attribute definition or object key separator (`=`)
    Equal,

    /// Key/value separator in object `for` expressions (`=>`)
    FatArrow,

    /// Grouping marker in `for` expressions, argument expansion in calls (`...`)
    Ellipsis,

    // Delimiters
    /// Left bracket for tuples and index access
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Left brace for blocks and object constructors
    LBrace,

    /// Right brace
    RBrace,

    /// Dot for attribute access and legacy index access
    Dot,

    /// Comma separating tuple elements, object items or call arguments
    Comma,

    /// Line break; terminates attribute definitions
    Newline,

    /// End of file
    Eof,
}
