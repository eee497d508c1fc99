//! Lexer (tokenizer) for filter expressions.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::ast::Literal;
use super::error::{FilterError, FilterResult};

/// Quote character for literals that contain spaces or punctuation.
const QUOTE: char = '`';

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// An unquoted word: a field name, an operator, a connective or a bare value.
    Word(String),

    /// A backtick-quoted literal (content without the backticks).
    Quoted(String),

    /// A bracketed list, collapsed into a single token.
    List(Vec<Literal>),

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterToken::Word(word) => f.write_str(word),
            FilterToken::Quoted(text) => write!(f, "`{}`", text),
            FilterToken::List(items) => {
                let joined: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", joined.join(","))
            }
            FilterToken::OpenParen => f.write_str("("),
            FilterToken::CloseParen => f.write_str(")"),
        }
    }
}

/// Checks bracket and parenthesis nesting, ignoring quoted content.
///
/// This runs before tokenizing so structural errors are reported regardless
/// of what the parser would make of the tokens.
pub fn check_balance(input: &str) -> FilterResult<()> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut quote_start: Option<usize> = None;

    for (position, c) in input.char_indices() {
        if quote_start.is_some() {
            if c == QUOTE {
                quote_start = None;
            }
            continue;
        }

        match c {
            QUOTE => quote_start = Some(position),
            '(' | '[' => stack.push((c, position)),
            ')' | ']' => {
                let expected = if c == ')' { '(' } else { '[' };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_position)) => {
                        return Err(FilterError::syntax(format!(
                            "'{}' at position {} does not close '{}' opened at position {}",
                            c, position, open, open_position
                        )));
                    }
                    None => {
                        return Err(FilterError::syntax(format!(
                            "unmatched '{}' at position {}",
                            c, position
                        )));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(start) = quote_start {
        return Err(FilterError::syntax(format!(
            "unterminated quote starting at position {}",
            start
        )));
    }

    if let Some((open, position)) = stack.pop() {
        return Err(FilterError::syntax(format!(
            "unclosed '{}' at position {}",
            open, position
        )));
    }

    Ok(())
}

/// Returns true for characters that may appear in an unquoted word.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | ',' | QUOTE)
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads an unquoted word.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.peek() {
            if !is_word_char(c) {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Reads a backtick-quoted literal. Content is taken verbatim.
    fn read_quoted(&mut self) -> FilterResult<String> {
        let start = self.position;
        self.next_char(); // opening quote

        let mut text = String::new();
        loop {
            match self.next_char() {
                Some(QUOTE) => return Ok(text),
                Some(c) => text.push(c),
                None => {
                    return Err(FilterError::syntax(format!(
                        "unterminated quote starting at position {}",
                        start
                    )))
                }
            }
        }
    }

    /// Reads a bracketed list into its literals.
    fn read_list(&mut self) -> FilterResult<Vec<Literal>> {
        let start = self.position;
        self.next_char(); // '['

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek().copied() {
                Some(']') if items.is_empty() => {
                    self.next_char();
                    return Ok(items);
                }
                Some(QUOTE) => items.push(Literal::Quoted(self.read_quoted()?)),
                Some(c) if is_word_char(c) => items.push(Literal::Bare(self.read_word())),
                Some(c) => {
                    return Err(FilterError::syntax(format!(
                        "unexpected '{}' at position {} in list",
                        c, self.position
                    )))
                }
                None => {
                    return Err(FilterError::syntax(format!(
                        "unclosed list starting at position {}",
                        start
                    )))
                }
            }

            self.skip_whitespace();
            let separator_position = self.position;
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(items),
                Some(c) => {
                    return Err(FilterError::syntax(format!(
                        "expected ',' or ']' at position {}, found '{}'",
                        separator_position, c
                    )))
                }
                None => {
                    return Err(FilterError::syntax(format!(
                        "unclosed list starting at position {}",
                        start
                    )))
                }
            }
        }
    }

    /// Returns the next token with its position, or None at end of input.
    pub fn next_token(&mut self) -> FilterResult<Option<PositionedToken>> {
        self.skip_whitespace();

        let Some(&c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match c {
            '(' => {
                self.next_char();
                FilterToken::OpenParen
            }
            ')' => {
                self.next_char();
                FilterToken::CloseParen
            }
            '[' => FilterToken::List(self.read_list()?),
            QUOTE => FilterToken::Quoted(self.read_quoted()?),
            ']' | ',' => {
                return Err(FilterError::syntax(format!(
                    "unexpected '{}' at position {}",
                    c, position
                )))
            }
            _ => FilterToken::Word(self.read_word()),
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens, after checking bracket balance.
    pub fn tokenize(mut self) -> FilterResult<Vec<PositionedToken>> {
        check_balance(self.input)?;

        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}
