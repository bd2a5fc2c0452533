use std::str::CharIndices;
use std::iter::Peekable;
use std::fmt::{self, Display};
use super::RuleErrorKind;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
  Ident,
  /// `[...]`, text is the class body without brackets.
  CharClass,
  /// `![...]`
  NegCharClass,
  /// `->`
  Shift,
  /// `=>`
  Peek,
  /// `^`
  Pop,
  /// `@name`, text is the name without `@`.
  Callback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
  pub kind: TokenKind,
  pub text: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct LexError {
  pub kind: RuleErrorKind,
  pub span: (usize, usize),
}

/// Splits one grammar line into tokens. A `#` outside of a character class
/// ends the line.
pub struct Lexer<'a> {
  input: &'a str,
  chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      chars: input.char_indices().peekable(),
    }
  }

  fn token(
    &self, kind: TokenKind, start: usize, end: usize
  ) -> Option<<Self as Iterator>::Item> {
    Some(self.token_with_text(kind, start, start, end, end))
  }

  fn token_with_text(
    &self,
    kind: TokenKind,
    start: usize,
    text_start: usize,
    text_end: usize,
    end: usize,
  ) -> <Self as Iterator>::Item {
    let token = Token {
      kind,
      text: &self.input[text_start..text_end],
    };
    Ok((start, token, end))
  }

  fn error(
    &self, kind: RuleErrorKind, start: usize, end: usize
  ) -> Option<<Self as Iterator>::Item> {
    Some(Err(LexError {
      kind,
      span: (start, end),
    }))
  }

  fn lex_ident(&mut self, start: usize) -> usize {
    let mut end = start;
    while let Some(&(i, c)) = self.chars.peek() {
      if !is_ident_char(c) {
        break;
      }
      end = i + 1;
      self.chars.next();
    }
    end
  }

  /// `body_start` is the index just after `[`.
  fn lex_class(
    &mut self,
    start: usize,
    body_start: usize,
    kind: TokenKind,
  ) -> Option<<Self as Iterator>::Item> {
    let mut unescaped = true;
    loop {
      match self.chars.next() {
        Some((_, '\\')) => {
          unescaped = !unescaped;
        }
        Some((k, ']')) if unescaped => {
          return Some(self.token_with_text(kind, start, body_start, k, k + 1));
        }
        Some(_) => {
          unescaped = true;
        }
        None => {
          return self.error(RuleErrorKind::UnclosedCharClass, start, self.input.len());
        }
      }
    }
  }
}

impl<'a> Iterator for Lexer<'a> {
  type Item = Spanned<Token<'a>, usize, LexError>;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some((_, ' ' | '\t' | '\r')) = self.chars.peek() {
      self.chars.next();
    }

    let (j, c) = self.chars.next()?;

    match c {
      '#' => {
        while self.chars.next().is_some() {}
        None
      }
      '[' => self.lex_class(j, j + 1, TokenKind::CharClass),
      '!' => {
        if let Some((_, '[')) = self.chars.peek() {
          self.chars.next();
          self.lex_class(j, j + 2, TokenKind::NegCharClass)
        } else {
          self.error(RuleErrorKind::InvalidChar, j, j + 1)
        }
      }
      '-' | '=' => {
        if let Some((_, '>')) = self.chars.peek() {
          self.chars.next();
          let kind = if c == '-' { TokenKind::Shift } else { TokenKind::Peek };
          self.token(kind, j, j + 2)
        } else {
          self.error(RuleErrorKind::InvalidChar, j, j + 1)
        }
      }
      '^' => self.token(TokenKind::Pop, j, j + 1),
      '@' => {
        match self.chars.peek() {
          Some(&(_, c)) if is_ident_start(c) => {
            let end = self.lex_ident(j + 1);
            Some(self.token_with_text(TokenKind::Callback, j, j + 1, end, end))
          }
          _ => self.error(RuleErrorKind::MissingCallbackName, j, j + 1),
        }
      }
      _ if is_ident_start(c) => {
        let end = self.lex_ident(j + 1);
        self.token(TokenKind::Ident, j, end)
      }
      _ if !c.is_ascii() => self.error(RuleErrorKind::NonAscii, j, j + c.len_utf8()),
      _ => self.error(RuleErrorKind::InvalidChar, j, j + 1),
    }
  }
}

fn is_ident_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Display for Token<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "<{:?}: {:?}>", self.kind, self.text)
  }
}
