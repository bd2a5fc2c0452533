use std::iter::Peekable;
use tracing::{debug, trace};
use super::charset;
use super::lex::{Lexer, LexError, Token, TokenKind};
use super::reader::GrammarSource;
use super::rule::Rule;
use super::{GrammarError, RuleErrorKind};

/// Parses every rule of `source`, stopping at the first malformed line.
pub fn parse(source: &GrammarSource) -> Result<Vec<Rule>, GrammarError> {
  let mut rules = vec![];

  for (line_no, line) in source.lines() {
    if let Some(rule) = parse_line(line, line_no)? {
      trace!(line = line_no, state = %rule.state, "rule parsed");
      rules.push(rule);
    }
  }

  debug!(rules = rules.len(), "grammar parsed");

  Ok(rules)
}

/// Parses a single grammar line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Rule>, GrammarError> {
  let text = line.trim();
  if text.is_empty() || text.starts_with('#') {
    return Ok(None);
  }

  LineParser {
    line,
    line_no,
    tokens: Lexer::new(line).peekable(),
  }.parse().map(Some)
}

struct LineParser<'a> {
  line: &'a str,
  line_no: usize,
  tokens: Peekable<Lexer<'a>>,
}

impl<'a> LineParser<'a> {
  fn parse(mut self) -> Result<Rule, GrammarError> {
    let state = match self.next_token()? {
      Some((_, Token { kind: TokenKind::Ident, text }, _)) => text.to_owned(),
      Some((start, ..)) => return Err(self.error(RuleErrorKind::MissingState, start)),
      None => return Err(self.error(RuleErrorKind::MissingState, 0)),
    };

    let input = match self.next_token()? {
      Some((start, Token { kind, text }, _))
        if kind == TokenKind::CharClass || kind == TokenKind::NegCharClass =>
      {
        let exclude = kind == TokenKind::NegCharClass;
        let body_start = if exclude { start + 2 } else { start + 1 };
        charset::expand(text, exclude, body_start)
          .map_err(|err| self.lex_error(err))?
      }
      Some((start, ..)) => return Err(self.error(RuleErrorKind::MissingInput, start)),
      None => return Err(self.error(RuleErrorKind::MissingInput, self.line.len())),
    };

    let shift = match self.next_token()? {
      Some((_, Token { kind: TokenKind::Shift, .. }, _)) => true,
      Some((_, Token { kind: TokenKind::Peek, .. }, _)) => false,
      Some((start, ..)) => return Err(self.error(RuleErrorKind::MissingArrow, start)),
      None => return Err(self.error(RuleErrorKind::MissingArrow, self.line.len())),
    };

    let mut pop = false;
    if let Some(Ok((_, Token { kind: TokenKind::Pop, .. }, _))) = self.tokens.peek() {
      self.tokens.next();
      pop = true;
    }

    let mut transition = vec![];
    let mut callback = None;

    while let Some((start, token, _)) = self.next_token()? {
      match token.kind {
        TokenKind::Ident if callback.is_none() => {
          transition.push(token.text.to_owned());
        }
        TokenKind::Callback if callback.is_none() => {
          callback = Some(token.text.to_owned());
        }
        TokenKind::Pop => {
          return Err(self.error(RuleErrorKind::MisplacedPop, start));
        }
        _ => {
          return Err(self.error(RuleErrorKind::UnexpectedToken, start));
        }
      }
    }

    Ok(Rule {
      line: self.line_no,
      state,
      input,
      shift,
      pop,
      transition,
      callback,
    })
  }

  fn next_token(&mut self) -> Result<Option<(usize, Token<'a>, usize)>, GrammarError> {
    match self.tokens.next() {
      Some(Ok(token)) => Ok(Some(token)),
      Some(Err(err)) => Err(self.lex_error(err)),
      None => Ok(None),
    }
  }

  fn lex_error(&self, err: LexError) -> GrammarError {
    self.error(err.kind, err.span.0)
  }

  fn error(&self, kind: RuleErrorKind, pos: usize) -> GrammarError {
    let column = self.line.get(..pos)
      .map_or(pos, |prefix| prefix.chars().count()) + 1;

    GrammarError::MalformedRule {
      line: self.line_no,
      column,
      text: self.line.trim().to_owned(),
      kind,
    }
  }
}
