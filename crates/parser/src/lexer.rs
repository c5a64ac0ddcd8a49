//! DyeScript statement lexer
//!
//! Splits source text into statements (one per line) made of
//! whitespace-separated raw tokens.

use crate::error::{ParseError, ParseResult, SourceLocation};
use crate::ParsedSource;

/// DyeScript lexer
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.position = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    /// Skip whitespace that does not end a statement
    fn skip_inline_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c != '\n' && c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume a `//` comment up to (not including) the line break
    fn consume_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Consume a `/* ... */` comment; returns whether it crossed a line break
    fn consume_block_comment(&mut self) -> ParseResult<bool> {
        let start = self.location();
        self.advance(); // consume '/'
        self.advance(); // consume '*'

        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(self.line > start.line);
                }
                Some(_) => continue,
                None => return Err(ParseError::UnterminatedComment { location: start }),
            }
        }
    }

    /// Get the next statement, or `None` at end of input
    pub fn next_statement(&mut self) -> ParseResult<Option<ParsedSource>> {
        let mut content = Vec::new();
        let mut index = self.location();

        loop {
            self.skip_inline_whitespace();

            match self.peek() {
                None => break,
                Some('\n') => {
                    self.advance();
                    if !content.is_empty() {
                        break;
                    }
                }
                Some('/') if self.peek_second() == Some('/') => self.consume_line_comment(),
                Some('/') if self.peek_second() == Some('*') => {
                    // A comment spanning lines still ends the statement it follows
                    if self.consume_block_comment()? && !content.is_empty() {
                        break;
                    }
                }
                Some(_) => {
                    if content.is_empty() {
                        index = self.location();
                    }
                    content.push(self.consume_token()?);
                }
            }
        }

        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ParsedSource::new(content, index)))
        }
    }

    /// Consume one raw token
    ///
    /// Quotes at the top level are removed; inside parentheses the token is
    /// kept verbatim, whitespace included.
    fn consume_token(&mut self) -> ParseResult<String> {
        let mut token = String::new();
        let mut depth = 0usize;
        let mut open = self.location();

        while let Some(c) = self.peek() {
            match c {
                '\n' if depth > 0 => return Err(ParseError::unbalanced('(', open)),
                _ if c.is_whitespace() && depth == 0 => break,
                '"' | '\'' if token.is_empty() || depth > 0 => {
                    self.consume_string(&mut token, depth > 0)?
                }
                '(' => {
                    if depth == 0 {
                        open = self.location();
                    }
                    depth += 1;
                    token.push(c);
                    self.advance();
                }
                ')' => {
                    if depth == 0 {
                        return Err(ParseError::unbalanced(')', self.location()));
                    }
                    depth -= 1;
                    token.push(c);
                    self.advance();
                }
                _ => {
                    token.push(c);
                    self.advance();
                }
            }
        }

        if depth > 0 {
            return Err(ParseError::unbalanced('(', open));
        }

        Ok(token)
    }

    /// Consume a quoted string into `token`
    fn consume_string(&mut self, token: &mut String, keep_quotes: bool) -> ParseResult<()> {
        let start = self.location();
        let quote = match self.advance() {
            Some(q) => q,
            None => return Err(ParseError::UnterminatedString { location: start }),
        };
        if keep_quotes {
            token.push(quote);
        }

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if keep_quotes {
                        token.push(quote);
                    }
                    return Ok(());
                }
                Some('\\') => match self.advance() {
                    Some('\n') | None => {
                        return Err(ParseError::UnterminatedString { location: start })
                    }
                    Some(c) => {
                        if keep_quotes {
                            token.push('\\');
                        }
                        token.push(c);
                    }
                },
                Some('\n') | None => {
                    return Err(ParseError::UnterminatedString { location: start });
                }
                Some(c) => token.push(c),
            }
        }
    }

    /// Lex the whole input into statements
    pub fn statements(mut self) -> ParseResult<Vec<ParsedSource>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.next_statement()? {
            statements.push(statement);
        }
        log::debug!("Lexed {} statements", statements.len());
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<ParsedSource> {
        Lexer::new(input).statements().unwrap()
    }

    #[test]
    fn test_one_statement_per_line() {
        let statements = lex("# main\n$ .box color red\n");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].content, vec!["#", "main"]);
        assert_eq!(statements[1].content, vec!["$", ".box", "color", "red"]);
    }

    #[test]
    fn test_blank_lines_and_indentation() {
        let statements = lex("\n\n   @ primary red  \n\t\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].content, vec!["@", "primary", "red"]);
        assert_eq!(statements[0].index.line, 3);
        assert_eq!(statements[0].index.column, 4);
    }

    #[test]
    fn test_quoted_token() {
        let statements = lex(r#"$ .box border "1px solid red""#);
        assert_eq!(statements[0].content[3], "1px solid red");
    }

    #[test]
    fn test_escaped_quote() {
        let statements = lex(r#"$ .q content "say \"hi\"""#);
        assert_eq!(statements[0].content[3], "say \"hi\"");
    }

    #[test]
    fn test_parenthesized_token() {
        let statements = lex("$ .box color rgb(0, 0, 0) margin 0");
        assert_eq!(
            statements[0].content,
            vec!["$", ".box", "color", "rgb(0, 0, 0)", "margin", "0"]
        );
    }

    #[test]
    fn test_quotes_inside_parens_kept() {
        let statements = lex(r#"% Inter url("a b.woff2")"#);
        assert_eq!(statements[0].content[2], r#"url("a b.woff2")"#);
    }

    #[test]
    fn test_comments() {
        let statements = lex("// heading\n@ a 1 // trailing\n/* block\n spanning */ @ b 2");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].content, vec!["@", "a", "1"]);
        assert_eq!(statements[1].content, vec!["@", "b", "2"]);
    }

    #[test]
    fn test_block_comment_ends_statement() {
        let statements = lex("@ a 1 /* note\n */ @ b 2\n$ x w &a h &b");
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].content, vec!["@", "a", "1"]);
        assert_eq!(statements[1].content, vec!["@", "b", "2"]);
        assert_eq!(statements[1].index.line, 2);
        assert_eq!(statements[2].content, vec!["$", "x", "w", "&a", "h", "&b"]);
    }

    #[test]
    fn test_inline_block_comment() {
        let statements = lex("@ a /* same line */ 1\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].content, vec!["@", "a", "1"]);
    }

    #[test]
    fn test_quote_inside_token_is_literal() {
        let statements = lex("$ q::before content Inter's\n@ a 1");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].content[3], "Inter's");
    }

    #[test]
    fn test_slashes_inside_token_are_not_comments() {
        let statements = lex("% Inter https://fonts.example/inter.woff2");
        assert_eq!(statements[0].content[2], "https://fonts.example/inter.woff2");
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("@ a \"open\n").statements().unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { .. }));
        assert_eq!(err.location().column, 5);
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = Lexer::new("@ a rgb(0, 0\n").statements().unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedParen { character: '(', .. }));

        let err = Lexer::new("@ a 0)").statements().unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedParen { character: ')', .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("@ a 1 /* never closed").statements().unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(lex("").is_empty());
        assert!(lex("  \n // only a comment\n").is_empty());
    }
}
