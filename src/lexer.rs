use crate::token::{lookup_ident, Token, TokenKind};

/// Single-pass lexer over the source code points. One or two characters of
/// lookahead resolve multi-character operators; malformed input becomes
/// `Illegal` tokens rather than errors, and the end of input yields `Eof`
/// forever.
#[derive(Debug)]
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek(0) {
            self.pos += 1;
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let ch = match self.next() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, ""),
        };

        match ch {
            '"' => {
                let lexeme = self.read_string();
                Token::new(TokenKind::String, lexeme)
            }
            '+' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::AddAssign, "+=")
                }
                Some('+') => {
                    self.next();
                    Token::new(TokenKind::Inc, "++")
                }
                _ => Token::new(TokenKind::Add, "+"),
            },
            '-' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::SubAssign, "-=")
                }
                Some('-') => {
                    self.next();
                    Token::new(TokenKind::Dec, "--")
                }
                _ => Token::new(TokenKind::Sub, "-"),
            },
            '*' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::MulAssign, "*=")
                }
                _ => Token::new(TokenKind::Mul, "*"),
            },
            '/' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::QuoAssign, "/=")
                }
                _ => Token::new(TokenKind::Quo, "/"),
            },
            '%' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::RemAssign, "%=")
                }
                _ => Token::new(TokenKind::Rem, "%"),
            },
            '&' => match self.peek(0) {
                Some('^') => match self.peek(1) {
                    Some('=') => {
                        self.next();
                        self.next();
                        Token::new(TokenKind::AndNotAssign, "&^=")
                    }
                    _ => {
                        self.next();
                        Token::new(TokenKind::AndNot, "&^")
                    }
                },
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::AndAssign, "&=")
                }
                Some('&') => {
                    self.next();
                    Token::new(TokenKind::Land, "&&")
                }
                _ => Token::new(TokenKind::And, "&"),
            },
            '|' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::OrAssign, "|=")
                }
                Some('|') => {
                    self.next();
                    Token::new(TokenKind::Lor, "||")
                }
                _ => Token::new(TokenKind::Or, "|"),
            },
            '^' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::XorAssign, "^=")
                }
                _ => Token::new(TokenKind::Xor, "^"),
            },
            '<' => match self.peek(0) {
                Some('<') => match self.peek(1) {
                    Some('=') => {
                        self.next();
                        self.next();
                        Token::new(TokenKind::ShlAssign, "<<=")
                    }
                    _ => {
                        self.next();
                        Token::new(TokenKind::Shl, "<<")
                    }
                },
                Some('-') => {
                    self.next();
                    Token::new(TokenKind::Arrow, "<-")
                }
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::Leq, "<=")
                }
                _ => Token::new(TokenKind::Lss, "<"),
            },
            '>' => match self.peek(0) {
                Some('>') => match self.peek(1) {
                    Some('=') => {
                        self.next();
                        self.next();
                        Token::new(TokenKind::ShrAssign, ">>=")
                    }
                    _ => {
                        self.next();
                        Token::new(TokenKind::Shr, ">>")
                    }
                },
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::Geq, ">=")
                }
                _ => Token::new(TokenKind::Gtr, ">"),
            },
            '=' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::Eql, "==")
                }
                _ => Token::new(TokenKind::Assign, "="),
            },
            '!' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::Neq, "!=")
                }
                _ => Token::new(TokenKind::Not, "!"),
            },
            ':' => match self.peek(0) {
                Some('=') => {
                    self.next();
                    Token::new(TokenKind::Define, ":=")
                }
                _ => Token::new(TokenKind::Colon, ":"),
            },
            '.' => match (self.peek(0), self.peek(1)) {
                (Some('.'), Some('.')) => {
                    self.next();
                    self.next();
                    Token::new(TokenKind::Ellipsis, "...")
                }
                _ => Token::new(TokenKind::Period, "."),
            },
            '(' => Token::new(TokenKind::Lparen, "("),
            ')' => Token::new(TokenKind::Rparen, ")"),
            '[' => Token::new(TokenKind::Lbrack, "["),
            ']' => Token::new(TokenKind::Rbrack, "]"),
            '{' => Token::new(TokenKind::Lbrace, "{"),
            '}' => Token::new(TokenKind::Rbrace, "}"),
            ',' => Token::new(TokenKind::Comma, ","),
            ';' => Token::new(TokenKind::Semicolon, ";"),
            ch if is_letter(ch) => {
                let lexeme = self.read_identifier(ch);
                Token::new(lookup_ident(&lexeme), lexeme)
            }
            ch if ch.is_ascii_digit() => {
                let lexeme = self.read_number(ch);
                Token::new(TokenKind::Int, lexeme)
            }
            _ => Token::new(TokenKind::Illegal, ""),
        }
    }

    fn read_identifier(&mut self, first: char) -> String {
        let mut lexeme = String::from(first);
        while let Some(ch) = self.peek(0) {
            if !is_letter(ch) && !ch.is_ascii_digit() {
                break;
            }
            lexeme.push(ch);
            self.pos += 1;
        }
        lexeme
    }

    fn read_number(&mut self, first: char) -> String {
        let mut lexeme = String::from(first);
        while let Some(ch) = self.peek(0) {
            if !ch.is_ascii_digit() {
                break;
            }
            lexeme.push(ch);
            self.pos += 1;
        }
        lexeme
    }

    // The lexeme excludes both quotes; no escape sequences exist.
    fn read_string(&mut self) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek(0) {
            if ch == '"' {
                break;
            }
            lexeme.push(ch);
            self.pos += 1;
        }
        self.next(); // closing quote, if any
        lexeme
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}
