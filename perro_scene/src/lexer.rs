use crate::SceneParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String), // name, position, Node3D
    Number(f32),
    String(String),

    At,     // @
    Equals, // =
    Comma,  // ,
    LParen, // (
    RParen, // )

    LBracket, // [
    RBracket, // ]

    Slash, // /
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Number(n) => format!("number `{n}`"),
            Token::String(s) => format!("string {s:?}"),
            Token::At => "`@`".to_string(),
            Token::Equals => "`=`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::Slash => "`/`".to_string(),
            Token::Eof => "end of file".to_string(),
        }
    }
}

pub struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    peek: Option<char>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut chars = src.chars();
        let peek = chars.next();
        Self {
            chars,
            peek,
            line: 1,
        }
    }

    /// Line of the next unread character (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    fn bump(&mut self) -> Option<char> {
        let cur = self.peek;
        self.peek = self.chars.next();
        if cur == Some('\n') {
            self.line += 1;
        }
        cur
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            match self.peek {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                // `#` comments run to end of line
                Some('#') => {
                    while !matches!(self.peek, None | Some('\n')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, SceneParseError> {
        loop {
            self.skip_ws_and_comments();

            let c = match self.bump() {
                Some(c) => c,
                None => return Ok(Token::Eof),
            };

            let token = match c {
                '@' => Token::At,
                '=' => Token::Equals,
                ',' => Token::Comma,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                '/' => Token::Slash,

                '"' => {
                    let line = self.line;
                    let mut s = String::new();
                    loop {
                        match self.bump() {
                            Some('"') => break,
                            Some('\\') => match self.bump() {
                                Some(escaped) => s.push(escaped),
                                None => return Err(SceneParseError::UnterminatedString { line }),
                            },
                            Some(c) => s.push(c),
                            None => return Err(SceneParseError::UnterminatedString { line }),
                        }
                    }
                    Token::String(s)
                }

                c if c.is_ascii_digit() || c == '-' => {
                    let mut s = String::new();
                    s.push(c);
                    while let Some(p) = self.peek {
                        if !(p.is_ascii_digit() || p == '.') {
                            break;
                        }
                        s.push(p);
                        self.bump();
                    }
                    let n = s.parse().map_err(|_| SceneParseError::InvalidNumber {
                        line: self.line,
                        text: s.clone(),
                    })?;
                    Token::Number(n)
                }

                c if c.is_alphanumeric() || c == '_' => {
                    let mut s = String::new();
                    s.push(c);
                    while let Some(p) = self.peek {
                        if !(p.is_alphanumeric() || p == '_' || p == '.') {
                            break;
                        }
                        s.push(p);
                        self.bump();
                    }
                    Token::Ident(s)
                }

                // anything else is noise between tokens
                _ => continue,
            };
            return Ok(token);
        }
    }
}
