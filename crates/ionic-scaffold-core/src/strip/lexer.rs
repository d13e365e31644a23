//! Minimal JavaScript/TypeScript tokenizer
//!
//! Only what type erasure needs: identifiers, literals, punctuators and the
//! byte span of each. Whitespace and comments are dropped, but a token records
//! whether a line break preceded it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    Str,
    Regex,
    /// `` `...` `` without substitutions
    TemplateFull,
    /// `` `...${ ``
    TemplateHead,
    /// `` }...${ ``
    TemplateMiddle,
    /// `` }...` ``
    TemplateTail,
    Punct,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub newline_before: bool,
}

const PUNCTUATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", "...", "<<=", "??=", "&&=", "||=", "=>", "==", "!=", "<=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "&&", "||", "??", "?.", "++", "--", "<<",
    "**",
];

/// Keywords after which a `/` starts a regular expression
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

const BOM: &[u8] = "\u{feff}".as_bytes();

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

pub fn tokenize(src: &str) -> Vec<Token> {
    Lexer {
        src,
        bytes: src.as_bytes(),
        pos: 0,
        tokens: Vec::new(),
        brace_depth: 0,
        template_stack: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    brace_depth: usize,
    /// Brace depth at which each open `${` was entered
    template_stack: Vec<usize>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Vec<Token> {
        loop {
            let newline_before = self.skip_trivia();
            if self.pos >= self.bytes.len() {
                break;
            }
            let start = self.pos;
            let kind = self.scan_token();
            self.tokens.push(Token {
                kind,
                start,
                end: self.pos,
                newline_before,
            });
        }
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Skip whitespace and comments, reporting whether a newline was crossed
    fn skip_trivia(&mut self) -> bool {
        let mut newline = false;
        while let Some(b) = self.peek(0) {
            match b {
                b'\n' => {
                    newline = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => {
                    while let Some(c) = self.peek(0) {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.pos += 2;
                    while self.pos < self.bytes.len()
                        && !self.bytes[self.pos..].starts_with(b"*/")
                    {
                        if self.bytes[self.pos] == b'\n' {
                            newline = true;
                        }
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.bytes.len());
                }
                _ if b >= 0x80 && self.bytes[self.pos..].starts_with(BOM) => {
                    self.pos += BOM.len();
                }
                _ => break,
            }
        }
        newline
    }

    fn scan_token(&mut self) -> TokenKind {
        let b = self.bytes[self.pos];

        if is_ident_byte(b) && !b.is_ascii_digit() || (b == b'#' && self.peek(1).is_some_and(is_ident_byte)) {
            self.pos += 1;
            while self.peek(0).is_some_and(is_ident_byte) {
                self.pos += 1;
            }
            return TokenKind::Ident;
        }

        if b.is_ascii_digit() || (b == b'.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
            self.scan_number();
            return TokenKind::Number;
        }

        match b {
            b'\'' | b'"' => {
                self.scan_string(b);
                TokenKind::Str
            }
            b'`' => {
                self.pos += 1;
                self.scan_template(true)
            }
            b'}' if self.template_stack.last() == Some(&self.brace_depth) => {
                self.pos += 1;
                self.scan_template(false)
            }
            b'/' if self.regex_allowed() => {
                if self.scan_regex() {
                    TokenKind::Regex
                } else {
                    self.pos += 1;
                    TokenKind::Punct
                }
            }
            _ => {
                self.scan_punct();
                TokenKind::Punct
            }
        }
    }

    fn scan_number(&mut self) {
        let hex = matches!(self.bytes[self.pos..], [b'0', b'x' | b'X', ..]);
        while let Some(c) = self.peek(0) {
            if !hex && (c == b'e' || c == b'E') && matches!(self.peek(1), Some(b'+') | Some(b'-')) {
                self.pos += 2;
            } else if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            match c {
                b'\\' => self.pos += 2,
                b'\n' => break,
                _ if c == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Scan template text after a backtick (`head`) or a closing `}`
    fn scan_template(&mut self, head: bool) -> TokenKind {
        if !head {
            self.template_stack.pop();
        }
        while let Some(c) = self.peek(0) {
            match c {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return if head {
                        TokenKind::TemplateFull
                    } else {
                        TokenKind::TemplateTail
                    };
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.pos += 2;
                    self.template_stack.push(self.brace_depth);
                    return if head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    };
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        if head {
            TokenKind::TemplateFull
        } else {
            TokenKind::TemplateTail
        }
    }

    fn regex_allowed(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return true;
        };
        let text = &self.src[prev.start..prev.end];
        match prev.kind {
            TokenKind::Ident => REGEX_PREFIX_KEYWORDS.contains(&text),
            TokenKind::Punct => !matches!(text, ")" | "]" | "}"),
            _ => false,
        }
    }

    /// Returns false (consuming nothing) when the slash does not start a regex
    fn scan_regex(&mut self) -> bool {
        let start = self.pos;
        let mut in_class = false;
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            match c {
                b'\\' => self.pos += 2,
                b'\n' => {
                    self.pos = start;
                    return false;
                }
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    while self.peek(0).is_some_and(is_ident_byte) {
                        self.pos += 1;
                    }
                    return true;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = start;
        false
    }

    fn scan_punct(&mut self) {
        let rest = &self.bytes[self.pos..];
        if let Some(p) = PUNCTUATORS.iter().find(|p| rest.starts_with(p.as_bytes())) {
            self.pos += p.len();
            return;
        }

        let c = self
            .src
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        match self.bytes[self.pos] {
            b'{' => self.brace_depth += 1,
            b'}' => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }
        self.pos += c;
    }
}
