//! Type erasure for TypeScript source
//!
//! Removes annotations, type declarations, type-only imports and the other
//! erasable syntax, leaving every other byte where it was. Whole-statement
//! removals take their line with them. Enums and constructor parameter
//! properties carry runtime semantics and are left untouched.

use super::lexer::{tokenize, Token, TokenKind};

/// Reserved words that never end an expression or name a callee
const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof",
    "new", "return", "switch", "throw", "try", "typeof", "var", "void", "while", "with", "yield",
    "let", "await",
];

/// Keywords that may directly precede a parenthesized expression
const PAREN_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "with", "return", "typeof", "await", "yield", "void",
    "delete", "in", "of", "instanceof", "new", "do", "else", "case", "throw", "super", "import",
];

/// Words after which an expression continues onto the next line
const CONTINUATION_WORDS: &[&str] = &[
    "extends", "keyof", "typeof", "new", "in", "of", "instanceof", "as", "satisfies", "is",
    "implements", "await", "yield", "void", "delete",
];

/// Erase TypeScript-only syntax from `source`
pub fn strip_types(source: &str) -> String {
    let tokens = tokenize(source);
    if tokens.is_empty() {
        return source.to_string();
    }
    let mut stripper = Stripper::new(source, tokens);
    stripper.run();
    stripper.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Paren,
    Bracket,
    Brace,
    ClassBody,
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Open,
    Close,
    None,
}

struct Stripper<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    removed: Vec<bool>,
    /// Byte ranges to drop; may overlap
    cuts: Vec<(usize, usize)>,
    frames: Vec<Frame>,
    /// The `{` that will open the next class body
    class_brace: Option<usize>,
    /// Class member tokens before this index were already handled
    member_done: usize,
}

impl<'a> Stripper<'a> {
    fn new(src: &'a str, tokens: Vec<Token>) -> Self {
        let removed = vec![false; tokens.len()];
        Self {
            src,
            tokens,
            removed,
            cuts: Vec::new(),
            frames: Vec::new(),
            class_brace: None,
            member_done: 0,
        }
    }

    // ---------------------------------------------------------------
    // Token queries
    // ---------------------------------------------------------------

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn text(&self, i: usize) -> &'a str {
        let src = self.src;
        self.tokens.get(i).map_or("", |t| &src[t.start..t.end])
    }

    fn kind(&self, i: usize) -> Option<TokenKind> {
        self.tokens.get(i).map(|t| t.kind)
    }

    fn is(&self, i: usize, text: &str) -> bool {
        i < self.len() && self.text(i) == text
    }

    fn is_punct(&self, i: usize, text: &str) -> bool {
        self.kind(i) == Some(TokenKind::Punct) && self.text(i) == text
    }

    fn is_ident(&self, i: usize) -> bool {
        self.kind(i) == Some(TokenKind::Ident)
    }

    fn is_name(&self, i: usize) -> bool {
        self.is_ident(i) && !KEYWORDS.contains(&self.text(i))
    }

    fn newline_before(&self, i: usize) -> bool {
        self.tokens.get(i).is_some_and(|t| t.newline_before)
    }

    fn prev_live(&self, i: usize) -> Option<usize> {
        (0..i).rev().find(|&j| !self.removed[j])
    }

    fn delimiter(&self, i: usize) -> Delim {
        match self.kind(i) {
            Some(TokenKind::TemplateHead) => Delim::Open,
            Some(TokenKind::TemplateTail) => Delim::Close,
            Some(TokenKind::Punct) => match self.text(i) {
                "(" | "[" | "{" => Delim::Open,
                ")" | "]" | "}" => Delim::Close,
                _ => Delim::None,
            },
            _ => Delim::None,
        }
    }

    /// Index of the delimiter closing the one at `open`
    fn matching(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for j in open..self.len() {
            match self.delimiter(j) {
                Delim::Open => depth += 1,
                Delim::Close => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(j);
                    }
                }
                Delim::None => {}
            }
        }
        None
    }

    /// Index of the `>` closing a type argument/parameter list at `open`
    fn match_angle(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut j = open;
        while j < self.len() {
            match self.kind(j)? {
                TokenKind::Ident | TokenKind::Str | TokenKind::Number | TokenKind::TemplateFull => {}
                TokenKind::Punct => match self.text(j) {
                    "<" => depth += 1,
                    ">" => {
                        depth = depth.checked_sub(1)?;
                        if depth == 0 {
                            return Some(j);
                        }
                    }
                    "(" | "[" | "{" => j = self.matching(j)?,
                    "," | "." | "|" | "&" | "?" | ":" | "=>" | "-" | "..." | "=" => {}
                    _ => return None,
                },
                _ => return None,
            }
            j += 1;
        }
        None
    }

    fn is_expression_end(&self, i: usize) -> bool {
        match self.kind(i) {
            Some(TokenKind::Ident) => self.is_name(i),
            Some(
                TokenKind::Number
                | TokenKind::Str
                | TokenKind::Regex
                | TokenKind::TemplateFull
                | TokenKind::TemplateTail,
            ) => true,
            Some(TokenKind::Punct) => matches!(self.text(i), ")" | "]" | "}"),
            _ => false,
        }
    }

    /// The token at `i` leaves its expression unfinished
    fn continues_after(&self, i: usize) -> bool {
        match self.kind(i) {
            Some(TokenKind::Punct) => !matches!(self.text(i), ")" | "]" | "}" | ";"),
            Some(TokenKind::Ident) => CONTINUATION_WORDS.contains(&self.text(i)),
            Some(TokenKind::TemplateHead | TokenKind::TemplateMiddle) => true,
            _ => false,
        }
    }

    /// The token at `i` continues the expression on the previous line
    fn continues_before(&self, i: usize) -> bool {
        match self.kind(i) {
            Some(TokenKind::Punct) => matches!(
                self.text(i),
                "." | "?." | "=>" | "|" | "&" | "&&" | "||" | "??" | "=" | "," | "?" | ":" | "+"
                    | "*" | "/" | "%" | "<" | ">"
            ),
            Some(TokenKind::Ident) => {
                matches!(self.text(i), "extends" | "as" | "satisfies" | "is" | "instanceof" | "in")
            }
            _ => false,
        }
    }

    fn at_statement_start(&self, i: usize) -> bool {
        match self.prev_live(i) {
            None => true,
            Some(p) => {
                (self.kind(p) == Some(TokenKind::Punct) && matches!(self.text(p), ";" | "{" | "}"))
                    || (self.newline_before(i) && !self.continues_after(p))
            }
        }
    }

    /// Index of the last token of the statement starting at `start`
    fn statement_end(&self, start: usize) -> usize {
        let mut last = start;
        let mut j = start;
        while j < self.len() {
            if j > start
                && self.newline_before(j)
                && !self.continues_after(last)
                && !self.continues_before(j)
            {
                return last;
            }
            match self.delimiter(j) {
                Delim::Open => match self.matching(j) {
                    Some(close) => {
                        last = close;
                        j = close + 1;
                        continue;
                    }
                    None => return self.len() - 1,
                },
                Delim::Close => return last,
                Delim::None => {}
            }
            if self.is_punct(j, ";") {
                return j;
            }
            last = j;
            j += 1;
        }
        last
    }

    /// Last token of an import/export clause, including its `;`
    fn module_clause_end(&self, start: usize) -> usize {
        let mut j = start + 1;
        while j < self.len() {
            if self.is_punct(j, "{") {
                let Some(close) = self.matching(j) else {
                    return self.len() - 1;
                };
                if self.is(close + 1, "from") {
                    j = close + 1;
                    continue;
                }
                return if self.is_punct(close + 1, ";") { close + 1 } else { close };
            }
            if self.kind(j) == Some(TokenKind::Str) {
                let mut end = j;
                if (self.is(end + 1, "with") || self.is(end + 1, "assert")) && self.is_punct(end + 2, "{") {
                    end = self.matching(end + 2).unwrap_or(end);
                }
                if self.is_punct(end + 1, ";") {
                    end += 1;
                }
                return end;
            }
            if self.is_punct(j, ";") {
                return j;
            }
            j += 1;
        }
        self.len() - 1
    }

    // ---------------------------------------------------------------
    // Type syntax
    // ---------------------------------------------------------------

    /// Index just past the type starting at `start` (`start` if none)
    fn skip_type(&self, start: usize) -> usize {
        let mut j = start;
        if self.is_punct(j, "|") || self.is_punct(j, "&") {
            j += 1;
        }
        let Some(mut end) = self.skip_type_operand(j) else {
            return start;
        };
        loop {
            while self.is_punct(end, "[") && !self.newline_before(end) {
                match self.matching(end) {
                    Some(close) => end = close + 1,
                    None => break,
                }
            }
            if self.is_punct(end, "|") || self.is_punct(end, "&") {
                if let Some(next) = self.skip_type_operand(end + 1) {
                    end = next;
                    continue;
                }
            }
            return end;
        }
    }

    fn skip_type_operand(&self, start: usize) -> Option<usize> {
        let mut j = start;
        while self.is_ident(j)
            && matches!(self.text(j), "keyof" | "typeof" | "readonly" | "unique" | "infer" | "asserts")
            && (self.is_ident(j + 1) || self.is_punct(j + 1, "{") || self.is_punct(j + 1, "["))
        {
            j += 1;
        }

        match self.kind(j)? {
            TokenKind::Ident => {
                if self.is(j, "new") && self.is_punct(j + 1, "(") {
                    return self.skip_type_operand(j + 1);
                }
                j += 1;
                while self.is_punct(j, ".") && self.is_ident(j + 1) {
                    j += 2;
                }
                if self.is_punct(j, "<") && !self.newline_before(j) {
                    j = self.match_angle(j)? + 1;
                }
                if self.is(j, "is") && !self.newline_before(j) {
                    return self.skip_type_operand(j + 1);
                }
                Some(j)
            }
            TokenKind::Str | TokenKind::Number | TokenKind::TemplateFull => Some(j + 1),
            TokenKind::Punct => match self.text(j) {
                "-" if self.kind(j + 1) == Some(TokenKind::Number) => Some(j + 2),
                "{" | "[" => Some(self.matching(j)? + 1),
                "(" => {
                    let close = self.matching(j)?;
                    if self.is_punct(close + 1, "=>") {
                        Some(self.skip_type(close + 2))
                    } else {
                        Some(close + 1)
                    }
                }
                "<" => {
                    let close = self.match_angle(j)?;
                    if self.is_punct(close + 1, "(") {
                        self.skip_type_operand(close + 1)
                    } else {
                        None
                    }
                }
                _ => None,
            },
            _ => None,
        }
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    fn cut(&mut self, start: usize, end: usize, first: usize, last: usize) {
        for removed in &mut self.removed[first..=last] {
            *removed = true;
        }
        self.cuts.push((start, end));
    }

    fn remove_tokens(&mut self, first: usize, last: usize) {
        let (start, end) = (self.tokens[first].start, self.tokens[last].end);
        self.cut(start, end, first, last);
    }

    /// Remove a whole statement, and its line when nothing else shares it
    fn remove_statement(&mut self, first: usize, last: usize) {
        let mut start = self.tokens[first].start;
        let mut end = self.tokens[last].end;

        let line_start = self.src[..start].rfind('\n').map_or(0, |p| p + 1);
        if self.src[line_start..start].trim().is_empty() {
            let rest = &self.src[end..];
            let after = rest.trim_start_matches([' ', '\t']);
            let trailing = rest.len() - after.len();
            if after.is_empty() {
                start = line_start;
                end = self.src.len();
            } else if after.starts_with('\n') {
                start = line_start;
                end += trailing + 1;
            } else if after.starts_with("\r\n") {
                start = line_start;
                end += trailing + 2;
            }
        }
        self.cut(start, end, first, last);
    }

    fn finish(mut self) -> String {
        self.cuts.sort_unstable();
        let mut out = String::with_capacity(self.src.len());
        let mut pos = 0;
        for (start, end) in self.cuts {
            if end <= pos {
                continue;
            }
            out.push_str(&self.src[pos..start.max(pos)]);
            pos = end;
        }
        out.push_str(&self.src[pos..]);
        out
    }

    // ---------------------------------------------------------------
    // Driver
    // ---------------------------------------------------------------

    fn run(&mut self) {
        let mut i = 0;
        while i < self.len() {
            if self.removed[i] {
                i += 1;
                continue;
            }
            if self.frames.last() == Some(&Frame::ClassBody) && self.at_member_start(i) {
                self.class_member(i);
                if self.removed[i] {
                    i += 1;
                    continue;
                }
            }
            i = match self.tokens[i].kind {
                TokenKind::Ident => self.identifier(i),
                TokenKind::Punct => self.punctuator(i),
                TokenKind::TemplateHead => {
                    self.frames.push(Frame::Template);
                    i + 1
                }
                TokenKind::TemplateTail => {
                    self.frames.pop();
                    i + 1
                }
                _ => i + 1,
            };
        }
    }

    fn identifier(&mut self, i: usize) -> usize {
        match self.text(i) {
            "import"
                if self.at_statement_start(i)
                    && !self.is_punct(i + 1, "(")
                    && !self.is_punct(i + 1, ".") =>
            {
                self.import_declaration(i)
            }
            "export" if self.at_statement_start(i) => self.export_declaration(i),
            "interface" if self.at_statement_start(i) && self.is_ident(i + 1) => {
                self.remove_declaration(i)
            }
            "type"
                if self.at_statement_start(i)
                    && self.is_ident(i + 1)
                    && !self.newline_before(i + 1)
                    && (self.is_punct(i + 2, "=") || self.is_punct(i + 2, "<")) =>
            {
                self.remove_declaration(i)
            }
            "declare"
                if self.at_statement_start(i)
                    && self.is_ident(i + 1)
                    && !self.newline_before(i + 1) =>
            {
                self.remove_declaration(i)
            }
            "abstract" if self.is(i + 1, "class") => {
                let (start, end) = (self.tokens[i].start, self.tokens[i + 1].start);
                self.cut(start, end, i, i);
                i + 1
            }
            "class" => {
                self.class_header(i);
                i + 1
            }
            "function" => self.function_header(i),
            "const" | "let" | "var" => {
                self.declarators(i);
                i + 1
            }
            "as" | "satisfies" => {
                self.assertion(i);
                i + 1
            }
            _ => i + 1,
        }
    }

    fn punctuator(&mut self, i: usize) -> usize {
        match self.text(i) {
            "{" => {
                let frame = if self.class_brace == Some(i) {
                    Frame::ClassBody
                } else {
                    Frame::Brace
                };
                self.frames.push(frame);
            }
            "(" => {
                self.frames.push(Frame::Paren);
                self.parameters(i);
            }
            "[" => self.frames.push(Frame::Bracket),
            ")" | "]" | "}" => {
                self.frames.pop();
            }
            "<" => self.type_arguments(i),
            "!" => self.non_null(i),
            _ => {}
        }
        i + 1
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn remove_declaration(&mut self, start: usize) -> usize {
        let end = self.statement_end(start);
        self.remove_statement(start, end);
        end + 1
    }

    fn import_declaration(&mut self, i: usize) -> usize {
        let end = self.module_clause_end(i);
        let type_only = self.is(i + 1, "type")
            && !self.is(i + 2, "from")
            && !self.is_punct(i + 2, ",")
            && !self.is_punct(i + 2, "=");
        if type_only {
            self.remove_statement(i, end);
            return end + 1;
        }

        if let Some(open) = (i + 1..=end).find(|&j| self.is_punct(j, "{")) {
            let bare = open == i + 1;
            if self.erase_type_specifiers(open) && bare {
                self.remove_statement(i, end);
            }
        }
        end + 1
    }

    fn export_declaration(&mut self, i: usize) -> usize {
        if self.is(i + 1, "type") && (self.is_punct(i + 2, "{") || self.is_punct(i + 2, "*")) {
            let end = self.module_clause_end(i);
            self.remove_statement(i, end);
            return end + 1;
        }

        let type_alias = self.is(i + 1, "type")
            && self.is_ident(i + 2)
            && (self.is_punct(i + 3, "=") || self.is_punct(i + 3, "<"));
        if type_alias || self.is(i + 1, "interface") || self.is(i + 1, "declare") {
            return self.remove_declaration(i);
        }

        if self.is_punct(i + 1, "{") {
            let end = self.module_clause_end(i);
            if self.erase_type_specifiers(i + 1) {
                self.remove_statement(i, end);
            }
            return end + 1;
        }
        i + 1
    }

    /// Drop `type X` specifiers from a `{ ... }` clause; true if none remain
    fn erase_type_specifiers(&mut self, open: usize) -> bool {
        let Some(close) = self.matching(open) else {
            return false;
        };

        let mut specifiers = Vec::new();
        let mut first = open + 1;
        for j in open + 1..=close {
            if j == close || self.is_punct(j, ",") {
                if first < j {
                    specifiers.push((first, j - 1));
                }
                first = j + 1;
            }
        }
        if specifiers.is_empty() {
            return false;
        }

        let type_only: Vec<bool> = specifiers
            .iter()
            .map(|&(a, b)| self.is(a, "type") && b > a && !(b == a + 2 && self.is(a + 1, "as")))
            .collect();
        if !type_only.iter().any(|&t| t) {
            return false;
        }
        if type_only.iter().all(|&t| t) {
            return true;
        }

        let mut k = 0;
        while k < specifiers.len() {
            if !type_only[k] {
                k += 1;
                continue;
            }
            let run_start = k;
            while k < specifiers.len() && type_only[k] {
                k += 1;
            }
            let (first_tok, _) = specifiers[run_start];
            let (_, last_tok) = specifiers[k - 1];
            if k < specifiers.len() {
                let next = specifiers[k].0;
                let (start, end) = (self.tokens[first_tok].start, self.tokens[next].start);
                self.cut(start, end, first_tok, next - 1);
            } else {
                let prev_end = specifiers[run_start - 1].1;
                let (start, end) = (self.tokens[prev_end].end, self.tokens[last_tok].end);
                self.cut(start, end, prev_end + 1, last_tok);
            }
        }
        false
    }

    fn class_header(&mut self, i: usize) {
        let mut j = i + 1;
        if self.is_ident(j) && !matches!(self.text(j), "extends" | "implements") {
            j += 1;
        }
        if self.is_punct(j, "<") {
            if let Some(close) = self.match_angle(j) {
                self.remove_tokens(j, close);
                j = close + 1;
            }
        }
        if self.is(j, "extends") {
            j += 1;
            while j < self.len() && !self.is_punct(j, "{") && !self.is(j, "implements") {
                if self.is_punct(j, "<") {
                    if let Some(close) = self.match_angle(j) {
                        self.remove_tokens(j, close);
                        j = close + 1;
                        continue;
                    }
                }
                if self.is_punct(j, "(") {
                    match self.matching(j) {
                        Some(close) => j = close + 1,
                        None => return,
                    }
                    continue;
                }
                j += 1;
            }
        }
        if self.is(j, "implements") {
            let Some(open) = (j..self.len()).find(|&k| self.is_punct(k, "{")) else {
                return;
            };
            let (start, end) = (self.tokens[j - 1].end, self.tokens[open - 1].end);
            self.cut(start, end, j, open - 1);
            j = open;
        }
        if self.is_punct(j, "{") {
            self.class_brace = Some(j);
        }
    }

    fn at_member_start(&self, i: usize) -> bool {
        if i < self.member_done {
            return false;
        }
        match self.prev_live(i) {
            None => false,
            Some(p) => {
                (self.kind(p) == Some(TokenKind::Punct) && matches!(self.text(p), ";" | "{" | "}"))
                    || (self.newline_before(i) && !self.continues_after(p))
            }
        }
    }

    fn member_name_follows(&self, i: usize) -> bool {
        !self.newline_before(i)
            && (self.is_ident(i)
                || matches!(self.kind(i), Some(TokenKind::Str | TokenKind::Number))
                || self.is_punct(i, "[")
                || self.is_punct(i, "*"))
    }

    fn class_member(&mut self, start: usize) {
        let mut j = start;
        let mut erased = false;
        while self.is_ident(j) && self.member_name_follows(j + 1) {
            match self.text(j) {
                "public" | "private" | "protected" | "readonly" | "override" => {
                    let (s, e) = (self.tokens[j].start, self.tokens[j + 1].start);
                    self.cut(s, e, j, j);
                }
                "abstract" | "declare" => erased = true,
                "static" | "async" | "get" | "set" | "accessor" => {}
                _ => break,
            }
            j += 1;
        }

        let index_signature =
            self.is_punct(j, "[") && self.is_ident(j + 1) && self.is_punct(j + 2, ":");
        if erased || index_signature {
            let end = self.statement_end(start);
            self.remove_statement(start, end);
            self.member_done = end + 1;
            return;
        }

        if self.is_punct(j, "*") {
            j += 1;
        }
        let name_end = if self.is_punct(j, "[") {
            self.matching(j).map(|close| close + 1)
        } else if self.is_ident(j) || matches!(self.kind(j), Some(TokenKind::Str | TokenKind::Number)) {
            Some(j + 1)
        } else {
            None
        };
        let Some(mut k) = name_end else {
            self.member_done = j;
            return;
        };

        let marker = if (self.is_punct(k, "?") || self.is_punct(k, "!"))
            && (matches!(self.text(k + 1), ":" | "(" | "=" | ";" | "}") || self.newline_before(k + 1))
        {
            k += 1;
            Some(k - 1)
        } else {
            None
        };
        if self.is_punct(k, ":") {
            let end = self.skip_type(k + 1);
            if end > k + 1 {
                self.remove_tokens(marker.unwrap_or(k), end - 1);
                k = end;
            }
        } else if let Some(m) = marker {
            self.remove_tokens(m, m);
        }
        self.member_done = k;
    }

    fn function_header(&mut self, i: usize) -> usize {
        let mut j = i + 1;
        if self.is_punct(j, "*") {
            j += 1;
        }
        if self.is_ident(j) {
            j += 1;
        }
        if self.is_punct(j, "<") {
            if let Some(close) = self.match_angle(j) {
                self.remove_tokens(j, close);
                j = close + 1;
            }
        }
        if !self.is_punct(j, "(") {
            return i + 1;
        }
        let Some(close) = self.matching(j) else {
            return i + 1;
        };

        let mut after = close + 1;
        if self.is_punct(after, ":") {
            after = self.skip_type(after + 1);
        }
        if self.is_punct(after, "{") {
            return i + 1;
        }

        // Overload signature: no body
        let mut start = i;
        while let Some(p) = start.checked_sub(1) {
            if matches!(self.text(p), "async" | "export" | "default") {
                start = p;
            } else {
                break;
            }
        }
        if !self.at_statement_start(start) {
            return i + 1;
        }
        let end = if self.is_punct(after, ";") { after } else { after - 1 };
        self.remove_statement(start, end);
        end + 1
    }

    fn declarators(&mut self, i: usize) {
        let mut j = i + 1;
        loop {
            let pattern_end = if self.is_punct(j, "{") || self.is_punct(j, "[") {
                self.matching(j).map(|close| close + 1)
            } else if self.is_ident(j) {
                Some(j + 1)
            } else {
                None
            };
            let Some(mut k) = pattern_end else {
                return;
            };

            let definite = self.is_punct(k, "!") && self.is_punct(k + 1, ":");
            if definite {
                k += 1;
            }
            if self.is_punct(k, ":") {
                let end = self.skip_type(k + 1);
                if end > k + 1 {
                    self.remove_tokens(if definite { k - 1 } else { k }, end - 1);
                    k = end;
                }
            }

            if self.is_punct(k, "=") {
                k = self.initializer_end(k + 1);
            }
            if !self.is_punct(k, ",") {
                return;
            }
            j = k + 1;
        }
    }

    /// First token after an initializer expression: `,`, `;` or the next line
    fn initializer_end(&self, start: usize) -> usize {
        let mut j = start;
        while j < self.len() {
            if j > start
                && self.newline_before(j)
                && !self.continues_after(j - 1)
                && !self.continues_before(j)
            {
                return j;
            }
            match self.delimiter(j) {
                Delim::Open => match self.matching(j) {
                    Some(close) => {
                        j = close + 1;
                        continue;
                    }
                    None => return self.len(),
                },
                Delim::Close => return j,
                Delim::None => {}
            }
            if self.is_punct(j, ",") || self.is_punct(j, ";") {
                return j;
            }
            j += 1;
        }
        j
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    fn parameters(&mut self, open: usize) {
        let Some(close) = self.matching(open) else {
            return;
        };
        let prev = self.prev_live(open);
        let prev_text = prev.map_or("", |p| self.text(p));

        let declared_function = prev.is_some_and(|p| {
            let before = self.prev_live(p);
            matches!(self.text(p), "function" | "catch")
                || (self.is_ident(p)
                    && before.is_some_and(|q| {
                        self.is(q, "function")
                            || (self.is_punct(q, "*")
                                && self.prev_live(q).is_some_and(|r| self.is(r, "function")))
                    }))
        });

        let arrow = self.is_punct(close + 1, "=>")
            || (self.is_punct(close + 1, ":") && {
                let end = self.skip_type(close + 2);
                end > close + 2 && self.is_punct(end, "=>")
            });

        let method = !PAREN_KEYWORDS.contains(&prev_text)
            && prev.is_some_and(|p| self.is_ident(p) || self.is_punct(p, "]"))
            && {
                let mut after = close + 1;
                if self.is_punct(after, ":") {
                    after = self.skip_type(after + 1);
                }
                self.is_punct(after, "{")
            };

        if !(declared_function || arrow || method) {
            return;
        }

        self.parameter_list(open, close);
        if self.is_punct(close + 1, ":") {
            let end = self.skip_type(close + 2);
            if end > close + 2 {
                self.remove_tokens(close + 1, end - 1);
            }
        }
    }

    fn parameter_list(&mut self, open: usize, close: usize) {
        let mut j = open + 1;
        while j < close {
            if self.is(j, "this") && self.is_punct(j + 1, ":") {
                let end = self.skip_type(j + 2);
                if self.is_punct(end, ",") {
                    let stop = self.tokens[end + 1].start;
                    self.cut(self.tokens[j].start, stop, j, end);
                    j = end + 1;
                } else {
                    self.remove_tokens(j, end - 1);
                    j = end;
                }
                continue;
            }

            if self.is_punct(j, "...") {
                j += 1;
            }
            let pattern_end = if self.is_punct(j, "{") || self.is_punct(j, "[") {
                self.matching(j).map(|c| c + 1)
            } else if self.is_ident(j) {
                Some(j + 1)
            } else {
                None
            };
            let Some(mut k) = pattern_end else {
                j = self.next_parameter(j, close);
                continue;
            };

            let optional =
                self.is_punct(k, "?") && matches!(self.text(k + 1), ":" | "," | ")" | "=");
            let marker = optional.then_some(k);
            if optional {
                k += 1;
            }
            if self.is_punct(k, ":") {
                let end = self.skip_type(k + 1);
                if end > k + 1 {
                    self.remove_tokens(marker.unwrap_or(k), end - 1);
                    k = end;
                }
            } else if let Some(m) = marker {
                self.remove_tokens(m, m);
            }
            j = self.next_parameter(k, close);
        }
    }

    fn next_parameter(&self, from: usize, close: usize) -> usize {
        let mut j = from;
        while j < close {
            if self.is_punct(j, ",") {
                return j + 1;
            }
            j = match self.delimiter(j) {
                Delim::Open => self.matching(j).map_or(close, |c| c + 1),
                _ => j + 1,
            };
        }
        close
    }

    /// `f<T>(...)` call type arguments and `<T>(x: T) => ...` arrow generics
    fn type_arguments(&mut self, i: usize) {
        let Some(prev) = self.prev_live(i) else {
            return;
        };
        let Some(close) = self.match_angle(i) else {
            return;
        };

        let callee = self.is_name(prev) && self.tokens[prev].end == self.tokens[i].start;
        if callee {
            let call = self.is_punct(close + 1, "(")
                || matches!(self.kind(close + 1), Some(TokenKind::TemplateFull | TokenKind::TemplateHead));
            if call {
                self.remove_tokens(i, close);
            }
            return;
        }

        if !self.is_expression_end(prev) && self.is_punct(close + 1, "(") {
            if let Some(paren) = self.matching(close + 1) {
                if self.is_punct(paren + 1, "=>") || self.is_punct(paren + 1, ":") {
                    self.remove_tokens(i, close);
                }
            }
        }
    }

    fn non_null(&mut self, i: usize) {
        let Some(prev) = i.checked_sub(1) else {
            return;
        };
        if self.removed[prev] || self.tokens[prev].end != self.tokens[i].start {
            return;
        }
        if !(self.is_name(prev) || self.is_punct(prev, ")") || self.is_punct(prev, "]")) {
            return;
        }
        let postfix = i + 1 >= self.len()
            || self.newline_before(i + 1)
            || (self.kind(i + 1) == Some(TokenKind::Punct)
                && matches!(
                    self.text(i + 1),
                    "." | "?." | ")" | "]" | "," | ";" | "[" | "}" | ":" | "=" | "("
                ));
        if postfix {
            self.remove_tokens(i, i);
        }
    }

    /// `expr as T` and `expr satisfies T`
    fn assertion(&mut self, i: usize) {
        let Some(prev) = self.prev_live(i) else {
            return;
        };
        if self.newline_before(i) || !self.is_expression_end(prev) {
            return;
        }
        let end = self.skip_type(i + 1);
        if end == i + 1 {
            return;
        }
        let (start, stop) = (self.tokens[prev].end, self.tokens[end - 1].end);
        self.cut(start, stop, i, end - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_annotations() {
        let input = "function isSelected(tab: Tab, pathname: string): boolean {\n\treturn pathname.startsWith(tab.href);\n}\n";
        assert_eq!(
            strip_types(input),
            "function isSelected(tab, pathname) {\n\treturn pathname.startsWith(tab.href);\n}\n"
        );
    }

    #[test]
    fn test_declarations_and_imports() {
        let input = r#"import type { Snippet } from 'svelte';
import { onMount, type ComponentProps } from 'svelte';

interface Props {
	title: string;
	children?: Snippet;
}

type Tab = { href: string } | { label: string };

let { title, children }: Props = $props();
const count = $state<number>(0);
const el = document.getElementById('x')!;
const value = (input as HTMLInputElement).value;
"#;
        let expected = "import { onMount } from 'svelte';\n\n\n\n\
let { title, children } = $props();\n\
const count = $state(0);\n\
const el = document.getElementById('x');\n\
const value = (input).value;\n";
        assert_eq!(strip_types(input), expected);
    }

    #[test]
    fn test_class_members() {
        let input = r#"export abstract class Store<T> implements Readable<T> {
	private items: T[] = [];
	declare size: number;
	protected get first(): T | undefined {
		return this.items[0];
	}
	add(item: T): void {
		this.items.push(item);
	}
}
"#;
        let expected = r#"export class Store {
	items = [];
	get first() {
		return this.items[0];
	}
	add(item) {
		this.items.push(item);
	}
}
"#;
        assert_eq!(strip_types(input), expected);
    }

    #[test]
    fn test_assertions_and_generic_arrows() {
        let input = "const routes = ['a', 'b'] as const;\n\
export default { kit: {} } satisfies Config;\n\
const id = <T,>(value: T): T => value;\n";
        let expected = "const routes = ['a', 'b'];\n\
export default { kit: {} };\n\
const id = (value) => value;\n";
        assert_eq!(strip_types(input), expected);
    }

    #[test]
    fn test_overload_signatures_removed() {
        let input = "export function parse(input: string): number;\n\
export function parse(input: number): number;\n\
export function parse(input: any): number {\n\treturn Number(input);\n}\n";
        assert_eq!(
            strip_types(input),
            "export function parse(input) {\n\treturn Number(input);\n}\n"
        );
    }

    #[test]
    fn test_plain_javascript_untouched() {
        let input = r#"const re = /<(\w+)>/g;
const msg = `${count > 1 ? 'items' : 'item'}: ${total}`;
function pick(a, b = a ? 1 : 2) { return a < b ? a : b; }
if (x) { y(); }
const obj = { key: value, nested: { deep: [1, 2] } };
"#;
        assert_eq!(strip_types(input), input);
    }

    #[test]
    fn test_stripping_is_idempotent() {
        let input = r#"import type { Page } from '@sveltejs/kit';
export type Planet = { name: string; moons?: number };
export const load = async ({ params }: { params: Record<string, string> }): Promise<Planet> => {
	const planets: Planet[] = [];
	return planets.find((p: Planet) => p.name === params.name)!;
};
"#;
        let once = strip_types(input);
        assert!(!once.contains("Planet[]"));
        assert!(!once.contains("import type"));
        assert!(once.contains("export const load = async ({ params }) => {"));
        assert!(once.contains("planets.find((p) => p.name === params.name);"));
        assert_eq!(strip_types(&once), once);
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert_eq!(strip_types(""), "");
        assert_eq!(strip_types("// just a note\n"), "// just a note\n");
    }

    #[test]
    fn test_non_ascii_comments_and_strings() {
        let input = "/** Load the planets \u{2014} caf\u{e9} */\nexport function load(n: number) { return n; }\nconst label: string = '\u{3c0} \u{2248} 3.14'; // r\u{e9}sum\u{e9}\n";
        assert_eq!(
            strip_types(input),
            "/** Load the planets \u{2014} caf\u{e9} */\nexport function load(n) { return n; }\nconst label = '\u{3c0} \u{2248} 3.14'; // r\u{e9}sum\u{e9}\n"
        );
    }
}
