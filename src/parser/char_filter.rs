/// `CharFilter` - Iterator that filters out string literals and comments
///
/// Wraps a character iterator and tracks whether the current position lies
/// inside a string literal (`"..."`, `"""..."""`, `'c'`), a `${...}` template
/// expression, a line comment or a (nested) block comment. The wrap engine uses
/// it as its quote-parity guard: a keyword or bracket that only appears inside
/// a literal must never be chosen as a split point.

/// Type of literal we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Double, // "..."
    Raw,    // """..."""
    Char,   // 'c'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comment {
    None,
    Line,
    Block(usize),
}

/// Iterator adapter that yields only code characters
///
/// Yields (position, character) pairs for the characters that are actual Kotlin
/// code, skipping literal contents and comments when asked to.
pub struct CharFilter<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    instring: StringDelimiter,
    comment: Comment,
    /// Open `${` templates: the delimiter to resume and the brace depth inside
    templates: Vec<(StringDelimiter, usize)>,
    filter_comments: bool,
    filter_strings: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter`
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to skip comments
    /// * `filter_strings` - Whether to skip literal contents (including quotes)
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self {
            chars: content.char_indices().peekable(),
            instring: StringDelimiter::None,
            comment: Comment::None,
            templates: Vec::new(),
            filter_comments,
            filter_strings,
        }
    }

    /// Check if we're currently inside a literal
    #[must_use]
    pub fn instring(&self) -> bool {
        self.instring != StringDelimiter::None
    }

    /// Check if we're currently inside a comment
    #[must_use]
    pub fn incomment(&self) -> bool {
        self.comment != Comment::None
    }

    /// Get the filtered content as a string
    pub fn filter_all(&mut self) -> String {
        let size_hint = self.chars.size_hint().0;
        let mut result = String::with_capacity(size_hint);
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consume `n` more characters if they all equal `c`; returns whether it did
    fn eat_run(&mut self, c: char, n: usize) -> bool {
        let mut probe = self.chars.clone();
        for _ in 0..n {
            match probe.next() {
                Some((_, next)) if next == c => {}
                _ => return false,
            }
        }
        for _ in 0..n {
            self.chars.next();
        }
        true
    }

    fn step_string(&mut self, c: char) {
        let delimiter = self.instring;
        match delimiter {
            StringDelimiter::Double | StringDelimiter::Char if c == '\\' => {
                self.chars.next(); // escaped character
            }
            StringDelimiter::Double if c == '"' => self.instring = StringDelimiter::None,
            StringDelimiter::Char if c == '\'' => self.instring = StringDelimiter::None,
            StringDelimiter::Raw if c == '"' && self.eat_run('"', 2) => {
                // Kotlin allows extra quotes before the closing triple
                while self.peek_char() == Some('"') {
                    self.chars.next();
                }
                self.instring = StringDelimiter::None;
            }
            StringDelimiter::Double | StringDelimiter::Raw
                if c == '$' && self.peek_char() == Some('{') =>
            {
                self.chars.next();
                self.templates.push((delimiter, 0));
                self.instring = StringDelimiter::None;
            }
            _ => {}
        }
    }

    fn step_code(&mut self, c: char) {
        match c {
            '"' => {
                self.instring = if self.eat_run('"', 2) {
                    StringDelimiter::Raw
                } else {
                    StringDelimiter::Double
                };
            }
            '\'' => self.instring = StringDelimiter::Char,
            '/' if self.peek_char() == Some('/') => self.comment = Comment::Line,
            '/' if self.peek_char() == Some('*') => {
                self.chars.next();
                self.comment = Comment::Block(1);
            }
            '{' => {
                if let Some(top) = self.templates.last_mut() {
                    top.1 += 1;
                }
            }
            '}' => {
                if let Some(&(delim, depth)) = self.templates.last() {
                    if depth == 0 {
                        self.templates.pop();
                        self.instring = delim;
                    } else if let Some(top) = self.templates.last_mut() {
                        top.1 -= 1;
                    }
                }
            }
            _ => {}
        }
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, c) = self.chars.next()?;

            match self.comment {
                Comment::Line => {
                    if c == '\n' {
                        self.comment = Comment::None;
                        return Some((pos, c));
                    }
                    if self.filter_comments {
                        continue;
                    }
                    return Some((pos, c));
                }
                Comment::Block(depth) => {
                    if c == '*' && self.peek_char() == Some('/') {
                        self.chars.next();
                        self.comment = if depth == 1 {
                            Comment::None
                        } else {
                            Comment::Block(depth - 1)
                        };
                    } else if c == '/' && self.peek_char() == Some('*') {
                        self.chars.next();
                        self.comment = Comment::Block(depth + 1);
                    }
                    if self.filter_comments {
                        continue;
                    }
                    return Some((pos, c));
                }
                Comment::None => {}
            }

            if self.instring != StringDelimiter::None {
                self.step_string(c);
                if self.filter_strings {
                    continue;
                }
                return Some((pos, c));
            }

            self.step_code(c);
            if self.incomment() && self.filter_comments {
                continue;
            }
            if self.instring() && self.filter_strings {
                continue;
            }
            return Some((pos, c));
        }
    }
}

/// Whether byte position `pos` of `text` lies inside a literal or comment
///
/// Everything before `pos` is scanned; a position is "inside" when the literal
/// or comment opened before it is still open.
#[must_use]
pub fn in_literal_at(text: &str, pos: usize) -> bool {
    let mut filter = CharFilter::new(text, false, false);
    while let Some((p, _)) = filter.chars.peek().copied() {
        if p >= pos {
            break;
        }
        filter.next();
    }
    filter.instring() || filter.incomment()
}
