//! Hard wrapping of plain text output
//!
//! Every source line is wrapped on its own, so existing line breaks always
//! survive. Within a line, breaks happen at whitespace and after hyphens inside
//! words; whitespace at a break is dropped, and words longer than the width are
//! split.

const TAB_SIZE: usize = 8;

/// Wrap every line of `text` at `width` columns and rejoin with newlines.
pub fn wrap_text(text: &str, width: usize) -> String {
    split_lines(text)
        .into_iter()
        .map(|line| wrap_line(line, width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a single line. Blank lines wrap to no lines at all.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    // Reversed so the next chunk is always at the end
    let mut chunks: Vec<Vec<char>> = split_chunks(&expand_whitespace(line));
    chunks.reverse();

    let mut lines = Vec::new();
    while !chunks.is_empty() {
        let mut current: Vec<Vec<char>> = Vec::new();
        let mut current_len = 0;

        // Leading whitespace is kept only on the first line
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        while let Some(chunk) = chunks.last() {
            if current_len + chunk.len() > width {
                break;
            }
            current_len += chunk.len();
            if let Some(chunk) = chunks.pop() {
                current.push(chunk);
            }
        }

        // A full line takes nothing more; an empty one always takes something
        let space_left = width - current_len;
        if let Some(chunk) = chunks.last_mut() {
            if chunk.len() > width && space_left > 0 {
                let rest = chunk.split_off(space_left);
                current.push(std::mem::replace(chunk, rest));
            }
        }

        if current.last().is_some_and(|c| is_blank(c)) {
            current.pop();
        }

        if !current.is_empty() {
            lines.push(current.concat().into_iter().collect());
        }
    }

    lines
}

/// Split at every line boundary: `\n`, `\r\n`, a lone `\r`, and the
/// vertical tab, form feed, separator and Unicode line break characters.
/// A trailing break does not start another line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|c| *c == ' ')
}

/// Expand tabs and turn every other whitespace character into a plain space.
fn expand_whitespace(line: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - out.len() % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
            }
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Split into alternating runs of spaces and words, with hyphenated words
/// split after each hyphen.
fn split_chunks(chars: &[char]) -> Vec<Vec<char>> {
    let mut chunks: Vec<Vec<char>> = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        match chunks.last_mut() {
            Some(last) if (last[0] == ' ') == (c == ' ') && !breaks_after_hyphen(chars, i) => {
                last.push(c)
            }
            _ => chunks.push(vec![c]),
        }
    }
    chunks
}

/// True when a break belongs just before `chars[i]` because it follows a
/// hyphen joining two words: at least two letters (or letter, hyphen, letter)
/// before the hyphen, and a letter pair (optionally hyphen-joined) after it.
fn breaks_after_hyphen(chars: &[char], i: usize) -> bool {
    let at = |k: usize| chars.get(k).copied().unwrap_or(' ');
    let letter = |k: usize| at(k).is_alphabetic();
    if i < 3 || at(i - 1) != '-' || !letter(i - 2) {
        return false;
    }
    let before = letter(i - 3) || (i >= 4 && at(i - 3) == '-' && letter(i - 4));
    let after = letter(i) && (letter(i + 1) || (at(i + 1) == '-' && letter(i + 2)));
    before && after
}
