//! FFMETADATA1 value escaping.
//!
//! Keys and values may not contain a bare `=`, `;`, `#` or `\`; each must be
//! preceded by a backslash. Newlines are passed through unchanged.

/// Characters that must be escaped in FFMETADATA1 keys and values.
const RESERVED: [char; 4] = ['=', ';', '#', '\\'];

fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Escape a key or value for an FFMETADATA1 file.
///
/// Existing escapes are undone first, so a value that is already escaped
/// comes out unchanged: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(input: &str) -> String {
    escape(&unescape(input))
}

/// Undo backslash escapes of reserved characters.
///
/// `\=`, `\;`, `\#` and `\\` collapse to the bare character. A backslash in
/// front of any other character, or at the end of input, is kept as-is.
pub fn unescape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if is_reserved(next) {
                    output.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        output.push(c);
    }

    output
}

/// Put a backslash in front of every reserved character.
fn escape(input: &str) -> String {
    let extra = input.chars().filter(|&c| is_reserved(c)).count();
    let mut output = String::with_capacity(input.len() + extra);

    for c in input.chars() {
        if is_reserved(c) {
            output.push('\\');
        }
        output.push(c);
    }

    output
}
