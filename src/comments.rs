//! Internal module for blanking comments out of extended-dialect JSON
//!
//! The parse engine only accepts specification JSON. When comment tolerance
//! is enabled this pre-pass replaces `// ...` end-of-line comments and
//! `/* ... */` block comments with spaces before the bytes reach the engine.
//! Line breaks inside block comments are kept so that the engine's error
//! positions still refer to the original text. Comment markers inside string
//! values are left untouched.

use std::borrow::Cow;

/// A block comment is missing the closing `*/`
///
/// Treated as a syntax error by the caller.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) struct BlockCommentNotClosed;

#[derive(PartialEq)]
enum State {
    Default,
    /// Inside a member name or string value
    InString,
    /// Inside a string, directly behind a `\`
    InStringEscape,
    /// Inside `// ...`, ends at the next line break
    LineComment,
    /// Inside `/* ... */`
    BlockComment,
    /// Inside a block comment, directly behind a `*`
    BlockCommentStar,
}

/// Replaces all comments in `input` with spaces
///
/// Returns the input unchanged (borrowed) when it contains no comment. A `/`
/// which does not start a comment is left as-is; the engine rejects it later
/// with its own syntax error.
pub(crate) fn strip_comments(input: &[u8]) -> Result<Cow<'_, [u8]>, BlockCommentNotClosed> {
    // Fast path: no '/' at all means no comment can exist
    if !input.contains(&b'/') {
        return Ok(Cow::Borrowed(input));
    }

    let mut output: Option<Vec<u8>> = None;
    let mut state = State::Default;
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        match state {
            State::Default => match byte {
                b'"' => state = State::InString,
                b'/' if input.get(i + 1) == Some(&b'/') => {
                    state = State::LineComment;
                    blank(&mut output, input, i, 2);
                    i += 2;
                    continue;
                }
                b'/' if input.get(i + 1) == Some(&b'*') => {
                    state = State::BlockComment;
                    blank(&mut output, input, i, 2);
                    i += 2;
                    continue;
                }
                _ => {}
            },
            State::InString => match byte {
                b'\\' => state = State::InStringEscape,
                b'"' => state = State::Default,
                _ => {}
            },
            State::InStringEscape => state = State::InString,
            State::LineComment => {
                if byte == b'\n' || byte == b'\r' {
                    state = State::Default;
                } else {
                    blank(&mut output, input, i, 1);
                }
            }
            State::BlockComment | State::BlockCommentStar => {
                if state == State::BlockCommentStar && byte == b'/' {
                    state = State::Default;
                } else {
                    state = if byte == b'*' {
                        State::BlockCommentStar
                    } else {
                        State::BlockComment
                    };
                }
                // Keep line breaks so engine error positions stay meaningful
                if byte != b'\n' && byte != b'\r' {
                    blank(&mut output, input, i, 1);
                }
            }
        }
        i += 1;
    }

    // A line comment may run to the end of the input; a block comment must be closed
    if state == State::BlockComment || state == State::BlockCommentStar {
        return Err(BlockCommentNotClosed);
    }

    Ok(match output {
        None => Cow::Borrowed(input),
        Some(output) => Cow::Owned(output),
    })
}

/// Overwrites `count` bytes starting at `index` with spaces, copying the
/// input on the first modification
fn blank(output: &mut Option<Vec<u8>>, input: &[u8], index: usize, count: usize) {
    let output = output.get_or_insert_with(|| input.to_vec());
    for byte in &mut output[index..index + count] {
        *byte = b' ';
    }
}
