//! In-place minification of raw JSON text.
//!
//! Operates on bytes, not on a parsed tree: insignificant whitespace (and,
//! by default, `//` and `/* */` comment spans) is removed by compacting the
//! buffer leftward. Never allocates; string literals are copied verbatim
//! with escape sequences respected. The result of minifying is a fixed point
//! of minifying again.

/// Configuration for [`minify_with`].
#[derive(Debug, Clone, Copy)]
pub struct MinifyOptions {
    /// Remove `//` line comments and `/* */` block comments.
    pub strip_comments: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        MinifyOptions {
            strip_comments: true,
        }
    }
}

/// Minify `buf` in place with default options and return the new length.
///
/// Bytes past the returned length are unspecified.
pub fn minify(buf: &mut [u8]) -> usize {
    minify_with(buf, MinifyOptions::default())
}

/// Minify `buf` in place, returning the new length.
pub fn minify_with(buf: &mut [u8], options: MinifyOptions) -> usize {
    let mut read = 0;
    let mut write = 0;
    while read < buf.len() {
        match buf[read] {
            b' ' | b'\t' | b'\n' | b'\r' => read += 1,
            b'/' if options.strip_comments && buf.get(read + 1) == Some(&b'/') => {
                while read < buf.len() && buf[read] != b'\n' {
                    read += 1;
                }
            }
            b'/' if options.strip_comments && buf.get(read + 1) == Some(&b'*') => {
                read += 2;
                loop {
                    if read + 1 >= buf.len() {
                        // unterminated block comment swallows the rest
                        read = buf.len();
                        break;
                    }
                    if buf[read] == b'*' && buf[read + 1] == b'/' {
                        read += 2;
                        break;
                    }
                    read += 1;
                }
            }
            b'"' => {
                // copy the whole string literal, escapes included
                buf[write] = b'"';
                write += 1;
                read += 1;
                while read < buf.len() {
                    let byte = buf[read];
                    buf[write] = byte;
                    write += 1;
                    read += 1;
                    if byte == b'\\' {
                        if read < buf.len() {
                            buf[write] = buf[read];
                            write += 1;
                            read += 1;
                        }
                    } else if byte == b'"' {
                        break;
                    }
                }
            }
            byte => {
                buf[write] = byte;
                write += 1;
                read += 1;
            }
        }
    }
    write
}

/// Convenience wrapper that minifies a `String` and truncates it in place.
pub fn minify_string(text: &mut String) {
    let mut bytes = std::mem::take(text).into_bytes();
    let len = minify(&mut bytes);
    bytes.truncate(len);
    // removal only drops ASCII bytes or whole comment spans, so the result
    // is still valid UTF-8; the fallback is unreachable but total
    match String::from_utf8(bytes) {
        Ok(out) => *text = out,
        Err(e) => *text = String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
