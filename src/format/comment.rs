//! Comment hoist
//!
//! A comment trailing code moves to its own line directly above the code, at
//! the code's indentation; the code line is then formatted on its own.

use crate::format::buffer::TokenBuffer;
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;

pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    scan::trailing_comment(buf, line.start, line.end)
}

pub fn split(w: &mut Wrapper<'_>, line: Line, comment: usize) -> Option<usize> {
    w.buf_mut().rotate_to(comment, line.start, line.indent);
    Some(w.format(line.start + 1, line.end, line.depth + 1))
}
