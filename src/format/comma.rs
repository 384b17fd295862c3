//! Comma-list split
//!
//! A comma inside a bracket opened on the line splits that bracket's list the
//! way a parameter list is split. A comma at statement level (a continuation
//! line of an argument list, say) breaks after every top-level comma at the
//! line's own indentation.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::declaration::param_breaks;
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::Punct;

/// Anchor is the first comma on the line
pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    (line.start..line.end)
        .find(|&i| buf.token(i).is(Punct::Comma) && scan::is_code(buf, line.start, i))
}

pub fn split(w: &mut Wrapper<'_>, line: Line, comma: usize) -> Option<usize> {
    let buf = w.buf();
    let breaks = if let Some(opener) = scan::enclosing_opener(buf, line.start, comma) {
        let closer = scan::matching_close(buf, opener, line.end);
        param_breaks(buf, line, opener, closer, w.unit())
    } else {
        scan::top_level(buf, line.start, line.end)
            .filter(|&i| buf.token(i).is(Punct::Comma) && i + 1 < line.end)
            .map(|i| (i + 1, line.indent))
            .collect()
    };
    w.apply_breaks(line, &breaks)
}
