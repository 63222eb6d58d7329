//! Output primitives used by the progress indicator.
//!
//! The indicator only ever removes characters from the end of the current line
//! and appends new ones, so a renderer needs nothing more than [`Redraw::erase`]
//! and [`Redraw::write`]. How the erasure reaches the terminal is up to the
//! renderer.

use std::io::{self, Stderr, Write};

const BACKSPACE: u8 = 0x08;

/// Clears the whole line and returns the cursor to column zero.
const CLEAR_LINE: &str = "\x1b[2K\r";

pub trait Redraw {
    /// Remove the last `count` characters of the current line.
    fn erase(&mut self, count: usize) -> io::Result<()>;

    /// Append `text` to the current line.
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Leave the current line alone and move on to a fresh one.
    fn end_line(&mut self) -> io::Result<()>;
}

impl<R: Redraw + ?Sized> Redraw for &mut R {
    fn erase(&mut self, count: usize) -> io::Result<()> {
        (**self).erase(count)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn end_line(&mut self) -> io::Result<()> {
        (**self).end_line()
    }
}

impl<R: Redraw + ?Sized> Redraw for Box<R> {
    fn erase(&mut self, count: usize) -> io::Result<()> {
        (**self).erase(count)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn end_line(&mut self) -> io::Result<()> {
        (**self).end_line()
    }
}

/// Erases with backspace control characters.
///
/// This relies on a terminal that moves the cursor back on `\b` and leaves the
/// old characters in place until they are overwritten. Redirected to a file the
/// output is a jumble of control characters.
#[derive(Debug)]
pub struct Backspace<W> {
    out: W,
}

impl Backspace<Stderr> {
    pub fn stderr() -> Self {
        Backspace::new(io::stderr())
    }
}

impl<W: Write> Backspace<W> {
    pub fn new(out: W) -> Self {
        Backspace { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Redraw for Backspace<W> {
    fn erase(&mut self, count: usize) -> io::Result<()> {
        self.out.write_all(&[BACKSPACE].repeat(count))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn end_line(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Keeps the line in memory and repaints all of it on every flush.
#[derive(Debug)]
pub struct ClearLine<W> {
    out: W,
    line: String,
    dirty: bool,
}

impl<W: Write> ClearLine<W> {
    pub fn new(out: W) -> Self {
        ClearLine {
            out,
            line: String::new(),
            dirty: false,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Redraw for ClearLine<W> {
    fn erase(&mut self, count: usize) -> io::Result<()> {
        pop_chars(&mut self.line, count);
        self.dirty = true;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.line.push_str(text);
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.dirty {
            write!(self.out, "{}{}", CLEAR_LINE, self.line)?;
            self.dirty = false;
        }
        self.out.flush()
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.flush()?;
        writeln!(self.out)?;
        self.line.clear();
        self.out.flush()
    }
}

/// Renders nowhere. Tracks what a terminal would show instead.
#[derive(Debug, Default)]
pub struct Headless {
    line: String,
    finished: Vec<String>,
    flushes: usize,
}

impl Headless {
    pub fn new() -> Self {
        Headless::default()
    }

    /// The line as it currently stands.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Lines closed with [`Redraw::end_line`], oldest first.
    pub fn finished_lines(&self) -> &[String] {
        &self.finished
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Redraw for Headless {
    fn erase(&mut self, count: usize) -> io::Result<()> {
        pop_chars(&mut self.line, count);
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.line.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.finished.push(std::mem::take(&mut self.line));
        Ok(())
    }
}

fn pop_chars(line: &mut String, count: usize) {
    for _ in 0..count {
        if line.pop().is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_emits_control_characters() {
        let mut sink = Backspace::new(Vec::new());
        sink.write("12%").unwrap();
        sink.erase(3).unwrap();
        sink.write("13%").unwrap();
        assert_eq!(sink.get_ref().as_slice(), b"12%\x08\x08\x0813%");
    }

    #[test]
    fn clear_line_repaints_only_when_changed() {
        let mut sink = ClearLine::new(Vec::new());
        sink.write("[  ] 0%").unwrap();
        sink.flush().unwrap();
        sink.flush().unwrap();
        sink.erase(6).unwrap();
        sink.write("#] 50%").unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.line(), "[#] 50%");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "\x1b[2K\r[  ] 0%\x1b[2K\r[#] 50%");
    }

    #[test]
    fn headless_erase_saturates() {
        let mut sink = Headless::new();
        sink.write("ab").unwrap();
        sink.erase(10).unwrap();
        assert_eq!(sink.line(), "");
    }

    #[test]
    fn headless_keeps_finished_lines() {
        let mut sink = Headless::new();
        sink.write("100%").unwrap();
        sink.end_line().unwrap();
        sink.write("0%").unwrap();
        assert_eq!(sink.finished_lines(), ["100%".to_string()]);
        assert_eq!(sink.line(), "0%");
    }

    #[test]
    fn erase_counts_characters_not_bytes() {
        let mut sink = Headless::new();
        sink.write("[██]").unwrap();
        sink.erase(2).unwrap();
        assert_eq!(sink.line(), "[█");
    }
}
