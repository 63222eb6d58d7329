//! Percentage and bar indicator for loops with a known number of iterations.
//!
//! Every call to [`ProgressIndicator::update`] accounts for one iteration and
//! redraws the part of the line that changed:
//!
//! ```text
//! [#########################                         ] 50%
//! ```
//!
//! The bar has [`BAR_CELLS`] cells, one per two percentage points, so it moves
//! on even percentages while the number moves on every point. Nothing else may
//! write to the same sink while a run is in progress.

use std::io::{self, Stderr};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::redraw::{Backspace, Redraw};

pub const BAR_CELLS: usize = 50;

/// Strings used to draw the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub done: String,
    pub todo: String,
    pub open: String,
    pub close: String,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            done: "#".to_string(),
            todo: " ".to_string(),
            open: "[".to_string(),
            close: "]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No iteration count yet.
    Unconfigured,
    /// Configured, nothing drawn.
    Idle,
    Running,
    /// 100% reached. Only `reset` leaves this state.
    Done,
}

/// What the sink currently shows, as far as later erasures are concerned.
#[derive(Debug, Clone, Copy)]
struct Frame {
    bar: bool,
    cells: usize,
    percent: u8,
    todo_width: usize,
    close_width: usize,
    width: usize,
}

pub struct ProgressIndicator<R = Backspace<Stderr>> {
    total: u64,
    completed: u64,
    last_percent: u8,
    show_bar: bool,
    started: bool,
    style: Style,
    frame: Option<Frame>,
    sink: R,
}

impl ProgressIndicator {
    /// Indicator for `total` iterations drawing a bar on standard error.
    ///
    /// A `total` of zero leaves the indicator unconfigured; call
    /// [`set_total`](Self::set_total) before the first update.
    pub fn new(total: u64) -> Self {
        ProgressIndicator::with_sink(total, true, Backspace::stderr())
    }
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        ProgressIndicator::new(0)
    }
}

impl<R: Redraw> ProgressIndicator<R> {
    pub fn with_sink(total: u64, show_bar: bool, sink: R) -> Self {
        ProgressIndicator {
            total,
            completed: 0,
            last_percent: 0,
            show_bar,
            started: false,
            style: Style::default(),
            frame: None,
            sink,
        }
    }

    /// Set the number of loop iterations.
    pub fn set_total(&mut self, total: i64) -> Result<()> {
        let total = u64::try_from(total)
            .ok()
            .filter(|&total| total > 0)
            .ok_or(Error::InvalidConfiguration(total))?;
        debug!("progress total set to {} iterations", total);
        self.total = total;
        Ok(())
    }

    pub fn set_done_glyph(&mut self, glyph: impl Into<String>) {
        self.style.done = glyph.into();
    }

    pub fn set_todo_glyph(&mut self, glyph: impl Into<String>) {
        self.style.todo = glyph.into();
    }

    pub fn set_open_bracket(&mut self, glyph: impl Into<String>) {
        self.style.open = glyph.into();
    }

    pub fn set_close_bracket(&mut self, glyph: impl Into<String>) {
        self.style.close = glyph.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Draw the bar, or only the percentage when `show` is false.
    pub fn show_bar(&mut self, show: bool) {
        self.show_bar = show;
    }

    /// Bind a new sink and hand back the old one.
    ///
    /// The new sink has not seen any of the current line, so the next update
    /// draws a complete frame on it.
    pub fn set_sink(&mut self, sink: R) -> R {
        debug!("progress sink rebound");
        self.frame = None;
        std::mem::replace(&mut self.sink, sink)
    }

    /// Start over without touching the total or the style.
    pub fn reset(&mut self) {
        debug!("progress reset after {} updates", self.completed);
        self.completed = 0;
        self.last_percent = 0;
        self.started = false;
        self.frame = None;
    }

    /// Account for one iteration and redraw.
    pub fn update(&mut self) -> Result<()> {
        if self.total == 0 {
            return Err(Error::NotConfigured);
        }

        if self.frame.is_none() {
            self.draw_frame(self.last_percent)?;
        }
        self.started = true;

        let completed = self.completed.saturating_add(1);
        let percent = percent_of(completed, self.total);
        if percent < self.last_percent {
            trace!(
                "progress fell from {}% to {}%, keeping the display",
                self.last_percent,
                percent
            );
        } else {
            self.redraw(percent)?;
            if percent == 100 && self.last_percent < 100 {
                debug!("progress complete after {} updates", completed);
            }
            self.last_percent = percent;
        }
        self.completed = completed;

        self.sink.flush()?;
        Ok(())
    }

    /// End the progress line so that later output starts on a new one.
    pub fn finish(&mut self) -> Result<()> {
        self.sink.end_line()?;
        self.frame = None;
        Ok(())
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_bar_shown(&self) -> bool {
        self.show_bar
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn state(&self) -> State {
        if self.total == 0 {
            State::Unconfigured
        } else if !self.started {
            State::Idle
        } else if self.last_percent >= 100 {
            State::Done
        } else {
            State::Running
        }
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn into_sink(self) -> R {
        self.sink
    }

    fn redraw(&mut self, percent: u8) -> io::Result<()> {
        let Some(frame) = self.frame else {
            return self.draw_frame(percent);
        };

        let cells = cells_for(percent);
        let result = if frame.bar != self.show_bar || (self.show_bar && cells < frame.cells) {
            trace!("progress layout changed, redrawing the line");
            self.replace_frame(frame, percent)
        } else if self.show_bar && cells > frame.cells {
            trace!("progress bar grows to {} cells at {}%", cells, percent);
            self.repaint_bar(frame, percent)
        } else if percent != frame.percent {
            trace!("progress number moves to {}%", percent);
            self.repaint_percent(frame, percent)
        } else {
            Ok(())
        };

        // A half written line no longer matches the frame, start a fresh one.
        if result.is_err() {
            self.frame = None;
        }
        result
    }

    /// Write a complete line for `percent` after the cursor.
    fn draw_frame(&mut self, percent: u8) -> io::Result<()> {
        let cells = if self.show_bar { cells_for(percent) } else { 0 };

        let mut line = String::new();
        if self.show_bar {
            line.push_str(&self.style.open);
            push_repeated(&mut line, &self.style.done, cells);
            push_repeated(&mut line, &self.style.todo, BAR_CELLS - cells);
            line.push_str(&self.style.close);
            line.push(' ');
        }
        line.push_str(&percent_text(percent));
        self.sink.write(&line)?;

        self.frame = Some(Frame {
            bar: self.show_bar,
            cells,
            percent,
            todo_width: width(&self.style.todo),
            close_width: width(&self.style.close),
            width: width(&line),
        });
        Ok(())
    }

    fn replace_frame(&mut self, old: Frame, percent: u8) -> io::Result<()> {
        self.sink.erase(old.width)?;
        self.draw_frame(percent)?;
        self.blank_excess(old.width)
    }

    /// Rewrite from the first pending cell to the end of the line.
    fn repaint_bar(&mut self, old: Frame, percent: u8) -> io::Result<()> {
        let cells = cells_for(percent);
        let erased = old.todo_width * (BAR_CELLS - old.cells)
            + old.close_width
            + 1
            + width(&percent_text(old.percent));
        self.sink.erase(erased)?;

        let mut tail = String::new();
        push_repeated(&mut tail, &self.style.done, cells - old.cells);
        push_repeated(&mut tail, &self.style.todo, BAR_CELLS - cells);
        tail.push_str(&self.style.close);
        tail.push(' ');
        tail.push_str(&percent_text(percent));
        self.sink.write(&tail)?;

        self.frame = Some(Frame {
            cells,
            percent,
            todo_width: width(&self.style.todo),
            close_width: width(&self.style.close),
            width: old.width - erased + width(&tail),
            ..old
        });
        self.blank_excess(old.width)
    }

    /// Backspaces leave old characters behind, so a line that got shorter
    /// than `old_width` needs its tail overwritten with blanks.
    fn blank_excess(&mut self, old_width: usize) -> io::Result<()> {
        let new_width = self.frame.map_or(0, |frame| frame.width);
        if old_width > new_width {
            let excess = old_width - new_width;
            self.sink.write(&" ".repeat(excess))?;
            self.sink.erase(excess)?;
        }
        Ok(())
    }

    fn repaint_percent(&mut self, old: Frame, percent: u8) -> io::Result<()> {
        let old_text = percent_text(old.percent);
        let new_text = percent_text(percent);
        self.sink.erase(width(&old_text))?;
        self.sink.write(&new_text)?;

        self.frame = Some(Frame {
            percent,
            width: old.width - width(&old_text) + width(&new_text),
            ..old
        });
        Ok(())
    }
}

/// Whole percent of `completed` out of `total`, truncated and capped at 100.
fn percent_of(completed: u64, total: u64) -> u8 {
    let percent = u128::from(completed) * 100 / u128::from(total);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

fn cells_for(percent: u8) -> usize {
    usize::from(percent / 2)
}

fn percent_text(percent: u8) -> String {
    format!("{}%", percent)
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn push_repeated(line: &mut String, glyph: &str, count: usize) {
    for _ in 0..count {
        line.push_str(glyph);
    }
}
