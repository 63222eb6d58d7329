//! Console progress indicator for loops with a known iteration count.
//!
//! ```no_run
//! use loopbar::ProgressIndicator;
//!
//! let mut bar = ProgressIndicator::new(10);
//! for _ in 0..10 {
//!     // ... the program
//!     bar.update()?;
//! }
//! bar.finish()?;
//! # Ok::<(), loopbar::Error>(())
//! ```

pub mod error;
pub mod progress_indicator;
pub mod redraw;

pub use error::{Error, Result};
pub use progress_indicator::{ProgressIndicator, State, Style, BAR_CELLS};
pub use redraw::{Backspace, ClearLine, Headless, Redraw};
