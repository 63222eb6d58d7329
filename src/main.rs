use std::io;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;

use loopbar::{Backspace, ClearLine, ProgressIndicator, Redraw, Style};

fn main() {
    env_logger::init();

    let matches = Command::new(clap::crate_name!())
        .about(clap::crate_description!())
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("10"),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .help("Milliseconds to wait between iterations")
                .value_parser(clap::value_parser!(u64))
                .default_value("50"),
        )
        .arg(
            Arg::new("no-bar")
                .long("no-bar")
                .help("Only show the percentage")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("done").long("done").default_value("#"))
        .arg(Arg::new("todo").long("todo").default_value(" "))
        .arg(Arg::new("open").long("open").default_value("["))
        .arg(Arg::new("close").long("close").default_value("]"))
        .arg(
            Arg::new("clear-line")
                .long("clear-line")
                .help("Repaint the whole line instead of erasing with backspaces")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Pick the renderer at runtime, the indicator doesn't care which one it
    // draws through.
    let sink: Box<dyn Redraw> = if matches.get_flag("clear-line") {
        Box::new(ClearLine::new(io::stderr()))
    } else {
        Box::new(Backspace::stderr())
    };

    let mut indicator = ProgressIndicator::with_sink(0, !matches.get_flag("no-bar"), sink);
    indicator.set_style(style_from(&matches));

    let iterations = matches.get_one::<i64>("iterations").copied().unwrap_or(10);
    if let Err(error) = indicator.set_total(iterations) {
        eprintln!("{}", error);
        process::exit(1);
    }

    let delay = Duration::from_millis(matches.get_one::<u64>("delay").copied().unwrap_or(50));
    if let Err(error) = run(&mut indicator, iterations, delay) {
        eprintln!("Failed to draw progress: {}", error);
        process::exit(1);
    }
}

fn style_from(matches: &ArgMatches) -> Style {
    let glyph = |name: &str| {
        matches
            .get_one::<String>(name)
            .cloned()
            .unwrap_or_default()
    };

    Style {
        done: glyph("done"),
        todo: glyph("todo"),
        open: glyph("open"),
        close: glyph("close"),
    }
}

/// Stand-in for a real loop body: one update per iteration.
fn run<R: Redraw>(
    indicator: &mut ProgressIndicator<R>,
    iterations: i64,
    delay: Duration,
) -> loopbar::Result<()> {
    for _ in 0..iterations {
        thread::sleep(delay);
        indicator.update()?;
    }
    debug!("ran {} iterations", indicator.completed());
    indicator.finish()
}
