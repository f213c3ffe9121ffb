use crate::runner;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use v8_embed::Isolate;

const PROMPT: &str = "> ";

/// Reads one line at a time from stdin and runs it in `isolate` until end of input.
pub fn run(isolate: &Isolate) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    let mut count = 0;

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        let source = line.trim_end();
        if source.is_empty() {
            continue;
        }

        count += 1;
        match runner::evaluate(isolate, source, &format!("<repl:{}>", count)) {
            Ok(Some(output)) => writeln!(stdout, "{}", output)?,
            Ok(None) => {}
            Err(err) => eprintln!("{}", err),
        }
    }
}
