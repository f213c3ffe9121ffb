use anyhow::{Context, Result};
use log::{error, LevelFilter};
use std::any::Any;
use std::path::Path;
use std::thread;

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>")
}

pub fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    // log format should have timestamps, level, module, and message
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("v8_embed", level_for(verbosity))
        .level_for("jsrun", level_for(verbosity))
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;

    // log on panic
    std::panic::set_hook(Box::new(|info| {
        let payload = panic_message(info.payload());
        let at = info
            .location()
            .map(|location| format!(" at {}:{}", location.file(), location.line()))
            .unwrap_or_default();

        error!(
            "thread '{}' panicked{}: {}\nbacktrace:\n{}",
            thread::current().name().unwrap_or("<unnamed>"),
            at,
            payload,
            std::backtrace::Backtrace::force_capture()
        );
        log::logger().flush();
    }));

    Ok(())
}
