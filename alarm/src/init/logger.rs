use env_logger::Target;
use log::LevelFilter;

fn level(log_level: u8, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    match log_level {
        #[cfg(debug_assertions)]
        0 => LevelFilter::Trace,
        #[cfg(not(debug_assertions))]
        0 => LevelFilter::Debug,
        1 => LevelFilter::Debug,
        2 => LevelFilter::Info,
        3 => LevelFilter::Warn,
        4 => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

// setup logger and panic handler
pub fn init(log_level: u8, verbose: bool) {
    env_logger::Builder::new()
        .filter_module("alarm", level(log_level, verbose))
        .target(Target::Stdout)
        .format_timestamp(None)
        .try_init()
        .ok();
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        log::error!(
            "Panic at {}",
            info.location().map(|x| x.to_string()).unwrap_or_default()
        );
        std::process::exit(crate::error::exit::PANIC);
    }));
}
