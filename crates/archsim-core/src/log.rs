//! Logging facilities.
//!
//! Component log lines carry a `[time LEVEL component]` prefix built from the
//! component's [`SimulationContext`](crate::SimulationContext), so records of
//! different components can be told apart and correlated with the simulated
//! clock.

use atty::Stream;
use colored::{Color, ColoredString, Colorize};
use log::error;
use serde_json::json;
use serde_type_name::type_name;

use crate::event::Event;

/// Colors the string when the log output (stderr) is a console.
pub fn get_colored(s: &str, color: Color) -> ColoredString {
    if atty::is(Stream::Stderr) {
        s.color(color)
    } else {
        s.normal()
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_with_level {
    ($level:ident, $label:expr, $color:ident, $ctx:expr, $($arg:tt)+) => (
        log::$level!(
            target: $ctx.name(),
            "[{:.3} {} {}] {}",
            $ctx.time(),
            $crate::log::get_colored($label, $crate::colored::Color::$color),
            $ctx.name(),
            format_args!($($arg)+)
        )
    );
}

/// Logs a message at the info level with the `[time LEVEL component]` prefix.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $($arg:tt)+) => ($crate::__log_with_level!(info, "INFO ", Green, $ctx, $($arg)+));
}

/// Logs a message at the debug level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $($arg:tt)+) => ($crate::__log_with_level!(debug, "DEBUG", Blue, $ctx, $($arg)+));
}

/// Logs a message at the trace level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_trace {
    ($ctx:expr, $($arg:tt)+) => ($crate::__log_with_level!(trace, "TRACE", Cyan, $ctx, $($arg)+));
}

/// Logs a message at the warn level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $($arg:tt)+) => ($crate::__log_with_level!(warn, "WARN ", Yellow, $ctx, $($arg)+));
}

/// Logs a message at the error level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $($arg:tt)+) => ($crate::__log_with_level!(error, "ERROR", Red, $ctx, $($arg)+));
}

fn log_event_problem(kind: &str, event: Event, details: Option<&str>) {
    let payload = json!({
        "type": type_name(&event.data).unwrap(),
        "data": event.data,
        "src": event.src,
        "dst": event.dst,
    });
    match details {
        Some(details) => error!(
            target: "simulation",
            "[{:.3} {} simulation] {} event ({}): {}",
            event.time,
            get_colored("ERROR", Color::Red),
            kind,
            details,
            payload
        ),
        None => error!(
            target: "simulation",
            "[{:.3} {} simulation] {} event: {}",
            event.time,
            get_colored("ERROR", Color::Red),
            kind,
            payload
        ),
    }
}

/// Logs an event whose payload matched none of the handler's arms.
///
/// This function is used internally by the [`cast!`](crate::cast!) macro.
pub fn log_unhandled_event(event: Event) {
    log_event_problem("Unhandled", event, None);
}

pub(crate) fn log_undelivered_event(event: Event) {
    log_event_problem("Undelivered", event, None);
}

pub(crate) fn log_incorrect_event(event: Event, details: &str) {
    log_event_problem("Incorrect", event, Some(details));
}
