//! Logging facilities.

use atty::Stream;
use colored::{Color, ColoredString, Colorize};
use log::error;
use serde_json::json;
use serde_type_name::type_name;

use crate::event::{Event, EventKind};

/// Applies the color to the string if stderr (log) goes to console.
pub fn get_colored(s: &str, color: Color) -> ColoredString {
    if atty::is(Stream::Stderr) {
        s.color(color)
    } else {
        s.normal()
    }
}

/// Logs a message at the info level, prefixed with the simulation time and
/// the reporting entity name.
///
/// # Examples
///
/// ```rust
/// use stratus_core::{log_info, Simulation};
///
/// let sim = Simulation::new();
/// log_info!(sim, "broker", "received {} cloudlets", 3);
/// ```
#[macro_export]
macro_rules! log_info {
    ($sim:expr, $name:expr, $msg:expr) => (
        log::info!(
            target: $name,
            "[{:.3} {}  {}] {}",
            $sim.clock(), $crate::log::get_colored("INFO", $crate::colored::Color::Green), $name, $msg
        )
    );
    ($sim:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::info!(
            target: $name,
            concat!("[{:.3} {}  {}] ", $format),
            $sim.clock(), $crate::log::get_colored("INFO", $crate::colored::Color::Green), $name, $($arg)+
        )
    );
}

/// Logs a message at the debug level.
///
/// # Examples
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_debug {
    ($sim:expr, $name:expr, $msg:expr) => (
        log::debug!(
            target: $name,
            "[{:.3} {} {}] {}",
            $sim.clock(), $crate::log::get_colored("DEBUG", $crate::colored::Color::Blue), $name, $msg
        )
    );
    ($sim:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::debug!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $sim.clock(), $crate::log::get_colored("DEBUG", $crate::colored::Color::Blue), $name, $($arg)+
        )
    );
}

/// Logs a message at the trace level.
///
/// # Examples
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_trace {
    ($sim:expr, $name:expr, $msg:expr) => (
        log::trace!(
            target: $name,
            "[{:.3} {} {}] {}",
            $sim.clock(), $crate::log::get_colored("TRACE", $crate::colored::Color::Cyan), $name, $msg
        )
    );
    ($sim:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::trace!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $sim.clock(), $crate::log::get_colored("TRACE", $crate::colored::Color::Cyan), $name, $($arg)+
        )
    );
}

/// Logs a message at the warn level.
///
/// # Examples
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_warn {
    ($sim:expr, $name:expr, $msg:expr) => (
        log::warn!(
            target: $name,
            "[{:.3} {}  {}] {}",
            $sim.clock(), $crate::log::get_colored("WARN", $crate::colored::Color::Yellow), $name, $msg
        )
    );
    ($sim:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::warn!(
            target: $name,
            concat!("[{:.3} {}  {}] ", $format),
            $sim.clock(), $crate::log::get_colored("WARN", $crate::colored::Color::Yellow), $name, $($arg)+
        )
    );
}

/// Logs a message at the error level.
///
/// # Examples
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_error {
    ($sim:expr, $name:expr, $msg:expr) => (
        log::error!(
            target: $name,
            "[{:.3} {} {}] {}",
            $sim.clock(), $crate::log::get_colored("ERROR", $crate::colored::Color::Red), $name, $msg
        )
    );
    ($sim:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::error!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $sim.clock(), $crate::log::get_colored("ERROR", $crate::colored::Color::Red), $name, $($arg)+
        )
    );
}

/// Renders the event as a JSON value for structured log lines.
pub(crate) fn describe_event(event: &Event) -> serde_json::Value {
    match &event.kind {
        EventKind::Send { data } => json!({
            "kind": "Send",
            "tag": event.tag,
            "type": type_name(data).unwrap_or("unknown"),
            "data": data,
            "src": event.src,
            "dst": event.dst,
        }),
        kind => json!({
            "kind": kind.name(),
            "tag": event.tag,
            "src": event.src,
            "dst": event.dst,
        }),
    }
}

/// Logs an event that reached an entity in a state unable to consume it and
/// was dropped instead of deferred.
pub(crate) fn log_undelivered_event(event: &Event) {
    error!(
        target: "simulation",
        "[{:.3} {} simulation] Undelivered event: {}",
        event.time,
        get_colored("ERROR", Color::Red),
        describe_event(event)
    );
}
