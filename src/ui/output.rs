//! Human-readable report lines.
//!
//! Progress and results go to stdout, failures to stderr.

use crate::check::IntegrityError;
use crate::graph::GraphStats;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error));
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn phase(name: &str) {
    println!(
        "{} {}",
        Icons::GEAR.style(theme().info),
        name.style(theme().header)
    );
}

pub fn timing(elapsed: std::time::Duration) {
    println!(
        "{} {}",
        Icons::CLOCK.style(theme().dim),
        format!("{:.2?}", elapsed).style(theme().dim)
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim).to_string()
}

/// One annotation; code annotations pass their `file:line`
pub fn annotation_row(id: &str, title: &str, location: Option<&str>) {
    let icon = if location.is_some() { Icons::CODE } else { Icons::FILE };
    match location {
        Some(location) => println!(
            "  {} {} {} {}",
            icon,
            id.style(theme().id),
            title,
            location.style(theme().location)
        ),
        None => println!("  {} {} {}", icon, id.style(theme().id), title),
    }
}

/// Extra lines explaining an integrity failure, if it has any
pub fn failure_detail(err: &IntegrityError) {
    let hint = match err {
        IntegrityError::MissingReference { .. } => "create the annotation or fix the reference",
        IntegrityError::Cycle { .. } => "annotations must form a directed acyclic graph",
        IntegrityError::NoRoots { .. } => "at least one annotation must not be referenced",
        IntegrityError::MissingSuffix { .. } => "rename the code annotation or change `code_suffix`",
        _ => return,
    };
    eprintln!("   {} {}", Icons::LINK.style(theme().dim), hint.style(theme().dim));
}

pub fn stats(stats: &GraphStats) {
    println!("{} {}", Icons::STATS, "Annotation graph".style(theme().header));
    summary_row("Text annotations:", &stats.text_annotations.to_string());
    summary_row("Code annotations:", &stats.code_annotations.to_string());
    summary_row("References:      ", &stats.references.to_string());
    summary_row("Roots:           ", &stats.roots.to_string());
}
