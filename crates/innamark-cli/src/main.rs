#![warn(clippy::unwrap_used)]
#![deny(rust_2018_idioms)]

use clap::Parser;
use innamark::status::Outcome;
use miette::IntoDiagnostic;
use tracing::debug;

use crate::args::Action;

mod add;
mod args;
mod list;
mod logs;
mod remove;
mod text;

fn main() -> miette::Result<()> {
	let args = args::Args::parse();

	// keep the writer-thread guard alive until exit
	let _log_guard = logs::init(&args).into_diagnostic()?;
	debug!(?args, "got arguments");

	let file_type = args.file_type.map(Into::into);
	match args.action {
		Action::Add(args) => add::add(args, file_type),
		Action::List(args) => list::list(args, file_type),
		Action::Remove(args) => remove::remove(args, file_type),
		Action::Text(action) => text::text(action),
	}
}

/// Print an outcome's events and take its value.
///
/// Any error event terminates the process with exit code -1, as does a
/// missing value.
pub(crate) fn expect_value<T>(outcome: Outcome<T>) -> T {
	for event in outcome.status().events() {
		eprintln!("{event}");
	}

	let (status, value) = outcome.into_parts();
	if status.is_error() {
		std::process::exit(-1);
	}

	match value {
		Some(value) => value,
		None => std::process::exit(-1),
	}
}

/// The part of a path the extension registry dispatches on.
pub(crate) fn source_name(path: &std::path::Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}
