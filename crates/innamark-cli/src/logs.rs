use std::{
	env,
	fs::File,
	io::{Error, Result},
	path::Path,
};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

/// Install the subscriber for this invocation.
///
/// `RUST_LOG` wins over the `-v` flags when set. With `--log-file`, events
/// go to the file as JSON through a non-blocking writer; the returned
/// guard must stay alive until process exit so the writer thread flushes.
pub fn init(args: &Args) -> Result<Option<WorkerGuard>> {
	let env_spec = env::var("RUST_LOG").ok();
	if env_spec.is_none() && args.verbose == 0 && args.log_file.is_none() {
		return Ok(None);
	}

	let filter = match &env_spec {
		Some(spec) => EnvFilter::new(spec),
		None => EnvFilter::new(level_for(args.verbose)),
	};

	match &args.log_file {
		None => tracing_subscriber::fmt()
			.with_env_filter(filter)
			.try_init()
			.map_err(Error::other)?,
		Some(path) => {
			let (writer, guard) = tracing_appender::non_blocking(open_log(path)?);
			tracing_subscriber::fmt()
				.with_env_filter(filter)
				.json()
				.with_writer(writer)
				.try_init()
				.map_err(Error::other)?;
			return Ok(Some(guard));
		}
	}

	Ok(None)
}

fn level_for(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

fn open_log(path: &Path) -> Result<File> {
	let target = if path.is_dir() {
		path.join(format!(
			"innamark.{}.log",
			chrono::Local::now().format("%Y%m%d-%H%M%S")
		))
	} else {
		path.to_owned()
	};

	File::options().create(true).append(true).open(target)
}
