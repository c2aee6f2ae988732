use innamark::registry::SupportedFileType;
use innamark::watermarker::Watermarker;
use miette::IntoDiagnostic;
use tracing::info;

use crate::args::RemoveArgs;
use crate::{expect_value, source_name};

pub(crate) fn remove(args: RemoveArgs, file_type: Option<SupportedFileType>) -> miette::Result<()> {
	info!(path = ?args.input, "read cover");
	let data = std::fs::read(&args.input).into_diagnostic()?;
	let name = source_name(&args.input);

	info!("strip watermarks");
	let watermarker = Watermarker::default();
	let cleaned = expect_value(watermarker.remove(&name, &data, file_type));

	let output = args.output.unwrap_or(args.input);
	info!(path = ?output, "write cleaned cover");
	std::fs::write(output, cleaned).into_diagnostic()?;

	Ok(())
}
