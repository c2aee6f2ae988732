use innamark::registry::SupportedFileType;
use innamark::tag::InnamarkTagBuilder;
use innamark::watermark::Watermark;
use innamark::watermarker::Watermarker;
use miette::IntoDiagnostic;
use tracing::{debug, info};

use crate::args::AddArgs;
use crate::{expect_value, source_name};

pub(crate) fn add(args: AddArgs, file_type: Option<SupportedFileType>) -> miette::Result<()> {
	info!(path = ?args.input, "read cover");
	let data = std::fs::read(&args.input).into_diagnostic()?;
	let name = source_name(&args.input);

	// explicit tag flags build the tag here; otherwise the codec wraps
	let (payload, wrap) = if args.wants_tag() {
		debug!("build tag from flags");
		let tag = InnamarkTagBuilder::from_text(&args.watermark)
			.sized(args.sized)
			.compressed(args.compressed)
			.crc32(args.crc32)
			.sha3_256(args.sha3_256)
			.finish()
			.into_diagnostic()?;
		(Watermark::from(tag), false)
	} else {
		(Watermark::from_text(&args.watermark), true)
	};

	info!("embed watermark");
	let watermarker = Watermarker::default();
	let marked = expect_value(watermarker.add_with(&name, &data, payload, wrap, file_type));

	let output = args.output.unwrap_or(args.input);
	info!(path = ?output, "write watermarked cover");
	std::fs::write(output, marked).into_diagnostic()?;

	Ok(())
}
