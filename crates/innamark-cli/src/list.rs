use innamark::registry::SupportedFileType;
use innamark::watermark::Recovered;
use innamark::watermarker::Watermarker;
use miette::IntoDiagnostic;
use tracing::info;

use crate::args::ListArgs;
use crate::{expect_value, source_name};

pub(crate) fn list(args: ListArgs, file_type: Option<SupportedFileType>) -> miette::Result<()> {
	info!(path = ?args.input, "read cover");
	let data = std::fs::read(&args.input).into_diagnostic()?;
	let name = source_name(&args.input);

	info!("recover watermarks");
	let watermarker = Watermarker::default();
	let keep_all = args.all;
	let found = expect_value(watermarker.watermarks(&name, &data, !keep_all, !keep_all, file_type));

	for recovered in found {
		print_recovered(&recovered);
	}

	Ok(())
}

pub(crate) fn print_recovered(recovered: &Recovered) {
	let content = expect_value(recovered.content());
	let text = String::from_utf8_lossy(&content);

	match recovered {
		Recovered::Raw(_) => println!("{text}"),
		Recovered::Tag(tag) => println!("{}: {text}", tag.name()),
	}
}
