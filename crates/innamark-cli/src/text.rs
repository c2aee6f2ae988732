use std::io::Read;

use innamark::text::TextWatermarker;
use miette::IntoDiagnostic;
use tracing::info;

use crate::args::TextAction;
use crate::expect_value;
use crate::list::print_recovered;

fn cover_or_stdin(cover: Option<String>) -> miette::Result<String> {
	match cover {
		Some(cover) => Ok(cover),
		None => {
			info!("read cover from stdin");
			let mut cover = String::new();
			std::io::stdin().read_to_string(&mut cover).into_diagnostic()?;
			Ok(cover)
		}
	}
}

pub(crate) fn text(action: TextAction) -> miette::Result<()> {
	let codec = TextWatermarker::default();

	match action {
		TextAction::Add { watermark, cover, no_wrap } => {
			let cover = cover_or_stdin(cover)?;
			let marked = expect_value(codec.add_with(&cover, watermark.as_str(), !no_wrap));
			print!("{marked}");
		}
		TextAction::List { cover, all } => {
			let cover = cover_or_stdin(cover)?;
			let found = expect_value(codec.watermarks(&cover, !all, !all));
			for recovered in found {
				print_recovered(&recovered);
			}
		}
		TextAction::Remove { cover } => {
			let cover = cover_or_stdin(cover)?;
			let cleaned = expect_value(codec.remove(&cover));
			print!("{cleaned}");
		}
	}

	Ok(())
}
