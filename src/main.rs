/*!
# `HTSweep`

`HTSweep` sweeps advertising and boilerplate markup out of HTML files, in
place.

Unlike a stream processor, it builds a complete DOM tree from the document
before doing anything else — line by line, with multi-line comments,
scripts, and styles handled as first-class citizens — which allows for much
more accurate pruning and very forgiving error recovery. Malformed markup
degrades gracefully; it never aborts a document.

Comments and scripts are dropped during indexing. Everything else is fair
game for the removal rules supplied on the command line, and whatever ends
up empty afterward — the hollow wrappers ad networks leave behind — gets
pruned automatically before the document is rewritten.

If a document cannot be made sense of, or the "swept" version winds up no
smaller than the original, the original is left as-was (i.e. no changes
are written to it).



## Use

For basic use, toss one or more file or directory paths after the command,
along with the rules to apply:
```bash
# Prune empty tags from one file.
htsweep /path/to/one.html

# Remove every element with class="ad-banner", and unwrap the tracking
# wrappers, for every .htm(l) file under a directory.
htsweep -s div:class=ad-banner -u div:class=outer /path/to

# Do the same thing but with a progress bar.
htsweep -p -s div:class=ad-banner /path/to

# For a full list of options, run help:
htsweep -h
```
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod clean;
mod dom;
mod error;
mod ser;
mod spec;

use argyle::Argument;
use clean::Rules;
use dactyl::NiceU64;
use dowser::{
	Dowser,
	Extension,
};
use error::HtsweepError;
use fyi_msg::{
	Msg,
	Progless,
};
use rayon::iter::{
	IntoParallelRefIterator,
	ParallelIterator,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	sync::atomic::{
		AtomicU64,
		Ordering::Relaxed,
	},
};

include!(concat!(env!("OUT_DIR"), "/htsweep-extensions.rs"));



/// # Main.
fn main() {
	match main__() {
		Ok(()) => {},
		Err(e @ (HtsweepError::PrintHelp | HtsweepError::PrintVersion)) => {
			println!("{e}");
		},
		Err(e) => { Msg::error(e).die(1); },
	}
}

#[inline]
/// # Actual Main.
fn main__() -> Result<(), HtsweepError> {
	// Parse CLI arguments.
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut progress = false;
	let mut rules = Rules::default();
	let mut paths = Dowser::default();
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(HtsweepError::PrintHelp),
			Argument::Key("-p" | "--progress") => { progress = true; },
			Argument::Key("-V" | "--version") => return Err(HtsweepError::PrintVersion),

			Argument::KeyWithValue("-l" | "--list", s) => { paths = read_list(paths, &s)?; },
			Argument::KeyWithValue("-s" | "--strip", s) => { rules.push_strip(&s)?; },
			Argument::KeyWithValue("-u" | "--unwrap", s) => { rules.push_unwrap(&s)?; },

			// Assume paths.
			Argument::Path(s) => { paths = paths.with_path(s); },

			// Nothing else is expected.
			_ => {},
		}
	}

	// Put it all together!
	let paths: Vec<PathBuf> = paths
		.filter(|p|
			Extension::try_from4(p).map_or_else(
				|| Some(E_HTM) == Extension::try_from3(p),
				|e| e == E_HTML,
			)
		)
		.collect();
	if paths.is_empty() { return Err(HtsweepError::NoDocuments); }

	// Tallies for the summary.
	let before = AtomicU64::new(0);
	let after = AtomicU64::new(0);
	let swept = AtomicU64::new(0);

	// Sexy run-through.
	if progress {
		// Boot up a progress bar.
		let bar = Progless::try_from(paths.len())?
			.with_title(Some(Msg::custom("HTSweep", 199, "Reticulating brooms…")));

		paths.par_iter().for_each(|x| {
			let tmp = x.to_string_lossy();
			bar.add(&tmp);
			sweep_file(x, &rules, &before, &after, &swept);
			bar.remove(&tmp);
		});

		bar.finish();
	}
	else {
		paths.par_iter().for_each(|x| {
			sweep_file(x, &rules, &before, &after, &swept);
		});
	}

	// Finish up.
	summary(
		paths.len(),
		swept.load(Relaxed),
		before.load(Relaxed).saturating_sub(after.load(Relaxed)),
	);

	Ok(())
}

/// # Sweep One File.
///
/// Failures here are intentionally quiet; one stubborn document shouldn't
/// kill a directory crawl.
fn sweep_file(
	src: &Path,
	rules: &Rules,
	before: &AtomicU64,
	after: &AtomicU64,
	swept: &AtomicU64,
) {
	if let Ok((b, a)) = clean::clean(src, rules) {
		before.fetch_add(b.get(), Relaxed);
		after.fetch_add(a.get(), Relaxed);
		if a < b { swept.fetch_add(1, Relaxed); }
	}
	else { log::warn!("skipped {:?}", src); }
}

/// # Read a Path List.
///
/// Fold the (non-empty) lines of a text file into the crawl list.
fn read_list(mut paths: Dowser, src: &str) -> Result<Dowser, HtsweepError> {
	let raw = std::fs::read_to_string(src).map_err(|_| HtsweepError::Read)?;
	for line in raw.lines() {
		let line = line.trim();
		if ! line.is_empty() { paths = paths.with_path(line); }
	}
	Ok(paths)
}

/// # Summary.
fn summary(total: usize, swept: u64, saved: u64) {
	Msg::custom("HTSweep", 199, &format!(
		"{} of {} documents got lighter, saving {} bytes.",
		NiceU64::from(swept),
		NiceU64::from(total),
		NiceU64::from(saved),
	))
		.with_newline(true)
		.print();
}
