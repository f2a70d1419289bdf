/*!
# HTSweep: Errors
*/

use fyi_msg::ProglessError;
use std::{
	error::Error,
	fmt,
};



/// # Help Text.
const HELP: &str = concat!(r"
      .--.
     /.-. '----------.    ", "\x1b[38;5;69mHTSweep\x1b[0;38;5;199m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
     \'-' .---'-''-'-'    Fast, safe, in-place sweeping
      '--'                of ads and boilerplate from HTML.

USAGE:
    htsweep [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
    -h, --help        Print help information and exit.
    -p, --progress    Show progress bar while sweeping.
    -V, --version     Print program version and exit.

OPTIONS:
    -l, --list <FILE>   Read (absolute) file and/or directory paths from this
                        text file, one entry per line, instead of or in
                        addition to the trailing <PATH(S)>.
    -s, --strip <RULE>  Remove every element matching RULE, children and all.
                        Repeatable.
    -u, --unwrap <RULE> Remove every element matching RULE, reattaching its
                        children to its parent. Repeatable.

RULES:
    A rule is a tag type, optionally narrowed by one attribute:
        div
        div:class=ad-banner

ARGS:
    <PATH(S)>...      One or more files or directories to sweep.
"#);



#[expect(clippy::missing_docs_in_private_items, reason = "Self-explanatory.")]
#[derive(Debug, Copy, Clone)]
/// # Generic Error.
pub(super) enum HtsweepError {
	BadRule,
	EmptyFile,
	NoDocuments,
	NotIndexed,
	Parse,
	Progress(ProglessError),
	Read,
	Save,
	PrintHelp,    // Not an error.
	PrintVersion, // Not an error.
}

impl AsRef<str> for HtsweepError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for HtsweepError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Error for HtsweepError {}

impl From<ProglessError> for HtsweepError {
	#[inline]
	fn from(src: ProglessError) -> Self { Self::Progress(src) }
}

impl HtsweepError {
	/// # As Str.
	pub(super) const fn as_str(self) -> &'static str {
		match self {
			Self::BadRule => "Rules look like 'type' or 'type:attr=value'.",
			Self::EmptyFile => "The file is empty.",
			Self::NoDocuments => "No documents were found.",
			Self::NotIndexed => "No document has been indexed.",
			Self::Parse => "Unable to make sense of the document.",
			Self::Progress(e) => e.as_str(),
			Self::Read => "Unable to read the file.",
			Self::Save => "Unable to save the document.",
			Self::PrintHelp => HELP,
			Self::PrintVersion => concat!("HTSweep v", env!("CARGO_PKG_VERSION")),
		}
	}
}
