/*!
# `HTSweep`: Build
*/

use argyle::KeyWordsBuilder;
use std::{
	fs::File,
	io::Write,
	path::{
		Path,
		PathBuf,
	},
};



/// # Build.
///
/// Pre-compile the CLI keywords and the file extensions we're looking for.
pub fn main() {
	println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

	build_cli();
	build_extensions();
}

/// # Build CLI Keys.
fn build_cli() {
	let mut builder = KeyWordsBuilder::default();
	builder.push_keys([
		"-h", "--help",
		"-p", "--progress",
		"-V", "--version",
	]);
	builder.push_keys_with_values([
		"-l", "--list",
		"-s", "--strip",
		"-u", "--unwrap",
	]);
	builder.save(out_path("argyle.rs"));
}

/// # Build Extensions.
fn build_extensions() {
	use dowser::Extension;

	let out = format!(
		r"
const E_HTM: Extension = {};
const E_HTML: Extension = {};
",
		Extension::codegen(b"htm"),
		Extension::codegen(b"html"),
	);

	write(&out_path("htsweep-extensions.rs"), out.as_bytes());
}

/// # Output Path.
fn out_path(stub: &str) -> PathBuf {
	std::fs::canonicalize(std::env::var("OUT_DIR").expect("Missing OUT_DIR."))
		.expect("Missing OUT_DIR.")
		.join(stub)
}

/// # Write File.
fn write(path: &Path, data: &[u8]) {
	File::create(path).and_then(|mut f| f.write_all(data).and_then(|_| f.flush()))
		.expect("Unable to write file.");
}
