/*!
# HTSweep: Line Splicer.

Comments, scripts, and styles routinely sprawl across many input lines, so
they have to be dealt with before any tag-level tokenization can happen.
Each raw line runs through three passes in a fixed order — comment, script,
style — and each pass carries an "in progress" flag from line to line so an
unterminated construct keeps eating input until its closing marker finally
shows up.

Comment and script content is discarded outright. Style content is not: the
text is appended verbatim to the currently-open style node, since an empty
body is meaningful to the empty-tag prune later on.
*/

use super::Indexer;



/// # Comment Openers.
const COMMENT_OPENS: &[&str] = &["<!--"];

/// # Comment Closers.
const COMMENT_CLOSES: &[&str] = &["-->"];

/// # Script Openers.
const SCRIPT_OPENS: &[&str] = &["<script", "<noscript"];

/// # Script Closers.
const SCRIPT_CLOSES: &[&str] = &["</script>", "</noscript>"];

/// # Style Openers.
pub(super) const STYLE_OPENS: &[&str] = &["<style"];

/// # Style Closers.
pub(super) const STYLE_CLOSES: &[&str] = &["</style>"];



#[derive(Debug, Clone, Copy, Default)]
/// # Multi-Line Construct Flags.
///
/// One flag per construct, each `true` while an instance opened on some
/// earlier line is still waiting for its closing marker.
pub(super) struct Splicer {
	/// # Comment In Progress.
	pub(super) comment: bool,

	/// # Script In Progress.
	pub(super) script: bool,

	/// # Style In Progress.
	pub(super) style: bool,
}

impl Splicer {
	/// # Splice Comments.
	///
	/// Strip `<!-- … -->` regions from `line`, returning whatever
	/// structural text remains, or `None` if the comment(s) consumed the
	/// whole line.
	pub(super) fn comment_pass(&mut self, line: &str) -> Option<String> {
		splice_region(line, &mut self.comment, COMMENT_OPENS, COMMENT_CLOSES)
	}

	/// # Splice Scripts.
	///
	/// Same as the comment pass, but for `<script>`/`<noscript>` regions,
	/// matched case-insensitively.
	pub(super) fn script_pass(&mut self, line: &str) -> Option<String> {
		splice_region(line, &mut self.script, SCRIPT_OPENS, SCRIPT_CLOSES)
	}
}

impl Indexer {
	/// # Splice Styles.
	///
	/// The style pass works like the other two, except the content between
	/// the markers is kept: the opening `<style …>` becomes a style node on
	/// the open-tag stack, and everything up to the matching `</style>` is
	/// appended to its body, however many lines that takes.
	///
	/// A style may open and close several times within one physical line;
	/// the flag flips accordingly, and only the text outside the style
	/// regions is returned for tokenization.
	pub(super) fn splice_style(&mut self, line: &str) -> Option<String> {
		let mut out = String::new();
		let mut rest = line;

		loop {
			if self.splice.style {
				match find_ci(rest, STYLE_CLOSES) {
					// No end in sight; the remainder belongs to the body.
					None => {
						self.append_style_body(rest);
						break;
					},
					// Close out the body and keep scanning.
					Some((pos, len)) => {
						self.append_style_body(&rest[..pos]);
						self.close_style();
						self.splice.style = false;
						rest = &rest[pos + len..];
					},
				}
			}
			else {
				match find_ci(rest, STYLE_OPENS) {
					// No styles start here; the rest is structural.
					None => {
						out.push_str(rest);
						break;
					},
					// Open a new style node. The attribute run extends to
					// the tag's closing bracket, or failing that, the end
					// of the line.
					Some((pos, len)) => {
						out.push_str(&rest[..pos]);
						let tag = &rest[pos + len..];
						match tag.find('>') {
							Some(gt) => {
								self.open_style(&tag[..gt]);
								rest = &tag[gt + 1..];
							},
							None => {
								self.open_style(tag);
								rest = "";
							},
						}
						self.splice.style = true;
					},
				}
			}
		}

		if out.is_empty() { None }
		else { Some(out) }
	}
}



/// # Splice a Marker-Delimited Region.
///
/// Shared driver for the comment and script passes: discard everything
/// between open/close marker pairs, flipping `in_progress` as instances
/// open and close — possibly several times within the one line — and
/// returning the surviving text, or `None` if nothing survived.
fn splice_region(
	line: &str,
	in_progress: &mut bool,
	opens: &[&str],
	closes: &[&str],
) -> Option<String> {
	let mut out = String::new();
	let mut rest = line;

	loop {
		if *in_progress {
			// Still inside the construct; everything up to (and including)
			// the closing marker goes away.
			let Some((pos, len)) = find_ci(rest, closes) else { break; };
			*in_progress = false;
			rest = &rest[pos + len..];
		}
		else {
			match find_ci(rest, opens) {
				// Nothing (more) opens here; keep the remainder.
				None => {
					out.push_str(rest);
					break;
				},
				// Keep the prefix, drop into the construct.
				Some((pos, len)) => {
					out.push_str(&rest[..pos]);
					*in_progress = true;
					rest = &rest[pos + len..];
				},
			}
		}
	}

	if out.is_empty() { None }
	else { Some(out) }
}

/// # Find First Marker (Case-Insensitively).
///
/// Return the position and length of the earliest of `needles` within
/// `haystack`, if any. Markers are ASCII, so a lower-cased copy preserves
/// every byte offset.
pub(super) fn find_ci(haystack: &str, needles: &[&str]) -> Option<(usize, usize)> {
	let lower = haystack.to_ascii_lowercase();
	let mut best: Option<(usize, usize)> = None;

	for n in needles {
		if
			let Some(pos) = memchr::memmem::find(lower.as_bytes(), n.as_bytes()) &&
			best.is_none_or(|(b, _)| pos < b)
		{
			best = Some((pos, n.len()));
		}
	}

	best
}
