/*!
# HTSweep: Questions of Markup.

Small, shared judgments about HTML itself: which tags to force shut, how to
normalize whitespace, and the placeholder characters used to smuggle markup
through attribute values.
*/



/// # Sentinel: `>`.
///
/// Stand-in for a literal `>` inside an attribute value, so the character
/// can't be mistaken for the end of the surrounding tag. (Private Use Area
/// characters won't collide with real page content.)
pub(crate) const SENT_GT: char = '\u{e000}';

/// # Sentinel: Space.
pub(crate) const SENT_SP: char = '\u{e001}';

/// # Sentinel: `=`.
pub(crate) const SENT_EQ: char = '\u{e002}';



#[must_use]
/// # Is Forced-Void Tag?
///
/// Real pages routinely leave these void elements unclosed; treating them as
/// self-closing keeps the open-tag stack from wedging on them.
pub(crate) fn is_forced_void(tag: &str) -> bool {
	matches!(tag, "hr" | "img" | "input" | "link" | "meta")
}

#[must_use]
/// # Restore Sentinels.
///
/// Swap any placeholder characters back for the markup they stood in for.
pub(crate) fn restore_sentinels(raw: &str) -> String {
	raw.chars()
		.map(|c| match c {
			SENT_GT => '>',
			SENT_SP => ' ',
			SENT_EQ => '=',
			c => c,
		})
		.collect()
}

#[must_use]
/// # Collapse Whitespace.
///
/// HTML rendering largely ignores whitespace, and at any rate treats all
/// types the same way, so each contiguous run of it can be collapsed to a
/// single horizontal space before tokenization.
///
/// Returns `None` if the line is already collapsed.
pub(crate) fn collapse_whitespace(txt: &str) -> Option<String> {
	// Edge case: single whitespace.
	let bytes = txt.as_bytes();
	if bytes.len() == 1 && matches!(bytes[0], b'\t' | b'\n' | b'\x0C' | b'\r') {
		return Some(" ".to_owned());
	}

	// Find the first non-space whitespace, or pair of (any) whitespaces.
	let pos = bytes.windows(2).position(|pair|
		matches!(pair[0], b'\t' | b'\n' | b'\x0C' | b'\r') ||
		(pair[0].is_ascii_whitespace() && pair[1].is_ascii_whitespace())
	)?;

	// Split at that location and start building up a replacement.
	let (a, rest) = txt.split_at(pos);
	let mut new = String::with_capacity(txt.len());
	new.push_str(a);

	let mut in_ws = false;
	for c in rest.chars() {
		if c.is_ascii_whitespace() {
			if ! in_ws {
				in_ws = true;
				new.push(' ');
			}
		}
		else {
			in_ws = false;
			new.push(c);
		}
	}

	Some(new)
}
