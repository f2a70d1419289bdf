/*!
# HTSweep: Tag Tokenizer.

Once a line has been spliced clean of comments/scripts/styles, it gets cut
into tokens: text runs, opening tags (with attributes), self-closing tags,
closing tags, and doctype declarations.

Tags don't always fit on one line, so tokenization is preceded by a
completeness check: a line ending with an unmatched `<` gives up everything
from that bracket onward to a carry-over buffer, which is prefixed onto the
next line, as many times as it takes for the matching `>` to arrive. Lines
with no tag start at all are carried too, so multi-line text runs coalesce
into a single node.

Attribute values are allowed to contain unescaped quotes — or even whole
embedded tags — so candidate attributes accumulate word by word until the
quote count balances out, and embedded markup is smuggled through the
bracket-splitting as placeholder characters.
*/

use crate::spec::{
	self,
	SENT_EQ,
	SENT_GT,
	SENT_SP,
};
use std::borrow::Cow;
use super::node::Attribute;



#[derive(Debug)]
/// # Line Token.
pub(super) enum Token {
	/// # Text Run.
	Text(String),

	/// # Opening Tag.
	Open {
		/// # Tag Type (lower case).
		name: String,

		/// # Tag Attributes.
		attrs: Vec<Attribute>,
	},

	/// # Self-Closing Tag.
	SelfClose {
		/// # Tag Type (lower case).
		name: String,

		/// # Tag Attributes.
		attrs: Vec<Attribute>,
	},

	/// # Closing Tag.
	Close(String),

	/// # Doctype Declaration (verbatim).
	Doctype(String),
}



/// # Split Off the Incomplete Tail.
///
/// Return the portion of `line` that is ready for tokenization, and the
/// portion (if any) that must be buffered and prefixed onto the next line:
///
/// * A trailing unmatched `<` sends everything from that bracket onward to
///   the buffer.
/// * A line without any tag start is buffered whole, so that a text run
///   spread over several lines lands in one node.
/// * Anything else is complete.
pub(super) fn split_complete(line: &str) -> (Option<&str>, Option<&str>) {
	let Some(lo) = line.rfind('<') else {
		return (None, Some(line));
	};

	if line.rfind('>').is_none_or(|lc| lo > lc) {
		let head = &line[..lo];
		return (
			if head.is_empty() { None } else { Some(head) },
			Some(&line[lo..]),
		);
	}

	(Some(line), None)
}

/// # Tokenize a Complete Line.
pub(super) fn tokenize(line: &str) -> Vec<Token> {
	let mut out = Vec::new();
	let segs: Vec<&str> = line.split('<').collect();

	// Anything before the first bracket is a plain text run.
	push_text(&mut out, segs[0]);

	let mut idx = 1;
	while idx < segs.len() {
		// A segment that ends mid-attribute — `…value="` — means the next
		// bracket opened *inside* the value. Merge the two segments,
		// hiding the embedded markup behind placeholders.
		let seg: Cow<'_, str> =
			if
				! segs[idx].contains('>') &&
				segs[idx].ends_with("=\"") &&
				idx + 1 < segs.len()
			{
				idx += 1;
				Cow::Owned(escape_embedded(segs[idx - 1], segs[idx]))
			}
			else { Cow::Borrowed(segs[idx]) };

		match seg.split_once('>') {
			// A tag, and possibly some text trailing it.
			Some((info, text)) => {
				if let Some(token) = classify(info) { out.push(token); }
				push_text(&mut out, text);
			},
			// No closing bracket at all: the bracket was just text.
			None => push_text(&mut out, &seg),
		}

		idx += 1;
	}

	out
}

/// # Parse an Attribute Run.
///
/// Turn the (whitespace-collapsed) contents of an opening tag — everything
/// after the tag type — into attributes.
pub(super) fn parse_attributes(raw: &str) -> Vec<Attribute> {
	collect_attributes(raw.split_whitespace())
}



/// # Classify Tag Info.
///
/// `info` is everything between a `<` and its `>`. Figure out what kind of
/// tag it is and parse accordingly. Returns `None` if nothing usable
/// remains.
fn classify(info: &str) -> Option<Token> {
	let info = info.trim();
	if info.is_empty() { return None; }

	// Doctype declarations keep their raw text.
	if info.get(..8).is_some_and(|p| p.eq_ignore_ascii_case("!doctype")) {
		return Some(Token::Doctype(info.to_owned()));
	}

	// Closing tag.
	if let Some(rest) = info.strip_prefix('/') {
		let name = rest.trim().to_ascii_lowercase();
		if name.is_empty() { return None; }
		return Some(Token::Close(name));
	}

	// Explicitly self-closing.
	if let Some(rest) = info.strip_suffix('/') {
		let (name, attrs) = parse_tag(rest)?;
		return Some(Token::SelfClose { name, attrs });
	}

	// Opening tag — though void types get forced shut no matter what the
	// markup claims, since real pages rarely bother closing them.
	let (name, attrs) = parse_tag(info)?;
	if spec::is_forced_void(&name) { Some(Token::SelfClose { name, attrs }) }
	else { Some(Token::Open { name, attrs }) }
}

/// # Parse Tag Type + Attributes.
fn parse_tag(raw: &str) -> Option<(String, Vec<Attribute>)> {
	let mut words = raw.trim().split_whitespace();
	let name = words.next()?.to_ascii_lowercase();
	Some((name, collect_attributes(words)))
}

/// # Accumulate Attributes Word by Word.
///
/// A candidate attribute keeps absorbing words until its quoting balances:
/// it must contain the quote character that opened its value, hold an even
/// number of that character, and end with it. This tolerates unescaped
/// quotes and spaces *inside* values at the cost of producing no attribute
/// at all when the quoting never resolves.
fn collect_attributes<'a, I>(words: I) -> Vec<Attribute>
where I: Iterator<Item = &'a str> {
	let mut attrs = Vec::new();
	let mut acc = String::new();

	for w in words {
		if ! acc.is_empty() { acc.push(' '); }
		acc.push_str(w);

		if attr_complete(&acc) {
			if let Some(a) = parse_attribute(&acc) { attrs.push(a); }
			acc.clear();
		}
	}

	// Whatever's left gets one last best-effort chance.
	if ! acc.is_empty() && let Some(a) = parse_attribute(&acc) { attrs.push(a); }

	attrs
}

/// # Is the Accumulated Attribute Complete?
///
/// Find the first quote character after the first `=`; the attribute is
/// complete once the token holds an even count of that character and ends
/// with it.
fn attr_complete(token: &str) -> bool {
	let bytes = token.as_bytes();

	let mut idx = token.find('=').map_or(0, |p| p + 1);
	while idx < bytes.len() && bytes[idx] != b'\'' && bytes[idx] != b'"' { idx += 1; }
	if idx >= bytes.len() { return false; }

	let quote = bytes[idx];
	let count = bytes.iter().filter(|&&b| b == quote).count();
	count % 2 == 0 && bytes.last() == Some(&quote)
}

/// # Parse One Attribute.
///
/// Split `name="value"` at the first `=`, peel the wrapping quotes, and
/// restore any placeholder characters. Returns `None` when no name/value
/// pair can be recovered (bare or unquoted attributes included).
fn parse_attribute(raw: &str) -> Option<Attribute> {
	let (name, value) = raw.split_once('=')?;
	let name = name.trim();
	if name.is_empty() { return None; }

	let value = value.trim().as_bytes();
	if
		value.len() >= 2 &&
		(value[0] == b'"' || value[0] == b'\'') &&
		value[value.len() - 1] == value[0]
	{
		// Quotes are ASCII, so the inner slice stays valid UTF-8.
		let inner = std::str::from_utf8(&value[1..value.len() - 1]).ok()?;
		Some(Attribute::new(name, &spec::restore_sentinels(inner)))
	}
	else { None }
}

/// # Merge and Escape an Embedded Tag.
///
/// `head` ended with `="` and `tail` is the segment that followed the
/// swallowed `<`. Rejoin them, then hide the embedded markup: every `>` but
/// the last becomes a placeholder (the last is the real end of the outer
/// tag), and spaces/equals inside the embedded region are disguised so they
/// can't be mistaken for word or attribute boundaries.
fn escape_embedded(head: &str, tail: &str) -> String {
	let mut merged: String = format!("{head}<{tail}")
		.chars()
		.map(|c| if c == '>' { SENT_GT } else { c })
		.collect();

	// Put the outer tag's real closing bracket back.
	if let Some(last) = merged.rfind(SENT_GT) {
		merged.replace_range(last..last + SENT_GT.len_utf8(), ">");
	}

	// Disguise the embedded region, if one remains.
	if
		let Some(open) = merged.find('<') &&
		let Some(close) = merged.rfind(SENT_GT) &&
		open < close
	{
		let embedded: String = merged[open..close]
			.chars()
			.map(|c| match c {
				' ' => SENT_SP,
				'=' => SENT_EQ,
				c => c,
			})
			.collect();
		merged.replace_range(open..close, &embedded);
	}

	merged
}

/// # Push a Text Run.
///
/// Trim and scrub the text — fancy dashes normalized, replacement
/// characters dropped — and skip it entirely if nothing remains.
fn push_text(out: &mut Vec<Token>, raw: &str) {
	let mut txt = String::with_capacity(raw.len());
	for c in raw.trim().chars() {
		match c {
			'–' | '—' => txt.push('-'),
			'\u{fffd}' => {},
			c => txt.push(c),
		}
	}

	if ! txt.is_empty() { out.push(Token::Text(txt)); }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_split_complete() {
		// Balanced lines pass straight through.
		assert_eq!(
			split_complete("<p>hello</p>"),
			(Some("<p>hello</p>"), None),
		);

		// A trailing open bracket gets buffered.
		assert_eq!(
			split_complete("<p>hello</p><div class=\"x"),
			(Some("<p>hello</p>"), Some("<div class=\"x")),
		);

		// So does a bare tag start.
		assert_eq!(split_complete("<div"), (None, Some("<div")));

		// Tagless lines accumulate whole.
		assert_eq!(split_complete("plain text"), (None, Some("plain text")));
	}

	#[test]
	fn t_attr_complete() {
		assert!(attr_complete("class=\"foo\""));
		assert!(attr_complete("class=\"foo bar\""));
		assert!(attr_complete("onclick='this.select()'"));

		// Odd quote counts mean the value is still open.
		assert!(! attr_complete("alt=\"it's a"));
		assert!(! attr_complete("class=\"foo"));

		// Embedded opposite-quotes don't confuse the count.
		assert!(attr_complete("onclick=\"a='b'\""));

		// No quotes, no dice.
		assert!(! attr_complete("disabled"));
		assert!(! attr_complete("width=100"));
	}

	#[test]
	fn t_parse_attribute() {
		let a = parse_attribute("CLASS=\"Foo Bar\"").expect("Attribute failed.");
		assert_eq!(&*a.name, "class");
		assert_eq!(&*a.value, "Foo Bar");

		let a = parse_attribute("alt=''").expect("Attribute failed.");
		assert_eq!(&*a.value, "");

		// Unrecoverable shapes produce nothing.
		assert!(parse_attribute("disabled").is_none());
		assert!(parse_attribute("width=100").is_none());
		assert!(parse_attribute("=\"x\"").is_none());
	}

	#[test]
	fn t_tokenize_basic() {
		let tokens = tokenize("<p class=\"intro\">Hello</p>");
		assert_eq!(tokens.len(), 3);
		assert!(matches!(
			&tokens[0],
			Token::Open { name, attrs }
				if name == "p" && attrs.len() == 1 && attrs[0].is_match("class", "intro")
		));
		assert!(matches!(&tokens[1], Token::Text(t) if t == "Hello"));
		assert!(matches!(&tokens[2], Token::Close(n) if n == "p"));
	}

	#[test]
	fn t_tokenize_self_closing() {
		// Explicit.
		let tokens = tokenize("<br />");
		assert!(matches!(&tokens[0], Token::SelfClose { name, .. } if name == "br"));

		// Forced, trailing slash or not.
		let tokens = tokenize("<img src=\"a.png\">");
		assert!(matches!(
			&tokens[0],
			Token::SelfClose { name, attrs }
				if name == "img" && attrs[0].is_match("src", "a.png")
		));
	}

	#[test]
	fn t_tokenize_doctype() {
		let tokens = tokenize("<!DOCTYPE html><html>");
		assert!(matches!(&tokens[0], Token::Doctype(raw) if raw == "!DOCTYPE html"));
		assert!(matches!(&tokens[1], Token::Open { name, .. } if name == "html"));
	}

	#[test]
	fn t_tokenize_embedded_markup() {
		// An anchor tag living inside an attribute value.
		let tokens = tokenize(
			"<input class=\"linkbox\" value=\"<a href='http://example.com/x'>\">tail"
		);
		assert_eq!(tokens.len(), 2);
		assert!(matches!(
			&tokens[0],
			Token::SelfClose { name, attrs }
				if name == "input" &&
					attrs[0].is_match("class", "linkbox") &&
					attrs[1].is_match("value", "<a href='http://example.com/x'>")
		));
		assert!(matches!(&tokens[1], Token::Text(t) if t == "tail"));
	}

	#[test]
	fn t_tokenize_stray_text() {
		let tokens = tokenize("before<p>middle</p>after");
		assert_eq!(tokens.len(), 5);
		assert!(matches!(&tokens[0], Token::Text(t) if t == "before"));
		assert!(matches!(&tokens[4], Token::Text(t) if t == "after"));
	}
}
