/*!
# HTSweep: Serialization
*/

use crate::{
	dom::{
		Indexer,
		node::{
			Attribute,
			Handle,
			NodeInner,
		},
	},
	HtsweepError,
};
use std::{
	collections::VecDeque,
	io::{
		self,
		Write,
	},
	rc::Rc,
};



/// Back to HTML!
///
/// Write the surviving tree to the caller's sink: the doctype first (if the
/// document had one), then the root `<html>` element and everything under
/// it. Attribute order is preserved, self-closing tags get their ` />`, and
/// style/text bodies are emitted raw — nothing was entity-decoded on the
/// way in, so nothing gets re-encoded on the way out.
///
/// ## Errors
///
/// Returns an error if no document has been indexed, or if the sink refuses
/// the bytes.
pub(crate) fn serialize<W: Write>(indexer: &Indexer, out: &mut W)
-> Result<(), HtsweepError> {
	if ! indexer.is_indexed() { return Err(HtsweepError::NotIndexed); }
	serialize_inner(indexer, out).map_err(|_| HtsweepError::Save)
}



#[derive(Debug)]
/// # Serialization Stage.
enum Stage {
	/// # Open Tag.
	Open(Handle),

	/// # Close Tag.
	Close(Box<str>),

	/// # Line Break.
	///
	/// Direct children of `<html>` and `<body>` get a fresh line to keep
	/// the output halfway readable, at the cost of a few bytes.
	Nl,
}



/// # Serialize (Inner).
fn serialize_inner<W: Write>(indexer: &Indexer, out: &mut W) -> io::Result<()> {
	// The doctype is parentless and always first.
	if
		let Some(doc) = indexer.doctype() &&
		let NodeInner::Doctype { raw } = &doc.inner
	{
		writeln!(out, "<{raw}>")?;
	}

	// Everything else hangs off the root.
	let Some(root) = indexer.root() else { return Ok(()); };

	let mut stack = VecDeque::new();
	stack.push_front(Stage::Open(root));

	while let Some(op) = stack.pop_front() {
		match op {
			Stage::Open(handle) => match &handle.inner {
				NodeInner::Element { name, attrs } => {
					write_open(out, name, attrs, false)?;

					let breaks = matches!(&**name, "html" | "body");
					stack.reserve(2 * (1 + handle.children.borrow().len()));
					stack.push_front(Stage::Close(name.clone()));
					if breaks { stack.push_front(Stage::Nl); }

					for child in handle.children.borrow().iter().rev() {
						stack.push_front(Stage::Open(Rc::clone(child)));
						if breaks { stack.push_front(Stage::Nl); }
					}
				},

				NodeInner::SelfClosing { name, attrs } => {
					write_open(out, name, attrs, true)?;
				},

				NodeInner::Text { body } => out.write_all(body.as_bytes())?,

				NodeInner::StyleBody { attrs, body } => {
					write_open(out, "style", attrs, false)?;
					out.write_all(body.borrow().as_bytes())?;
					out.write_all(b"</style>")?;
				},

				// Already handled up top.
				NodeInner::Doctype { .. } => {},
			},

			Stage::Close(name) => write!(out, "</{name}>")?,

			Stage::Nl => out.write_all(b"\n")?,
		}
	}

	Ok(())
}

/// # Write an Opening Tag.
fn write_open<W: Write>(out: &mut W, name: &str, attrs: &[Attribute], void: bool)
-> io::Result<()> {
	write!(out, "<{name}")?;
	for a in attrs { write_attr(out, a)?; }

	if void { out.write_all(b" />") }
	else { out.write_all(b">") }
}

/// # Write a Tag Attribute.
///
/// The value is wrapped in whichever quote style conflicts with it least;
/// any conflicting quotes that remain are escaped.
fn write_attr<W: Write>(out: &mut W, attr: &Attribute) -> io::Result<()> {
	out.write_all(b" ")?;
	out.write_all(attr.name.as_bytes())?;

	let single = matches!(QuoteKind::for_value(attr.value.as_bytes()), QuoteKind::Single);
	let (quote, needle, escape): (&[u8], char, &[u8]) =
		if single { (b"'", '\'', b"&#39;") }
		else { (b"\"", '"', b"&#34;") };

	out.write_all(b"=")?;
	out.write_all(quote)?;

	let mut rest: &str = &attr.value;
	while let Some(pos) = rest.find(needle) {
		out.write_all(rest[..pos].as_bytes())?;
		out.write_all(escape)?;
		rest = &rest[pos + 1..];
	}
	out.write_all(rest.as_bytes())?;

	out.write_all(quote)
}



#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
/// # Quote Type
///
/// If an attribute value contains the same character used for quoting, it
/// has to be encoded, jumping from one to five bytes per occurrence.
///
/// Space can often be saved in such cases by wrapping the value with single
/// quotes instead of the usual double.
enum QuoteKind {
	#[default]
	/// # Double (") Quotes.
	Double,

	/// # Single (') Quotes.
	Single,
}

impl QuoteKind {
	#[must_use]
	/// # For Attribute Value.
	const fn for_value(mut src: &[u8]) -> Self {
		let mut double = 0;
		let mut single = 0;

		while let [n, rest @ ..] = src {
			match *n {
				b'"' => { double += 1; },
				b'\'' => { single += 1; },
				_ => {},
			}
			src = rest;
		}

		// Prefer single if there are fewer of them.
		if single < double { Self::Single }
		// Otherwise stick with the default.
		else { Self::Double }
	}
}
