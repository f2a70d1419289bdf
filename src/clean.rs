/*!
# HTSweep: Sweeping.
*/

use crate::{
	dom::Indexer,
	HtsweepError,
};
use std::{
	num::NonZeroU64,
	path::Path,
};



#[derive(Debug, Clone)]
/// # Removal Rule.
///
/// A tag type, optionally narrowed to one attribute name/value pair —
/// `div` or `div:class=ad-banner` on the command line.
struct Rule {
	/// # Tag Type.
	kind: String,

	/// # Attribute Name/Value.
	attr: Option<(String, String)>,
}

impl TryFrom<&str> for Rule {
	type Error = HtsweepError;

	fn try_from(src: &str) -> Result<Self, Self::Error> {
		let src = src.trim();

		let (kind, attr) = match src.split_once(':') {
			None => (src, None),
			Some((kind, rest)) => {
				let (name, value) = rest.split_once('=').ok_or(HtsweepError::BadRule)?;
				if name.is_empty() { return Err(HtsweepError::BadRule); }
				(kind, Some((name.to_owned(), value.to_owned())))
			},
		};

		if kind.is_empty() || kind.contains(char::is_whitespace) {
			return Err(HtsweepError::BadRule);
		}

		Ok(Self { kind: kind.to_owned(), attr })
	}
}



#[derive(Debug, Clone, Default)]
/// # Sweep Rules.
///
/// The full set of removals to run against each document, straight from
/// the command line.
pub(super) struct Rules {
	/// # Remove-With-Children Rules.
	strip: Vec<Rule>,

	/// # Remove-Connect-Children Rules.
	unwrap: Vec<Rule>,
}

impl Rules {
	/// # Add a Strip Rule.
	///
	/// ## Errors
	///
	/// Returns an error if the rule doesn't parse.
	pub(super) fn push_strip(&mut self, raw: &str) -> Result<(), HtsweepError> {
		self.strip.push(Rule::try_from(raw)?);
		Ok(())
	}

	/// # Add an Unwrap Rule.
	///
	/// ## Errors
	///
	/// Returns an error if the rule doesn't parse.
	pub(super) fn push_unwrap(&mut self, raw: &str) -> Result<(), HtsweepError> {
		self.unwrap.push(Rule::try_from(raw)?);
		Ok(())
	}

	/// # Apply to a Document.
	///
	/// Run every removal, then finish with the empty-tag prune — ads leave
	/// a lot of hollow wrappers behind.
	fn apply(&self, indexer: &mut Indexer) -> Result<(), HtsweepError> {
		for rule in &self.strip {
			match &rule.attr {
				Some((name, value)) =>
					indexer.remove_by_type_and_children(&rule.kind, name, value)?,
				None => indexer.remove_type(&rule.kind)?,
			}
		}

		for rule in &self.unwrap {
			match &rule.attr {
				Some((name, value)) =>
					indexer.remove_by_type_connect_children(&rule.kind, name, value)?,
				None => indexer.remove_type_connect_children(&rule.kind)?,
			}
		}

		indexer.prune_empty()
	}
}



/// # Sweep a Document.
///
/// Read the raw HTML from a file, index it, sweep out the unwanted bits,
/// turn what's left back into HTML, and save it — but only if the result
/// actually shrank.
///
/// Returns the before/after sizes.
///
/// ## Errors
///
/// This will return an error if the file is unreadable, empty, or has no
/// recognizable document root, or if issues are encountered when trying to
/// re-save it.
pub(super) fn clean(src: &Path, rules: &Rules)
-> Result<(NonZeroU64, NonZeroU64), HtsweepError> {
	// Load the file.
	let raw = std::fs::read_to_string(src).map_err(|_| HtsweepError::Read)?;
	let before = u64::try_from(raw.len())
		.ok()
		.and_then(NonZeroU64::new)
		.ok_or(HtsweepError::EmptyFile)?;

	// Index it.
	let mut indexer = Indexer::new();
	indexer.index(raw.as_bytes())?;
	if indexer.root().is_none() { return Err(HtsweepError::Parse); }

	// Sweep it.
	rules.apply(&mut indexer)?;

	// Back to text.
	let mut out: Vec<u8> = Vec::with_capacity(raw.len());
	crate::ser::serialize(&indexer, &mut out)?;

	// Save it if the sweep bought us something.
	if
		let Some(after) = u64::try_from(out.len()).ok().and_then(NonZeroU64::new) &&
		after < before
	{
		write_atomic::write_file(src, &out).map_err(|_| HtsweepError::Save)?;
		return Ok((before, after));
	}

	// We didn't do anything.
	Ok((before, before))
}
