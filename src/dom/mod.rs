/*!
# HTSweep: DOM.

The `Indexer` turns a line-delimited HTML stream into an addressable tree,
then exposes the structural edit operations used to prune it down.

Each input line runs through the splice passes (comments and scripts out,
style bodies captured), the carry-over check (partial tags wait for their
closing bracket), and the tokenizer; the resulting tokens drive an open-tag
stack. New nodes attach as children of the stack top and register in a
type index — a map from tag type to every node of that type, in discovery
order.

The stack and the index are deliberately lazy about consistency: structural
removals leave stale entries in the index until `orphan_sweep` reconciles
them, which is much cheaper than keeping the two perfectly live through
every mutation. Queries only ever consult the index, so a sweep (performed
automatically by the removal helpers) must separate any removal from the
queries that follow it.
*/

pub(crate) mod node;
mod splice;
mod token;

use crate::HtsweepError;
use indexmap::IndexMap;
use node::{
	Handle,
	Node,
	NodeInner,
};
use splice::Splicer;
use std::{
	io::BufRead,
	rc::Rc,
};
use token::Token;



#[derive(Debug, Default)]
/// # The Indexer.
///
/// An instance starts out `Empty`, becomes `Indexed` after one full pass of
/// `index()`, and only then accepts queries, mutations, and serialization.
/// Re-indexing an already-indexed instance resets it first.
pub(crate) struct Indexer {
	/// # Type Index.
	///
	/// Every node ever created, bucketed by tag type. The buckets hold the
	/// strong references — a detached subtree stays alive (and findable)
	/// until a sweep drops it.
	index: IndexMap<Box<str>, Vec<Handle>>,

	/// # Open-Tag Stack.
	///
	/// The ancestor chain from the document root (exclusive) down to the
	/// node currently accepting children.
	stack: Vec<Handle>,

	/// # Multi-Line Construct Flags.
	splice: Splicer,

	/// # Carry-Over Buffer.
	///
	/// A tag (or text run) that started but didn't finish on an earlier
	/// line, waiting to be prefixed onto the next one.
	carry: String,

	/// # The Style Node Currently Capturing Its Body.
	///
	/// Kept separately from the stack because a line may push other tags
	/// between the style's opening and the point its body text arrives.
	style_open: Option<Handle>,

	/// # Has a Document Been Indexed?
	indexed: bool,
}

/// ## Indexing.
impl Indexer {
	#[must_use]
	/// # New (Empty) Instance.
	pub(crate) fn new() -> Self { Self::default() }

	#[must_use]
	/// # Indexed?
	pub(crate) const fn is_indexed(&self) -> bool { self.indexed }

	/// # Index a Document.
	///
	/// Consume the reader line by line, building the tree and the type
	/// index as we go. Empty lines are skipped. Any previously-indexed
	/// document is discarded first.
	///
	/// ## Errors
	///
	/// Returns an error if the underlying read fails; malformed markup
	/// never does.
	pub(crate) fn index<R: BufRead>(&mut self, reader: R) -> Result<(), HtsweepError> {
		if self.indexed { *self = Self::default(); }

		for line in reader.lines() {
			let line = line.map_err(|_| HtsweepError::Read)?;
			if ! line.is_empty() { self.index_line(&line); }
		}

		// Whatever never completed — open tags, a dangling carry-over —
		// is abandoned where it stands.
		if ! self.carry.is_empty() {
			log::debug!("dropping unterminated carry-over: {:?}", self.carry);
		}
		self.stack.truncate(0);
		self.carry.truncate(0);
		self.style_open = None;
		self.indexed = true;

		Ok(())
	}

	/// # Index One Line.
	fn index_line(&mut self, raw: &str) {
		// Splice passes, in fixed order; any of them may consume the
		// whole line.
		let Some(line) = self.splice.comment_pass(raw) else { return; };
		let Some(line) = self.splice.script_pass(&line) else { return; };
		let Some(line) = self.splice_style(&line) else { return; };

		// Prefix the carry-over from previous lines, if any. The newline
		// the reader swallowed was a word boundary; give it back as a
		// space so split tags and text runs rejoin cleanly.
		let line =
			if self.carry.is_empty() { line }
			else {
				let mut joined = std::mem::take(&mut self.carry);
				joined.push(' ');
				joined.push_str(&line);
				joined
			};

		// Single-space everything.
		let line = crate::spec::collapse_whitespace(&line).unwrap_or(line);

		let (complete, carry) = token::split_complete(&line);
		let carry = carry.map(str::to_owned);

		if let Some(done) = complete {
			for t in token::tokenize(done) { self.consume(t); }
		}
		if let Some(c) = carry { self.carry = c; }
	}

	/// # Consume One Token.
	fn consume(&mut self, token: Token) {
		match token {
			Token::Open { name, attrs } => {
				let node = Node::element(&name, attrs);
				if let Some(top) = self.stack.last() { Node::adopt(top, &node); }
				self.register(&node);
				self.stack.push(node);
			},

			// Self-closing tags never touch the stack.
			Token::SelfClose { name, attrs } => {
				let node = Node::self_closing(&name, attrs);
				if let Some(top) = self.stack.last() { Node::adopt(top, &node); }
				self.register(&node);
			},

			// The innermost matching entry closes; anything stacked above
			// it stays open. No match anywhere, no-op.
			Token::Close(name) => {
				if let Some(pos) = self.stack.iter().rposition(|n| n.tag_type() == name) {
					self.stack.remove(pos);
				}
				else { log::debug!("unmatched closing tag </{name}> ignored"); }
			},

			// Text with nothing open has nowhere to go.
			Token::Text(body) =>
				if let Some(top) = self.stack.last() {
					let node = Node::text(&body);
					Node::adopt(top, &node);
					self.register(&node);
				},

			// One doctype per document; it bypasses the stack entirely.
			Token::Doctype(raw) =>
				if self.index.contains_key("doctype") {
					log::debug!("extra doctype ignored");
				}
				else {
					let node = Node::doctype(&raw);
					self.register(&node);
				},
		}
	}

	/// # Register a Node.
	///
	/// Append the node to its type's bucket, creating the bucket if this is
	/// the first of its kind.
	fn register(&mut self, node: &Handle) {
		let ty = node.tag_type();
		if let Some(bucket) = self.index.get_mut(ty) { bucket.push(Rc::clone(node)); }
		else { self.index.insert(Box::from(ty), vec![Rc::clone(node)]); }
	}

	/// # Open a Style Node.
	///
	/// Called by the style splice pass: parse the attribute run, attach the
	/// new node under the stack top, and push it so the body has somewhere
	/// to accumulate.
	fn open_style(&mut self, raw: &str) {
		let node = Node::style(token::parse_attributes(raw.trim()));
		if let Some(top) = self.stack.last() { Node::adopt(top, &node); }
		self.register(&node);
		self.stack.push(Rc::clone(&node));
		self.style_open.replace(node);
	}

	/// # Append Style Body Text.
	fn append_style_body(&mut self, txt: &str) {
		if ! txt.is_empty() && let Some(style) = &self.style_open {
			style.append_style(txt);
		}
	}

	/// # Close the Open Style Node.
	fn close_style(&mut self) {
		if
			let Some(style) = self.style_open.take() &&
			let Some(pos) = self.stack.iter().rposition(|n| Rc::ptr_eq(n, &style))
		{
			self.stack.remove(pos);
		}
	}
}

/// ## Queries.
impl Indexer {
	/// # Find by Type and Attribute.
	///
	/// Tag type and attribute name match case-insensitively; the attribute
	/// value is case-sensitive. Results come back in discovery order; an
	/// empty list means the document just doesn't have any.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn find_by_type_and_attribute(&self, kind: &str, name: &str, value: &str)
	-> Result<Vec<Handle>, HtsweepError> {
		self.check_indexed()?;

		let kind = kind.to_ascii_lowercase();
		Ok(self.index.get(kind.as_str()).map_or_else(Vec::new, |bucket|
			bucket.iter()
				.filter(|n| n.has_attr(name, value))
				.cloned()
				.collect()
		))
	}

	/// # Find by Type.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn find_by_type(&self, kind: &str) -> Result<Vec<Handle>, HtsweepError> {
		self.check_indexed()?;

		let kind = kind.to_ascii_lowercase();
		Ok(self.index.get(kind.as_str()).cloned().unwrap_or_default())
	}

	/// # Find a Text Run (Exact Match).
	///
	/// Case-sensitive; your best bet is to paste the text straight out of
	/// the document.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn find_text(&self, body: &str) -> Result<Option<Handle>, HtsweepError> {
		self.check_indexed()?;

		Ok(self.index.get("text").and_then(|bucket|
			bucket.iter()
				.find(|n| matches!(&n.inner, NodeInner::Text { body: b } if &**b == body))
				.cloned()
		))
	}

	#[must_use]
	/// # The Doctype Node, if Any.
	pub(crate) fn doctype(&self) -> Option<Handle> {
		self.index.get("doctype").and_then(|b| b.first().cloned())
	}

	#[must_use]
	/// # The Root `<html>` Element, if Any.
	pub(crate) fn root(&self) -> Option<Handle> {
		self.index.get("html").and_then(|b| b.first().cloned())
	}

	/// # Indexed Yet?
	const fn check_indexed(&self) -> Result<(), HtsweepError> {
		if self.indexed { Ok(()) }
		else { Err(HtsweepError::NotIndexed) }
	}
}

/// ## Mutations.
impl Indexer {
	/// # Remove a Node and Its Children.
	///
	/// The children stay owned by the removed node — nobody walks them —
	/// and the whole orphaned subtree falls out of the index at the sweep
	/// this triggers.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_with_children(&mut self, node: &Handle) -> Result<(), HtsweepError> {
		self.check_indexed()?;
		Node::detach(node);
		self.sweep();
		Ok(())
	}

	/// # Remove a Node, Keeping Its Children.
	///
	/// The children splice into the removed node's former slot, order
	/// preserved. Handy for unwrapping non-semantic wrapper tags.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_connect_children(&mut self, node: &Handle) -> Result<(), HtsweepError> {
		self.check_indexed()?;
		Node::detach_splice(node);
		self.sweep();
		Ok(())
	}

	/// # Remove Empty Tags.
	///
	/// Repeatedly remove childless elements, climbing upward: if a removal
	/// leaves the parent childless, the parent goes too, until something
	/// with surviving children (or the root) is reached. This clears most
	/// of the clutter ads leave behind.
	///
	/// Text, doctype, and self-closing nodes are never candidates; style
	/// nodes survive if their captured body is non-empty. Calling this
	/// twice in a row changes nothing the second time.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn prune_empty(&mut self) -> Result<(), HtsweepError> {
		self.check_indexed()?;

		let types: Vec<Box<str>> = self.index.keys().cloned().collect();
		for ty in types {
			if matches!(&*ty, "text" | "doctype") { continue; }
			let Some(bucket) = self.index.get(&*ty) else { continue; };
			let nodes: Vec<Handle> = bucket.clone();
			let mut removed = false;

			for node in nodes {
				if node.is_self_closing() { continue; }

				let mut tag = node;
				loop {
					if ! tag.children.borrow().is_empty() { break; }

					// Style tags carry their substance in the body rather
					// than children.
					if
						let NodeInner::StyleBody { body, .. } = &tag.inner &&
						! body.borrow().is_empty()
					{ break; }

					let parent = tag.parent();
					Node::detach(&tag);
					removed = true;

					// Climb if the parent is childless now.
					match parent {
						Some(p) if p.children.borrow().is_empty() => { tag = p; },
						_ => break,
					}
				}
			}

			if removed { self.sweep(); }
		}

		Ok(())
	}

	/// # Remove by Type + Attribute (With Children).
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_by_type_and_children(&mut self, kind: &str, name: &str, value: &str)
	-> Result<(), HtsweepError> {
		let found = self.find_by_type_and_attribute(kind, name, value)?;
		for node in &found { Node::detach(node); }
		self.sweep();
		self.prune_empty()
	}

	/// # Remove by Type + Attribute (Connect Children).
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_by_type_connect_children(&mut self, kind: &str, name: &str, value: &str)
	-> Result<(), HtsweepError> {
		let found = self.find_by_type_and_attribute(kind, name, value)?;
		for node in &found { Node::detach_splice(node); }
		self.sweep();
		self.prune_empty()
	}

	/// # Remove Every Node of a Type (With Children).
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_type(&mut self, kind: &str) -> Result<(), HtsweepError> {
		let found = self.find_by_type(kind)?;
		for node in &found { Node::detach(node); }
		self.sweep();
		self.prune_empty()
	}

	/// # Remove Every Node of a Type (Connect Children).
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_type_connect_children(&mut self, kind: &str) -> Result<(), HtsweepError> {
		let found = self.find_by_type(kind)?;
		for node in &found { Node::detach_splice(node); }
		self.sweep();
		self.prune_empty()
	}

	/// # Remove Text Runs (Exact Match).
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_text(&mut self, body: &str) -> Result<(), HtsweepError> {
		self.check_indexed()?;

		let found: Vec<Handle> = self.index.get("text").map_or_else(Vec::new, |bucket|
			bucket.iter()
				.filter(|n| matches!(&n.inner, NodeInner::Text { body: b } if &**b == body))
				.cloned()
				.collect()
		);
		for node in &found { Node::detach(node); }
		self.sweep();
		self.prune_empty()
	}

	/// # Remove the Nth Child of Matching Parents.
	///
	/// For each parent matching the attribute query, remove the child at
	/// `index` — but only if that child is of `child_type`. With
	/// `keep_grandchildren`, the child's own children splice up into the
	/// parent; otherwise they go down with it.
	///
	/// Positional matching is brittle: a page that shuffles its layout
	/// between fetches will silently stop matching (or worse, match the
	/// wrong child). Prefer the attribute-based removals whenever the
	/// markup allows.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn remove_nth_child_of_match(
		&mut self,
		index: usize,
		child_type: &str,
		parent_type: &str,
		attr_name: &str,
		attr_value: &str,
		keep_grandchildren: bool,
	) -> Result<(), HtsweepError> {
		let child_type = child_type.to_ascii_lowercase();
		let found = self.find_by_type_and_attribute(parent_type, attr_name, attr_value)?;
		let mut removed = false;

		for parent in found {
			let target = parent.children.borrow()
				.get(index)
				.filter(|k| k.tag_type() == child_type)
				.cloned();

			if let Some(child) = target {
				if keep_grandchildren { Node::detach_splice(&child); }
				else { Node::detach(&child); }
				removed = true;
			}
		}

		if removed { self.sweep(); }
		self.prune_empty()
	}

	/// # Insert a Node, Absorbing Siblings.
	///
	/// Insert `new` as a child of `parent` at `at`, then reparent the
	/// `absorb` siblings that previously followed that position to become
	/// children of `new`, order preserved. A no-op when `at` exceeds the
	/// current child count by more than one.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn insert_and_absorb(
		&mut self,
		new: &Handle,
		at: usize,
		absorb: usize,
		parent: &Handle,
	) -> Result<(), HtsweepError> {
		self.check_indexed()?;

		let len = parent.children.borrow().len();
		if len > at {
			let old: Vec<Handle> = parent.children.borrow_mut().drain(..).collect();
			let mut rebuilt: Vec<Handle> = Vec::with_capacity(old.len() + 1);
			rebuilt.extend(old[..at].iter().map(Rc::clone));

			rebuilt.push(Rc::clone(new));
			*new.parent.borrow_mut() = Rc::downgrade(parent);
			self.register(new);

			let mut remaining = absorb;
			for kid in &old[at..] {
				if remaining > 0 {
					Node::adopt(new, kid);
					remaining -= 1;
				}
				else { rebuilt.push(Rc::clone(kid)); }
			}

			*parent.children.borrow_mut() = rebuilt;
		}
		else if len == at {
			Node::adopt(parent, new);
			self.register(new);
		}
		// Further out than that is a no-op.

		Ok(())
	}

	/// # Orphan Sweep.
	///
	/// Drop index entries whose node no longer has a (living) parent —
	/// excepting the doctype and root, which are parentless by nature —
	/// and then any buckets left empty. The removal helpers all call this
	/// themselves; it only needs calling directly after raw `Node` surgery.
	///
	/// ## Errors
	///
	/// Returns an error if no document has been indexed.
	pub(crate) fn orphan_sweep(&mut self) -> Result<(), HtsweepError> {
		self.check_indexed()?;
		self.sweep();
		Ok(())
	}

	/// # Sweep (Inner).
	///
	/// Dropping a bucket entry can strand that node's descendants — their
	/// weak parent references die with it — so the pass repeats until a
	/// full scan changes nothing. Afterward every indexed node (bar the
	/// exempt two) has a living parent.
	fn sweep(&mut self) {
		loop {
			let mut changed = false;

			for bucket in self.index.values_mut() {
				let before = bucket.len();
				bucket.retain(|n|
					matches!(n.tag_type(), "html" | "doctype") ||
					n.parent().is_some()
				);
				if bucket.len() != before { changed = true; }
			}

			let before = self.index.len();
			self.index.retain(|_, bucket| ! bucket.is_empty());
			if self.index.len() != before { changed = true; }

			if ! changed { break; }
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Index a Document From a String.
	fn parse(raw: &str) -> Indexer {
		let mut indexer = Indexer::new();
		indexer.index(raw.as_bytes()).expect("Indexing failed.");
		indexer
	}

	/// # Predictable Test Document.
	const HTML: &str = "\
<!DOCTYPE html>
<html>
<head><title>Test</title></head>
<body>
<div id=\"header\" class=\"wrap\">
<p>Hello World</p>
</div>
</body>
</html>";

	#[test]
	fn t_not_indexed() {
		let mut indexer = Indexer::new();
		assert!(matches!(indexer.find_by_type("div"), Err(HtsweepError::NotIndexed)));
		assert!(matches!(indexer.find_text("x"), Err(HtsweepError::NotIndexed)));
		assert!(matches!(indexer.prune_empty(), Err(HtsweepError::NotIndexed)));
		assert!(matches!(indexer.orphan_sweep(), Err(HtsweepError::NotIndexed)));
		assert!(matches!(indexer.remove_type("div"), Err(HtsweepError::NotIndexed)));
	}

	#[test]
	fn t_index_basic() {
		let indexer = parse(HTML);
		assert!(indexer.is_indexed());
		assert!(indexer.doctype().is_some());

		// One of each structural type.
		for ty in ["html", "head", "title", "body", "div", "p"] {
			assert_eq!(indexer.find_by_type(ty).expect("Query failed.").len(), 1, "type {ty}");
		}

		// Type lookups are case-insensitive.
		assert_eq!(indexer.find_by_type("DIV").expect("Query failed.").len(), 1);

		// The paragraph text landed as a text node under the paragraph.
		let txt = indexer.find_text("Hello World")
			.expect("Query failed.")
			.expect("Text not found.");
		assert_eq!(
			txt.parent().expect("Parent missing.").tag_type(),
			"p",
		);
	}

	#[test]
	fn t_attribute_matching() {
		let indexer = parse(HTML);

		// Attribute names are case-insensitive…
		assert_eq!(
			indexer.find_by_type_and_attribute("div", "ID", "header").expect("Query failed.").len(),
			1,
		);
		// …but values are not.
		assert!(
			indexer.find_by_type_and_attribute("div", "id", "Header").expect("Query failed.").is_empty()
		);
		// Existing type, no matching attribute: empty, not an error.
		assert!(
			indexer.find_by_type_and_attribute("div", "id", "footer").expect("Query failed.").is_empty()
		);
	}

	#[test]
	fn t_find_text_case() {
		let indexer = parse(HTML);
		assert!(indexer.find_text("Hello World").expect("Query failed.").is_some());
		assert!(indexer.find_text("hello world").expect("Query failed.").is_none());
	}

	#[test]
	fn t_comment_elision() {
		let indexer = parse("<html><body><p>keep</p><!-- drop --></body></html>");
		assert!(indexer.find_text("keep").expect("Query failed.").is_some());
		assert!(indexer.find_text("drop").expect("Query failed.").is_none());

		// Only the one text node should exist at all.
		assert_eq!(indexer.find_by_type("text").expect("Query failed.").len(), 1);
	}

	#[test]
	fn t_script_carry_over() {
		let indexer = parse("\
<html><body><p>before</p><script type=\"text/javascript\">
var x = \"<div>not real</div>\";
if (x) { x += '<span>'; }
</script><p>after</p></body></html>");

		// Script guts must leave no trace.
		assert!(indexer.find_by_type("div").expect("Query failed.").is_empty());
		assert!(indexer.find_by_type("span").expect("Query failed.").is_empty());
		assert!(indexer.find_by_type("script").expect("Query failed.").is_empty());

		// The surrounding content survives.
		assert!(indexer.find_text("before").expect("Query failed.").is_some());
		assert!(indexer.find_text("after").expect("Query failed.").is_some());
	}

	#[test]
	fn t_style_capture() {
		let indexer = parse("\
<html><head>
<style type=\"text/css\">
p { color: red; }
</style>
</head><body><p>hi</p></body></html>");

		let styles = indexer.find_by_type("style").expect("Query failed.");
		assert_eq!(styles.len(), 1);
		assert!(styles[0].has_attr("type", "text/css"));
		let NodeInner::StyleBody { body, .. } = &styles[0].inner else {
			panic!("Wrong node kind.");
		};
		assert_eq!(&**body.borrow(), "p { color: red; }");

		// It should have wound up in the head.
		assert_eq!(
			styles[0].parent().expect("Parent missing.").tag_type(),
			"head",
		);

		// The stylesheet text must not have leaked into text nodes.
		assert_eq!(indexer.find_by_type("text").expect("Query failed.").len(), 1);
	}

	#[test]
	fn t_forced_self_closing() {
		let indexer = parse("<html><body><img src=\"a.png\"><p>x</p></body></html>");

		let imgs = indexer.find_by_type("img").expect("Query failed.");
		assert_eq!(imgs.len(), 1);
		assert!(imgs[0].is_self_closing());
		assert!(imgs[0].children.borrow().is_empty());

		// The paragraph is the image's *sibling*, not its child: the image
		// never made it onto the stack.
		let p = &indexer.find_by_type("p").expect("Query failed.")[0];
		assert_eq!(p.parent().expect("Parent missing.").tag_type(), "body");
	}

	#[test]
	fn t_tag_carry_over() {
		// A tag split across three lines.
		let indexer = parse("\
<html><body><div
class=\"wrap\"
id=\"x\">hi</div></body></html>");

		let divs = indexer.find_by_type_and_attribute("div", "class", "wrap")
			.expect("Query failed.");
		assert_eq!(divs.len(), 1);
		assert!(divs[0].has_attr("id", "x"));
		assert!(indexer.find_text("hi").expect("Query failed.").is_some());
	}

	#[test]
	fn t_remove_with_children() {
		let mut indexer = parse(HTML);
		let div = indexer.find_by_type_and_attribute("div", "id", "header")
			.expect("Query failed.")
			.pop()
			.expect("Div not found.");

		indexer.remove_with_children(&div).expect("Removal failed.");

		// The div, its paragraph, and the paragraph's text all fall out.
		assert!(indexer.find_by_type("div").expect("Query failed.").is_empty());
		assert!(indexer.find_by_type("p").expect("Query failed.").is_empty());
		assert!(indexer.find_text("Hello World").expect("Query failed.").is_none());

		// Sweep invariant: everything still findable has a living parent.
		for ty in ["head", "title", "body", "text"] {
			for node in indexer.find_by_type(ty).expect("Query failed.") {
				assert!(node.parent().is_some(), "orphan {ty} survived the sweep");
			}
		}
	}

	#[test]
	fn t_remove_connect_children() {
		let mut indexer = parse("\
<html><body><span>a</span><div class=\"wrap\"><p>one</p><p>two</p></div><span>b</span></body></html>");

		let div = indexer.find_by_type("div").expect("Query failed.")
			.pop()
			.expect("Div not found.");
		indexer.remove_connect_children(&div).expect("Removal failed.");

		// The paragraphs belong to the body now, right where the div was.
		let body = indexer.find_by_type("body").expect("Query failed.")
			.pop()
			.expect("Body not found.");
		let kinds: Vec<String> = body.children.borrow()
			.iter()
			.map(|n| n.tag_type().to_owned())
			.collect();
		assert_eq!(kinds, ["span", "p", "p", "span"]);

		assert!(indexer.find_by_type("div").expect("Query failed.").is_empty());
		assert!(indexer.find_text("one").expect("Query failed.").is_some());
	}

	#[test]
	fn t_prune_empty() {
		let mut indexer = parse("\
<html><body><div class=\"ad\"><span><i></i></span></div><p>content</p><hr><style></style></body></html>");

		indexer.prune_empty().expect("Prune failed.");

		// The whole empty chain collapses, innermost outward.
		assert!(indexer.find_by_type("i").expect("Query failed.").is_empty());
		assert!(indexer.find_by_type("span").expect("Query failed.").is_empty());
		assert!(indexer.find_by_type("div").expect("Query failed.").is_empty());

		// Bodiless styles go too; self-closing and text nodes never do.
		assert!(indexer.find_by_type("style").expect("Query failed.").is_empty());
		assert_eq!(indexer.find_by_type("hr").expect("Query failed.").len(), 1);
		assert!(indexer.find_text("content").expect("Query failed.").is_some());

		// Idempotence: a second pass changes nothing.
		let before: Vec<(String, usize)> = indexer.index.iter()
			.map(|(k, v)| (k.to_string(), v.len()))
			.collect();
		indexer.prune_empty().expect("Prune failed.");
		let after: Vec<(String, usize)> = indexer.index.iter()
			.map(|(k, v)| (k.to_string(), v.len()))
			.collect();
		assert_eq!(before, after);
	}

	#[test]
	fn t_prune_keeps_full_style() {
		let mut indexer = parse("\
<html><head>
<style>p { color: red; }</style>
</head><body><p>x</p></body></html>");

		indexer.prune_empty().expect("Prune failed.");
		assert_eq!(indexer.find_by_type("style").expect("Query failed.").len(), 1);
	}

	#[test]
	fn t_remove_by_type_and_children() {
		let mut indexer = parse("\
<html><body><div id=\"ad\"><p>buy stuff</p></div><div id=\"real\"><p>news</p></div></body></html>");

		indexer.remove_by_type_and_children("div", "id", "ad").expect("Removal failed.");

		assert_eq!(indexer.find_by_type("div").expect("Query failed.").len(), 1);
		assert!(indexer.find_text("buy stuff").expect("Query failed.").is_none());
		assert!(indexer.find_text("news").expect("Query failed.").is_some());
	}

	#[test]
	fn t_remove_type_variants() {
		// Whole-type removal, children and all.
		let mut indexer = parse("\
<html><body><iframe src=\"ads\"><p>junk</p></iframe><p>real</p></body></html>");
		indexer.remove_type("iframe").expect("Removal failed.");
		assert!(indexer.find_by_type("iframe").expect("Query failed.").is_empty());
		assert!(indexer.find_text("junk").expect("Query failed.").is_none());
		assert!(indexer.find_text("real").expect("Query failed.").is_some());

		// Whole-type removal, children reattached.
		let mut indexer = parse("\
<html><body><center><p>words</p></center></body></html>");
		indexer.remove_type_connect_children("center").expect("Removal failed.");
		assert!(indexer.find_by_type("center").expect("Query failed.").is_empty());
		assert_eq!(
			indexer.find_by_type("p").expect("Query failed.")[0]
				.parent().expect("Parent missing.")
				.tag_type(),
			"body",
		);

		// Text removal takes the emptied paragraph down with it.
		let mut indexer = parse("\
<html><body><p>Advertisement</p><p>story</p></body></html>");
		indexer.remove_text("Advertisement").expect("Removal failed.");
		assert!(indexer.find_text("Advertisement").expect("Query failed.").is_none());
		assert_eq!(indexer.find_by_type("p").expect("Query failed.").len(), 1);
		assert!(indexer.find_text("story").expect("Query failed.").is_some());
	}

	#[test]
	fn t_remove_nth_child() {
		let mut indexer = parse("\
<html><body><ul id=\"menu\"><li>one</li><li>two</li><li>three</li></ul></body></html>");

		// Wrong type at that index: no-op.
		indexer.remove_nth_child_of_match(1, "p", "ul", "id", "menu", false)
			.expect("Removal failed.");
		assert_eq!(indexer.find_by_type("li").expect("Query failed.").len(), 3);

		// Right type: the middle item goes.
		indexer.remove_nth_child_of_match(1, "li", "ul", "id", "menu", false)
			.expect("Removal failed.");
		assert_eq!(indexer.find_by_type("li").expect("Query failed.").len(), 2);
		assert!(indexer.find_text("two").expect("Query failed.").is_none());
		assert!(indexer.find_text("three").expect("Query failed.").is_some());
	}

	#[test]
	fn t_insert_and_absorb() {
		let mut indexer = parse("\
<html><body><a href=\"1\">A</a><a href=\"2\">B</a><a href=\"3\">C</a><a href=\"4\">D</a></body></html>");

		let body = indexer.find_by_type("body").expect("Query failed.")
			.pop()
			.expect("Body not found.");
		assert_eq!(body.children.borrow().len(), 4);

		let new = Node::element("section", Vec::new());
		indexer.insert_and_absorb(&new, 1, 2, &body).expect("Insert failed.");

		// Parent: [A, X, D]; X: [B, C].
		{
			let kids = body.children.borrow();
			assert_eq!(kids.len(), 3);
			assert!(kids[0].has_attr("href", "1"));
			assert_eq!(kids[1].tag_type(), "section");
			assert!(kids[2].has_attr("href", "4"));

			let absorbed = kids[1].children.borrow();
			assert_eq!(absorbed.len(), 2);
			assert!(absorbed[0].has_attr("href", "2"));
			assert!(absorbed[1].has_attr("href", "3"));
			assert!(absorbed[0].parent().is_some_and(|p| Rc::ptr_eq(&p, &kids[1])));
		}

		// It's in the index too.
		assert_eq!(indexer.find_by_type("section").expect("Query failed.").len(), 1);

		// Out-of-range inserts are no-ops.
		let stray = Node::element("nav", Vec::new());
		indexer.insert_and_absorb(&stray, 9, 0, &body).expect("Insert failed.");
		assert_eq!(body.children.borrow().len(), 3);
		assert!(indexer.find_by_type("nav").expect("Query failed.").is_empty());
	}

	#[test]
	fn t_unmatched_close() {
		// A closing tag with no opener is ignored; structure survives.
		let indexer = parse("<html><body></section><p>ok</p></body></html>");
		assert!(indexer.find_text("ok").expect("Query failed.").is_some());
		assert_eq!(
			indexer.find_by_type("p").expect("Query failed.")[0]
				.parent().expect("Parent missing.")
				.tag_type(),
			"body",
		);
	}

	#[test]
	fn t_reindex_resets() {
		let mut indexer = parse(HTML);
		assert!(indexer.find_by_type("div").expect("Query failed.").len() == 1);

		indexer.index("<html><body><em>fresh</em></body></html>".as_bytes())
			.expect("Indexing failed.");

		// The old document is gone, the new one queryable.
		assert!(indexer.find_by_type("div").expect("Query failed.").is_empty());
		assert_eq!(indexer.find_by_type("em").expect("Query failed.").len(), 1);
		assert!(indexer.doctype().is_none());
	}
}
