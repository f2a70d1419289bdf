/*!
# HTSweep: DOM Node.

This module holds the node model: the reference-counted tree node, its
kind-specific payloads, and the low-level attach/detach plumbing the rest of
the indexer builds on.
*/

use std::{
	cell::RefCell,
	rc::{
		Rc,
		Weak,
	},
};
use tendril::StrTendril;



/// # Reference-Counted Node.
///
/// Nodes are self-referential, so generally need to be wrapped in `Rc`.
pub(crate) type Handle = Rc<Node>;



#[derive(Debug, Clone)]
/// # Tag Attribute.
///
/// Names are stored lower-cased and match case-insensitively; values match
/// case-sensitively. Order of appearance is preserved for serialization.
pub(crate) struct Attribute {
	/// # Attribute Name (lower case).
	pub(crate) name: Box<str>,

	/// # Attribute Value.
	pub(crate) value: Box<str>,
}

impl Attribute {
	#[must_use]
	/// # New.
	pub(crate) fn new(name: &str, value: &str) -> Self {
		Self {
			name: name.to_ascii_lowercase().into_boxed_str(),
			value: Box::from(value),
		}
	}

	#[must_use]
	/// # Matches Name/Value?
	pub(crate) fn is_match(&self, name: &str, value: &str) -> bool {
		self.name.eq_ignore_ascii_case(name) && *self.value == *value
	}
}



#[derive(Debug)]
/// # DOM Node.
///
/// This struct pairs the kind-specific payload with the structural wiring:
/// an owned child list and a non-owning back-reference to the parent. The
/// weak parent edge keeps the child→parent→child loop from ever becoming a
/// reference cycle.
pub(crate) struct Node {
	/// # Node Kind/Data.
	pub(crate) inner: NodeInner,

	/// # Parent Node (non-owning).
	pub(crate) parent: RefCell<Weak<Node>>,

	/// # Child Node(s).
	pub(crate) children: RefCell<Vec<Handle>>,
}

#[derive(Debug)]
/// # Node Kind/Data.
pub(crate) enum NodeInner {
	/// # HTML Element.
	Element {
		/// # Tag Type (lower case).
		name: Box<str>,

		/// # Tag Attributes.
		attrs: Vec<Attribute>,
	},

	/// # Self-Closing Element.
	///
	/// Closed within its own opening bracket — `<hr/>` — or forced shut
	/// because the tag type is a void element; never has children.
	SelfClosing {
		/// # Tag Type (lower case).
		name: Box<str>,

		/// # Tag Attributes.
		attrs: Vec<Attribute>,
	},

	/// # Text Run.
	Text {
		/// # Content.
		body: StrTendril,
	},

	/// # Doctype Declaration.
	///
	/// Parentless, childless, and always first in document order.
	Doctype {
		/// # Raw Declaration (between the brackets).
		raw: Box<str>,
	},

	/// # Style Element.
	///
	/// Like an element, but carrying a raw text body — the verbatim
	/// stylesheet, possibly gathered across many lines — instead of
	/// structured children.
	StyleBody {
		/// # Tag Attributes.
		attrs: Vec<Attribute>,

		/// # Captured Style Text.
		body: RefCell<StrTendril>,
	},
}

impl Node {
	#[must_use]
	/// # New Node.
	pub(crate) fn new(inner: NodeInner) -> Handle {
		Rc::new(Self {
			inner,
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
		})
	}

	#[must_use]
	/// # New Element.
	pub(crate) fn element(name: &str, attrs: Vec<Attribute>) -> Handle {
		Self::new(NodeInner::Element {
			name: name.to_ascii_lowercase().into_boxed_str(),
			attrs,
		})
	}

	#[must_use]
	/// # New Self-Closing Element.
	pub(crate) fn self_closing(name: &str, attrs: Vec<Attribute>) -> Handle {
		Self::new(NodeInner::SelfClosing {
			name: name.to_ascii_lowercase().into_boxed_str(),
			attrs,
		})
	}

	#[must_use]
	/// # New Text Run.
	pub(crate) fn text(body: &str) -> Handle {
		Self::new(NodeInner::Text { body: StrTendril::from(body) })
	}

	#[must_use]
	/// # New Doctype.
	pub(crate) fn doctype(raw: &str) -> Handle {
		Self::new(NodeInner::Doctype { raw: Box::from(raw) })
	}

	#[must_use]
	/// # New Style Element.
	pub(crate) fn style(attrs: Vec<Attribute>) -> Handle {
		Self::new(NodeInner::StyleBody {
			attrs,
			body: RefCell::new(StrTendril::new()),
		})
	}
}

impl Node {
	#[must_use]
	/// # Tag Type.
	///
	/// Text runs and doctypes index under the pseudo-types "text" and
	/// "doctype"; everything else under its (lower-cased) tag name.
	pub(crate) fn tag_type(&self) -> &str {
		match &self.inner {
			NodeInner::Element { name, .. } | NodeInner::SelfClosing { name, .. } => name,
			NodeInner::Text { .. } => "text",
			NodeInner::Doctype { .. } => "doctype",
			NodeInner::StyleBody { .. } => "style",
		}
	}

	#[must_use]
	/// # Attributes.
	pub(crate) fn attrs(&self) -> &[Attribute] {
		match &self.inner {
			NodeInner::Element { attrs, .. } |
			NodeInner::SelfClosing { attrs, .. } |
			NodeInner::StyleBody { attrs, .. } => attrs,
			_ => &[],
		}
	}

	#[must_use]
	/// # Has Matching Attribute?
	pub(crate) fn has_attr(&self, name: &str, value: &str) -> bool {
		self.attrs().iter().any(|a| a.is_match(name, value))
	}

	#[must_use]
	/// # Parent Node.
	///
	/// Upgrade and return the parent reference, if the parent is still
	/// alive.
	pub(crate) fn parent(&self) -> Option<Handle> { self.parent.borrow().upgrade() }

	#[must_use]
	/// # Is Self-Closing?
	pub(crate) const fn is_self_closing(&self) -> bool {
		matches!(self.inner, NodeInner::SelfClosing { .. })
	}

	/// # Append Style Text.
	///
	/// Push another chunk of stylesheet text onto a `StyleBody` node.
	/// (No-op for other kinds.)
	pub(crate) fn append_style(&self, txt: &str) {
		if let NodeInner::StyleBody { body, .. } = &self.inner {
			body.borrow_mut().push_slice(txt);
		}
	}
}

impl Node {
	/// # Adopt a Child.
	///
	/// Append `child` to `parent`'s child list and point its parent
	/// reference back at `parent`.
	pub(crate) fn adopt(parent: &Handle, child: &Handle) {
		parent.children.borrow_mut().push(Rc::clone(child));
		*child.parent.borrow_mut() = Rc::downgrade(parent);
	}

	/// # Detach (Keep Children).
	///
	/// Remove `node` from its parent's child list and sever the parent
	/// reference. The children stay attached to `node`, which is now the
	/// root of an orphaned subtree; the index sweep will collect it later.
	pub(crate) fn detach(node: &Handle) {
		if let Some(parent) = node.parent() {
			parent.children.borrow_mut().retain(|c| ! Rc::ptr_eq(c, node));
		}
		*node.parent.borrow_mut() = Weak::new();
	}

	/// # Detach (Splice Children Up).
	///
	/// Remove `node`, reparenting its children onto `node`'s former parent
	/// at the position `node` occupied, order preserved. Used to unwrap
	/// non-semantic wrapper tags without losing their contents.
	pub(crate) fn detach_splice(node: &Handle) {
		let kids: Vec<Handle> = node.children.borrow_mut().drain(..).collect();

		let target = node.parent().and_then(|parent| {
			let pos = parent.children.borrow().iter().position(|c| Rc::ptr_eq(c, node));
			pos.map(|pos| (parent, pos))
		});

		if let Some((parent, pos)) = target {
			for k in &kids { *k.parent.borrow_mut() = Rc::downgrade(&parent); }
			parent.children.borrow_mut().splice(pos..=pos, kids);
		}
		// No (live) parent; the children become orphans along with us.
		else {
			for k in &kids { *k.parent.borrow_mut() = Weak::new(); }
		}

		*node.parent.borrow_mut() = Weak::new();
	}
}
