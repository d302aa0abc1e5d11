//! Route template parsing for `{name}` placeholders.

// self
use crate::_prelude::*;

/// One piece of a parsed route template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplatePart<'a> {
	/// Literal text copied into the resolved path as-is.
	Literal(&'a str),
	/// A `{name}` placeholder.
	Placeholder(&'a str),
}

/// Route template split into literal text and placeholders, in order of appearance.
///
/// An opening brace without a matching closing brace is kept as literal text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTemplate<'a> {
	source: &'a str,
	parts: Vec<TemplatePart<'a>>,
}
impl<'a> RouteTemplate<'a> {
	/// Parses `source` left-to-right.
	pub fn parse(source: &'a str) -> Self {
		let mut parts = Vec::new();
		let mut rest = source;

		while let Some(open) = rest.find('{') {
			let Some(close) = rest[open + 1..].find('}').map(|idx| open + 1 + idx) else {
				break;
			};

			if open > 0 {
				parts.push(TemplatePart::Literal(&rest[..open]));
			}

			parts.push(TemplatePart::Placeholder(&rest[open + 1..close]));
			rest = &rest[close + 1..];
		}

		if !rest.is_empty() {
			parts.push(TemplatePart::Literal(rest));
		}

		Self { source, parts }
	}

	/// Returns the raw template text.
	pub fn source(&self) -> &'a str {
		self.source
	}

	/// Returns the parsed parts.
	pub fn parts(&self) -> &[TemplatePart<'a>] {
		&self.parts
	}

	/// Iterates placeholder names in order of appearance (duplicates included).
	pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
		self.parts.iter().filter_map(|part| match part {
			TemplatePart::Placeholder(name) => Some(*name),
			TemplatePart::Literal(_) => None,
		})
	}

	/// Number of placeholder occurrences.
	pub fn placeholder_count(&self) -> usize {
		self.placeholders().count()
	}

	/// Substitutes the i-th placeholder with `values[i]`.
	///
	/// Values must already be encoded; the first unbound placeholder is reported as missing.
	pub fn render(&self, values: &[Option<String>]) -> Result<String> {
		let mut path = String::with_capacity(self.source.len());
		let mut index = 0;

		for part in &self.parts {
			match part {
				TemplatePart::Literal(text) => path.push_str(text),
				TemplatePart::Placeholder(name) => {
					let value = values.get(index).and_then(Option::as_deref).ok_or_else(|| {
						Error::MissingSegmentValue {
							template: self.source.to_owned(),
							placeholder: (*name).to_owned(),
						}
					})?;

					path.push_str(value);

					index += 1;
				},
			}
		}

		Ok(path)
	}
}
