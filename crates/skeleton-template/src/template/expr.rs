//! Interpolation expressions
//!
//! Splits text into literal runs and `{{ ... }}` markers:
//!
//! - `{{ path }}` resolves `path` against the record
//! - `{{ path | f | g }}` pipes the value through filters left to right
//! - `{{# path }}` resolves `path` against the current loop item

use crate::error::{Result, TemplateError};
use crate::value::THIS;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const LOOP_MARK: char = '#';

/// Left-hand side of an interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
	/// The whole context (`this`)
	This,
	/// Dot-separated field chain
	Fields(Vec<String>),
}

/// A parsed `{{ ... }}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
	/// Path text as written, used in error messages
	pub source: String,
	/// Resolved field chain
	pub path: Path,
	/// Filter names in application order
	pub filters: Vec<String>,
}

impl Expr {
	/// Parses the inside of an interpolation marker.
	pub fn parse(inner: &str) -> Result<Self> {
		let mut parts = inner.split('|').map(str::trim);
		let source = parts.next().unwrap_or_default();
		if source.is_empty() {
			return Err(TemplateError::Syntax(format!(
				"empty expression in \"{{{{{}}}}}\"",
				inner
			)));
		}
		let filters: Vec<String> = parts.map(String::from).collect();
		if filters.iter().any(String::is_empty) {
			return Err(TemplateError::Syntax(format!(
				"empty filter name in \"{}\"",
				inner.trim()
			)));
		}
		let path = if source == THIS {
			Path::This
		} else {
			let fields: Vec<String> = source.split('.').map(|s| s.trim().to_string()).collect();
			if fields.iter().any(String::is_empty) {
				return Err(TemplateError::Syntax(format!("malformed path \"{}\"", source)));
			}
			Path::Fields(fields)
		};
		Ok(Self {
			source: source.to_string(),
			path,
			filters,
		})
	}
}

/// A run of template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Literal text
	Literal(String),
	/// `{{ expr }}`, resolved against the record
	Interp(Expr),
	/// `{{# expr }}`, resolved against the loop item
	LoopInterp(Expr),
}

impl Segment {
	/// Returns `true` for interpolation segments.
	pub fn is_dynamic(&self) -> bool {
		!matches!(self, Self::Literal(_))
	}
}

/// Splits `text` into literal and interpolation segments.
pub fn parse_segments(text: &str) -> Result<Vec<Segment>> {
	let mut segments = Vec::new();
	let mut rest = text;
	while let Some(start) = rest.find(OPEN) {
		if start > 0 {
			segments.push(Segment::Literal(rest[..start].to_string()));
		}
		let body = &rest[start + OPEN.len()..];
		let end = body.find(CLOSE).ok_or_else(|| {
			TemplateError::Syntax(format!("unterminated \"{}\" in \"{}\"", OPEN, text.trim()))
		})?;
		let inner = body[..end].trim();
		segments.push(match inner.strip_prefix(LOOP_MARK) {
			Some(loop_inner) => Segment::LoopInterp(Expr::parse(loop_inner)?),
			None => Segment::Interp(Expr::parse(inner)?),
		});
		rest = &body[end + CLOSE.len()..];
	}
	if !rest.is_empty() {
		segments.push(Segment::Literal(rest.to_string()));
	}
	Ok(segments)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn fields(path: &str) -> Path {
		Path::Fields(path.split('.').map(String::from).collect())
	}

	#[rstest]
	fn test_plain_text() {
		assert_eq!(
			parse_segments("hello").unwrap(),
			vec![Segment::Literal("hello".to_string())]
		);
		assert!(parse_segments("").unwrap().is_empty());
	}

	#[rstest]
	fn test_interpolation_with_filters() {
		let segments = parse_segments("Hi {{ user.name | upper | currency }}!").unwrap();
		assert_eq!(segments.len(), 3);
		assert_eq!(
			segments[1],
			Segment::Interp(Expr {
				source: "user.name".to_string(),
				path: fields("user.name"),
				filters: vec!["upper".to_string(), "currency".to_string()],
			})
		);
		assert_eq!(segments[2], Segment::Literal("!".to_string()));
	}

	#[rstest]
	fn test_loop_interpolation() {
		let segments = parse_segments("{{# this }}{{#item.label}}").unwrap();
		assert_eq!(
			segments,
			vec![
				Segment::LoopInterp(Expr {
					source: "this".to_string(),
					path: Path::This,
					filters: vec![],
				}),
				Segment::LoopInterp(Expr {
					source: "item.label".to_string(),
					path: fields("item.label"),
					filters: vec![],
				}),
			]
		);
	}

	#[rstest]
	#[case("{{ name")]
	#[case("{{ }}")]
	#[case("{{ name | }}")]
	#[case("{{ a..b }}")]
	fn test_syntax_errors(#[case] text: &str) {
		assert!(matches!(parse_segments(text), Err(TemplateError::Syntax(_))));
	}
}
