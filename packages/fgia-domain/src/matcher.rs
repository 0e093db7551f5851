use crate::knowledge::{KnowledgeBase, KnowledgeEntry};

/// Added to the keyword ratio so a single hit still scores above zero.
pub const CONFIDENCE_OFFSET: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
	pub entry: &'a KnowledgeEntry,
	pub confidence: f64,
}

/// First-hit scan: entries in declaration order, keywords in declaration order, stop at the
/// first keyword that occurs in the lower-cased query. Later entries are never compared.
pub fn find_match<'a>(base: &'a KnowledgeBase, query: &str) -> Option<MatchResult<'a>> {
	let lowered = query.to_lowercase();
	let entry = base
		.entries()
		.iter()
		.find(|entry| entry.keywords.iter().any(|keyword| lowered.contains(&keyword.to_lowercase())))?;

	Some(MatchResult { entry, confidence: confidence(&lowered, entry.keywords) })
}

/// `min(matched / total + 0.2, 1.0)` where a keyword counts as matched when some whitespace
/// token of the query contains it or is contained in it.
pub fn confidence(query: &str, keywords: &[&str]) -> f64 {
	if keywords.is_empty() {
		return 0.0;
	}

	let lowered = query.to_lowercase();
	let tokens: Vec<&str> = lowered.split_whitespace().collect();
	let matched = keywords
		.iter()
		.map(|keyword| keyword.to_lowercase())
		.filter(|keyword| {
			tokens.iter().any(|token| token.contains(keyword.as_str()) || keyword.contains(token))
		})
		.count();

	(matched as f64 / keywords.len() as f64 + CONFIDENCE_OFFSET).min(1.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_query_scores_only_the_offset_when_nothing_overlaps() {
		assert_eq!(confidence("   ", &["estoque"]), CONFIDENCE_OFFSET);
	}

	#[test]
	fn keyword_containing_token_counts_as_overlap() {
		// "não" is a substring of the multi-word keyword.
		let score = confidence("não", &["não aparece", "sumiu"]);

		assert!((score - 0.7).abs() < 1e-9, "score = {score}");
	}

	#[test]
	fn empty_keyword_list_scores_zero() {
		assert_eq!(confidence("produto", &[]), 0.0);
	}
}
