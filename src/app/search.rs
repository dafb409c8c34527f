use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::graph::GraphModel;

pub(in crate::app) const MAX_RESULTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct SearchHit {
    pub(in crate::app) id: String,
    pub(in crate::app) aliases: Vec<String>,
    pub(in crate::app) score: i64,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Best score over a node's id and aliases; ranked descending, ties keep
/// document order.
pub(in crate::app) fn rank_nodes(model: &GraphModel, query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = model
        .nodes
        .iter()
        .filter_map(|node| {
            std::iter::once(node.id.as_str())
                .chain(node.aliases.iter().map(String::as_str))
                .filter_map(|key| fuzzy_match_score(&matcher, key, query))
                .max()
                .map(|score| SearchHit {
                    id: node.id.clone(),
                    aliases: node.aliases.clone(),
                    score,
                })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_RESULTS);
    hits
}

/// Search box state: query, ranked candidates, and a keyboard cursor in
/// `-1..results.len()` where -1 means "no explicit choice".
#[derive(Debug)]
pub(in crate::app) struct SearchState {
    pub(in crate::app) query: String,
    results: Vec<SearchHit>,
    cursor: isize,
    open: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            cursor: -1,
            open: false,
        }
    }
}

impl SearchState {
    pub(in crate::app) fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub(in crate::app) fn cursor(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    pub(in crate::app) fn is_open(&self) -> bool {
        self.open && !self.query.trim().is_empty()
    }

    /// Re-ranks after the query text changed.
    pub(in crate::app) fn refresh(&mut self, model: &GraphModel) {
        self.results = rank_nodes(model, &self.query);
        self.cursor = -1;
        self.open = true;
    }

    pub(in crate::app) fn reopen(&mut self) {
        if !self.query.trim().is_empty() {
            self.open = true;
        }
    }

    pub(in crate::app) fn move_next(&mut self) {
        if self.results.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1).min(self.results.len() as isize - 1);
    }

    pub(in crate::app) fn move_previous(&mut self) {
        self.cursor = (self.cursor - 1).max(-1);
    }

    pub(in crate::app) fn hover(&mut self, index: usize) {
        if index < self.results.len() {
            self.cursor = index as isize;
        }
    }

    /// The cursor's candidate, or the top one when nothing is chosen.
    pub(in crate::app) fn confirm(&mut self) -> Option<String> {
        let index = self.cursor().unwrap_or(0);
        self.choose(index)
    }

    pub(in crate::app) fn choose(&mut self, index: usize) -> Option<String> {
        let id = self.results.get(index)?.id.clone();
        self.query = id.clone();
        self.open = false;
        Some(id)
    }

    pub(in crate::app) fn dismiss(&mut self) {
        self.open = false;
    }

    pub(in crate::app) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::graph::tests::model_from;

    fn calculus() -> GraphModel {
        model_from(
            r#"{"nodes": [
                {"id": "Limit", "aliases": ["lim"]},
                {"id": "Derivative", "aliases": ["differentiation", "slope"]},
                {"id": "Integral", "aliases": ["antiderivative"]},
                {"id": "Continuity"}
            ]}"#,
        )
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    #[test]
    fn empty_query_has_no_results() {
        assert!(rank_nodes(&calculus(), "   ").is_empty());
    }

    #[test]
    fn matches_on_aliases() {
        let hits = rank_nodes(&calculus(), "slope");
        assert_eq!(ids(&hits), vec!["Derivative"]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let hits = rank_nodes(&calculus(), "CONTIN");
        assert_eq!(ids(&hits), vec!["Continuity"]);
    }

    #[test]
    fn results_are_capped() {
        let nodes = (0..20)
            .map(|i| format!(r#"{{"id": "topic {i}"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let model = model_from(&format!(r#"{{"nodes": [{nodes}]}}"#));
        assert_eq!(rank_nodes(&model, "topic").len(), MAX_RESULTS);
    }

    #[test]
    fn cursor_is_clamped_to_result_range() {
        let model = calculus();
        let mut search = SearchState {
            query: "i".to_owned(),
            ..SearchState::default()
        };
        search.refresh(&model);
        let count = search.results().len();
        assert!(count >= 2);

        search.move_previous();
        assert_eq!(search.cursor(), None);
        for _ in 0..count + 3 {
            search.move_next();
        }
        assert_eq!(search.cursor(), Some(count - 1));
        for _ in 0..count + 3 {
            search.move_previous();
        }
        assert_eq!(search.cursor(), None);
    }

    #[test]
    fn confirm_without_cursor_takes_top_candidate() {
        let model = calculus();
        let mut search = SearchState {
            query: "deriv".to_owned(),
            ..SearchState::default()
        };
        search.refresh(&model);
        let top = search.results()[0].id.clone();

        assert_eq!(search.confirm(), Some(top.clone()));
        assert_eq!(search.query, top);
        assert!(!search.is_open());
    }

    #[test]
    fn confirm_uses_cursor_choice() {
        let model = calculus();
        let mut search = SearchState {
            query: "i".to_owned(),
            ..SearchState::default()
        };
        search.refresh(&model);
        search.move_next();
        search.move_next();
        let second = search.results()[1].id.clone();
        assert_eq!(search.confirm(), Some(second));
    }

    #[test]
    fn confirm_with_no_results_selects_nothing() {
        let model = calculus();
        let mut search = SearchState {
            query: "zzzz".to_owned(),
            ..SearchState::default()
        };
        search.refresh(&model);
        assert_eq!(search.confirm(), None);
    }

    #[test]
    fn dismiss_and_reopen() {
        let model = calculus();
        let mut search = SearchState {
            query: "lim".to_owned(),
            ..SearchState::default()
        };
        search.refresh(&model);
        assert!(search.is_open());
        search.dismiss();
        assert!(!search.is_open());
        search.reopen();
        assert!(search.is_open());
    }
}
