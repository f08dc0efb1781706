// Incremental catalog filtering. Linear scan over a small corpus, stable order,
// cheap enough to run on every keystroke.

use crate::catalog::Movie;

/// Case-insensitive substring filter over title, genre tags, director, and cast.
///
/// A trimmed-empty query yields the empty slice so callers can distinguish
/// "not searched yet" from "searched, zero hits". Results preserve corpus
/// order; no ranking is applied.
pub fn search<'a>(query: &str, corpus: &'a [Movie]) -> Vec<&'a Movie> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    corpus
        .iter()
        .filter(|movie| matches(movie, &needle))
        .collect()
}

/// True if any indexed field of the record contains the lowercased needle.
fn matches(movie: &Movie, needle: &str) -> bool {
    movie.title.to_lowercase().contains(needle)
        || movie.genre.iter().any(|g| g.to_lowercase().contains(needle))
        || movie.director.to_lowercase().contains(needle)
        || movie
            .cast
            .iter()
            .any(|actor| actor.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use proptest::prelude::*;

    fn corpus() -> Vec<Movie> {
        Catalog::seeded().records().to_vec()
    }

    #[test]
    fn empty_query_yields_empty() {
        let corpus = corpus();
        assert!(search("", &corpus).is_empty());
        assert!(search("   ", &corpus).is_empty());
        assert!(search("\t\n", &corpus).is_empty());
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let corpus = corpus();
        let hits = search("dune", &corpus);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");
    }

    #[test]
    fn genre_match() {
        let corpus = corpus();
        let hits = search("sci-fi", &corpus);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");
    }

    #[test]
    fn director_match() {
        let corpus = corpus();
        let hits = search("villeneuve", &corpus);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");
    }

    #[test]
    fn cast_match() {
        let corpus = corpus();
        let hits = search("jenna ortega", &corpus);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Wednesday");
    }

    #[test]
    fn no_hits_is_empty_not_error() {
        let corpus = corpus();
        assert!(search("zz", &corpus).is_empty());
    }

    #[test]
    fn broad_query_keeps_corpus_order() {
        let corpus = corpus();
        // "a" hits every record through some field; order must match the store.
        let hits = search("a", &corpus);
        let ids: Vec<_> = hits.iter().map(|m| m.id).collect();
        let expected: Vec<_> = corpus
            .iter()
            .filter(|m| ids.contains(&m.id))
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let corpus = corpus();
        let hits = search("  dune  ", &corpus);
        assert_eq!(hits.len(), 1);
    }

    proptest! {
        /// Every returned record satisfies the predicate on at least one field,
        /// and every omitted record fails all four.
        #[test]
        fn partition_is_exact(query in "[a-zA-Z ]{1,12}") {
            let corpus = corpus();
            let needle = query.trim().to_lowercase();
            let hits = search(&query, &corpus);

            if needle.is_empty() {
                prop_assert!(hits.is_empty());
            } else {
                for movie in &corpus {
                    let expected = matches(movie, &needle);
                    let included = hits.iter().any(|hit| hit.id == movie.id);
                    prop_assert_eq!(expected, included);
                }
            }
        }

        /// Output is a subsequence of the corpus in original order.
        #[test]
        fn output_is_stable_subsequence(query in "\\PC{0,12}") {
            let corpus = corpus();
            let hits = search(&query, &corpus);
            let positions: Vec<_> = hits
                .iter()
                .map(|hit| corpus.iter().position(|m| m.id == hit.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
