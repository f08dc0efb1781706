// Immutable record store: the movie list, the featured pick, and category views.
// Categories are a data table of rules, not code branches.

use serde::{Deserialize, Serialize};

use crate::types::MovieId;

/// One catalog entry (film or series) with descriptive and presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: u32,
    /// Ordered tags; the first is the display genre.
    pub genre: Vec<String>,
    pub rating: f32,
    /// Free text. A runtime ("2h 35m") or an episodic marker ("60m per episode").
    /// The substring "episode" doubles as the series/film discriminator; the
    /// data carries no explicit type field, so the discriminator stays here.
    pub duration: String,
    pub description: String,
    pub poster: String,
    pub backdrop: String,
    pub director: String,
    pub cast: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Movie {
    /// Series are flagged by the episodic marker inside the duration text.
    pub fn is_series(&self) -> bool {
        self.duration.contains("episode")
    }

    pub fn has_genre(&self, tag: &str) -> bool {
        self.genre.iter().any(|g| g == tag)
    }
}

/// Rule selecting members of a category. Declarative so new categories are
/// additions to the table, not new code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRule {
    /// Every record, in store order.
    All,
    /// Records without the episodic marker.
    Films,
    /// Records with the episodic marker.
    Series,
    /// Records carrying at least one of the listed genre tags.
    AnyGenre(&'static [&'static str]),
}

impl CategoryRule {
    fn admits(&self, movie: &Movie) -> bool {
        match self {
            CategoryRule::All => true,
            CategoryRule::Films => !movie.is_series(),
            CategoryRule::Series => movie.is_series(),
            CategoryRule::AnyGenre(tags) => tags.iter().any(|tag| movie.has_genre(tag)),
        }
    }
}

/// Table entry: stable id, display name, selection rule, and member cap.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub id: &'static str,
    pub name: &'static str,
    pub rule: CategoryRule,
    pub cap: usize,
}

/// The shelf lineup of the landing page, top to bottom.
pub const CATEGORY_TABLE: &[CategorySpec] = &[
    CategorySpec {
        id: "trending",
        name: "Trending Now",
        rule: CategoryRule::All,
        cap: 6,
    },
    CategorySpec {
        id: "movies",
        name: "Latest Movies",
        rule: CategoryRule::Films,
        cap: 4,
    },
    CategorySpec {
        id: "series",
        name: "Popular Series",
        rule: CategoryRule::Series,
        cap: 4,
    },
    CategorySpec {
        id: "action",
        name: "Action & Adventure",
        rule: CategoryRule::AnyGenre(&["Action", "Adventure"]),
        cap: 4,
    },
    CategorySpec {
        id: "fantasy",
        name: "Fantasy & Sci-Fi",
        rule: CategoryRule::AnyGenre(&["Sci-Fi", "Fantasy", "Animation"]),
        cap: 4,
    },
];

/// A named, capped grouping of records derived from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    /// The first category renders larger; the rest use the default card size.
    pub variant: CategoryVariant,
    pub movies: Vec<MovieId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryVariant {
    Featured,
    Default,
}

/// The immutable record store. Built once at engine start, never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Movie>,
    categories: Vec<CategoryView>,
}

impl Catalog {
    /// Build a catalog from an arbitrary record list, deriving category views
    /// from the rule table.
    pub fn new(records: Vec<Movie>) -> Self {
        let categories = CATEGORY_TABLE
            .iter()
            .enumerate()
            .map(|(position, spec)| CategoryView {
                id: spec.id.to_string(),
                name: spec.name.to_string(),
                variant: if position == 0 {
                    CategoryVariant::Featured
                } else {
                    CategoryVariant::Default
                },
                movies: records
                    .iter()
                    .filter(|movie| spec.rule.admits(movie))
                    .take(spec.cap)
                    .map(|movie| movie.id)
                    .collect(),
            })
            .collect();

        Catalog {
            records,
            categories,
        }
    }

    /// The shipped six-record catalog.
    pub fn seeded() -> Self {
        Catalog::new(seed_records())
    }

    pub fn records(&self) -> &[Movie] {
        &self.records
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.records.iter().find(|movie| movie.id == id)
    }

    /// First record flagged featured, else the first record overall.
    pub fn featured(&self) -> Option<&Movie> {
        self.records
            .iter()
            .find(|movie| movie.featured)
            .or_else(|| self.records.first())
    }

    pub fn categories(&self) -> &[CategoryView] {
        &self.categories
    }
}

fn seed_records() -> Vec<Movie> {
    vec![
        Movie {
            id: MovieId::new(1),
            title: "Squid Game".into(),
            year: 2021,
            genre: vec!["Action".into(), "Drama".into(), "Mystery".into()],
            rating: 8.0,
            duration: "60m per episode".into(),
            description: "Hundreds of cash-strapped players accept a strange invitation to \
                          compete in children's games for a tempting prize, but the stakes are \
                          deadly. A mysterious organization lures desperate people into a \
                          survival game with a massive cash prize."
                .into(),
            poster: "https://ntvb.tmsimg.com/assets/p20492187_b_h8_aa.jpg?w=1280&h=720".into(),
            backdrop: "https://ntvb.tmsimg.com/assets/p20492187_b_h8_aa.jpg?w=1280&h=720".into(),
            director: "Hwang Dong-hyuk".into(),
            cast: vec![
                "Lee Jung-jae".into(),
                "Park Hae-soo".into(),
                "Wi Ha-joon".into(),
                "HoYeon Jung".into(),
            ],
            featured: true,
        },
        Movie {
            id: MovieId::new(2),
            title: "Dune".into(),
            year: 2021,
            genre: vec!["Sci-Fi".into(), "Adventure".into(), "Drama".into()],
            rating: 8.0,
            duration: "2h 35m".into(),
            description: "Paul Atreides, a brilliant and gifted young man born into a great \
                          destiny beyond his understanding, must travel to the most dangerous \
                          planet in the universe to ensure the future of his family and his \
                          people."
                .into(),
            poster: "https://assets-prd.ignimgs.com/2021/08/09/dune-button-2021-1628542173776.jpg"
                .into(),
            backdrop:
                "https://assets-prd.ignimgs.com/2021/08/09/dune-button-2021-1628542173776.jpg"
                    .into(),
            director: "Denis Villeneuve".into(),
            cast: vec![
                "Timothée Chalamet".into(),
                "Rebecca Ferguson".into(),
                "Oscar Isaac".into(),
                "Josh Brolin".into(),
            ],
            featured: false,
        },
        Movie {
            id: MovieId::new(3),
            title: "Spider-Man: Across the Spider-Verse".into(),
            year: 2023,
            genre: vec!["Animation".into(), "Action".into(), "Adventure".into()],
            rating: 8.7,
            duration: "2h 20m".into(),
            description: "Miles Morales catapults across the Multiverse, where he encounters a \
                          team of Spider-People charged with protecting its very existence."
                .into(),
            poster: "https://thriftyminnesota.com/wp-content/uploads/2023/05/Spider-Man-Across-The-Spider-Verse-Poster.jpeg"
                .into(),
            backdrop: "https://thriftyminnesota.com/wp-content/uploads/2023/05/Spider-Man-Across-The-Spider-Verse-Poster.jpeg"
                .into(),
            director: "Joaquim Dos Santos".into(),
            cast: vec![
                "Shameik Moore".into(),
                "Hailee Steinfeld".into(),
                "Brian Tyree Henry".into(),
                "Luna Lauren Vélez".into(),
            ],
            featured: false,
        },
        Movie {
            id: MovieId::new(4),
            title: "House of the Dragon".into(),
            year: 2024,
            genre: vec!["Fantasy".into(), "Drama".into(), "Action".into()],
            rating: 8.5,
            duration: "60m per episode".into(),
            description: "An internal succession war within House Targaryen at the height of \
                          its power, 172 years before the birth of Daenerys Targaryen."
                .into(),
            poster: "https://static1.colliderimages.com/wordpress/wp-content/uploads/2022/06/house-of-the-dragon-poster.jpg"
                .into(),
            backdrop: "https://static1.colliderimages.com/wordpress/wp-content/uploads/2022/06/house-of-the-dragon-poster.jpg"
                .into(),
            director: "Ryan Condal".into(),
            cast: vec![
                "Paddy Considine".into(),
                "Matt Smith".into(),
                "Rhys Ifans".into(),
                "Emma D'Arcy".into(),
            ],
            featured: false,
        },
        Movie {
            id: MovieId::new(5),
            title: "Wednesday".into(),
            year: 2022,
            genre: vec!["Comedy".into(), "Horror".into(), "Mystery".into()],
            rating: 8.1,
            duration: "50m per episode".into(),
            description: "Follows Wednesday Addams' years as a student at Nevermore Academy, \
                          where she attempts to master her emerging psychic ability, thwart a \
                          monstrous killing spree that has terrorized the local town, and solve \
                          the murder mystery that embroiled her parents."
                .into(),
            poster: "https://lakewoodsnn.com/wp-content/uploads/2023/02/wednesday-720x900.jpg"
                .into(),
            backdrop: "https://lakewoodsnn.com/wp-content/uploads/2023/02/wednesday-720x900.jpg"
                .into(),
            director: "Tim Burton".into(),
            cast: vec![
                "Jenna Ortega".into(),
                "Hunter Doohan".into(),
                "Percy Hynes White".into(),
                "Emma Myers".into(),
            ],
            featured: false,
        },
        Movie {
            id: MovieId::new(6),
            title: "Black Panther: Wakanda Forever".into(),
            year: 2022,
            genre: vec!["Action".into(), "Adventure".into(), "Drama".into()],
            rating: 6.7,
            duration: "2h 41m".into(),
            description: "The people of Wakanda fight to protect their home from intervening \
                          world powers as they mourn the death of King T'Challa."
                .into(),
            poster: "https://image.tmdb.org/t/p/original/qT1JPO6IltC2B39QAriAg7SelMx.jpg".into(),
            backdrop: "https://image.tmdb.org/t/p/original/qT1JPO6IltC2B39QAriAg7SelMx.jpg".into(),
            director: "Ryan Coogler".into(),
            cast: vec![
                "Letitia Wright".into(),
                "Lupita Nyong'o".into(),
                "Danai Gurira".into(),
                "Winston Duke".into(),
            ],
            featured: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_six_records() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.records().len(), 6);
    }

    #[test]
    fn featured_is_flagged_record() {
        let catalog = Catalog::seeded();
        let featured = catalog.featured().unwrap();
        assert_eq!(featured.title, "Squid Game");
        assert!(featured.featured);
    }

    #[test]
    fn featured_falls_back_to_first() {
        let mut records = Catalog::seeded().records().to_vec();
        for movie in &mut records {
            movie.featured = false;
        }
        let catalog = Catalog::new(records);
        assert_eq!(catalog.featured().unwrap().title, "Squid Game");
    }

    #[test]
    fn empty_catalog_has_no_featured() {
        let catalog = Catalog::new(vec![]);
        assert!(catalog.featured().is_none());
    }

    #[test]
    fn series_split_uses_episode_marker() {
        let catalog = Catalog::seeded();
        let series: Vec<_> = catalog.records().iter().filter(|m| m.is_series()).collect();
        let films: Vec<_> = catalog
            .records()
            .iter()
            .filter(|m| !m.is_series())
            .collect();
        assert_eq!(series.len(), 3);
        assert_eq!(films.len(), 3);
        assert!(series.iter().all(|m| m.duration.contains("episode")));
    }

    #[test]
    fn category_views_respect_caps_and_order() {
        let catalog = Catalog::seeded();
        let categories = catalog.categories();
        assert_eq!(categories.len(), 5);

        let trending = &categories[0];
        assert_eq!(trending.id, "trending");
        assert_eq!(trending.variant, CategoryVariant::Featured);
        assert_eq!(trending.movies.len(), 6);

        for view in &categories[1..] {
            assert_eq!(view.variant, CategoryVariant::Default);
            assert!(view.movies.len() <= 4);
        }

        // Members keep store order.
        for view in categories {
            let positions: Vec<_> = view
                .movies
                .iter()
                .map(|id| {
                    catalog
                        .records()
                        .iter()
                        .position(|m| m.id == *id)
                        .unwrap()
                })
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn action_category_members_carry_tag() {
        let catalog = Catalog::seeded();
        let action = catalog
            .categories()
            .iter()
            .find(|view| view.id == "action")
            .unwrap();
        for id in &action.movies {
            let movie = catalog.get(*id).unwrap();
            assert!(movie.has_genre("Action") || movie.has_genre("Adventure"));
        }
    }

    #[test]
    fn get_unknown_id_is_none() {
        let catalog = Catalog::seeded();
        assert!(catalog.get(MovieId::new(99)).is_none());
    }
}
