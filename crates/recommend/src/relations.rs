//! Related-genre suggestions
//!
//! Purely advisory: the result is shown next to the resolved genres and never feeds a lookup.

use crate::genre::Genre;

/// Maximum number of related genres returned.
pub const MAX_RELATED: usize = 3;

fn neighbours(genre: Genre) -> &'static [Genre] {
    use Genre::*;

    match genre {
        Action => &[Thriller, Adventure, SciFi, War],
        Comedy => &[Romance, Family, Animation],
        Drama => &[Romance, Biography, Crime],
        Horror => &[Thriller, Mystery],
        Crime => &[Thriller, Mystery, Drama],
        Romance => &[Comedy, Drama, Musical],
        Thriller => &[Mystery, Crime, Action],
        Adventure => &[Action, Fantasy, Family],
        SciFi => &[Action, Fantasy, Thriller],
        Fantasy => &[Adventure, Animation, SciFi],
        Mystery => &[Thriller, Crime, Horror],
        Animation => &[Family, Fantasy, Comedy],
        Family => &[Animation, Comedy, Adventure],
        War => &[Action, Drama, Biography],
        Biography => &[Documentary, Drama, Sport],
        Musical | Documentary | Western | Sport => &[],
    }
}

/// Up to [`MAX_RELATED`] genres adjacent to any input, excluding the inputs themselves.
///
/// Ordered by input position, then by table order; no duplicates.
pub fn related_genres(genres: &[Genre]) -> Vec<Genre> {
    let mut related = Vec::new();

    for genre in genres {
        for &candidate in neighbours(*genre) {
            if related.len() == MAX_RELATED {
                return related;
            }
            if !genres.contains(&candidate) && !related.contains(&candidate) {
                related.push(candidate);
            }
        }
    }

    related
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_neighbours_are_bounded_subset() {
        let related = related_genres(&[Genre::Action]);
        let allowed = [Genre::Thriller, Genre::Adventure, Genre::SciFi, Genre::War];

        assert!(related.len() <= MAX_RELATED);
        assert!(!related.contains(&Genre::Action));
        assert!(related.iter().all(|g| allowed.contains(g)));
        assert_eq!(related, vec![Genre::Thriller, Genre::Adventure, Genre::SciFi]);
    }

    #[test]
    fn inputs_are_excluded_and_duplicates_removed() {
        let related = related_genres(&[Genre::Thriller, Genre::Crime]);
        assert_eq!(related, vec![Genre::Mystery, Genre::Action, Genre::Drama]);
    }

    #[test]
    fn genres_without_entries_have_no_neighbours() {
        assert!(related_genres(&[Genre::Western]).is_empty());
        assert!(related_genres(&[]).is_empty());
    }

    #[test]
    fn never_exceeds_limit() {
        let all: Vec<Genre> = Genre::all().take(5).collect();
        assert!(related_genres(&all).len() <= MAX_RELATED);
    }
}
