//! Property listing model.

use serde::{Deserialize, Serialize};

use hearth_core::{ListingId, UserId};

/// One user's rating of a listing. At most one entry per user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingEntry {
    pub user: UserId,
    pub value: f64,
}

/// A property for sale or rent, owned by an agent.
///
/// `rating` is derived state: it must always equal the arithmetic mean of
/// `ratings` (0 when empty). Every mutation of `ratings` goes through
/// [`Listing::apply_rating`], which recomputes it before the document is
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub images: Vec<String>,
    pub owner: UserId,
    pub views: i64,
    pub favorites: Vec<UserId>,
    pub ratings: Vec<RatingEntry>,
    pub rating: f64,
}

impl Listing {
    /// Replace or append `user`'s rating entry, then recompute the mean.
    pub fn apply_rating(&mut self, user: UserId, value: f64) {
        match self.ratings.iter_mut().find(|r| r.user == user) {
            Some(entry) => entry.value = value,
            None => self.ratings.push(RatingEntry { user, value }),
        }
        self.rating = mean(&self.ratings);
    }

    /// Toggle `user`'s membership in the favorites set.
    ///
    /// Returns `true` if the listing is favorited after the call.
    pub fn toggle_favorite(&mut self, user: UserId) -> bool {
        if let Some(pos) = self.favorites.iter().position(|u| *u == user) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(user);
            true
        }
    }
}

/// Arithmetic mean of the rating values, 0 when there are none.
#[must_use]
pub fn mean(ratings: &[RatingEntry]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = ratings.len() as f64;
    ratings.iter().map(|r| r.value).sum::<f64>() / count
}

/// The slice of a listing inlined into appointment and client responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingSummary {
    pub id: ListingId,
    pub title: String,
    pub price: f64,
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price: listing.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(owner: UserId) -> Listing {
        Listing {
            id: ListingId::generate(),
            title: "Two-bed flat".into(),
            description: None,
            price: 250_000.0,
            location: None,
            images: vec!["https://img.example/1.png".into()],
            owner,
            views: 0,
            favorites: Vec::new(),
            ratings: Vec::new(),
            rating: 0.0,
        }
    }

    #[test]
    fn rating_is_mean_of_entries() {
        let mut l = listing(UserId::generate());
        let (a, b) = (UserId::generate(), UserId::generate());

        l.apply_rating(a, 4.0);
        l.apply_rating(b, 2.0);

        assert_eq!(l.ratings.len(), 2);
        assert!((l.rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn re_rating_replaces_the_existing_entry() {
        let mut l = listing(UserId::generate());
        let rater = UserId::generate();

        l.apply_rating(rater, 4.0);
        l.apply_rating(rater, 2.0);

        assert_eq!(l.ratings.len(), 1);
        assert!((l.rating - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_ratings_mean_zero() {
        assert!(mean(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn favorite_toggle_is_an_involution() {
        let mut l = listing(UserId::generate());
        let fan = UserId::generate();

        assert!(l.toggle_favorite(fan));
        assert!(l.favorites.contains(&fan));
        assert!(!l.toggle_favorite(fan));
        assert!(l.favorites.is_empty());
    }
}
