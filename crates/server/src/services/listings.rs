//! Listing service: CRUD, view counting, rating aggregation, favorites.

use serde::{Deserialize, Serialize};

use hearth_core::{ListingId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Listing;
use crate::store::DocumentStore;

/// How many listings the trending endpoint returns.
const TRENDING_LIMIT: usize = 10;

/// Fields accepted when creating a listing.
#[derive(Debug, Deserialize)]
pub struct CreateListing {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub location: Option<String>,
    pub images: Vec<String>,
}

/// Mutable fields of a listing. Anything else in an update request is
/// ignored: owner, views, favorites and ratings cannot be patched.
#[derive(Debug, Default, Deserialize)]
pub struct ListingPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// Result of a favorite toggle.
#[derive(Debug, Serialize)]
pub struct FavoriteToggle {
    pub is_favorite: bool,
    pub listing: Listing,
}

/// Listing service.
pub struct ListingService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ListingService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All listings, optionally filtered by owner.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn list(&self, owner: Option<UserId>) -> Result<Vec<Listing>> {
        Ok(self.store.listings(owner).await?)
    }

    /// Listings with the highest view counts.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn trending(&self) -> Result<Vec<Listing>> {
        Ok(self.store.trending_listings(TRENDING_LIMIT).await?)
    }

    /// Fetch a listing for the detail page, bumping its view counter.
    ///
    /// The increment is an observable side effect of the detail path only;
    /// list and trending reads do not count as views.
    ///
    /// # Errors
    ///
    /// `NotFound` if the listing does not exist.
    pub async fn get(&self, id: ListingId) -> Result<Listing> {
        self.store
            .increment_views(id)
            .await?
            .ok_or(AppError::NotFound("listing"))
    }

    /// Create a listing owned by the caller.
    ///
    /// # Errors
    ///
    /// `Validation` when the title is empty, the price is not a positive
    /// finite number, or no images were supplied.
    pub async fn create(&self, caller: CurrentUser, input: CreateListing) -> Result<Listing> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation(
                "title, price, and images are required".to_owned(),
            ));
        }
        if input.images.is_empty() {
            return Err(AppError::Validation(
                "title, price, and images are required".to_owned(),
            ));
        }
        if !input.price.is_finite() || input.price <= 0.0 {
            return Err(AppError::Validation("price must be positive".to_owned()));
        }

        let listing = Listing {
            id: ListingId::generate(),
            title: input.title.trim().to_owned(),
            description: input.description,
            price: input.price,
            location: input.location,
            images: input.images,
            owner: caller.id,
            views: 0,
            favorites: Vec::new(),
            ratings: Vec::new(),
            rating: 0.0,
        };

        Ok(self.store.insert_listing(listing).await?)
    }

    /// Apply an allow-listed patch. Owner or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` if the listing is missing, `Forbidden` for anyone other
    /// than the owner or an admin, `Validation` for a bad price or an empty
    /// image list.
    pub async fn update(
        &self,
        id: ListingId,
        caller: CurrentUser,
        patch: ListingPatch,
    ) -> Result<Listing> {
        let mut listing = self
            .store
            .listing(id)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        authorize_owner(&listing, caller)?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title cannot be empty".to_owned()));
            }
            listing.title = title.trim().to_owned();
        }
        if let Some(description) = patch.description {
            listing.description = Some(description);
        }
        if let Some(price) = patch.price {
            if !price.is_finite() || price <= 0.0 {
                return Err(AppError::Validation("price must be positive".to_owned()));
            }
            listing.price = price;
        }
        if let Some(location) = patch.location {
            listing.location = Some(location);
        }
        if let Some(images) = patch.images {
            if images.is_empty() {
                return Err(AppError::Validation(
                    "a listing needs at least one image".to_owned(),
                ));
            }
            listing.images = images;
        }

        self.store
            .replace_listing(listing)
            .await?
            .ok_or(AppError::NotFound("listing"))
    }

    /// Delete a listing. Owner or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::update`].
    pub async fn delete(&self, id: ListingId, caller: CurrentUser) -> Result<()> {
        let listing = self
            .store
            .listing(id)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        authorize_owner(&listing, caller)?;

        self.store.delete_listing(id).await?;
        Ok(())
    }

    /// Upsert the caller's rating. The stored mean is recomputed in the same
    /// atomic store step.
    ///
    /// # Errors
    ///
    /// `Validation` when the value is outside [0, 5], `NotFound` if the
    /// listing is missing.
    pub async fn set_rating(
        &self,
        id: ListingId,
        caller: CurrentUser,
        value: f64,
    ) -> Result<Listing> {
        if !value.is_finite() || !(0.0..=5.0).contains(&value) {
            return Err(AppError::Validation(
                "rating must be between 0 and 5".to_owned(),
            ));
        }

        self.store
            .upsert_rating(id, caller.id, value)
            .await?
            .ok_or(AppError::NotFound("listing"))
    }

    /// Toggle the caller's membership in the favorites set.
    ///
    /// # Errors
    ///
    /// `NotFound` if the listing is missing.
    pub async fn toggle_favorite(
        &self,
        id: ListingId,
        caller: CurrentUser,
    ) -> Result<FavoriteToggle> {
        let (is_favorite, listing) = self
            .store
            .toggle_favorite(id, caller.id)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        Ok(FavoriteToggle {
            is_favorite,
            listing,
        })
    }
}

fn authorize_owner(listing: &Listing, caller: CurrentUser) -> Result<()> {
    if listing.owner == caller.id || caller.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
