//! Order-preserving listing filter.
//!
//! Every predicate is AND-ed; the source collection is only borrowed. The
//! rent range is checked for monthly searches only, since jeonse listings
//! carry no monthly rent.

mod budget;
mod state;

pub use budget::{AmountRange, BudgetBounds, BudgetInput};
pub use state::{FilterCommand, FilterState, SizeBucket};

use tracing::debug;

use super::domain::{DealType, Listing};

/// Filter with bounds parsed from `state.budget`.
pub fn filter_listings<'a, I>(listings: I, state: &FilterState) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    filter_with_bounds(listings, state, &state.budget.bounds())
}

/// Filter against pre-parsed bounds, ignoring `state.budget`.
pub fn filter_with_bounds<'a, I>(
    listings: I,
    state: &FilterState,
    bounds: &BudgetBounds,
) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let matched: Vec<&Listing> = listings
        .into_iter()
        .filter(|listing| matches(listing, state, bounds))
        .collect();

    debug!(
        matched = matched.len(),
        deal_type = state.deal_type.label(),
        "filtered listings"
    );
    matched
}

/// True when `listing` satisfies every active predicate.
pub fn matches(listing: &Listing, state: &FilterState, bounds: &BudgetBounds) -> bool {
    if !state.housing_types.contains(&listing.housing_type()) {
        return false;
    }
    if listing.deal_type() != state.deal_type {
        return false;
    }

    let price = listing.price();
    if !bounds.deposit.contains(price.deposit) {
        return false;
    }
    if state.deal_type == DealType::Monthly && !bounds.rent.contains(price.monthly) {
        return false;
    }

    state.size_bucket.contains(listing.size())
}
