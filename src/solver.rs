// Cheapest-bundle solver
// Partitions a multiset of rooms into priced bundles, minimising the total hire fee.
use crate::pricing::{PeriodPricing, PricedBundle};
use crate::types::FeeTotal;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const NO_ROOMS_EXPLANATION: &str = "No rooms selected";
const INDIVIDUAL_PRICES_PREFIX: &str = "Summed individual room prices: ";
const FRAGMENT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleQuote {
    pub fees: FeeTotal,
    pub explanation: String,
}

impl BundleQuote {
    pub fn no_rooms() -> Self {
        Self {
            fees: FeeTotal::zero(),
            explanation: NO_ROOMS_EXPLANATION.to_string(),
        }
    }
}

// Exhaustive search, no memoisation. Ties keep the bundle that comes first in
// pricing order. Rooms are priced one by one only when no bundle fits.
pub fn find_cheapest_bundle<S: AsRef<str>>(rooms: &[S], pricing: &PeriodPricing) -> BundleQuote {
    let rooms: Vec<&str> = rooms.iter().map(AsRef::as_ref).collect();
    solve(&rooms, pricing)
}

fn solve(rooms: &[&str], pricing: &PeriodPricing) -> BundleQuote {
    if rooms.is_empty() {
        return BundleQuote::no_rooms();
    }

    let mut best: Option<BundleQuote> = None;
    for bundle in pricing.bundles() {
        let Some(remaining) = take_bundle(rooms, bundle) else {
            continue;
        };

        let rest = solve(&remaining, pricing);
        let candidate = BundleQuote {
            fees: bundle.fees + rest.fees,
            explanation: format!(
                "Pricing used -> {} for {} + remaining {}",
                bundle.key(),
                bundle.fees.hire_fee,
                rest.explanation
            ),
        };
        trace!(
            bundle = %bundle.key(),
            hire_fee = candidate.fees.hire_fee,
            "Bundle candidate"
        );

        let improves = best
            .as_ref()
            .map_or(true, |current| candidate.fees.hire_fee < current.fees.hire_fee);
        if improves {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| sum_individual_prices(rooms, pricing))
}

// Removes one instance of each bundle room from the selection. None when the
// selection lacks any of them, so "A,A" needs two A's to match.
fn take_bundle<'a>(rooms: &[&'a str], bundle: &PricedBundle) -> Option<Vec<&'a str>> {
    let mut remaining = rooms.to_vec();
    for room in bundle.rooms() {
        let position = remaining.iter().position(|r| r == room)?;
        remaining.remove(position);
    }
    Some(remaining)
}

fn sum_individual_prices(rooms: &[&str], pricing: &PeriodPricing) -> BundleQuote {
    let mut fees = FeeTotal::zero();
    let mut fragments = Vec::with_capacity(rooms.len());

    for room in rooms {
        let room_fees = pricing.single_room(room).copied().unwrap_or_default();
        fragments.push(format!("{} ({})", room, room_fees.hire_fee));
        fees += room_fees;
    }

    BundleQuote {
        fees,
        explanation: format!(
            "{}{}",
            INDIVIDUAL_PRICES_PREFIX,
            fragments.join(FRAGMENT_SEPARATOR)
        ),
    }
}
