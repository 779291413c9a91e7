// Hire fee calculation for one booking
// Picks the seasonal table, prices each period independently and sums the results.
use crate::pricing::{PricingIndex, SeasonalPricing};
use crate::season::Season;
use crate::selection::{GroupedSelection, Selection};
use crate::solver::{find_cheapest_bundle, BundleQuote};
use crate::types::{FeeTotal, TimeOfDay};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodQuote {
    pub time_of_day: TimeOfDay,
    // Sorted rooms that were priced
    pub rooms: Vec<String>,
    pub quote: BundleQuote,
}

impl PeriodQuote {
    pub fn explanation(&self) -> String {
        format!(
            "For {}, selected rooms {} resulted in: {}",
            self.time_of_day,
            self.rooms.join(", "),
            self.quote.explanation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeCalculation {
    pub season: Season,
    pub total: FeeTotal,
    pub periods: Vec<PeriodQuote>,
}

impl FeeCalculation {
    // One explanation line per period, DAY first
    pub fn explanations(&self) -> Vec<String> {
        self.periods.iter().map(PeriodQuote::explanation).collect()
    }

    pub fn explanation_text(&self) -> String {
        self.explanations().join("\n")
    }
}

// DAY then NIGHT, always both; an empty period prices to zero
pub fn price_grouped(grouped: &GroupedSelection, index: &PricingIndex) -> Vec<PeriodQuote> {
    TimeOfDay::ALL
        .iter()
        .map(|&time_of_day| {
            let mut rooms = grouped.rooms(time_of_day).to_vec();
            rooms.sort();
            let quote = find_cheapest_bundle(&rooms, index.period(time_of_day));
            debug!(
                %time_of_day,
                rooms = ?rooms,
                hire_fee = quote.fees.hire_fee,
                "Priced period"
            );
            PeriodQuote {
                time_of_day,
                rooms,
                quote,
            }
        })
        .collect()
}

// Selections must already be limited to one booking
pub fn calculate_fees(selections: &[Selection], pricing: &SeasonalPricing) -> FeeCalculation {
    let season = Season::for_selections(selections);
    let index = PricingIndex::build(pricing.table_for(season));
    let grouped = GroupedSelection::from_selections(selections);

    let periods = price_grouped(&grouped, &index);
    let total: FeeTotal = periods.iter().map(|period| period.quote.fees).sum();

    info!(
        %season,
        selections = selections.len(),
        hire_fee = total.hire_fee,
        bar_deposit = total.bar_deposit,
        "Calculated hire fees"
    );

    FeeCalculation {
        season,
        total,
        periods,
    }
}
