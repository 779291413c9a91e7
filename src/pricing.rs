// Pricing table loading and the per-period pricing index
use crate::season::Season;
use crate::sheet::{cell_amount, cell_text};
use crate::types::{FeeTotal, RoomSetKey, TimeOfDay};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

// Column positions in the hire fee sheets. Columns 2-4 and 6 are reserved.
pub const TIMING_COLUMN: usize = 0;
pub const LOCATIONS_COLUMN: usize = 1;
pub const HIRE_FEE_COLUMN: usize = 5;
pub const BAR_DEPOSIT_COLUMN: usize = 7;
pub const DEPOSIT_RETURNED_ON_COLUMN: usize = 8;
pub const HALF_HIRE_FEE_RETURNED_ON_COLUMN: usize = 9;
pub const DISCOUNTED_HIRE_COLUMN: usize = 10;

// Sheet rows, header already removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingTable {
    pub rows: Vec<Vec<Value>>,
}

impl PricingTable {
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        Self { rows }
    }

    // Parse a sheet export (array of row arrays) and drop the header row
    pub fn from_json(json: &str) -> Result<Self, PricingError> {
        let mut rows: Vec<Vec<Value>> = serde_json::from_str(json)?;
        if !rows.is_empty() {
            rows.remove(0);
        }
        Ok(Self { rows })
    }
}

// Both seasonal tables; the booking's latest date decides which one applies
#[derive(Debug, Clone, Default)]
pub struct SeasonalPricing {
    pub summer: PricingTable,
    pub winter: PricingTable,
}

impl SeasonalPricing {
    pub fn table_for(&self, season: Season) -> &PricingTable {
        match season {
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingRow {
    pub time_of_day: TimeOfDay,
    pub key: RoomSetKey,
    pub fees: FeeTotal,
}

impl PricingRow {
    // None unless the row has a DAY/NIGHT label, rooms and a non-zero hire fee
    pub fn from_cells(cells: &[Value]) -> Option<Self> {
        let time_of_day =
            cell_text(cells.get(TIMING_COLUMN)).and_then(|label| TimeOfDay::parse(&label))?;
        let key = RoomSetKey::from_room_list(&cell_text(cells.get(LOCATIONS_COLUMN))?);
        if key.is_empty() {
            return None;
        }
        let hire_fee = cell_amount(cells.get(HIRE_FEE_COLUMN)).filter(|fee| *fee != 0.0)?;

        let amount = |column: usize| cell_amount(cells.get(column)).unwrap_or(0.0);
        Some(Self {
            time_of_day,
            key,
            fees: FeeTotal {
                hire_fee,
                bar_deposit: amount(BAR_DEPOSIT_COLUMN),
                deposit_returned_on: amount(DEPOSIT_RETURNED_ON_COLUMN),
                half_hire_fee_returned_on: amount(HALF_HIRE_FEE_RETURNED_ON_COLUMN),
                discounted_hire: amount(DISCOUNTED_HIRE_COLUMN),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedBundle {
    key: RoomSetKey,
    rooms: Vec<String>,
    pub fees: FeeTotal,
}

impl PricedBundle {
    fn new(key: RoomSetKey, fees: FeeTotal) -> Self {
        let rooms = key.rooms().map(str::to_string).collect();
        Self { key, rooms, fees }
    }

    pub fn key(&self) -> &RoomSetKey {
        &self.key
    }

    // Sorted room instances, duplicates included
    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }
}

// Kept in sheet row order; the solver's tie-break depends on it. A repeated
// key overwrites the fees but keeps the position of its first row.
#[derive(Debug, Clone, Default)]
pub struct PeriodPricing {
    bundles: Vec<PricedBundle>,
    positions: HashMap<RoomSetKey, usize>,
}

impl PeriodPricing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: RoomSetKey, fees: FeeTotal) {
        match self.positions.get(&key) {
            Some(&position) => self.bundles[position].fees = fees,
            None => {
                self.positions.insert(key.clone(), self.bundles.len());
                self.bundles.push(PricedBundle::new(key, fees));
            }
        }
    }

    pub fn get(&self, key: &RoomSetKey) -> Option<&FeeTotal> {
        self.positions
            .get(key)
            .map(|&position| &self.bundles[position].fees)
    }

    pub fn single_room(&self, room: &str) -> Option<&FeeTotal> {
        self.get(&RoomSetKey::from_rooms([room]))
    }

    pub fn bundles(&self) -> impl Iterator<Item = &PricedBundle> {
        self.bundles.iter()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl<K: Into<RoomSetKey>> FromIterator<(K, FeeTotal)> for PeriodPricing {
    fn from_iter<I: IntoIterator<Item = (K, FeeTotal)>>(iter: I) -> Self {
        let mut pricing = PeriodPricing::new();
        for (key, fees) in iter {
            pricing.insert(key.into(), fees);
        }
        pricing
    }
}

#[derive(Debug, Clone, Default)]
pub struct PricingIndex {
    day: PeriodPricing,
    night: PeriodPricing,
}

impl PricingIndex {
    pub fn build(table: &PricingTable) -> Self {
        let mut index = PricingIndex::default();
        let mut skipped = 0usize;

        for cells in &table.rows {
            match PricingRow::from_cells(cells) {
                Some(row) => index.period_mut(row.time_of_day).insert(row.key, row.fees),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Skipped pricing rows without timing, rooms or hire fee");
        }
        debug!(
            day_entries = index.day.len(),
            night_entries = index.night.len(),
            "Built pricing index"
        );
        index
    }

    pub fn period(&self, time_of_day: TimeOfDay) -> &PeriodPricing {
        match time_of_day {
            TimeOfDay::Day => &self.day,
            TimeOfDay::Night => &self.night,
        }
    }

    pub fn period_mut(&mut self, time_of_day: TimeOfDay) -> &mut PeriodPricing {
        match time_of_day {
            TimeOfDay::Day => &mut self.day,
            TimeOfDay::Night => &mut self.night,
        }
    }
}
