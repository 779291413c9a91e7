// Shared value types for the hire fee engine
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// Delimiter used inside a canonical room-set key
pub const ROOM_KEY_DELIMITER: &str = ",";

// Pricing partition. Fees are never mixed across periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    // Fixed evaluation order for aggregation
    pub const ALL: [TimeOfDay; 2] = [TimeOfDay::Day, TimeOfDay::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "DAY",
            TimeOfDay::Night => "NIGHT",
        }
    }

    // Accepts the sheet labels "DAY" / "NIGHT" (case-insensitive, surrounding
    // whitespace ignored). Anything else, including header text, is None.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("DAY") {
            Some(TimeOfDay::Day)
        } else if label.eq_ignore_ascii_case("NIGHT") {
            Some(TimeOfDay::Night)
        } else {
            None
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeTotal {
    pub hire_fee: f64,
    pub bar_deposit: f64,
    pub deposit_returned_on: f64,
    pub half_hire_fee_returned_on: f64,
    pub discounted_hire: f64,
}

impl FeeTotal {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn with_hire_fee(hire_fee: f64) -> Self {
        Self {
            hire_fee,
            ..Self::default()
        }
    }
}

impl Add for FeeTotal {
    type Output = FeeTotal;

    fn add(self, rhs: FeeTotal) -> FeeTotal {
        FeeTotal {
            hire_fee: self.hire_fee + rhs.hire_fee,
            bar_deposit: self.bar_deposit + rhs.bar_deposit,
            deposit_returned_on: self.deposit_returned_on + rhs.deposit_returned_on,
            half_hire_fee_returned_on: self.half_hire_fee_returned_on
                + rhs.half_hire_fee_returned_on,
            discounted_hire: self.discounted_hire + rhs.discounted_hire,
        }
    }
}

impl AddAssign for FeeTotal {
    fn add_assign(&mut self, rhs: FeeTotal) {
        *self = *self + rhs;
    }
}

impl Sum for FeeTotal {
    fn sum<I: Iterator<Item = FeeTotal>>(iter: I) -> Self {
        iter.fold(FeeTotal::zero(), |acc, fees| acc + fees)
    }
}

// Sorted room names joined with ","; duplicates are kept
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomSetKey(String);

impl RoomSetKey {
    pub fn from_rooms<I, S>(rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rooms: Vec<String> = rooms
            .into_iter()
            .map(|room| room.as_ref().trim().to_string())
            .filter(|room| !room.is_empty())
            .collect();
        rooms.sort();
        RoomSetKey(rooms.join(ROOM_KEY_DELIMITER))
    }

    // Parse a sheet room list such as "WAREHOUSE, BRUT"
    pub fn from_room_list(list: &str) -> Self {
        Self::from_rooms(list.split(ROOM_KEY_DELIMITER))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(ROOM_KEY_DELIMITER)
            .filter(|room| !room.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomSetKey {
    fn from(list: &str) -> Self {
        RoomSetKey::from_room_list(list)
    }
}

impl fmt::Display for RoomSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("DAY", Some(TimeOfDay::Day); "upper day")]
    #[test_case("night", Some(TimeOfDay::Night); "lower night")]
    #[test_case(" NIGHT ", Some(TimeOfDay::Night); "padded")]
    #[test_case("Timing", None; "header label")]
    #[test_case("", None; "empty")]
    fn test_time_of_day_parse(label: &str, expected: Option<TimeOfDay>) {
        assert_eq!(TimeOfDay::parse(label), expected);
    }

    #[test]
    fn test_room_set_key_is_order_independent() {
        let a = RoomSetKey::from_rooms(["WAREHOUSE", "BRUT"]);
        let b = RoomSetKey::from_rooms(["BRUT", "WAREHOUSE"]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "BRUT,WAREHOUSE");
    }

    #[test]
    fn test_room_set_key_keeps_duplicates() {
        let double = RoomSetKey::from_rooms(["GALLERY", "GALLERY"]);
        let single = RoomSetKey::from_rooms(["GALLERY"]);
        assert_ne!(double, single);
        assert_eq!(double.rooms().collect::<Vec<_>>(), vec!["GALLERY", "GALLERY"]);
    }

    #[test]
    fn test_room_set_key_from_sheet_list() {
        let key = RoomSetKey::from_room_list("WAREHOUSE, BRUT, TERRACE");
        assert_eq!(key.as_str(), "BRUT,TERRACE,WAREHOUSE");
        assert!(RoomSetKey::from_room_list(" , ").is_empty());
    }

    #[test]
    fn test_fee_totals_add_field_by_field() {
        let a = FeeTotal {
            hire_fee: 500.0,
            bar_deposit: 100.0,
            deposit_returned_on: 1000.0,
            half_hire_fee_returned_on: 2000.0,
            discounted_hire: 450.0,
        };
        let b = FeeTotal::with_hire_fee(250.0);
        let total: FeeTotal = vec![a, b].into_iter().sum();

        assert_eq!(total.hire_fee, 750.0);
        assert_eq!(total.bar_deposit, 100.0);
        assert_eq!(total.deposit_returned_on, 1000.0);
        assert_eq!(total.half_hire_fee_returned_on, 2000.0);
        assert_eq!(total.discounted_hire, 450.0);
    }
}
