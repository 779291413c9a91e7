// Venue hire fee engine

// Pricing core
pub mod dates;
pub mod fees;
pub mod pricing;
pub mod season;
pub mod selection;
pub mod sheet;
pub mod solver;
pub mod types;

// Booking workflow around the pricing core
pub mod activity_log;
pub mod booking;
pub mod confirm;
pub mod deal_memo;

// Re-export key types for convenience
pub use activity_log::{LogEntry, Outcome};
pub use booking::{prepare_booking, BookingError, BookingIds, BookingRequest, FeeOverride, NewBooking};
pub use confirm::{plan_confirmation, ConfirmError, ConfirmedEvent, PencilHold};
pub use dates::{parse_event_date, DateError};
pub use deal_memo::{DealMemoNotifier, DealMemoPayload, NotifyError, WebhookConfig, WebhookNotifier};
pub use fees::{calculate_fees, FeeCalculation, PeriodQuote};
pub use pricing::{PeriodPricing, PricingError, PricingIndex, PricingTable, SeasonalPricing};
pub use season::Season;
pub use selection::{GroupedSelection, SelectedEvents, Selection, SelectionError};
pub use solver::{find_cheapest_bundle, BundleQuote};
pub use types::{FeeTotal, RoomSetKey, TimeOfDay};
