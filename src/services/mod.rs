//! Client-side service layer
//!
//! Period selection, the stores that cache backend data, the aggregation
//! engine that derives monthly metrics from them, and the dashboard that ties
//! these to a signed-in session.

pub mod aggregation;
pub mod dashboard;
pub mod period;
pub mod store;

pub use aggregation::{goal_progress, CategoryTotal, Forecast, GoalProgress, MonthlySummary};
pub use dashboard::{fetch_period, Dashboard, PeriodData};
pub use period::{parse_or_current, parse_period, PeriodSelector};
pub use store::{FetchTicket, GoalRegistry, RecurringRegistry, RegistryTicket, TransactionStore};
