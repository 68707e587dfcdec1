/// Report layer: pure functions from a filtered dataset to a view model.
///
/// ```text
///   filtered Dataset ──aggregate──▶ Aggregation ──build_view──▶ ViewModel
/// ```

pub mod aggregate;
pub mod view;

pub use aggregate::{aggregate, Aggregation, AggregationRow};
pub use view::{build_view, ViewModel};
