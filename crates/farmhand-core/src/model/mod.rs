// ── Canonical domain model ──
//
// Validated, strongly-typed counterparts of the wire types in
// `farmhand-api`. Conversions from the wire layer are fallible;
// conversions back to it are not.

mod livestock;
mod report;

pub use livestock::{AnimalType, Diet, Livestock, ModelError, TagId};
pub use report::{ResourceTotals, VetRecord};
