// Analytics engine — the computational core.
//
// Data flows one direction: normalized snapshots go through window
// selection and trajectory aggregation into the gain engine, and the
// query facade composes the results per request. Every computation is
// synchronous and operates on an independently filtered copy of the
// dataset; degenerate inputs resolve to defined zero values, never errors.

pub mod gain;
pub mod query;
pub mod temporal;
pub mod trajectory;
pub mod window;
