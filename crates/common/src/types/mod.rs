mod analysis;
mod metrics;
mod phase;
mod record;
mod rule;

pub use analysis::*;
pub use metrics::*;
pub use phase::*;
pub use record::*;
pub use rule::*;
