mod alias;
mod series;
mod timestamp;

pub use alias::{AliasFn, AliasTransform};
pub use series::{SampleValue, Series, Tags};
pub use timestamp::{parse_timestamp, to_datetime, Timestamp};

pub(crate) use series::format_tags;
