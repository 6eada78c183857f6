mod metric;
pub use metric::{Metric, MetricOutput};

pub use cgmquantify_algos as algos;
pub use cgmquantify_codec as codec;
pub use cgmquantify_types as types;
