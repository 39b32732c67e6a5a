mod desc;
mod render;

pub use desc::{build_fq_name, Desc, Sample, ValueType};
pub use render::{format_value, render, CONTENT_TYPE};
