pub use crate::data_structs::typedef::*;
pub use crate::data_structs::*;
pub use crate::error::{
    EnhstackError,
    FailureKind,
};
pub use crate::pipeline::*;
pub use crate::tools::assembly::assemble;
pub use crate::tools::metrics::*;
pub use crate::tools::stats::*;
