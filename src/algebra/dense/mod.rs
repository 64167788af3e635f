mod core;
mod gemv;
mod types;

pub use self::gemv::*;
pub use self::types::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "blas")] {
        mod blas;
        pub use self::blas::*;
    }
}
