#![allow(unused_imports, unused_macros)]
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, trace};
    } else {
        macro_rules! debug {
            ($($arg:tt)*) => {};
        }
        macro_rules! trace {
            ($($arg:tt)*) => {};
        }
        pub(crate) use {debug, trace};
    }
}
