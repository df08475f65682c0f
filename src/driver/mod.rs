//! Browser automation driver
//!
//! [`Driver`] and [`ElementHandle`] are the only surfaces the step executor
//! uses. [`CdpDriver`] drives a real Chrome page over CDP; [`MockDriver`]
//! keeps an in-memory page for tests.

pub mod traits;
pub mod scripts;
pub mod cdp;
pub mod mock;

pub use traits::{Driver, ElementHandle};
pub use cdp::{CdpDriver, CdpElement};
pub use mock::{MockAction, MockDriver, MockElement, MockHandle};
