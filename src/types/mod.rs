pub mod admin;
pub mod breakdown;
pub mod lantern;
pub mod locale;
pub mod notification;
pub mod time;

pub use admin::*;
pub use breakdown::*;
pub use lantern::*;
pub use locale::*;
pub use notification::*;
pub use time::*;
