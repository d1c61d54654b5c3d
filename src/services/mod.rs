pub mod aggregator;
pub mod clock;
pub mod notification_center;
pub mod poller;
pub mod read_ledger;
pub mod store;

pub use aggregator::{derive_notifications, is_breakdown_visible, DerivationContext, FeedSnapshot, BREAKDOWN_LIMIT};
pub use clock::{Clock, FixedClock, SystemClock};
pub use notification_center::{CenterError, FeedStatus, NotificationCenter};
pub use poller::{Poller, POLL_INTERVAL_SECS};
pub use read_ledger::{LedgerWrite, ReadLedger, READ_NOTIFICATIONS_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
