/// Tracked items are keyed by a random UUID assigned at creation.
pub type ItemId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Allocate a fresh item identity.
///
/// Independent of file name or modification time, so two uploads of the
/// same file in one batch still get distinct ids.
pub fn new_item_id() -> ItemId {
    uuid::Uuid::new_v4()
}
