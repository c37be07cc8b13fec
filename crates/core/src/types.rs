/// Category primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Product primary keys are UUIDs so clients may choose them up front.
pub type ProductId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
