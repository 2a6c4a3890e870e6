/// Current UTC timestamp in milliseconds.
///
/// All entity timestamps (`creation_date`, `update_date`, `last_access`)
/// are stored in this format.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
