use ulid::Ulid;

/// Identifier for one pipeline run. Sorts by creation time.
pub fn new_run_id() -> String {
    Ulid::new().to_string()
}
