/// Port for unique identifier generation
///
/// Ids must be collision-free for the lifetime of the process.
/// Used for order and trade identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier
    fn next_id(&self) -> String;
}
