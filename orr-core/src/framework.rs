use sqlx::PgPool;

/// Pool-backed message processor.
///
/// One-shot queries are modeled as message types with a
/// `kanau::processor::Processor` impl on this struct; multi-statement
/// mutations go through `sqlx::Transaction` helpers on the entities
/// instead, so the transaction boundary is always explicit at the call
/// site.
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
