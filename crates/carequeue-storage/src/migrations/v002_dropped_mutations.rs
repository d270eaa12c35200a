//! v002: dropped_mutations, dead letters for client errors and exhausted retries.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS dropped_mutations (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    mutation_id      INTEGER NOT NULL,
    method           TEXT NOT NULL,
    target           TEXT NOT NULL,
    payload          BLOB NOT NULL,
    payload_version  INTEGER NOT NULL,
    bearer_token     TEXT,
    enqueued_at      TEXT NOT NULL,
    attempts         INTEGER NOT NULL,
    reason           TEXT NOT NULL,
    dropped_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dropped_mutations_dropped_at ON dropped_mutations(dropped_at);
";
