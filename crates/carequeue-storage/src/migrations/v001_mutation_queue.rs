//! v001: mutation_queue, FIFO by enqueued_at, AUTOINCREMENT so ids are never reused.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS mutation_queue (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    method           TEXT NOT NULL,
    target           TEXT NOT NULL,
    payload          BLOB NOT NULL,
    payload_version  INTEGER NOT NULL,
    bearer_token     TEXT,
    enqueued_at      TEXT NOT NULL,
    attempts         INTEGER NOT NULL DEFAULT 0 CHECK (attempts >= 0)
);

CREATE INDEX IF NOT EXISTS idx_mutation_queue_enqueued_at ON mutation_queue(enqueued_at, id);
";
