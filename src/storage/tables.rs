/// Photo records: id -> Photo
pub const PHOTO_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS photo (\
        id SERIAL PRIMARY KEY, \
        name TEXT NOT NULL, \
        description TEXT NOT NULL, \
        filename TEXT NOT NULL, \
        views INTEGER NOT NULL DEFAULT 0, \
        is_published BOOLEAN NOT NULL DEFAULT TRUE\
    )";

/// Video records: id -> Video
pub const VIDEO_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS video (\
        id SERIAL PRIMARY KEY, \
        name TEXT NOT NULL, \
        description TEXT NOT NULL, \
        filename TEXT NOT NULL, \
        views INTEGER NOT NULL DEFAULT 0, \
        is_published BOOLEAN NOT NULL DEFAULT TRUE, \
        duration INTEGER\
    )";

/// Every table the service needs, in creation order.
pub const SCHEMA: &[&str] = &[PHOTO_TABLE, VIDEO_TABLE];
