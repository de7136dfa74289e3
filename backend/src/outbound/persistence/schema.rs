//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// User accounts with leveling progress.
    users (id) {
        id -> Uuid,
        name -> Text,
        /// Unique (`users_email_key`).
        email -> Text,
        /// Points within the current level, `0..100`.
        points -> Int4,
        /// Current level, `>= 1`.
        level -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Content sections.
    sections (id) {
        id -> Uuid,
        title -> Text,
        /// JSON array of `{ "compId", "compType" }` objects in display order.
        components -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Exercises. `section_id` is not a foreign key: the component list is the
    /// authoritative link and drift is repaired by reconciliation.
    exercises (id) {
        id -> Uuid,
        section_id -> Uuid,
        title -> Text,
        question -> Text,
        answers -> Array<Text>,
        date_created -> Timestamptz,
        date_updated -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, sections, exercises);
