//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Client records.
    ///
    /// `id` is assigned by the repository on insert. `password` holds the
    /// output of the configured password codec.
    clients (id) {
        id -> Uuid,
        whatsapp_group_name -> Nullable<Text>,
        bid -> Int8,
        uid -> Int8,
        mtc_group_id -> Int8,
        reporter_name -> Text,
        reporter_phone -> Text,
        comp_id -> Text,
        user_name -> Text,
        password -> Text,
        app_guid -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
