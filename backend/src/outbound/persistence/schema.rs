//! Diesel table definitions. Kept in step with `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Text,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        created_at -> Timestamptz,
    }
}
