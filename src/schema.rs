table! {
    signup (id) {
        id -> Int8,
        created_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
        email -> Text,
        last_sent_at -> Timestamptz,
        num_attempts -> Int8,
        token -> Text,
    }
}
