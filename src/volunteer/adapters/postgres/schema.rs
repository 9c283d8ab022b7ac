//! Diesel table definitions for volunteer statistics.

diesel::table! {
    volunteer_stats (volunteer_id) {
        #[max_length = 255]
        volunteer_id -> Varchar,
        tasks_completed -> Int4,
        volunteer_hours_centi -> Int8,
        points -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    volunteer_completion_credits (task_id, volunteer_id) {
        task_id -> Uuid,
        #[max_length = 255]
        volunteer_id -> Varchar,
        hours_centi -> Int4,
        points -> Int4,
        credited_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(volunteer_stats, volunteer_completion_credits);
