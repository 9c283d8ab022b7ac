//! Diesel schema for volunteer task persistence.

diesel::table! {
    /// Volunteer task records.
    volunteer_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Category identifier.
        #[max_length = 255]
        category_id -> Varchar,
        /// Creator identifier.
        #[max_length = 255]
        created_by -> Varchar,
        /// Latitude in degrees.
        latitude -> Nullable<Float8>,
        /// Longitude in degrees.
        longitude -> Nullable<Float8>,
        /// Street address.
        #[max_length = 500]
        address -> Nullable<Varchar>,
        /// Priority in canonical string form.
        #[max_length = 20]
        priority -> Varchar,
        /// Difficulty in canonical string form.
        #[max_length = 20]
        difficulty -> Varchar,
        /// Required skills as a JSON array of strings.
        required_skills -> Jsonb,
        /// Lifecycle status in canonical string form.
        #[max_length = 20]
        status -> Varchar,
        /// Capacity.
        max_volunteers -> Int4,
        /// Accepted assignment count.
        current_volunteers -> Int4,
        /// Assignee identifier.
        #[max_length = 255]
        assigned_to -> Nullable<Varchar>,
        /// Estimated effort in hundredths of an hour.
        estimated_hours_centi -> Nullable<Int4>,
        /// Actual effort in hundredths of an hour.
        actual_hours_centi -> Nullable<Int4>,
        /// Assignment deadline.
        deadline -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Cancellation timestamp.
        cancelled_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency version.
        version -> Int8,
    }
}
