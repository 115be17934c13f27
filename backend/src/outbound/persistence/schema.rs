//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database after a
//! migration changes the shape.

diesel::table! {
    /// Countries available at registration.
    countries (id) {
        /// Stable country code.
        id -> Varchar,
        /// Display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// States within a country.
    states (id) {
        /// Stable state code.
        id -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Owning country code.
        country_id -> Varchar,
    }
}

diesel::table! {
    /// Municipalities within a state.
    municipalities (id) {
        /// Stable municipality code.
        id -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Owning state code.
        state_id -> Varchar,
    }
}

diesel::table! {
    /// Business categories.
    categories (id) {
        /// Numeric category id.
        id -> Int4,
        /// Display name.
        name -> Varchar,
        /// Client-side icon key.
        icon_key -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// User accounts.
    ///
    /// `password_hash` is only ever selected by the credential repository;
    /// profile reads use an explicit column subset.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login address.
        email -> Varchar,
        /// Argon2 password hash; auth boundary only.
        password_hash -> Varchar,
        /// Given name.
        first_name -> Nullable<Varchar>,
        /// Family name.
        last_name -> Nullable<Varchar>,
        /// Date of birth captured at registration.
        birth_date -> Nullable<Date>,
        /// Registration country reference.
        country_id -> Nullable<Varchar>,
        /// Registration state reference.
        state_id -> Nullable<Varchar>,
        /// Registration municipality reference.
        municipality_id -> Nullable<Varchar>,
        /// Public profile image URL.
        profile_image_url -> Nullable<Text>,
        /// Free-text biography.
        biography -> Nullable<Text>,
        /// Full LinkedIn profile URL.
        linkedin_profile -> Nullable<Text>,
        /// Instagram handle without the leading `@`.
        instagram_handle -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Business listings.
    businesses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; immutable after creation.
        owner_id -> Uuid,
        /// Listing name.
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Capital required to join; non-negative by check constraint.
        investment -> Float8,
        /// Offered profit share; non-negative by check constraint.
        profit_percentage -> Float8,
        /// Category reference.
        category_id -> Int4,
        /// Municipality reference.
        municipality_id -> Varchar,
        /// Free-text business model description.
        business_model -> Text,
        /// Reported monthly income; non-negative by check constraint.
        monthly_income -> Float8,
        /// Public image URL.
        image_url -> Nullable<Text>,
        /// Record creation timestamp; feed ordering key.
        created_at -> Timestamptz,
        /// Refreshed on every mutation.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Partnership interest relation.
    partnerships (user_id, business_id) {
        /// Interested user.
        user_id -> Uuid,
        /// Targeted listing.
        business_id -> Uuid,
        /// When interest was first registered.
        initiated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved-listing relation.
    user_saved_businesses (user_id, business_id) {
        /// Saving user.
        user_id -> Uuid,
        /// Saved listing.
        business_id -> Uuid,
        /// When the save happened.
        saved_at -> Timestamptz,
    }
}

diesel::table! {
    /// Liked-listing relation.
    user_liked_businesses (user_id, business_id) {
        /// Liking user.
        user_id -> Uuid,
        /// Liked listing.
        business_id -> Uuid,
        /// When the like happened.
        liked_at -> Timestamptz,
    }
}

diesel::joinable!(businesses -> users (owner_id));
diesel::joinable!(businesses -> categories (category_id));
diesel::joinable!(businesses -> municipalities (municipality_id));
diesel::joinable!(states -> countries (country_id));
diesel::joinable!(municipalities -> states (state_id));
diesel::joinable!(partnerships -> businesses (business_id));
diesel::joinable!(partnerships -> users (user_id));
diesel::joinable!(user_saved_businesses -> businesses (business_id));
diesel::joinable!(user_saved_businesses -> users (user_id));
diesel::joinable!(user_liked_businesses -> businesses (business_id));
diesel::joinable!(user_liked_businesses -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    countries,
    states,
    municipalities,
    categories,
    users,
    businesses,
    partnerships,
    user_saved_businesses,
    user_liked_businesses,
);
