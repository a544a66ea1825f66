use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create restaurants table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurants (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            address VARCHAR(512) NOT NULL DEFAULT '',
            latitude DOUBLE PRECISION NULL,
            longitude DOUBLE PRECISION NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            currency VARCHAR(3) NOT NULL DEFAULT 'EUR',
            password_hash VARCHAR(255) NULL,
            flat_deposit_cents BIGINT NULL,
            open_time TIME NOT NULL DEFAULT '12:00',
            close_time TIME NOT NULL DEFAULT '22:00',
            slot_minutes INT NOT NULL DEFAULT 90,
            slot_mode VARCHAR(16) NOT NULL DEFAULT 'window',
            assignment_mode VARCHAR(16) NOT NULL DEFAULT 'automatic',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_mode CHECK (slot_mode IN ('fixed', 'window')),
            CONSTRAINT valid_assignment_mode CHECK (assignment_mode IN ('automatic', 'manual')),
            CONSTRAINT location_complete CHECK ((latitude IS NULL) = (longitude IS NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table (fixed candidate slots per restaurant)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            slot_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT uniq_restaurant_slot UNIQUE (restaurant_id, slot_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create table_types table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS table_types (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            name VARCHAR(255) NOT NULL,
            capacity INT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_capacity CHECK (capacity >= 1)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tables table; deletion of a referenced type is blocked
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tables (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            table_type_id UUID NOT NULL REFERENCES table_types(id) ON DELETE RESTRICT,
            name VARCHAR(255) NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'active',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('active', 'archived'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create booking_cost_tiers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_cost_tiers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            min_people INT NOT NULL,
            max_people INT NOT NULL,
            cost_cents BIGINT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_people_range CHECK (min_people >= 1 AND min_people <= max_people),
            CONSTRAINT valid_cost CHECK (cost_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create restaurant_closures table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurant_closures (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            date DATE NULL,
            day_of_week SMALLINT NULL,
            is_all_day BOOLEAN NOT NULL DEFAULT TRUE,
            start_time TIME NULL,
            end_time TIME NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT closure_target CHECK (date IS NOT NULL OR day_of_week IS NOT NULL),
            CONSTRAINT valid_day_of_week CHECK (day_of_week IS NULL OR day_of_week BETWEEN 0 AND 6),
            CONSTRAINT partial_requires_window CHECK (
                is_all_day OR (start_time IS NOT NULL AND end_time IS NOT NULL AND start_time < end_time)
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            restaurant_id UUID NOT NULL REFERENCES restaurants(id),
            table_id UUID NULL REFERENCES tables(id),
            guest_name VARCHAR(255) NOT NULL,
            guest_email VARCHAR(255) NOT NULL,
            party_size INT NOT NULL,
            date DATE NOT NULL,
            slot_time TIME NOT NULL,
            cancelled BOOLEAN NOT NULL DEFAULT FALSE,
            attended BOOLEAN NOT NULL DEFAULT FALSE,
            seen BOOLEAN NOT NULL DEFAULT FALSE,
            deposit_cents BIGINT NOT NULL DEFAULT 0,
            payment_ref VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_party_size CHECK (party_size >= 1)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Uniqueness hardening for the booking race: the pre-commit availability
    // check narrows the window, these indexes close it. Insert-time
    // violations are the authoritative conflict signal.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_table_booking
            ON reservations(restaurant_id, table_id, date, slot_time)
            WHERE NOT cancelled AND table_id IS NOT NULL;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_guest_booking
            ON reservations(restaurant_id, lower(guest_email), date, slot_time)
            WHERE NOT cancelled;
        "#,
    )
    .execute(pool)
    .await?;

    // Table names must stay unique among a restaurant's active tables
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_active_table_name
            ON tables(restaurant_id, name)
            WHERE status = 'active';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; plain-text execute runs the batch outside a prepared
    // statement, which only admits one command
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_slots_restaurant_id ON time_slots(restaurant_id);
        CREATE INDEX IF NOT EXISTS idx_table_types_restaurant_id ON table_types(restaurant_id);
        CREATE INDEX IF NOT EXISTS idx_tables_restaurant_id ON tables(restaurant_id);
        CREATE INDEX IF NOT EXISTS idx_tables_table_type_id ON tables(table_type_id);
        CREATE INDEX IF NOT EXISTS idx_tiers_restaurant_id ON booking_cost_tiers(restaurant_id);
        CREATE INDEX IF NOT EXISTS idx_closures_restaurant_id ON restaurant_closures(restaurant_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_restaurant_date ON reservations(restaurant_id, date);
        CREATE INDEX IF NOT EXISTS idx_reservations_table_id ON reservations(table_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_guest_email ON reservations(lower(guest_email));
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
