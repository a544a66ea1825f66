use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbClosure, DbPricingTier, DbReservation, DbRestaurant, DbTable, DbTableType, DbTableWithType,
    DbTimeSlot,
};
use crate::repositories::reservation::InsertOutcome;
use crate::repositories::restaurant::{NewRestaurant, RestaurantChanges};

// Mock repositories for testing
mock! {
    pub RestaurantRepo {
        pub async fn create_restaurant(
            &self,
            new: NewRestaurant,
        ) -> eyre::Result<DbRestaurant>;

        pub async fn get_restaurant_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbRestaurant>>;

        pub async fn update_restaurant(
            &self,
            id: Uuid,
            changes: RestaurantChanges,
        ) -> eyre::Result<Option<DbRestaurant>>;

        pub async fn verify_password(
            &self,
            id: Uuid,
            password: &'static str,
        ) -> eyre::Result<bool>;

        pub async fn get_time_slots(
            &self,
            restaurant_id: Uuid,
        ) -> eyre::Result<Vec<DbTimeSlot>>;

        pub async fn replace_time_slots(
            &self,
            restaurant_id: Uuid,
            slots: Vec<NaiveTime>,
        ) -> eyre::Result<()>;
    }
}

mock! {
    pub TableRepo {
        pub async fn create_table_type(
            &self,
            restaurant_id: Uuid,
            name: &'static str,
            capacity: i32,
        ) -> eyre::Result<DbTableType>;

        pub async fn get_table_types_by_restaurant(
            &self,
            restaurant_id: Uuid,
        ) -> eyre::Result<Vec<DbTableType>>;

        pub async fn create_table(
            &self,
            restaurant_id: Uuid,
            table_type_id: Uuid,
            name: &'static str,
        ) -> eyre::Result<DbTable>;

        pub async fn get_tables_with_types(
            &self,
            restaurant_id: Uuid,
            include_archived: bool,
        ) -> eyre::Result<Vec<DbTableWithType>>;
    }
}

mock! {
    pub PricingRepo {
        pub async fn create_tier(
            &self,
            restaurant_id: Uuid,
            min_people: i32,
            max_people: i32,
            cost_cents: i64,
        ) -> eyre::Result<DbPricingTier>;

        pub async fn get_tiers_by_restaurant(
            &self,
            restaurant_id: Uuid,
        ) -> eyre::Result<Vec<DbPricingTier>>;

        pub async fn delete_tier(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ClosureRepo {
        pub async fn get_closures_by_restaurant(
            &self,
            restaurant_id: Uuid,
        ) -> eyre::Result<Vec<DbClosure>>;

        pub async fn delete_closure(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ReservationRepo {
        pub async fn get_reservations_for_slot(
            &self,
            restaurant_id: Uuid,
            date: NaiveDate,
            slot_time: NaiveTime,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn get_reservations_for_date(
            &self,
            restaurant_id: Uuid,
            date: NaiveDate,
            include_cancelled: bool,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn find_duplicate(
            &self,
            restaurant_id: Uuid,
            guest_email: &'static str,
            date: NaiveDate,
            slot_time: NaiveTime,
        ) -> eyre::Result<Option<DbReservation>>;

        pub async fn insert_guarded(
            &self,
            new: crate::repositories::reservation::NewReservation,
        ) -> eyre::Result<InsertOutcome>;

        pub async fn cancel_reservation(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbReservation>>;
    }
}
