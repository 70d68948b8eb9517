//! Development seed: default users and the SN-001..SN-010 machine fleet.
//!
//! Idempotent — existing rows are left untouched, so it is safe to run
//! against a database that has already been seeded.

use mainsight_api::auth::password::hash_password;
use mainsight_db::models::machine::CreateMachine;
use mainsight_db::repositories::{MachineRepo, UserRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Password shared by all seeded accounts. Development only.
const SEED_PASSWORD: &str = "password123";

/// Number of machines in the seeded fleet.
const FLEET_SIZE: u32 = 10;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = mainsight_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    mainsight_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let password_hash = hash_password(SEED_PASSWORD).expect("password hashing should succeed");

    let users = [
        ("Admin User", "admin@example.com", "admin"),
        ("Technician User", "tech1@example.com", "technician"),
        ("Normal User", "user1@example.com", "user"),
    ];
    for (name, email, role) in users {
        match UserRepo::find_by_email(&pool, email)
            .await
            .expect("user lookup should succeed")
        {
            Some(_) => tracing::info!(email, "user already present"),
            None => {
                UserRepo::create(&pool, name, email, &password_hash, role)
                    .await
                    .expect("user creation should succeed");
                tracing::info!(email, role, "user created");
            }
        }
    }

    let locations = ["Plant 1", "Plant 2", "Plant 3"];
    let types = ["L", "M", "H"];
    for i in 1..=FLEET_SIZE {
        let serial = format!("SN-{i:03}");
        let machine = CreateMachine {
            serial: serial.clone(),
            name: format!("Turbine {i}"),
            machine_type: types[(i as usize - 1) % types.len()].to_string(),
            location: locations[(i as usize - 1) % locations.len()].to_string(),
            installed_at: None,
        };
        let inserted = MachineRepo::create(&pool, &machine)
            .await
            .expect("machine creation should succeed");
        if inserted {
            tracing::info!(%serial, "machine created");
        } else {
            tracing::info!(%serial, "machine already present");
        }
    }

    tracing::info!("Seeding completed");
}
