//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `raceday_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use raceday_core::db::migrations::latest_version;
use raceday_core::db::open_db_in_memory;

fn main() {
    println!("raceday_core version={}", raceday_core::core_version());

    match open_db_in_memory() {
        Ok(_) => println!("raceday_core db=ok schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("raceday_core db=error {err}");
            std::process::exit(1);
        }
    }
}
