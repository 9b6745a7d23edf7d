use crate::POOL;
use diesel::prelude::*;
use rand::Rng;

pub fn generate_unique_return_confirmation() -> String {
    // Digits 0-9 and uppercase A-Z, 8 characters, retried until unused.
    let charset: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::rng();

    loop {
        let confirmation: String = (0..8)
            .map(|_| {
                let idx = rng.random_range(0..charset.len());
                charset[idx] as char
            })
            .collect();

        let exists = {
            let mut conn = POOL.clone().get().expect("Failed to get DB connection");

            // A query error counts as "exists" so we retry instead of
            // handing out a possibly duplicated code.
            diesel::select(diesel::dsl::exists(
                crate::schema::return_records::table
                    .filter(crate::schema::return_records::confirmation.eq(&confirmation)),
            ))
            .get_result::<bool>(&mut conn)
            .unwrap_or_else(|e| {
                eprintln!("Database error checking return confirmation: {:?}", e);
                true
            })
        };

        if !exists {
            return confirmation;
        }
    }
}
