#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

#[macro_use]
extern crate anuncios_result;

#[cfg(test)]
macro_rules! database_test {
    ( | $db: ident | $test:expr ) => {
        let db = anuncios_database::DatabaseInfo::Test(format!(
            "{}:{}",
            file!().replace('/', "_").replace(".rs", ""),
            line!()
        ))
        .connect()
        .await
        .expect("Database connection failed.");

        db.drop_database().await;

        #[allow(clippy::redundant_closure_call)]
        (|$db: anuncios_database::Database| $test)(db.clone()).await;

        db.drop_database().await
    };
}

mod classifier;
mod engine;
mod http;
mod projector;
mod rules;
mod settings;

pub use classifier::*;
pub use engine::*;
pub use http::*;
pub use projector::*;
pub use rules::*;
pub use settings::*;
