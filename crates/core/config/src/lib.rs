use cached::proc_macro::cached;
use config::{Config, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Anuncios.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Anuncios.toml").exists() {
            builder = builder.add_source(File::new("Anuncios.toml", FileFormat::Toml));
        }

        builder.build().unwrap()
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Database {
    pub mongodb: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModerationClassifier {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Moderation {
    pub queue_page_size: i64,
    pub classifier: ModerationClassifier,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub database: Database,
    pub moderation: Moderation,
}

pub async fn init() {
    println!(
        ":: Anuncios Configuration ::\n\x1b[32m{:?}\x1b[0m",
        config().await
    );
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read().await.try_deserialize::<Settings>().unwrap()
}
