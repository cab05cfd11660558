use social_app::app::App;
use social_app::config::Config;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::parse();
    let db = social_db::Db::init(&config.database_url, config.db_max_connections).await?;

    social_app::serve(
        App {
            jwt_keys: config.jwt_keys(),
            db,
        },
        config.listen_addr,
    )
    .await
}
