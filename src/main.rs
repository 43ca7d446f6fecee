use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use env_logger::Env;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    ruqanda::db::init_db(database_url).await;

    HttpServer::new(|| {
        App::new()
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(ruqanda::web::configure)
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await?;

    Ok(())
}
