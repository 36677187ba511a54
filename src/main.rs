use random_user::{run_app, GenericResult, SessionConfig};

#[tokio::main]
async fn main() -> GenericResult<()> {
    pretty_env_logger::init();

    let config = SessionConfig::default();
    log::info!(
        "fetching users 1..={} from {}",
        config.max_user_id,
        config.base_url
    );

    run_app(config).await
}
