use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    localiz_observability::init();

    let config = localiz_api::config::AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let mailer = Arc::new(localiz_mail::LogMailer);
    let services = localiz_api::app::build_services(config, mailer);
    let app = localiz_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    // `into_make_service_with_connect_info` so the rate limiter sees client IPs.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
