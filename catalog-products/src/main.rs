use std::process::ExitCode;
use std::sync::Arc;

use catalog_core::{init_tracing, ServiceConfig};
use catalog_products::{rpc, ProductService, SqlxProductGateway};
use catalog_rpc::{http, AmqpServer};
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServiceConfig::load("dev") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("products-service: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log.format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "products-service stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServiceConfig) -> Result<(), BoxError> {
    let pool = catalog_data_sqlx::connect(&config.database.url, config.database.connections).await?;
    let gateway = SqlxProductGateway::new(pool);
    gateway.migrate().await?;

    let router = Arc::new(rpc::routes(ProductService::new(Arc::new(gateway))));
    let shutdown = CancellationToken::new();

    let broker = AmqpServer::connect(
        &config.transport.servers,
        &config.transport.queue,
        config.transport.prefetch,
    )
    .await?;
    let mut consumer = tokio::spawn(broker.serve(router.clone(), shutdown.clone()));

    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal.cancel();
            }
            Err(err) => tracing::warn!(error = %err, "Cannot listen for shutdown signal"),
        }
    });

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP tunnel listening");

    let http_shutdown = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, http::tunnel(router))
            .with_graceful_shutdown(async move { http_shutdown.cancelled().await })
            .await
    });

    // Either side stopping takes the other down with it.
    let outcome = tokio::select! {
        consumed = &mut consumer => {
            let unexpected = !shutdown.is_cancelled();
            shutdown.cancel();
            let consumed = joined(consumed).and_then(|()| {
                if unexpected {
                    Err(BoxError::from("RPC consumer stopped while the service was running"))
                } else {
                    Ok(())
                }
            });
            consumed.and(joined(server.await))
        }
        served = &mut server => {
            shutdown.cancel();
            joined(served).and(joined(consumer.await))
        }
    };

    tracing::info!("products-service stopped");
    outcome
}

fn joined<E>(result: Result<Result<(), E>, tokio::task::JoinError>) -> Result<(), BoxError>
where
    E: Into<BoxError>,
{
    result?.map_err(Into::into)
}
